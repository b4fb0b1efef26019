//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

pub(crate) mod slidedict;

/// One LZ77 token. `pos` is the distance minus one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LzssCode {
    Symbol(u8),
    Reference { len: usize, pos: usize },
}

impl Default for LzssCode {
    fn default() -> Self {
        LzssCode::Symbol(0)
    }
}

impl LzssCode {
    /// Number of input bytes the token covers.
    #[inline]
    pub fn len(&self) -> usize {
        match *self {
            LzssCode::Symbol(_) => 1,
            LzssCode::Reference { len, .. } => len,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MatchInfo {
    pub len: usize,
    pub pos: usize,
}

impl From<MatchInfo> for LzssCode {
    fn from(m: MatchInfo) -> Self {
        LzssCode::Reference {
            len: m.len,
            pos: m.pos,
        }
    }
}
