//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

/// How eagerly a step must emit buffered data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flush {
    /// The engine may hold data back for better compression.
    None,
    /// Emit everything so far, followed by an empty fixed block.
    Partial,
    /// Emit everything so far and align to a byte with an empty stored
    /// block.
    Sync,
    /// As `Sync`, and forget the history so decoding can restart here.
    Full,
    /// Compression: close the current block without aligning.
    /// Decompression: stop at the next block boundary.
    Block,
    /// Write the final block and trailer.
    Finish,
}

impl Default for Flush {
    fn default() -> Self {
        Flush::None
    }
}

impl Flush {
    /// Strength order used to skip a flush that repeats a stronger one.
    pub(crate) fn rank(self) -> u8 {
        match self {
            Flush::None => 0,
            Flush::Block => 1,
            Flush::Partial => 2,
            Flush::Sync => 3,
            Flush::Full => 4,
            Flush::Finish => 5,
        }
    }
}
