//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use crate::error::StreamError;
use core::convert::TryFrom;

/// Compression level, `0` (store only) to `9` (best).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Level(u8);

impl Level {
    pub const NONE: Level = Level(0);
    pub const FAST: Level = Level(1);
    pub const DEFAULT: Level = Level(6);
    pub const BEST: Level = Level(9);

    /// `-1` selects the default level.
    pub fn new(level: i32) -> Result<Self, StreamError> {
        match level {
            -1 => Ok(Self::DEFAULT),
            0..=9 => Ok(Level(level as u8)),
            _ => {
                debug!("rejected compression level {}", level);
                Err(StreamError::Configuration)
            }
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub(crate) fn config(self) -> &'static CompressionConfig {
        &CONFIGURATION_TABLE[self.0 as usize]
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i32> for Level {
    type Error = StreamError;
    fn try_from(level: i32) -> Result<Self, StreamError> {
        Self::new(level)
    }
}

/// Bias applied to tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Default,
    /// Data produced by a filter: favour literals over short matches.
    Filtered,
    /// No back-references at all.
    HuffmanOnly,
    /// Back-references of distance one only.
    Rle,
    /// Never emit dynamic Huffman blocks.
    Fixed,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Default
    }
}

impl TryFrom<i32> for Strategy {
    type Error = StreamError;
    fn try_from(value: i32) -> Result<Self, StreamError> {
        match value {
            0 => Ok(Strategy::Default),
            1 => Ok(Strategy::Filtered),
            2 => Ok(Strategy::HuffmanOnly),
            3 => Ok(Strategy::Rle),
            4 => Ok(Strategy::Fixed),
            _ => {
                debug!("rejected strategy {}", value);
                Err(StreamError::Configuration)
            }
        }
    }
}

/// How tokens are searched for at a given level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Search {
    Stored,
    Fast,
    Lazy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CompressionConfig {
    /// Shorten the chain search once a match this long is in hand.
    pub good_length: usize,
    /// Skip the lazy look-ahead for matches at least this long.
    pub max_lazy: usize,
    /// Stop searching once a match this long is found.
    pub nice_length: usize,
    pub max_chain: usize,
    pub search: Search,
}

const fn cfg(
    good_length: usize,
    max_lazy: usize,
    nice_length: usize,
    max_chain: usize,
    search: Search,
) -> CompressionConfig {
    CompressionConfig {
        good_length,
        max_lazy,
        nice_length,
        max_chain,
        search,
    }
}

static CONFIGURATION_TABLE: [CompressionConfig; 10] = [
    cfg(0, 0, 0, 0, Search::Stored),
    cfg(4, 4, 8, 4, Search::Fast),
    cfg(4, 5, 16, 8, Search::Fast),
    cfg(4, 6, 32, 32, Search::Fast),
    cfg(4, 4, 16, 16, Search::Lazy),
    cfg(8, 16, 32, 32, Search::Lazy),
    cfg(8, 16, 128, 128, Search::Lazy),
    cfg(8, 32, 128, 256, Search::Lazy),
    cfg(32, 128, 258, 1024, Search::Lazy),
    cfg(32, 258, 258, 4096, Search::Lazy),
];

/// Tracks the active level/strategy and a change that is waiting for the
/// buffered data of the old settings to be flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ParamController {
    level: Level,
    strategy: Strategy,
    pending: Option<(Level, Strategy)>,
}

impl ParamController {
    pub(crate) fn new(level: Level, strategy: Strategy) -> Self {
        Self {
            level,
            strategy,
            pending: None,
        }
    }

    #[inline]
    pub(crate) fn level(&self) -> Level {
        self.level
    }

    #[inline]
    pub(crate) fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[inline]
    pub(crate) fn config(&self) -> &'static CompressionConfig {
        self.level.config()
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether data tokenized under the current settings must be closed
    /// off in its own block before `level`/`strategy` apply.
    pub(crate) fn needs_flush(
        &self,
        level: Level,
        strategy: Strategy,
    ) -> bool {
        strategy != self.strategy
            || level.config().search != self.level.config().search
    }

    pub(crate) fn request(&mut self, level: Level, strategy: Strategy) {
        if self.pending != Some((level, strategy)) {
            trace!("parameter change to {:?}/{:?} pending", level, strategy);
        }
        self.pending = Some((level, strategy));
    }

    pub(crate) fn apply(&mut self, level: Level, strategy: Strategy) {
        if (level, strategy) != (self.level, self.strategy) {
            debug!(
                "parameters {:?}/{:?} -> {:?}/{:?}",
                self.level, self.strategy, level, strategy
            );
        }
        self.level = level;
        self.strategy = strategy;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_range() {
        assert_eq!(Level::new(-1), Ok(Level::DEFAULT));
        assert_eq!(Level::new(0).map(Level::get), Ok(0));
        assert_eq!(Level::new(9), Ok(Level::BEST));
        assert_eq!(Level::new(10), Err(StreamError::Configuration));
        assert_eq!(Level::new(-2), Err(StreamError::Configuration));
    }

    #[test]
    fn strategy_from_int() {
        assert_eq!(Strategy::try_from(3), Ok(Strategy::Rle));
        assert_eq!(Strategy::try_from(5), Err(StreamError::Configuration));
    }

    #[test]
    fn flush_only_when_search_changes() {
        let four = Level::new(4).unwrap();
        let p = ParamController::new(four, Strategy::Default);
        assert!(!p.needs_flush(Level::new(9).unwrap(), Strategy::Default));
        assert!(p.needs_flush(Level::FAST, Strategy::Default));
        assert!(p.needs_flush(Level::NONE, Strategy::Default));
        assert!(p.needs_flush(Level::new(4).unwrap(), Strategy::Rle));
    }

    #[test]
    fn pending_until_applied() {
        let mut p = ParamController::new(Level::DEFAULT, Strategy::Default);
        p.request(Level::NONE, Strategy::Filtered);
        assert!(p.is_pending());
        assert_eq!(p.level(), Level::DEFAULT);
        p.apply(Level::NONE, Strategy::Filtered);
        assert!(!p.is_pending());
        assert_eq!(p.strategy(), Strategy::Filtered);
    }
}
