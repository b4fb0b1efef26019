//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use core::fmt;

/// Why a compressed stream was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corruption {
    HeaderCheck,
    UnknownMethod,
    WindowSize,
    GzipMagic,
    GzipFlags,
    HeaderCrc,
    BlockType,
    StoredLength,
    SymbolCounts,
    CodeLengths,
    CodeLengthRepeat,
    MissingEndOfBlock,
    LiteralLengthCodes,
    DistanceCodes,
    InvalidCode,
    DistanceTooFar,
    Checksum,
    Length,
    Truncated,
}

impl Corruption {
    fn description_in(&self) -> &str {
        match *self {
            Corruption::HeaderCheck => "incorrect header check",
            Corruption::UnknownMethod => "unknown compression method",
            Corruption::WindowSize => "invalid window size",
            Corruption::GzipMagic => "incorrect gzip magic number",
            Corruption::GzipFlags => "unknown gzip header flags set",
            Corruption::HeaderCrc => "header crc mismatch",
            Corruption::BlockType => "invalid block type",
            Corruption::StoredLength => "invalid stored block lengths",
            Corruption::SymbolCounts => {
                "too many length or distance symbols"
            }
            Corruption::CodeLengths => "invalid code lengths set",
            Corruption::CodeLengthRepeat => "invalid bit length repeat",
            Corruption::MissingEndOfBlock => {
                "invalid code -- missing end-of-block"
            }
            Corruption::LiteralLengthCodes => {
                "invalid literal/lengths set"
            }
            Corruption::DistanceCodes => "invalid distances set",
            Corruption::InvalidCode => {
                "invalid literal/length or distance code"
            }
            Corruption::DistanceTooFar => "invalid distance too far back",
            Corruption::Checksum => "incorrect data check",
            Corruption::Length => "incorrect length check",
            Corruption::Truncated => "stream ends unexpectedly",
        }
    }
}

impl fmt::Display for Corruption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.description_in())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    /// Rejected construction arguments. No session is produced.
    Configuration,
    /// Malformed input. The session stays in the error state until reset.
    Corrupt(Corruption),
    /// The preset dictionary does not match the id in the stream header.
    DictionaryMismatch,
    /// Operation invoked in the wrong state. The session is left untouched.
    Misuse,
    /// Destination too small for a one-shot helper.
    InsufficientSpace,
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            StreamError::Corrupt(ref c) => {
                write!(f, "{}: {}", self.description_in(), c)
            }
            _ => write!(f, "{}", self.description_in()),
        }
    }
}

#[cfg(feature = "std")]
impl ::std::error::Error for StreamError {
    fn description(&self) -> &str {
        self.description_in()
    }

    fn cause(&self) -> Option<&dyn (::std::error::Error)> {
        None
    }
}

impl StreamError {
    fn description_in(&self) -> &str {
        match *self {
            StreamError::Configuration => "invalid stream configuration",
            StreamError::Corrupt(_) => "corrupt compressed stream",
            StreamError::DictionaryMismatch => "preset dictionary mismatch",
            StreamError::Misuse => "operation not valid in this state",
            StreamError::InsufficientSpace => "destination buffer too small",
        }
    }

    /// Fatal errors move a session into its error state.
    pub(crate) fn is_fatal(&self) -> bool {
        match *self {
            StreamError::Corrupt(_) | StreamError::DictionaryMismatch => true,
            _ => false,
        }
    }
}

impl From<Corruption> for StreamError {
    fn from(c: Corruption) -> Self {
        StreamError::Corrupt(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(not(feature = "std"))]
    use alloc::string::ToString;

    #[test]
    fn display_names_cause() {
        let e = StreamError::from(Corruption::DistanceTooFar);
        assert_eq!(
            e.to_string(),
            "corrupt compressed stream: invalid distance too far back"
        );
        assert!(e.is_fatal());
        assert!(!StreamError::Misuse.is_fatal());
    }
}
