//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use crate::error::StreamError;
use crate::params::{Level, Strategy};
use crate::stream::Mode;

/// Container around the DEFLATE data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Framing {
    Raw,
    Zlib,
    Gzip,
    /// zlib or gzip, decided by the first two bytes. Decompression only.
    Auto,
}

/// Framing and history size decoded from a signed window-bits value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowBits {
    framing: Framing,
    bits: u8,
}

impl WindowBits {
    pub const MIN_BITS: u8 = 8;
    pub const MAX_BITS: u8 = 15;

    /// `8..=15` zlib, `-8..=-15` raw, `24..=31` gzip and `40..=47`
    /// automatic detection.
    pub fn parse(value: i32, mode: Mode) -> Result<Self, StreamError> {
        let (framing, bits) = match value {
            8..=15 => (Framing::Zlib, value),
            -15..=-8 => (Framing::Raw, -value),
            24..=31 => (Framing::Gzip, value - 16),
            40..=47 if mode == Mode::Decompress => (Framing::Auto, value - 32),
            _ => {
                debug!("rejected window bits {} for {:?}", value, mode);
                return Err(StreamError::Configuration);
            }
        };
        // 8-bit zlib/gzip streams are written with a 9-bit window, so a
        // decoder asked for 8 bits has to take 9-bit headers. A raw
        // compressor keeps 9 bits too: its matches reach back at most
        // 512 - MIN_LOOKAHEAD bytes, inside a 256-byte raw window.
        let bits = match (mode, framing, bits) {
            (Mode::Compress, _, 8) => 9,
            (Mode::Decompress, Framing::Raw, 8) => 8,
            (Mode::Decompress, _, 8) => 9,
            _ => bits,
        };
        Ok(Self {
            framing,
            bits: bits as u8,
        })
    }

    #[inline]
    pub fn framing(&self) -> Framing {
        self.framing
    }

    #[inline]
    pub fn bits(&self) -> u8 {
        self.bits
    }

    #[inline]
    pub fn window_size(&self) -> usize {
        1 << self.bits
    }
}

/// Construction parameters of a stream session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    pub window_bits: i32,
    pub level: Level,
    pub strategy: Strategy,
    pub mem_level: u8,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            window_bits: 15,
            level: Level::DEFAULT,
            strategy: Strategy::Default,
            mem_level: Self::DEFAULT_MEM_LEVEL,
        }
    }
}

impl StreamConfig {
    pub const DEFAULT_MEM_LEVEL: u8 = 8;
    pub const MAX_MEM_LEVEL: u8 = 9;

    pub fn new(window_bits: i32) -> Self {
        Self {
            window_bits,
            ..Self::default()
        }
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn mem_level(mut self, mem_level: u8) -> Self {
        self.mem_level = mem_level;
        self
    }

    pub(crate) fn validate(
        &self,
        mode: Mode,
    ) -> Result<WindowBits, StreamError> {
        let wbits = WindowBits::parse(self.window_bits, mode)?;
        if self.mem_level < 1 || self.mem_level > Self::MAX_MEM_LEVEL {
            debug!("rejected memory level {}", self.mem_level);
            return Err(StreamError::Configuration);
        }
        Ok(wbits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framing_by_sign_and_range() {
        let z = WindowBits::parse(15, Mode::Compress).unwrap();
        assert_eq!((z.framing(), z.bits()), (Framing::Zlib, 15));
        let r = WindowBits::parse(-12, Mode::Decompress).unwrap();
        assert_eq!((r.framing(), r.window_size()), (Framing::Raw, 4096));
        let g = WindowBits::parse(31, Mode::Compress).unwrap();
        assert_eq!((g.framing(), g.bits()), (Framing::Gzip, 15));
        let a = WindowBits::parse(47, Mode::Decompress).unwrap();
        assert_eq!(a.framing(), Framing::Auto);
    }

    #[test]
    fn rejects_out_of_range() {
        for &v in &[0, 7, 16, -7, -16, 23, 32, 48] {
            assert!(WindowBits::parse(v, Mode::Decompress).is_err(), "{}", v);
        }
        assert!(WindowBits::parse(47, Mode::Compress).is_err());
    }

    #[test]
    fn eight_bits_widened() {
        let bits = |v, mode| WindowBits::parse(v, mode).unwrap().bits();
        assert_eq!(bits(8, Mode::Compress), 9);
        assert_eq!(bits(-8, Mode::Compress), 9);
        assert_eq!(bits(24, Mode::Compress), 9);
        assert_eq!(bits(8, Mode::Decompress), 9);
        assert_eq!(bits(24, Mode::Decompress), 9);
        assert_eq!(bits(40, Mode::Decompress), 9);
        assert_eq!(bits(-8, Mode::Decompress), 8);
    }

    #[test]
    fn mem_level_checked() {
        let cfg = StreamConfig::new(15).mem_level(0);
        let err = cfg.validate(Mode::Compress);
        assert_eq!(err, Err(StreamError::Configuration));
        let cfg = StreamConfig::new(15).mem_level(9);
        assert!(cfg.validate(Mode::Compress).is_ok());
    }
}
