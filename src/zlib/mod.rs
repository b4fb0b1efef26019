//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use crate::error::Corruption;
use crate::params::{Level, Strategy};
#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

const METHOD_DEFLATE: u8 = 8;
const FDICT: u8 = 0x20;

/// What the two leading bytes of a zlib stream announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ZlibHeader {
    pub window_bits: u8,
    pub has_dict: bool,
}

fn level_flags(level: Level, strategy: Strategy) -> u8 {
    match strategy {
        Strategy::HuffmanOnly | Strategy::Rle | Strategy::Fixed => 0,
        _ => match level.get() {
            0 | 1 => 0,
            2..=5 => 1,
            6 => 2,
            _ => 3,
        },
    }
}

/// CMF, FLG and, when a dictionary is in use, its big-endian id.
pub(crate) fn header(
    window_bits: u8,
    level: Level,
    strategy: Strategy,
    dict_id: Option<u32>,
) -> Vec<u8> {
    let cmf = METHOD_DEFLATE | ((window_bits - 8) << 4);
    let mut flg = level_flags(level, strategy) << 6;
    if dict_id.is_some() {
        flg |= FDICT;
    }
    let check = (u16::from(cmf) << 8) | u16::from(flg);
    flg += (31 - check % 31) as u8 % 31;

    let mut ret = vec![cmf, flg];
    if let Some(id) = dict_id {
        ret.extend_from_slice(&id.to_be_bytes());
    }
    ret
}

/// Validate CMF/FLG. `max_bits` is the window the decoder was configured
/// with.
pub(crate) fn parse_header(
    cmf: u8,
    flg: u8,
    max_bits: u8,
) -> Result<ZlibHeader, Corruption> {
    if ((u16::from(cmf) << 8) | u16::from(flg)) % 31 != 0 {
        debug!("zlib header check failed: {:02x} {:02x}", cmf, flg);
        return Err(Corruption::HeaderCheck);
    }
    if cmf & 0x0F != METHOD_DEFLATE {
        debug!("zlib method {} is not deflate", cmf & 0x0F);
        return Err(Corruption::UnknownMethod);
    }
    let window_bits = (cmf >> 4) + 8;
    if window_bits > max_bits {
        debug!("zlib window of {} bits exceeds {}", window_bits, max_bits);
        return Err(Corruption::WindowSize);
    }
    Ok(ZlibHeader {
        window_bits,
        has_dict: flg & FDICT != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_header() {
        assert_eq!(
            header(15, Level::DEFAULT, Strategy::Default, None),
            vec![0x78, 0x9C]
        );
        let fast = header(15, Level::FAST, Strategy::Default, None);
        assert_eq!(fast, vec![0x78, 0x01]);
        let best = header(15, Level::BEST, Strategy::Default, None);
        assert_eq!(best, vec![0x78, 0xDA]);
        assert_eq!(
            header(15, Level::BEST, Strategy::HuffmanOnly, None),
            vec![0x78, 0x01]
        );
    }

    #[test]
    fn dictionary_header() {
        let id = Some(0x0102_0304);
        let h = header(15, Level::DEFAULT, Strategy::Default, id);
        assert_eq!(h, vec![0x78, 0xBB, 1, 2, 3, 4]);
        let parsed = parse_header(h[0], h[1], 15).unwrap();
        assert!(parsed.has_dict);
    }

    #[test]
    fn header_checks() {
        assert_eq!(
            parse_header(0x78, 0x9C, 15),
            Ok(ZlibHeader {
                window_bits: 15,
                has_dict: false
            })
        );
        let check = parse_header(0x78, 0x9D, 15);
        assert_eq!(check, Err(Corruption::HeaderCheck));
        let window = parse_header(0x78, 0x9C, 14);
        assert_eq!(window, Err(Corruption::WindowSize));
        // method 7 with a valid check
        let method = parse_header(0x77, 0x85, 15);
        assert_eq!(method, Err(Corruption::UnknownMethod));
    }

    #[test]
    fn every_header_validates() {
        for bits in 9..=15 {
            for level in 0..10 {
                let l = Level::new(level).unwrap();
                let h = header(bits, l, Strategy::Default, None);
                assert!(parse_header(h[0], h[1], 15).is_ok());
            }
        }
    }

    #[test]
    fn small_windows_under_nine_bits() {
        let h = header(9, Level::DEFAULT, Strategy::Default, None);
        assert_eq!(h[0], 0x18);
        assert!(parse_header(h[0], h[1], 9).is_ok());
        // CINFO 0, a 256-byte window
        assert!(parse_header(0x08, 0x1D, 9).is_ok());
        let h = header(10, Level::DEFAULT, Strategy::Default, None);
        let window = parse_header(h[0], h[1], 9);
        assert_eq!(window, Err(Corruption::WindowSize));
    }
}
