//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use crate::crc32::Crc32;
use crate::error::Corruption;
use crate::params::{Level, Strategy};
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
use core::hash::Hasher;

pub(crate) const MAGIC: [u8; 2] = [0x1F, 0x8B];
const METHOD_DEFLATE: u8 = 8;
const OS_UNKNOWN: u8 = 0xFF;
const HEADER_LEN: usize = 10;

const FHCRC: u8 = 0b10;
const FEXTRA: u8 = 0b100;
const FNAME: u8 = 0b1000;
const FCOMMENT: u8 = 0b1_0000;
const FRESERVED: u8 = 0b1110_0000;

/// Fixed ten-byte header: no name, no timestamp.
pub(crate) fn header(level: Level, strategy: Strategy) -> [u8; HEADER_LEN] {
    let xfl = if level == Level::BEST {
        2
    } else if level.get() < 2 {
        4
    } else {
        match strategy {
            Strategy::HuffmanOnly | Strategy::Rle | Strategy::Fixed => 4,
            _ => 0,
        }
    };
    [
        MAGIC[0],
        MAGIC[1],
        METHOD_DEFLATE,
        0,
        0,
        0,
        0,
        0,
        xfl,
        OS_UNKNOWN,
    ]
}

/// Collects a gzip header one byte at a time.
#[derive(Clone, Debug)]
pub(crate) struct HeaderParser {
    header: Vec<u8>,
    needlen: usize,
}

impl Default for HeaderParser {
    fn default() -> Self {
        Self {
            header: Vec::with_capacity(HEADER_LEN),
            needlen: HEADER_LEN,
        }
    }
}

impl HeaderParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept the next header byte. `Ok(true)` once the header is complete
    /// and valid.
    pub fn push(&mut self, byte: u8) -> Result<bool, Corruption> {
        self.header.push(byte);
        match self.header.len() {
            2 if self.header[..2] != MAGIC => {
                debug!("gzip magic mismatch: {:02x?}", &self.header[..2]);
                return Err(Corruption::GzipMagic);
            }
            3 if self.header[2] != METHOD_DEFLATE => {
                debug!("gzip method {} is not deflate", self.header[2]);
                return Err(Corruption::UnknownMethod);
            }
            4 if self.header[3] & FRESERVED != 0 => {
                debug!("gzip reserved flags {:08b}", self.header[3]);
                return Err(Corruption::GzipFlags);
            }
            _ => {}
        }
        if self.header.len() < self.needlen {
            return Ok(false);
        }
        self.check()
    }

    fn check(&mut self) -> Result<bool, Corruption> {
        let flg = self.header[3];

        let xlen = if flg & FEXTRA != 0 {
            if self.header.len() < HEADER_LEN + 2 {
                self.needlen = HEADER_LEN + 2;
                return Ok(false);
            }
            usize::from(self.header[HEADER_LEN])
                | (usize::from(self.header[HEADER_LEN + 1]) << 8)
        } else {
            0
        };
        let extra = if flg & FEXTRA != 0 { xlen + 2 } else { 0 };
        let mut last = HEADER_LEN + extra;
        if self.header.len() < last {
            self.needlen = last;
            return Ok(false);
        }

        for &flag in &[FNAME, FCOMMENT] {
            if flg & flag != 0 {
                match self.header[last..].iter().position(|&b| b == 0) {
                    Some(p) => last += p + 1,
                    None => {
                        self.needlen = self.header.len() + 1;
                        return Ok(false);
                    }
                }
            }
        }

        if flg & FHCRC != 0 {
            if self.header.len() < last + 2 {
                self.needlen = last + 2;
                return Ok(false);
            }
            let hcrc = u16::from(self.header[last])
                | (u16::from(self.header[last + 1]) << 8);
            let mut crc = Crc32::new();
            crc.write(&self.header[..last]);
            if hcrc != crc.value() as u16 {
                debug!("gzip header crc mismatch");
                return Err(Corruption::HeaderCrc);
            }
        }
        trace!("gzip header of {} bytes", self.header.len());
        Ok(true)
    }
}
