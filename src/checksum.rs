//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use crate::adler32::Adler32;
use crate::config::Framing;
use crate::crc32::Crc32;
use core::hash::Hasher;

/// Running integrity check of the uncompressed data, chosen by framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Checksum {
    None,
    Adler(Adler32),
    /// CRC-32 plus the uncompressed length modulo 2^32.
    Crc(Crc32, u32),
}

impl Checksum {
    /// Fresh check for `framing`. Automatic framing starts without one
    /// until the header is seen.
    pub(crate) fn new(framing: Framing) -> Self {
        match framing {
            Framing::Zlib => Checksum::Adler(Adler32::new()),
            Framing::Gzip => Checksum::Crc(Crc32::new(), 0),
            Framing::Raw | Framing::Auto => Checksum::None,
        }
    }

    pub(crate) fn update(&mut self, data: &[u8]) {
        match *self {
            Checksum::None => {}
            Checksum::Adler(ref mut a) => a.write(data),
            Checksum::Crc(ref mut c, ref mut len) => {
                c.write(data);
                *len = len.wrapping_add(data.len() as u32);
            }
        }
    }

    pub(crate) fn value(&self) -> u32 {
        match *self {
            Checksum::None => 0,
            Checksum::Adler(ref a) => a.value(),
            Checksum::Crc(ref c, _) => c.value(),
        }
    }

    pub(crate) fn length(&self) -> u32 {
        match *self {
            Checksum::Crc(_, len) => len,
            _ => 0,
        }
    }
}

/// Adler-32 of `data`.
pub fn adler32(data: &[u8]) -> u32 {
    let mut a = Adler32::new();
    a.write(data);
    a.value()
}

/// CRC-32 (IEEE, reflected) of `data`.
pub fn crc32(data: &[u8]) -> u32 {
    let mut c = Crc32::new();
    c.write(data);
    c.value()
}
