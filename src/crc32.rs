//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use core::hash::Hasher;

lazy_static! {
    static ref IEEE_REVERSE_TABLE: [u32; 256] = {
        make_table_reverse(0xEDB8_8320)
    };
}

fn make_table_reverse(poly: u32) -> [u32; 256] {
    let mut table = [0u32; 256];
    for (i, item) in table.iter_mut().enumerate() {
        let mut value = i as u32;
        for _ in 0..8 {
            value = if (value & 1) == 1 {
                (value >> 1) ^ poly
            } else {
                value >> 1
            }
        }
        *item = value;
    }
    table
}

/// Reflected IEEE CRC-32 as used by the gzip trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Crc32 {
    value: u32,
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32 {
    pub(crate) fn new() -> Self {
        Self { value: 0xFFFF_FFFF }
    }

    pub(crate) fn value(&self) -> u32 {
        !self.value
    }
}

impl Hasher for Crc32 {
    fn finish(&self) -> u64 {
        u64::from(self.value())
    }

    fn write(&mut self, bytes: &[u8]) {
        let table = &*IEEE_REVERSE_TABLE;
        let mut value = self.value;
        for &b in bytes {
            value = table[((value as u8) ^ b) as usize] ^ (value >> 8);
        }
        self.value = value;
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.value = IEEE_REVERSE_TABLE[((self.value as u8) ^ i) as usize]
            ^ (self.value >> 8);
    }
}
