//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use core::hash::Hasher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Adler32 {
    a: u32,
    b: u32,
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Adler32 {
    /// Largest run of bytes whose sums cannot overflow a `u32`.
    const NMAX: usize = 5552;
    const MOD_ADLER: u32 = 0xFFF1;

    pub(crate) fn new() -> Adler32 {
        Self { a: 1, b: 0 }
    }

    pub(crate) fn value(&self) -> u32 {
        (self.b << 16) | self.a
    }
}

impl Hasher for Adler32 {
    fn write_u8(&mut self, byte: u8) {
        self.a = (self.a + u32::from(byte)) % Self::MOD_ADLER;
        self.b = (self.b + self.a) % Self::MOD_ADLER;
    }

    fn write(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(Self::NMAX) {
            for &byte in chunk {
                self.a += u32::from(byte);
                self.b += self.a;
            }
            self.a %= Self::MOD_ADLER;
            self.b %= Self::MOD_ADLER;
        }
    }

    fn finish(&self) -> u64 {
        u64::from(self.value())
    }
}
