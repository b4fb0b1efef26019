//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use crate::bitio::small_bit_vec::SmallBitVec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
use num_traits::sign::Unsigned;
use num_traits::ToPrimitive;

/// LSB-first bit packer. Complete bytes go straight to the sink; fewer
/// than eight bits are held back.
#[derive(Clone, Debug, Default)]
pub(crate) struct BitWriter {
    buf: u64,
    counter: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_bits<T>(&mut self, data: &SmallBitVec<T>, out: &mut Vec<u8>)
    where
        T: Copy + Unsigned + ToPrimitive,
    {
        if data.is_empty() {
            return;
        }
        debug_assert!(data.len() <= 32);
        let mask = (1_u64 << data.len()) - 1;
        let value = data.data().to_u64().unwrap_or(0) & mask;
        self.buf |= value << self.counter;
        self.counter += data.len();
        while self.counter >= 8 {
            out.push(self.buf as u8);
            self.buf >>= 8;
            self.counter -= 8;
        }
    }

    #[inline]
    pub fn write(&mut self, value: u32, len: usize, out: &mut Vec<u8>) {
        self.write_bits(&SmallBitVec::new(value, len), out)
    }

    /// Pad with zero bits up to the next byte boundary.
    pub fn align(&mut self, out: &mut Vec<u8>) {
        if self.counter > 0 {
            out.push(self.buf as u8);
            self.buf = 0;
            self.counter = 0;
        }
    }

    /// Bits written but not yet part of a complete byte.
    #[inline]
    pub fn pending_bits(&self) -> usize {
        self.counter
    }

    pub fn reset(&mut self) {
        self.buf = 0;
        self.counter = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lsb_first_packing() {
        let mut w = BitWriter::new();
        let mut out = Vec::new();
        w.write(1, 1, &mut out);
        w.write(1, 2, &mut out);
        assert!(out.is_empty());
        assert_eq!(w.pending_bits(), 3);
        w.write_bits(&SmallBitVec::<u16>::new(0, 7), &mut out);
        assert_eq!(out, vec![0x03]);
        w.align(&mut out);
        assert_eq!(out, vec![0x03, 0x00]);
        assert_eq!(w.pending_bits(), 0);
    }

    #[test]
    fn wide_values_masked() {
        let mut w = BitWriter::new();
        let mut out = Vec::new();
        w.write(0xFFFF_FFFF, 4, &mut out);
        w.write(0xABCD, 16, &mut out);
        w.align(&mut out);
        assert_eq!(out, vec![0xDF, 0xBC, 0x0A]);
    }
}
