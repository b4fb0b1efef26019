//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use crate::error::StreamError;

/// Borrowed input with a read position, valid for one step call.
pub(crate) struct InputCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> InputCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline]
    pub fn consumed(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    #[inline]
    pub fn next_byte(&mut self) -> Option<u8> {
        let b = self.data.get(self.pos).cloned();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.pos + n <= self.data.len());
        self.pos += n;
    }
}

/// LSB-first bit accumulator fed one byte at a time, so it never holds
/// more than seven bits beyond what the decoder asked for (plus any
/// primed bits).
#[derive(Clone, Debug, Default)]
pub(crate) struct BitReader {
    hold: u64,
    bits: u32,
}

impl BitReader {
    /// Bit priming accepts at most this many bits per call.
    pub const MAX_PRIME_BITS: u32 = 16;
    const MAX_HOLD_BITS: u32 = 32;

    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn hold(&self) -> u64 {
        self.hold
    }

    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Pull one byte from `input` into the hold.
    #[inline]
    pub fn pull(&mut self, input: &mut InputCursor) -> bool {
        match input.next_byte() {
            Some(b) => {
                self.hold |= u64::from(b) << self.bits;
                self.bits += 8;
                true
            }
            None => false,
        }
    }

    /// Make at least `n` bits available. `false` means input ran out; the
    /// bits pulled so far stay in the hold.
    #[inline]
    pub fn need(&mut self, input: &mut InputCursor, n: u32) -> bool {
        while self.bits < n {
            if !self.pull(input) {
                return false;
            }
        }
        true
    }

    #[inline]
    pub fn peek(&self, n: u32) -> u32 {
        debug_assert!(n <= self.bits && n <= 32);
        (self.hold & ((1_u64 << n) - 1)) as u32
    }

    #[inline]
    pub fn consume(&mut self, n: u32) {
        debug_assert!(n <= self.bits);
        self.hold >>= n;
        self.bits -= n;
    }

    #[inline]
    pub fn read(&mut self, n: u32) -> u32 {
        let v = self.peek(n);
        self.consume(n);
        v
    }

    /// Discard bits up to the next byte boundary of the input.
    pub fn align(&mut self) {
        let n = self.bits & 7;
        self.consume(n);
    }

    /// Take a whole byte out of the hold when one is buffered.
    #[inline]
    pub fn take_byte(&mut self) -> Option<u8> {
        if self.bits >= 8 {
            Some(self.read(8) as u8)
        } else {
            None
        }
    }

    /// Insert `bits` bits of `value` ahead of any input still to come.
    pub fn prime(&mut self, bits: u32, value: u32) -> Result<(), StreamError> {
        if bits == 0 {
            return Ok(());
        }
        if bits > Self::MAX_PRIME_BITS
            || self.bits + bits > Self::MAX_HOLD_BITS
        {
            debug!("cannot prime {} bits over {} held", bits, self.bits);
            return Err(StreamError::Misuse);
        }
        let value = u64::from(value) & ((1_u64 << bits) - 1);
        self.hold |= value << self.bits;
        self.bits += bits;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.hold = 0;
        self.bits = 0;
    }
}
