//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use core::mem::size_of;

/// Up to `size_of::<T>() * 8` bits, least significant bit first.
#[derive(Clone, Copy, Debug, Eq)]
pub(crate) struct SmallBitVec<T = u32> {
    data: T,
    len: usize,
}

impl<T, U> PartialEq<SmallBitVec<U>> for SmallBitVec<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &SmallBitVec<U>) -> bool {
        self.data == other.data && self.len == other.len
    }
}

impl<T> SmallBitVec<T> {
    pub fn new(data: T, len: usize) -> Self {
        debug_assert!(
            (size_of::<T>() * 8) >= len,
            "len is greater than bit capacity"
        );
        SmallBitVec { data, len }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T: Copy> SmallBitVec<T> {
    #[inline]
    pub fn data(&self) -> T {
        self.data
    }
}

pub(crate) trait SmallBitVecReverse {
    fn reverse(&self) -> Self;
}

impl SmallBitVecReverse for SmallBitVec<u16> {
    fn reverse(&self) -> Self {
        if self.len == 0 {
            return *self;
        }
        let mut x = self.data;
        x = (x & 0x5555) << 1 | (x & 0xAAAA) >> 1;
        x = (x & 0x3333) << 2 | (x & 0xCCCC) >> 2;
        x = (x & 0x0F0F) << 4 | (x & 0xF0F0) >> 4;
        x = x << 8 | x >> 8;
        x >>= 16 - self.len;
        Self::new(x, self.len)
    }
}

impl<T: Default> Default for SmallBitVec<T> {
    fn default() -> Self {
        SmallBitVec::<T>::new(T::default(), 0)
    }
}
