//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;
#[cfg(not(feature = "std"))]
use alloc::vec;
use core::ops::Index;

/// Fixed-capacity history; index `0` is the most recently pushed item.
#[derive(Clone, Hash, Debug)]
pub(crate) struct CircularBuffer<T> {
    data: Box<[T]>,
    pos: usize,
    is_first: bool,
}

impl<T: Default + Clone> CircularBuffer<T> {
    pub fn new(cap: usize) -> Self {
        Self {
            data: vec![T::default(); cap].into_boxed_slice(),
            pos: 0,
            is_first: true,
        }
    }
}

impl<T: Copy> CircularBuffer<T> {
    /// Push `data` in order; only the last `cap()` items are kept.
    pub fn append(&mut self, data: &[T]) {
        let cap = self.data.len();
        if cap == 0 {
            return;
        }
        let data = if data.len() > cap {
            &data[data.len() - cap..]
        } else {
            data
        };
        let head = cap - self.pos;
        if head > data.len() {
            self.data[self.pos..self.pos + data.len()].copy_from_slice(data);
            self.pos += data.len();
        } else {
            let (fst, snd) = data.split_at(head);
            self.data[self.pos..].copy_from_slice(fst);
            self.data[..snd.len()].copy_from_slice(snd);
            self.pos = snd.len();
            self.is_first = false;
        }
    }
}

impl<T> CircularBuffer<T> {
    #[inline]
    pub fn len(&self) -> usize {
        if self.is_first {
            self.pos
        } else {
            self.data.len()
        }
    }

    #[cfg(test)]
    pub fn cap(&self) -> usize {
        self.data.len()
    }

    pub fn clear(&mut self) {
        self.pos = 0;
        self.is_first = true;
    }

    #[inline]
    pub fn push(&mut self, data: T) {
        self.data[self.pos] = data;
        self.pos += 1;
        if self.pos >= self.data.len() {
            self.pos = 0;
            self.is_first = false;
        }
    }

    #[inline]
    fn inner_idx(&self, idx: usize) -> usize {
        debug_assert!(idx < self.len());
        if self.pos < idx + 1 {
            self.pos + self.data.len() - idx - 1
        } else {
            self.pos - idx - 1
        }
    }

    /// Items from oldest to newest.
    #[cfg(test)]
    pub fn iter_oldest(&self) -> impl core::iter::Iterator<Item = &T> {
        let len = self.len();
        (0..len).rev().map(move |i| &self[i])
    }
}

impl<T> Index<usize> for CircularBuffer<T> {
    type Output = T;

    #[inline]
    fn index(&self, idx: usize) -> &T {
        &self.data[self.inner_idx(idx)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(not(feature = "std"))]
    use alloc::vec::Vec;

    #[test]
    fn add() {
        let mut buf = CircularBuffer::new(16);
        for d in 0..17 {
            buf.push(d);
        }
        assert_eq!(buf.len(), 16);
        for d in 0..16 {
            assert_eq!(buf[d], 16 - d);
        }

        for d in 17..21 {
            buf.push(d);
        }
        for d in 0..16 {
            assert_eq!(buf[d], 20 - d);
        }
    }

    #[test]
    fn append() {
        let mut buf = CircularBuffer::new(16);
        buf.append(&(1..17).collect::<Vec<_>>());
        for d in 0..16 {
            assert_eq!(buf[d], 16 - d);
        }

        buf.append(&(17..21).collect::<Vec<_>>());
        for d in 0..16 {
            assert_eq!(buf[d], 20 - d);
        }

        buf.append(&(1..40).collect::<Vec<_>>());
        assert_eq!(
            buf.iter_oldest().cloned().collect::<Vec<_>>(),
            (24..40).collect::<Vec<_>>()
        );
    }

    #[test]
    fn append_empty_and_partial() {
        let mut buf = CircularBuffer::<u8>::new(8);
        buf.append(&[]);
        assert_eq!(buf.len(), 0);
        buf.append(b"abc");
        assert_eq!(buf.len(), 3);
        assert_eq!(buf[0], b'c');
        buf.append(b"defghijkl");
        assert_eq!(buf.len(), 8);
        assert_eq!(buf.cap(), 8);
        let oldest = buf.iter_oldest().cloned().collect::<Vec<_>>();
        assert_eq!(oldest, b"efghijkl".to_vec());
        buf.clear();
        assert_eq!(buf.len(), 0);
    }
}
