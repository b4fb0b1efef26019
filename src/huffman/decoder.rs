//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use crate::bitio::small_bit_vec::{SmallBitVec, SmallBitVecReverse};
use crate::huffman::create_huffman_table;
#[cfg(not(feature = "std"))]
use alloc::boxed::Box;
#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
use core::cmp;

/// Outcome of decoding against the bits currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decoded {
    /// Symbol and the number of bits its code used.
    Symbol(u16, u32),
    /// The held bits are a prefix of a longer code.
    NeedMore,
    /// No code starts with the held bits.
    Invalid,
}

#[derive(Clone, Debug)]
pub(crate) struct HuffmanDecoder {
    stab_bits: usize,
    stab: Vec<SymbolTableItem>,
}

#[derive(Clone, Debug, PartialEq)]
enum HuffmanLeaf {
    Leaf(u16),
    Branch(Box<HuffmanLeaf>, Box<HuffmanLeaf>),
    None,
}

impl HuffmanLeaf {
    /// `code` holds the remaining bits, first bit in bit zero.
    fn add(&mut self, code: &SmallBitVec<u16>, value: u16) -> Option<()> {
        if code.is_empty() {
            if *self != HuffmanLeaf::None {
                return None;
            }
            *self = HuffmanLeaf::Leaf(value);
            return Some(());
        }
        if let HuffmanLeaf::None = *self {
            *self = HuffmanLeaf::Branch(
                Box::new(HuffmanLeaf::None),
                Box::new(HuffmanLeaf::None),
            );
        }
        match *self {
            HuffmanLeaf::Branch(ref mut lft, ref mut rgt) => {
                let next = SmallBitVec::new(code.data() >> 1, code.len() - 1);
                if code.data() & 1 == 0 {
                    lft.add(&next, value)
                } else {
                    rgt.add(&next, value)
                }
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
enum SymbolTableItem {
    Short(u16, u8),
    Long(HuffmanLeaf),
    None,
}

impl HuffmanDecoder {
    /// `None` when two codes collide, which only happens for lengths that
    /// over-subscribe the code space.
    pub fn new(symb_len: &[u8], stab_bits: usize) -> Option<Self> {
        let max_len = symb_len.iter().cloned().max().unwrap_or(0) as usize;
        let stab_bits = cmp::min(max_len, stab_bits);

        let huff_tab = create_huffman_table(symb_len);
        let mut stab = vec![SymbolTableItem::None; 1 << stab_bits];
        for (i, h) in huff_tab.into_iter().enumerate() {
            let b = match h {
                Some(b) => b.reverse(),
                None => continue,
            };
            let sym = i as u16;
            if stab_bits >= b.len() {
                let ld = stab_bits - b.len();
                let head = b.data() as usize;
                for j in 0..(1 << ld) {
                    let slot = &mut stab[head | (j << b.len())];
                    if let SymbolTableItem::None = *slot {
                        *slot = SymbolTableItem::Short(sym, b.len() as u8);
                    } else {
                        return None;
                    }
                }
            } else {
                let head = (b.data() as usize) & ((1 << stab_bits) - 1);
                let body = SmallBitVec::new(
                    b.data() >> stab_bits,
                    b.len() - stab_bits,
                );
                match stab[head] {
                    SymbolTableItem::Short(_, _) => return None,
                    SymbolTableItem::Long(ref mut store) => {
                        store.add(&body, sym)?;
                    }
                    ref mut d => {
                        let mut l = HuffmanLeaf::None;
                        l.add(&body, sym)?;
                        *d = SymbolTableItem::Long(l);
                    }
                }
            }
        }
        Some(Self { stab_bits, stab })
    }

    /// Decode the next symbol from `hold`, of which the low `bits` bits are
    /// valid and the rest zero.
    pub fn decode(&self, hold: u64, bits: u32) -> Decoded {
        let stab_bits = self.stab_bits as u32;
        let idx = (hold as usize) & ((1 << self.stab_bits) - 1);
        match self.stab[idx] {
            SymbolTableItem::Short(v, l) => {
                if u32::from(l) <= bits {
                    Decoded::Symbol(v, u32::from(l))
                } else {
                    Decoded::NeedMore
                }
            }
            SymbolTableItem::Long(ref leaf) => {
                if bits < stab_bits {
                    return Decoded::NeedMore;
                }
                let mut used = stab_bits;
                let mut node = leaf;
                loop {
                    match *node {
                        HuffmanLeaf::Leaf(v) => {
                            return Decoded::Symbol(v, used)
                        }
                        HuffmanLeaf::Branch(ref lft, ref rgt) => {
                            if used >= bits {
                                return Decoded::NeedMore;
                            }
                            node = if (hold >> used) & 1 == 0 {
                                lft
                            } else {
                                rgt
                            };
                            used += 1;
                        }
                        HuffmanLeaf::None => return Decoded::Invalid,
                    }
                }
            }
            SymbolTableItem::None => {
                if bits >= stab_bits {
                    Decoded::Invalid
                } else {
                    Decoded::NeedMore
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hold_asks_for_more() {
        // a=0, b=10, c=11
        let dec = HuffmanDecoder::new(&[1, 2, 2], 9).unwrap();
        assert_eq!(dec.decode(0, 0), Decoded::NeedMore);
        assert_eq!(dec.decode(0b0, 1), Decoded::Symbol(0, 1));
        assert_eq!(dec.decode(0b1, 1), Decoded::NeedMore);
        assert_eq!(dec.decode(0b01, 2), Decoded::Symbol(1, 2));
        assert_eq!(dec.decode(0b11, 2), Decoded::Symbol(2, 2));
    }

    #[test]
    fn incomplete_code_rejects_unused_prefix() {
        let dec = HuffmanDecoder::new(&[0, 1], 9).unwrap();
        assert_eq!(dec.decode(0b0, 1), Decoded::Symbol(1, 1));
        assert_eq!(dec.decode(0b1, 1), Decoded::Invalid);
    }

    #[test]
    fn empty_code_is_invalid() {
        let dec = HuffmanDecoder::new(&[0, 0, 0], 9).unwrap();
        assert_eq!(dec.decode(0, 0), Decoded::Invalid);
    }

    #[test]
    fn oversubscribed_collides() {
        assert!(HuffmanDecoder::new(&[1, 1, 1], 9).is_none());
        assert!(HuffmanDecoder::new(&[1, 1, 1], 0).is_none());
    }
}
