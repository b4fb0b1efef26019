//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use crate::bitio::small_bit_vec::{SmallBitVec, SmallBitVecReverse};
use crate::huffman::create_huffman_table;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Codes ready for an LSB-first writer, indexed by symbol.
#[derive(Clone, Debug)]
pub(crate) struct HuffmanEncoder {
    bit_vec_tab: Vec<SmallBitVec<u16>>,
}

impl HuffmanEncoder {
    pub fn new(symb_len: &[u8]) -> Self {
        Self {
            bit_vec_tab: create_huffman_table(symb_len)
                .into_iter()
                .map(|b| b.map(|b| b.reverse()).unwrap_or_default())
                .collect(),
        }
    }

    /// The code of `data`; empty when the symbol has no code.
    #[inline]
    pub fn enc(&self, data: u16) -> &SmallBitVec<u16> {
        &self.bit_vec_tab[data as usize]
    }
}
