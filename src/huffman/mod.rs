//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

pub(crate) mod cano_huff_table;
pub(crate) mod decoder;
pub(crate) mod encoder;

use crate::bitio::small_bit_vec::SmallBitVec;
#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Longest code any DEFLATE alphabet allows.
pub(crate) const MAX_CODE_LEN: usize = 15;

/// Canonical codes (most significant bit first) for the given code
/// lengths. Symbols of length zero get `None`.
pub(crate) fn create_huffman_table(
    symb_len: &[u8],
) -> Vec<Option<SmallBitVec<u16>>> {
    let mut bl_count = [0_u32; MAX_CODE_LEN + 1];
    for &l in symb_len {
        bl_count[l as usize] += 1;
    }
    bl_count[0] = 0;

    let mut next_code = [0_u32; MAX_CODE_LEN + 1];
    let mut code = 0_u32;
    for bits in 1..=MAX_CODE_LEN {
        code = (code + bl_count[bits - 1]) << 1;
        next_code[bits] = code;
    }

    let mut table = vec![None; symb_len.len()];
    for (s, &l) in symb_len.iter().enumerate() {
        if l != 0 {
            let l = l as usize;
            table[s] = Some(SmallBitVec::new(next_code[l] as u16, l));
            next_code[l] += 1;
        }
    }
    table
}

/// Kraft-inequality verdict on a set of code lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Completeness {
    Complete,
    /// Unused code space remains; `codes` symbols are coded.
    Incomplete { codes: usize, max_len: usize },
    OverSubscribed,
}

pub(crate) fn completeness(symb_len: &[u8]) -> Completeness {
    let mut bl_count = [0_i32; MAX_CODE_LEN + 1];
    for &l in symb_len {
        if l as usize > MAX_CODE_LEN {
            return Completeness::OverSubscribed;
        }
        bl_count[l as usize] += 1;
    }
    let mut left = 1_i32;
    for &count in bl_count.iter().skip(1) {
        left <<= 1;
        left -= count;
        if left < 0 {
            return Completeness::OverSubscribed;
        }
    }
    if left == 0 {
        Completeness::Complete
    } else {
        Completeness::Incomplete {
            codes: symb_len.iter().filter(|&&l| l != 0).count(),
            max_len: symb_len.iter().cloned().max().unwrap_or(0) as usize,
        }
    }
}
