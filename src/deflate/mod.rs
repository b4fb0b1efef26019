//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

pub(crate) mod decoder;
pub(crate) mod encoder;

use crate::bitio::small_bit_vec::SmallBitVec;
#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
use core::u16;

pub(crate) const END_OF_BLOCK: u16 = 256;
/// Literal/length symbols a block may use.
pub(crate) const LITLEN_CODES: usize = 286;
pub(crate) const DIST_CODES: usize = 30;
pub(crate) const CODELEN_CODES: usize = 19;
pub(crate) const MAX_STORED: usize = 0xFFFF;

/// Transmission order of the code length code lengths.
pub(crate) const CODELEN_ORDER: [usize; CODELEN_CODES] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockType {
    Stored,
    Fixed,
    Dynamic,
}

impl BlockType {
    pub(crate) fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0 => Some(BlockType::Stored),
            1 => Some(BlockType::Fixed),
            2 => Some(BlockType::Dynamic),
            _ => None,
        }
    }

    pub(crate) fn bits(self) -> u32 {
        match self {
            BlockType::Stored => 0,
            BlockType::Fixed => 1,
            BlockType::Dynamic => 2,
        }
    }
}

/// Code lengths of the fixed literal/length code, all 288 symbols.
fn fix_symbol_table() -> Vec<u8> {
    let mut r = vec![8; 144];
    r.append(&mut vec![9; 112]);
    r.append(&mut vec![7; 24]);
    r.append(&mut vec![8; 8]);
    r
}

/// Code lengths of the fixed distance code, including the two unused
/// codes.
fn fix_offset_table() -> Vec<u8> {
    vec![5; 32]
}

/// Maps lengths (minus three) or distances (minus one) to their symbol and
/// extra bits.
#[derive(Debug)]
pub(crate) struct CodeTable {
    codes: Vec<u8>,
    offsets: Vec<u16>,
    ext_bits: Vec<u8>,
}

impl CodeTable {
    pub(crate) fn convert(&self, value: u16) -> (u8, SmallBitVec<u16>) {
        let pos = self.codes[value as usize];
        (
            pos,
            SmallBitVec::new(
                value - self.offsets[pos as usize],
                self.ext_bits(pos as usize),
            ),
        )
    }

    #[inline]
    pub(crate) fn code(&self, value: usize) -> usize {
        self.codes[value] as usize
    }

    #[inline]
    pub(crate) fn ext_bits(&self, pos: usize) -> usize {
        self.ext_bits[pos] as usize
    }

    #[inline]
    pub(crate) fn convert_back(&self, pos: usize, ext: u16) -> u16 {
        self.offsets[pos] + ext
    }
}

fn gen_codes(len: usize, offsets: &[u16]) -> Vec<u8> {
    let mut codes = Vec::with_capacity(len);
    let mut j = 0;
    for i in 0..len {
        while usize::from(offsets[j + 1]) <= i {
            j += 1;
        }
        codes.push(j as u8);
    }
    codes
}

fn gen_len_tab() -> CodeTable {
    let mut offsets = Vec::with_capacity(30);
    let mut ext_bits = Vec::with_capacity(29);
    for i in 0..8 {
        offsets.push(i);
        ext_bits.push(0);
    }

    for i in 8..28 {
        let n = (i >> 2) - 1;
        offsets.push(u16::from(i & 3 | 4) << n);
        ext_bits.push(n);
    }

    // 258 has a code of its own
    offsets.push(255);
    ext_bits.push(0);

    offsets.push(u16::MAX);

    let codes = gen_codes(256, &offsets);

    CodeTable {
        codes,
        offsets,
        ext_bits,
    }
}

fn gen_off_tab() -> CodeTable {
    let mut offsets = Vec::with_capacity(31);
    let mut ext_bits = Vec::with_capacity(30);
    for i in 0..4 {
        offsets.push(i);
        ext_bits.push(0);
    }

    for i in 4..30 {
        let n = (i >> 1) - 1;
        offsets.push(u16::from(i & 1 | 2) << n);
        ext_bits.push(n);
    }

    offsets.push(u16::MAX);

    let codes = gen_codes(0x8000, &offsets);

    CodeTable {
        codes,
        offsets,
        ext_bits,
    }
}

lazy_static! {
    pub(crate) static ref LEN_TAB: CodeTable = gen_len_tab();
    pub(crate) static ref OFF_TAB: CodeTable = gen_off_tab();
    pub(crate) static ref FIXED_LITLEN_LENS: Vec<u8> = fix_symbol_table();
    pub(crate) static ref FIXED_DIST_LENS: Vec<u8> = fix_offset_table();
}
