//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

//! Input generators shared by the scenario tests.

use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(not(feature = "std"))]
use alloc::{format, vec};

pub(crate) fn rng(seed: u8) -> XorShiftRng {
    XorShiftRng::from_seed([
        0xDA, 0xE1, 0x4B, 0x0B, 0xFF, 0xC2, 0xFE, 0x64, 0x23, 0xFE, 0x3F, 0x51,
        0x6D, 0x3E, 0xA2, seed,
    ])
}

pub(crate) fn hello(len: usize) -> Vec<u8> {
    b"hello\n".iter().cycle().take(len).cloned().collect()
}

pub(crate) fn sequence(len: usize) -> Vec<u8> {
    let mut v = Vec::with_capacity(len + 8);
    let mut i = 0_u64;
    while v.len() < len {
        v.extend_from_slice(format!("{}\n", i).as_bytes());
        i += 1;
    }
    v.truncate(len);
    v
}

pub(crate) fn nulls(len: usize) -> Vec<u8> {
    vec![0; len]
}

pub(crate) fn zeros_ones(rng: &mut XorShiftRng, len: usize) -> Vec<u8> {
    (0..len)
        .map(|_| if rng.gen::<bool>() { b'1' } else { b'0' })
        .collect()
}

pub(crate) fn random(rng: &mut XorShiftRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen::<u8>()).collect()
}

/// Runs of every other generator, each up to 64 KiB long.
pub(crate) fn mixed(rng: &mut XorShiftRng, len: usize) -> Vec<u8> {
    let mut v = Vec::with_capacity(len);
    while v.len() < len {
        let n = rng.gen_range(1..=65536);
        let mut piece = match rng.gen_range(0..5) {
            0 => hello(n),
            1 => sequence(n),
            2 => nulls(n),
            3 => zeros_ones(rng, n),
            _ => random(rng, n),
        };
        v.append(&mut piece);
    }
    v.truncate(len);
    v
}
