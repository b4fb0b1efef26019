#![crate_type = "lib"]
#![cfg_attr(not(feature = "std"), no_std)]

//! streamflate
//!
//! Resumable DEFLATE, zlib and gzip streams driven through caller-supplied
//! input and output slices of any size.
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(not(feature = "std"))] {
        extern crate alloc;
    }
}

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

mod adler32;
mod bitio;
mod cbuffer;
mod checksum;
mod crc32;
mod deflate;
mod gzip;
mod huffman;
mod lzss;
#[cfg(test)]
mod testdata;
mod zlib;

pub mod compress;
pub mod config;
pub mod decompress;
pub mod error;
pub mod flush;
pub mod params;
pub mod stream;

pub use crate::checksum::{adler32, crc32};
pub use crate::compress::{compress, compress2, compress_bound, Compress};
pub use crate::config::{Framing, StreamConfig, WindowBits};
pub use crate::decompress::{uncompress, uncompress2, Decompress};
pub use crate::error::{Corruption, StreamError};
pub use crate::flush::Flush;
pub use crate::params::{Level, Strategy};
pub use crate::stream::{
    Mode, Status, StreamResult, StreamSession, Termination,
};

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
