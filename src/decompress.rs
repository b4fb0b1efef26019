//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use crate::error::{Corruption, StreamError};
use crate::flush::Flush;
use crate::stream::{Mode, Status, StreamResult, StreamSession};
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

pub trait Decompress {
    fn total_in(&self) -> u64;
    fn total_out(&self) -> u64;
    fn decompress(&mut self, input: &[u8], output: &mut [u8]) -> StreamResult;

    /// Append to `output`, using its spare capacity as the output window.
    fn decompress_vec(
        &mut self,
        input: &[u8],
        output: &mut Vec<u8>,
    ) -> StreamResult {
        let len = output.len();
        let cap = output.capacity();
        output.resize(cap, 0);
        let ret = self.decompress(input, &mut output[len..]);
        output.truncate(len + ret.bytes_written);
        ret
    }
}

impl Decompress for StreamSession {
    fn total_in(&self) -> u64 {
        StreamSession::total_in(self)
    }

    fn total_out(&self) -> u64 {
        StreamSession::total_out(self)
    }

    fn decompress(&mut self, input: &[u8], output: &mut [u8]) -> StreamResult {
        if self.mode() != Mode::Decompress {
            return StreamResult {
                bytes_consumed: 0,
                bytes_written: 0,
                status: Err(StreamError::Misuse),
            };
        }
        self.step(input, output, Flush::None)
    }
}

/// Decompress the zlib stream in `source` into `dest`. Returns the
/// decompressed length.
pub fn uncompress(
    dest: &mut [u8],
    source: &[u8],
) -> Result<usize, StreamError> {
    uncompress2(dest, source).map(|(written, _)| written)
}

/// Like `uncompress`, also returning how much of `source` the stream
/// occupied.
pub fn uncompress2(
    dest: &mut [u8],
    source: &[u8],
) -> Result<(usize, usize), StreamError> {
    let mut s = StreamSession::decompressor(15)?;
    let ret = s.step(source, dest, Flush::Finish);
    match ret.status? {
        Status::StreamEnd => Ok((ret.bytes_written, ret.bytes_consumed)),
        // no way to hand over a dictionary here
        Status::NeedDict => Err(StreamError::DictionaryMismatch),
        _ if ret.bytes_written == dest.len() => {
            Err(StreamError::InsufficientSpace)
        }
        _ => Err(StreamError::Corrupt(Corruption::Truncated)),
    }
}
