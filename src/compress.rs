//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use crate::config::StreamConfig;
use crate::deflate::encoder::deflate_bound;
use crate::error::StreamError;
use crate::flush::Flush;
use crate::params::{Level, Strategy};
use crate::stream::{Mode, Status, StreamResult, StreamSession};
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

pub trait Compress {
    fn total_in(&self) -> u64;
    fn total_out(&self) -> u64;
    fn compress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        flush: Flush,
    ) -> StreamResult;

    /// Append to `output`, using its spare capacity as the output window.
    fn compress_vec(
        &mut self,
        input: &[u8],
        output: &mut Vec<u8>,
        flush: Flush,
    ) -> StreamResult {
        let len = output.len();
        let cap = output.capacity();
        output.resize(cap, 0);
        let ret = self.compress(input, &mut output[len..], flush);
        output.truncate(len + ret.bytes_written);
        ret
    }
}

impl Compress for StreamSession {
    fn total_in(&self) -> u64 {
        StreamSession::total_in(self)
    }

    fn total_out(&self) -> u64 {
        StreamSession::total_out(self)
    }

    fn compress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        flush: Flush,
    ) -> StreamResult {
        if self.mode() != Mode::Compress {
            return StreamResult {
                bytes_consumed: 0,
                bytes_written: 0,
                status: Err(StreamError::Misuse),
            };
        }
        self.step(input, output, flush)
    }
}

/// Worst-case size of `compress` output for `source_len` bytes.
pub fn compress_bound(source_len: usize) -> usize {
    deflate_bound(source_len, StreamConfig::DEFAULT_MEM_LEVEL) + 6
}

/// Compress `source` into `dest` as one zlib stream at the default level.
/// Returns the compressed length.
pub fn compress(dest: &mut [u8], source: &[u8]) -> Result<usize, StreamError> {
    compress2(dest, source, Level::DEFAULT)
}

pub fn compress2(
    dest: &mut [u8],
    source: &[u8],
    level: Level,
) -> Result<usize, StreamError> {
    let mut s = StreamSession::compressor(15, level, Strategy::Default)?;
    let ret = s.step(source, dest, Flush::Finish);
    match ret.status? {
        Status::StreamEnd => Ok(ret.bytes_written),
        _ => {
            debug!(
                "{} byte destination too small for {} bytes",
                dest.len(),
                source.len()
            );
            Err(StreamError::InsufficientSpace)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decompress::uncompress;
    use crate::testdata;
    #[cfg(not(feature = "std"))]
    use alloc::vec;

    #[test]
    fn compress2_all_levels() {
        let source = vec![b'A'; 4096];
        for l in 1..10 {
            let mut dest = [0_u8; 128];
            let level = Level::new(l).unwrap();
            let len = compress2(&mut dest, &source, level).unwrap();
            assert!(len < dest.len());
            let mut back = vec![0; source.len()];
            assert_eq!(uncompress(&mut back, &dest[..len]), Ok(source.len()));
            assert_eq!(back, source);
        }
    }

    #[test]
    fn bound_is_enough() {
        let mut rng = testdata::rng(0x11);
        for &n in &[0, 1, 100, 65535, 65536, 300_000] {
            let source = testdata::random(&mut rng, n);
            let mut dest = vec![0; compress_bound(n)];
            let len = compress(&mut dest, &source).unwrap();
            assert!(len <= dest.len());
        }
    }

    #[test]
    fn too_small_destination() {
        let source = testdata::sequence(10_000);
        let mut dest = [0_u8; 16];
        let full = Err(StreamError::InsufficientSpace);
        assert_eq!(compress(&mut dest, &source), full);
        let mut dest = [];
        assert_eq!(compress(&mut dest, b""), full);
    }

    #[test]
    fn vec_output_grows_with_capacity() {
        let source = testdata::hello(20_000);
        let mut s =
            StreamSession::compressor(15, Level::DEFAULT, Strategy::Default)
                .unwrap();
        let mut out = Vec::with_capacity(16);
        let mut pos = 0;
        loop {
            let r = s.compress_vec(&source[pos..], &mut out, Flush::Finish);
            pos += r.bytes_consumed;
            if r.status == Ok(Status::StreamEnd) {
                break;
            }
            out.reserve(16);
        }
        assert_eq!(Compress::total_out(&s), out.len() as u64);
        assert_eq!(Compress::total_in(&s), source.len() as u64);
        let mut back = vec![0; source.len()];
        assert_eq!(uncompress(&mut back, &out), Ok(source.len()));
        assert_eq!(back, source);

        let mut d = StreamSession::decompressor(15).unwrap();
        let r = d.compress(&source, &mut back, Flush::None);
        assert_eq!(r.status, Err(StreamError::Misuse));
    }
}
