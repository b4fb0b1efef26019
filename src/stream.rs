//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use crate::bitio::reader::InputCursor;
use crate::config::{Framing, StreamConfig, WindowBits};
use crate::deflate::decoder::{Halt, Inflater};
use crate::deflate::encoder::{deflate_bound, Deflater};
use crate::error::StreamError;
use crate::flush::Flush;
use crate::params::{Level, Strategy};
#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

/// Direction of a session, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Compress,
    Decompress,
}

/// Non-error outcome of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Progress was made; call again with fresh buffers.
    Ok,
    /// The stream is complete.
    StreamEnd,
    /// Decompression waits for `set_dictionary`.
    NeedDict,
    /// Decompression stopped in front of a block header (`Flush::Block`).
    BlockBoundary,
    /// No progress was possible with the buffers supplied. Retrying with
    /// more input or output space recovers.
    BufError,
}

/// Byte counts of one call and its outcome. The counts are valid even when
/// `status` is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamResult {
    pub bytes_consumed: usize,
    pub bytes_written: usize,
    pub status: Result<Status, StreamError>,
}

impl StreamResult {
    fn new(
        bytes_consumed: usize,
        bytes_written: usize,
        status: Result<Status, StreamError>,
    ) -> Self {
        Self {
            bytes_consumed,
            bytes_written,
            status,
        }
    }

    fn refused(e: StreamError) -> Self {
        Self::new(0, 0, Err(e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Active,
    /// Finished, or torn down by `end`.
    Ended,
    /// A fatal error; every call reports it again until `reset`.
    Error(StreamError),
}

#[derive(Clone, Debug)]
enum Engine {
    Deflate(Box<Deflater>),
    Inflate(Box<Inflater>),
    Released,
}

/// A compression or decompression stream driven by caller-supplied
/// buffers.
///
/// Every call works with whatever input and output space it is given and
/// keeps the rest of its state (history window, undelivered output) inside
/// the session, so a stream can be fed in pieces of any size, down to a
/// single byte of output per call.
#[derive(Clone, Debug)]
pub struct StreamSession {
    mode: Mode,
    config: StreamConfig,
    window_bits: WindowBits,
    engine: Engine,
    total_in: u64,
    total_out: u64,
    termination: Termination,
}

impl StreamSession {
    pub fn new(
        mode: Mode,
        config: &StreamConfig,
    ) -> Result<Self, StreamError> {
        let window_bits = config.validate(mode)?;
        let engine = Self::engine(mode, window_bits, config);
        debug!("new {:?} session: {:?}", mode, config);
        Ok(Self {
            mode,
            config: *config,
            window_bits,
            engine,
            total_in: 0,
            total_out: 0,
            termination: Termination::Active,
        })
    }

    pub fn compressor(
        window_bits: i32,
        level: Level,
        strategy: Strategy,
    ) -> Result<Self, StreamError> {
        let config = StreamConfig::new(window_bits)
            .level(level)
            .strategy(strategy);
        Self::new(Mode::Compress, &config)
    }

    pub fn decompressor(window_bits: i32) -> Result<Self, StreamError> {
        Self::new(Mode::Decompress, &StreamConfig::new(window_bits))
    }

    fn engine(
        mode: Mode,
        window_bits: WindowBits,
        config: &StreamConfig,
    ) -> Engine {
        match mode {
            Mode::Compress => Engine::Deflate(Box::new(Deflater::new(
                window_bits,
                config.mem_level,
                config.level,
                config.strategy,
            ))),
            Mode::Decompress => {
                Engine::Inflate(Box::new(Inflater::new(window_bits)))
            }
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    pub fn total_out(&self) -> u64 {
        self.total_out
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn framing(&self) -> Framing {
        self.window_bits.framing()
    }

    pub fn level(&self) -> Level {
        match self.engine {
            Engine::Deflate(ref d) => d.level(),
            _ => self.config.level,
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self.engine {
            Engine::Deflate(ref d) => d.strategy(),
            _ => self.config.strategy,
        }
    }

    fn check_active(&self) -> Result<(), StreamError> {
        match self.termination {
            Termination::Active => Ok(()),
            Termination::Ended => Err(StreamError::Misuse),
            Termination::Error(e) => Err(e),
        }
    }

    fn account(&mut self, consumed: usize, written: usize) {
        self.total_in += consumed as u64;
        self.total_out += written as u64;
    }

    fn fail(&mut self, e: StreamError) -> StreamError {
        if e.is_fatal() {
            self.termination = Termination::Error(e);
        }
        e
    }

    /// Consume from `input` and produce into `output` as far as both allow,
    /// honouring `flush`.
    pub fn step(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        flush: Flush,
    ) -> StreamResult {
        if let Err(e) = self.check_active() {
            return StreamResult::refused(e);
        }
        let (consumed, written, status) = match self.engine {
            Engine::Deflate(ref mut d) => {
                match d.deflate(input, output, flush) {
                    Ok((c, w)) => {
                        let status = if d.is_finished() {
                            Status::StreamEnd
                        } else if c == 0 && w == 0 {
                            Status::BufError
                        } else {
                            Status::Ok
                        };
                        (c, w, Ok(status))
                    }
                    Err(e) => (0, 0, Err(e)),
                }
            }
            Engine::Inflate(ref mut i) => {
                let mut cursor = InputCursor::new(input);
                let (w, halt) = i.inflate(&mut cursor, output, flush);
                let c = cursor.consumed();
                let stalled = (c == 0 && w == 0) || flush == Flush::Finish;
                let status = halt.map(|h| match h {
                    Halt::End => Status::StreamEnd,
                    Halt::NeedDict => Status::NeedDict,
                    Halt::BlockBoundary => Status::BlockBoundary,
                    Halt::Starved if stalled => Status::BufError,
                    Halt::Starved => Status::Ok,
                });
                (c, w, status)
            }
            Engine::Released => (0, 0, Err(StreamError::Misuse)),
        };
        self.account(consumed, written);
        let status = match status {
            Ok(Status::StreamEnd) => {
                self.termination = Termination::Ended;
                Ok(Status::StreamEnd)
            }
            Ok(s) => Ok(s),
            Err(e) => Err(self.fail(e)),
        };
        StreamResult::new(consumed, written, status)
    }

    /// Switch compression level and strategy mid-stream.
    ///
    /// When data buffered under the old settings has to be closed off in a
    /// block of its own, this compresses from `input` into `output` first.
    /// If that cannot finish with the space given, the result is
    /// `Status::BufError` and the change stays pending; calling again with
    /// the same arguments and more room completes it.
    pub fn set_params(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        level: Level,
        strategy: Strategy,
    ) -> StreamResult {
        if let Err(e) = self.check_active() {
            return StreamResult::refused(e);
        }
        let d = match self.engine {
            Engine::Deflate(ref mut d) => d,
            _ => return StreamResult::refused(StreamError::Misuse),
        };
        let (consumed, written, status) =
            match d.params(input, output, level, strategy) {
                Ok((c, w, true)) => (c, w, Ok(Status::Ok)),
                Ok((c, w, false)) => (c, w, Ok(Status::BufError)),
                Err(e) => (0, 0, Err(e)),
            };
        if status == Ok(Status::Ok) {
            self.config.level = level;
            self.config.strategy = strategy;
        }
        self.account(consumed, written);
        StreamResult::new(consumed, written, status)
    }

    /// Whether a parameter change is waiting for output space.
    pub fn params_pending(&self) -> bool {
        match self.engine {
            Engine::Deflate(ref d) => d.params_pending(),
            _ => false,
        }
    }

    /// Install a preset dictionary.
    ///
    /// Compression: zlib streams before the first `step`; raw streams
    /// whenever no input is buffered. Decompression: after `NeedDict`, or at
    /// any time for raw streams. A dictionary whose Adler-32 differs from
    /// the one the stream names is fatal.
    pub fn set_dictionary(&mut self, dict: &[u8]) -> Result<(), StreamError> {
        self.check_active()?;
        let ret = match self.engine {
            Engine::Deflate(ref mut d) => d.set_dictionary(dict),
            Engine::Inflate(ref mut i) => i.set_dictionary(dict),
            Engine::Released => Err(StreamError::Misuse),
        };
        ret.map_err(|e| self.fail(e))
    }

    /// Insert `bits` bits (at most 16) of `value` ahead of the next input
    /// byte. Decompression only.
    pub fn prime(&mut self, bits: u32, value: u32) -> Result<(), StreamError> {
        self.check_active()?;
        match self.engine {
            Engine::Inflate(ref mut i) => i.prime(bits, value),
            _ => Err(StreamError::Misuse),
        }
    }

    /// Back to the state right after construction. Level and strategy keep
    /// their current values; counters, history and buffered data are
    /// cleared.
    pub fn reset(&mut self) {
        match self.engine {
            Engine::Deflate(ref mut d) => d.reset(),
            Engine::Inflate(ref mut i) => i.reset(),
            Engine::Released => {
                self.engine =
                    Self::engine(self.mode, self.window_bits, &self.config)
            }
        }
        self.total_in = 0;
        self.total_out = 0;
        self.termination = Termination::Active;
        trace!("{:?} session reset", self.mode);
    }

    /// Release the history window and buffered output. Safe to call in any
    /// state and more than once.
    pub fn end(&mut self) {
        if let Engine::Released = self.engine {
            return;
        }
        self.engine = Engine::Released;
        if self.termination == Termination::Active {
            self.termination = Termination::Ended;
        }
        trace!("{:?} session released", self.mode);
    }

    /// Largest output a single `Flush::Finish` step over `source_len` bytes
    /// can produce, framing included.
    pub fn bound(&self, source_len: usize) -> usize {
        match self.engine {
            Engine::Deflate(ref d) => d.bound(source_len),
            _ => {
                let framing = match self.window_bits.framing() {
                    Framing::Zlib => 6,
                    Framing::Gzip => 18,
                    Framing::Raw | Framing::Auto => 0,
                };
                deflate_bound(source_len, self.config.mem_level) + framing
            }
        }
    }

    /// Compressed bytes and loose bits held in the session, not yet
    /// delivered.
    pub fn pending(&self) -> (usize, usize) {
        match self.engine {
            Engine::Deflate(ref d) => d.pending(),
            _ => (0, 0),
        }
    }

    /// Adler-32 (zlib) or CRC-32 (gzip) of the uncompressed data so far.
    /// While a dictionary is awaited, the id of that dictionary.
    pub fn checksum(&self) -> u32 {
        match self.engine {
            Engine::Deflate(ref d) => d.checksum(),
            Engine::Inflate(ref i) => i.checksum(),
            Engine::Released => 0,
        }
    }

    /// Decompression is positioned in front of a block header.
    pub fn at_block_boundary(&self) -> bool {
        match self.engine {
            Engine::Inflate(ref i) => i.at_block_boundary(),
            _ => false,
        }
    }
}
