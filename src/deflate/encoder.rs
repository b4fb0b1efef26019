//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use crate::adler32::Adler32;
use crate::bitio::writer::BitWriter;
use crate::checksum::Checksum;
use crate::config::{Framing, WindowBits};
use crate::deflate::{
    BlockType, CODELEN_CODES, CODELEN_ORDER, DIST_CODES, END_OF_BLOCK,
    FIXED_DIST_LENS, FIXED_LITLEN_LENS, LEN_TAB, LITLEN_CODES, MAX_STORED,
    OFF_TAB,
};
use crate::error::StreamError;
use crate::flush::Flush;
use crate::gzip;
use crate::huffman::cano_huff_table::make_table;
use crate::huffman::encoder::HuffmanEncoder;
use crate::huffman::MAX_CODE_LEN;
use crate::lzss::slidedict::{SlideDict, MIN_MATCH};
use crate::lzss::LzssCode;
use crate::params::{Level, ParamController, Strategy};
use crate::zlib;
#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
use core::cmp;
use core::hash::Hasher;

const MAX_CODELEN_LEN: usize = 7;

lazy_static! {
    static ref FIXED_LITLEN_ENC: HuffmanEncoder =
        HuffmanEncoder::new(&FIXED_LITLEN_LENS);
    static ref FIXED_DIST_ENC: HuffmanEncoder =
        HuffmanEncoder::new(&FIXED_DIST_LENS);
}

/// Worst-case size of a single finishing pass over `source_len` bytes with
/// blocks of at most `block_tokens` tokens, framing excluded.
pub(crate) fn deflate_bound(source_len: usize, mem_level: u8) -> usize {
    let block_tokens = lit_bufsize(mem_level) - 1;
    source_len + 5 * (source_len / block_tokens + source_len / MAX_STORED + 2)
}

#[inline]
fn lit_bufsize(mem_level: u8) -> usize {
    1 << (usize::from(mem_level) + 6)
}

/// Run-length code the code lengths of one alphabet into code length
/// symbols `(symbol, extra)` and count their frequencies.
fn enc_tab_to_freq(enc_tab: &[u8], freq: &mut [usize]) -> Vec<(u8, u16)> {
    let mut list = Vec::new();
    let mut old = 255;
    let mut len = 0;
    for &d in enc_tab.iter().chain([255_u8].iter()) {
        if old != d {
            if old == 0 {
                if len >= 11 {
                    freq[18] += 1;
                    list.push((18, len - 11));
                } else if len >= 3 {
                    freq[17] += 1;
                    list.push((17, len - 3));
                } else {
                    for _ in 0..len {
                        list.push((0, 0));
                    }
                    freq[0] += len as usize;
                }
            } else if len >= 3 {
                freq[16] += 1;
                list.push((16, len - 3));
            } else if len > 0 {
                for _ in 0..len {
                    list.push((old, 0));
                }
                freq[old as usize] += len as usize;
            }

            if d != 0 && d != 255 {
                list.push((d, 0));
                freq[d as usize] += 1;
                len = 0;
            } else {
                len = 1;
            }
            old = d;
        } else {
            len += 1;
            if old == 0 && len == 138 {
                freq[18] += 1;
                list.push((18, 127));
                len = 0;
            } else if old != 0 && len == 6 {
                freq[16] += 1;
                list.push((16, 3));
                len = 0;
            }
        }
    }
    list
}

#[inline]
fn codelen_extra_bits(sym: u8) -> usize {
    match sym {
        16 => 2,
        17 => 3,
        18 => 7,
        _ => 0,
    }
}

/// Every alphabet sent in a dynamic header codes at least two symbols.
fn force_two(freq: &[usize]) -> Vec<usize> {
    let mut freq = freq.to_vec();
    let mut used = freq.iter().filter(|&&f| f != 0).count();
    for f in freq.iter_mut() {
        if used >= 2 {
            break;
        }
        if *f == 0 {
            *f = 1;
            used += 1;
        }
    }
    freq
}

struct DynamicHeader {
    lit_lens: Vec<u8>,
    dist_lens: Vec<u8>,
    cl_lens: Vec<u8>,
    list: Vec<(u8, u16)>,
    hlit: usize,
    hdist: usize,
    hclen: usize,
}

impl DynamicHeader {
    fn new(lit_freq: &[usize], dist_freq: &[usize]) -> Self {
        let mut lit_freq = force_two(lit_freq);
        lit_freq[END_OF_BLOCK as usize] = 1;
        let lit_lens = make_table(&lit_freq, MAX_CODE_LEN);
        let dist_lens = make_table(&force_two(dist_freq), MAX_CODE_LEN);

        let last_used =
            |lens: &[u8]| lens.iter().rposition(|&l| l != 0).unwrap_or(0);
        let hlit = cmp::max(257, last_used(&lit_lens) + 1);
        let hdist = cmp::max(1, last_used(&dist_lens) + 1);

        let mut cl_freq = vec![0; CODELEN_CODES];
        let mut list = enc_tab_to_freq(&lit_lens[..hlit], &mut cl_freq);
        list.append(&mut enc_tab_to_freq(&dist_lens[..hdist], &mut cl_freq));
        let cl_lens = make_table(&force_two(&cl_freq), MAX_CODELEN_LEN);

        let hclen = cmp::max(
            4,
            CODELEN_ORDER
                .iter()
                .rposition(|&s| cl_lens[s] != 0)
                .map_or(0, |p| p + 1),
        );

        Self {
            lit_lens,
            dist_lens,
            cl_lens,
            list,
            hlit,
            hdist,
            hclen,
        }
    }

    /// Bits of the header after the three block header bits.
    fn cost(&self) -> u64 {
        5 + 5
            + 4
            + 3 * self.hclen as u64
            + self
                .list
                .iter()
                .map(|&(s, _)| {
                    u64::from(self.cl_lens[s as usize])
                        + codelen_extra_bits(s) as u64
                })
                .sum::<u64>()
    }

    fn write(&self, writer: &mut BitWriter, out: &mut Vec<u8>) {
        writer.write((self.hlit - 257) as u32, 5, out);
        writer.write((self.hdist - 1) as u32, 5, out);
        writer.write((self.hclen - 4) as u32, 4, out);
        for &s in CODELEN_ORDER.iter().take(self.hclen) {
            writer.write(u32::from(self.cl_lens[s]), 3, out);
        }
        let enc = HuffmanEncoder::new(&self.cl_lens);
        for &(s, e) in &self.list {
            writer.write_bits(enc.enc(u16::from(s)), out);
            let n = codelen_extra_bits(s);
            if n > 0 {
                writer.write(u32::from(e), n, out);
            }
        }
    }
}

/// Tokens of the block under construction with their symbol counts and,
/// while a stored block can still win, the bytes they cover.
#[derive(Clone, Debug)]
struct BlockBuffer {
    codes: Vec<LzssCode>,
    raw: Vec<u8>,
    stored_ok: bool,
    lit_freq: Vec<usize>,
    dist_freq: Vec<usize>,
    cap: usize,
}

impl BlockBuffer {
    fn new(cap: usize) -> Self {
        Self {
            codes: Vec::with_capacity(cap),
            raw: Vec::new(),
            stored_ok: true,
            lit_freq: vec![0; LITLEN_CODES],
            dist_freq: vec![0; DIST_CODES],
            cap,
        }
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.codes.len() >= self.cap
    }

    fn push(&mut self, code: LzssCode, bytes: &[u8]) {
        match code {
            LzssCode::Symbol(s) => self.lit_freq[s as usize] += 1,
            LzssCode::Reference { len, pos } => {
                self.lit_freq[257 + LEN_TAB.code(len - MIN_MATCH)] += 1;
                self.dist_freq[OFF_TAB.code(pos)] += 1;
            }
        }
        // Past four bytes per token a fixed block always beats a stored
        // one.
        if self.stored_ok {
            if self.raw.len() + bytes.len() > self.cap << 2 {
                self.stored_ok = false;
                self.raw.clear();
            } else {
                self.raw.extend_from_slice(bytes);
            }
        }
        self.codes.push(code);
    }

    fn clear(&mut self) {
        self.codes.clear();
        self.raw.clear();
        self.stored_ok = true;
        for f in self.lit_freq.iter_mut().chain(self.dist_freq.iter_mut()) {
            *f = 0;
        }
    }

    fn data_cost(&self, lit_lens: &[u8], dist_lens: &[u8]) -> u64 {
        let lit = self
            .lit_freq
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                f as u64
                    * (u64::from(lit_lens[i])
                        + if i >= 257 {
                            LEN_TAB.ext_bits(i - 257) as u64
                        } else {
                            0
                        })
            })
            .sum::<u64>();
        let dist = self
            .dist_freq
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                let extra = OFF_TAB.ext_bits(i) as u64;
                f as u64 * (u64::from(dist_lens[i]) + extra)
            })
            .sum::<u64>();
        lit + dist + u64::from(lit_lens[END_OF_BLOCK as usize])
    }

    fn stored_cost(&self, pending_bits: usize) -> u64 {
        let len = self.raw.len();
        let chunks = cmp::max(1, (len + MAX_STORED - 1) / MAX_STORED);
        let pad = (8 - (pending_bits + 3) % 8) % 8;
        (3 + pad + 32 + (chunks - 1) * (3 + 5 + 32) + (len << 3)) as u64
    }

    fn write_codes(
        &self,
        lit: &HuffmanEncoder,
        dist: &HuffmanEncoder,
        writer: &mut BitWriter,
        out: &mut Vec<u8>,
    ) {
        for code in &self.codes {
            match *code {
                LzssCode::Symbol(s) => {
                    writer.write_bits(lit.enc(u16::from(s)), out)
                }
                LzssCode::Reference { len, pos } => {
                    let (lc, lext) = LEN_TAB.convert((len - MIN_MATCH) as u16);
                    writer.write_bits(lit.enc(257 + u16::from(lc)), out);
                    writer.write_bits(&lext, out);
                    let (dc, dext) = OFF_TAB.convert(pos as u16);
                    writer.write_bits(dist.enc(u16::from(dc)), out);
                    writer.write_bits(&dext, out);
                }
            }
        }
        writer.write_bits(lit.enc(END_OF_BLOCK), out);
    }

    /// Emit the buffered tokens as the cheapest block kind allowed.
    fn write(
        &self,
        last: bool,
        level: Level,
        strategy: Strategy,
        writer: &mut BitWriter,
        out: &mut Vec<u8>,
    ) {
        let stored_size = self.stored_cost(writer.pending_bits());
        let fixed_size =
            3 + self.data_cost(&FIXED_LITLEN_LENS, &FIXED_DIST_LENS);
        let dynamic = if level == Level::NONE || strategy == Strategy::Fixed {
            None
        } else {
            let h = DynamicHeader::new(&self.lit_freq, &self.dist_freq);
            let data = self.data_cost(&h.lit_lens, &h.dist_lens);
            let size = 3 + h.cost() + data;
            Some((h, size))
        };
        let dynamic_size = dynamic.as_ref().map_or(u64::max_value(), |d| d.1);

        let block_type = if self.stored_ok
            && (level == Level::NONE
                || (stored_size <= fixed_size && stored_size <= dynamic_size))
        {
            BlockType::Stored
        } else if fixed_size <= dynamic_size {
            BlockType::Fixed
        } else {
            BlockType::Dynamic
        };
        debug!(
            "{:?} block, last: {}, tokens: {}, \
             bits: stored {} fixed {} dynamic {}",
            block_type,
            last,
            self.codes.len(),
            stored_size,
            fixed_size,
            dynamic_size
        );

        match (block_type, dynamic) {
            (BlockType::Stored, _) => {
                write_stored(&self.raw, last, writer, out)
            }
            (BlockType::Dynamic, Some((h, _))) => {
                writer.write(last as u32, 1, out);
                writer.write(BlockType::Dynamic.bits(), 2, out);
                h.write(writer, out);
                self.write_codes(
                    &HuffmanEncoder::new(&h.lit_lens),
                    &HuffmanEncoder::new(&h.dist_lens),
                    writer,
                    out,
                );
            }
            _ => {
                writer.write(last as u32, 1, out);
                writer.write(BlockType::Fixed.bits(), 2, out);
                let (lit, dist) = (&*FIXED_LITLEN_ENC, &*FIXED_DIST_ENC);
                self.write_codes(lit, dist, writer, out);
            }
        }
    }
}

/// Stored blocks for `data`, at least one even when empty.
fn write_stored(
    data: &[u8],
    last: bool,
    writer: &mut BitWriter,
    out: &mut Vec<u8>,
) {
    let mut chunks = data.chunks(MAX_STORED).peekable();
    let mut chunk: &[u8] = chunks.next().unwrap_or(&[]);
    loop {
        let is_last = chunks.peek().is_none();
        writer.write((last && is_last) as u32, 1, out);
        writer.write(BlockType::Stored.bits(), 2, out);
        writer.align(out);
        let len = chunk.len() as u16;
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&(!len).to_le_bytes());
        out.extend_from_slice(chunk);
        match chunks.next() {
            Some(c) => chunk = c,
            None => break,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing emitted yet, not even the header.
    Init,
    Busy,
    /// Trailer written; pending output may remain.
    Finished,
}

/// Resumable DEFLATE compressor with optional zlib or gzip framing.
///
/// Compressed bytes are staged in `pending` and handed out as output space
/// allows; new input is only tokenized once `pending` has drained, so at
/// most one block is ever staged.
#[derive(Clone, Debug)]
pub(crate) struct Deflater {
    window: SlideDict,
    block: BlockBuffer,
    params: ParamController,
    framing: Framing,
    w_bits: u8,
    mem_level: u8,
    writer: BitWriter,
    pending: Vec<u8>,
    pending_pos: usize,
    checksum: Checksum,
    dictionary: Option<Adler32>,
    last_flush: Option<Flush>,
    state: State,
}

impl Deflater {
    pub fn new(
        window_bits: WindowBits,
        mem_level: u8,
        level: Level,
        strategy: Strategy,
    ) -> Self {
        let framing = window_bits.framing();
        Self {
            window: SlideDict::new(window_bits.bits(), mem_level),
            block: BlockBuffer::new(lit_bufsize(mem_level) - 1),
            params: ParamController::new(level, strategy),
            framing,
            w_bits: window_bits.bits(),
            mem_level,
            writer: BitWriter::new(),
            pending: Vec::new(),
            pending_pos: 0,
            checksum: Checksum::new(framing),
            dictionary: None,
            last_flush: None,
            state: State::Init,
        }
    }

    /// Back to the state right after construction, keeping the current
    /// level and strategy.
    pub fn reset(&mut self) {
        self.window.reset();
        self.block.clear();
        self.params =
            ParamController::new(self.params.level(), self.params.strategy());
        self.writer.reset();
        self.pending.clear();
        self.pending_pos = 0;
        self.checksum = Checksum::new(self.framing);
        self.dictionary = None;
        self.last_flush = None;
        self.state = State::Init;
    }

    pub fn level(&self) -> Level {
        self.params.level()
    }

    pub fn strategy(&self) -> Strategy {
        self.params.strategy()
    }

    pub fn params_pending(&self) -> bool {
        self.params.is_pending()
    }

    /// Trailer written and every byte handed out.
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished && self.pending_pos == self.pending.len()
    }

    /// Whole bytes and loose bits not yet handed out.
    pub fn pending(&self) -> (usize, usize) {
        (self.pending.len() - self.pending_pos, self.writer.pending_bits())
    }

    pub fn checksum(&self) -> u32 {
        self.checksum.value()
    }

    pub fn bound(&self, source_len: usize) -> usize {
        let framing = match self.framing {
            Framing::Zlib if self.dictionary.is_some() => 10,
            Framing::Zlib => 6,
            Framing::Gzip => 18,
            Framing::Raw | Framing::Auto => 0,
        };
        deflate_bound(source_len, self.mem_level) + framing
    }

    /// Prime the window with `dict`. zlib framing takes a dictionary only
    /// before the header is out; raw framing whenever no input is waiting.
    pub fn set_dictionary(&mut self, dict: &[u8]) -> Result<(), StreamError> {
        match self.framing {
            Framing::Zlib if self.state == State::Init => {
                self.dictionary
                    .get_or_insert_with(Adler32::new)
                    .write(dict);
            }
            Framing::Raw
                if self.state != State::Finished
                    && self.window.lookahead() == 0 => {}
            _ => {
                debug!("dictionary refused for {:?} framing", self.framing);
                return Err(StreamError::Misuse);
            }
        }
        self.window.set_dictionary(dict);
        Ok(())
    }

    /// Compress from `input` into `output`. Returns the bytes consumed and
    /// written.
    pub fn deflate(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        flush: Flush,
    ) -> Result<(usize, usize), StreamError> {
        if self.state == State::Finished
            && (!input.is_empty() || flush != Flush::Finish)
        {
            debug!("compression already finished");
            return Err(StreamError::Misuse);
        }
        if output.is_empty() {
            return Ok((0, 0));
        }
        if self.state == State::Init {
            self.write_header();
            self.state = State::Busy;
        }

        let mut written = self.drain(output);
        if self.pending_pos < self.pending.len()
            || self.state == State::Finished
        {
            return Ok((0, written));
        }
        // A flush no stronger than the last one, with nothing new, has
        // nothing to add.
        if input.is_empty()
            && flush != Flush::Finish
            && self
                .last_flush
                .map_or(false, |last| flush.rank() <= last.rank())
        {
            return Ok((0, written));
        }

        self.last_flush = Some(flush);
        let mut consumed = 0;
        let mut flush_done = false;
        loop {
            written += self.drain(&mut output[written..]);
            if self.pending_pos < self.pending.len() {
                if !flush_done {
                    self.last_flush = None;
                }
                break;
            }
            if self.state == State::Finished {
                break;
            }
            if consumed < input.len() {
                let n = self.window.fill(&input[consumed..]);
                self.checksum.update(&input[consumed..consumed + n]);
                consumed += n;
            }
            let flushing = flush != Flush::None && consumed == input.len();
            if self.tokenize(flushing) || consumed < input.len() {
                continue;
            }
            if !flushing || flush_done {
                break;
            }
            self.finish_flush(flush);
            flush_done = true;
        }
        Ok((consumed, written))
    }

    /// Switch level and strategy. When data tokenized under the old
    /// settings must be closed off first, this runs a block flush and only
    /// applies the change once nothing of the old settings is left
    /// buffered; the bool reports whether it was applied.
    pub fn params(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        level: Level,
        strategy: Strategy,
    ) -> Result<(usize, usize, bool), StreamError> {
        if self.state == State::Finished {
            return Err(StreamError::Misuse);
        }
        if self.state == State::Init
            || !self.params.needs_flush(level, strategy)
        {
            self.params.apply(level, strategy);
            return Ok((0, 0, true));
        }
        self.params.request(level, strategy);
        let (consumed, written) = self.deflate(input, output, Flush::Block)?;
        if consumed < input.len()
            || self.window.lookahead() > 0
            || !self.block.is_empty()
        {
            return Ok((consumed, written, false));
        }
        self.params.apply(level, strategy);
        Ok((consumed, written, true))
    }

    fn drain(&mut self, output: &mut [u8]) -> usize {
        let avail = &self.pending[self.pending_pos..];
        let n = cmp::min(avail.len(), output.len());
        output[..n].copy_from_slice(&avail[..n]);
        self.pending_pos += n;
        if self.pending_pos == self.pending.len() {
            self.pending.clear();
            self.pending_pos = 0;
        }
        n
    }

    /// Cut tokens into the block buffer. `true` when a full block was
    /// written out.
    fn tokenize(&mut self, flushing: bool) -> bool {
        let config = self.params.config();
        let strategy = self.params.strategy();
        while let Some(code) =
            self.window.next_code(config, strategy, flushing)
        {
            self.block.push(code, self.window.recent(code.len()));
            if self.block.is_full() {
                self.write_block(false);
                return true;
            }
        }
        false
    }

    fn write_block(&mut self, last: bool) {
        self.block.write(
            last,
            self.params.level(),
            self.params.strategy(),
            &mut self.writer,
            &mut self.pending,
        );
        self.block.clear();
    }

    fn finish_flush(&mut self, flush: Flush) {
        match flush {
            Flush::None => {}
            Flush::Block => {
                if !self.block.is_empty() {
                    self.write_block(false);
                }
            }
            Flush::Partial => {
                if !self.block.is_empty() {
                    self.write_block(false);
                }
                // empty fixed block
                self.writer
                    .write(BlockType::Fixed.bits() << 1, 3, &mut self.pending);
                self.writer.write(0, 7, &mut self.pending);
                trace!("partial flush marker");
            }
            Flush::Sync | Flush::Full => {
                if !self.block.is_empty() {
                    self.write_block(false);
                }
                write_stored(&[], false, &mut self.writer, &mut self.pending);
                if flush == Flush::Full {
                    self.window.reset_matches();
                }
                trace!("{:?} flush marker", flush);
            }
            Flush::Finish => {
                self.write_block(true);
                self.writer.align(&mut self.pending);
                self.write_trailer();
                self.state = State::Finished;
            }
        }
    }

    fn write_header(&mut self) {
        match self.framing {
            Framing::Zlib => {
                let dict_id = self.dictionary.as_ref().map(Adler32::value);
                let h = zlib::header(
                    self.w_bits,
                    self.params.level(),
                    self.params.strategy(),
                    dict_id,
                );
                self.pending.extend_from_slice(&h);
            }
            Framing::Gzip => {
                let h =
                    gzip::header(self.params.level(), self.params.strategy());
                self.pending.extend_from_slice(&h);
            }
            Framing::Raw | Framing::Auto => {}
        }
    }

    fn write_trailer(&mut self) {
        match self.framing {
            Framing::Zlib => {
                let v = self.checksum.value();
                self.pending.extend_from_slice(&v.to_be_bytes());
            }
            Framing::Gzip => {
                let v = self.checksum.value();
                let len = self.checksum.length();
                self.pending.extend_from_slice(&v.to_le_bytes());
                self.pending.extend_from_slice(&len.to_le_bytes());
            }
            Framing::Raw | Framing::Auto => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::Mode;
    use rand::distributions::Standard;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    fn deflater(
        window_bits: i32,
        level: Level,
        strategy: Strategy,
    ) -> Deflater {
        let wbits = WindowBits::parse(window_bits, Mode::Compress).unwrap();
        Deflater::new(wbits, 8, level, strategy)
    }

    fn random(len: usize) -> Vec<u8> {
        let rng = XorShiftRng::from_seed([
            0xDA, 0xE1, 0x4B, 0x0B, 0xFF, 0xC2, 0xFE, 0x64, 0x23, 0xFE, 0x3F,
            0x51, 0x6D, 0x3E, 0xA2, 0xF3,
        ]);
        rng.sample_iter(&Standard).take(len).collect()
    }

    fn finish_all(d: &mut Deflater, input: &[u8]) -> Vec<u8> {
        let mut out = vec![0; d.bound(input.len())];
        let (c, w) = d.deflate(input, &mut out, Flush::Finish).unwrap();
        assert_eq!(c, input.len());
        assert!(d.is_finished());
        out.truncate(w);
        out
    }

    #[test]
    fn zlib_unit() {
        let mut d = deflater(15, Level::DEFAULT, Strategy::Default);
        assert_eq!(
            finish_all(&mut d, b"a"),
            vec![0x78, 0x9C, 0x4B, 0x04, 0x00, 0x00, 0x62, 0x00, 0x62]
        );
    }

    #[test]
    fn gzip_unit() {
        let mut d = deflater(31, Level::DEFAULT, Strategy::Default);
        assert_eq!(
            finish_all(&mut d, b"a"),
            vec![
                0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF,
                0x4b, 0x04, 0x00, 0x43, 0xbe, 0xb7, 0xe8, 0x01, 0x00, 0x00,
                0x00,
            ]
        );
    }

    #[test]
    fn sync_flush_marker_and_repeat() {
        let mut d = deflater(-15, Level::DEFAULT, Strategy::Default);
        let mut out = vec![0; 64];
        let (c, w) = d.deflate(b"hello", &mut out, Flush::Sync).unwrap();
        assert_eq!(c, 5);
        assert_eq!(&out[w - 4..w], &[0x00, 0x00, 0xFF, 0xFF]);
        assert_eq!(d.pending(), (0, 0));
        assert_eq!(d.deflate(&[], &mut out, Flush::Sync).unwrap(), (0, 0));
        assert_eq!(d.deflate(&[], &mut out, Flush::None).unwrap(), (0, 0));
        let (_, w) = d.deflate(&[], &mut out, Flush::Full).unwrap();
        assert_eq!(&out[..w], &[0x00, 0x00, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn partial_flush_leaves_bits() {
        let mut d = deflater(-15, Level::DEFAULT, Strategy::Default);
        let mut out = vec![0; 64];
        d.deflate(b"hello", &mut out, Flush::Partial).unwrap();
        let (bytes, bits) = d.pending();
        assert_eq!(bytes, 0);
        assert!(bits < 8);
    }

    #[test]
    fn block_flush_of_empty_block_is_silent() {
        let mut d = deflater(-15, Level::DEFAULT, Strategy::Default);
        let mut out = vec![0; 64];
        assert_eq!(d.deflate(&[], &mut out, Flush::Block).unwrap(), (0, 0));
        let (c, w) = d.deflate(b"abc", &mut out, Flush::Block).unwrap();
        assert_eq!(c, 3);
        let (bytes, bits) = d.pending();
        assert_eq!(bytes, 0);
        // fixed block header, three literals and end of block
        assert_eq!(w * 8 + bits, 3 + 3 * 8 + 7);
    }

    #[test]
    fn one_byte_output_matches_single_call() {
        let data = random(20_000)
            .into_iter()
            .map(|b| b % 8)
            .collect::<Vec<u8>>();
        let mut whole = deflater(15, Level::DEFAULT, Strategy::Default);
        let expected = finish_all(&mut whole, &data);

        let mut d = deflater(15, Level::DEFAULT, Strategy::Default);
        let mut got = Vec::new();
        let mut pos = 0;
        let mut byte = [0_u8; 1];
        while !d.is_finished() {
            let end = cmp::min(data.len(), pos + 7);
            let flush = if end == data.len() {
                Flush::Finish
            } else {
                Flush::None
            };
            let (c, w) = d.deflate(&data[pos..end], &mut byte, flush).unwrap();
            pos += c;
            got.extend_from_slice(&byte[..w]);
        }
        assert_eq!(got, expected);
    }

    #[test]
    fn bound_holds() {
        for &mem_level in &[1_u8, 8, 9] {
            for &len in &[0_usize, 1, 1000, 70_000] {
                let data = random(len);
                let wbits = WindowBits::parse(15, Mode::Compress).unwrap();
                let (level, strategy) = (Level::DEFAULT, Strategy::Default);
                let mut d = Deflater::new(wbits, mem_level, level, strategy);
                let out = finish_all(&mut d, &data);
                assert!(out.len() <= d.bound(len), "{} {}", mem_level, len);
            }
        }
    }

    #[test]
    fn params_wait_for_output_space() {
        let mut d = deflater(15, Level::DEFAULT, Strategy::Default);
        let mut out = vec![0; 256];
        let (c, _) = d.deflate(b"abcabcabc", &mut out, Flush::None).unwrap();
        assert_eq!(c, 9);

        let mut none: [u8; 0] = [];
        let (_, _, applied) = d
            .params(&[], &mut none, Level::NONE, Strategy::Default)
            .unwrap();
        assert!(!applied);
        assert!(d.params_pending());
        assert_eq!(d.level(), Level::DEFAULT);

        let (_, w, applied) = d
            .params(&[], &mut out, Level::NONE, Strategy::Default)
            .unwrap();
        assert!(applied);
        assert!(w > 0);
        assert_eq!(d.level(), Level::NONE);
        assert!(!d.params_pending());

        // same search function: applied at once
        let (_, _, applied) = d
            .params(&[], &mut none, Level::NONE, Strategy::Default)
            .unwrap();
        assert!(applied);
    }

    #[test]
    fn dictionary_rules() {
        let mut d = deflater(31, Level::DEFAULT, Strategy::Default);
        assert_eq!(d.set_dictionary(b"dict"), Err(StreamError::Misuse));

        let mut d = deflater(15, Level::DEFAULT, Strategy::Default);
        d.set_dictionary(b"hello").unwrap();
        let out = finish_all(&mut d, b"hello");
        assert_eq!(&out[..2], &[0x78, 0xBB]);
        assert_eq!(&out[2..6], &crate::adler32(b"hello").to_be_bytes());
        assert_eq!(d.set_dictionary(b"late"), Err(StreamError::Misuse));

        let mut d = deflater(-15, Level::DEFAULT, Strategy::Default);
        let mut out = vec![0; 64];
        d.deflate(b"abc", &mut out, Flush::None).unwrap();
        assert_eq!(d.set_dictionary(b"x"), Err(StreamError::Misuse));
        d.deflate(&[], &mut out, Flush::Block).unwrap();
        assert!(d.set_dictionary(b"x").is_ok());
    }

    #[test]
    fn finished_stream_refuses_more() {
        let mut d = deflater(15, Level::DEFAULT, Strategy::Default);
        finish_all(&mut d, b"abc");
        let mut out = vec![0; 16];
        let misuse = Err(StreamError::Misuse);
        assert_eq!(d.deflate(b"x", &mut out, Flush::Finish), misuse);
        assert_eq!(d.deflate(&[], &mut out, Flush::None), misuse);
        assert_eq!(d.deflate(&[], &mut out, Flush::Finish), Ok((0, 0)));
        d.reset();
        assert_eq!(finish_all(&mut d, b"a")[..2], [0x78, 0x9C]);
    }

    #[test]
    fn code_length_runs() {
        let mut freq = vec![0; CODELEN_CODES];
        let lens = [0, 0, 5, 5, 5, 5, 5, 5, 5, 0, 0, 0];
        let list = enc_tab_to_freq(&lens, &mut freq);
        assert_eq!(list, vec![(0, 0), (0, 0), (5, 0), (16, 3), (17, 0)]);
        assert_eq!(freq[0], 2);
        assert_eq!(freq[5], 1);
        assert_eq!(freq[16], 1);
        assert_eq!(freq[17], 1);
    }
}
