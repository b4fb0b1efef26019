//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use crate::adler32::Adler32;
use crate::bitio::reader::{BitReader, InputCursor};
use crate::cbuffer::CircularBuffer;
use crate::checksum::Checksum;
use crate::config::{Framing, WindowBits};
use crate::deflate::{
    BlockType, CODELEN_CODES, CODELEN_ORDER, DIST_CODES, END_OF_BLOCK,
    FIXED_DIST_LENS, FIXED_LITLEN_LENS, LEN_TAB, LITLEN_CODES, OFF_TAB,
};
use crate::error::{Corruption, StreamError};
use crate::flush::Flush;
use crate::gzip::HeaderParser;
use crate::huffman::decoder::{Decoded, HuffmanDecoder};
use crate::huffman::{completeness, Completeness};
use crate::zlib;
#[cfg(not(feature = "std"))]
use alloc::boxed::Box;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
use core::cmp;
use core::hash::Hasher;

const LIT_TAB_BITS: usize = 9;
const DIST_TAB_BITS: usize = 6;
const CODELEN_TAB_BITS: usize = 7;

lazy_static! {
    static ref FIXED_CODES: Option<(HuffmanDecoder, HuffmanDecoder)> = Some((
        HuffmanDecoder::new(&FIXED_LITLEN_LENS, LIT_TAB_BITS)?,
        HuffmanDecoder::new(&FIXED_DIST_LENS, DIST_TAB_BITS)?,
    ));
}

/// Why a decoding call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Halt {
    /// Input ran out or the output is full.
    Starved,
    /// Stopped in front of a block header on request.
    BlockBoundary,
    /// The zlib header asks for a preset dictionary.
    NeedDict,
    /// Trailer verified; nothing more will be produced.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Detect,
    ZlibHeader,
    DictId,
    Dict,
    GzipHeader,
    BlockHeader,
    StoredLen,
    Stored(usize),
    Table,
    CodeLenLens,
    CodeLens,
    Len,
    Dist { len: usize },
    Copy { len: usize, dist: usize },
    Check,
    Done,
}

#[derive(Clone, Debug)]
enum Codes {
    Fixed,
    Dynamic(Box<(HuffmanDecoder, HuffmanDecoder)>),
}

/// Code length header of a dynamic block, gathered across calls.
#[derive(Clone, Debug)]
struct Table {
    hlit: usize,
    hdist: usize,
    hclen: usize,
    cl_lens: [u8; CODELEN_CODES],
    cl_have: usize,
    cl_decoder: Option<HuffmanDecoder>,
    lens: Vec<u8>,
}

impl Table {
    fn new() -> Self {
        Self {
            hlit: 0,
            hdist: 0,
            hclen: 0,
            cl_lens: [0; CODELEN_CODES],
            cl_have: 0,
            cl_decoder: None,
            lens: Vec::with_capacity(LITLEN_CODES + DIST_CODES),
        }
    }
}

fn corrupt(c: Corruption) -> StreamError {
    debug!("corrupt stream: {}", c);
    c.into()
}

/// Next whole byte, preferring bits already held.
fn next_byte(reader: &mut BitReader, input: &mut InputCursor) -> Option<u8> {
    if reader.bits() < 8 && !reader.pull(input) {
        return None;
    }
    reader.take_byte()
}

/// Peek the next symbol without consuming it. `None` when input ran out
/// before a whole code was held.
fn peek_symbol(
    reader: &mut BitReader,
    input: &mut InputCursor,
    dec: &HuffmanDecoder,
) -> Result<Option<(u16, u32)>, StreamError> {
    loop {
        match dec.decode(reader.hold(), reader.bits()) {
            Decoded::Symbol(s, l) => return Ok(Some((s, l))),
            Decoded::NeedMore => {
                if !reader.pull(input) {
                    return Ok(None);
                }
            }
            Decoded::Invalid => return Err(corrupt(Corruption::InvalidCode)),
        }
    }
}

fn decoders(
    codes: &Codes,
) -> Result<(&HuffmanDecoder, &HuffmanDecoder), StreamError> {
    match *codes {
        Codes::Fixed => FIXED_CODES
            .as_ref()
            .map(|c| (&c.0, &c.1))
            .ok_or_else(|| corrupt(Corruption::InvalidCode)),
        Codes::Dynamic(ref c) => Ok((&c.0, &c.1)),
    }
}

/// Lengths are acceptable when complete, or a lone one-bit code, or (for
/// distances) no codes at all.
fn usable(lens: &[u8], allow_empty: bool) -> bool {
    match completeness(lens) {
        Completeness::Complete => true,
        Completeness::Incomplete { codes, max_len } => {
            max_len == 1 || (allow_empty && codes == 0)
        }
        Completeness::OverSubscribed => false,
    }
}

/// Resumable DEFLATE decompressor with zlib, gzip or automatic framing.
#[derive(Clone, Debug)]
pub(crate) struct Inflater {
    window_bits: WindowBits,
    framing: Framing,
    phase: Phase,
    reader: BitReader,
    window: CircularBuffer<u8>,
    checksum: Checksum,
    last: bool,
    codes: Codes,
    table: Table,
    header: HeaderParser,
    dict_id: Option<u32>,
    trailer: Vec<u8>,
}

impl Inflater {
    pub fn new(window_bits: WindowBits) -> Self {
        let framing = window_bits.framing();
        Self {
            window_bits,
            framing,
            phase: Self::first_phase(framing),
            reader: BitReader::new(),
            window: CircularBuffer::new(window_bits.window_size()),
            checksum: Checksum::new(framing),
            last: false,
            codes: Codes::Fixed,
            table: Table::new(),
            header: HeaderParser::new(),
            dict_id: None,
            trailer: Vec::with_capacity(8),
        }
    }

    fn first_phase(framing: Framing) -> Phase {
        match framing {
            Framing::Raw => Phase::BlockHeader,
            Framing::Zlib => Phase::ZlibHeader,
            Framing::Gzip => Phase::GzipHeader,
            Framing::Auto => Phase::Detect,
        }
    }

    pub fn reset(&mut self) {
        self.framing = self.window_bits.framing();
        self.phase = Self::first_phase(self.framing);
        self.reader.reset();
        self.window.clear();
        self.checksum = Checksum::new(self.framing);
        self.last = false;
        self.codes = Codes::Fixed;
        self.table = Table::new();
        self.header = HeaderParser::new();
        self.dict_id = None;
        self.trailer.clear();
    }

    #[cfg(test)]
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn at_block_boundary(&self) -> bool {
        self.phase == Phase::BlockHeader
    }

    /// Running check of the output, or the wanted dictionary id while one
    /// is awaited.
    pub fn checksum(&self) -> u32 {
        match (self.phase, self.dict_id) {
            (Phase::Dict, Some(id)) => id,
            _ => self.checksum.value(),
        }
    }

    pub fn prime(&mut self, bits: u32, value: u32) -> Result<(), StreamError> {
        self.reader.prime(bits, value)
    }

    /// Supply the preset dictionary. zlib streams take it only when asked
    /// for, raw streams at any time.
    pub fn set_dictionary(&mut self, dict: &[u8]) -> Result<(), StreamError> {
        match (self.framing, self.phase) {
            (_, Phase::Dict) => {
                let mut adler = Adler32::new();
                adler.write(dict);
                if Some(adler.value()) != self.dict_id {
                    debug!(
                        "dictionary id {:08x} does not match {:08x?}",
                        adler.value(),
                        self.dict_id
                    );
                    return Err(StreamError::DictionaryMismatch);
                }
                self.phase = Phase::BlockHeader;
            }
            (Framing::Raw, phase) if phase != Phase::Done => {}
            _ => {
                debug!("dictionary refused in {:?}", self.phase);
                return Err(StreamError::Misuse);
            }
        }
        self.window.append(dict);
        debug!("{} dictionary bytes loaded into the history", dict.len());
        Ok(())
    }

    /// Decode from `input` into `output`. Returns the bytes written along
    /// with why decoding stopped; the count is valid even on error.
    pub fn inflate(
        &mut self,
        input: &mut InputCursor,
        output: &mut [u8],
        flush: Flush,
    ) -> (usize, Result<Halt, StreamError>) {
        let mut written = 0;
        let mut mark = 0;
        let ret = self.run(input, output, &mut written, &mut mark, flush);
        self.checksum.update(&output[mark..written]);
        (written, ret)
    }

    /// Move to the next block header; `true` if decoding stops there.
    fn enter_block(&mut self, flush: Flush) -> bool {
        self.phase = Phase::BlockHeader;
        flush == Flush::Block
    }

    fn run(
        &mut self,
        input: &mut InputCursor,
        output: &mut [u8],
        written: &mut usize,
        mark: &mut usize,
        flush: Flush,
    ) -> Result<Halt, StreamError> {
        loop {
            match self.phase {
                Phase::Detect => {
                    if !self.reader.need(input, 16) {
                        return Ok(Halt::Starved);
                    }
                    let magic = self.reader.peek(16);
                    self.framing = if magic == 0x8B1F {
                        self.phase = Phase::GzipHeader;
                        Framing::Gzip
                    } else {
                        self.phase = Phase::ZlibHeader;
                        Framing::Zlib
                    };
                    self.checksum = Checksum::new(self.framing);
                    trace!("detected {:?} framing", self.framing);
                }
                Phase::ZlibHeader => {
                    if !self.reader.need(input, 16) {
                        return Ok(Halt::Starved);
                    }
                    let cmf = self.reader.read(8) as u8;
                    let flg = self.reader.read(8) as u8;
                    let max_bits = self.window_bits.bits();
                    let h = zlib::parse_header(cmf, flg, max_bits)?;
                    trace!("zlib header: {:?}", h);
                    if h.has_dict {
                        self.phase = Phase::DictId;
                    } else if self.enter_block(flush) {
                        return Ok(Halt::BlockBoundary);
                    }
                }
                Phase::DictId => {
                    if !self.reader.need(input, 32) {
                        return Ok(Halt::Starved);
                    }
                    let mut id = 0_u32;
                    for _ in 0..4 {
                        id = (id << 8) | self.reader.read(8);
                    }
                    self.dict_id = Some(id);
                    self.phase = Phase::Dict;
                    debug!("stream wants dictionary {:08x}", id);
                    return Ok(Halt::NeedDict);
                }
                Phase::Dict => return Ok(Halt::NeedDict),
                Phase::GzipHeader => loop {
                    let byte = match next_byte(&mut self.reader, input) {
                        Some(b) => b,
                        None => return Ok(Halt::Starved),
                    };
                    if self.header.push(byte)? {
                        if self.enter_block(flush) {
                            return Ok(Halt::BlockBoundary);
                        }
                        break;
                    }
                },
                Phase::BlockHeader => {
                    if !self.reader.need(input, 3) {
                        return Ok(Halt::Starved);
                    }
                    self.last = self.reader.read(1) == 1;
                    let kind = BlockType::from_bits(self.reader.read(2))
                        .ok_or_else(|| corrupt(Corruption::BlockType))?;
                    trace!("{:?} block, last: {}", kind, self.last);
                    self.phase = match kind {
                        BlockType::Stored => {
                            self.reader.align();
                            Phase::StoredLen
                        }
                        BlockType::Fixed => {
                            self.codes = Codes::Fixed;
                            Phase::Len
                        }
                        BlockType::Dynamic => Phase::Table,
                    };
                }
                Phase::StoredLen => {
                    if !self.reader.need(input, 32) {
                        return Ok(Halt::Starved);
                    }
                    let len = self.reader.read(16);
                    let nlen = self.reader.read(16);
                    if len != !nlen & 0xFFFF {
                        return Err(corrupt(Corruption::StoredLength));
                    }
                    self.phase = Phase::Stored(len as usize);
                }
                Phase::Stored(0) => {
                    if self.end_of_block(output, written, mark, flush) {
                        return Ok(Halt::BlockBoundary);
                    }
                }
                Phase::Stored(remaining) => {
                    if *written == output.len() {
                        return Ok(Halt::Starved);
                    }
                    let n = if let Some(b) = self.reader.take_byte() {
                        output[*written] = b;
                        1
                    } else {
                        let src = input.remaining();
                        let n = cmp::min(
                            remaining,
                            cmp::min(output.len() - *written, src.len()),
                        );
                        if n == 0 {
                            return Ok(Halt::Starved);
                        }
                        output[*written..*written + n]
                            .copy_from_slice(&src[..n]);
                        input.advance(n);
                        n
                    };
                    self.window.append(&output[*written..*written + n]);
                    *written += n;
                    self.phase = Phase::Stored(remaining - n);
                }
                Phase::Table => {
                    if !self.reader.need(input, 14) {
                        return Ok(Halt::Starved);
                    }
                    let t = &mut self.table;
                    t.hlit = self.reader.read(5) as usize + 257;
                    t.hdist = self.reader.read(5) as usize + 1;
                    t.hclen = self.reader.read(4) as usize + 4;
                    if t.hlit > LITLEN_CODES || t.hdist > DIST_CODES {
                        return Err(corrupt(Corruption::SymbolCounts));
                    }
                    t.cl_lens = [0; CODELEN_CODES];
                    t.cl_have = 0;
                    t.lens.clear();
                    self.phase = Phase::CodeLenLens;
                }
                Phase::CodeLenLens => {
                    let t = &mut self.table;
                    while t.cl_have < t.hclen {
                        if !self.reader.need(input, 3) {
                            return Ok(Halt::Starved);
                        }
                        let len = self.reader.read(3) as u8;
                        t.cl_lens[CODELEN_ORDER[t.cl_have]] = len;
                        t.cl_have += 1;
                    }
                    if completeness(&t.cl_lens) != Completeness::Complete {
                        return Err(corrupt(Corruption::CodeLengths));
                    }
                    t.cl_decoder = Some(
                        HuffmanDecoder::new(&t.cl_lens, CODELEN_TAB_BITS)
                            .ok_or_else(|| corrupt(Corruption::CodeLengths))?,
                    );
                    self.phase = Phase::CodeLens;
                }
                Phase::CodeLens => {
                    match self.read_code_lens(input)? {
                        true => self.phase = Phase::Len,
                        false => return Ok(Halt::Starved),
                    }
                }
                Phase::Len => {
                    let (lit, _) = decoders(&self.codes)?;
                    let (sym, used) =
                        match peek_symbol(&mut self.reader, input, lit)? {
                            Some(s) => s,
                            None => return Ok(Halt::Starved),
                        };
                    match sym {
                        0..=255 => {
                            if *written == output.len() {
                                return Ok(Halt::Starved);
                            }
                            self.reader.consume(used);
                            output[*written] = sym as u8;
                            self.window.push(sym as u8);
                            *written += 1;
                        }
                        END_OF_BLOCK => {
                            self.reader.consume(used);
                            if self.end_of_block(output, written, mark, flush)
                            {
                                return Ok(Halt::BlockBoundary);
                            }
                        }
                        257..=285 => {
                            let idx = usize::from(sym - 257);
                            let ext = LEN_TAB.ext_bits(idx) as u32;
                            if !self.reader.need(input, used + ext) {
                                return Ok(Halt::Starved);
                            }
                            self.reader.consume(used);
                            let extra = self.reader.read(ext) as u16;
                            let len =
                                usize::from(LEN_TAB.convert_back(idx, extra))
                                    + 3;
                            self.phase = Phase::Dist { len };
                        }
                        _ => return Err(corrupt(Corruption::InvalidCode)),
                    }
                }
                Phase::Dist { len } => {
                    let (_, dist_dec) = decoders(&self.codes)?;
                    let (sym, used) =
                        match peek_symbol(&mut self.reader, input, dist_dec)? {
                            Some(s) => s,
                            None => return Ok(Halt::Starved),
                        };
                    let sym = usize::from(sym);
                    if sym >= DIST_CODES {
                        return Err(corrupt(Corruption::InvalidCode));
                    }
                    let ext = OFF_TAB.ext_bits(sym) as u32;
                    if !self.reader.need(input, used + ext) {
                        return Ok(Halt::Starved);
                    }
                    self.reader.consume(used);
                    let extra = self.reader.read(ext) as u16;
                    let dist =
                        usize::from(OFF_TAB.convert_back(sym, extra)) + 1;
                    if dist > self.window.len() {
                        return Err(corrupt(Corruption::DistanceTooFar));
                    }
                    self.phase = Phase::Copy { len, dist };
                }
                Phase::Copy { mut len, dist } => {
                    while len > 0 && *written < output.len() {
                        let b = self.window[dist - 1];
                        output[*written] = b;
                        self.window.push(b);
                        *written += 1;
                        len -= 1;
                    }
                    if len > 0 {
                        self.phase = Phase::Copy { len, dist };
                        return Ok(Halt::Starved);
                    }
                    self.phase = Phase::Len;
                }
                Phase::Check => {
                    if !self.read_trailer(input)? {
                        return Ok(Halt::Starved);
                    }
                    self.phase = Phase::Done;
                }
                Phase::Done => return Ok(Halt::End),
            }
        }
    }

    /// After an end-of-block code or a finished stored block. `true` if
    /// decoding stops at the following block header.
    fn end_of_block(
        &mut self,
        output: &[u8],
        written: &mut usize,
        mark: &mut usize,
        flush: Flush,
    ) -> bool {
        if !self.last {
            return self.enter_block(flush);
        }
        self.checksum.update(&output[*mark..*written]);
        *mark = *written;
        self.reader.align();
        self.phase = Phase::Check;
        false
    }

    /// `Ok(true)` once every literal/length and distance code length is
    /// read and the two decoders are built.
    fn read_code_lens(
        &mut self,
        input: &mut InputCursor,
    ) -> Result<bool, StreamError> {
        let t = &mut self.table;
        let total = t.hlit + t.hdist;
        let dec = match t.cl_decoder {
            Some(ref d) => d,
            None => return Err(corrupt(Corruption::CodeLengths)),
        };
        while t.lens.len() < total {
            let (sym, used) =
                match peek_symbol(&mut self.reader, input, dec)? {
                    Some(s) => s,
                    None => return Ok(false),
                };
            let (ext, base, value) = match sym {
                0..=15 => (0, 1, sym as u8),
                16 => match t.lens.last() {
                    Some(&prev) => (2, 3, prev),
                    None => return Err(corrupt(Corruption::CodeLengthRepeat)),
                },
                17 => (3, 3, 0),
                _ => (7, 11, 0),
            };
            if !self.reader.need(input, used + ext) {
                return Ok(false);
            }
            self.reader.consume(used);
            let count = base + self.reader.read(ext) as usize;
            if t.lens.len() + count > total {
                return Err(corrupt(Corruption::CodeLengthRepeat));
            }
            t.lens.extend(core::iter::repeat(value).take(count));
        }

        let (lit_lens, dist_lens) = t.lens.split_at(t.hlit);
        if lit_lens[END_OF_BLOCK as usize] == 0 {
            return Err(corrupt(Corruption::MissingEndOfBlock));
        }
        if !usable(lit_lens, false) {
            return Err(corrupt(Corruption::LiteralLengthCodes));
        }
        if !usable(dist_lens, true) {
            return Err(corrupt(Corruption::DistanceCodes));
        }
        let lit = HuffmanDecoder::new(lit_lens, LIT_TAB_BITS)
            .ok_or_else(|| corrupt(Corruption::LiteralLengthCodes))?;
        let dist = HuffmanDecoder::new(dist_lens, DIST_TAB_BITS)
            .ok_or_else(|| corrupt(Corruption::DistanceCodes))?;
        self.codes = Codes::Dynamic(Box::new((lit, dist)));
        Ok(true)
    }

    /// `Ok(true)` once the trailer is read and verified.
    fn read_trailer(
        &mut self,
        input: &mut InputCursor,
    ) -> Result<bool, StreamError> {
        let need = match self.framing {
            Framing::Zlib => 4,
            Framing::Gzip => 8,
            Framing::Raw | Framing::Auto => 0,
        };
        while self.trailer.len() < need {
            match next_byte(&mut self.reader, input) {
                Some(b) => self.trailer.push(b),
                None => return Ok(false),
            }
        }
        let t = &self.trailer;
        match self.framing {
            Framing::Zlib => {
                let check = u32::from_be_bytes([t[0], t[1], t[2], t[3]]);
                if check != self.checksum.value() {
                    return Err(corrupt(Corruption::Checksum));
                }
            }
            Framing::Gzip => {
                let crc = u32::from_le_bytes([t[0], t[1], t[2], t[3]]);
                let isize = u32::from_le_bytes([t[4], t[5], t[6], t[7]]);
                if crc != self.checksum.value() {
                    return Err(corrupt(Corruption::Checksum));
                }
                if isize != self.checksum.length() {
                    return Err(corrupt(Corruption::Length));
                }
            }
            Framing::Raw | Framing::Auto => {}
        }
        trace!("stream trailer verified");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitio::writer::BitWriter;
    use crate::deflate::encoder::Deflater;
    use crate::params::{Level, Strategy};
    use crate::stream::Mode;

    fn wbits(v: i32, mode: Mode) -> WindowBits {
        WindowBits::parse(v, mode).unwrap()
    }

    fn deflater(window_bits: i32) -> Deflater {
        let bits = wbits(window_bits, Mode::Compress);
        Deflater::new(bits, 8, Level::DEFAULT, Strategy::Default)
    }

    fn compress(window_bits: i32, data: &[u8]) -> Vec<u8> {
        let mut d = deflater(window_bits);
        let mut out = vec![0; d.bound(data.len())];
        let (_, w) = d.deflate(data, &mut out, Flush::Finish).unwrap();
        out.truncate(w);
        out
    }

    fn inflate_all(
        window_bits: i32,
        data: &[u8],
    ) -> (Vec<u8>, Result<Halt, StreamError>) {
        let mut inf = Inflater::new(wbits(window_bits, Mode::Decompress));
        let mut out = vec![0; 1 << 16];
        let mut input = InputCursor::new(data);
        let (w, halt) = inf.inflate(&mut input, &mut out, Flush::None);
        out.truncate(w);
        (out, halt)
    }

    fn sample() -> Vec<u8> {
        b"Many hands make light work. "
            .iter()
            .cycle()
            .take(3000)
            .cloned()
            .collect()
    }

    #[test]
    fn one_byte_at_a_time() {
        let data = sample();
        let encoded = compress(15, &data);
        let mut inf = Inflater::new(wbits(15, Mode::Decompress));
        let mut got = Vec::new();
        let mut pos = 0;
        let mut byte = [0_u8; 1];
        loop {
            let end = cmp::min(pos + 1, encoded.len());
            let mut input = InputCursor::new(&encoded[pos..end]);
            let (w, halt) = inf.inflate(&mut input, &mut byte, Flush::None);
            pos += input.consumed();
            got.extend_from_slice(&byte[..w]);
            if halt.unwrap() == Halt::End {
                break;
            }
        }
        assert_eq!(pos, encoded.len());
        assert_eq!(got, data);
    }

    #[test]
    fn auto_detects_both_framings() {
        let data = sample();
        for &v in &[15, 31] {
            let (out, halt) = inflate_all(47, &compress(v, &data));
            assert_eq!(halt, Ok(Halt::End));
            assert_eq!(out, data);
        }
    }

    #[test]
    fn hand_made_fixed_block() {
        // "abc" then a back-reference of length 3 at distance 3
        let mut w = BitWriter::new();
        let mut out = Vec::new();
        w.write(1, 1, &mut out);
        w.write(1, 2, &mut out);
        for &b in b"abc" {
            // literals 0..=143: 0x30 + b in eight bits, high bit first
            let code = 0x30 + u32::from(b);
            w.write(reverse(code, 8), 8, &mut out);
        }
        w.write(reverse(1, 7), 7, &mut out); // length 3
        w.write(reverse(2, 5), 5, &mut out); // distance 3
        w.write(0, 7, &mut out);
        w.align(&mut out);
        let (got, halt) = inflate_all(-15, &out);
        assert_eq!(halt, Ok(Halt::End));
        assert_eq!(got, b"abcabc".to_vec());
    }

    fn reverse(code: u32, len: u32) -> u32 {
        (0..len).fold(0, |acc, i| acc | (((code >> i) & 1) << (len - 1 - i)))
    }

    #[test]
    fn rejects_malformed_blocks() {
        let (_, halt) = inflate_all(-15, &[0x07]);
        assert_eq!(halt, Err(StreamError::Corrupt(Corruption::BlockType)));

        let (_, halt) = inflate_all(-15, &[0x01, 0x05, 0x00, 0xFA, 0xFE]);
        assert_eq!(halt, Err(StreamError::Corrupt(Corruption::StoredLength)));

        // fixed block: literal 'a', then length 3 at distance 2
        let mut w = BitWriter::new();
        let mut out = Vec::new();
        w.write(0b011, 3, &mut out);
        w.write(reverse(0x30 + u32::from(b'a'), 8), 8, &mut out);
        w.write(reverse(1, 7), 7, &mut out);
        w.write(reverse(1, 5), 5, &mut out);
        w.align(&mut out);
        let (got, halt) = inflate_all(-15, &out);
        assert_eq!(got, b"a".to_vec());
        let too_far = Err(StreamError::Corrupt(Corruption::DistanceTooFar));
        assert_eq!(halt, too_far);
    }

    #[test]
    fn eight_bit_zlib_takes_nine_bit_header() {
        let data = sample();
        let z = compress(8, &data);
        assert_eq!(z[0] >> 4, 1);
        let (got, halt) = inflate_all(8, &z);
        assert_eq!(halt, Ok(Halt::End));
        assert_eq!(got, data);
        let (got, halt) = inflate_all(-8, &compress(-8, &data));
        assert_eq!(halt, Ok(Halt::End));
        assert_eq!(got, data);
    }

    #[test]
    fn rejects_bad_trailers() {
        let data = sample();
        let mut z = compress(15, &data);
        let last = z.len() - 1;
        z[last] ^= 1;
        let checksum = Err(StreamError::Corrupt(Corruption::Checksum));
        assert_eq!(inflate_all(15, &z).1, checksum);

        let mut g = compress(31, &data);
        let last = g.len() - 1;
        g[last] ^= 1;
        let length = Err(StreamError::Corrupt(Corruption::Length));
        assert_eq!(inflate_all(31, &g).1, length);
    }

    #[test]
    fn stops_at_block_boundaries() {
        let mut d = deflater(15);
        let mut enc = vec![0; 256];
        let (_, a) = d.deflate(b"first", &mut enc, Flush::Block).unwrap();
        let rest = &mut enc[a..];
        let (_, b) = d.deflate(b"second", rest, Flush::Finish).unwrap();
        enc.truncate(a + b);

        let mut inf = Inflater::new(wbits(15, Mode::Decompress));
        let mut input = InputCursor::new(&enc);
        let mut out = vec![0; 64];
        let mut got = Vec::new();
        let mut stops = 0;
        loop {
            let (w, halt) = inf.inflate(&mut input, &mut out, Flush::Block);
            got.extend_from_slice(&out[..w]);
            match halt.unwrap() {
                Halt::BlockBoundary => {
                    assert!(inf.at_block_boundary());
                    stops += 1;
                }
                Halt::End => break,
                h => panic!("unexpected {:?}", h),
            }
        }
        // after the header, and after the first block
        assert_eq!(stops, 2);
        assert_eq!(got, b"firstsecond".to_vec());
    }

    #[test]
    fn dictionary_is_checked() {
        let mut d = deflater(15);
        d.set_dictionary(b"light work").unwrap();
        let mut enc = vec![0; 256];
        let (_, w) =
            d.deflate(b"light work!", &mut enc, Flush::Finish).unwrap();
        enc.truncate(w);

        let mut inf = Inflater::new(wbits(15, Mode::Decompress));
        let mut input = InputCursor::new(&enc);
        let mut out = vec![0; 64];
        let r = inf.inflate(&mut input, &mut out, Flush::None);
        assert_eq!(r, (0, Ok(Halt::NeedDict)));
        assert_eq!(inf.checksum(), crate::adler32(b"light work"));
        let mismatch = Err(StreamError::DictionaryMismatch);
        assert_eq!(inf.set_dictionary(b"heavy work"), mismatch);
        inf.set_dictionary(b"light work").unwrap();
        let (w, halt) = inf.inflate(&mut input, &mut out, Flush::None);
        assert_eq!(halt, Ok(Halt::End));
        assert_eq!(&out[..w], b"light work!");
        assert_eq!(inf.set_dictionary(b"late"), Err(StreamError::Misuse));
    }

    #[test]
    fn primed_bits_come_first() {
        let encoded = compress(-15, b"primed");
        let mut inf = Inflater::new(wbits(-15, Mode::Decompress));
        inf.prime(5, u32::from(encoded[0])).unwrap();
        let shifted = encoded
            .iter()
            .enumerate()
            .map(|(i, &b)| {
                (b >> 5) | encoded.get(i + 1).map_or(0, |&n| n << 3)
            })
            .collect::<Vec<u8>>();
        let mut input = InputCursor::new(&shifted);
        let mut out = vec![0; 16];
        let (w, halt) = inf.inflate(&mut input, &mut out, Flush::None);
        assert_eq!(halt, Ok(Halt::End));
        assert_eq!(&out[..w], b"primed");
    }

    #[test]
    fn reset_starts_over() {
        let data = sample();
        let encoded = compress(31, &data);
        let mut inf = Inflater::new(wbits(31, Mode::Decompress));
        let mut out = vec![0; data.len()];
        let mut input = InputCursor::new(&encoded[..encoded.len() / 2]);
        let _ = inf.inflate(&mut input, &mut out, Flush::None);
        inf.reset();
        let mut input = InputCursor::new(&encoded);
        let (w, halt) = inf.inflate(&mut input, &mut out, Flush::None);
        assert_eq!(halt, Ok(Halt::End));
        assert_eq!(&out[..w], &data[..]);
        assert!(inf.is_done());
    }
}
