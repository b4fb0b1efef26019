//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

use crate::lzss::{LzssCode, MatchInfo};
use crate::params::{CompressionConfig, Search, Strategy};
#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
use core::cmp;

pub(crate) const MIN_MATCH: usize = 3;
pub(crate) const MAX_MATCH: usize = 258;
/// Bytes that must be buffered ahead of the cursor before a token is cut
/// without a flush.
pub(crate) const MIN_LOOKAHEAD: usize = MAX_MATCH + MIN_MATCH + 1;
/// Length-3 matches farther than this cost more than three literals.
const TOO_FAR: usize = 4096;

/// Chained hash heads over a sliding window of `2 * w_size` bytes.
///
/// `head` and `prev` store positions plus one; zero ends a chain.
#[derive(Clone, Debug)]
pub(crate) struct SlideDict {
    buf: Vec<u8>,
    w_size: usize,
    w_mask: usize,
    head: Vec<u32>,
    prev: Vec<u32>,
    hash_mask: usize,
    hash_shift: usize,
    strstart: usize,
    lookahead: usize,
    next_insert: usize,
    floor: usize,
}

impl SlideDict {
    pub fn new(w_bits: u8, mem_level: u8) -> Self {
        let w_size = 1_usize << w_bits;
        let hash_bits = usize::from(mem_level) + 7;
        Self {
            buf: vec![0; w_size << 1],
            w_size,
            w_mask: w_size - 1,
            head: vec![0; 1 << hash_bits],
            prev: vec![0; w_size],
            hash_mask: (1 << hash_bits) - 1,
            hash_shift: (hash_bits + MIN_MATCH - 1) / MIN_MATCH,
            strstart: 0,
            lookahead: 0,
            next_insert: 0,
            floor: 0,
        }
    }

    pub fn reset(&mut self) {
        for h in self.head.iter_mut().chain(self.prev.iter_mut()) {
            *h = 0;
        }
        self.strstart = 0;
        self.lookahead = 0;
        self.next_insert = 0;
        self.floor = 0;
    }

    /// Farthest distance a match may reach back.
    #[inline]
    pub fn max_dist(&self) -> usize {
        self.w_size - MIN_LOOKAHEAD
    }

    #[inline]
    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    /// Copy as much of `data` as fits behind the lookahead.
    pub fn fill(&mut self, data: &[u8]) -> usize {
        if self.strstart >= self.w_size + self.max_dist() {
            self.slide();
        }
        let end = self.strstart + self.lookahead;
        let n = cmp::min(self.buf.len() - end, data.len());
        self.buf[end..end + n].copy_from_slice(&data[..n]);
        self.lookahead += n;
        n
    }

    fn slide(&mut self) {
        let w = self.w_size;
        debug_assert!(self.strstart >= w);
        let end = self.strstart + self.lookahead;
        self.buf.copy_within(w..end, 0);
        self.strstart -= w;
        self.next_insert = self.next_insert.saturating_sub(w);
        self.floor = self.floor.saturating_sub(w);
        let w = w as u32;
        for h in self.head.iter_mut().chain(self.prev.iter_mut()) {
            *h = if *h > w { *h - w } else { 0 };
        }
        trace!("window slid by {}", w);
    }

    #[inline]
    fn hash(&self, pos: usize) -> usize {
        let b = &self.buf[pos..pos + MIN_MATCH];
        ((usize::from(b[0]) << (self.hash_shift << 1))
            ^ (usize::from(b[1]) << self.hash_shift)
            ^ usize::from(b[2]))
            & self.hash_mask
    }

    /// Insert every position before `upto` that has three bytes to hash.
    fn catch_up(&mut self, upto: usize) {
        let avail_end =
            (self.strstart + self.lookahead).saturating_sub(MIN_MATCH - 1);
        let end = cmp::min(upto, avail_end);
        let start = cmp::max(
            self.next_insert,
            upto.saturating_sub(self.max_dist() + 1),
        );
        for pos in start..end {
            let h = self.hash(pos);
            self.prev[pos & self.w_mask] = self.head[h];
            self.head[h] = pos as u32 + 1;
        }
        self.next_insert = cmp::max(self.next_insert, end);
    }

    #[inline]
    fn match_len(&self, cand: usize, pos: usize, max_len: usize) -> usize {
        self.buf[cand..cand + max_len]
            .iter()
            .zip(&self.buf[pos..pos + max_len])
            .take_while(|&(x, y)| x == y)
            .count()
    }

    /// Longest match for `pos` that beats `prev_len`.
    pub fn longest_match(
        &mut self,
        pos: usize,
        prev_len: usize,
        config: &CompressionConfig,
    ) -> Option<MatchInfo> {
        let ahead = self.strstart + self.lookahead - pos;
        let max_len = cmp::min(MAX_MATCH, ahead);
        if max_len < MIN_MATCH {
            return None;
        }
        self.catch_up(pos + 1);

        let limit = cmp::max(self.floor, pos.saturating_sub(self.max_dist()));
        let mut chain = if prev_len >= config.good_length {
            cmp::max(config.max_chain >> 2, 1)
        } else {
            config.max_chain
        };
        let nice = cmp::min(config.nice_length, max_len);
        let mut best_len = cmp::max(prev_len, MIN_MATCH - 1);
        let mut best = None;

        let mut cur = self.head[self.hash(pos)];
        while cur != 0 && chain > 0 {
            chain -= 1;
            let cand = (cur - 1) as usize;
            cur = self.prev[cand & self.w_mask];
            if cand >= pos {
                continue;
            }
            if cand < limit {
                break;
            }
            if best_len >= max_len
                || self.buf[cand + best_len] != self.buf[pos + best_len]
            {
                continue;
            }
            let len = self.match_len(cand, pos, max_len);
            if len > best_len {
                best_len = len;
                best = Some(MatchInfo {
                    len,
                    pos: pos - cand - 1,
                });
                if len >= nice {
                    break;
                }
            }
        }
        best
    }

    /// Run of the byte just before `pos`.
    pub fn rle_match(&self, pos: usize) -> Option<MatchInfo> {
        if pos == 0 || pos - 1 < self.floor {
            return None;
        }
        let ahead = self.strstart + self.lookahead - pos;
        let max_len = cmp::min(MAX_MATCH, ahead);
        let c = self.buf[pos - 1];
        let len = self.buf[pos..pos + max_len]
            .iter()
            .take_while(|&&b| b == c)
            .count();
        if len >= MIN_MATCH {
            Some(MatchInfo { len, pos: 0 })
        } else {
            None
        }
    }

    fn acceptable(m: &MatchInfo, strategy: Strategy) -> bool {
        match strategy {
            Strategy::Filtered if m.len <= 5 => false,
            _ => !(m.len == MIN_MATCH && m.pos >= TOO_FAR),
        }
    }

    /// Cut the next token at the cursor and step over it. Without
    /// `flushing`, nothing is cut until a full match length is buffered.
    pub fn next_code(
        &mut self,
        config: &CompressionConfig,
        strategy: Strategy,
        flushing: bool,
    ) -> Option<LzssCode> {
        let short = self.lookahead < MIN_LOOKAHEAD && !flushing;
        if self.lookahead == 0 || short {
            return None;
        }
        let pos = self.strstart;
        let literal = LzssCode::Symbol(self.buf[pos]);
        let code = match (config.search, strategy) {
            (Search::Stored, _) | (_, Strategy::HuffmanOnly) => literal,
            (_, Strategy::Rle) => {
                self.rle_match(pos).map_or(literal, LzssCode::from)
            }
            (search, _) => {
                match self
                    .longest_match(pos, 0, config)
                    .filter(|m| Self::acceptable(m, strategy))
                {
                    Some(m)
                        if search == Search::Lazy && m.len < config.max_lazy =>
                    {
                        let better = self
                            .longest_match(pos + 1, m.len, config)
                            .filter(|m| Self::acceptable(m, strategy));
                        if better.is_some() {
                            literal
                        } else {
                            m.into()
                        }
                    }
                    Some(m) => m.into(),
                    None => literal,
                }
            }
        };
        self.advance(code.len());
        Some(code)
    }

    /// The `n` bytes just stepped over.
    #[inline]
    pub fn recent(&self, n: usize) -> &[u8] {
        &self.buf[self.strstart - n..self.strstart]
    }

    #[inline]
    fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.lookahead);
        self.strstart += n;
        self.lookahead -= n;
    }

    /// Forget every match source; later matches start at the cursor.
    pub fn reset_matches(&mut self) {
        for h in self.head.iter_mut() {
            *h = 0;
        }
        self.floor = self.strstart;
        self.next_insert = cmp::max(self.next_insert, self.strstart);
    }

    /// Load `dict` as history behind the cursor. Only the last `w_size`
    /// bytes are kept.
    pub fn set_dictionary(&mut self, dict: &[u8]) {
        debug_assert_eq!(self.lookahead, 0);
        let dict = if dict.len() > self.w_size {
            &dict[dict.len() - self.w_size..]
        } else {
            dict
        };
        if self.strstart + dict.len() > self.buf.len() {
            self.slide();
        }
        let start = self.strstart;
        self.buf[start..start + dict.len()].copy_from_slice(dict);
        self.strstart += dict.len();
        debug!("{} dictionary bytes loaded into the window", dict.len());
    }
}
