//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

fn down_heap(buf: &mut [usize], mut n: usize, len: usize) {
    let tmp = buf[n];
    let mut leaf = (n << 1) + 1;

    while leaf < len {
        if leaf + 1 < len && buf[buf[leaf]] > buf[buf[leaf + 1]] {
            leaf += 1;
        }

        if buf[tmp] < buf[buf[leaf]] {
            break;
        }
        buf[n] = buf[leaf];
        n = leaf;
        leaf = (n << 1) + 1;
    }
    buf[n] = tmp;
}

fn create_heap(buf: &mut [usize]) {
    let s = buf.len() >> 1;
    for i in (0..(s >> 1)).rev() {
        down_heap(buf, i, s);
    }
}

/// Unrestricted Huffman code lengths of `freq` (all non-zero), built in
/// place over a heap of node indices.
fn gen_code(freq: &[usize]) -> Vec<u8> {
    if freq.len() == 1 {
        return vec![1];
    }
    let mut buf = (freq.len()..(freq.len() << 1))
        .chain(freq.iter().cloned())
        .collect::<Vec<_>>();

    create_heap(&mut buf);

    // Generate Huffman Tree
    for i in (1..freq.len()).rev() {
        let m1 = buf[0];
        buf[0] = buf[i];
        down_heap(&mut buf, 0, i);
        let m2 = buf[0];
        buf[i] = buf[m1] + buf[m2];
        buf[0] = i;
        buf[m1] = i;
        buf[m2] = i;
        down_heap(&mut buf, 0, i);
    }

    // Counting
    buf[1] = 0;
    for i in 2..freq.len() {
        buf[i] = buf[buf[i]] + 1;
    }

    (0..freq.len())
        .map(|i| (buf[buf[i + freq.len()]] + 1) as usize)
        .map(|l| if l > 0xFF { 0xFF } else { l as u8 })
        .collect()
}

/// Clamp `lens` to `lim` bits while keeping the Kraft sum at most one.
/// The most frequent symbols keep the shortest codes.
fn limit_lengths(freq: &[usize], lens: &mut [u8], lim: usize) {
    let max = lens.iter().cloned().max().unwrap_or(0) as usize;
    if max <= lim {
        return;
    }
    let mut bl_count = vec![0_usize; lim + 1];
    for &l in lens.iter() {
        bl_count[core::cmp::min(l as usize, lim)] += 1;
    }
    let mut total = (1..=lim)
        .map(|i| bl_count[i] << (lim - i))
        .sum::<usize>();
    while total > (1 << lim) {
        bl_count[lim] -= 1;
        for i in (1..lim).rev() {
            if bl_count[i] != 0 {
                bl_count[i] -= 1;
                bl_count[i + 1] += 2;
                break;
            }
        }
        total -= 1;
    }

    let mut order = (0..lens.len()).collect::<Vec<_>>();
    order.sort_by(|&x, &y| freq[y].cmp(&freq[x]).then(x.cmp(&y)));
    let mut it = order.into_iter();
    for (len, &count) in bl_count.iter().enumerate().skip(1) {
        for _ in 0..count {
            if let Some(s) = it.next() {
                lens[s] = len as u8;
            }
        }
    }
}

/// Code lengths (at most `lim` bits) for every symbol of `freq`; symbols
/// with zero frequency get length zero.
pub(crate) fn make_table(freq: &[usize], lim: usize) -> Vec<u8> {
    let (s, l): (Vec<_>, Vec<_>) = freq
        .iter()
        .enumerate()
        .filter_map(|(i, &t)| if t != 0 { Some((i, t)) } else { None })
        .unzip();
    let mut table = vec![0; freq.len()];
    if s.is_empty() {
        return table;
    }
    let mut lens = gen_code(&l);
    limit_lengths(&l, &mut lens, lim);
    for (i, len) in s.into_iter().zip(lens) {
        table[i] = len;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kraft(tab: &[u8], lim: usize) -> usize {
        tab.iter()
            .filter(|&&l| l != 0)
            .map(|&l| 1 << (lim - l as usize))
            .sum()
    }

    #[test]
    fn create_haffman_tab() {
        let freq = vec![0, 1, 1, 2, 2, 4, 4, 8, 8];
        let tab = make_table(&freq, 12);

        assert_eq!(
            tab.iter()
                .zip(freq)
                .map(|(x, y)| *x as usize * y)
                .sum::<usize>(),
            80
        );
        assert_eq!(tab[0], 0);
    }

    #[test]
    fn create_haffman_tab_lim_len() {
        // Fibonacci weights force a maximally skewed tree.
        let mut freq = vec![1_usize, 1];
        while freq.len() < 30 {
            let n = freq[freq.len() - 1] + freq[freq.len() - 2];
            freq.push(n);
        }
        let tab = make_table(&freq, 7);
        assert!(*tab.iter().max().unwrap() <= 7);
        assert!(tab.iter().all(|&l| l != 0));
        assert_eq!(kraft(&tab, 7), 1 << 7);
    }

    #[test]
    fn create_haffman_tab_unit() {
        let freq = vec![0, 1, 0];
        let tab = make_table(&freq, 12);

        assert_eq!(tab, vec![0, 1, 0]);
    }

    #[test]
    fn create_haffman_tab_empty() {
        assert_eq!(make_table(&[0, 0, 0], 15), vec![0, 0, 0]);
    }
}
