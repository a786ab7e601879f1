use std::cmp::Ordering;

use crate::foundation::core::NamedRaster;

/// Frame number of a depth-map file name: the digit run immediately before the final
/// extension (`depth_12.png` -> 12). Names without such digits, or without an extension, map
/// to 0. Numbers too large for `u64` saturate.
pub fn frame_number_key(name: &str) -> u64 {
    let Some((stem, ext)) = name.rsplit_once('.') else {
        return 0;
    };
    if ext.is_empty() {
        return 0;
    }
    let digits_start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);
    match digits_start {
        Some(i) => stem[i..].parse().unwrap_or(u64::MAX),
        None => 0,
    }
}

/// Numeric-aware ordering: digit runs compare by value, other runs case-insensitively.
/// Names equal under those rules fall back to a plain byte comparison.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut lhs = Chunks::new(a);
    let mut rhs = Chunks::new(b);
    loop {
        match (lhs.next(), rhs.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = compare_chunks(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Stable-sort a batch of depth maps by [`frame_number_key`]; ties keep load order.
pub fn sort_depth_inputs(batch: &mut [NamedRaster]) {
    batch.sort_by_key(|r| frame_number_key(&r.name));
}

/// Sort a batch of textures by [`natural_cmp`] of their names.
pub fn sort_texture_inputs(batch: &mut [NamedRaster]) {
    batch.sort_by(|a, b| natural_cmp(&a.name, &b.name));
}

#[derive(Clone, Copy, Debug)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn compare_chunks(a: Chunk<'_>, b: Chunk<'_>) -> Ordering {
    match (a, b) {
        (Chunk::Digits(x), Chunk::Digits(y)) => {
            let x = x.trim_start_matches('0');
            let y = y.trim_start_matches('0');
            x.len().cmp(&y.len()).then_with(|| x.cmp(y))
        }
        (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
        (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
        (Chunk::Text(x), Chunk::Text(y)) => x
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(y.chars().flat_map(char::to_lowercase)),
    }
}

struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Chunks<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(self.rest.len());
        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;
        Some(if digits {
            Chunk::Digits(head)
        } else {
            Chunk::Text(head)
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/order.rs"]
mod tests;
