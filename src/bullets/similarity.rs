//! Fuzzy similarity ratio (Ratcliff/Obershelp gestalt matching)
//!
//! `ratio(a, b) = 2*M / (len(a) + len(b))` over characters, where `M` sums
//! the matching blocks found by taking the longest common run and recursing on
//! the unmatched pieces to its left and right.
//!
//! When `b` has at least [`AUTOJUNK_MIN_LEN`] characters, characters that make
//! up more than 1% of `b` cannot seed a match (they can still extend one).
//! This keeps scores identical to the common sequence-matcher implementation,
//! including its quirks on long, repetitive strings.

use std::collections::HashMap;

/// Length of `b` from which popular characters are ignored as match seeds
pub const AUTOJUNK_MIN_LEN: usize = 200;

/// Similarity ratio in `[0, 1]`. Two empty strings score `1.0`.
///
/// Not symmetric in general: `b` is the indexed side.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matcher = Matcher::new(&a, &b);
    2.0 * matcher.matched_chars() as f64 / total as f64
}

struct Matcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// positions of each usable character in `b`, ascending
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> Matcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b2j }
    }

    /// Longest matching block in `a[alo..ahi]` x `b[blo..bhi]` as
    /// `(i, j, size)`. Ties go to the earliest `i`, then the earliest `j`.
    fn longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (a, b) = (self.a, self.b);
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);

        // run length of matches ending at b[j] for the previous row of a
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // grow the block over equal neighbours, popular characters included
        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && a[besti + bestsize] == b[bestj + bestsize]
        {
            bestsize += 1;
        }

        (besti, bestj, bestsize)
    }

    /// Total size of all matching blocks
    fn matched_chars(&self) -> usize {
        let mut matched = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_ratio_identical_and_empty() {
        assert!(close(ratio("abc", "abc"), 1.0));
        assert!(close(ratio("", ""), 1.0));
        assert!(close(ratio("abc", ""), 0.0));
        assert!(close(ratio("", "abc"), 0.0));
    }

    #[test]
    fn test_ratio_disjoint() {
        assert!(close(ratio("abc", "xyz"), 0.0));
    }

    #[test]
    fn test_ratio_known_values() {
        // "bcd" is the only block
        assert!(close(ratio("abcd", "bcde"), 0.75));
        // "llo" then "h" on the left
        assert!(close(ratio("hello", "hallo"), 0.8));
        // " sharply" + " rise" + "cost" = 17 matched chars of 36
        assert!(close(
            ratio("costs rise sharply", "cost rises sharply"),
            34.0 / 36.0
        ));
    }

    #[test]
    fn test_ratio_crossing_blocks_count_once() {
        // the first longest block wins, the crossing one is lost
        assert!(close(ratio("ab cd", "cd ab"), 0.4));
        assert!(close(ratio("cd ab", "ab cd"), 0.4));
    }

    #[test]
    fn test_ratio_unicode_counts_chars() {
        assert!(close(ratio("café", "cafe"), 0.75));
    }

    #[test]
    fn test_autojunk_applies_only_to_long_b() {
        let short = format!("b{}", "a".repeat(AUTOJUNK_MIN_LEN - 2));
        let shifted = format!("{}b", "a".repeat(AUTOJUNK_MIN_LEN - 2));
        assert!(ratio(&short, &shifted) > 0.99);

        // only the rare 'b' can seed a match once b is long enough
        let long = format!("b{}", "a".repeat(AUTOJUNK_MIN_LEN));
        let shifted = format!("{}b", "a".repeat(AUTOJUNK_MIN_LEN));
        assert!(close(ratio(&long, &shifted), 2.0 / 402.0));
    }

    #[test]
    fn test_autojunk_identical_strings_still_match() {
        // an empty best block at the origin is grown over equal characters
        let long = "a".repeat(AUTOJUNK_MIN_LEN);
        assert!(close(ratio(&long, &long), 1.0));
    }

    #[test]
    fn test_autojunk_popular_chars_extend_matches() {
        // 'x' is rare and seeds the match, the popular spaces around it extend it
        let b = format!("{}x{}", " ".repeat(150), " ".repeat(100));
        let a = " x ".to_string();
        assert!(close(ratio(&a, &b), 6.0 / (3.0 + 251.0)));
    }
}
