//! Sequence similarity between two titles.
//!
//! The ratio is the Ratcliff/Obershelp "gestalt pattern matching" measure: find the longest
//! common block of characters, recurse on both sides of it, and compare the total size of the
//! matched blocks against the combined length of both strings.

use std::collections::HashMap;

/// Length of `b` from which frequent characters are no longer used to anchor matching blocks.
const POPULAR_MIN_LEN: usize = 200;

/// Similarity ratio between `a` and `b` in the range `0.0..=1.0`.
///
/// The comparison is case sensitive and works on Unicode scalar values. Two empty strings are
/// considered identical.
///
/// # Examples
///
/// ```
/// use bibdoi::similarity::sequence_ratio;
///
/// assert_eq!(1.0, sequence_ratio("On Widgets", "On Widgets"));
/// assert_eq!(0.75, sequence_ratio("abcd", "bcde"));
/// assert_eq!(0.0, sequence_ratio("abc", "xyz"));
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matches = SequenceMatcher::new(&a, &b).matching_characters();
    2.0 * matches as f64 / total as f64
}

struct SequenceMatcher<'s> {
    a: &'s [char],
    b: &'s [char],
    // positions of each character in `b`, without the popular ones
    b2j: HashMap<char, Vec<usize>>,
}

impl<'s> SequenceMatcher<'s> {
    fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        if b.len() >= POPULAR_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b2j }
    }

    /// Total number of characters in all matching blocks.
    fn matching_characters(&self) -> usize {
        let mut total = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }

            total += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        total
    }

    /// Longest block `a[i..i + k] == b[j..j + k]` within the given bounds.
    ///
    /// Ties are broken by the earliest start in `a`, then the earliest start in `b`.
    fn find_longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // j2len[j] is the length of the match ending with a[i - 1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next_j2len = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
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
                        .unwrap_or_default()
                        + 1;
                    next_j2len.insert(j, k);

                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // popular characters never anchor a block but may still extend one
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }
}
