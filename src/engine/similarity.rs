//! Ratcliff/Obershelp string similarity
//!
//! Finds the longest common block, recurses on the unmatched text to either
//! side, and scores `2 * matched / (len(a) + len(b))`. The block search
//! mirrors the classic gestalt matcher: ties prefer the earliest block in `a`,
//! then in `b`, and characters that are very common in a long `b` are not used
//! as match seeds.

use rustc_hash::FxHashMap;

/// Length of `b` at which the popular-character heuristic kicks in
const AUTOJUNK_MIN_LEN: usize = 200;

/// A matching block: `a[a_start..a_start + len] == b[b_start..b_start + len]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub len: usize,
}

struct Matcher<'s> {
    a: &'s [char],
    b: &'s [char],
    /// Positions of each seedable character in `b`, ascending
    b_index: FxHashMap<char, Vec<usize>>,
}

impl<'s> Matcher<'s> {
    fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b_index: FxHashMap<char, Vec<usize>> = FxHashMap::default();
        for (j, &ch) in b.iter().enumerate() {
            b_index.entry(ch).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let threshold = b.len() / 100 + 1;
            b_index.retain(|_, positions| positions.len() <= threshold);
        }

        Self { a, b, b_index }
    }

    /// Longest block inside `a[alo..ahi]` x `b[blo..bhi]`
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchBlock {
        let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);
        // run length of the match ending at b[j], for the previous row of a
        let mut prev_runs: FxHashMap<usize, usize> = FxHashMap::default();

        for i in alo..ahi {
            let mut runs: FxHashMap<usize, usize> = FxHashMap::default();
            if let Some(positions) = self.b_index.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let run = j
                        .checked_sub(1)
                        .and_then(|prev| prev_runs.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    runs.insert(j, run);
                    if run > best_len {
                        best_i = i + 1 - run;
                        best_j = j + 1 - run;
                        best_len = run;
                    }
                }
            }
            prev_runs = runs;
        }

        // Popular characters never seed a match but may extend one.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_len += 1;
        }
        while best_i + best_len < ahi
            && best_j + best_len < bhi
            && self.a[best_i + best_len] == self.b[best_j + best_len]
        {
            best_len += 1;
        }

        MatchBlock {
            a_start: best_i,
            b_start: best_j,
            len: best_len,
        }
    }

    fn matching_blocks(&self) -> Vec<MatchBlock> {
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let block = self.longest_match(alo, ahi, blo, bhi);
            if block.len == 0 {
                continue;
            }
            let (i, j, k) = (block.a_start, block.b_start, block.len);
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
            blocks.push(block);
        }

        blocks.sort_by_key(|block| (block.a_start, block.b_start));
        blocks
    }
}

/// All non-overlapping matching blocks between `a` and `b`, in order
#[must_use]
pub fn matching_blocks(a: &str, b: &str) -> Vec<MatchBlock> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    Matcher::new(&a, &b).matching_blocks()
}

/// Similarity ratio in `[0, 1]`
///
/// Two empty strings are identical (ratio 1.0).
///
/// # Examples
/// ```
/// use acronym_puzzles::engine::similarity_ratio;
///
/// assert_eq!(similarity_ratio("abcd", "abcd"), 1.0);
/// assert_eq!(similarity_ratio("abcd", "wxyz"), 0.0);
/// assert!((similarity_ratio("abcd", "bcde") - 0.75).abs() < 1e-9);
/// ```
#[must_use]
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched: usize = Matcher::new(&a, &b)
        .matching_blocks()
        .iter()
        .map(|block| block.len)
        .sum();

    2.0 * matched as f64 / total as f64
}
