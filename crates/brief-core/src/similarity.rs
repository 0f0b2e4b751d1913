//! String similarity for duplicate hints.
//!
//! Ratcliff/Obershelp "gestalt" matching: find the longest common block,
//! recurse on both sides of it, and score `2 * matched / total_len`.

/// Similarity ratio in `[0.0, 1.0]` between two strings, by character.
///
/// Two empty strings are identical (1.0).
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matched_chars(&a, &b);
    2.0 * matched as f64 / total as f64
}

/// Total characters in all matching blocks.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, k) = longest_block(a, b, a_lo, a_hi, b_lo, b_hi);
        if k == 0 {
            continue;
        }
        matched += k;
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + k < a_hi && j + k < b_hi {
            pending.push((i + k, a_hi, j + k, b_hi));
        }
    }

    matched
}

/// Longest common block of `a[a_lo..a_hi]` and `b[b_lo..b_hi]`.
///
/// Returns `(i, j, len)`; among equally long blocks the one starting
/// earliest in `a`, then earliest in `b`, wins.
fn longest_block(
    a: &[char],
    b: &[char],
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let mut best = (a_lo, b_lo, 0);
    // run[j] = length of the common run ending at a[i-1], b[j-1]
    let mut prev = vec![0usize; b_hi - b_lo + 1];
    let mut run = vec![0usize; b_hi - b_lo + 1];

    for i in a_lo..a_hi {
        for j in b_lo..b_hi {
            let slot = j - b_lo + 1;
            run[slot] = if a[i] == b[j] { prev[slot - 1] + 1 } else { 0 };
            let k = run[slot];
            if k > best.2 {
                best = (i + 1 - k, j + 1 - k, k);
            }
        }
        std::mem::swap(&mut prev, &mut run);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_and_empty() {
        assert!(close(sequence_ratio("acme", "acme"), 1.0));
        assert!(close(sequence_ratio("", ""), 1.0));
        assert!(close(sequence_ratio("acme", ""), 0.0));
        assert!(close(sequence_ratio("abc", "xyz"), 0.0));
    }

    #[test]
    fn test_known_ratios() {
        // " doe" plus "j": 5 matched of 13.
        assert!(close(sequence_ratio("jane doe", "j doe"), 10.0 / 13.0));
        // "abcd" vs "bcde": block "bcd".
        assert!(close(sequence_ratio("abcd", "bcde"), 0.75));
        // One character dropped from a long name.
        let r = sequence_ratio("jonathan smith", "jonathon smith");
        assert!(r > 0.9 && r < 1.0);
    }

    #[test]
    fn test_symmetric_on_simple_input() {
        assert!(close(
            sequence_ratio("acme holdings", "acme holding"),
            sequence_ratio("acme holding", "acme holdings")
        ));
    }

    #[test]
    fn test_unicode_counts_characters() {
        assert!(close(sequence_ratio("josé", "jose"), 0.75));
    }
}
