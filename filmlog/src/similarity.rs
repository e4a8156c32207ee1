//! Gestalt (Ratcliff/Obershelp) text similarity
//!
//! Used by the inspect-by-description query: the ratio of matched characters
//! found by recursively locating the longest common contiguous block, as
//! `2 * M / (len_a + len_b)`, in [0, 1].

use crate::models::Film;

/// Minimum similarity for a description to count as a match
pub const SIMILARITY_THRESHOLD: f64 = 0.2;

/// Maximum number of ranked matches returned
pub const TOP_MATCHES: usize = 5;

/// Similarity ratio between two strings, in [0, 1]
///
/// Two empty strings are identical (ratio 1.0).
pub fn gestalt_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Total characters covered by recursive longest-common-block matching
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (ai, bi, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..ai], &b[..bi]) + matching_chars(&a[ai + len..], &b[bi + len..])
}

/// Longest common contiguous block as (start in a, start in b, length)
///
/// Ties resolve to the earliest position in `a`, then in `b`. Dynamic
/// programming over suffix-match lengths, O(|a|*|b|) time, O(|b|) space.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        let mut cur = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let run = prev[j] + 1;
                cur[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            }
        }
        prev = cur;
    }
    best
}

/// Rank a user's films by how similar their descriptions are to `input`
///
/// Both sides are lowercased. Matches below [`SIMILARITY_THRESHOLD`] are
/// dropped; at most [`TOP_MATCHES`] results are returned, most similar
/// first. Ties keep the films' storage order (stable sort).
pub fn rank_by_description<'a>(input: &str, films: &'a [Film]) -> Vec<(f64, &'a Film)> {
    let input = input.trim().to_lowercase();
    let mut matched: Vec<(f64, &Film)> = films
        .iter()
        .map(|film| (gestalt_ratio(&input, &film.description.to_lowercase()), film))
        .filter(|(similarity, _)| *similarity >= SIMILARITY_THRESHOLD)
        .collect();
    matched.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    matched.truncate(TOP_MATCHES);
    matched
}
