//! Token-overlap similarity in the range 0 - 100.
//!
//! Each token of a candidate name is paired with its closest token in the
//! record text (by longest-common-subsequence ratio) and the per-token
//! ratios are averaged. A name whose tokens all occur verbatim scores 100;
//! a single dropped or swapped letter in a long word still scores above 90.

/// Upper-cased alphabetic tokens of `text`. Tokens containing digits (ID
/// codes, counts, dates) are never place or disease names and are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty() && !t.chars().any(|c| c.is_ascii_digit()))
        .map(str::to_uppercase)
        .collect()
}

/// Similarity of two tokens: `2 * LCS / (len_a + len_b)`, scaled to 0 - 100.
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }
    let lcs = lcs_len(&a, &b);
    ((200 * lcs + total / 2) / total) as u8
}

/// Score a candidate's tokens against the tokens of a text.
pub fn token_overlap_score(candidate: &[String], text: &[String]) -> u8 {
    if candidate.is_empty() || text.is_empty() {
        return 0;
    }
    let sum: u32 = candidate
        .iter()
        .map(|c| text.iter().map(|t| ratio(c, t)).max().unwrap_or(0) as u32)
        .sum();
    let n = candidate.len() as u32;
    ((sum + n / 2) / n) as u8
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
