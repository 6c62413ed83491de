//! Approximate string similarity and best-candidate search.
//!
//! Scores are integers on a 0-100 scale (100 = identical). The default
//! [`Scorer::Ratio`] is the indel-normalized edit similarity
//! `2 * LCS(a, b) / (|a| + |b|)`, computed over Unicode scalar values and
//! rounded half-to-even. The alternative scorers delegate to `strsim`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Similarity function used to compare a query with gazetteer names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scorer {
    /// Indel (insert/delete) edit similarity
    #[default]
    Ratio,
    /// `1 - levenshtein / max_len`
    Levenshtein,
    /// Jaro-Winkler similarity, favouring common prefixes
    JaroWinkler,
}

impl Scorer {
    /// Score two strings on the 0-100 scale. Either side empty scores 0.
    pub fn score(&self, a: &str, b: &str) -> u8 {
        if a.is_empty() || b.is_empty() {
            return 0;
        }
        match self {
            Scorer::Ratio => ratio(a, b),
            Scorer::Levenshtein => to_percent(strsim::normalized_levenshtein(a, b)),
            Scorer::JaroWinkler => to_percent(strsim::jaro_winkler(a, b)),
        }
    }
}

impl fmt::Display for Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scorer::Ratio => "ratio",
            Scorer::Levenshtein => "levenshtein",
            Scorer::JaroWinkler => "jaro_winkler",
        };
        f.write_str(name)
    }
}

impl FromStr for Scorer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ratio" | "indel" => Ok(Scorer::Ratio),
            "levenshtein" => Ok(Scorer::Levenshtein),
            "jaro_winkler" | "jaro-winkler" | "jarowinkler" => Ok(Scorer::JaroWinkler),
            other => Err(format!(
                "Unknown scorer '{}'. Use 'ratio', 'levenshtein', or 'jaro_winkler'",
                other
            )),
        }
    }
}

/// Indel similarity ratio on the 0-100 scale.
///
/// # Examples
///
/// ```
/// use vacancy_geo::algorithms::fuzzy::ratio;
///
/// assert_eq!(ratio("berlin", "berlin"), 100);
/// assert_eq!(ratio("koeln", "koln"), 89);
/// assert_eq!(ratio("berlin", ""), 0);
/// ```
pub fn ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let lensum = (a.len() + b.len()) as f64;
    let matched = (2 * longest_common_subsequence(&a, &b)) as f64;
    to_percent(matched / lensum)
}

/// Length of the longest common subsequence, two-row dynamic programming.
fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for &lc in long {
        for (j, &sc) in short.iter().enumerate() {
            curr[j + 1] = if lc == sc {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

fn to_percent(similarity: f64) -> u8 {
    (100.0 * similarity).round_ties_even().clamp(0.0, 100.0) as u8
}

/// A candidate picked by [`find_best_match`], with its position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub index: usize,
    pub value: &'a str,
}

/// Outcome of a best-match search. `candidate` is `None` when nothing scored
/// above zero, in which case `score` is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestMatch<'a> {
    pub candidate: Option<Candidate<'a>>,
    pub score: u8,
}

impl BestMatch<'_> {
    pub fn none() -> Self {
        Self {
            candidate: None,
            score: 0,
        }
    }
}

/// Best candidate for `query` under the default [`Scorer::Ratio`].
pub fn find_best_match<'a, S: AsRef<str>>(query: &str, candidates: &'a [S]) -> BestMatch<'a> {
    find_best_match_with(query, candidates, Scorer::Ratio)
}

/// Score every candidate in order and keep the first one reaching the
/// maximum: a later candidate replaces the current best only when it scores
/// strictly higher.
///
/// # Examples
///
/// ```
/// use vacancy_geo::algorithms::fuzzy::{find_best_match_with, Scorer};
///
/// let candidates = ["hamburg", "bamberg", "hamburg"];
/// let best = find_best_match_with("hamburg", &candidates, Scorer::Ratio);
/// assert_eq!(best.score, 100);
/// assert_eq!(best.candidate.map(|c| c.index), Some(0));
/// ```
pub fn find_best_match_with<'a, S: AsRef<str>>(
    query: &str,
    candidates: &'a [S],
    scorer: Scorer,
) -> BestMatch<'a> {
    let mut best = BestMatch::none();

    for (index, candidate) in candidates.iter().enumerate() {
        let value = candidate.as_ref();
        let score = scorer.score(query, value);
        if score > best.score {
            best = BestMatch {
                candidate: Some(Candidate { index, value }),
                score,
            };
            // Nothing can beat an exact match under strict comparison
            if score == 100 {
                break;
            }
        }
    }

    best
}
