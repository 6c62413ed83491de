//! Canonicalization of free-text location names.
//!
//! City names in the vacancy export are typed by hand: trailing blanks, mixed
//! case and umlauts spelled either way. Both the vacancy names and the
//! gazetteer names go through the same normalization before matching.

use serde::{Deserialize, Serialize};

/// German special characters and their ASCII transliterations, applied in order.
pub const GERMAN_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("Ä", "Ae"),
    ("ä", "ae"),
    ("Ö", "Oe"),
    ("ö", "oe"),
    ("Ü", "ue"),
    ("ü", "ue"),
    ("ß", "ss"),
];

/// Normalize with the German substitution table.
///
/// # Examples
///
/// ```
/// use vacancy_geo::preprocessing::normalizer::normalize;
///
/// assert_eq!(normalize("  München "), "muenchen");
/// assert_eq!(normalize("GIESSEN"), "giessen");
/// assert_eq!(normalize("Straße"), "strasse");
/// ```
pub fn normalize(raw: &str) -> String {
    normalize_with(raw, GERMAN_SUBSTITUTIONS)
}

/// Trim, lowercase, then apply each `(pattern, replacement)` pair as a literal
/// substring replace, left to right over the table.
pub fn normalize_with<P, R>(raw: &str, substitutions: &[(P, R)]) -> String
where
    P: AsRef<str>,
    R: AsRef<str>,
{
    let mut value = raw.trim().to_lowercase();
    for (pattern, replacement) in substitutions {
        let pattern = pattern.as_ref();
        if !pattern.is_empty() && value.contains(pattern) {
            value = value.replace(pattern, replacement.as_ref());
        }
    }
    value
}

/// Owned substitution table, loadable from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalizer {
    substitutions: Vec<(String, String)>,
}

impl Normalizer {
    pub fn new(substitutions: Vec<(String, String)>) -> Self {
        Self { substitutions }
    }

    pub fn normalize(&self, raw: &str) -> String {
        normalize_with(raw, &self.substitutions)
    }

    pub fn substitutions(&self) -> &[(String, String)] {
        &self.substitutions
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            substitutions: GERMAN_SUBSTITUTIONS
                .iter()
                .map(|(p, r)| (p.to_string(), r.to_string()))
                .collect(),
        }
    }
}
