//! Matching distinct location names against the gazetteer.
//!
//! Cost is `O(|names| x |gazetteer|)` similarity computations, so callers
//! deduplicate names first. Each name is matched independently, which lets the
//! outer loop run on the rayon pool; workers return owned [`MatchResult`]s that
//! are merged into a map afterwards.

use rayon::prelude::*;
use std::collections::HashMap;

use crate::algorithms::fuzzy::{find_best_match_with, Scorer};
use crate::core::domain::{Gazetteer, GazetteerMatch, MatchResult};

/// Match a single distinct name against all gazetteer names.
pub fn match_name(
    name: &str,
    gazetteer: &Gazetteer,
    candidates: &[&str],
    scorer: Scorer,
) -> MatchResult {
    let best = find_best_match_with(name, candidates, scorer);

    let best_match = best.candidate.and_then(|candidate| {
        gazetteer.get(candidate.index).map(|entry| GazetteerMatch {
            index: candidate.index,
            name: entry.name.clone(),
            point: entry.point(),
        })
    });

    match best_match {
        Some(best_match) => MatchResult {
            name: name.to_string(),
            best_match: Some(best_match),
            score: best.score,
        },
        None => MatchResult::no_match(name),
    }
}

/// Match every distinct name. Results come back in the order of `names`.
pub fn match_distinct_names(
    names: &[String],
    gazetteer: &Gazetteer,
    scorer: Scorer,
    parallel: bool,
) -> Vec<MatchResult> {
    let candidates = gazetteer.names();

    if parallel {
        names
            .par_iter()
            .map(|name| match_name(name, gazetteer, &candidates, scorer))
            .collect()
    } else {
        names
            .iter()
            .map(|name| match_name(name, gazetteer, &candidates, scorer))
            .collect()
    }
}

/// Index match results by the distinct name they were computed for.
pub fn index_matches(matches: &[MatchResult]) -> HashMap<String, MatchResult> {
    matches
        .iter()
        .map(|m| (m.name.clone(), m.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{GazetteerEntry, GeoPoint};

    fn gazetteer() -> Gazetteer {
        Gazetteer::new(vec![
            GazetteerEntry::new("berlin", 52.52, 13.40),
            GazetteerEntry::new("bremen", 53.08, 8.80),
            GazetteerEntry::new("muenchen", 48.14, 11.58),
            GazetteerEntry::new("berlin", 0.0, 0.0),
        ])
    }

    #[test]
    fn test_match_name_copies_coordinates() {
        let gaz = gazetteer();
        let candidates = gaz.names();
        let result = match_name("munchen", &gaz, &candidates, Scorer::Ratio);

        assert_eq!(result.name, "munchen");
        assert_eq!(result.score, 93);
        let best = result.best_match.unwrap();
        assert_eq!(best.name, "muenchen");
        assert_eq!(best.index, 2);
        assert_eq!(best.point, GeoPoint::new(48.14, 11.58));
    }

    #[test]
    fn test_duplicate_gazetteer_names_resolve_to_first_row() {
        let gaz = gazetteer();
        let candidates = gaz.names();
        let result = match_name("berlin", &gaz, &candidates, Scorer::Ratio);

        assert_eq!(result.score, 100);
        assert_eq!(result.best_match.as_ref().map(|m| m.index), Some(0));
        assert_eq!(result.point(), Some(GeoPoint::new(52.52, 13.40)));
    }

    #[test]
    fn test_no_match_against_empty_gazetteer() {
        let gaz = Gazetteer::default();
        let results = match_distinct_names(&["berlin".to_string()], &gaz, Scorer::Ratio, false);
        assert_eq!(results, vec![MatchResult::no_match("berlin")]);
        assert!(!results[0].is_match());
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let gaz = gazetteer();
        let names: Vec<String> = ["berlin", "bremn", "munich", "xyz", "muenchen", "brmen"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let sequential = match_distinct_names(&names, &gaz, Scorer::Ratio, false);
        let parallel = match_distinct_names(&names, &gaz, Scorer::Ratio, true);

        assert_eq!(sequential, parallel);
        let order: Vec<&str> = parallel.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(order, vec!["berlin", "bremn", "munich", "xyz", "muenchen", "brmen"]);
    }

    #[test]
    fn test_index_matches_is_keyed_by_name() {
        let gaz = gazetteer();
        let names = vec!["berlin".to_string(), "bremen".to_string()];
        let index = index_matches(&match_distinct_names(&names, &gaz, Scorer::Ratio, false));

        assert_eq!(index.len(), 2);
        assert_eq!(index["bremen"].score, 100);
        assert!(index.get("hamburg").is_none());
    }
}
