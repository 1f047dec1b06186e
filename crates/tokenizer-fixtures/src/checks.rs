//! Invariants every generated fixture document must satisfy.
//!
//! A document that breaks one of these is never written. Round-trip
//! differences are not failures on their own (reference tokenizers may
//! normalize input); they are collected so callers can report them.

use std::collections::HashSet;

use crate::catalog::sibling_pairs;
use crate::error::{FixtureError, Result};
use crate::fixture::{FixtureCase, FixtureDocument};
use crate::reference::SpecialToken;

/// A case whose skip-special decode does not reproduce its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripDivergence {
    pub case: String,
    pub expected: String,
    pub decoded: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub cases_checked: usize,
    pub sibling_pairs_checked: usize,
    pub divergences: Vec<RoundTripDivergence>,
}

fn violation(case: &str, reason: impl Into<String>) -> FixtureError {
    FixtureError::Check {
        case: case.to_string(),
        reason: reason.into(),
    }
}

/// Check every case in `document`, then every flag/no-flag sibling pair.
pub fn check_document(document: &FixtureDocument, special: &[SpecialToken]) -> Result<CheckReport> {
    let special_ids: HashSet<u32> = special.iter().map(|token| token.id).collect();
    let mut report = CheckReport::default();

    for case in &document.test_cases {
        check_lengths(case)?;
        check_offsets(case, &special_ids)?;
        check_skip_special(case, special)?;

        if let Some(divergence) = round_trip(case, special) {
            report.divergences.push(divergence);
        }
        report.cases_checked += 1;
    }

    let pairs = sibling_pairs(&document.test_cases, |case| {
        (case.name.as_str(), case.flag.value())
    });
    for (with_flag, without_flag) in pairs {
        check_sibling(with_flag, without_flag)?;
        report.sibling_pairs_checked += 1;
    }

    Ok(report)
}

pub fn check_lengths(case: &FixtureCase) -> Result<()> {
    let expected = &case.expected;
    let count = expected.token_count;
    if expected.ids.len() != count || expected.tokens.len() != count || expected.offsets.len() != count
    {
        return Err(violation(
            &case.name,
            format!(
                "length mismatch: ids={} tokens={} offsets={} token_count={}",
                expected.ids.len(),
                expected.tokens.len(),
                expected.offsets.len(),
                count
            ),
        ));
    }
    Ok(())
}

/// Offsets of ordinary tokens stay inside the input and never move backwards.
/// Special tokens may carry synthetic spans and are skipped.
pub fn check_offsets(case: &FixtureCase, special_ids: &HashSet<u32>) -> Result<()> {
    let input_len = case.input.chars().count();
    let mut last_start = 0;

    for (&id, &(start, length)) in case.expected.ids.iter().zip(&case.expected.offsets) {
        if special_ids.contains(&id) {
            continue;
        }
        if start.checked_add(length).is_none_or(|end| end > input_len) {
            return Err(violation(
                &case.name,
                format!(
                    "token {} span ({}, {}) exceeds input length {}",
                    id, start, length, input_len
                ),
            ));
        }
        if start < last_start {
            return Err(violation(
                &case.name,
                format!("token {} starts at {} after a token at {}", id, start, last_start),
            ));
        }
        last_start = start;
    }
    Ok(())
}

pub fn check_skip_special(case: &FixtureCase, special: &[SpecialToken]) -> Result<()> {
    let decoded = &case.expected.decoded_skip_special;
    match special
        .iter()
        .find(|token| !token.content.is_empty() && decoded.contains(&token.content))
    {
        Some(token) => Err(violation(
            &case.name,
            format!("skip-special decode still contains {}", token.content),
        )),
        None => Ok(()),
    }
}

/// The flag may only add tokens at the edges: the ids without it must appear
/// as one contiguous run inside the ids with it.
pub fn check_sibling(with_flag: &FixtureCase, without_flag: &FixtureCase) -> Result<()> {
    if with_flag.input != without_flag.input {
        return Err(violation(
            &without_flag.name,
            format!("input differs from sibling {}", with_flag.name),
        ));
    }

    if !is_contiguous_run(&with_flag.expected.ids, &without_flag.expected.ids) {
        return Err(violation(
            &without_flag.name,
            format!("ids are not a contiguous run of {}'s ids", with_flag.name),
        ));
    }
    Ok(())
}

fn is_contiguous_run(haystack: &[u32], needle: &[u32]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}

/// Compare the skip-special decode against the input with special markers
/// removed.
pub fn round_trip(case: &FixtureCase, special: &[SpecialToken]) -> Option<RoundTripDivergence> {
    let mut expected = case.input.clone();
    for token in special.iter().filter(|token| !token.content.is_empty()) {
        expected = expected.replace(&token.content, "");
    }

    if expected == case.expected.decoded_skip_special {
        return None;
    }

    Some(RoundTripDivergence {
        case: case.name.clone(),
        expected,
        decoded: case.expected.decoded_skip_special.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::CaseFlag;
    use crate::normalize::EncodedResult;

    const EOS: u32 = 9;

    fn special() -> Vec<SpecialToken> {
        vec![SpecialToken {
            id: EOS,
            content: "<eos>".to_string(),
        }]
    }

    fn case(name: &str, flag: bool, ids: &[u32], offsets: &[(usize, usize)]) -> FixtureCase {
        let text: String = ids
            .iter()
            .filter(|&&id| id != EOS)
            .map(|&id| char::from(b'a' + id as u8))
            .collect();
        FixtureCase {
            name: name.to_string(),
            input: "abcdef".to_string(),
            flag: CaseFlag::AddSpecialTokens(flag),
            expected: EncodedResult {
                ids: ids.to_vec(),
                tokens: ids.iter().map(|id| id.to_string()).collect(),
                offsets: offsets.to_vec(),
                decoded: text.clone(),
                decoded_skip_special: text,
                token_count: ids.len(),
            },
        }
    }

    fn document(cases: Vec<FixtureCase>) -> FixtureDocument {
        FixtureDocument {
            model_name: "test".to_string(),
            vocabulary_size: 10,
            eos_token_id: EOS,
            pad_token_id: None,
            test_cases: cases,
        }
    }

    #[test]
    fn test_valid_pair_passes() {
        let doc = document(vec![
            case("x", true, &[0, 1, EOS], &[(0, 1), (1, 1), (0, 0)]),
            case("x_no_special", false, &[0, 1], &[(0, 1), (1, 1)]),
        ]);

        let report = check_document(&doc, &special()).unwrap();
        assert_eq!(report.cases_checked, 2);
        assert_eq!(report.sibling_pairs_checked, 1);
    }

    #[test]
    fn test_length_mismatch_fails() {
        let mut bad = case("x", false, &[0, 1], &[(0, 1), (1, 1)]);
        bad.expected.token_count = 3;
        assert!(matches!(check_lengths(&bad), Err(FixtureError::Check { .. })));
    }

    #[test]
    fn test_offset_past_end_fails() {
        let bad = case("x", false, &[0], &[(5, 2)]);
        let ids: HashSet<u32> = [EOS].into_iter().collect();
        assert!(check_offsets(&bad, &ids).is_err());
    }

    #[test]
    fn test_offset_overflowing_span_fails() {
        let bad = case("x", false, &[0], &[(usize::MAX, 2)]);
        let ids: HashSet<u32> = HashSet::new();
        assert!(matches!(check_offsets(&bad, &ids), Err(FixtureError::Check { .. })));
    }

    #[test]
    fn test_offset_going_backwards_fails() {
        let bad = case("x", false, &[0, 1], &[(3, 1), (1, 1)]);
        let ids: HashSet<u32> = HashSet::new();
        assert!(check_offsets(&bad, &ids).is_err());
    }

    #[test]
    fn test_special_offsets_exempt() {
        let ok = case("x", true, &[0, EOS], &[(2, 1), (0, 0)]);
        let ids: HashSet<u32> = [EOS].into_iter().collect();
        assert!(check_offsets(&ok, &ids).is_ok());
    }

    #[test]
    fn test_marker_in_skip_special_fails() {
        let mut bad = case("x", true, &[0, EOS], &[(0, 1), (0, 0)]);
        bad.expected.decoded_skip_special = "a<eos>".to_string();
        assert!(check_skip_special(&bad, &special()).is_err());
    }

    #[test]
    fn test_reordered_sibling_fails() {
        let with_flag = case("x", true, &[EOS, 1, 0], &[(0, 0), (1, 1), (0, 1)]);
        let without_flag = case("x_no_special", false, &[0, 1], &[(0, 1), (1, 1)]);
        assert!(check_sibling(&with_flag, &without_flag).is_err());
    }

    #[test]
    fn test_empty_sibling_is_contiguous() {
        assert!(is_contiguous_run(&[EOS], &[]));
        assert!(is_contiguous_run(&[], &[]));
        assert!(!is_contiguous_run(&[], &[1]));
    }

    #[test]
    fn test_round_trip_divergence_reported() {
        let mut diverging = case("x", false, &[0], &[(0, 1)]);
        diverging.input = "a ".to_string();
        let divergence = round_trip(&diverging, &special()).unwrap();
        assert_eq!(divergence.case, "x");
        assert_eq!(divergence.expected, "a ");
        assert_eq!(divergence.decoded, "a");
    }

    #[test]
    fn test_round_trip_strips_markers_from_input() {
        let mut matching = case("x", true, &[0, EOS], &[(0, 1), (1, 5)]);
        matching.input = "a<eos>".to_string();
        assert!(round_trip(&matching, &special()).is_none());
    }
}
