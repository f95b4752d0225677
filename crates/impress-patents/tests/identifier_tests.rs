//! Patent identifier integration tests
//!
//! Enhanced with property-based testing for the idempotence guarantees the
//! deduplication engine relies on.

use impress_patents::{
    canonicalize, correct, extract_patent_numbers, is_canonical, normalize, parse_identifiers,
    PatentIdentifier,
};
use proptest::prelude::*;
use rstest::rstest;

// === Normalization ===

#[rstest]
#[case("US8125463B2", "US-8125463-B2")]
#[case("US-8125463-B2", "US-8125463-B2")]
#[case("us 8,125,463 b2", "US-8125463-B2")]
#[case("EP 1 234 567 A1", "EP-1234567-A1")]
#[case("GB1234567A", "GB-1234567-A")]
#[case("DE10234567C1", "DE-10234567-C1")]
#[case("KR101234567B1", "KR-101234567-B1")]
fn test_normalize_cases(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(normalize(input), expected);
}

#[rstest]
#[case("WO2015123456A1")]
#[case("US8125463B2")]
#[case("KR 10-1234567 B1")]
#[case("JPS60123456A")]
fn test_normalize_keeps_canonical_output(#[case] raw: &str) {
    let canonical = canonicalize(raw);
    assert!(is_canonical(&canonical));
    assert_eq!(normalize(&canonical), canonical);
}

#[test]
fn test_normalize_japanese_era() {
    let canonical = normalize("JPH081234");
    assert_eq!(canonical, "JP-19961234");

    let id = PatentIdentifier::parse("JPH081234");
    assert_eq!(id.country_code.as_deref(), Some("JP"));
    assert!(id.serial_number.unwrap().starts_with("1996"));
}

#[test]
fn test_normalize_era_only_for_japan() {
    // H is an ordinary character outside JP
    assert_eq!(normalize("USH081234"), "US-H081234");
    assert!(!normalize("USH081234").contains("1996"));
}

#[rstest]
#[case("A")]
#[case("")]
#[case("hello world")]
#[case("1234567")]
#[case("X")]
fn test_unparseable_passes_through(#[case] input: &str) {
    assert_eq!(normalize(input), input);
    assert_eq!(correct(input), input);
    assert_eq!(canonicalize(input), input);
}

// === Correction ===

#[rstest]
#[case("WO2015123456A1", "WO-2015/123456-A1")]
#[case("WO 2015/123456 A1", "WO-2015/123456-A1")]
#[case("KR101234567B1", "KR-1234567-B1")]
#[case("KR 10-1234567", "KR-1234567")]
#[case("CN101234567A", "CN-1234567-A")]
#[case("JPS60123456A", "JP-1985123456-A")]
#[case("RU2123456C1", "RU-2123456-C1")]
fn test_canonicalize_cases(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(canonicalize(input), expected);
}

#[test]
fn test_compact_and_hyphenated_collapse() {
    assert_eq!(canonicalize("US8125463B2"), canonicalize("US-8125463-B2"));
    assert_eq!(
        canonicalize("KR101234567B1"),
        canonicalize("KR-1234567-B1")
    );
}

// === Parsing ===

#[test]
fn test_parse_then_canonicalize_pasted_list() {
    let text = "US8125463B2, US-8125463-B2\nGB1234567A";
    let canonical: Vec<String> = parse_identifiers(text)
        .iter()
        .map(|raw| canonicalize(raw))
        .collect();
    assert_eq!(canonical, vec!["US-8125463-B2", "US-8125463-B2", "GB-1234567-A"]);
}

#[test]
fn test_extract_from_prose() {
    let found = extract_patent_numbers("Compare JP 2001-234567 A with US 8,125,463 B2.");
    let canonical: Vec<&str> = found.iter().map(|f| f.canonical.as_str()).collect();
    assert_eq!(canonical, vec!["JP-2001234567-A", "US-8125463-B2"]);
}

// === Properties ===

fn patent_like() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z]{2}[HSRhsr]?[0-9]{1,12}([A-Za-z][0-9]{0,2})?",
        "(US|EP|WO|JP|KR|CN|GB|DE|FR|CH|RU|SU)[ -]?[0-9]{4,11}[ -]?([A-Z][0-9]?)?",
        "(KR|CN)(10)?[0-9]{7}[A-Z][0-9]",
        "JP[HSR][0-9]{2,8}",
        ".{0,24}",
    ]
}

proptest! {
    #[test]
    fn normalize_is_idempotent(raw in patent_like()) {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_keeps_canonical_forms(raw in patent_like()) {
        let canonical = canonicalize(&raw);
        if is_canonical(&canonical) {
            prop_assert_eq!(normalize(&canonical), canonical);
        }
    }

    #[test]
    fn correct_is_idempotent(raw in patent_like()) {
        let once = correct(&raw);
        prop_assert_eq!(correct(&once), once);
    }

    #[test]
    fn canonicalize_is_idempotent(raw in patent_like()) {
        let once = canonicalize(&raw);
        prop_assert_eq!(canonicalize(&once), once);
    }

    #[test]
    fn parsed_identifiers_are_canonical(raw in patent_like()) {
        let id = PatentIdentifier::parse(&raw);
        if id.is_parsed() {
            prop_assert!(is_canonical(&id.canonical));
            prop_assert_eq!(id.canonical.to_ascii_uppercase(), id.canonical.clone());
        } else {
            prop_assert_eq!(id.canonical, raw);
        }
    }
}
