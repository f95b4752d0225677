//! Splitting pasted text into candidate patent numbers

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::normalizer::canonicalize;

/// Patent number found inside free text, with byte offsets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct ExtractedPatentNumber {
    /// Text as it appeared in the input
    pub value: String,
    pub canonical: String,
    pub start_index: u32,
    pub end_index: u32,
}

lazy_static! {
    // Two-letter office code, optional era/series letters, digits with the
    // separators people actually type, optional kind code.
    static ref PATENT_NUMBER_REGEX: Regex = Regex::new(
        r"\b(?P<id>[A-Z]{2}[ \-]?(?:[A-Z]{1,2}[ \-]?)?[0-9][0-9,./\-]*[0-9](?:[ \-]?[A-Z][0-9]?)?)\b"
    ).unwrap();
}

const DELIMITERS: &[char] = &['\n', '\r', '\t', ',', ';', '|'];

/// Split raw user input into candidate identifier tokens.
///
/// Thousands-separator commas inside numbers are kept, everything else on the
/// delimiter list splits. Within a segment, whitespace-separated words are
/// glued back together unless a word looks like the start of a new number, so
/// `US 8125463 B2` is one token and `US8125463B2 EP1234567A1` is two.
/// Order and repeats are preserved.
pub fn parse_identifiers(text: &str) -> Vec<String> {
    let cleaned = strip_thousands_separators(text);
    let mut tokens = Vec::new();

    for segment in cleaned.split(DELIMITERS) {
        let words: Vec<&str> = segment.split_whitespace().collect();
        let mut current = String::new();

        for (i, word) in words.iter().enumerate() {
            let next = words.get(i + 1).copied();
            if !current.is_empty() && starts_identifier(word, next) {
                tokens.push(std::mem::take(&mut current));
            }
            current.push_str(word);
        }

        if !current.is_empty() {
            tokens.push(current);
        }
    }

    tokens
}

#[cfg(feature = "uniffi")]
#[uniffi::export]
pub fn parse_identifiers_ffi(text: String) -> Vec<String> {
    parse_identifiers(&text)
}

/// Find patent numbers mentioned in prose
pub fn extract_patent_numbers(text: &str) -> Vec<ExtractedPatentNumber> {
    PATENT_NUMBER_REGEX
        .captures_iter(text)
        .filter_map(|cap| cap.name("id"))
        .map(|m| ExtractedPatentNumber {
            value: m.as_str().to_string(),
            canonical: canonicalize(m.as_str()),
            start_index: m.start() as u32,
            end_index: m.end() as u32,
        })
        .collect()
}

#[cfg(feature = "uniffi")]
#[uniffi::export]
pub fn extract_patent_numbers_ffi(text: String) -> Vec<ExtractedPatentNumber> {
    extract_patent_numbers(&text)
}

/// A word opens a new identifier if it carries its own office code
/// (`US8125463B2`), or is a bare office code followed by a number (`EP 1234567`).
fn starts_identifier(word: &str, next: Option<&str>) -> bool {
    let bytes = word.as_bytes();
    let has_office_prefix =
        bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1].is_ascii_alphabetic();
    if !has_office_prefix {
        return false;
    }

    if word.bytes().any(|b| b.is_ascii_digit()) {
        return true;
    }

    let bare_code = word.len() <= 3 && word.bytes().all(|b| b.is_ascii_alphabetic());
    let followed_by_number = next
        .and_then(|n| n.bytes().next())
        .is_some_and(|b| b.is_ascii_digit());
    bare_code && followed_by_number
}

/// Drop commas used as digit-group separators (`8,125,463`).
fn strip_thousands_separators(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == ',' && is_digit_group_comma(&chars, i) {
            continue;
        }
        out.push(c);
    }

    out
}

fn is_digit_group_comma(chars: &[char], i: usize) -> bool {
    let digit_at = |j: usize| chars.get(j).is_some_and(|c| c.is_ascii_digit());
    i > 0
        && digit_at(i - 1)
        && digit_at(i + 1)
        && digit_at(i + 2)
        && digit_at(i + 3)
        && !digit_at(i + 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_newlines_and_commas() {
        let tokens = parse_identifiers("US8125463B2\nEP1234567A1, GB1234567A;JPH081234");
        assert_eq!(
            tokens,
            vec!["US8125463B2", "EP1234567A1", "GB1234567A", "JPH081234"]
        );
    }

    #[test]
    fn test_parse_keeps_spaced_number_together() {
        assert_eq!(parse_identifiers("US 8125463 B2"), vec!["US8125463B2"]);
    }

    #[test]
    fn test_parse_thousands_separators() {
        assert_eq!(
            parse_identifiers("US 8,125,463 B2, EP 1,234,567"),
            vec!["US8125463B2", "EP1234567"]
        );
    }

    #[test]
    fn test_parse_space_separated_list() {
        assert_eq!(
            parse_identifiers("US8125463B2 EP1234567A1 EP 7654321 B1"),
            vec!["US8125463B2", "EP1234567A1", "EP7654321B1"]
        );
    }

    #[test]
    fn test_parse_preserves_repeats_and_hyphens() {
        assert_eq!(
            parse_identifiers("A | B | A\nUS-8125463-B2"),
            vec!["A", "B", "A", "US-8125463-B2"]
        );
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_identifiers("").is_empty());
        assert!(parse_identifiers(" ,, ;\n\t").is_empty());
    }

    #[test]
    fn test_comma_between_short_groups_splits() {
        assert_eq!(parse_identifiers("12,34"), vec!["12", "34"]);
    }

    #[test]
    fn test_extract_patent_numbers() {
        let text = "See US 8,125,463 B2 and the family member EP1234567A1.";
        let found = extract_patent_numbers(text);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].value, "US 8,125,463 B2");
        assert_eq!(found[0].canonical, "US-8125463-B2");
        assert_eq!(found[1].value, "EP1234567A1");
        assert_eq!(found[1].canonical, "EP-1234567-A1");
        assert_eq!(
            &text[found[1].start_index as usize..found[1].end_index as usize],
            "EP1234567A1"
        );
    }

    #[test]
    fn test_extract_wo_with_slash() {
        let found = extract_patent_numbers("published as WO 2015/123456 A1");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].canonical, "WO-2015/123456-A1");
    }
}
