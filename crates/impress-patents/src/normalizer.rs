//! Generic patent number normalization
//!
//! `normalize` applies a single country/serial/kind pattern to the
//! alphanumeric content of the input. Anything it cannot parse is returned
//! untouched so that a later validity check can reject it explicitly.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::corrector::correct;
use crate::era::{convert_era_serial, JapaneseEra};
use crate::error::IdentifierError;
use crate::validators::CANONICAL_PATTERN;

lazy_static! {
    // country (2 letters), optional era letter, serial digits, optional kind code
    static ref GENERIC_PATTERN: Regex =
        Regex::new(r"^([A-Za-z]{2})([A-Za-z]?)([0-9]+)([A-Za-z][0-9]*)?$").unwrap();
}

/// A patent identifier with its derived components.
///
/// `canonical` is always populated: for inputs that could not be parsed it
/// holds the raw text, and the component fields are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct PatentIdentifier {
    /// Text as supplied by the user
    pub raw: String,
    /// Issuing office, e.g. "US", "EP", "WO"
    pub country_code: Option<String>,
    /// Serial part of the canonical form (may carry a WO year separator)
    pub serial_number: Option<String>,
    /// Document kind, e.g. "B2", "A1"
    pub kind_code: Option<String>,
    /// `COUNTRY-SERIAL[-KIND]`, or the raw text when unparseable
    pub canonical: String,
}

impl PatentIdentifier {
    /// Parse leniently. Never fails; check [`PatentIdentifier::is_parsed`].
    pub fn parse(raw: &str) -> Self {
        Self::with_canonical(raw, canonicalize(raw))
    }

    /// Like [`PatentIdentifier::parse`] but skips jurisdiction correction.
    pub fn parse_normalized(raw: &str) -> Self {
        Self::with_canonical(raw, normalize(raw))
    }

    fn with_canonical(raw: &str, canonical: String) -> Self {
        let mut identifier = PatentIdentifier {
            raw: raw.to_string(),
            country_code: None,
            serial_number: None,
            kind_code: None,
            canonical,
        };

        if let Some(caps) = CANONICAL_PATTERN.captures(&identifier.canonical) {
            identifier.country_code = Some(caps[1].to_string());
            identifier.serial_number = Some(caps[2].to_string());
            identifier.kind_code = caps.get(3).map(|m| m.as_str().to_string());
        }

        identifier
    }

    /// Parse, rejecting input that yields no canonical form.
    pub fn strict(raw: &str) -> Result<Self, IdentifierError> {
        let identifier = Self::parse(raw);
        if identifier.is_parsed() {
            Ok(identifier)
        } else {
            Err(IdentifierError::Unparseable {
                raw: raw.to_string(),
            })
        }
    }

    pub fn is_parsed(&self) -> bool {
        self.country_code.is_some()
    }

    /// Jurisdiction code used for preference ranking
    pub fn jurisdiction(&self) -> Option<&str> {
        self.country_code.as_deref()
    }
}

impl fmt::Display for PatentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for PatentIdentifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::strict(s)
    }
}

/// Normalize a raw patent number to `COUNTRY-SERIAL[-KIND]`.
///
/// Non-alphanumeric characters are dropped before matching. For JP numbers
/// with an era letter (H, S, R) the two-digit era year is replaced by the
/// Gregorian year. Input already in canonical form, and input that does not
/// match, is returned unchanged.
pub fn normalize(raw: &str) -> String {
    // Canonical serials may carry separators (the WO year slash)
    if CANONICAL_PATTERN.is_match(raw) {
        return raw.to_string();
    }

    let compact: String = raw.chars().filter(|c| c.is_alphanumeric()).collect();

    let caps = match GENERIC_PATTERN.captures(&compact) {
        Some(caps) => caps,
        None => return raw.to_string(),
    };

    let country = caps[1].to_ascii_uppercase();
    let digits = &caps[3];
    let kind = caps.get(4).map(|m| m.as_str().to_ascii_uppercase());

    let serial = match caps.get(2).map(|m| m.as_str()).filter(|s| !s.is_empty()) {
        Some(letter) => {
            let converted = if country == "JP" {
                letter
                    .chars()
                    .next()
                    .and_then(JapaneseEra::from_letter)
                    .and_then(|era| convert_era_serial(era, digits))
            } else {
                None
            };
            converted.unwrap_or_else(|| format!("{}{}", letter.to_ascii_uppercase(), digits))
        }
        None => digits.to_string(),
    };

    match kind {
        Some(kind) => format!("{}-{}-{}", country, serial, kind),
        None => format!("{}-{}", country, serial),
    }
}

#[cfg(feature = "uniffi")]
#[uniffi::export]
pub fn normalize_ffi(raw: String) -> String {
    normalize(&raw)
}

/// Full canonicalization: generic normalization followed by jurisdiction
/// correction. This is the comparison key used for deduplication.
pub fn canonicalize(raw: &str) -> String {
    correct(&normalize(raw))
}

#[cfg(feature = "uniffi")]
#[uniffi::export]
pub fn canonicalize_ffi(raw: String) -> String {
    canonicalize(&raw)
}

#[cfg(feature = "uniffi")]
#[uniffi::export]
pub fn parse_patent_identifier_ffi(raw: String) -> PatentIdentifier {
    PatentIdentifier::parse(&raw)
}
