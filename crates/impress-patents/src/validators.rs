//! Validation helpers for canonical forms and office codes

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::IdentifierError;

lazy_static! {
    // COUNTRY-SERIAL[-KIND]; serial may carry series letters (RE, D, PP) or a WO year slash
    pub(crate) static ref CANONICAL_PATTERN: Regex =
        Regex::new(r"^([A-Z]{2})-([A-Z]{0,2}[0-9][0-9/]*)(?:-([A-Z][0-9]*))?$").unwrap();

    static ref JURISDICTION_PATTERN: Regex = Regex::new(r"^[A-Z]{2,3}$").unwrap();
}

/// Check whether a string is already in canonical `COUNTRY-SERIAL[-KIND]` form
pub fn is_canonical(identifier: &str) -> bool {
    CANONICAL_PATTERN.is_match(identifier)
}

#[cfg(feature = "uniffi")]
#[uniffi::export]
pub fn is_canonical_ffi(identifier: String) -> bool {
    is_canonical(&identifier)
}

/// Two or three uppercase ASCII letters
pub fn is_jurisdiction_code(code: &str) -> bool {
    JURISDICTION_PATTERN.is_match(code)
}

/// Trim and uppercase a user-supplied office code, rejecting anything that is
/// not two or three letters.
pub fn parse_jurisdiction(code: &str) -> Result<String, IdentifierError> {
    let upper = code.trim().to_ascii_uppercase();
    if is_jurisdiction_code(&upper) {
        Ok(upper)
    } else {
        Err(IdentifierError::InvalidJurisdiction(code.to_string()))
    }
}

/// Office code of a canonical identifier, if it has one
pub fn jurisdiction_of(canonical: &str) -> Option<String> {
    CANONICAL_PATTERN
        .captures(canonical)
        .map(|caps| caps[1].to_string())
}
