//! Patent number handling for the impress suite
//!
//! This crate turns the many ways people write patent numbers into one
//! canonical `COUNTRY-SERIAL[-KIND]` form:
//! - Splitting pasted text into candidate identifiers
//! - Generic normalization, including Japanese imperial-era years
//! - Jurisdiction-specific variation correction (WO year/serial, KR/CN padding)
//! - Validation helpers for canonical forms and jurisdiction codes
//!
//! Everything here is pure and allocation-only; family lookups and
//! deduplication live in `patfam-core`.

pub mod corrector;
pub mod era;
pub mod error;
pub mod normalizer;
pub mod parser;
pub mod validators;

pub use corrector::*;
pub use era::JapaneseEra;
pub use error::IdentifierError;
pub use normalizer::*;
pub use parser::*;
pub use validators::*;

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
