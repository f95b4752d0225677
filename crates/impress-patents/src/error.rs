//! Error types for identifier parsing

use thiserror::Error;

/// Errors raised by the strict parsing entry points.
///
/// The lenient functions (`normalize`, `correct`, `canonicalize`) never fail;
/// they hand back the input unchanged instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error), uniffi(flat_error))]
pub enum IdentifierError {
    /// Neither the generic pattern nor any jurisdiction rule matched
    #[error("Unparseable patent identifier: {raw}")]
    Unparseable { raw: String },

    /// A jurisdiction code that is not two or three ASCII letters
    #[error("Invalid jurisdiction code: {0}")]
    InvalidJurisdiction(String),
}
