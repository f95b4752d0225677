//! Japanese imperial era years
//!
//! Older Japanese publications are numbered by era year (e.g. `H08-1234` for
//! Heisei 8). Conversion splices the Gregorian year in front of the remaining
//! serial digits.

use serde::{Deserialize, Serialize};

/// Imperial eras that appear in Japanese patent numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum JapaneseEra {
    /// 昭和, letter S
    Showa,
    /// 平成, letter H
    Heisei,
    /// 令和, letter R
    Reiwa,
}

impl JapaneseEra {
    /// Look up an era by its single-letter abbreviation (case-insensitive)
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'S' => Some(JapaneseEra::Showa),
            'H' => Some(JapaneseEra::Heisei),
            'R' => Some(JapaneseEra::Reiwa),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            JapaneseEra::Showa => 'S',
            JapaneseEra::Heisei => 'H',
            JapaneseEra::Reiwa => 'R',
        }
    }

    /// Offset added to the era year to get the Gregorian year
    pub fn offset(self) -> u32 {
        match self {
            JapaneseEra::Showa => 1925,
            JapaneseEra::Heisei => 1988,
            JapaneseEra::Reiwa => 2018,
        }
    }

    /// Last era year that was actually used
    fn last_year(self) -> u32 {
        match self {
            JapaneseEra::Showa => 64,
            JapaneseEra::Heisei => 31,
            // Ongoing; two digits is all the numbering can express
            JapaneseEra::Reiwa => 99,
        }
    }

    /// Convert an era year to its Gregorian year.
    ///
    /// Returns `None` for year zero or a year past the end of the era.
    pub fn to_gregorian(self, era_year: u32) -> Option<u32> {
        if era_year == 0 || era_year > self.last_year() {
            return None;
        }
        Some(era_year + self.offset())
    }
}

/// Rewrite an era-numbered serial (`08` + `1234`) as `19961234`.
///
/// The first two digits are the era year. Returns `None` when there are fewer
/// than two digits or the year is not plausible for the era, so callers can
/// fall back to leaving the input alone.
pub fn convert_era_serial(era: JapaneseEra, serial: &str) -> Option<String> {
    if serial.len() < 2 || !serial.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (year_digits, rest) = serial.split_at(2);
    let era_year: u32 = year_digits.parse().ok()?;
    let gregorian = era.to_gregorian(era_year)?;
    Some(format!("{}{}", gregorian, rest))
}
