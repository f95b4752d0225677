//! Jurisdiction-specific variation correction
//!
//! The generic normalizer cannot tell where a serial ends when offices use
//! different serial lengths, year prefixes or padding. This module keeps a
//! small table of per-office patterns, keyed by the two-letter prefix, and
//! rebuilds the hyphenated form from whichever rule matches.
//!
//! Correction never invents a result: if no rule matches, or the matching
//! rule reproduces the input, the input is returned as-is.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::era::{convert_era_serial, JapaneseEra};

/// The outcome of a successful correction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct Correction {
    pub corrected: String,
    /// Office prefix the rule was keyed under
    pub jurisdiction: String,
    /// Short name of the rule that fired
    pub rule: String,
}

struct CorrectionRule {
    name: &'static str,
    pattern: Regex,
    rewrite: fn(&Captures) -> Option<String>,
}

impl CorrectionRule {
    fn new(name: &'static str, pattern: &str, rewrite: fn(&Captures) -> Option<String>) -> Self {
        CorrectionRule {
            name,
            pattern: Regex::new(pattern).unwrap(),
            rewrite,
        }
    }
}

lazy_static! {
    static ref RULES_BY_PREFIX: HashMap<&'static str, Vec<CorrectionRule>> = {
        let mut table: HashMap<&'static str, Vec<CorrectionRule>> = HashMap::new();

        // Utility, reissue, plant and design patents plus 11-digit publications
        table.insert("US", vec![CorrectionRule::new(
            "us-serial",
            r"^(?P<country>US)(?P<serial>[0-9]{5,11}|RE[0-9]{5,6}|PP[0-9]{5,6}|D[0-9]{6,7})(?P<kind>[A-Z][0-9]?)?$",
            serial_with_kind,
        )]);

        table.insert("EP", vec![CorrectionRule::new(
            "ep-serial",
            r"^(?P<country>EP)(?P<serial>[0-9]{7})(?P<kind>[A-Z][0-9]?)?$",
            serial_with_kind,
        )]);

        // Application year, then the serial within that year
        table.insert("WO", vec![CorrectionRule::new(
            "wo-year-serial",
            r"^(?P<country>WO)(?P<year>(?:19|20)[0-9]{2})(?P<serial>[0-9]{4,7})(?P<kind>[A-Z][0-9]?)?$",
            wo_year_serial,
        )]);

        for country in ["GB", "FR", "DE", "CH"] {
            table.insert(country, vec![CorrectionRule::new(
                "european-national-serial",
                r"^(?P<country>GB|FR|DE|CH)(?P<serial>[0-9]{5,9})(?P<kind>[A-Z][0-9]?)?$",
                serial_with_kind,
            )]);
        }

        // Two-digit era year followed by at least one serial digit
        table.insert("JP", vec![
            CorrectionRule::new(
                "jp-era",
                r"^(?P<country>JP)(?P<era>[HSR])(?P<serial>[0-9]{3,})(?P<kind>[A-Z][0-9]?)?$",
                jp_era_serial,
            ),
            CorrectionRule::new(
                "jp-serial",
                r"^(?P<country>JP)(?P<serial>[0-9]{6,10})(?P<kind>[A-Z][0-9]?)?$",
                serial_with_kind,
            ),
        ]);

        // Registrations are often written with a leading "10" office prefix
        for country in ["KR", "CN"] {
            table.insert(country, vec![CorrectionRule::new(
                "kr-cn-padding",
                r"^(?P<country>KR|CN)(?:10)?(?P<serial>[0-9]{7})(?P<kind>[A-Z][0-9]?)?$",
                serial_with_kind,
            )]);
        }

        for country in ["RU", "SU"] {
            table.insert(country, vec![CorrectionRule::new(
                "ru-su-serial",
                r"^(?P<country>RU|SU)(?P<serial>[0-9]{5,10})(?P<kind>[A-Z][0-9]?)?$",
                serial_with_kind,
            )]);
        }

        table
    };
}

fn join(country: &str, serial: &str, caps: &Captures) -> String {
    match caps.name("kind") {
        Some(kind) => format!("{}-{}-{}", country, serial, kind.as_str()),
        None => format!("{}-{}", country, serial),
    }
}

fn serial_with_kind(caps: &Captures) -> Option<String> {
    Some(join(&caps["country"], &caps["serial"], caps))
}

fn wo_year_serial(caps: &Captures) -> Option<String> {
    let serial = format!("{}/{}", &caps["year"], &caps["serial"]);
    Some(join(&caps["country"], &serial, caps))
}

fn jp_era_serial(caps: &Captures) -> Option<String> {
    let era = caps["era"].chars().next().and_then(JapaneseEra::from_letter)?;
    let serial = convert_era_serial(era, &caps["serial"])?;
    Some(join(&caps["country"], &serial, caps))
}

/// Try the jurisdiction table against `raw`.
///
/// Returns `None` when no rule matches or the matching rule would leave the
/// input unchanged.
pub fn correct_with_rule(raw: &str) -> Option<Correction> {
    let compact = raw
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_ascii_uppercase();

    let prefix = compact.get(..2)?;
    let rules = RULES_BY_PREFIX.get(prefix)?;

    for rule in rules {
        let Some(caps) = rule.pattern.captures(&compact) else {
            continue;
        };
        let Some(corrected) = (rule.rewrite)(&caps) else {
            continue;
        };
        if corrected == raw {
            return None;
        }
        return Some(Correction {
            corrected,
            jurisdiction: prefix.to_string(),
            rule: rule.name.to_string(),
        });
    }

    None
}

/// Correct separator and padding variations. May return the input unchanged.
pub fn correct(raw: &str) -> String {
    correct_with_rule(raw)
        .map(|correction| correction.corrected)
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(feature = "uniffi")]
#[uniffi::export]
pub fn correct_ffi(raw: String) -> String {
    correct(&raw)
}

/// Offices that have an entry in the correction table
pub fn correctable_jurisdictions() -> Vec<&'static str> {
    let mut codes: Vec<&'static str> = RULES_BY_PREFIX.keys().copied().collect();
    codes.sort_unstable();
    codes
}
