//! Deduplication report types

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::lookup::FamilyId;

/// Why an identifier was left out of the unique set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DuplicateReason {
    /// Same canonical form seen earlier in the input
    Exact,
    /// Another member of the family was chosen as representative
    Family {
        family_id: FamilyId,
        representative: String,
    },
    /// Already present in the destination collection, by canonical form or
    /// by family
    Existing { family_id: Option<FamilyId> },
}

/// One excluded occurrence, with where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateRecord {
    pub identifier: String,
    pub raw: String,
    /// Name of the collection the occurrence came from
    pub source: String,
    pub reason: DuplicateReason,
}

/// Rationale for one family reduction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilySelection {
    pub family_id: FamilyId,
    pub representative: String,
    /// Family members that lost to the representative, in preference order
    pub alternates: Vec<String>,
    /// Preference index the representative's jurisdiction ranked at
    pub rank: usize,
}

/// Outcome of combining collections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeduplicationReport {
    /// Kept identifiers, in order of first occurrence
    pub unique_ids: Vec<String>,
    pub duplicate_ids: BTreeSet<String>,
    pub invalid_ids: BTreeSet<String>,
    /// Every excluded duplicate occurrence, in the order it was decided
    pub duplicates: Vec<DuplicateRecord>,
    pub selections: Vec<FamilySelection>,
}

impl DeduplicationReport {
    pub fn is_empty(&self) -> bool {
        self.unique_ids.is_empty() && self.duplicate_ids.is_empty() && self.invalid_ids.is_empty()
    }

    pub(crate) fn push_duplicate(&mut self, record: DuplicateRecord) {
        self.duplicate_ids.insert(record.identifier.clone());
        self.duplicates.push(record);
    }

    /// Duplicate occurrences that were dropped for a given reason kind
    pub fn duplicates_where<F>(&self, predicate: F) -> impl Iterator<Item = &DuplicateRecord>
    where
        F: Fn(&DuplicateReason) -> bool,
    {
        self.duplicates.iter().filter(move |d| predicate(&d.reason))
    }

    /// Selection rationale for the family an identifier belongs to
    pub fn selection_for(&self, canonical: &str) -> Option<&FamilySelection> {
        self.selections.iter().find(|s| {
            s.representative == canonical || s.alternates.iter().any(|a| a == canonical)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(identifier: &str, reason: DuplicateReason) -> DuplicateRecord {
        DuplicateRecord {
            identifier: identifier.to_string(),
            raw: identifier.to_string(),
            source: "test".to_string(),
            reason,
        }
    }

    #[test]
    fn test_push_duplicate_fills_set() {
        let mut report = DeduplicationReport::default();
        report.push_duplicate(record("A", DuplicateReason::Exact));
        report.push_duplicate(record("A", DuplicateReason::Exact));
        assert_eq!(report.duplicate_ids.len(), 1);
        assert_eq!(report.duplicates.len(), 2);
        assert!(!report.is_empty());
    }

    #[test]
    fn test_duplicates_where() {
        let mut report = DeduplicationReport::default();
        report.push_duplicate(record("A", DuplicateReason::Exact));
        report.push_duplicate(record(
            "B",
            DuplicateReason::Existing { family_id: None },
        ));
        let exact: Vec<&str> = report
            .duplicates_where(|r| matches!(r, DuplicateReason::Exact))
            .map(|d| d.identifier.as_str())
            .collect();
        assert_eq!(exact, vec!["A"]);
    }

    #[test]
    fn test_reason_serialization() {
        let reason = DuplicateReason::Family {
            family_id: FamilyId::from("F1"),
            representative: "US-1-A".to_string(),
        };
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["kind"], "family");
        assert_eq!(json["family_id"], "F1");
    }
}
