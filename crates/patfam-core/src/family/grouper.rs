//! Grouping identifiers by family id

use std::collections::{HashMap, HashSet};

use impress_patents::PatentIdentifier;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::lookup::{FamilyId, FamilyLookup};

/// Documents sharing one family id, unique by canonical form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyGroup {
    pub family_id: FamilyId,
    /// Members in input order
    pub members: Vec<PatentIdentifier>,
}

impl FamilyGroup {
    pub fn new(family_id: FamilyId) -> Self {
        FamilyGroup {
            family_id,
            members: Vec::new(),
        }
    }

    /// Add a member. Returns false if its canonical form is already present.
    pub fn insert(&mut self, identifier: PatentIdentifier) -> bool {
        if self.contains(&identifier.canonical) {
            return false;
        }
        self.members.push(identifier);
        true
    }

    pub fn contains(&self, canonical: &str) -> bool {
        self.members.iter().any(|m| m.canonical == canonical)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Distinct jurisdictions present in the group, in member order
    pub fn jurisdictions(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for code in self.members.iter().filter_map(|m| m.jurisdiction()) {
            if !seen.contains(&code) {
                seen.push(code);
            }
        }
        seen
    }
}

/// Result of grouping: family groups plus identifiers with no known family
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyGrouping {
    /// Groups in order of their first member's appearance
    pub groups: Vec<FamilyGroup>,
    /// Identifiers without a family; each is its own singleton family
    pub residual: Vec<PatentIdentifier>,
}

impl FamilyGrouping {
    pub fn group(&self, family_id: &FamilyId) -> Option<&FamilyGroup> {
        self.groups.iter().find(|g| &g.family_id == family_id)
    }

    /// Group containing `canonical`, if it was assigned to one
    pub fn group_of(&self, canonical: &str) -> Option<&FamilyGroup> {
        self.groups.iter().find(|g| g.contains(canonical))
    }

    /// Number of distinct identifiers across groups and residual
    pub fn identifier_count(&self) -> usize {
        self.groups.iter().map(FamilyGroup::len).sum::<usize>() + self.residual.len()
    }
}

/// Group identifiers by the family id `lookup` reports for each.
///
/// Every distinct canonical form ends up in exactly one group or exactly once
/// in the residual list. Repeated canonical forms are the same document and
/// are recorded once. The first lookup failure aborts grouping.
pub fn group_by_family(
    identifiers: &[PatentIdentifier],
    lookup: &dyn FamilyLookup,
) -> Result<FamilyGrouping, LookupError> {
    let mut grouping = FamilyGrouping::default();
    let mut group_index: HashMap<FamilyId, usize> = HashMap::new();
    let mut placed: HashSet<&str> = HashSet::new();

    for identifier in identifiers {
        if !placed.insert(identifier.canonical.as_str()) {
            continue;
        }

        match lookup.family_of(&identifier.canonical)? {
            Some(family_id) => {
                let index = *group_index.entry(family_id.clone()).or_insert_with(|| {
                    grouping.groups.push(FamilyGroup::new(family_id));
                    grouping.groups.len() - 1
                });
                grouping.groups[index].insert(identifier.clone());
            }
            None => grouping.residual.push(identifier.clone()),
        }
    }

    tracing::debug!(
        groups = grouping.groups.len(),
        residual = grouping.residual.len(),
        "grouped identifiers by family"
    );

    Ok(grouping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::InMemoryIndex;

    fn ids(raw: &[&str]) -> Vec<PatentIdentifier> {
        raw.iter().map(|r| PatentIdentifier::parse(r)).collect()
    }

    #[test]
    fn test_group_by_family() {
        let index = InMemoryIndex::new()
            .with_family("US8125463B2", "F1")
            .with_family("EP1234567A1", "F1")
            .with_family("JP2001234567A", "F2");

        let grouping = group_by_family(
            &ids(&["US8125463B2", "JP2001234567A", "EP1234567A1", "GB1234567A"]),
            &index,
        )
        .unwrap();

        assert_eq!(grouping.groups.len(), 2);
        assert_eq!(grouping.groups[0].family_id, FamilyId::from("F1"));
        assert_eq!(grouping.groups[0].len(), 2);
        assert_eq!(grouping.groups[0].jurisdictions(), vec!["US", "EP"]);
        assert_eq!(grouping.groups[1].family_id, FamilyId::from("F2"));
        assert_eq!(grouping.residual.len(), 1);
        assert_eq!(grouping.residual[0].canonical, "GB-1234567-A");
    }

    #[test]
    fn test_repeated_canonical_recorded_once() {
        let index = InMemoryIndex::new().with_family("US8125463B2", "F1");
        let grouping = group_by_family(
            &ids(&["US8125463B2", "US-8125463-B2", "A", "A"]),
            &index,
        )
        .unwrap();

        assert_eq!(grouping.groups[0].len(), 1);
        assert_eq!(grouping.residual.len(), 1);
        assert_eq!(grouping.identifier_count(), 2);
    }

    #[test]
    fn test_group_of() {
        let index = InMemoryIndex::new().with_family("EP1234567A1", "F9");
        let grouping = group_by_family(&ids(&["EP1234567A1"]), &index).unwrap();
        assert_eq!(
            grouping.group_of("EP-1234567-A1").map(|g| g.family_id.as_str()),
            Some("F9")
        );
        assert!(grouping.group(&FamilyId::from("F9")).is_some());
        assert!(grouping.group_of("US-1-A").is_none());
    }

    #[test]
    fn test_lookup_failure_propagates() {
        struct Down;
        impl FamilyLookup for Down {
            fn family_of(&self, _: &str) -> Result<Option<FamilyId>, LookupError> {
                Err(LookupError::Timeout)
            }
        }

        let result = group_by_family(&ids(&["US8125463B2"]), &Down);
        assert_eq!(result, Err(LookupError::Timeout));
    }

    #[test]
    fn test_empty_input() {
        let grouping = group_by_family(&[], &InMemoryIndex::new()).unwrap();
        assert!(grouping.groups.is_empty());
        assert!(grouping.residual.is_empty());
    }
}
