//! External lookup collaborators
//!
//! Family membership and document existence come from outside services. The
//! engine only sees these two traits; transport, auth and retries belong to
//! whoever implements them.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Opaque family identifier issued by an external authority
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(pub String);

impl FamilyId {
    pub fn new(id: impl Into<String>) -> Self {
        FamilyId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FamilyId {
    fn from(id: &str) -> Self {
        FamilyId(id.to_string())
    }
}

/// An identifier the validity service confirmed, with optional annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedIdentifier {
    pub canonical: String,
    #[serde(default)]
    pub family_id: Option<FamilyId>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
}

/// Canonical identifier → family id
pub trait FamilyLookup {
    /// `Ok(None)` means the service answered and knows no family.
    fn family_of(&self, canonical: &str) -> Result<Option<FamilyId>, LookupError>;
}

/// Batched existence check
pub trait ValidityLookup {
    /// Return the subset of `canonical` that exists. Anything missing from the
    /// response is treated as invalid.
    fn confirm(&self, canonical: &[String]) -> Result<Vec<ConfirmedIdentifier>, LookupError>;
}

/// What the in-memory index knows about one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    #[serde(default)]
    pub family_id: Option<FamilyId>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
}

/// Map-backed implementation of both lookups.
///
/// Keys are canonicalized on insert, so callers may load raw numbers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIndex {
    entries: HashMap<String, IndexEntry>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: &str, entry: IndexEntry) {
        self.entries
            .insert(impress_patents::canonicalize(identifier), entry);
    }

    /// Builder helper: register a document as a member of `family`
    pub fn with_family(mut self, identifier: &str, family: &str) -> Self {
        self.insert(
            identifier,
            IndexEntry {
                family_id: Some(FamilyId::from(family)),
                jurisdiction: None,
            },
        );
        self
    }

    /// Builder helper: register a document with no known family
    pub fn with_document(mut self, identifier: &str) -> Self {
        self.insert(identifier, IndexEntry::default());
        self
    }

    /// Load from a JSON object of `identifier -> {family_id, jurisdiction}`
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, IndexEntry> = serde_json::from_str(json)?;
        let mut index = Self::new();
        for (identifier, entry) in raw {
            index.insert(&identifier, entry);
        }
        Ok(index)
    }

    pub fn get(&self, canonical: &str) -> Option<&IndexEntry> {
        self.entries.get(canonical)
    }

    pub fn contains(&self, canonical: &str) -> bool {
        self.entries.contains_key(canonical)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FamilyLookup for InMemoryIndex {
    fn family_of(&self, canonical: &str) -> Result<Option<FamilyId>, LookupError> {
        Ok(self
            .entries
            .get(canonical)
            .and_then(|entry| entry.family_id.clone()))
    }
}

impl ValidityLookup for InMemoryIndex {
    fn confirm(&self, canonical: &[String]) -> Result<Vec<ConfirmedIdentifier>, LookupError> {
        Ok(canonical
            .iter()
            .filter_map(|id| {
                self.entries.get(id).map(|entry| ConfirmedIdentifier {
                    canonical: id.clone(),
                    family_id: entry.family_id.clone(),
                    jurisdiction: entry.jurisdiction.clone(),
                })
            })
            .collect())
    }
}
