//! patfam-core: patent family deduplication engine
//!
//! This library provides:
//! - Jurisdiction preference configuration
//! - Lookup collaborator traits (family ids, validity) and an in-memory index
//! - Family grouping and representative selection
//! - Deduplication across multiple identifier collections
//!
//! Identifier parsing lives in `impress-patents` and is re-exported here for
//! convenience.

pub mod config;
pub mod deduplication;
pub mod error;
pub mod family;
pub mod lookup;

pub use config::{EngineConfig, PreferenceOrder};
pub use deduplication::{
    DeduplicationEngine, DeduplicationReport, DuplicateReason, DuplicateRecord, FamilySelection,
    NamedCollection,
};
pub use error::{ConfigError, DedupError, LookupError, LookupKind, Result};
pub use family::{group_by_family, rank_members, select_representative, FamilyGroup, FamilyGrouping};
pub use lookup::{ConfirmedIdentifier, FamilyId, FamilyLookup, InMemoryIndex, IndexEntry, ValidityLookup};

pub use impress_patents::{canonicalize, correct, normalize, parse_identifiers, PatentIdentifier};
