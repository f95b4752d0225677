//! Deduplication across identifier collections
//!
//! Collections from several sources are merged into one set of canonical
//! identifiers: exact repeats, unconfirmed identifiers and extra family
//! members are reported in separate buckets.

mod orchestration;
mod report;

pub use orchestration::{DeduplicationEngine, NamedCollection};
pub use report::{DeduplicationReport, DuplicateReason, DuplicateRecord, FamilySelection};
