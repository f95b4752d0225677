//! Family grouping and representative selection
//!
//! Documents filed in several offices for the same invention share a family
//! id. Grouping collects them; selection picks the one document consumers
//! should see, by jurisdiction preference.

mod grouper;
mod selector;

pub use grouper::{group_by_family, FamilyGroup, FamilyGrouping};
pub use selector::{rank_members, select_representative};
