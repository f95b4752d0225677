//! Collection deduplication orchestration
//!
//! Flattens named collections, drops exact repeats, confirms the remainder
//! with the validity service, groups by family and keeps one representative
//! per family based on jurisdiction preference.

use std::collections::{HashMap, HashSet};

use impress_patents::PatentIdentifier;
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, PreferenceOrder};
use crate::deduplication::report::{
    DeduplicationReport, DuplicateReason, DuplicateRecord, FamilySelection,
};
use crate::error::{DedupError, LookupError, LookupKind, Result};
use crate::family::{group_by_family, rank_members};
use crate::lookup::{ConfirmedIdentifier, FamilyId, FamilyLookup, ValidityLookup};

/// A source collection of raw identifiers (a folder, an upload, a result set)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCollection {
    pub name: String,
    pub identifiers: Vec<String>,
}

impl NamedCollection {
    pub fn new<I, S>(name: impl Into<String>, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NamedCollection {
            name: name.into(),
            identifiers: identifiers.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from pasted text using the identifier parser
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::new(name, impress_patents::parse_identifiers(text))
    }
}

/// One flattened occurrence that survived the exact-repeat pass
struct Entry<'c> {
    source: &'c str,
    identifier: PatentIdentifier,
}

/// Family ids from validity annotations first, then the family service
struct AnnotatedFamilies<'a> {
    annotated: HashMap<String, FamilyId>,
    fallback: Option<&'a dyn FamilyLookup>,
}

impl FamilyLookup for AnnotatedFamilies<'_> {
    fn family_of(&self, canonical: &str) -> std::result::Result<Option<FamilyId>, LookupError> {
        if let Some(family_id) = self.annotated.get(canonical) {
            return Ok(Some(family_id.clone()));
        }
        match self.fallback {
            Some(lookup) => lookup.family_of(canonical),
            None => Ok(None),
        }
    }
}

/// Combines identifier collections into one deduplicated set.
///
/// The engine holds only configuration and shared references to its
/// collaborators; each `combine` call is independent.
pub struct DeduplicationEngine<'a> {
    config: EngineConfig,
    validity: Option<&'a dyn ValidityLookup>,
    families: Option<&'a dyn FamilyLookup>,
    existing: Vec<String>,
}

impl<'a> DeduplicationEngine<'a> {
    pub fn new(config: EngineConfig) -> Self {
        DeduplicationEngine {
            config,
            validity: None,
            families: None,
            existing: Vec::new(),
        }
    }

    /// Confirm identifiers with this service. Without one, every identifier
    /// is treated as confirmed.
    pub fn with_validity(mut self, lookup: &'a dyn ValidityLookup) -> Self {
        self.validity = Some(lookup);
        self
    }

    /// Resolve family ids the validity response did not annotate
    pub fn with_families(mut self, lookup: &'a dyn FamilyLookup) -> Self {
        self.families = Some(lookup);
        self
    }

    /// Identifiers already in the destination collection
    pub fn with_existing<I, S>(mut self, existing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.existing = existing.into_iter().map(Into::into).collect();
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Combine collections using the configured preference order
    pub fn combine(&self, collections: &[NamedCollection]) -> Result<DeduplicationReport> {
        self.combine_with(collections, &self.config.preference)
    }

    /// Combine collections, ranking family members by `preference`
    pub fn combine_with(
        &self,
        collections: &[NamedCollection],
        preference: &PreferenceOrder,
    ) -> Result<DeduplicationReport> {
        let mut report = DeduplicationReport::default();

        let existing: HashSet<String> = self
            .existing
            .iter()
            .map(|raw| self.parse(raw).canonical)
            .collect();

        let working = self.drop_repeats(collections, &existing, &mut report);
        if working.is_empty() {
            tracing::debug!("nothing left to confirm, skipping lookups");
            return Ok(report);
        }

        let (working, annotated) = self.confirm(working, &existing, &mut report)?;
        if working.is_empty() {
            return Ok(report);
        }

        let families = AnnotatedFamilies {
            annotated,
            fallback: self.families,
        };
        let identifiers: Vec<PatentIdentifier> =
            working.iter().map(|e| e.identifier.clone()).collect();
        let grouping = group_by_family(&identifiers, &families)
            .map_err(DedupError::lookup(LookupKind::Family))?;

        let existing_families = self.existing_families(&existing, &families)?;

        let mut kept: HashSet<&str> = grouping
            .residual
            .iter()
            .map(|id| id.canonical.as_str())
            .collect();
        let mut dropped: HashMap<&str, DuplicateReason> = HashMap::new();

        for group in &grouping.groups {
            if existing_families.contains(&group.family_id) {
                for member in &group.members {
                    dropped.insert(
                        member.canonical.as_str(),
                        DuplicateReason::Existing {
                            family_id: Some(group.family_id.clone()),
                        },
                    );
                }
                continue;
            }

            let ranked = rank_members(&group.members, preference);
            let Some((&representative, alternates)) = ranked.split_first() else {
                continue;
            };
            kept.insert(representative.canonical.as_str());
            for &alternate in alternates {
                dropped.insert(
                    alternate.canonical.as_str(),
                    DuplicateReason::Family {
                        family_id: group.family_id.clone(),
                        representative: representative.canonical.clone(),
                    },
                );
            }

            if !alternates.is_empty() {
                report.selections.push(FamilySelection {
                    family_id: group.family_id.clone(),
                    representative: representative.canonical.clone(),
                    alternates: alternates.iter().map(|a| a.canonical.clone()).collect(),
                    rank: preference.rank_of(representative.jurisdiction()),
                });
            }
        }

        for entry in &working {
            let canonical = entry.identifier.canonical.as_str();
            if kept.contains(canonical) {
                report.unique_ids.push(canonical.to_string());
            } else if let Some(reason) = dropped.remove(canonical) {
                report.push_duplicate(DuplicateRecord {
                    identifier: canonical.to_string(),
                    raw: entry.identifier.raw.clone(),
                    source: entry.source.to_string(),
                    reason,
                });
            }
        }

        tracing::info!(
            unique = report.unique_ids.len(),
            duplicates = report.duplicate_ids.len(),
            invalid = report.invalid_ids.len(),
            families = grouping.groups.len(),
            "deduplication complete"
        );

        Ok(report)
    }

    fn parse(&self, raw: &str) -> PatentIdentifier {
        if self.config.correct_variations {
            PatentIdentifier::parse(raw)
        } else {
            PatentIdentifier::parse_normalized(raw)
        }
    }

    /// Flatten collections keeping the first occurrence of each canonical form
    fn drop_repeats<'c>(
        &self,
        collections: &'c [NamedCollection],
        existing: &HashSet<String>,
        report: &mut DeduplicationReport,
    ) -> Vec<Entry<'c>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut working = Vec::new();

        for collection in collections {
            for raw in &collection.identifiers {
                let identifier = self.parse(raw);
                let canonical = identifier.canonical.clone();

                let reason = if !seen.insert(canonical.clone()) {
                    Some(DuplicateReason::Exact)
                } else if existing.contains(&canonical) {
                    Some(DuplicateReason::Existing { family_id: None })
                } else {
                    None
                };

                match reason {
                    Some(reason) => report.push_duplicate(DuplicateRecord {
                        identifier: canonical,
                        raw: raw.clone(),
                        source: collection.name.clone(),
                        reason,
                    }),
                    None => working.push(Entry {
                        source: &collection.name,
                        identifier,
                    }),
                }
            }
        }

        tracing::debug!(
            kept = working.len(),
            repeats = report.duplicates.len(),
            "dropped exact repeats"
        );
        working
    }

    /// One batched validity request; unconfirmed working identifiers become
    /// invalid. Destination identifiers ride along in the same request only
    /// for their family annotations and are never reported invalid.
    /// Returns the confirmed entries and the family annotations of both.
    fn confirm<'c>(
        &self,
        working: Vec<Entry<'c>>,
        existing: &HashSet<String>,
        report: &mut DeduplicationReport,
    ) -> Result<(Vec<Entry<'c>>, HashMap<String, FamilyId>)> {
        let Some(validity) = self.validity else {
            return Ok((working, HashMap::new()));
        };

        let mut destination: Vec<&String> = existing.iter().collect();
        destination.sort();

        let request: Vec<String> = working
            .iter()
            .map(|e| e.identifier.canonical.clone())
            .chain(destination.iter().map(|c| c.to_string()))
            .collect();
        let confirmed: HashMap<String, ConfirmedIdentifier> = validity
            .confirm(&request)
            .map_err(DedupError::lookup(LookupKind::Validity))?
            .into_iter()
            .map(|c| (c.canonical.clone(), c))
            .collect();

        let mut annotated: HashMap<String, FamilyId> = destination
            .iter()
            .filter_map(|c| {
                let family_id = confirmed.get(*c)?.family_id.clone()?;
                Some((c.to_string(), family_id))
            })
            .collect();
        let mut valid = Vec::with_capacity(working.len());

        for mut entry in working {
            let Some(confirmation) = confirmed.get(&entry.identifier.canonical) else {
                report
                    .invalid_ids
                    .insert(entry.identifier.canonical.clone());
                continue;
            };

            if let Some(jurisdiction) = &confirmation.jurisdiction {
                entry.identifier.country_code = Some(jurisdiction.to_ascii_uppercase());
            }
            if let Some(family_id) = &confirmation.family_id {
                annotated.insert(entry.identifier.canonical.clone(), family_id.clone());
            }
            valid.push(entry);
        }

        tracing::debug!(
            requested = request.len(),
            confirmed = valid.len(),
            annotated = annotated.len(),
            "validity lookup answered"
        );
        Ok((valid, annotated))
    }

    /// Families already represented in the destination collection, from
    /// validity annotations first and then the family lookup
    fn existing_families(
        &self,
        existing: &HashSet<String>,
        families: &AnnotatedFamilies<'_>,
    ) -> Result<HashSet<FamilyId>> {
        let mut found = HashSet::new();
        for canonical in existing {
            if let Some(family_id) = families
                .family_of(canonical)
                .map_err(DedupError::lookup(LookupKind::Family))?
            {
                found.insert(family_id);
            }
        }
        Ok(found)
    }
}
