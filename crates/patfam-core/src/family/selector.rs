//! Representative selection by jurisdiction preference

use impress_patents::PatentIdentifier;

use crate::config::PreferenceOrder;
use crate::family::FamilyGroup;

/// Order members by preference rank. The sort is stable, so members of
/// equal rank (including all unknown jurisdictions) keep their input order.
pub fn rank_members<'a>(
    members: &'a [PatentIdentifier],
    preference: &PreferenceOrder,
) -> Vec<&'a PatentIdentifier> {
    let mut ranked: Vec<&PatentIdentifier> = members.iter().collect();
    ranked.sort_by_key(|m| preference.rank_of(m.jurisdiction()));
    ranked
}

/// Pick the single member consumers should see. `None` only for an empty slice.
pub fn select_representative<'a>(
    members: &'a [PatentIdentifier],
    preference: &PreferenceOrder,
) -> Option<&'a PatentIdentifier> {
    members
        .iter()
        .enumerate()
        .min_by_key(|(index, m)| (preference.rank_of(m.jurisdiction()), *index))
        .map(|(_, m)| m)
}

impl FamilyGroup {
    /// Representative of this family under `preference`
    pub fn representative(&self, preference: &PreferenceOrder) -> Option<&PatentIdentifier> {
        select_representative(&self.members, preference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<PatentIdentifier> {
        raw.iter().map(|r| PatentIdentifier::parse(r)).collect()
    }

    #[test]
    fn test_us_preferred() {
        let members = ids(&["EP-1-A", "JP-1-A", "US-1-A"]);
        let chosen = select_representative(&members, &PreferenceOrder::default()).unwrap();
        assert_eq!(chosen.canonical, "US-1-A");
    }

    #[test]
    fn test_next_preferred_when_us_absent() {
        let members = ids(&["JP-1-A", "EP-1-A"]);
        let chosen = select_representative(&members, &PreferenceOrder::default()).unwrap();
        assert_eq!(chosen.canonical, "EP-1-A");
    }

    #[test]
    fn test_unknown_jurisdictions_rank_last_in_input_order() {
        let members = ids(&["KR-1234567-B1", "CN-1234567-A", "SU-123456-A1"]);
        let ranked = rank_members(&members, &PreferenceOrder::default());
        let order: Vec<&str> = ranked.iter().map(|m| m.canonical.as_str()).collect();
        assert_eq!(order, vec!["SU-123456-A1", "KR-1234567-B1", "CN-1234567-A"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let members = ids(&["US-2-B1", "US-1-A"]);
        let chosen = select_representative(&members, &PreferenceOrder::default()).unwrap();
        assert_eq!(chosen.canonical, "US-2-B1");
    }

    #[test]
    fn test_custom_order() {
        let members = ids(&["US-1-A", "EP-1-A", "JP-1-A"]);
        let preference = PreferenceOrder::parse("JP EP").unwrap();
        let chosen = select_representative(&members, &preference).unwrap();
        assert_eq!(chosen.canonical, "JP-1-A");
    }

    #[test]
    fn test_unparsed_member_ranks_last() {
        let members = ids(&["mystery", "GB-1234567-A"]);
        let chosen = select_representative(&members, &PreferenceOrder::default()).unwrap();
        assert_eq!(chosen.canonical, "GB-1234567-A");
    }

    #[test]
    fn test_group_representative() {
        let mut group = FamilyGroup::new("F1".into());
        group.insert(PatentIdentifier::parse("JP-1-A"));
        group.insert(PatentIdentifier::parse("EP-1-A"));
        let chosen = group.representative(&PreferenceOrder::default()).unwrap();
        assert_eq!(chosen.canonical, "EP-1-A");
    }

    #[test]
    fn test_empty() {
        assert!(select_representative(&[], &PreferenceOrder::default()).is_none());
    }
}
