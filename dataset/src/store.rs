//! The immutable post-build store and its query operations.

use std::{cmp::Ordering, collections::HashMap};

use crate::{
    loader::{DataError, RawDataset},
    models::{Mep, NotableVote, Vote},
};

/// Fully built, immutable MEP/vote index. All methods are pure reads.
#[derive(Debug)]
pub struct DataStore {
    meps: Vec<Mep>,
    mep_index: HashMap<String, usize>,
    votes: Vec<Vote>,
    vote_index: HashMap<String, usize>,
    notable_by_mep: HashMap<String, Vec<NotableVote>>,
}

impl DataStore {
    /// Validates the raw records, recomputes attendance percentages and
    /// applies role enrichment. The enrichment is a plain assignment from
    /// the id-keyed mapping, so rebuilding from the same input yields an
    /// identical store.
    pub fn build(raw: RawDataset) -> Result<Self, DataError> {
        let RawDataset {
            mut meps,
            votes,
            notable_by_mep,
            roles,
        } = raw;

        let mut mep_index = HashMap::with_capacity(meps.len());
        for (position, mep) in meps.iter_mut().enumerate() {
            if mep.votes_cast > mep.votes_total_period {
                return Err(DataError::Invalid(format!(
                    "MEP {}: votes_cast {} exceeds votes_total_period {}",
                    mep.mep_id, mep.votes_cast, mep.votes_total_period
                )));
            }

            if mep_index.insert(mep.mep_id.clone(), position).is_some() {
                return Err(DataError::Invalid(format!(
                    "duplicate mep_id {}",
                    mep.mep_id
                )));
            }

            mep.attendance_pct = mep.computed_attendance();
            mep.special_role = roles.get(&mep.mep_id).copied();
        }

        let mut vote_index = HashMap::with_capacity(votes.len());
        for (position, vote) in votes.iter().enumerate() {
            if vote_index.insert(vote.vote_id.clone(), position).is_some() {
                return Err(DataError::Invalid(format!(
                    "duplicate vote_id {}",
                    vote.vote_id
                )));
            }
        }

        Ok(Self {
            meps,
            mep_index,
            votes,
            vote_index,
            notable_by_mep,
        })
    }

    /// Full roster in load order.
    pub fn meps(&self) -> &[Mep] {
        &self.meps
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn mep(&self, id: &str) -> Option<&Mep> {
        self.mep_index.get(id).map(|&position| &self.meps[position])
    }

    /// Case-insensitive exact name lookup.
    pub fn mep_by_name(&self, name: &str) -> Option<&Mep> {
        self.meps
            .iter()
            .find(|mep| mep.name.eq_ignore_ascii_case(name))
    }

    pub fn vote(&self, id: &str) -> Option<&Vote> {
        self.vote_index
            .get(id)
            .map(|&position| &self.votes[position])
    }

    /// Free-text/filtered roster search. All supplied predicates combine
    /// with logical AND; results come back in load order.
    ///
    /// - `query`: case-insensitive substring against name and national
    ///   party; empty matches everything.
    /// - `group`/`country`: exact match against the political group and
    ///   country fields when present.
    pub fn search_meps(
        &self,
        query: &str,
        group: Option<&str>,
        country: Option<&str>,
    ) -> Vec<&Mep> {
        let needle = query.to_lowercase();

        self.meps
            .iter()
            .filter(|mep| {
                needle.is_empty()
                    || mep.name.to_lowercase().contains(&needle)
                    || mep.national_party.to_lowercase().contains(&needle)
            })
            .filter(|mep| group.is_none_or(|group| mep.party == group))
            .filter(|mep| country.is_none_or(|country| mep.country == country))
            .collect()
    }

    /// The `limit` MEPs with the highest attendance, descending. Ties break
    /// by `mep_id` ascending so successive responses diff cleanly.
    pub fn leaderboard_top(&self, limit: i64) -> Vec<&Mep> {
        self.ranked(limit, true)
    }

    /// Mirror of [`Self::leaderboard_top`]: lowest attendance first, same
    /// tie-break. Computed independently of the top board; on small
    /// populations the two may overlap.
    pub fn leaderboard_bottom(&self, limit: i64) -> Vec<&Mep> {
        self.ranked(limit, false)
    }

    fn ranked(&self, limit: i64, descending: bool) -> Vec<&Mep> {
        if limit <= 0 {
            return Vec::new();
        }

        let mut ranked: Vec<&Mep> = self.meps.iter().collect();
        ranked.sort_by(|a, b| {
            let by_attendance = if descending {
                b.attendance_pct.total_cmp(&a.attendance_pct)
            } else {
                a.attendance_pct.total_cmp(&b.attendance_pct)
            };

            match by_attendance {
                Ordering::Equal => a.mep_id.cmp(&b.mep_id),
                ordering => ordering,
            }
        });

        ranked.truncate(limit as usize);
        ranked
    }

    /// Curated notable votes for one MEP, in stored order. An unknown id
    /// yields the same empty slice as an MEP with no notable votes.
    pub fn notable_votes(&self, mep_id: &str) -> &[NotableVote] {
        self.notable_by_mep
            .get(mep_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::models::{SpecialRole, VotePosition};

    fn mep(id: &str, name: &str, cast: u32, total: u32) -> Mep {
        Mep {
            mep_id: id.to_string(),
            name: name.to_string(),
            country: "Ireland".to_string(),
            party: "EPP".to_string(),
            national_party: "Fine Gael".to_string(),
            slug: String::new(),
            profile_url: None,
            photo_url: None,
            partial_term: false,
            votes_cast: cast,
            votes_total_period: total,
            attendance_pct: 0.0,
            special_role: None,
        }
    }

    fn vote(id: &str, title: &str) -> Vote {
        Vote {
            vote_id: id.to_string(),
            vote_date: "2025-03-11".to_string(),
            title: title.to_string(),
            result: Some("adopted".to_string()),
            olp_stage: None,
            total_for: Some(320),
            total_against: Some(290),
            total_abstain: Some(40),
            policy_areas: Vec::new(),
            source_url: "https://example.org/votes/1".to_string(),
        }
    }

    fn store_with(meps: Vec<Mep>) -> DataStore {
        DataStore::build(RawDataset {
            meps,
            ..RawDataset::default()
        })
        .unwrap()
    }

    #[test]
    fn test_attendance_recomputed() {
        let store = store_with(vec![mep("m1", "Jane Doe", 45, 60)]);

        assert_eq!(store.mep("m1").unwrap().attendance_pct, 75.0);
    }

    #[test]
    fn test_attendance_zero_denominator() {
        let store = store_with(vec![mep("m1", "Jane Doe", 0, 0)]);

        let pct = store.mep("m1").unwrap().attendance_pct;
        assert_eq!(pct, 0.0);
        assert!(!pct.is_nan());
    }

    #[test]
    fn test_counter_invariant_rejected() {
        let result = DataStore::build(RawDataset {
            meps: vec![mep("m1", "Jane Doe", 101, 100)],
            ..RawDataset::default()
        });

        assert!(matches!(result, Err(DataError::Invalid(_))));
    }

    #[test]
    fn test_duplicate_mep_id_rejected() {
        let result = DataStore::build(RawDataset {
            meps: vec![mep("m1", "Jane Doe", 1, 2), mep("m1", "John Doe", 1, 2)],
            ..RawDataset::default()
        });

        assert!(matches!(result, Err(DataError::Invalid(_))));
    }

    #[test]
    fn test_role_enrichment_by_id() {
        let mut raw = RawDataset {
            meps: vec![mep("m1", "Jane Doe", 1, 2), mep("m2", "John Doe", 1, 2)],
            ..RawDataset::default()
        };
        raw.roles
            .insert("m1".to_string(), SpecialRole::President);

        let store = DataStore::build(raw).unwrap();

        assert_eq!(
            store.mep("m1").unwrap().special_role,
            Some(SpecialRole::President)
        );
        assert_eq!(store.mep("m2").unwrap().special_role, None);
    }

    #[test]
    fn test_enrichment_overwrites_stale_role() {
        // A record that already carries a role on disk must end up with
        // exactly what the mapping says, not an accumulation.
        let mut tagged = mep("m1", "Jane Doe", 1, 2);
        tagged.special_role = Some(SpecialRole::Chair);

        let store = DataStore::build(RawDataset {
            meps: vec![tagged],
            ..RawDataset::default()
        })
        .unwrap();

        assert_eq!(store.mep("m1").unwrap().special_role, None);
    }

    #[test]
    fn test_lookup_totality() {
        let store = store_with(vec![mep("m1", "Jane Doe", 1, 2)]);

        assert!(store.mep("m2").is_none());
        assert!(store.mep("").is_none());
        assert!(store.mep("m1'; DROP TABLE meps;--").is_none());
        assert!(store.vote("v404").is_none());
    }

    #[test]
    fn test_vote_lookup() {
        let store = DataStore::build(RawDataset {
            votes: vec![vote("v1", "Budget 2026"), vote("v2", "AI Act")],
            ..RawDataset::default()
        })
        .unwrap();

        assert_eq!(store.vote("v2").unwrap().title, "AI Act");
        assert!(store.vote("v3").is_none());
    }

    #[test]
    fn test_mep_by_name_ignores_case() {
        let store = store_with(vec![mep("m1", "Jane Doe", 1, 2)]);

        assert!(store.mep_by_name("jane doe").is_some());
        assert!(store.mep_by_name("JANE DOE").is_some());
        assert!(store.mep_by_name("Jane").is_none());
    }

    #[test]
    fn test_search_case_insensitive() {
        let store = store_with(vec![
            mep("m1", "Alice Smith", 1, 2),
            mep("m2", "Bob Jones", 1, 2),
        ]);

        let lower: Vec<_> = store
            .search_meps("smith", None, None)
            .iter()
            .map(|m| m.mep_id.clone())
            .collect();
        let upper: Vec<_> = store
            .search_meps("SMITH", None, None)
            .iter()
            .map(|m| m.mep_id.clone())
            .collect();

        assert_eq!(lower, vec!["m1"]);
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_search_matches_national_party() {
        let store = store_with(vec![mep("m1", "Alice Smith", 1, 2)]);

        assert_eq!(store.search_meps("fine gael", None, None).len(), 1);
    }

    #[test]
    fn test_search_empty_query_with_group_filter() {
        let mut greens = mep("m2", "Bob Jones", 1, 2);
        greens.party = "Greens".to_string();

        let store = store_with(vec![
            mep("m1", "Alice Smith", 1, 2),
            greens,
            mep("m3", "Carol White", 1, 2),
        ]);

        let results = store.search_meps("", Some("Greens"), None);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].mep_id, "m2");
    }

    #[test]
    fn test_search_filters_are_anded() {
        let mut match_both = mep("m1", "Alice Smith", 1, 2);
        match_both.party = "Greens".to_string();
        let mut wrong_country = mep("m2", "Anna Smith", 1, 2);
        wrong_country.party = "Greens".to_string();
        wrong_country.country = "France".to_string();

        let store = store_with(vec![match_both, wrong_country]);

        let results = store.search_meps("smith", Some("Greens"), Some("Ireland"));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].mep_id, "m1");
    }

    #[test]
    fn test_search_no_match_is_empty_not_error() {
        let store = store_with(vec![mep("m1", "Alice Smith", 1, 2)]);

        assert!(store.search_meps("zzz", None, None).is_empty());
        assert!(store.search_meps("", Some("NI"), None).is_empty());
    }

    #[test]
    fn test_leaderboard_tie_break_scenario() {
        // A 90% (m1), B 90% (m2), C 40% (m3).
        let store = store_with(vec![
            mep("m2", "B", 90, 100),
            mep("m1", "A", 90, 100),
            mep("m3", "C", 40, 100),
        ]);

        let top: Vec<_> = store
            .leaderboard_top(2)
            .iter()
            .map(|m| m.mep_id.clone())
            .collect();
        assert_eq!(top, vec!["m1", "m2"]);

        let bottom: Vec<_> = store
            .leaderboard_bottom(1)
            .iter()
            .map(|m| m.mep_id.clone())
            .collect();
        assert_eq!(bottom, vec!["m3"]);
    }

    #[test]
    fn test_leaderboard_limit_edges() {
        let store = store_with(vec![mep("m1", "A", 90, 100), mep("m2", "B", 40, 100)]);

        assert!(store.leaderboard_top(0).is_empty());
        assert!(store.leaderboard_top(-3).is_empty());
        assert_eq!(store.leaderboard_top(100).len(), 2);
        assert!(store.leaderboard_bottom(0).is_empty());
    }

    #[test]
    fn test_leaderboard_overlap_on_small_population() {
        let store = store_with(vec![mep("m1", "A", 90, 100), mep("m2", "B", 40, 100)]);

        let top = store.leaderboard_top(2);
        let bottom = store.leaderboard_bottom(2);

        assert_eq!(top.len(), 2);
        assert_eq!(bottom.len(), 2);
        assert!(bottom.iter().any(|m| m.mep_id == "m1"));
    }

    #[test]
    fn test_notable_votes_unknown_id_is_empty() {
        let store = store_with(vec![mep("m1", "A", 90, 100)]);

        assert!(store.notable_votes("nonexistent-id").is_empty());
        assert!(store.notable_votes("m1").is_empty());
    }

    #[test]
    fn test_notable_votes_stored_order() {
        let mut raw = RawDataset {
            meps: vec![mep("m1", "A", 90, 100)],
            ..RawDataset::default()
        };
        raw.notable_by_mep.insert(
            "m1".to_string(),
            vec![
                NotableVote {
                    vote: vote("v2", "AI Act"),
                    mep_id: "m1".to_string(),
                    vote_position: VotePosition::Against,
                },
                NotableVote {
                    vote: vote("v1", "Budget 2026"),
                    mep_id: "m1".to_string(),
                    vote_position: VotePosition::For,
                },
            ],
        );

        let store = DataStore::build(raw).unwrap();
        let notable = store.notable_votes("m1");

        assert_eq!(notable.len(), 2);
        assert_eq!(notable[0].vote.vote_id, "v2");
        assert_eq!(notable[1].vote.vote_id, "v1");
        assert_eq!(notable[0].vote_position, VotePosition::Against);
    }

    proptest! {
        #[test]
        fn prop_attendance_bounds(counters in prop::collection::vec((0u32..=500, 0u32..=500), 0..40)) {
            let meps: Vec<Mep> = counters
                .iter()
                .enumerate()
                .map(|(i, &(a, b))| {
                    let (cast, total) = if a <= b { (a, b) } else { (b, a) };
                    mep(&format!("m{i:03}"), &format!("MEP {i}"), cast, total)
                })
                .collect();

            let store = store_with(meps);

            for mep in store.meps() {
                prop_assert!(mep.attendance_pct >= 0.0);
                prop_assert!(mep.attendance_pct <= 100.0);
                if mep.votes_total_period == 0 {
                    prop_assert_eq!(mep.attendance_pct, 0.0);
                }
            }
        }

        #[test]
        fn prop_leaderboard_sorted_and_bounded(
            counters in prop::collection::vec((0u32..=10, 0u32..=10), 0..40),
            limit in -5i64..60,
        ) {
            let meps: Vec<Mep> = counters
                .iter()
                .enumerate()
                .map(|(i, &(a, b))| {
                    let (cast, total) = if a <= b { (a, b) } else { (b, a) };
                    mep(&format!("m{i:03}"), &format!("MEP {i}"), cast, total)
                })
                .collect();
            let population = meps.len();

            let store = store_with(meps);
            let top = store.leaderboard_top(limit);
            let bottom = store.leaderboard_bottom(limit);

            let expected = if limit <= 0 {
                0
            } else {
                population.min(limit as usize)
            };
            prop_assert_eq!(top.len(), expected);
            prop_assert_eq!(bottom.len(), expected);

            for pair in top.windows(2) {
                prop_assert!(pair[0].attendance_pct >= pair[1].attendance_pct);
                if pair[0].attendance_pct == pair[1].attendance_pct {
                    prop_assert!(pair[0].mep_id < pair[1].mep_id);
                }
            }
            for pair in bottom.windows(2) {
                prop_assert!(pair[0].attendance_pct <= pair[1].attendance_pct);
                if pair[0].attendance_pct == pair[1].attendance_pct {
                    prop_assert!(pair[0].mep_id < pair[1].mep_id);
                }
            }
        }

        #[test]
        fn prop_search_filters_subset(names in prop::collection::vec("[a-z]{1,8}", 0..30)) {
            let meps: Vec<Mep> = names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let mut record = mep(&format!("m{i:03}"), name, 1, 2);
                    if i % 2 == 0 {
                        record.party = "Greens".to_string();
                    }
                    record
                })
                .collect();

            let store = store_with(meps);
            let unfiltered: Vec<&str> = store
                .search_meps("a", None, None)
                .iter()
                .map(|m| m.mep_id.as_str())
                .collect();
            let filtered = store.search_meps("a", Some("Greens"), None);

            for found in filtered {
                prop_assert!(unfiltered.contains(&found.mep_id.as_str()));
                prop_assert_eq!(&found.party, "Greens");
            }
        }
    }
}
