use serde::{Deserialize, Serialize};

/// Institutional office overlaid on an MEP record during enrichment.
///
/// The role mapping in the backing source is keyed by `mep_id`; ids absent
/// from the mapping simply carry no role. Unknown role strings fail the
/// load, they never fall through to a stringly-typed tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecialRole {
    President,
    VicePresident,
    Chair,
}

/// How an MEP voted on a single roll-call vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotePosition {
    For,
    Against,
    Abstain,
    #[serde(rename = "Not voting")]
    NotVoting,
}

/// One Member of the European Parliament.
///
/// `attendance_pct` is always recomputed from the two counters at build
/// time; any value present in the backing file is discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mep {
    pub mep_id: String,
    pub name: String,
    pub country: String,
    /// European political group, e.g. "EPP", "Greens/EFA".
    pub party: String,
    pub national_party: String,
    /// URL slug derived from the name at ingest time, e.g. "roberta-metsola".
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// MEP joined or left mid-period, so the counters cover a shorter span.
    #[serde(default)]
    pub partial_term: bool,
    pub votes_cast: u32,
    pub votes_total_period: u32,
    #[serde(default)]
    pub attendance_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_role: Option<SpecialRole>,
}

impl Mep {
    /// Attendance share in `[0, 100]`. A zero denominator means no votes
    /// were recorded for the period and yields `0.0`, never NaN.
    pub fn computed_attendance(&self) -> f64 {
        if self.votes_total_period == 0 {
            return 0.0;
        }

        f64::from(self.votes_cast) / f64::from(self.votes_total_period) * 100.0
    }
}

/// One roll-call vote from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub vote_id: String,
    /// YYYY-MM-DD.
    pub vote_date: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub olp_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_for: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_against: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_abstain: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policy_areas: Vec<String>,
    pub source_url: String,
}

/// A vote flagged as significant for one MEP, with that MEP's ballot.
///
/// The significance criterion (close margin, rebellion against the group
/// line, landmark subject) is applied upstream during ingestion; the store
/// only serves the curated groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotableVote {
    #[serde(flatten)]
    pub vote: Vote,
    pub mep_id: String,
    pub vote_position: VotePosition,
}
