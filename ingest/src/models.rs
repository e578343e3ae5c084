use serde::Deserialize;

/// Export endpoints relative to the configured base URL.
pub const MEMBERS_ENDPOINT: &str = "members.json";
pub const ATTENDANCE_ENDPOINT: &str = "attendance.json";
pub const VOTES_ENDPOINT: &str = "votes.json";
pub const NOTABLE_ENDPOINT: &str = "notable_ballots.json";

#[derive(Deserialize)]
pub struct ApiMember {
    pub id: String,
    pub name: String,
    pub country: String,
    /// Full political-group name, canonicalized during normalization.
    pub group: String,
    #[serde(default)]
    pub national_party: String,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[derive(Deserialize)]
pub struct ApiAttendance {
    pub mep_id: String,
    pub votes_cast: u32,
    pub votes_total_period: u32,
    #[serde(default)]
    pub partial_term: bool,
}

#[derive(Deserialize)]
pub struct ApiVote {
    pub id: String,
    /// Source date string, validated and reformatted to YYYY-MM-DD.
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub olp_stage: Option<String>,
    #[serde(default)]
    pub total_for: Option<u32>,
    #[serde(default)]
    pub total_against: Option<u32>,
    #[serde(default)]
    pub total_abstain: Option<u32>,
    pub source_url: String,
}

/// A curated notable ballot: which MEP, which vote, how they voted.
#[derive(Deserialize)]
pub struct ApiNotableBallot {
    pub mep_id: String,
    pub vote_id: String,
    pub position: String,
}
