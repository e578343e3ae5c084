//! # Dataset Ingestion
//!
//! Offline pipeline that turns the remote roll-call export into the dataset
//! directory the server loads from.
//!
//! ## Steps
//! 1. Fetch the member roster, attendance counters, vote catalog and
//!    curated notable ballots from the export API.
//! 2. Normalize country and group names, merge attendance counters into the
//!    roster by `mep_id`, tag votes with policy areas, and join notable
//!    ballots against the catalog.
//! 3. Write `meps.json`, `votes.json`, `notable-votes.json` and
//!    `roles.json` with a write-then-rename so a crashed run never leaves a
//!    half-written file for the server to pick up.
//!
//! Attendance percentages are NOT written; the store derives them from the
//! counters on every load.
use std::{collections::HashMap, env, fs, path::Path};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

pub mod models;
pub mod normalize;

use dataset::{
    Mep, NotableVote, SpecialRole, Vote,
    loader::{MEPS_FILE, NOTABLE_FILE, ROLES_FILE, VOTES_FILE},
};
use models::{
    ATTENDANCE_ENDPOINT, ApiAttendance, ApiMember, ApiNotableBallot, ApiVote, MEMBERS_ENDPOINT,
    NOTABLE_ENDPOINT, VOTES_ENDPOINT,
};
use normalize::{
    normalize_country, normalize_group, normalize_vote_date, parse_vote_position, policy_areas,
    slugify,
};

pub struct IngestConfig {
    pub base_url: String,
    pub out_dir: String,
}

impl IngestConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("INGEST_BASE_URL")
                .unwrap_or_else(|_| "https://data.howtheyvote.eu/export".to_string()),
            out_dir: env::var("DATASET_DIR").unwrap_or_else(|_| "data".to_string()),
        }
    }
}

/// Office-holders for the current term, keyed by MEP id. Updated by hand
/// when the Parliament elects a new Bureau.
const ROLE_ASSIGNMENTS: &[(&str, SpecialRole)] = &[
    ("197498", SpecialRole::President),
    ("124742", SpecialRole::VicePresident),
    ("197577", SpecialRole::VicePresident),
    ("96936", SpecialRole::VicePresident),
    ("124831", SpecialRole::Chair),
    ("197400", SpecialRole::Chair),
];

pub fn role_assignments() -> HashMap<String, SpecialRole> {
    ROLE_ASSIGNMENTS
        .iter()
        .map(|&(id, role)| (id.to_string(), role))
        .collect()
}

pub async fn run(config: &IngestConfig) -> Result<()> {
    let client = Client::new();

    let pb = ProgressBar::new(5);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap()
        .progress_chars("=> "),
    );

    pb.set_message("Fetching member roster");
    let members: Vec<ApiMember> = fetch(&client, &config.base_url, MEMBERS_ENDPOINT).await?;
    pb.inc(1);

    pb.set_message("Fetching attendance counters");
    let attendance: Vec<ApiAttendance> =
        fetch(&client, &config.base_url, ATTENDANCE_ENDPOINT).await?;
    pb.inc(1);

    pb.set_message("Fetching vote catalog");
    let raw_votes: Vec<ApiVote> = fetch(&client, &config.base_url, VOTES_ENDPOINT).await?;
    pb.inc(1);

    pb.set_message("Fetching notable ballots");
    let ballots: Vec<ApiNotableBallot> =
        fetch(&client, &config.base_url, NOTABLE_ENDPOINT).await?;
    pb.inc(1);

    pb.set_message("Writing dataset");
    let meps = build_meps(members, attendance);
    let votes = build_votes(raw_votes)?;
    let notable = group_notable(ballots, &votes);

    println!("Members: {}", meps.len());
    println!("Votes: {}", votes.len());
    println!("MEPs with notable votes: {}", notable.len());

    let out_dir = Path::new(&config.out_dir);
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating dataset dir {}", out_dir.display()))?;

    write_json(out_dir, MEPS_FILE, &meps)?;
    write_json(out_dir, VOTES_FILE, &votes)?;
    write_json(out_dir, NOTABLE_FILE, &notable)?;
    write_json(out_dir, ROLES_FILE, &role_assignments())?;

    pb.inc(1);
    pb.finish_with_message("Done");

    Ok(())
}

async fn fetch<T: DeserializeOwned>(client: &Client, base_url: &str, endpoint: &str) -> Result<T> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), endpoint);

    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("fetching {url}"))?
        .error_for_status()
        .with_context(|| format!("fetching {url}"))?;

    response.json().await.with_context(|| format!("decoding {url}"))
}

/// Merges attendance counters into the roster by `mep_id`. Members without
/// an attendance row keep zero counters; the store reports them at 0%.
pub fn build_meps(members: Vec<ApiMember>, attendance: Vec<ApiAttendance>) -> Vec<Mep> {
    let by_id: HashMap<String, ApiAttendance> = attendance
        .into_iter()
        .map(|row| (row.mep_id.clone(), row))
        .collect();

    members
        .into_iter()
        .map(|member| {
            let counters = by_id.get(&member.id);
            if counters.is_none() {
                warn!("No attendance counters for MEP {} ({})", member.id, member.name);
            }

            Mep {
                mep_id: member.id,
                slug: slugify(&member.name),
                name: member.name,
                country: normalize_country(&member.country),
                party: normalize_group(&member.group),
                national_party: member.national_party,
                profile_url: member.profile_url,
                photo_url: member.photo_url,
                partial_term: counters.is_some_and(|c| c.partial_term),
                votes_cast: counters.map_or(0, |c| c.votes_cast),
                votes_total_period: counters.map_or(0, |c| c.votes_total_period),
                attendance_pct: 0.0,
                special_role: None,
            }
        })
        .collect()
}

pub fn build_votes(raw_votes: Vec<ApiVote>) -> Result<Vec<Vote>> {
    raw_votes
        .into_iter()
        .map(|vote| {
            let vote_date = normalize_vote_date(&vote.date)
                .with_context(|| format!("vote {}", vote.id))?;

            Ok(Vote {
                vote_id: vote.id,
                vote_date,
                policy_areas: policy_areas(&vote.title),
                title: vote.title,
                result: vote.result,
                olp_stage: vote.olp_stage,
                total_for: vote.total_for,
                total_against: vote.total_against,
                total_abstain: vote.total_abstain,
                source_url: vote.source_url,
            })
        })
        .collect()
}

/// Joins notable ballots against the vote catalog and groups them by MEP,
/// preserving the curated ballot order. Ballots pointing at votes missing
/// from the catalog are dropped with a warning.
pub fn group_notable(
    ballots: Vec<ApiNotableBallot>,
    votes: &[Vote],
) -> HashMap<String, Vec<NotableVote>> {
    let catalog: HashMap<&str, &Vote> = votes
        .iter()
        .map(|vote| (vote.vote_id.as_str(), vote))
        .collect();

    let mut grouped: HashMap<String, Vec<NotableVote>> = HashMap::new();

    for ballot in ballots {
        let Some(&vote) = catalog.get(ballot.vote_id.as_str()) else {
            warn!(
                "Notable ballot for MEP {} references unknown vote {}",
                ballot.mep_id, ballot.vote_id
            );
            continue;
        };

        grouped.entry(ballot.mep_id.clone()).or_default().push(NotableVote {
            vote: vote.clone(),
            mep_id: ballot.mep_id,
            vote_position: parse_vote_position(&ballot.position),
        });
    }

    grouped
}

fn write_json<T: Serialize>(dir: &Path, file: &str, value: &T) -> Result<()> {
    let tmp = dir.join(format!("{file}.tmp"));
    let target = dir.join(file);

    fs::write(&tmp, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, &target).with_context(|| format!("renaming to {}", target.display()))?;

    Ok(())
}
