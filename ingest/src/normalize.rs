//! Source-data cleanup: canonical country and group names, slugs, ballot
//! positions and policy-area tags.

use anyhow::{Result, bail};
use chrono::NaiveDate;
use dataset::VotePosition;
use regex::Regex;
use tracing::warn;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y"];

/// Parses the date spellings seen across the source exports and reformats
/// to YYYY-MM-DD.
pub fn normalize_vote_date(raw: &str) -> Result<String> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw.trim(), format) {
            return Ok(date.format("%Y-%m-%d").to_string());
        }
    }

    bail!("unrecognized vote date {raw:?}");
}

/// Canonical short names for countries the sources spell differently.
pub fn normalize_country(country: &str) -> String {
    match country.trim() {
        "Czech Republic" => "Czechia",
        "United Kingdom" => "UK",
        other => other,
    }
    .to_string()
}

/// Canonical abbreviation for a European political group.
pub fn normalize_group(group: &str) -> String {
    match group.trim() {
        "European People's Party (Christian Democrats)" => "EPP",
        "Progressive Alliance of Socialists and Democrats" => "S&D",
        "Renew Europe" => "RE",
        "European Conservatives and Reformists" => "ECR",
        "Identity and Democracy" => "ID",
        "The Left" => "GUE/NGL",
        "Greens/European Free Alliance" => "Greens/EFA",
        "Non-attached Members" => "NI",
        other => other,
    }
    .to_string()
}

/// URL-safe slug: lowercase, alphanumerics and single dashes only.
pub fn slugify(text: &str) -> String {
    let strip = Regex::new(r"[^a-z0-9\s-]").unwrap();
    let s = strip.replace_all(&text.to_lowercase(), "").into_owned();

    let dashes = Regex::new(r"[\s-]+").unwrap();
    dashes
        .replace_all(s.trim(), "-")
        .trim_matches('-')
        .to_string()
}

/// Tolerant parser for ballot-position strings. Unknown spellings count as
/// not voting, matching how absence is recorded upstream.
pub fn parse_vote_position(raw: &str) -> VotePosition {
    match raw.to_lowercase().trim() {
        "for" | "yes" | "in favour" => VotePosition::For,
        "against" | "no" | "opposed" => VotePosition::Against,
        "abstain" | "abstention" | "abstained" => VotePosition::Abstain,
        "absent" | "not voting" | "did not vote" | "no vote" => VotePosition::NotVoting,
        other => {
            warn!("Unknown vote position {other:?}, recording as not voting");
            VotePosition::NotVoting
        }
    }
}

const AREA_KEYWORDS: &[(&str, &str)] = &[
    ("climate", "Climate & Environment"),
    ("environment", "Climate & Environment"),
    ("emission", "Climate & Environment"),
    ("energy", "Energy"),
    ("renewable", "Energy"),
    ("nuclear", "Energy"),
    ("migration", "Migration & Asylum"),
    ("asylum", "Migration & Asylum"),
    ("border", "Migration & Asylum"),
    ("digital", "Digital & Technology"),
    ("artificial intelligence", "Digital & Technology"),
    ("data", "Digital & Technology"),
    ("privacy", "Digital & Technology"),
    ("trade", "Trade & Economy"),
    ("budget", "Trade & Economy"),
    ("fiscal", "Trade & Economy"),
    ("agriculture", "Agriculture"),
    ("farming", "Agriculture"),
    ("health", "Health"),
    ("pharmaceutical", "Health"),
    ("education", "Education & Culture"),
    ("culture", "Education & Culture"),
    ("transport", "Transport"),
    ("defense", "Defense & Security"),
    ("security", "Defense & Security"),
    ("foreign", "Foreign Affairs"),
    ("human rights", "Human Rights"),
    ("rule of law", "Democracy & Rule of Law"),
    ("justice", "Justice & Home Affairs"),
];

/// Keyword-derived policy-area tags for a vote title. Order follows the
/// keyword table so repeated runs tag identically.
pub fn policy_areas(title: &str) -> Vec<String> {
    let haystack = title.to_lowercase();
    let mut areas: Vec<String> = Vec::new();

    for (keyword, area) in AREA_KEYWORDS {
        if haystack.contains(keyword) && !areas.iter().any(|a| a == area) {
            areas.push((*area).to_string());
        }
    }

    areas
}
