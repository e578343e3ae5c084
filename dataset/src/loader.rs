//! Reads the four JSON documents of a dataset directory into a [`RawDataset`].
//!
//! The directory is written by the ingest pipeline:
//! - `meps.json` — roster with vote counters
//! - `votes.json` — roll-call vote catalog
//! - `notable-votes.json` — curated notable votes grouped by MEP id
//! - `roles.json` — static `mep_id` to institutional-role mapping
//!
//! Any unreadable or malformed file aborts the load; callers never see a
//! partially populated dataset.

use std::{
    collections::HashMap,
    fs::read_to_string,
    io,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{Mep, NotableVote, SpecialRole, Vote};

pub const MEPS_FILE: &str = "meps.json";
pub const VOTES_FILE: &str = "votes.json";
pub const NOTABLE_FILE: &str = "notable-votes.json";
pub const ROLES_FILE: &str = "roles.json";

/// Backing source failure. Every variant is a `DataUnavailable`-class error:
/// the current request fails, the process keeps serving, a later load call
/// retries from scratch.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed dataset file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid dataset record: {0}")]
    Invalid(String),
}

/// Parsed but not yet enriched dataset, as read off disk.
#[derive(Debug, Default)]
pub struct RawDataset {
    pub meps: Vec<Mep>,
    pub votes: Vec<Vote>,
    pub notable_by_mep: HashMap<String, Vec<NotableVote>>,
    pub roles: HashMap<String, SpecialRole>,
}

pub fn load_dir(dir: &Path) -> Result<RawDataset, DataError> {
    Ok(RawDataset {
        meps: read_json(dir.join(MEPS_FILE))?,
        votes: read_json(dir.join(VOTES_FILE))?,
        notable_by_mep: read_json(dir.join(NOTABLE_FILE))?,
        roles: read_json(dir.join(ROLES_FILE))?,
    })
}

fn read_json<T: DeserializeOwned>(path: PathBuf) -> Result<T, DataError> {
    let contents = read_to_string(&path).map_err(|source| DataError::Unreadable {
        path: path.clone(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| DataError::Malformed { path, source })
}
