//! # MEP Dataset
//!
//! In-memory index over Members of the European Parliament and their voting
//! records. Built once per process from a directory of JSON documents,
//! immutable afterwards.
//!
//! ## Overall Data Structures
//!
//! - MEP roster (list of records in load order): identity, vote counters,
//!   derived attendance percentage, optional institutional role.
//! - Vote catalog (list of records in load order): one entry per roll-call
//!   vote with outcome totals and policy-area tags.
//! - Notable votes (map of MEP id to vote list): externally curated
//!   significant votes per MEP, returned verbatim.
//! - Id indexes (map of id to list position): O(1) lookups without giving up
//!   the deterministic load ordering used by search results.
//!
//! ## Lifecycle
//!
//! [`SharedStore`] owns the laziness: the first caller builds, every
//! concurrent caller converges on the same fully-built [`DataStore`]. A
//! failed build publishes nothing, so a later request retries the load.

pub mod loader;
pub mod models;
pub mod shared;
pub mod store;

pub use loader::{DataError, RawDataset};
pub use models::{Mep, NotableVote, SpecialRole, Vote, VotePosition};
pub use shared::SharedStore;
pub use store::DataStore;
