use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::IntoResponse,
};
use dataset::{Mep, NotableVote, Vote};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::State};

const DEFAULT_LEADERBOARD_LIMIT: i64 = 25;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
    group: Option<String>,
    country: Option<String>,
}

#[derive(Deserialize)]
pub struct LeaderboardParams {
    limit: Option<String>,
}

/// Minimal MEP row for list views; `slug` is what profile links route on.
#[derive(Serialize)]
pub struct SearchRow {
    id: String,
    slug: String,
    name: String,
    country: String,
    party: String,
    national_party: String,
    attendance_pct: f64,
}

impl From<&Mep> for SearchRow {
    fn from(mep: &Mep) -> Self {
        Self {
            id: mep.mep_id.clone(),
            slug: mep.slug.clone(),
            name: mep.name.clone(),
            country: mep.country.clone(),
            party: mep.party.clone(),
            national_party: mep.national_party.clone(),
            attendance_pct: mep.attendance_pct,
        }
    }
}

#[derive(Serialize)]
pub struct LeaderboardRow {
    id: String,
    name: String,
    country: String,
    party: String,
    attendance_pct: f64,
    votes_cast: u32,
    votes_total_period: u32,
}

impl From<&Mep> for LeaderboardRow {
    fn from(mep: &Mep) -> Self {
        Self {
            id: mep.mep_id.clone(),
            name: mep.name.clone(),
            country: mep.country.clone(),
            party: mep.party.clone(),
            attendance_pct: mep.attendance_pct,
            votes_cast: mep.votes_cast,
            votes_total_period: mep.votes_total_period,
        }
    }
}

#[derive(Serialize)]
pub struct LeaderboardResponse {
    top: Vec<LeaderboardRow>,
    bottom: Vec<LeaderboardRow>,
}

/// Absent or unparsable limits fall back to the default; the store itself
/// turns non-positive limits into an empty board.
fn parse_limit(raw: Option<&str>) -> i64 {
    raw.map_or(DEFAULT_LEADERBOARD_LIMIT, |value| {
        value.parse().unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
    })
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok").into_response()
}

pub async fn search_handler(
    AxumState(state): AxumState<Arc<State>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchRow>>, AppError> {
    let store = state.store.get()?;

    let rows = store
        .search_meps(
            &params.q,
            params.group.as_deref(),
            params.country.as_deref(),
        )
        .into_iter()
        .map(SearchRow::from)
        .collect();

    Ok(Json(rows))
}

pub async fn mep_handler(
    AxumState(state): AxumState<Arc<State>>,
    Path(id): Path<String>,
) -> Result<Json<Mep>, AppError> {
    let store = state.store.get()?;
    let mep = store.mep(&id).ok_or(AppError::NotFound)?;

    Ok(Json(mep.clone()))
}

pub async fn notable_handler(
    AxumState(state): AxumState<Arc<State>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<NotableVote>>, AppError> {
    let store = state.store.get()?;

    Ok(Json(store.notable_votes(&id).to_vec()))
}

pub async fn vote_handler(
    AxumState(state): AxumState<Arc<State>>,
    Path(vote_id): Path<String>,
) -> Result<Json<Vote>, AppError> {
    let store = state.store.get()?;
    let vote = store.vote(&vote_id).ok_or(AppError::NotFound)?;

    Ok(Json(vote.clone()))
}

pub async fn leaderboard_handler(
    AxumState(state): AxumState<Arc<State>>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let store = state.store.get()?;
    let limit = parse_limit(params.limit.as_deref());

    Ok(Json(LeaderboardResponse {
        top: store
            .leaderboard_top(limit)
            .into_iter()
            .map(LeaderboardRow::from)
            .collect(),
        bottom: store
            .leaderboard_bottom(limit)
            .into_iter()
            .map(LeaderboardRow::from)
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::parse_limit;

    #[test]
    fn test_limit_defaults() {
        assert_eq!(parse_limit(None), 25);
        assert_eq!(parse_limit(Some("10")), 10);
        assert_eq!(parse_limit(Some("banana")), 25);
        assert_eq!(parse_limit(Some("")), 25);
        assert_eq!(parse_limit(Some("-1")), -1);
    }
}
