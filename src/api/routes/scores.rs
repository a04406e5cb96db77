use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{MatchKey, ScoreRecord, ScoreUpdate, TournamentId};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub match_id: MatchKey,
    pub score: ScoreRecord,
}

#[derive(Debug, Deserialize)]
pub struct LockRequest {
    pub locked: bool,
}

fn parse_key(match_id: &str) -> Result<MatchKey, ApiError> {
    match_id
        .parse::<MatchKey>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

pub async fn record_score(
    State(state): State<AppState>,
    Path((id, match_id)): Path<(TournamentId, String)>,
    Json(update): Json<ScoreUpdate>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let key = parse_key(&match_id)?;

    let store = state.store.write().await;
    let mut tournament = store.get(id)?;
    let score = tournament.record_score(key.clone(), &update)?;
    store.upsert(&tournament)?;

    info!("Recorded {} in {}: {:?}", key, id, score.goals());
    Ok(Json(ScoreResponse {
        match_id: key,
        score,
    }))
}

pub async fn set_lock(
    State(state): State<AppState>,
    Path((id, match_id)): Path<(TournamentId, String)>,
    Json(req): Json<LockRequest>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let key = parse_key(&match_id)?;

    let store = state.store.write().await;
    let mut tournament = store.get(id)?;
    tournament.set_locked(key.clone(), req.locked)?;
    store.upsert(&tournament)?;

    let score = tournament.scores.get(&key).cloned().unwrap_or_default();
    Ok(Json(ScoreResponse {
        match_id: key,
        score,
    }))
}
