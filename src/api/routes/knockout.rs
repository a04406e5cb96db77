use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Round, TournamentId};

#[derive(Debug, Serialize)]
pub struct AdvanceResponse {
    pub advanced: bool,
    pub round: Option<Round>,
}

/// Seed the first knockout round from the group qualifiers.
pub async fn seed_knockout(
    State(state): State<AppState>,
    Path(id): Path<TournamentId>,
) -> Result<(StatusCode, Json<Round>), ApiError> {
    let store = state.store.write().await;
    let mut tournament = store.get(id)?;
    let round = tournament.seed_knockout()?.clone();
    store.upsert(&tournament)?;

    info!(
        "Seeded knockout round {} for {} with {} matches",
        round.round_number,
        id,
        round.matches.len()
    );
    Ok((StatusCode::CREATED, Json(round)))
}

/// Add the next knockout round once the current one is decided.
pub async fn advance_knockout(
    State(state): State<AppState>,
    Path(id): Path<TournamentId>,
) -> Result<Json<AdvanceResponse>, ApiError> {
    let store = state.store.write().await;
    let mut tournament = store.get(id)?;
    let round = tournament.advance_knockout()?.cloned();

    if round.is_some() {
        store.upsert(&tournament)?;
    }

    Ok(Json(AdvanceResponse {
        advanced: round.is_some(),
        round,
    }))
}
