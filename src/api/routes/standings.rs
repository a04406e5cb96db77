use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{GroupTable, PointsTableEntry, TournamentId};

#[derive(Debug, Deserialize)]
pub struct StandingsParams {
    pub group: Option<String>,
    pub qualify: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsResponse {
    pub tournament_id: TournamentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub table: Vec<PointsTableEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStandingsResponse {
    pub tournament_id: TournamentId,
    pub groups: Vec<GroupTable>,
}

pub async fn standings(
    State(state): State<AppState>,
    Path(id): Path<TournamentId>,
    Query(params): Query<StandingsParams>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let tournament = state.store.read().await.get(id)?;
    let table = tournament.table(params.group.as_deref(), params.qualify)?;

    Ok(Json(StandingsResponse {
        tournament_id: id,
        group: params.group,
        table,
    }))
}

pub async fn group_standings(
    State(state): State<AppState>,
    Path(id): Path<TournamentId>,
) -> Result<Json<GroupStandingsResponse>, ApiError> {
    let tournament = state.store.read().await.get(id)?;

    Ok(Json(GroupStandingsResponse {
        tournament_id: id,
        groups: tournament.group_standings(),
    }))
}
