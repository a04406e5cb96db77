use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::models::{
    Group, Round, ScoresMap, Team, Tournament, TournamentFormat, TournamentId, TournamentSettings,
};

#[derive(Debug, Deserialize)]
pub struct ListTournamentsParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSummary {
    pub id: TournamentId,
    pub name: String,
    pub format: TournamentFormat,
    pub team_count: u32,
    pub match_count: u32,
    pub played_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Tournament> for TournamentSummary {
    fn from(t: &Tournament) -> Self {
        let match_count = t
            .rounds
            .iter()
            .chain(t.groups.iter().flat_map(|g| g.rounds.iter()))
            .flat_map(|r| r.matches.iter())
            .filter(|m| !m.is_bye())
            .count() as u32;
        let played_count = t.scores.iter().filter(|(_, s)| s.is_played()).count() as u32;

        Self {
            id: t.id,
            name: t.name.clone(),
            format: t.format,
            team_count: t.teams.len() as u32,
            match_count,
            played_count,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TournamentListResponse {
    pub tournaments: Vec<TournamentSummary>,
    pub pagination: PaginationMeta,
}

/// Body of a create request. The schedule comes from an external fixture
/// generator or is entered by hand.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTournamentRequest {
    pub name: String,
    #[serde(default)]
    pub format: TournamentFormat,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub scores: Option<ScoresMap>,
    #[serde(default)]
    pub settings: Option<TournamentSettings>,
}

impl CreateTournamentRequest {
    /// Build the tournament, falling back to `defaults` when no settings
    /// were given.
    pub fn into_tournament(self, defaults: &TournamentSettings) -> Tournament {
        let settings = self.settings.unwrap_or_else(|| defaults.clone());
        let mut tournament = Tournament::new(self.name, self.format, self.teams)
            .with_rounds(self.rounds)
            .with_groups(self.groups)
            .with_settings(settings);
        if let Some(scores) = self.scores {
            tournament.scores = scores;
        }
        tournament
    }
}

pub async fn list_tournaments(
    State(state): State<AppState>,
    Query(params): Query<ListTournamentsParams>,
) -> Result<Json<TournamentListResponse>, ApiError> {
    let tournaments = state.store.read().await.list()?;

    let pagination = Pagination::new(params.page, params.page_size);
    let meta = PaginationMeta::new(&pagination, tournaments.len() as u32);

    Ok(Json(TournamentListResponse {
        tournaments: pagination
            .page_of(&tournaments)
            .iter()
            .map(TournamentSummary::from)
            .collect(),
        pagination: meta,
    }))
}

pub async fn create_tournament(
    State(state): State<AppState>,
    Json(req): Json<CreateTournamentRequest>,
) -> Result<(StatusCode, Json<Tournament>), ApiError> {
    let tournament = req.into_tournament(&state.defaults);
    tournament.validate()?;

    state.store.write().await.insert(&tournament)?;

    Ok((StatusCode::CREATED, Json(tournament)))
}

pub async fn get_tournament(
    State(state): State<AppState>,
    Path(id): Path<TournamentId>,
) -> Result<Json<Tournament>, ApiError> {
    let tournament = state.store.read().await.get(id)?;
    Ok(Json(tournament))
}

pub async fn delete_tournament(
    State(state): State<AppState>,
    Path(id): Path<TournamentId>,
) -> Result<StatusCode, ApiError> {
    state.store.write().await.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
