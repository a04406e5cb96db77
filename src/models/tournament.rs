//! Tournament aggregate: roster, schedule, scores and ranking settings.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{
    Group, GroupTable, Match, MatchKey, PointsTableEntry, Round, ScoreRecord, ScoreUpdate,
    ScoresMap, Team, TiebreakRule,
};
use crate::calculate::{self, StandingsOptions};

/// Type alias for tournament IDs
pub type TournamentId = Uuid;

/// Errors raised by tournament edits and lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TournamentError {
    #[error("No match scheduled for {0}")]
    UnknownMatch(MatchKey),

    #[error("No group named {0}")]
    UnknownGroup(String),

    #[error("Score for {0} is locked")]
    MatchLocked(MatchKey),

    #[error("Match {0} involves a bye and takes no score")]
    ByeMatch(MatchKey),

    #[error("Invalid tournament: {0}")]
    Invalid(String),
}

/// Competition format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TournamentFormat {
    #[default]
    RoundRobin,
    SingleElimination,
    /// Group stage followed by a knockout bracket
    Hybrid,
}

/// Ranking settings shared by every table in a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSettings {
    #[serde(default)]
    pub away_goals_rule: bool,

    /// Teams advancing from each table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams_to_qualify: Option<u32>,

    #[serde(default = "TiebreakRule::default_chain")]
    pub tiebreaker_rules: Vec<TiebreakRule>,
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self {
            away_goals_rule: false,
            teams_to_qualify: None,
            tiebreaker_rules: TiebreakRule::default_chain(),
        }
    }
}

impl TournamentSettings {
    /// Engine options for an ungrouped table.
    pub fn options(&self) -> StandingsOptions {
        StandingsOptions {
            away_goals_rule: self.away_goals_rule,
            group_name: None,
            teams_to_qualify: self.teams_to_qualify,
            tiebreaker_rules: self.tiebreaker_rules.clone(),
        }
    }
}

/// A tournament and everything recorded for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    #[serde(default)]
    pub format: TournamentFormat,
    #[serde(default)]
    pub teams: Vec<Team>,

    /// Ungrouped rounds: the whole schedule for round robin and
    /// elimination formats, the knockout bracket for hybrids
    #[serde(default)]
    pub rounds: Vec<Round>,

    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub scores: ScoresMap,
    #[serde(default)]
    pub settings: TournamentSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Create an empty tournament with a fresh ID.
    pub fn new(name: impl Into<String>, format: TournamentFormat, teams: Vec<Team>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format,
            teams,
            rounds: Vec::new(),
            groups: Vec::new(),
            scores: ScoresMap::new(),
            settings: TournamentSettings::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_rounds(mut self, rounds: Vec<Round>) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_groups(mut self, groups: Vec<Group>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_settings(mut self, settings: TournamentSettings) -> Self {
        self.settings = settings;
        self
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn group(&self, name: &str) -> Result<&Group, TournamentError> {
        self.groups
            .iter()
            .find(|g| g.group_name == name)
            .ok_or_else(|| TournamentError::UnknownGroup(name.to_string()))
    }

    /// The scheduled match a score key points at.
    pub fn find_match(&self, key: &MatchKey) -> Option<&Match> {
        let rounds = match &key.group {
            None => &self.rounds,
            Some(name) => &self.group(name).ok()?.rounds,
        };
        rounds
            .iter()
            .find(|r| r.round_number == key.round)?
            .find_match(key.match_number)
    }

    /// Enter or correct a result. Locked records are refused.
    pub fn record_score(
        &mut self,
        key: MatchKey,
        update: &ScoreUpdate,
    ) -> Result<ScoreRecord, TournamentError> {
        let is_bye = self
            .find_match(&key)
            .ok_or_else(|| TournamentError::UnknownMatch(key.clone()))?
            .is_bye();
        if is_bye {
            return Err(TournamentError::ByeMatch(key));
        }
        if self.scores.get(&key).is_some_and(|r| r.locked) {
            return Err(TournamentError::MatchLocked(key));
        }

        let record = self.scores.entry(key);
        update.apply(record);
        let recorded = record.clone();
        self.touch();
        Ok(recorded)
    }

    /// Lock or unlock a result against further edits.
    pub fn set_locked(&mut self, key: MatchKey, locked: bool) -> Result<(), TournamentError> {
        if self.find_match(&key).is_none() {
            return Err(TournamentError::UnknownMatch(key));
        }
        self.scores.entry(key).locked = locked;
        self.touch();
        Ok(())
    }

    /// Table for the ungrouped rounds, or for one group.
    ///
    /// Group tables only list teams that appear in that group's schedule.
    /// `teams_to_qualify` overrides the tournament setting when given.
    pub fn table(
        &self,
        group: Option<&str>,
        teams_to_qualify: Option<u32>,
    ) -> Result<Vec<PointsTableEntry>, TournamentError> {
        let mut options = self.settings.options();
        if teams_to_qualify.is_some() {
            options.teams_to_qualify = teams_to_qualify;
        }

        let table = match group {
            None => calculate::compute_standings(&self.teams, &self.rounds, &self.scores, &options),
            Some(name) => {
                let group = self.group(name)?;
                let members = group.team_names();
                let teams: Vec<Team> = self
                    .teams
                    .iter()
                    .filter(|t| members.contains(&t.name.as_str()))
                    .cloned()
                    .collect();
                let options = options.with_group(name);
                calculate::compute_standings(&teams, &group.rounds, &self.scores, &options)
            }
        };
        Ok(table)
    }

    /// Table for the ungrouped rounds with the tournament's settings.
    pub fn standings(&self) -> Vec<PointsTableEntry> {
        calculate::compute_standings(
            &self.teams,
            &self.rounds,
            &self.scores,
            &self.settings.options(),
        )
    }

    /// One table per group, in group order.
    pub fn group_standings(&self) -> Vec<GroupTable> {
        self.groups
            .iter()
            .filter_map(|g| {
                let table = self.table(Some(&g.group_name), None).ok()?;
                Some(GroupTable {
                    group_name: g.group_name.clone(),
                    table,
                })
            })
            .collect()
    }

    fn next_round_number(&self) -> u32 {
        self.rounds
            .iter()
            .map(|r| r.round_number)
            .max()
            .map_or(1, |n| n + 1)
    }

    /// Seed a knockout round from the group qualifiers and append it.
    pub fn seed_knockout(&mut self) -> Result<&Round, TournamentError> {
        if self.format != TournamentFormat::Hybrid {
            return Err(TournamentError::Invalid(format!(
                "Knockout seeding needs a hybrid tournament, not {:?}",
                self.format
            )));
        }
        if !self.rounds.is_empty() {
            return Err(TournamentError::Invalid(
                "Knockout round already seeded".to_string(),
            ));
        }

        let qualified = calculate::qualifiers(&self.group_standings());
        if qualified.len() < 2 {
            return Err(TournamentError::Invalid(format!(
                "Need at least two qualified teams to seed a knockout round, found {}",
                qualified.len()
            )));
        }

        let round = calculate::seed_round(&qualified, self.next_round_number());
        self.rounds.push(round);
        self.touch();
        Ok(&self.rounds[self.rounds.len() - 1])
    }

    /// Append the round after the last ungrouped round once it is decided.
    /// `Ok(None)` while results are outstanding or the final has been played.
    pub fn advance_knockout(&mut self) -> Result<Option<&Round>, TournamentError> {
        if self.format == TournamentFormat::RoundRobin {
            return Err(TournamentError::Invalid(
                "Round-robin tournaments have no knockout rounds".to_string(),
            ));
        }

        let last = self
            .rounds
            .iter()
            .max_by_key(|r| r.round_number)
            .ok_or_else(|| TournamentError::Invalid("No rounds to advance from".to_string()))?;

        let Some(next) = calculate::next_round(last, &self.scores, None) else {
            return Ok(None);
        };
        self.rounds.push(next);
        self.touch();
        Ok(self.rounds.last())
    }

    /// Check roster and schedule consistency.
    pub fn validate(&self) -> Result<(), TournamentError> {
        let invalid = |msg: String| -> Result<(), TournamentError> { Err(TournamentError::Invalid(msg)) };

        if self.name.trim().is_empty() {
            return invalid("Name must not be empty".to_string());
        }

        let mut names = HashSet::new();
        for team in &self.teams {
            if team.name.trim().eq_ignore_ascii_case("bye") {
                return invalid(format!("Team name '{}' is reserved", team.name));
            }
            if !names.insert(team.name.as_str()) {
                return invalid(format!("Duplicate team name: {}", team.name));
            }
        }

        let mut group_names = HashSet::new();
        for group in &self.groups {
            if !group_names.insert(group.group_name.as_str()) {
                return invalid(format!("Duplicate group name: {}", group.group_name));
            }
        }

        let schedules = std::iter::once((None, &self.rounds))
            .chain(self.groups.iter().map(|g| (Some(g.group_name.as_str()), &g.rounds)));

        for (group, rounds) in schedules {
            let mut round_numbers = HashSet::new();
            for round in rounds {
                if !round_numbers.insert(round.round_number) {
                    return invalid(format!(
                        "Duplicate round {} in {}",
                        round.round_number,
                        group.map_or("main schedule".to_string(), |g| format!("group {}", g))
                    ));
                }

                let mut match_numbers = HashSet::new();
                for m in &round.matches {
                    let key = MatchKey::new(group, round.round_number, m.match_number);
                    if !match_numbers.insert(m.match_number) {
                        return invalid(format!("Duplicate match number {}", key));
                    }
                    for slot in [&m.team1, &m.team2] {
                        if let Some(name) = slot.team_name() {
                            if !names.contains(name) {
                                return invalid(format!("Match {} names unknown team {}", key, name));
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
