//! Points table computation.
//!
//! Builds a ranked table from a roster, a schedule and a sparse score map:
//! three points for a win, one for a draw, then the configured tie-break
//! chain, then team name as the final deterministic separator.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::head_to_head::HeadToHead;
use crate::models::{MatchKey, PointsTableEntry, Round, ScoresMap, Team, TiebreakRule};

/// Knobs for a single table computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsOptions {
    /// Use away goals inside head-to-head when aggregates are level
    #[serde(default)]
    pub away_goals_rule: bool,

    /// Group prefix used to build score keys
    #[serde(default)]
    pub group_name: Option<String>,

    /// Mark the first N rows as qualified
    #[serde(default)]
    pub teams_to_qualify: Option<u32>,

    /// Tie-break rules in priority order
    #[serde(default = "TiebreakRule::default_chain")]
    pub tiebreaker_rules: Vec<TiebreakRule>,
}

impl Default for StandingsOptions {
    fn default() -> Self {
        Self {
            away_goals_rule: false,
            group_name: None,
            teams_to_qualify: None,
            tiebreaker_rules: TiebreakRule::default_chain(),
        }
    }
}

impl StandingsOptions {
    pub fn with_away_goals(mut self, enabled: bool) -> Self {
        self.away_goals_rule = enabled;
        self
    }

    pub fn with_group(mut self, group_name: impl Into<String>) -> Self {
        self.group_name = Some(group_name.into());
        self
    }

    pub fn with_qualification(mut self, teams_to_qualify: u32) -> Self {
        self.teams_to_qualify = Some(teams_to_qualify);
        self
    }

    pub fn with_rules(mut self, rules: Vec<TiebreakRule>) -> Self {
        self.tiebreaker_rules = rules;
        self
    }
}

/// Everything a pairwise comparison needs besides the two rows.
struct RankContext<'a> {
    rounds: &'a [Round],
    scores: &'a ScoresMap,
    options: &'a StandingsOptions,
}

impl RankContext<'_> {
    fn compare_by_rule(
        &self,
        rule: TiebreakRule,
        a: &PointsTableEntry,
        b: &PointsTableEntry,
    ) -> Ordering {
        match rule {
            TiebreakRule::GoalDifference => b.goal_difference.cmp(&a.goal_difference),
            TiebreakRule::GoalsFor => b.goals_for.cmp(&a.goals_for),
            TiebreakRule::HeadToHead => HeadToHead::between(
                &a.team_name,
                &b.team_name,
                self.rounds,
                self.scores,
                self.options.group_name.as_deref(),
            )
            .compare(self.options.away_goals_rule),
        }
    }

    fn compare(&self, a: &PointsTableEntry, b: &PointsTableEntry) -> Ordering {
        b.points
            .cmp(&a.points)
            .then_with(|| {
                self.options
                    .tiebreaker_rules
                    .iter()
                    .map(|&rule| self.compare_by_rule(rule, a, b))
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.team_name.cmp(&b.team_name))
    }
}

/// Credit one side of a played match.
fn record_result(entry: &mut PointsTableEntry, scored: u32, conceded: u32) {
    entry.played += 1;
    entry.goals_for += u64::from(scored);
    entry.goals_against += u64::from(conceded);
    match scored.cmp(&conceded) {
        Ordering::Greater => entry.won += 1,
        Ordering::Less => entry.lost += 1,
        Ordering::Equal => entry.drawn += 1,
    }
}

/// Stable insertion sort. Head-to-head is not transitive across three
/// teams, and the std sorts may panic on an inconsistent comparator.
fn insertion_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Compute a fully ranked points table.
///
/// Byes, unplayed matches and matches naming a team outside `teams`
/// contribute nothing. Inputs are only borrowed, never modified.
pub fn compute_standings(
    teams: &[Team],
    rounds: &[Round],
    scores: &ScoresMap,
    options: &StandingsOptions,
) -> Vec<PointsTableEntry> {
    let group = options.group_name.as_deref();

    let mut table: Vec<PointsTableEntry> = teams
        .iter()
        .map(|t| PointsTableEntry::new(t.name.as_str()))
        .collect();
    let index: HashMap<&str, usize> = teams
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name.as_str(), i))
        .collect();

    let mut counted = 0usize;
    for round in rounds {
        for m in &round.matches {
            let Some((name1, name2)) = m.teams() else {
                continue;
            };
            let key = MatchKey::new(group, round.round_number, m.match_number);
            let Some((score1, score2)) = scores.goals(&key) else {
                continue;
            };
            let (Some(&i1), Some(&i2)) = (index.get(name1), index.get(name2)) else {
                trace!("Skipping {}: {} v {} not in this table", key, name1, name2);
                continue;
            };

            record_result(&mut table[i1], score1, score2);
            record_result(&mut table[i2], score2, score1);
            counted += 1;
        }
    }

    for entry in &mut table {
        entry.finalize();
    }

    let ctx = RankContext {
        rounds,
        scores,
        options,
    };
    insertion_sort_by(&mut table, |a, b| ctx.compare(a, b));

    if let Some(n) = options.teams_to_qualify.filter(|&n| n > 0) {
        for (position, entry) in table.iter_mut().enumerate() {
            entry.qualified = Some(position < n as usize);
        }
    }

    debug!(
        "Computed standings for {} teams from {} played matches{}",
        table.len(),
        counted,
        group.map(|g| format!(" (group {})", g)).unwrap_or_default()
    );

    table
}
