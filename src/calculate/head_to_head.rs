//! Head-to-head resolution between two teams level on points.

use std::cmp::Ordering;

use crate::models::{MatchKey, Round, ScoresMap};

/// Aggregate and away-goal tallies over every meeting of two teams.
///
/// In each leg `team1` is treated as the host, so goals scored from the
/// `team2` slot count as away goals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadToHead {
    /// Meetings with a recorded score
    pub legs: u32,
    pub aggregate_a: u64,
    pub aggregate_b: u64,
    pub away_goals_a: u64,
    pub away_goals_b: u64,
}

impl HeadToHead {
    /// Tally every played meeting of `a` and `b` across `rounds`.
    pub fn between(
        a: &str,
        b: &str,
        rounds: &[Round],
        scores: &ScoresMap,
        group: Option<&str>,
    ) -> Self {
        let mut h2h = Self::default();

        for round in rounds {
            for m in round.matches.iter().filter(|m| m.involves(a, b)) {
                let key = MatchKey::new(group, round.round_number, m.match_number);
                let Some((score1, score2)) = scores.goals(&key) else {
                    continue;
                };
                let (score1, score2) = (u64::from(score1), u64::from(score2));

                h2h.legs += 1;
                if m.team1.team_name() == Some(a) {
                    h2h.aggregate_a += score1;
                    h2h.aggregate_b += score2;
                    h2h.away_goals_b += score2;
                } else {
                    h2h.aggregate_a += score2;
                    h2h.aggregate_b += score1;
                    h2h.away_goals_a += score2;
                }
            }
        }

        h2h
    }

    /// Ordering of `a` relative to `b` (`Less` means `a` ranks higher).
    /// `Equal` when the meetings do not separate them.
    pub fn compare(&self, away_goals_rule: bool) -> Ordering {
        if self.legs == 0 {
            return Ordering::Equal;
        }

        let by_aggregate = self.aggregate_b.cmp(&self.aggregate_a);
        if by_aggregate != Ordering::Equal || !away_goals_rule {
            return by_aggregate;
        }

        self.away_goals_b.cmp(&self.away_goals_a)
    }
}
