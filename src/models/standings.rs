//! Points table models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A rule used to separate teams level on points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TiebreakRule {
    GoalDifference,
    GoalsFor,
    HeadToHead,
}

impl TiebreakRule {
    /// The chain used when a tournament does not configure one.
    pub fn default_chain() -> Vec<TiebreakRule> {
        vec![
            TiebreakRule::GoalDifference,
            TiebreakRule::GoalsFor,
            TiebreakRule::HeadToHead,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TiebreakRule::GoalDifference => "goalDifference",
            TiebreakRule::GoalsFor => "goalsFor",
            TiebreakRule::HeadToHead => "headToHead",
        }
    }
}

impl fmt::Display for TiebreakRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TiebreakRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "goaldifference" | "gd" => Ok(TiebreakRule::GoalDifference),
            "goalsfor" | "gf" => Ok(TiebreakRule::GoalsFor),
            "headtohead" | "h2h" => Ok(TiebreakRule::HeadToHead),
            _ => Err(format!("Unknown tiebreak rule: {}", s)),
        }
    }
}

/// One row of a computed points table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsTableEntry {
    pub team_name: String,
    pub played: u32,
    pub won: u32,
    pub lost: u32,
    pub drawn: u32,
    pub goals_for: u64,
    pub goals_against: u64,
    pub goal_difference: i64,
    pub points: u32,

    /// Set only when the caller asked for qualification marking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified: Option<bool>,
}

impl PointsTableEntry {
    /// A zeroed row for `team_name`.
    pub fn new(team_name: impl Into<String>) -> Self {
        Self {
            team_name: team_name.into(),
            ..Default::default()
        }
    }

    /// Fill in the derived columns from the raw tallies.
    pub fn finalize(&mut self) {
        self.points = self.won * 3 + self.drawn;
        self.goal_difference = self.goals_for as i64 - self.goals_against as i64;
    }

    pub fn is_qualified(&self) -> bool {
        self.qualified.unwrap_or(false)
    }
}

/// A group's name paired with its computed table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTable {
    pub group_name: String,
    pub table: Vec<PointsTableEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiebreak_rule_wire_names() {
        let json = serde_json::to_string(&TiebreakRule::default_chain()).unwrap();
        assert_eq!(json, r#"["goalDifference","goalsFor","headToHead"]"#);
    }

    #[test]
    fn test_tiebreak_rule_from_str() {
        assert_eq!("goalDifference".parse::<TiebreakRule>(), Ok(TiebreakRule::GoalDifference));
        assert_eq!("goals-for".parse::<TiebreakRule>(), Ok(TiebreakRule::GoalsFor));
        assert_eq!("H2H".parse::<TiebreakRule>(), Ok(TiebreakRule::HeadToHead));
        assert!("coin_toss".parse::<TiebreakRule>().is_err());
    }

    #[test]
    fn test_entry_finalize() {
        let mut entry = PointsTableEntry {
            won: 2,
            drawn: 1,
            lost: 3,
            goals_for: 4,
            goals_against: 9,
            ..PointsTableEntry::new("Rovers")
        };
        entry.finalize();

        assert_eq!(entry.points, 7);
        assert_eq!(entry.goal_difference, -5);
    }

    #[test]
    fn test_entry_serialization_camel_case() {
        let json = serde_json::to_value(PointsTableEntry::new("Rovers")).unwrap();
        assert_eq!(json["teamName"], "Rovers");
        assert_eq!(json["goalDifference"], 0);
        assert!(json.get("qualified").is_none());
    }
}
