//! Schedule models: slots, matches, rounds and groups.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One side of a scheduled match.
///
/// Stored fixtures use a team literally named "Bye" (any casing) as the
/// placeholder opponent, so the string form is kept on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Slot {
    Team(String),
    Bye,
}

impl Slot {
    /// Name of the team in this slot, `None` for a bye.
    pub fn team_name(&self) -> Option<&str> {
        match self {
            Slot::Team(name) => Some(name),
            Slot::Bye => None,
        }
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Slot::Bye)
    }
}

impl From<String> for Slot {
    fn from(s: String) -> Self {
        if s.eq_ignore_ascii_case("bye") {
            Slot::Bye
        } else {
            Slot::Team(s)
        }
    }
}

impl From<&str> for Slot {
    fn from(s: &str) -> Self {
        Slot::from(s.to_string())
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        match slot {
            Slot::Team(name) => name,
            Slot::Bye => "Bye".to_string(),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Team(name) => write!(f, "{}", name),
            Slot::Bye => write!(f, "Bye"),
        }
    }
}

/// A single fixture within a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Position within the round, unique per round
    pub match_number: u32,

    /// Home side
    #[serde(alias = "team1Name")]
    pub team1: Slot,

    /// Away side
    #[serde(alias = "team2Name")]
    pub team2: Slot,
}

impl Match {
    pub fn new(match_number: u32, team1: impl Into<Slot>, team2: impl Into<Slot>) -> Self {
        Self {
            match_number,
            team1: team1.into(),
            team2: team2.into(),
        }
    }

    /// Whether either side is a bye.
    pub fn is_bye(&self) -> bool {
        self.team1.is_bye() || self.team2.is_bye()
    }

    /// Both team names, or `None` if the match involves a bye.
    pub fn teams(&self) -> Option<(&str, &str)> {
        Some((self.team1.team_name()?, self.team2.team_name()?))
    }

    /// True iff this match is between exactly `a` and `b`, in either order.
    pub fn involves(&self, a: &str, b: &str) -> bool {
        match self.teams() {
            Some((t1, t2)) => (t1 == a && t2 == b) || (t1 == b && t2 == a),
            None => false,
        }
    }
}

/// An ordered stage of the competition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub round_number: u32,
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl Round {
    pub fn new(round_number: u32, matches: Vec<Match>) -> Self {
        Self {
            round_number,
            matches,
        }
    }

    pub fn find_match(&self, match_number: u32) -> Option<&Match> {
        self.matches.iter().find(|m| m.match_number == match_number)
    }
}

/// A named group-stage schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub group_name: String,
    #[serde(default)]
    pub rounds: Vec<Round>,
}

impl Group {
    pub fn new(group_name: impl Into<String>, rounds: Vec<Round>) -> Self {
        Self {
            group_name: group_name.into(),
            rounds,
        }
    }

    /// Distinct real team names in the order they first appear.
    pub fn team_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for slot in self
            .rounds
            .iter()
            .flat_map(|r| r.matches.iter())
            .flat_map(|m| [&m.team1, &m.team2])
        {
            if let Some(name) = slot.team_name() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bye_detection_is_case_insensitive() {
        assert_eq!(Slot::from("bye"), Slot::Bye);
        assert_eq!(Slot::from("BYE"), Slot::Bye);
        assert_eq!(Slot::from("Bye"), Slot::Bye);
        assert_eq!(Slot::from("Byers"), Slot::Team("Byers".to_string()));
        assert_eq!(Slot::from(" bye "), Slot::Team(" bye ".to_string()));
    }

    #[test]
    fn test_slot_wire_format() {
        let m: Match =
            serde_json::from_str(r#"{"matchNumber":1,"team1Name":"Rovers","team2Name":"BYE"}"#)
                .unwrap();
        assert!(m.is_bye());
        assert_eq!(m.teams(), None);

        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["team1"], "Rovers");
        assert_eq!(json["team2"], "Bye");
    }

    #[test]
    fn test_match_involves_either_order() {
        let m = Match::new(1, "A", "B");
        assert!(m.involves("A", "B"));
        assert!(m.involves("B", "A"));
        assert!(!m.involves("A", "C"));
        assert!(!Match::new(2, "A", "Bye").involves("A", "Bye"));
    }

    #[test]
    fn test_group_team_names_distinct_in_order() {
        let group = Group::new(
            "A",
            vec![
                Round::new(1, vec![Match::new(1, "X", "Y"), Match::new(2, "Z", "bye")]),
                Round::new(2, vec![Match::new(1, "Y", "Z")]),
            ],
        );
        assert_eq!(group.team_names(), vec!["X", "Y", "Z"]);
    }
}
