//! Knockout progression: who went through, and who plays whom next.

use std::cmp::Ordering;

use tracing::debug;

use crate::models::{GroupTable, Match, MatchKey, Round, ScoreRecord, ScoresMap, Slot};

/// Winner of a knockout tie.
///
/// A bye sends the real team through. A level score falls back to the
/// tie-break scores (extra time, penalties). `None` while undecided.
pub fn match_winner<'a>(m: &'a Match, score: Option<&ScoreRecord>) -> Option<&'a str> {
    match (&m.team1, &m.team2) {
        (Slot::Team(team), Slot::Bye) | (Slot::Bye, Slot::Team(team)) => {
            return Some(team.as_str())
        }
        (Slot::Bye, Slot::Bye) => return None,
        _ => {}
    }

    let (team1, team2) = m.teams()?;
    let record = score?;
    let (score1, score2) = match record.goals()? {
        (s1, s2) if s1 != s2 => (s1, s2),
        _ => record.tiebreak()?,
    };

    match score1.cmp(&score2) {
        Ordering::Greater => Some(team1),
        Ordering::Less => Some(team2),
        Ordering::Equal => None,
    }
}

/// Qualified teams ordered by finishing position: every group winner,
/// then every runner-up, and so on.
pub fn qualifiers(tables: &[GroupTable]) -> Vec<String> {
    let deepest = tables.iter().map(|t| t.table.len()).max().unwrap_or(0);

    (0..deepest)
        .flat_map(|position| tables.iter().filter_map(move |t| t.table.get(position)))
        .filter(|entry| entry.is_qualified())
        .map(|entry| entry.team_name.clone())
        .collect()
}

/// Pair seeds best against worst. With an odd field the top seed gets a bye.
pub fn seed_round(teams: &[String], round_number: u32) -> Round {
    let mut matches = Vec::new();
    let mut low = 0;
    let mut high = teams.len();

    if teams.len() % 2 == 1 {
        matches.push(Match::new(1, teams[0].as_str(), Slot::Bye));
        low = 1;
    }

    while low + 1 < high {
        high -= 1;
        let number = matches.len() as u32 + 1;
        matches.push(Match::new(number, teams[low].as_str(), teams[high].as_str()));
        low += 1;
    }

    Round::new(round_number, matches)
}

/// The round after `round`, built from its winners in match order.
///
/// `None` while any tie is undecided, or when `round` was the final.
pub fn next_round(round: &Round, scores: &ScoresMap, group: Option<&str>) -> Option<Round> {
    if round.matches.len() < 2 {
        return None;
    }

    let winners = round
        .matches
        .iter()
        .map(|m| {
            let key = MatchKey::new(group, round.round_number, m.match_number);
            match_winner(m, scores.get(&key))
        })
        .collect::<Option<Vec<&str>>>()?;

    let matches = winners
        .chunks(2)
        .zip(1..)
        .map(|(pair, number)| match pair {
            [home, away] => Match::new(number, *home, *away),
            [home] => Match::new(number, *home, Slot::Bye),
            _ => unreachable!("chunks(2) yields one or two items"),
        })
        .collect();

    debug!(
        "Round {} complete, {} teams through",
        round.round_number,
        winners.len()
    );
    Some(Round::new(round.round_number + 1, matches))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PointsTableEntry;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_winner_by_score() {
        let m = Match::new(1, "A", "B");
        assert_eq!(match_winner(&m, Some(&ScoreRecord::new(2, 1))), Some("A"));
        assert_eq!(match_winner(&m, Some(&ScoreRecord::new(0, 1))), Some("B"));
        assert_eq!(match_winner(&m, None), None);
        assert_eq!(match_winner(&m, Some(&ScoreRecord::default())), None);
    }

    #[test]
    fn test_winner_by_tiebreak() {
        let m = Match::new(1, "A", "B");
        let shootout = ScoreRecord::new(1, 1).with_tiebreak(3, 4);
        assert_eq!(match_winner(&m, Some(&shootout)), Some("B"));
        assert_eq!(match_winner(&m, Some(&ScoreRecord::new(1, 1))), None);
    }

    #[test]
    fn test_winner_by_bye() {
        assert_eq!(match_winner(&Match::new(1, "A", "bye"), None), Some("A"));
        assert_eq!(match_winner(&Match::new(1, "Bye", "B"), None), Some("B"));
        assert_eq!(match_winner(&Match::new(1, "bye", "BYE"), None), None);
    }

    #[test]
    fn test_qualifiers_by_position() {
        let table = |group: &str, rows: &[(&str, bool)]| GroupTable {
            group_name: group.to_string(),
            table: rows
                .iter()
                .map(|(name, q)| PointsTableEntry {
                    qualified: Some(*q),
                    ..PointsTableEntry::new(*name)
                })
                .collect(),
        };
        let tables = vec![
            table("A", &[("A1", true), ("A2", true), ("A3", false)]),
            table("B", &[("B1", true), ("B2", true), ("B3", false)]),
        ];

        assert_eq!(qualifiers(&tables), strings(&["A1", "B1", "A2", "B2"]));
    }

    #[test]
    fn test_qualifiers_need_flags() {
        let tables = vec![GroupTable {
            group_name: "A".to_string(),
            table: vec![PointsTableEntry::new("A1")],
        }];
        assert!(qualifiers(&tables).is_empty());
    }

    #[test]
    fn test_seed_round_crosses_groups() {
        let round = seed_round(&strings(&["A1", "B1", "A2", "B2"]), 4);
        assert_eq!(round.round_number, 4);
        assert_eq!(
            round.matches,
            vec![Match::new(1, "A1", "B2"), Match::new(2, "B1", "A2")]
        );
    }

    #[test]
    fn test_seed_round_odd_field() {
        let round = seed_round(&strings(&["S1", "S2", "S3"]), 1);
        assert_eq!(
            round.matches,
            vec![Match::new(1, "S1", Slot::Bye), Match::new(2, "S2", "S3")]
        );
    }

    #[test]
    fn test_next_round_from_winners() {
        let round = Round::new(
            1,
            vec![
                Match::new(1, "A", "B"),
                Match::new(2, "C", "D"),
                Match::new(3, "E", "Bye"),
            ],
        );
        let scores: ScoresMap = [
            (MatchKey::ungrouped(1, 1), ScoreRecord::new(0, 2)),
            (MatchKey::ungrouped(1, 2), ScoreRecord::new(1, 1).with_tiebreak(5, 4)),
        ]
        .into_iter()
        .collect();

        let next = next_round(&round, &scores, None).unwrap();
        assert_eq!(next.round_number, 2);
        assert_eq!(
            next.matches,
            vec![Match::new(1, "B", "C"), Match::new(2, "E", Slot::Bye)]
        );
    }

    #[test]
    fn test_next_round_waits_for_results() {
        let round = Round::new(1, vec![Match::new(1, "A", "B"), Match::new(2, "C", "D")]);
        let scores: ScoresMap = [(MatchKey::ungrouped(1, 1), ScoreRecord::new(1, 0))]
            .into_iter()
            .collect();
        assert!(next_round(&round, &scores, None).is_none());
    }

    #[test]
    fn test_final_has_no_next_round() {
        let round = Round::new(3, vec![Match::new(1, "A", "B")]);
        let scores: ScoresMap = [(MatchKey::ungrouped(3, 1), ScoreRecord::new(1, 0))]
            .into_iter()
            .collect();
        assert!(next_round(&round, &scores, None).is_none());
    }
}
