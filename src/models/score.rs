//! Recorded match scores and the keys they are stored under.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// A match identifier that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid match identifier: {0}")]
pub struct InvalidMatchKey(pub String);

/// Structured key of a score record.
///
/// The string form is `r{round}m{match}`, or `g{group}r{round}m{match}`
/// for group-stage fixtures. Stored score maps use that exact format.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchKey {
    pub group: Option<String>,
    pub round: u32,
    pub match_number: u32,
}

impl MatchKey {
    pub fn new(group: Option<&str>, round: u32, match_number: u32) -> Self {
        Self {
            group: group.map(str::to_string),
            round,
            match_number,
        }
    }

    pub fn ungrouped(round: u32, match_number: u32) -> Self {
        Self::new(None, round, match_number)
    }

    pub fn grouped(group: &str, round: u32, match_number: u32) -> Self {
        Self::new(Some(group), round, match_number)
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(group) = &self.group {
            write!(f, "g{}", group)?;
        }
        write!(f, "r{}m{}", self.round, self.match_number)
    }
}

fn parse_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl FromStr for MatchKey {
    type Err = InvalidMatchKey;

    // Scans from the right so a group name may itself contain 'r' or 'm'.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidMatchKey(s.to_string());

        let m_pos = s.rfind('m').ok_or_else(invalid)?;
        let match_number = parse_number(&s[m_pos + 1..]).ok_or_else(invalid)?;

        let head = &s[..m_pos];
        let r_pos = head.rfind('r').ok_or_else(invalid)?;
        let round = parse_number(&head[r_pos + 1..]).ok_or_else(invalid)?;

        let group = match &head[..r_pos] {
            "" => None,
            prefix => Some(prefix.strip_prefix('g').ok_or_else(invalid)?.to_string()),
        };

        Ok(Self {
            group,
            round,
            match_number,
        })
    }
}

impl Serialize for MatchKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MatchKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Accepts null, integers and numeric strings; anything else reads as "no score".
fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }))
}

/// The recorded result of one match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(default, deserialize_with = "lenient_score")]
    pub score1: Option<u32>,

    #[serde(default, deserialize_with = "lenient_score")]
    pub score2: Option<u32>,

    /// Shoot-out or extra tie-break score, display and knockout use only
    #[serde(
        default,
        alias = "score1Tiebreak",
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub score1_tiebreak: Option<u32>,

    #[serde(
        default,
        alias = "score2Tiebreak",
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub score2_tiebreak: Option<u32>,

    /// Advisory edit lock; never affects standings
    #[serde(default)]
    pub locked: bool,
}

impl ScoreRecord {
    /// A played result.
    pub fn new(score1: u32, score2: u32) -> Self {
        Self {
            score1: Some(score1),
            score2: Some(score2),
            ..Default::default()
        }
    }

    pub fn with_tiebreak(mut self, score1: u32, score2: u32) -> Self {
        self.score1_tiebreak = Some(score1);
        self.score2_tiebreak = Some(score2);
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Both goals tallies, if the match has been played.
    pub fn goals(&self) -> Option<(u32, u32)> {
        Some((self.score1?, self.score2?))
    }

    pub fn is_played(&self) -> bool {
        self.goals().is_some()
    }

    /// Both tie-break tallies, if recorded.
    pub fn tiebreak(&self) -> Option<(u32, u32)> {
        Some((self.score1_tiebreak?, self.score2_tiebreak?))
    }
}

/// A score edit submitted by a user. `None` clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    #[serde(default)]
    pub score1: Option<u32>,
    #[serde(default)]
    pub score2: Option<u32>,
    #[serde(default, alias = "score1Tiebreak")]
    pub score1_tiebreak: Option<u32>,
    #[serde(default, alias = "score2Tiebreak")]
    pub score2_tiebreak: Option<u32>,
}

impl ScoreUpdate {
    /// Apply this edit to an existing record, keeping its lock flag.
    pub fn apply(&self, record: &mut ScoreRecord) {
        record.score1 = self.score1;
        record.score2 = self.score2;
        record.score1_tiebreak = self.score1_tiebreak;
        record.score2_tiebreak = self.score2_tiebreak;
    }
}

/// Sparse map of recorded scores. Absent keys are unplayed matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScoresMap(BTreeMap<MatchKey, ScoreRecord>);

impl ScoresMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &MatchKey) -> Option<&ScoreRecord> {
        self.0.get(key)
    }

    /// Record for `key`, created empty if missing.
    pub fn entry(&mut self, key: MatchKey) -> &mut ScoreRecord {
        self.0.entry(key).or_default()
    }

    pub fn insert(&mut self, key: MatchKey, record: ScoreRecord) -> Option<ScoreRecord> {
        self.0.insert(key, record)
    }

    /// Goals for a match, if it has a played record.
    pub fn goals(&self, key: &MatchKey) -> Option<(u32, u32)> {
        self.get(key).and_then(ScoreRecord::goals)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MatchKey, &ScoreRecord)> {
        self.0.iter()
    }
}

impl FromIterator<(MatchKey, ScoreRecord)> for ScoresMap {
    fn from_iter<I: IntoIterator<Item = (MatchKey, ScoreRecord)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for ScoresMap {
    // Entries with an unreadable key or body are dropped, which leaves the
    // match unplayed instead of rejecting the whole document.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let mut scores = BTreeMap::new();

        for (key, value) in raw {
            let key = match key.parse::<MatchKey>() {
                Ok(key) => key,
                Err(e) => {
                    warn!("Skipping score entry: {}", e);
                    continue;
                }
            };
            match serde_json::from_value::<ScoreRecord>(value) {
                Ok(record) => {
                    scores.insert(key, record);
                }
                Err(e) => warn!("Skipping malformed score for {}: {}", key, e),
            }
        }

        Ok(Self(scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_key_format() {
        assert_eq!(MatchKey::ungrouped(3, 2).to_string(), "r3m2");
        assert_eq!(MatchKey::grouped("A", 1, 4).to_string(), "gAr1m4");
    }

    #[test]
    fn test_match_key_parse() {
        assert_eq!("r3m2".parse::<MatchKey>().unwrap(), MatchKey::ungrouped(3, 2));
        assert_eq!(
            "gAr1m4".parse::<MatchKey>().unwrap(),
            MatchKey::grouped("A", 1, 4)
        );
    }

    #[test]
    fn test_match_key_group_name_with_markers() {
        let key = MatchKey::grouped("Group rm 2", 10, 11);
        assert_eq!(key.to_string(), "gGroup rm 2r10m11");
        assert_eq!(key.to_string().parse::<MatchKey>().unwrap(), key);
    }

    #[test]
    fn test_match_key_parse_invalid() {
        assert!("".parse::<MatchKey>().is_err());
        assert!("r1".parse::<MatchKey>().is_err());
        assert!("rXm1".parse::<MatchKey>().is_err());
        assert!("r1m+2".parse::<MatchKey>().is_err());
        assert!("xAr1m1".parse::<MatchKey>().is_err());
    }

    #[test]
    fn test_score_record_played() {
        assert!(ScoreRecord::new(0, 0).is_played());
        assert!(!ScoreRecord::default().is_played());

        let half = ScoreRecord {
            score1: Some(2),
            ..Default::default()
        };
        assert!(!half.is_played());
    }

    #[test]
    fn test_score_record_lenient_fields() {
        let record: ScoreRecord =
            serde_json::from_str(r#"{"score1":"2","score2":-1,"locked":true}"#).unwrap();
        assert_eq!(record.score1, Some(2));
        assert_eq!(record.score2, None);
        assert!(record.locked);
        assert!(!record.is_played());
    }

    #[test]
    fn test_score_record_tiebreak_aliases() {
        let record: ScoreRecord = serde_json::from_str(
            r#"{"score1":1,"score2":1,"score1Tiebreak":4,"score2Tiebreak":3}"#,
        )
        .unwrap();
        assert_eq!(record.tiebreak(), Some((4, 3)));
    }

    #[test]
    fn test_scores_map_uses_string_keys() {
        let scores: ScoresMap = [
            (MatchKey::ungrouped(1, 1), ScoreRecord::new(2, 0)),
            (MatchKey::grouped("B", 2, 1), ScoreRecord::default()),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_value(&scores).unwrap();
        assert_eq!(json["r1m1"]["score1"], 2);
        assert!(json["gBr2m1"]["score1"].is_null());
    }

    #[test]
    fn test_scores_map_skips_bad_entries() {
        let scores: ScoresMap = serde_json::from_str(
            r#"{"r1m1":{"score1":1,"score2":0},"bogus":{"score1":1,"score2":0},"r2m1":42}"#,
        )
        .unwrap();

        assert_eq!(scores.len(), 1);
        assert_eq!(scores.goals(&MatchKey::ungrouped(1, 1)), Some((1, 0)));
    }

    #[test]
    fn test_score_update_keeps_lock() {
        let mut record = ScoreRecord::new(1, 1).locked();
        ScoreUpdate {
            score1: Some(3),
            score2: Some(0),
            ..Default::default()
        }
        .apply(&mut record);

        assert_eq!(record.goals(), Some((3, 0)));
        assert!(record.locked);
    }
}
