//! Team model.

use serde::{Deserialize, Serialize};

/// A registered team.
///
/// The name doubles as the join key between the roster and the schedule,
/// so it must be unique within a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Display name, unique per tournament
    pub name: String,

    /// Crest image reference (URL or storage path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crest_ref: Option<String>,
}

impl Team {
    /// Create a team without a crest.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            crest_ref: None,
        }
    }

    /// Attach a crest reference.
    pub fn with_crest(mut self, crest_ref: impl Into<String>) -> Self {
        self.crest_ref = Some(crest_ref.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_serialization_omits_missing_crest() {
        let json = serde_json::to_string(&Team::new("Rovers")).unwrap();
        assert_eq!(json, r#"{"name":"Rovers"}"#);
    }

    #[test]
    fn test_team_crest_ref_camel_case() {
        let team: Team =
            serde_json::from_str(r#"{"name":"Rovers","crestRef":"crests/rovers.png"}"#).unwrap();
        assert_eq!(team, Team::new("Rovers").with_crest("crests/rovers.png"));
    }
}
