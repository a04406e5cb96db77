//! Standings and progression engine.
//!
//! Pure computations over a roster, a schedule and a score map:
//! - Points tables with a configurable tie-break chain
//! - Head-to-head and away-goals resolution
//! - Knockout winners and seeding from group tables

pub mod head_to_head;
pub mod knockout;
pub mod standings;

pub use head_to_head::HeadToHead;
pub use knockout::{match_winner, next_round, qualifiers, seed_round};
pub use standings::{compute_standings, StandingsOptions};
