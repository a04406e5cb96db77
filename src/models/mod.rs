//! Core data models for tournaments, fixtures, scores and tables.

mod fixture;
mod score;
mod standings;
mod team;
mod tournament;

pub use fixture::*;
pub use score::*;
pub use standings::*;
pub use team::*;
pub use tournament::*;
