//! Route handlers.

pub mod knockout;
pub mod scores;
pub mod standings;
pub mod tournaments;
