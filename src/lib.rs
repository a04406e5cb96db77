//! # Committee
//!
//! League tables for round-robin and group-stage tournaments.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (teams, fixtures, scores, tables)
//! - **calculate**: Standings engine, head-to-head and knockout progression
//! - **storage**: Filesystem persistence (JSONL)
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;
