//! PandaScore CS2 retrieval
//!
//! Upcoming fixtures and per-team finished-match history, normalized into
//! [`match_history::MatchRecord`]s at the boundary.

pub mod client;
pub mod config;

pub use client::{parse_match_list, PandaScoreClient};
pub use config::PandaScoreConfig;
