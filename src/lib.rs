//! CS2 Intel — daily betting-analysis packs from PandaScore match history.

pub mod app;
pub mod pipeline;
pub mod report;
