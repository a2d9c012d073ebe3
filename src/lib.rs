//! Playtime Service - Player playtime reconciliation
//!
//! This crate keeps one playtime record per player and game, merging what the
//! Steam Web API reports with what a moderation platform pushes, and serves
//! the merged view to signed callers over HTTP.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
