//! Ideaflow - product lifecycle phase durations and cycle-time statistics
//!
//! This library reconstructs how long each tracked idea spent in every
//! lifecycle phase from its sparse stage-transition history, and aggregates
//! cycle times and phase dwell times per year and team for year-over-year
//! comparison. Sprint-goal success rates and backlog composition from the
//! same tracker exports are summarised alongside.

pub mod aggregate;
pub mod backlog;
pub mod cli;
pub mod config;
pub mod csv_output;
pub mod dataset;
pub mod interval;
pub mod json_output;
pub mod lifecycle;
pub mod model;
pub mod sprint_goals;
pub mod stats;
pub mod team;
pub mod text_output;
