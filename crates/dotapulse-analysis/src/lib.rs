//! Behavior analysis of Dota players from their match histories
//!
//! This crate studies how players behave right before they stop playing.
//! Every player's history is bucketed by calendar month, inactive periods
//! are detected, and the outcomes of the games played just before each
//! period are compared with the player's usual behavior.
//!
//! # Overview
//!
//! ## Inactivity Workflow
//!
//! 1. **Parse Records** ([`record::MatchRecord`]): One entry per played match
//! 2. **Build Timeline** ([`timeline::Timeline`]): Per-month game counts and
//!    outcome flags over a [`calendar::CalendarRange`]
//! 3. **Find Activity Window** ([`timeline::ActivityWindow`]): First to last
//!    month with a game
//! 4. **Segment** ([`inactivity::InactiveRuns`]): Detect runs of two or more
//!    months below the activity threshold
//! 5. **Backtrace** ([`backtrace::BacktraceSample`]): Outcome rate of the
//!    games right before each run
//! 6. **Aggregate** ([`aggregate::RunRates`]): Merge every player's values
//!    and reduce them to one mean per run score
//!
//! Steps 2 to 5 are bundled in [`player::analyze`]; [`report`] renders the
//! aggregated means as text.
//!
//! ## Profile Workflow
//!
//! [`profile::PlayerProfile`] computes whole-history rates (win rate, leaver
//! rate, hero diversity) and [`profile::PopulationSummary`] describes their
//! distribution across players.
//!
//! # Configuration
//!
//! All parameters live in [`config::AnalysisConfig`], whose defaults match
//! the leaver study.

pub mod aggregate;
pub mod backtrace;
pub mod calendar;
pub mod config;
pub mod inactivity;
pub mod player;
pub mod profile;
pub mod record;
pub mod report;
pub mod timeline;
