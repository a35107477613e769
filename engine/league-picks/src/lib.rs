//! League Picks Collector
//!
//! Collects the submitted squad of every manager in a fantasy premier league
//! classic mini-league for each included gameweek, resolves player ids to
//! names, teams and positions, and writes one wide CSV row per
//! (entry, roster slot) with a column triplet per gameweek.
//!
//! An optional league report adds transfers, chip usage and per-gameweek
//! captaincy sheets.

pub mod aggregator;
pub mod api;
pub mod captaincy;
pub mod chips;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod live;
pub mod logging;
pub mod models;
pub mod periods;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod roster;
pub mod table;
pub mod transfers;


pub use aggregator::{fetch_squad, AggregationSummary, PickAggregator, PicksFetch};
pub use captaincy::{CaptaincyCollector, CaptaincyRecord};
pub use chips::{ChipCollector, ChipUsage};
pub use client::{FplClient, JsonSource, RetryPolicy};
pub use config::PicksConfig;
pub use error::FetchError;
pub use live::LivePoints;
pub use models::*;
pub use periods::select_gameweeks;
pub use pipeline::{Collection, LeaguePicksPipeline, ReportOutcome, RunOutcome};
pub use report::{LeagueReport, ReportFiles};
pub use resolver::ElementResolver;
pub use roster::RosterEnumerator;
pub use table::{WideRow, WideTable};
pub use transfers::{TransferCollector, TransferRecord};
