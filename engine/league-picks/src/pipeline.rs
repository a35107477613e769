//! End-to-end collection run

use crate::aggregator::{AggregationSummary, PickAggregator};
use crate::api::fetch_bootstrap;
use crate::captaincy::CaptaincyCollector;
use crate::chips::ChipCollector;
use crate::client::{FplClient, JsonSource};
use crate::config::PicksConfig;
use crate::live::LivePoints;
use crate::models::{Bootstrap, Entry};
use crate::periods::select_gameweeks;
use crate::report::{chip_weeks, LeagueReport, ReportFiles};
use crate::resolver::ElementResolver;
use crate::roster::RosterEnumerator;
use crate::table::WideTable;
use crate::transfers::TransferCollector;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::info;

/// How a run finished
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// No gameweek qualified for inclusion; nothing was written
    NoGameweeks { league_id: u64, timestamp: DateTime<Utc> },

    /// The table was written to `path`
    Written {
        path: PathBuf,
        rows: usize,
        gameweeks: Vec<u32>,
        summary: AggregationSummary,
        timestamp: DateTime<Utc>,
    },
}

/// A written league report
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub files: ReportFiles,
    pub transfers: usize,
    pub chip_rows: usize,
    pub captaincy_rows: usize,
    pub timestamp: DateTime<Utc>,
}

/// Reference data and league membership shared by every run mode
struct League {
    bootstrap: Bootstrap,
    resolver: ElementResolver,
    entries: Vec<Entry>,
}

/// A fully aggregated, sorted table
#[derive(Debug, Clone)]
pub struct Collection {
    pub table: WideTable,
    pub gameweeks: Vec<u32>,
    pub summary: AggregationSummary,
}

/// Collects a league's squads for every included gameweek
pub struct LeaguePicksPipeline<S: JsonSource> {
    config: PicksConfig,
    source: S,
}

impl LeaguePicksPipeline<FplClient> {
    /// Create a pipeline talking to the real API
    pub fn new(config: PicksConfig) -> Result<Self> {
        let client = FplClient::new(&config).context("Failed to create API client")?;
        Ok(Self::with_source(config, client))
    }
}

impl<S: JsonSource> LeaguePicksPipeline<S> {
    pub fn with_source(config: PicksConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &PicksConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Reference data plus every entry of the league; an empty league fails
    async fn load_league(&self) -> Result<League> {
        let league_id = self.config.league_id;

        info!("Fetching bootstrap data");
        let bootstrap =
            fetch_bootstrap(&self.source).await.context("Failed to fetch bootstrap data")?;
        let resolver = ElementResolver::from_bootstrap(&bootstrap);
        info!(
            "Loaded {} elements, {} teams, {} gameweeks",
            resolver.len(),
            bootstrap.teams.len(),
            bootstrap.events.len()
        );

        info!("Fetching league entries for league {}", league_id);
        let entries = RosterEnumerator::new(&self.source, self.config.request_delay(), self.config.max_pages)
            .enumerate(league_id)
            .await?;
        if entries.is_empty() {
            anyhow::bail!(
                "No entries found for league {}. Is the league id correct or the league private?",
                league_id
            );
        }

        Ok(League { bootstrap, resolver, entries })
    }

    /// Fetch everything and build the sorted table.
    ///
    /// Returns `None` when no gameweek qualifies. Fails when the league has
    /// no entries or a required request cannot be completed.
    pub async fn collect(&self) -> Result<Option<Collection>> {
        let league_id = self.config.league_id;
        let League { bootstrap, resolver, entries } = self.load_league().await?;

        let gameweeks = select_gameweeks(&bootstrap, self.config.include_only_finalised);
        if gameweeks.is_empty() {
            info!("No gameweeks available (yet) based on current settings");
            return Ok(None);
        }

        info!("Including gameweeks: {:?}", gameweeks);
        info!(
            "Fetching picks: {} entries x {} gameweeks = ~{} calls",
            entries.len(),
            gameweeks.len(),
            entries.len() * gameweeks.len()
        );

        let mut table = WideTable::new(league_id, &entries);
        let summary = PickAggregator::new(&self.source, &resolver, self.config.request_delay())
            .aggregate(&mut table, &entries, &gameweeks)
            .await?;
        table.sort();

        Ok(Some(Collection { table, gameweeks, summary }))
    }

    /// Collect and write the CSV
    pub async fn run(&self) -> Result<RunOutcome> {
        let Some(collection) = self.collect().await? else {
            return Ok(RunOutcome::NoGameweeks {
                league_id: self.config.league_id,
                timestamp: Utc::now(),
            });
        };

        let path = self.config.output_path();
        collection.table.write_csv(&path)?;
        info!("Saved {} rows to {:?}", collection.table.len(), path);

        Ok(RunOutcome::Written {
            path,
            rows: collection.table.len(),
            gameweeks: collection.gameweeks,
            summary: collection.summary,
            timestamp: Utc::now(),
        })
    }

    /// Collect chip usage, transfers and per-gameweek captains.
    ///
    /// Captaincy covers the same gameweeks as the picks table.
    pub async fn collect_report(&self) -> Result<LeagueReport> {
        let League { bootstrap, resolver, entries } = self.load_league().await?;
        let delay = self.config.request_delay();
        let mut live = LivePoints::new();

        info!("Fetching chip usage for {} entries", entries.len());
        let chips =
            ChipCollector::new(&self.source, &resolver, delay, self.config.report.wildcard_split_gameweek)
                .collect(&entries, &mut live)
                .await?;

        info!("Fetching transfers for {} entries", entries.len());
        let free_hit_weeks = chip_weeks(&chips, |usage| usage.free_hit);
        let transfers = TransferCollector::new(&self.source, &resolver, delay)
            .collect(&entries, &free_hit_weeks)
            .await?;

        let gameweeks = select_gameweeks(&bootstrap, self.config.include_only_finalised);
        info!("Fetching captains for gameweeks {:?}", gameweeks);
        let triple_captain_weeks = chip_weeks(&chips, |usage| usage.triple_captain);
        let captaincy = CaptaincyCollector::new(&self.source, &resolver, delay)
            .collect(&entries, &gameweeks, &triple_captain_weeks, &mut live)
            .await?;

        Ok(LeagueReport { league_id: self.config.league_id, transfers, chips, captaincy })
    }

    /// Collect the report and write its sheets
    pub async fn run_report(&self) -> Result<ReportOutcome> {
        let report = self.collect_report().await?;
        let files = report.write(&self.config.report_dir())?;

        Ok(ReportOutcome {
            files,
            transfers: report.transfers.len(),
            chip_rows: report.chips.len(),
            captaincy_rows: report.captaincy.len(),
            timestamp: Utc::now(),
        })
    }
}
