//! Per-entry, per-gameweek pick collection into the wide table

use crate::api::fetch_entry_picks;
use crate::client::JsonSource;
use crate::models::{Entry, EntryPicks, Pick};
use crate::resolver::ElementResolver;
use crate::table::WideTable;
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Outcome of fetching one entry's squad for one gameweek
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PicksFetch {
    /// The squad as submitted
    Available(Vec<Pick>),

    /// No data for this entry and gameweek; the reason is kept for logging
    Missing(String),
}

/// Fetch one squad. Not-found, rejected and exhausted requests are
/// `Missing`; undecodable bodies are errors.
pub async fn fetch_squad<S: JsonSource + ?Sized>(
    source: &S,
    entry_id: u64,
    gameweek: u32,
) -> Result<PicksFetch> {
    match fetch_entry_picks(source, entry_id, gameweek).await {
        Ok(EntryPicks { picks: Some(picks) }) => Ok(PicksFetch::Available(picks)),
        Ok(EntryPicks { picks: None }) => Ok(PicksFetch::Missing("response has no picks".to_string())),
        Err(e) if e.is_soft_missing() => Ok(PicksFetch::Missing(e.to_string())),
        Err(e) => Err(e).with_context(|| {
            format!("Failed to fetch picks for entry {} in gameweek {}", entry_id, gameweek)
        }),
    }
}

/// Counters for one aggregation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationSummary {
    pub requests: usize,
    pub available: usize,
    pub missing: usize,
    pub picks_written: usize,
    pub picks_skipped: usize,
}

/// Fetches squads and projects them into a [`WideTable`]
pub struct PickAggregator<'a, S: JsonSource + ?Sized> {
    source: &'a S,
    resolver: &'a ElementResolver,
    delay: Duration,
}

impl<'a, S: JsonSource + ?Sized> PickAggregator<'a, S> {
    pub fn new(source: &'a S, resolver: &'a ElementResolver, delay: Duration) -> Self {
        Self { source, resolver, delay }
    }

    /// Fetch one squad, see [`fetch_squad`]
    pub async fn fetch_picks(&self, entry_id: u64, gameweek: u32) -> Result<PicksFetch> {
        fetch_squad(self.source, entry_id, gameweek).await
    }

    /// Populate every gameweek's columns, ascending, one entry at a time
    pub async fn aggregate(
        &self,
        table: &mut WideTable,
        entries: &[Entry],
        gameweeks: &[u32],
    ) -> Result<AggregationSummary> {
        let mut summary = AggregationSummary::default();

        for (n, &gameweek) in gameweeks.iter().enumerate() {
            let before = summary;
            self.aggregate_gameweek(table, entries, gameweek, &mut summary).await?;

            info!(
                "Gameweek {} ({}/{}): {} squads, {} missing",
                gameweek,
                n + 1,
                gameweeks.len(),
                summary.available - before.available,
                summary.missing - before.missing
            );
        }

        Ok(summary)
    }

    /// (Re)build one gameweek's triplet for every entry
    pub async fn aggregate_gameweek(
        &self,
        table: &mut WideTable,
        entries: &[Entry],
        gameweek: u32,
        summary: &mut AggregationSummary,
    ) -> Result<()> {
        table.add_gameweek(gameweek);

        for entry in entries {
            let outcome = self.fetch_picks(entry.id, gameweek).await;
            sleep(self.delay).await;
            summary.requests += 1;

            match outcome? {
                PicksFetch::Available(picks) => {
                    summary.available += 1;
                    for pick in picks {
                        let resolved = self.resolver.resolve(pick.element);
                        if table.set_pick(entry.id, pick.position, gameweek, resolved) {
                            summary.picks_written += 1;
                        } else {
                            warn!(
                                "Entry {} gameweek {}: slot {} out of range, skipping element {}",
                                entry.id, gameweek, pick.position, pick.element
                            );
                            summary.picks_skipped += 1;
                        }
                    }
                }
                PicksFetch::Missing(reason) => {
                    debug!("No picks for entry {} in gameweek {}: {}", entry.id, gameweek, reason);
                    summary.missing += 1;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::picks_path;
    use crate::error::FetchError;
    use crate::models::ResolvedPick;
    use crate::tests::{bootstrap_json, picks_json, ScriptedSource};

    fn entries() -> Vec<Entry> {
        vec![
            Entry { id: 1, entry_name: "Alpha".to_string(), manager_name: "Ann".to_string() },
            Entry { id: 2, entry_name: "Beta".to_string(), manager_name: "Ben".to_string() },
        ]
    }

    fn resolver() -> ElementResolver {
        let bootstrap = serde_json::from_value(bootstrap_json()).unwrap();
        ElementResolver::from_bootstrap(&bootstrap)
    }

    fn alice() -> ResolvedPick {
        ResolvedPick {
            player: "Alice Smith".to_string(),
            team: "ARS".to_string(),
            position: "MID".to_string(),
        }
    }

    #[tokio::test]
    async fn test_single_pick_populates_only_its_slot() {
        let source = ScriptedSource::new()
            .respond(&picks_path(1, 1), Ok(picks_json(&[(10, 1)])))
            .respond(&picks_path(2, 1), Err(FetchError::not_found("picks")));
        let resolver = resolver();
        let aggregator = PickAggregator::new(&source, &resolver, Duration::ZERO);
        let mut table = WideTable::new(9, &entries());

        let summary = aggregator.aggregate(&mut table, &entries(), &[1]).await.unwrap();

        assert_eq!(table.row(1, 1).unwrap().pick(1), Some(&alice()));
        for slot in 2..=15u8 {
            assert_eq!(table.row(1, slot).unwrap().pick(1), None);
        }
        assert_eq!(summary.requests, 2);
        assert_eq!(summary.available, 1);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.picks_written, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_after_every_request_whatever_the_outcome() {
        let entries: Vec<Entry> = (1..=3)
            .map(|id| Entry { id, entry_name: format!("T{}", id), manager_name: format!("M{}", id) })
            .collect();
        let source = ScriptedSource::new()
            .respond(&picks_path(1, 1), Ok(picks_json(&[(10, 1)])))
            .respond(&picks_path(2, 1), Err(FetchError::not_found("picks")))
            .respond(&picks_path(3, 1), Err(FetchError::status("picks", 403)));
        let resolver = resolver();
        let delay = Duration::from_secs(1);
        let aggregator = PickAggregator::new(&source, &resolver, delay);
        let mut table = WideTable::new(9, &entries);
        let start = tokio::time::Instant::now();

        let summary = aggregator.aggregate(&mut table, &entries, &[1]).await.unwrap();

        assert!(start.elapsed() >= delay * 3);
        assert_eq!(summary.requests, 3);
        assert_eq!(summary.missing, 2);
    }

    #[tokio::test]
    async fn test_missing_entry_leaves_other_entries_populated() {
        let source = ScriptedSource::new()
            .respond(&picks_path(1, 1), Err(FetchError::status("picks", 503)))
            .respond(&picks_path(2, 1), Ok(picks_json(&[(10, 1), (11, 2)])));
        let resolver = resolver();
        let aggregator = PickAggregator::new(&source, &resolver, Duration::ZERO);
        let mut table = WideTable::new(9, &entries());

        aggregator.aggregate(&mut table, &entries(), &[1]).await.unwrap();

        for slot in 1..=15u8 {
            assert_eq!(table.row(1, slot).unwrap().pick(1), None);
        }
        assert_eq!(table.row(2, 1).unwrap().pick(1), Some(&alice()));
        assert_eq!(table.row(2, 2).unwrap().pick(1).map(|p| p.player.as_str()), Some("Rodri"));
    }

    #[tokio::test]
    async fn test_exhausted_retries_are_soft() {
        let exhausted = FetchError::RetriesExhausted {
            url: "picks".to_string(),
            attempts: 3,
            last: Box::new(FetchError::transport("picks", "timed out")),
        };
        let source = ScriptedSource::new().respond(&picks_path(1, 4), Err(exhausted));
        let resolver = resolver();
        let aggregator = PickAggregator::new(&source, &resolver, Duration::ZERO);

        assert!(matches!(aggregator.fetch_picks(1, 4).await.unwrap(), PicksFetch::Missing(_)));
    }

    #[tokio::test]
    async fn test_body_without_picks_is_missing() {
        let source = ScriptedSource::new()
            .respond(&picks_path(1, 1), Ok(serde_json::json!({ "entry_history": {} })));
        let resolver = resolver();
        let aggregator = PickAggregator::new(&source, &resolver, Duration::ZERO);

        assert!(matches!(aggregator.fetch_picks(1, 1).await.unwrap(), PicksFetch::Missing(_)));
    }

    #[tokio::test]
    async fn test_malformed_picks_are_fatal() {
        let source = ScriptedSource::new()
            .respond(&picks_path(1, 1), Ok(serde_json::json!({ "picks": [{ "element": "ten" }] })));
        let resolver = resolver();
        let aggregator = PickAggregator::new(&source, &resolver, Duration::ZERO);
        let mut table = WideTable::new(9, &entries());

        assert!(aggregator.aggregate(&mut table, &entries(), &[1]).await.is_err());
    }

    #[tokio::test]
    async fn test_out_of_range_slot_is_skipped() {
        let source = ScriptedSource::new()
            .respond(&picks_path(1, 1), Ok(picks_json(&[(10, 1), (11, 16)])))
            .respond(&picks_path(2, 1), Ok(picks_json(&[])));
        let resolver = resolver();
        let aggregator = PickAggregator::new(&source, &resolver, Duration::ZERO);
        let mut table = WideTable::new(9, &entries());

        let summary = aggregator.aggregate(&mut table, &entries(), &[1]).await.unwrap();

        assert_eq!(summary.picks_written, 1);
        assert_eq!(summary.picks_skipped, 1);
        assert_eq!(table.len(), 30);
    }

    #[tokio::test]
    async fn test_unknown_element_uses_placeholder() {
        let source = ScriptedSource::new()
            .respond(&picks_path(1, 1), Ok(picks_json(&[(999, 3)])))
            .respond(&picks_path(2, 1), Ok(picks_json(&[])));
        let resolver = resolver();
        let aggregator = PickAggregator::new(&source, &resolver, Duration::ZERO);
        let mut table = WideTable::new(9, &entries());

        aggregator.aggregate(&mut table, &entries(), &[1]).await.unwrap();

        let pick = table.row(1, 3).unwrap().pick(1).unwrap();
        assert_eq!(pick.player, "Element 999");
        assert_eq!(pick.team, "");
        assert_eq!(pick.position, "");
    }

    #[tokio::test]
    async fn test_rerunning_a_gameweek_is_idempotent() {
        let source = ScriptedSource::new()
            .respond(&picks_path(1, 1), Ok(picks_json(&[(10, 1), (11, 2)])))
            .respond(&picks_path(2, 1), Ok(picks_json(&[(11, 5)])));
        let resolver = resolver();
        let aggregator = PickAggregator::new(&source, &resolver, Duration::ZERO);
        let mut table = WideTable::new(9, &entries());

        aggregator.aggregate(&mut table, &entries(), &[1]).await.unwrap();
        let first: Vec<_> = table.records().collect();

        aggregator.aggregate(&mut table, &entries(), &[1]).await.unwrap();
        let second: Vec<_> = table.records().collect();

        assert_eq!(first, second);
        assert_eq!(table.len(), 30);
        assert_eq!(table.headers().len(), 5 + 3);
    }

    #[tokio::test]
    async fn test_gameweeks_outer_entries_inner() {
        let source = ScriptedSource::new()
            .respond(&picks_path(1, 1), Ok(picks_json(&[])))
            .respond(&picks_path(2, 1), Ok(picks_json(&[])))
            .respond(&picks_path(1, 2), Ok(picks_json(&[])))
            .respond(&picks_path(2, 2), Ok(picks_json(&[])));
        let resolver = resolver();
        let aggregator = PickAggregator::new(&source, &resolver, Duration::ZERO);
        let mut table = WideTable::new(9, &entries());

        aggregator.aggregate(&mut table, &entries(), &[1, 2]).await.unwrap();

        assert_eq!(
            source.calls(),
            vec![picks_path(1, 1), picks_path(2, 1), picks_path(1, 2), picks_path(2, 2)]
        );
    }
}
