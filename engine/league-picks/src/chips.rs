//! Chip usage per entry, from season history

use crate::aggregator::{fetch_squad, PicksFetch};
use crate::api::fetch_entry_history;
use crate::client::JsonSource;
use crate::export::or_dash;
use crate::live::LivePoints;
use crate::models::{ChipPlay, Entry, BENCH_BOOST, FREE_HIT, TRIPLE_CAPTAIN, WILDCARD};
use crate::resolver::ElementResolver;
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

pub const CHIP_HEADERS: [&str; 9] = [
    "Manager Name",
    "Team Name",
    "Wildcard 1",
    "Wildcard 2",
    "Free Hit",
    "Bench Boost",
    "Triple Captain",
    "Triple Captain Player",
    "TC Points",
];

/// Gameweeks in which an entry played each chip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipUsage {
    pub entry_id: u64,
    pub entry_name: String,
    pub manager_name: String,
    pub wildcard_1: Option<u32>,
    pub wildcard_2: Option<u32>,
    pub free_hit: Option<u32>,
    pub bench_boost: Option<u32>,
    pub triple_captain: Option<u32>,
    pub triple_captain_player: Option<String>,
    pub triple_captain_points: Option<i32>,
}

impl ChipUsage {
    pub fn new(entry: &Entry) -> Self {
        Self {
            entry_id: entry.id,
            entry_name: entry.entry_name.clone(),
            manager_name: entry.manager_name.clone(),
            wildcard_1: None,
            wildcard_2: None,
            free_hit: None,
            bench_boost: None,
            triple_captain: None,
            triple_captain_player: None,
            triple_captain_points: None,
        }
    }

    /// Record chip plays. Wildcards up to and including `wildcard_split`
    /// count as the first wildcard, later ones as the second. Unknown chip
    /// names are ignored.
    pub fn apply(&mut self, chips: &[ChipPlay], wildcard_split: u32) {
        for chip in chips {
            let gameweek = Some(chip.event);
            match chip.name.as_str() {
                WILDCARD if chip.event <= wildcard_split => self.wildcard_1 = gameweek,
                WILDCARD => self.wildcard_2 = gameweek,
                FREE_HIT => self.free_hit = gameweek,
                BENCH_BOOST => self.bench_boost = gameweek,
                TRIPLE_CAPTAIN => self.triple_captain = gameweek,
                other => debug!("Ignoring chip {} for entry {}", other, self.entry_id),
            }
        }
    }

    pub fn record(&self) -> Vec<String> {
        vec![
            self.manager_name.clone(),
            self.entry_name.clone(),
            or_dash(self.wildcard_1),
            or_dash(self.wildcard_2),
            or_dash(self.free_hit),
            or_dash(self.bench_boost),
            or_dash(self.triple_captain),
            or_dash(self.triple_captain_player.as_deref()),
            or_dash(self.triple_captain_points),
        ]
    }
}

/// Fetches each entry's history and resolves the triple captain pick
pub struct ChipCollector<'a, S: JsonSource + ?Sized> {
    source: &'a S,
    resolver: &'a ElementResolver,
    delay: Duration,
    wildcard_split: u32,
}

impl<'a, S: JsonSource + ?Sized> ChipCollector<'a, S> {
    pub fn new(
        source: &'a S,
        resolver: &'a ElementResolver,
        delay: Duration,
        wildcard_split: u32,
    ) -> Self {
        Self { source, resolver, delay, wildcard_split }
    }

    /// One `ChipUsage` per entry, in entry order. Entries without history
    /// keep every chip unset.
    pub async fn collect(&self, entries: &[Entry], live: &mut LivePoints) -> Result<Vec<ChipUsage>> {
        let mut usages = Vec::with_capacity(entries.len());

        for entry in entries {
            let mut usage = ChipUsage::new(entry);

            let outcome = fetch_entry_history(self.source, entry.id).await;
            sleep(self.delay).await;

            match outcome {
                Ok(history) => usage.apply(&history.chips, self.wildcard_split),
                Err(e) if e.is_soft_missing() => {
                    warn!("No history for entry {}: {}", entry.id, e);
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to fetch history for entry {}", entry.id))
                }
            }

            if let Some(gameweek) = usage.triple_captain {
                self.resolve_triple_captain(&mut usage, gameweek, live).await?;
            }

            usages.push(usage);
        }

        info!("Collected chip usage for {} entries", usages.len());
        Ok(usages)
    }

    async fn resolve_triple_captain(
        &self,
        usage: &mut ChipUsage,
        gameweek: u32,
        live: &mut LivePoints,
    ) -> Result<()> {
        let outcome = fetch_squad(self.source, usage.entry_id, gameweek).await;
        sleep(self.delay).await;

        let PicksFetch::Available(picks) = outcome? else {
            return Ok(());
        };
        let Some(captain) = picks.iter().find(|p| p.is_captain).map(|p| p.element) else {
            return Ok(());
        };

        usage.triple_captain_player = Some(self.resolver.name(captain));
        usage.triple_captain_points = live
            .points_for(self.source, gameweek, self.delay)
            .await?
            .and_then(|points| points.get(&captain).copied());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{history_path, live_path, picks_path};
    use crate::error::FetchError;
    use crate::tests::{bootstrap_json, captain_picks_json, history_json, live_json, ScriptedSource};

    fn entry(id: u64) -> Entry {
        Entry { id, entry_name: format!("Team {}", id), manager_name: format!("Manager {}", id) }
    }

    fn resolver() -> ElementResolver {
        ElementResolver::from_bootstrap(&serde_json::from_value(bootstrap_json()).unwrap())
    }

    fn chip(name: &str, event: u32) -> ChipPlay {
        ChipPlay { name: name.to_string(), event }
    }

    #[test]
    fn test_wildcards_split_at_gameweek_twenty() {
        let mut usage = ChipUsage::new(&entry(1));
        usage.apply(&[chip("wildcard", 20), chip("wildcard", 21), chip("manager", 3)], 20);

        assert_eq!(usage.wildcard_1, Some(20));
        assert_eq!(usage.wildcard_2, Some(21));
        assert_eq!(usage.free_hit, None);
    }

    #[test]
    fn test_record_uses_dash_for_unplayed_chips() {
        let mut usage = ChipUsage::new(&entry(1));
        usage.apply(&[chip("freehit", 9), chip("bboost", 12)], 20);

        assert_eq!(
            usage.record(),
            vec!["Manager 1", "Team 1", "-", "-", "9", "12", "-", "-", "-"]
        );
    }

    #[tokio::test]
    async fn test_triple_captain_player_and_points() {
        let source = ScriptedSource::new()
            .respond(&history_path(1), Ok(history_json(&[("3xc", 4), ("wildcard", 8)])))
            .respond(&picks_path(1, 4), Ok(captain_picks_json(&[(12, 1), (10, 2)], 10)))
            .respond(&live_path(4), Ok(live_json(&[(10, 11), (12, 2)])));
        let resolver = resolver();
        let collector = ChipCollector::new(&source, &resolver, Duration::ZERO, 20);

        let usages = collector.collect(&[entry(1)], &mut LivePoints::new()).await.unwrap();

        assert_eq!(usages[0].triple_captain, Some(4));
        assert_eq!(usages[0].wildcard_1, Some(8));
        assert_eq!(usages[0].triple_captain_player.as_deref(), Some("Alice Smith"));
        assert_eq!(usages[0].triple_captain_points, Some(11));
    }

    #[tokio::test]
    async fn test_missing_history_keeps_entry_with_no_chips() {
        let source = ScriptedSource::new()
            .respond(&history_path(1), Err(FetchError::status("history", 403)))
            .respond(&history_path(2), Ok(history_json(&[("freehit", 2)])));
        let resolver = resolver();
        let collector = ChipCollector::new(&source, &resolver, Duration::ZERO, 20);

        let usages = collector.collect(&[entry(1), entry(2)], &mut LivePoints::new()).await.unwrap();

        assert_eq!(usages.len(), 2);
        assert_eq!(usages[0], ChipUsage::new(&entry(1)));
        assert_eq!(usages[1].free_hit, Some(2));
    }

    #[tokio::test]
    async fn test_triple_captain_without_live_data_has_no_points() {
        let source = ScriptedSource::new()
            .respond(&history_path(1), Ok(history_json(&[("3xc", 4)])))
            .respond(&picks_path(1, 4), Ok(captain_picks_json(&[(10, 1)], 10)));
        let resolver = resolver();
        let collector = ChipCollector::new(&source, &resolver, Duration::ZERO, 20);

        let usages = collector.collect(&[entry(1)], &mut LivePoints::new()).await.unwrap();

        assert_eq!(usages[0].triple_captain_player.as_deref(), Some("Alice Smith"));
        assert_eq!(usages[0].triple_captain_points, None);
    }
}
