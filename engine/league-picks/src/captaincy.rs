//! Captain choice per entry per gameweek

use crate::aggregator::{fetch_squad, PicksFetch};
use crate::client::JsonSource;
use crate::export::{or_dash, yes_no};
use crate::live::LivePoints;
use crate::models::Entry;
use crate::resolver::ElementResolver;
use anyhow::Result;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

pub const CAPTAINCY_HEADERS: [&str; 6] =
    ["Manager Name", "Team Name", "Gameweek", "Captain", "Captain Points", "Triple Captain Used"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptaincyRecord {
    pub entry_id: u64,
    pub manager_name: String,
    pub entry_name: String,
    pub gameweek: u32,
    pub captain: String,
    pub captain_points: Option<i32>,
    pub triple_captain_used: bool,
}

impl CaptaincyRecord {
    pub fn record(&self) -> Vec<String> {
        vec![
            self.manager_name.clone(),
            self.entry_name.clone(),
            self.gameweek.to_string(),
            self.captain.clone(),
            or_dash(self.captain_points),
            yes_no(self.triple_captain_used),
        ]
    }
}

pub struct CaptaincyCollector<'a, S: JsonSource + ?Sized> {
    source: &'a S,
    resolver: &'a ElementResolver,
    delay: Duration,
}

impl<'a, S: JsonSource + ?Sized> CaptaincyCollector<'a, S> {
    pub fn new(source: &'a S, resolver: &'a ElementResolver, delay: Duration) -> Self {
        Self { source, resolver, delay }
    }

    /// Captain records, gameweeks outer and entries inner.
    ///
    /// Gameweeks without live data are skipped entirely; entries without a
    /// squad or without a captain produce no record. `triple_captain_weeks`
    /// maps entry id to the gameweek its triple captain chip was played.
    pub async fn collect(
        &self,
        entries: &[Entry],
        gameweeks: &[u32],
        triple_captain_weeks: &HashMap<u64, u32>,
        live: &mut LivePoints,
    ) -> Result<Vec<CaptaincyRecord>> {
        let mut records = Vec::new();

        for &gameweek in gameweeks {
            let Some(points) = live.points_for(self.source, gameweek, self.delay).await?.cloned() else {
                warn!("Skipping gameweek {} captaincy, live data unavailable", gameweek);
                continue;
            };

            for entry in entries {
                let outcome = fetch_squad(self.source, entry.id, gameweek).await;
                sleep(self.delay).await;

                let PicksFetch::Available(picks) = outcome? else {
                    continue;
                };
                let Some(captain) = picks.iter().find(|p| p.is_captain).map(|p| p.element) else {
                    continue;
                };

                records.push(CaptaincyRecord {
                    entry_id: entry.id,
                    manager_name: entry.manager_name.clone(),
                    entry_name: entry.entry_name.clone(),
                    gameweek,
                    captain: self.resolver.name(captain),
                    captain_points: points.get(&captain).copied(),
                    triple_captain_used: triple_captain_weeks.get(&entry.id) == Some(&gameweek),
                });
            }
        }

        info!("Collected {} captaincy records", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{live_path, picks_path};
    use crate::tests::{bootstrap_json, captain_picks_json, live_json, picks_json, ScriptedSource};

    fn entries() -> Vec<Entry> {
        vec![
            Entry { id: 1, entry_name: "Alpha".to_string(), manager_name: "Ann".to_string() },
            Entry { id: 2, entry_name: "Beta".to_string(), manager_name: "Ben".to_string() },
        ]
    }

    fn resolver() -> ElementResolver {
        ElementResolver::from_bootstrap(&serde_json::from_value(bootstrap_json()).unwrap())
    }

    #[tokio::test]
    async fn test_records_captain_points_and_triple_captain() {
        let source = ScriptedSource::new()
            .respond(&live_path(1), Ok(live_json(&[(10, 8), (11, 3)])))
            .respond(&picks_path(1, 1), Ok(captain_picks_json(&[(10, 1), (11, 2)], 10)))
            .respond(&picks_path(2, 1), Ok(captain_picks_json(&[(10, 1), (11, 2)], 11)));
        let resolver = resolver();
        let collector = CaptaincyCollector::new(&source, &resolver, Duration::ZERO);
        let triple_captain_weeks = HashMap::from([(2, 1)]);

        let records = collector
            .collect(&entries(), &[1], &triple_captain_weeks, &mut LivePoints::new())
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].record(), vec!["Ann", "Alpha", "1", "Alice Smith", "8", "No"]);
        assert_eq!(records[1].record(), vec!["Ben", "Beta", "1", "Rodri", "3", "Yes"]);
    }

    #[tokio::test]
    async fn test_gameweek_without_live_data_is_skipped() {
        let source = ScriptedSource::new()
            .respond(&live_path(2), Ok(live_json(&[(10, 5)])))
            .respond(&picks_path(1, 2), Ok(captain_picks_json(&[(10, 1)], 10)));
        let resolver = resolver();
        let collector = CaptaincyCollector::new(&source, &resolver, Duration::ZERO);

        let records = collector
            .collect(&entries()[..1], &[1, 2], &HashMap::new(), &mut LivePoints::new())
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].gameweek, 2);
        assert!(!source.calls().contains(&picks_path(1, 1)));
    }

    #[tokio::test]
    async fn test_missing_squad_or_captain_produces_no_record() {
        let source = ScriptedSource::new()
            .respond(&live_path(1), Ok(live_json(&[(10, 5)])))
            .respond(&picks_path(1, 1), Ok(picks_json(&[(10, 1)])));
        let resolver = resolver();
        let collector = CaptaincyCollector::new(&source, &resolver, Duration::ZERO);

        let records = collector
            .collect(&entries(), &[1], &HashMap::new(), &mut LivePoints::new())
            .await
            .unwrap();

        assert!(records.is_empty());
    }
}
