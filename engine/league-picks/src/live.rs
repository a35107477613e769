//! Per-gameweek live points, fetched at most once per gameweek

use crate::api::fetch_live_event;
use crate::client::JsonSource;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Cache of `event/{gw}/live/` total points keyed by gameweek
#[derive(Debug, Default)]
pub struct LivePoints {
    by_gameweek: HashMap<u32, Option<HashMap<u32, i32>>>,
}

impl LivePoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element id to total points for a gameweek, `None` when unavailable.
    ///
    /// The first lookup of a gameweek fetches it and waits `delay`;
    /// unavailable gameweeks are remembered too.
    pub async fn points_for<S: JsonSource + ?Sized>(
        &mut self,
        source: &S,
        gameweek: u32,
        delay: Duration,
    ) -> Result<Option<&HashMap<u32, i32>>> {
        if !self.by_gameweek.contains_key(&gameweek) {
            let outcome = fetch_live_event(source, gameweek).await;
            sleep(delay).await;

            let points = match outcome {
                Ok(live) => {
                    Some(live.elements.into_iter().map(|e| (e.id, e.stats.total_points)).collect())
                }
                Err(e) if e.is_soft_missing() => {
                    warn!("Live data for gameweek {} unavailable: {}", gameweek, e);
                    None
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to fetch live data for gameweek {}", gameweek))
                }
            };
            self.by_gameweek.insert(gameweek, points);
        }

        Ok(self.by_gameweek.get(&gameweek).and_then(|points| points.as_ref()))
    }
}
