//! League membership enumeration over paginated standings

use crate::api::fetch_standings_page;
use crate::client::JsonSource;
use crate::models::Entry;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Walks a classic league's standings pages until exhaustion
pub struct RosterEnumerator<'a, S: JsonSource + ?Sized> {
    source: &'a S,
    delay: Duration,
    max_pages: u32,
}

impl<'a, S: JsonSource + ?Sized> RosterEnumerator<'a, S> {
    pub fn new(source: &'a S, delay: Duration, max_pages: u32) -> Self {
        Self { source, delay, max_pages: max_pages.max(1) }
    }

    /// Collect every entry of the league, in standings order.
    ///
    /// Stops on an empty or missing page, when `has_next` is false, when a
    /// page adds no unseen entries, or after `max_pages` pages. An empty
    /// result means the league was not found.
    pub async fn enumerate(&self, league_id: u64) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        let mut seen = HashSet::new();
        let mut page = 1;

        loop {
            if page > 1 {
                sleep(self.delay).await;
            }

            let data = fetch_standings_page(self.source, league_id, page).await.with_context(|| {
                format!("Failed to fetch standings page {} for league {}", page, league_id)
            })?;

            if page == 1 {
                if let Some(league) = &data.league {
                    info!("League {}: {}", league.id, league.name);
                }
            }

            let Some(standings) = data.standings else {
                debug!("Page {} of league {} has no standings", page, league_id);
                break;
            };

            if standings.results.is_empty() {
                break;
            }

            let before = entries.len();
            for entry in standings.results {
                if seen.insert(entry.id) {
                    entries.push(entry);
                }
            }

            if entries.len() == before {
                warn!("Standings page {} repeated earlier entries, stopping pagination", page);
                break;
            }

            debug!("Page {}: {} entries so far", page, entries.len());

            if !standings.has_next {
                break;
            }

            if page >= self.max_pages {
                warn!("Reached the {} page limit for league {}, stopping pagination", self.max_pages, league_id);
                break;
            }

            page += 1;
        }

        info!("Found {} entries in league {} across {} page(s)", entries.len(), league_id, page);
        Ok(entries)
    }
}
