//! Transfer history per entry, resolved to display values

use crate::api::fetch_entry_transfers;
use crate::client::JsonSource;
use crate::export::yes_no;
use crate::models::{Entry, ResolvedPick};
use crate::resolver::ElementResolver;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

pub const TRANSFER_HEADERS: [&str; 10] = [
    "Manager Name",
    "Team Name",
    "Gameweek",
    "Player Out",
    "Out - Team",
    "Out - Position",
    "Player In",
    "In - Team",
    "In - Position",
    "Free Hit Active",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    pub entry_id: u64,
    pub manager_name: String,
    pub entry_name: String,
    pub gameweek: u32,
    pub player_out: ResolvedPick,
    pub player_in: ResolvedPick,
    pub free_hit_active: bool,
}

impl TransferRecord {
    pub fn record(&self) -> Vec<String> {
        vec![
            self.manager_name.clone(),
            self.entry_name.clone(),
            self.gameweek.to_string(),
            self.player_out.player.clone(),
            self.player_out.team.clone(),
            self.player_out.position.clone(),
            self.player_in.player.clone(),
            self.player_in.team.clone(),
            self.player_in.position.clone(),
            yes_no(self.free_hit_active),
        ]
    }
}

pub struct TransferCollector<'a, S: JsonSource + ?Sized> {
    source: &'a S,
    resolver: &'a ElementResolver,
    delay: Duration,
}

impl<'a, S: JsonSource + ?Sized> TransferCollector<'a, S> {
    pub fn new(source: &'a S, resolver: &'a ElementResolver, delay: Duration) -> Self {
        Self { source, resolver, delay }
    }

    /// Every transfer of every entry, sorted by gameweek then manager name.
    ///
    /// Transfers involving an element missing from the reference data are
    /// dropped. `free_hit_weeks` maps entry id to its free hit gameweek.
    pub async fn collect(
        &self,
        entries: &[Entry],
        free_hit_weeks: &HashMap<u64, u32>,
    ) -> Result<Vec<TransferRecord>> {
        let mut records = Vec::new();

        for entry in entries {
            let outcome = fetch_entry_transfers(self.source, entry.id).await;
            sleep(self.delay).await;

            let transfers = match outcome {
                Ok(transfers) => transfers,
                Err(e) if e.is_soft_missing() => {
                    warn!("No transfers for entry {}: {}", entry.id, e);
                    continue;
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to fetch transfers for entry {}", entry.id))
                }
            };

            for transfer in transfers {
                if !self.resolver.contains(transfer.element_in)
                    || !self.resolver.contains(transfer.element_out)
                {
                    debug!(
                        "Entry {}: dropping transfer {} -> {} with unknown element",
                        entry.id, transfer.element_out, transfer.element_in
                    );
                    continue;
                }

                records.push(TransferRecord {
                    entry_id: entry.id,
                    manager_name: entry.manager_name.clone(),
                    entry_name: entry.entry_name.clone(),
                    gameweek: transfer.event,
                    player_out: self.resolver.resolve(transfer.element_out),
                    player_in: self.resolver.resolve(transfer.element_in),
                    free_hit_active: free_hit_weeks.get(&entry.id) == Some(&transfer.event),
                });
            }
        }

        records.sort_by(|a, b| {
            a.gameweek.cmp(&b.gameweek).then_with(|| a.manager_name.cmp(&b.manager_name))
        });

        info!("Collected {} transfers", records.len());
        Ok(records)
    }
}
