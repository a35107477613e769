//! Wide per-entry, per-slot table with one column triplet per gameweek

use crate::export::{write_sheet, write_sheet_file};
use crate::models::{Entry, ResolvedPick, FIRST_SLOT, LAST_SLOT};
use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Write;
use std::path::Path;

/// Identifying columns written before the gameweek triplets
pub const ID_COLUMNS: [&str; 5] = ["league_id", "entry_id", "entry_name", "manager_name", "roster_slot"];

/// One (entry, roster slot) row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideRow {
    pub league_id: u64,
    pub entry_id: u64,
    pub entry_name: String,
    pub manager_name: String,
    pub roster_slot: u8,
    cells: BTreeMap<u32, ResolvedPick>,
}

impl WideRow {
    /// The resolved pick for a gameweek, `None` when no data was written
    pub fn pick(&self, gameweek: u32) -> Option<&ResolvedPick> {
        self.cells.get(&gameweek)
    }
}

/// Rows are created once in [`WideTable::new`]; afterwards only gameweek
/// cells change. Writes go through the `(entry_id, slot)` index.
#[derive(Debug, Clone)]
pub struct WideTable {
    league_id: u64,
    rows: Vec<WideRow>,
    index: HashMap<(u64, u8), usize>,
    gameweeks: BTreeSet<u32>,
}

impl WideTable {
    /// One row per entry and slot 1..=15, no gameweek columns yet
    pub fn new(league_id: u64, entries: &[Entry]) -> Self {
        let mut table = Self {
            league_id,
            rows: Vec::with_capacity(entries.len() * LAST_SLOT as usize),
            index: HashMap::new(),
            gameweeks: BTreeSet::new(),
        };

        for entry in entries {
            for slot in FIRST_SLOT..=LAST_SLOT {
                if table.index.contains_key(&(entry.id, slot)) {
                    continue;
                }
                table.index.insert((entry.id, slot), table.rows.len());
                table.rows.push(WideRow {
                    league_id,
                    entry_id: entry.id,
                    entry_name: entry.entry_name.clone(),
                    manager_name: entry.manager_name.clone(),
                    roster_slot: slot,
                    cells: BTreeMap::new(),
                });
            }
        }

        table
    }

    pub fn league_id(&self) -> u64 {
        self.league_id
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[WideRow] {
        &self.rows
    }

    /// Included gameweeks, ascending
    pub fn gameweeks(&self) -> impl Iterator<Item = u32> + '_ {
        self.gameweeks.iter().copied()
    }

    pub fn row(&self, entry_id: u64, slot: u8) -> Option<&WideRow> {
        self.index.get(&(entry_id, slot)).map(|&i| &self.rows[i])
    }

    /// Add a gameweek's columns, clearing any values already written for it
    pub fn add_gameweek(&mut self, gameweek: u32) {
        self.gameweeks.insert(gameweek);
        for row in &mut self.rows {
            row.cells.remove(&gameweek);
        }
    }

    /// Write a resolved pick into the row keyed by `(entry_id, slot)`.
    ///
    /// Returns `false` when no such row exists or the gameweek was not added.
    pub fn set_pick(&mut self, entry_id: u64, slot: u8, gameweek: u32, pick: ResolvedPick) -> bool {
        if !self.gameweeks.contains(&gameweek) {
            return false;
        }

        match self.index.get(&(entry_id, slot)) {
            Some(&i) => {
                self.rows[i].cells.insert(gameweek, pick);
                true
            }
            None => false,
        }
    }

    /// Stable sort by entry name, manager name, then roster slot
    pub fn sort(&mut self) {
        self.rows.sort_by(|a, b| {
            a.entry_name
                .cmp(&b.entry_name)
                .then_with(|| a.manager_name.cmp(&b.manager_name))
                .then_with(|| a.roster_slot.cmp(&b.roster_slot))
        });

        self.index = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| ((row.entry_id, row.roster_slot), i))
            .collect();
    }

    /// Column names: identifiers, then `GW<n>_Player/Team/Position` per gameweek
    pub fn headers(&self) -> Vec<String> {
        let mut headers: Vec<String> = ID_COLUMNS.iter().map(|c| c.to_string()).collect();
        for gw in &self.gameweeks {
            headers.push(format!("GW{}_Player", gw));
            headers.push(format!("GW{}_Team", gw));
            headers.push(format!("GW{}_Position", gw));
        }
        headers
    }

    /// Rows rendered as CSV fields; missing picks become empty fields
    pub fn records(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows.iter().map(move |row| {
            let mut record = vec![
                row.league_id.to_string(),
                row.entry_id.to_string(),
                row.entry_name.clone(),
                row.manager_name.clone(),
                row.roster_slot.to_string(),
            ];
            for gw in &self.gameweeks {
                match row.pick(*gw) {
                    Some(pick) => {
                        record.push(pick.player.clone());
                        record.push(pick.team.clone());
                        record.push(pick.position.clone());
                    }
                    None => record.extend([String::new(), String::new(), String::new()]),
                }
            }
            record
        })
    }

    /// Serialize headers and records as CSV into any writer
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        write_sheet(writer, self.headers(), self.records())
    }

    /// Write the table to a CSV file, creating parent directories
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        write_sheet_file(path, self.headers(), self.records())
    }
}
