//! League activity report: transfers, chip usage and captaincy sheets

use crate::captaincy::{CaptaincyRecord, CAPTAINCY_HEADERS};
use crate::chips::{ChipUsage, CHIP_HEADERS};
use crate::export::write_sheet_file;
use crate::transfers::{TransferRecord, TRANSFER_HEADERS};
use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything collected for one league report
#[derive(Debug, Clone, Default)]
pub struct LeagueReport {
    pub league_id: u64,
    pub transfers: Vec<TransferRecord>,
    pub chips: Vec<ChipUsage>,
    pub captaincy: Vec<CaptaincyRecord>,
}

/// Paths of the written sheets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub transfers: PathBuf,
    pub chips: PathBuf,
    pub captaincy: PathBuf,
}

impl ReportFiles {
    /// `fpl_league_<id>_{transfers,chip_usage,captaincy}.csv` under `dir`
    pub fn in_dir(dir: &Path, league_id: u64) -> Self {
        let sheet = |name: &str| dir.join(format!("fpl_league_{}_{}.csv", league_id, name));
        Self { transfers: sheet("transfers"), chips: sheet("chip_usage"), captaincy: sheet("captaincy") }
    }
}

/// Gameweek of one chip per entry, for entries that played it
pub fn chip_weeks(chips: &[ChipUsage], week: impl Fn(&ChipUsage) -> Option<u32>) -> HashMap<u64, u32> {
    chips.iter().filter_map(|usage| week(usage).map(|gw| (usage.entry_id, gw))).collect()
}

impl LeagueReport {
    /// Write the three sheets into `dir`
    pub fn write(&self, dir: &Path) -> Result<ReportFiles> {
        let files = ReportFiles::in_dir(dir, self.league_id);

        write_sheet_file(
            &files.transfers,
            TRANSFER_HEADERS,
            self.transfers.iter().map(TransferRecord::record),
        )?;
        write_sheet_file(&files.chips, CHIP_HEADERS, self.chips.iter().map(ChipUsage::record))?;
        write_sheet_file(
            &files.captaincy,
            CAPTAINCY_HEADERS,
            self.captaincy.iter().map(CaptaincyRecord::record),
        )?;

        info!(
            "Wrote {} transfers, {} chip rows, {} captaincy rows to {:?}",
            self.transfers.len(),
            self.chips.len(),
            self.captaincy.len(),
            dir
        );
        Ok(files)
    }
}
