use league_picks::logging::initialize_logging;
use league_picks::{LeaguePicksPipeline, PicksConfig, ReportOutcome, RunOutcome};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = PicksConfig::from_env()?;
    initialize_logging(&config.logging)?;

    info!("Starting league picks collection for league {}", config.league_id);

    let report_enabled = config.report.enabled;
    let pipeline = LeaguePicksPipeline::new(config)?;

    match pipeline.run().await {
        Ok(RunOutcome::Written { path, rows, gameweeks, summary, timestamp }) => {
            info!(
                "Done at {}. Saved {} rows covering gameweeks {:?} to {:?} ({} squads, {} missing)",
                timestamp.to_rfc3339(),
                rows,
                gameweeks,
                path,
                summary.available,
                summary.missing
            );
            info!("Columns: identifiers, then GW<n>_Player, GW<n>_Team, GW<n>_Position per gameweek");
        }
        Ok(RunOutcome::NoGameweeks { league_id, timestamp }) => {
            info!("Nothing to collect for league {} yet ({})", league_id, timestamp.to_rfc3339());
        }
        Err(e) => {
            error!("Collection failed: {:#}", e);
            return Err(e);
        }
    }

    if !report_enabled {
        return Ok(());
    }

    match pipeline.run_report().await {
        Ok(ReportOutcome { files, transfers, chip_rows, captaincy_rows, timestamp }) => {
            info!(
                "Report done at {}: {} transfers to {:?}, {} chip rows to {:?}, {} captaincy rows to {:?}",
                timestamp.to_rfc3339(),
                transfers,
                files.transfers,
                chip_rows,
                files.chips,
                captaincy_rows,
                files.captaincy
            );
            Ok(())
        }
        Err(e) => {
            error!("Report failed: {:#}", e);
            Err(e)
        }
    }
}
