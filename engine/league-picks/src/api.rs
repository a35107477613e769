//! Typed access to the upstream endpoints over any [`JsonSource`]

use crate::client::JsonSource;
use crate::error::{FetchError, Result};
use crate::models::{Bootstrap, EntryHistory, EntryPicks, LiveEvent, StandingsPage, Transfer};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const BOOTSTRAP_PATH: &str = "bootstrap-static/";

pub fn standings_path(league_id: u64) -> String {
    format!("leagues-classic/{}/standings/", league_id)
}

pub fn picks_path(entry_id: u64, gameweek: u32) -> String {
    format!("entry/{}/event/{}/picks/", entry_id, gameweek)
}

pub fn history_path(entry_id: u64) -> String {
    format!("entry/{}/history/", entry_id)
}

pub fn transfers_path(entry_id: u64) -> String {
    format!("entry/{}/transfers/", entry_id)
}

pub fn live_path(gameweek: u32) -> String {
    format!("event/{}/live/", gameweek)
}

/// Fetch elements, teams and gameweeks
pub async fn fetch_bootstrap<S: JsonSource + ?Sized>(source: &S) -> Result<Bootstrap> {
    let value = source.get_json(BOOTSTRAP_PATH, &[]).await?;
    decode(BOOTSTRAP_PATH, value)
}

/// Fetch one page (1-based) of a classic league's standings
pub async fn fetch_standings_page<S: JsonSource + ?Sized>(
    source: &S,
    league_id: u64,
    page: u32,
) -> Result<StandingsPage> {
    let path = standings_path(league_id);
    let value = source.get_json(&path, &[("page_standings", page.to_string())]).await?;
    decode(&path, value)
}

/// Fetch an entry's squad for one gameweek
pub async fn fetch_entry_picks<S: JsonSource + ?Sized>(
    source: &S,
    entry_id: u64,
    gameweek: u32,
) -> Result<EntryPicks> {
    let path = picks_path(entry_id, gameweek);
    let value = source.get_json(&path, &[]).await?;
    decode(&path, value)
}

/// Fetch an entry's season history (chip plays)
pub async fn fetch_entry_history<S: JsonSource + ?Sized>(
    source: &S,
    entry_id: u64,
) -> Result<EntryHistory> {
    let path = history_path(entry_id);
    let value = source.get_json(&path, &[]).await?;
    decode(&path, value)
}

/// Fetch every transfer an entry has made this season
pub async fn fetch_entry_transfers<S: JsonSource + ?Sized>(
    source: &S,
    entry_id: u64,
) -> Result<Vec<Transfer>> {
    let path = transfers_path(entry_id);
    let value = source.get_json(&path, &[]).await?;
    decode(&path, value)
}

/// Fetch live per-element stats for one gameweek
pub async fn fetch_live_event<S: JsonSource + ?Sized>(source: &S, gameweek: u32) -> Result<LiveEvent> {
    let path = live_path(gameweek);
    let value = source.get_json(&path, &[]).await?;
    decode(&path, value)
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|source| FetchError::Decode { url: path.to_string(), source })
}
