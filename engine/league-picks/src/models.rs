use serde::{Deserialize, Serialize};

/// Lowest roster slot in a submitted squad
pub const FIRST_SLOT: u8 = 1;

/// Highest roster slot in a submitted squad
pub const LAST_SLOT: u8 = 15;

/// Reference data from `bootstrap-static/`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Bootstrap {
    #[serde(default)]
    pub elements: Vec<Element>,

    #[serde(default)]
    pub teams: Vec<Team>,

    #[serde(default)]
    pub events: Vec<Gameweek>,
}

/// A selectable player
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Element {
    pub id: u32,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub second_name: String,

    /// Position class, 1..=4 for known positions
    pub element_type: u8,

    /// Team id, resolved through `Bootstrap::teams`
    pub team: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Team {
    pub id: u32,
    pub short_name: String,
}

/// A scored gameweek (an `event` upstream)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Gameweek {
    pub id: u32,

    /// Set once the gameweek's data has been finalised
    #[serde(default)]
    pub data_checked: bool,
}

/// Position class of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    /// Map an upstream `element_type` to a position
    pub fn from_element_type(element_type: u8) -> Option<Self> {
        match element_type {
            1 => Some(Self::Goalkeeper),
            2 => Some(Self::Defender),
            3 => Some(Self::Midfielder),
            4 => Some(Self::Forward),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Goalkeeper => "GK",
            Self::Defender => "DEF",
            Self::Midfielder => "MID",
            Self::Forward => "FWD",
        }
    }
}

/// One page of `leagues-classic/{id}/standings/`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StandingsPage {
    #[serde(default)]
    pub league: Option<LeagueInfo>,

    /// Absent when the league does not exist or is private
    #[serde(default)]
    pub standings: Option<Standings>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LeagueInfo {
    pub id: u64,

    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Standings {
    #[serde(default)]
    pub has_next: bool,

    #[serde(default)]
    pub results: Vec<Entry>,
}

/// A league member: a manager and their team
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Entry {
    /// Entry id
    #[serde(rename = "entry")]
    pub id: u64,

    /// Team display name
    pub entry_name: String,

    /// Manager display name
    #[serde(rename = "player_name")]
    pub manager_name: String,
}

/// Body of `entry/{id}/event/{gw}/picks/`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EntryPicks {
    /// `None` when the body carries no `picks` array
    #[serde(default)]
    pub picks: Option<Vec<Pick>>,
}

/// Assignment of an element to a roster slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Pick {
    pub element: u32,

    /// Roster slot, 1..=15
    pub position: u8,

    #[serde(default)]
    pub is_captain: bool,
}

/// Chip names as reported by `entry/{id}/history/`
pub const WILDCARD: &str = "wildcard";
pub const FREE_HIT: &str = "freehit";
pub const BENCH_BOOST: &str = "bboost";
pub const TRIPLE_CAPTAIN: &str = "3xc";

/// Body of `entry/{id}/history/`; only chip plays are read
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EntryHistory {
    #[serde(default)]
    pub chips: Vec<ChipPlay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChipPlay {
    pub name: String,

    /// Gameweek the chip was played in
    pub event: u32,
}

/// One element of `entry/{id}/transfers/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Transfer {
    pub element_in: u32,
    pub element_out: u32,
    pub event: u32,
}

/// Body of `event/{gw}/live/`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LiveEvent {
    #[serde(default)]
    pub elements: Vec<LiveElement>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LiveElement {
    pub id: u32,
    pub stats: LiveStats,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LiveStats {
    #[serde(default)]
    pub total_points: i32,
}

/// Display values for one picked element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPick {
    pub player: String,
    pub team: String,
    pub position: String,
}
