use crate::models::Bootstrap;

/// Gameweek ids to aggregate, ascending and de-duplicated.
///
/// With `only_finalised` only gameweeks flagged `data_checked` are kept.
pub fn select_gameweeks(bootstrap: &Bootstrap, only_finalised: bool) -> Vec<u32> {
    let mut ids: Vec<u32> = bootstrap
        .events
        .iter()
        .filter(|event| !only_finalised || event.data_checked)
        .map(|event| event.id)
        .collect();

    ids.sort_unstable();
    ids.dedup();
    ids
}
