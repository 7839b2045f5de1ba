/// Sort-state machine for column header clicks
///
/// Clicking a header cycles that column through asc -> desc -> rest. While the
/// column is asc or desc it is the only sort key; at rest the table goes back
/// to its default ordering.
use crate::types::{SortDirection, SortItem, SortState};
use log::debug;

/// Next direction in the asc -> desc -> none -> asc cycle
pub fn next_direction(current: Option<SortDirection>) -> Option<SortDirection> {
    match current {
        None => Some(SortDirection::Asc),
        Some(SortDirection::Asc) => Some(SortDirection::Desc),
        Some(SortDirection::Desc) => None,
    }
}

/// Compute the sort state after a click on `clicked_key`.
///
/// The clicked column replaces every other sort key. When it cycles back to
/// rest the state becomes a copy of `default_state`, or empty (original row
/// order) when there is no default.
pub fn update_sort_state(current: &SortState, clicked_key: &str, default_state: Option<&SortState>) -> SortState {
    let next = next_direction(current.direction_of(clicked_key));

    let state = match next {
        Some(direction) => SortState::single(SortItem::new(clicked_key, direction)),
        None => default_state.cloned().unwrap_or_default(),
    };

    debug!("Header '{}' clicked: [{}] -> [{}]", clicked_key, current, state);
    state
}

/// Direction and 1-based priority of `key` within `state`, for header arrows
pub fn header_indicator(state: &SortState, key: &str) -> Option<(SortDirection, usize)> {
    state.iter().position(|item| item.key == key).map(|idx| (state.items()[idx].direction, idx + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_state() -> SortState {
        SortState::new(vec![SortItem::asc("kecamatan"), SortItem::asc("desa")])
    }

    #[test]
    fn test_next_direction_cycles() {
        assert_eq!(next_direction(None), Some(SortDirection::Asc));
        assert_eq!(next_direction(Some(SortDirection::Asc)), Some(SortDirection::Desc));
        assert_eq!(next_direction(Some(SortDirection::Desc)), None);
    }

    #[test]
    fn test_click_replaces_all_other_keys() {
        let state = update_sort_state(&default_state(), "jumlah_sd", Some(&default_state()));
        assert_eq!(state.items(), &[SortItem::asc("jumlah_sd")]);
    }

    #[test]
    fn test_three_clicks_return_to_default() {
        let default = default_state();
        let first = update_sort_state(&default, "jumlah_sd", Some(&default));
        let second = update_sort_state(&first, "jumlah_sd", Some(&default));
        let third = update_sort_state(&second, "jumlah_sd", Some(&default));

        let first_dir = first.direction_of("jumlah_sd").unwrap();
        let second_dir = second.direction_of("jumlah_sd").unwrap();
        assert_ne!(first_dir, second_dir, "Second click should flip the direction");
        assert_eq!(third, default);
    }

    #[test]
    fn test_reset_without_default_is_empty() {
        let current = SortState::single(SortItem::desc("desa"));
        let state = update_sort_state(&current, "desa", None);
        assert!(state.is_empty());
    }

    #[test]
    fn test_column_already_in_default_advances_from_its_direction() {
        // kecamatan is asc in the default, so the first click goes to desc
        let state = update_sort_state(&default_state(), "kecamatan", Some(&default_state()));
        assert_eq!(state.items(), &[SortItem::desc("kecamatan")]);
    }

    #[test]
    fn test_header_indicator_reports_priority() {
        let state = default_state();
        assert_eq!(header_indicator(&state, "kecamatan"), Some((SortDirection::Asc, 1)));
        assert_eq!(header_indicator(&state, "desa"), Some((SortDirection::Asc, 2)));
        assert_eq!(header_indicator(&state, "jumlah_sd"), None);
    }
}
