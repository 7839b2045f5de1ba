/// Multi-key sort engine
///
/// Sorts rows by an ordered list of (column, direction) pairs. Each sort item is
/// resolved against the column descriptors once, up front; the comparison then
/// walks the items left to right and the first non-equal result wins.
use crate::compare::{TextCollator, compare_number, compare_text};
use crate::types::{ColumnDescriptor, ColumnType, Row, SortDirection, SortState};
use log::debug;
use std::cmp::Ordering;

/// A sort item with its column metadata already looked up
struct ResolvedKey<'a> {
    data_key: &'a str,
    column_type: ColumnType,
    direction: SortDirection,
}

fn resolve_keys<'a>(state: &'a SortState, columns: &'a [ColumnDescriptor]) -> Vec<ResolvedKey<'a>> {
    state
        .iter()
        .map(|item| match columns.iter().find(|c| c.key == item.key) {
            Some(column) => {
                ResolvedKey { data_key: column.data_key(), column_type: column.column_type, direction: item.direction }
            }
            // Unknown columns read the field named by the sort key, as text
            None => ResolvedKey { data_key: &item.key, column_type: ColumnType::Text, direction: item.direction },
        })
        .collect()
}

fn compare_rows<R: Row>(a: &R, b: &R, keys: &[ResolvedKey<'_>], collator: &TextCollator) -> Ordering {
    for key in keys {
        let (left, right) = (a.field(key.data_key), b.field(key.data_key));
        let ordering = match key.column_type {
            ColumnType::Number => compare_number(left, right),
            ColumnType::Text => compare_text(left, right, collator),
        };
        if ordering != Ordering::Equal {
            return match key.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
        }
    }
    Ordering::Equal
}

/// Sort rows by `state`, returning a new vector.
///
/// The input is never reordered in place. Rows that tie on every sort item keep
/// their original relative order.
pub fn sort_rows<R: Row + Clone>(
    rows: &[R],
    state: &SortState,
    columns: &[ColumnDescriptor],
    collator: &TextCollator,
) -> Vec<R> {
    let mut sorted = rows.to_vec();
    if state.is_empty() || rows.is_empty() {
        return sorted;
    }

    let keys = resolve_keys(state, columns);
    debug!("Sorting {} rows by {}", rows.len(), state);

    // slice::sort_by is stable
    sorted.sort_by(|a, b| compare_rows(a, b, &keys, collator));
    sorted
}

#[cfg(test)]
#[path = "sort_test.rs"]
mod sort_test;
