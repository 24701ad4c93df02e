//! Selection sub-engine for the virtualized backend.
//!
//! Selection state lives on the row records themselves as a shared `checked`
//! flag; this module only derives header state from it and writes toggles
//! back. The engine holds no selection state of its own. The standard backend
//! never uses this; it defers to its widget's native selection mechanism.

use crate::node::{Node, Toggle};
use crate::record::RowRecord;

/// Derived header-checkbox state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSelection {
    /// Every row is checked. Vacuously true for zero rows.
    pub all_selected: bool,
    /// Some but not all rows are checked.
    pub indeterminate: bool,
}

/// Derive the tri-state header checkbox from the rows' `checked` flags.
pub fn header_selection(rows: &[RowRecord]) -> HeaderSelection {
    let all_selected = rows.iter().all(RowRecord::checked);
    let contains_checked = rows.iter().any(RowRecord::checked);
    HeaderSelection {
        all_selected,
        indeterminate: contains_checked && !all_selected,
    }
}

/// Write the toggled value onto every row's `checked` flag.
pub fn set_all(rows: &[RowRecord], checked: bool) {
    for row in rows {
        row.set_checked(checked);
    }
}

/// The header cell: a tri-state checkbox whose toggle checks or unchecks
/// every row.
pub fn header_checkbox(rows: &[RowRecord]) -> Node {
    let state = header_selection(rows);
    let rows: Vec<RowRecord> = rows.to_vec();
    Node::Checkbox {
        checked: state.all_selected,
        indeterminate: state.indeterminate,
        on_toggle: Some(Toggle::new(move |checked| set_all(&rows, checked))),
    }
}

/// A per-row cell: reflects and mutates that row's own `checked` flag only.
pub fn row_checkbox(row: &RowRecord) -> Node {
    let row = row.clone();
    let checked = row.checked();
    Node::Checkbox {
        checked,
        indeterminate: false,
        on_toggle: Some(Toggle::new(move |value| row.set_checked(value))),
    }
}
