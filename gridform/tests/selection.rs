//! Tests for the virtualized selection sub-engine.

use serde_json::json;

use gridform::node::Node;
use gridform::record::RowRecord;
use gridform::selection::{header_checkbox, header_selection, row_checkbox, set_all};

fn rows(n: usize) -> Vec<RowRecord> {
    (0..n)
        .map(|i| RowRecord::from_value(json!({ "id": i })))
        .collect()
}

#[test]
fn test_empty_collection_is_vacuously_all_selected() {
    let state = header_selection(&[]);
    assert!(state.all_selected);
    assert!(!state.indeterminate);
}

#[test]
fn test_no_rows_checked() {
    let rows = rows(3);
    let state = header_selection(&rows);
    assert!(!state.all_selected);
    assert!(!state.indeterminate);
}

#[test]
fn test_some_rows_checked_is_indeterminate() {
    let rows = rows(3);
    rows[1].set_checked(true);
    let state = header_selection(&rows);
    assert!(!state.all_selected);
    assert!(state.indeterminate);
}

#[test]
fn test_all_rows_checked() {
    let rows = rows(3);
    set_all(&rows, true);
    let state = header_selection(&rows);
    assert!(state.all_selected);
    assert!(!state.indeterminate);
}

#[test]
fn test_header_toggle_checks_every_row() {
    let rows = rows(3);
    rows[0].set_checked(true);

    let Node::Checkbox { on_toggle, .. } = header_checkbox(&rows) else {
        panic!("expected a checkbox");
    };
    on_toggle.unwrap().call(true);
    assert!(rows.iter().all(RowRecord::checked));
}

#[test]
fn test_header_reflects_current_state() {
    let rows = rows(2);
    rows[0].set_checked(true);
    let Node::Checkbox {
        checked,
        indeterminate,
        ..
    } = header_checkbox(&rows)
    else {
        panic!("expected a checkbox");
    };
    assert!(!checked);
    assert!(indeterminate);
}

#[test]
fn test_row_checkbox_mutates_only_its_own_row() {
    let rows = rows(3);
    let Node::Checkbox { on_toggle, .. } = row_checkbox(&rows[1]) else {
        panic!("expected a checkbox");
    };
    on_toggle.unwrap().call(true);
    assert!(!rows[0].checked());
    assert!(rows[1].checked());
    assert!(!rows[2].checked());
}

#[test]
fn test_selection_is_visible_through_row_aliases() {
    let rows = rows(1);
    let alias = rows[0].clone();
    set_all(&rows, true);
    assert!(alias.checked());
}
