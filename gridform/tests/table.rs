//! Tests for the two table backends and the backend selection.

use std::sync::Arc;

use serde_json::{Value, json};

use gridform::prelude::*;
use gridform::table::translate_columns;

fn resolver() -> Resolver {
    Resolver::new(Arc::new(ComponentRegistry::with_builtins()))
}

fn people(n: usize) -> Vec<RowRecord> {
    (0..n)
        .map(|i| RowRecord::from_value(json!({ "name": format!("p{i}"), "age": 20 + i })))
        .collect()
}

fn name_age_columns() -> Vec<ColumnConfig> {
    vec![
        ColumnConfig::new("name").label("Name"),
        ColumnConfig::new("age").label("Age"),
    ]
}

// -------------------------------------------------------------------------
// Backend selection
// -------------------------------------------------------------------------

#[test]
fn test_base_table_selects_backend_from_flag() {
    let props = TableProps::new(name_age_columns(), people(1));
    assert_eq!(
        BaseTable::new(props.clone(), resolver()).kind(),
        BackendKind::Standard
    );
    assert_eq!(
        BaseTable::new(props.virtualized(true), resolver()).kind(),
        BackendKind::Virtualized
    );
}

// -------------------------------------------------------------------------
// Standard backend
// -------------------------------------------------------------------------

#[test]
fn test_standard_renders_headers_and_rows() {
    let table = StandardTable::new(TableProps::new(name_age_columns(), people(2)), resolver());
    let node = table.render().unwrap();
    let Node::Column { children } = node else {
        panic!("expected a column root");
    };
    // header plus two body rows, no pagination (total is 0)
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].plain_text(), "NameAge");
    assert_eq!(children[1].plain_text(), "p020");
}

#[test]
fn test_standard_skips_hidden_columns() {
    let columns = vec![
        ColumnConfig::new("name").label("Name"),
        ColumnConfig::new("age").label("Age").visible(false),
    ];
    let table = StandardTable::new(TableProps::new(columns, people(1)), resolver());
    let node = table.render().unwrap();
    assert_eq!(node.plain_text(), "Namep0");
}

#[test]
fn test_standard_expands_column_groups_into_leaf_cells() {
    let columns = vec![
        ColumnConfig::new("name").label("Name"),
        ColumnConfig::new("address")
            .label("Address")
            .child(ColumnConfig::new("city").label("City"))
            .child(ColumnConfig::new("zip").label("Zip")),
    ];
    let rows = vec![RowRecord::from_value(
        json!({ "name": "ada", "city": "london", "zip": "e1" }),
    )];
    let table = StandardTable::new(TableProps::new(columns, rows), resolver());
    let node = table.render().unwrap();

    let Node::Column { children } = node else {
        panic!("expected a column root");
    };
    assert_eq!(children[0].plain_text(), "NameAddressCityZip");
    // the group contributes no cell of its own
    let Node::Row { children: cells } = &children[1] else {
        panic!("expected a body row");
    };
    assert_eq!(cells.len(), 3);
    assert_eq!(children[1].plain_text(), "adalondone1");
}

#[test]
fn test_standard_index_cells_carry_page_offset() {
    let columns = vec![ColumnConfig::new("idx").render_type(RenderType::Index)];
    let props = TableProps::new(columns, people(2)).pagination(PaginationState {
        page_num: 2,
        page_size: 10,
        total: 12,
    });
    let table = StandardTable::new(props, resolver());
    let node = table.render().unwrap();
    let Node::Column { children } = node else {
        panic!("expected a column root");
    };
    assert_eq!(children[1].plain_text(), "11");
    assert_eq!(children[2].plain_text(), "12");
}

#[test]
fn test_standard_shows_pagination_only_with_total() {
    let props = TableProps::new(name_age_columns(), people(1)).pagination(PaginationState {
        page_num: 1,
        page_size: 10,
        total: 42,
    });
    let table = StandardTable::new(props, resolver());
    assert!(table.render().unwrap().plain_text().contains("total 42"));

    let table = StandardTable::new(TableProps::new(name_age_columns(), people(1)), resolver());
    assert!(!table.render().unwrap().plain_text().contains("total"));
}

#[test]
fn test_standard_form_mode_hides_pagination() {
    let props = TableProps::new(name_age_columns(), people(1))
        .form(true)
        .pagination(PaginationState {
            page_num: 1,
            page_size: 10,
            total: 42,
        });
    let table = StandardTable::new(props, resolver());
    assert!(!table.render().unwrap().plain_text().contains("total"));
}

#[test]
fn test_standard_model_wraps_rows_in_form_mode() {
    let props = TableProps::new(name_age_columns(), people(2)).form(true);
    let table = StandardTable::new(props, resolver());
    let model = table.model();
    let rows = model
        .get(TABLE_MODEL_KEY)
        .and_then(Value::as_array)
        .expect("form model wraps rows under tableData");
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_standard_model_is_raw_array_in_display_mode() {
    let table = StandardTable::new(TableProps::new(name_age_columns(), people(2)), resolver());
    assert!(table.model().is_array());
}

#[test]
fn test_standard_form_cells_are_field_wrapped() {
    let columns = vec![ColumnConfig::new("name").label("Name").component("input")];
    let props = TableProps::new(columns, people(2)).form(true);
    let table = StandardTable::new(props, resolver());
    let node = table.render().unwrap();

    let Node::Column { children } = node else {
        panic!("expected a column root");
    };
    let Node::Row { children: cells } = &children[2] else {
        panic!("expected a body row");
    };
    let Node::Field { path, .. } = &cells[0] else {
        panic!("expected a field wrapper, got {:?}", cells[0]);
    };
    assert_eq!(path.to_string(), "tableData.1.name");
}

#[test]
fn test_standard_edits_write_through_to_host_rows() {
    let columns = vec![ColumnConfig::new("name").component("input")];
    let rows = people(1);
    let props = TableProps::new(columns, rows.clone()).form(true);
    let table = StandardTable::new(props, resolver());
    let node = table.render().unwrap();

    let input = find_input(&node).expect("an input editor");
    let Node::Input { on_change, .. } = input else {
        unreachable!()
    };
    on_change.clone().unwrap().call(json!("renamed"));
    assert_eq!(rows[0].get("name"), Some(json!("renamed")));
    assert_eq!(rows[0].get("age"), Some(json!(20)));
}

fn find_input(node: &Node) -> Option<&Node> {
    match node {
        Node::Input { .. } => Some(node),
        Node::Row { children } | Node::Column { children } | Node::Fragment(children) => {
            children.iter().find_map(find_input)
        }
        Node::Field { child, .. } => find_input(child),
        _ => None,
    }
}

// -------------------------------------------------------------------------
// Virtualized column translation
// -------------------------------------------------------------------------

#[test]
fn test_translation_defaults_aliases() {
    let columns = vec![ColumnConfig::new("name").label("Name")];
    let rows = Shared::new(people(0));
    let translated = translate_columns(&resolver(), &columns, &rows, false).unwrap();
    assert_eq!(translated[0].config.title.as_deref(), Some("Name"));
    assert_eq!(translated[0].config.data_key.as_deref(), Some("name"));
}

#[test]
fn test_translation_keeps_declared_aliases() {
    let columns = vec![
        ColumnConfig::new("name")
            .label("Name")
            .title("Full name")
            .data_key("fullName"),
    ];
    let rows = Shared::new(people(0));
    let translated = translate_columns(&resolver(), &columns, &rows, false).unwrap();
    assert_eq!(translated[0].config.title.as_deref(), Some("Full name"));
    assert_eq!(translated[0].config.data_key.as_deref(), Some("fullName"));
}

#[test]
fn test_translation_drops_hidden_columns() {
    let columns = vec![
        ColumnConfig::new("name"),
        ColumnConfig::new("age").visible(false),
    ];
    let rows = Shared::new(people(0));
    let translated = translate_columns(&resolver(), &columns, &rows, false).unwrap();
    assert_eq!(translated.len(), 1);
    assert_eq!(translated[0].config.prop, "name");
}

#[test]
fn test_translation_rejects_nested_columns() {
    let columns = vec![ColumnConfig::new("group").child(ColumnConfig::new("inner"))];
    let rows = Shared::new(people(0));
    let err = translate_columns(&resolver(), &columns, &rows, false).unwrap_err();
    assert!(matches!(
        err,
        RenderError::NestedColumnsUnsupported { prop } if prop == "group"
    ));
}

// -------------------------------------------------------------------------
// Virtualized backend
// -------------------------------------------------------------------------

#[test]
fn test_virtualized_windows_rows_to_the_viewport() {
    let props = TableProps::new(name_age_columns(), people(10)).virtualized(true);
    let table = VirtualizedTable::new(props, resolver());
    table.set_size(80, 4);

    let node = table.render().unwrap();
    let Node::Column { children } = node else {
        panic!("expected a column root");
    };
    // header plus three visible rows
    assert_eq!(children.len(), 4);
    assert_eq!(children[1].plain_text(), "p020");
}

#[test]
fn test_virtualized_scrolls_the_window() {
    let props = TableProps::new(name_age_columns(), people(10)).virtualized(true);
    let table = VirtualizedTable::new(props, resolver());
    table.set_size(80, 4);
    table.render().unwrap();

    table.facade().scroll_to_top(5);
    let node = table.render().unwrap();
    let Node::Column { children } = node else {
        panic!("expected a column root");
    };
    assert_eq!(children[1].plain_text(), "p525");
}

#[test]
fn test_virtualized_clamps_scroll_past_the_end() {
    let props = TableProps::new(name_age_columns(), people(10)).virtualized(true);
    let table = VirtualizedTable::new(props, resolver());
    table.set_size(80, 4);
    table.render().unwrap();

    table.facade().scroll_to_top(100);
    assert_eq!(table.scroll_offset().1, 7);
}

#[test]
fn test_virtualized_scroll_to_row_strategies() {
    let props = TableProps::new(name_age_columns(), people(100)).virtualized(true);
    let table = VirtualizedTable::new(props, resolver());
    table.set_size(80, 11); // 10 data rows
    table.render().unwrap();
    let facade = table.facade();

    facade.scroll_to_row(40, ScrollStrategy::Start);
    assert_eq!(table.scroll_offset().1, 40);

    facade.scroll_to_row(40, ScrollStrategy::End);
    assert_eq!(table.scroll_offset().1, 31);

    facade.scroll_to_row(40, ScrollStrategy::Center);
    assert_eq!(table.scroll_offset().1, 35);

    // already visible, smart leaves the window alone
    facade.scroll_to_row(40, ScrollStrategy::Smart);
    assert_eq!(table.scroll_offset().1, 35);

    // out of view, smart centers
    facade.scroll_to_row(80, ScrollStrategy::Smart);
    assert_eq!(table.scroll_offset().1, 75);
}

#[test]
fn test_virtualized_auto_resize_consults_the_provider() {
    let props = TableProps::new(name_age_columns(), people(10))
        .virtualized(true)
        .auto_resize(true);
    let table = VirtualizedTable::new(props, resolver());
    table.set_size(80, 20);
    table.set_size_provider(|| (40, 3)); // 2 data rows

    let node = table.render().unwrap();
    let Node::Column { children } = node else {
        panic!("expected a column root");
    };
    assert_eq!(children.len(), 3);
}

#[test]
fn test_virtualized_header_checkbox_tracks_row_state() {
    let mut columns = vec![ColumnConfig::new("sel").render_type(RenderType::Selection)];
    columns.extend(name_age_columns());
    let rows = people(2);
    let props = TableProps::new(columns, rows.clone()).virtualized(true);
    let table = VirtualizedTable::new(props, resolver());

    let header_state = |table: &VirtualizedTable| {
        let Node::Column { children } = table.render().unwrap() else {
            panic!("expected a column root");
        };
        let Node::Row { children: cells } = &children[0] else {
            panic!("expected a header row");
        };
        let Node::Checkbox {
            checked,
            indeterminate,
            ..
        } = &cells[0]
        else {
            panic!("expected a header checkbox");
        };
        (*checked, *indeterminate)
    };

    assert_eq!(header_state(&table), (false, false));
    rows[0].set_checked(true);
    assert_eq!(header_state(&table), (false, true));
    rows[1].set_checked(true);
    assert_eq!(header_state(&table), (true, false));
}

#[test]
fn test_virtualized_rejects_groups_at_render_time() {
    let columns = vec![ColumnConfig::new("group").child(ColumnConfig::new("inner"))];
    let props = TableProps::new(columns, people(1)).virtualized(true);
    let table = VirtualizedTable::new(props, resolver());
    assert!(matches!(
        table.render(),
        Err(RenderError::NestedColumnsUnsupported { .. })
    ));
}
