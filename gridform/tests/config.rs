//! Tests for the column configuration model.

use gridform::prelude::*;

#[test]
fn test_render_type_reserved_names() {
    assert_eq!(RenderType::from_name("index"), RenderType::Index);
    assert_eq!(RenderType::from_name("selection"), RenderType::Selection);
    assert_eq!(RenderType::from_name("expand"), RenderType::Expand);
    assert_eq!(RenderType::from_name("slot"), RenderType::Slot);
    assert!(RenderType::from_name("index").is_reserved());
}

#[test]
fn test_render_type_component_name() {
    let render_type = RenderType::from_name("date-picker");
    assert_eq!(
        render_type,
        RenderType::Component("date-picker".to_string())
    );
    assert!(!render_type.is_reserved());
    assert_eq!(render_type.component_name(), Some("date-picker"));
}

#[test]
fn test_visible_defaults_to_true() {
    let column = ColumnConfig::new("name");
    assert!(column.is_visible());
}

#[test]
fn test_visible_columns_filters_and_preserves_order() {
    let columns = vec![
        ColumnConfig::new("a"),
        ColumnConfig::new("b").visible(false),
        ColumnConfig::new("c").visible(true),
        ColumnConfig::new("d"),
    ];
    let visible: Vec<&str> = visible_columns(&columns)
        .iter()
        .map(|c| c.prop.as_str())
        .collect();
    assert_eq!(visible, vec!["a", "c", "d"]);
}

#[test]
fn test_required_from_any_rule() {
    let column = ColumnConfig::new("age").rules(vec![
        ValidationRule::default(),
        ValidationRule::required("age is required"),
    ]);
    assert!(column.is_required());
}

#[test]
fn test_required_defaults_to_false() {
    assert!(!ColumnConfig::new("age").is_required());
    let column = ColumnConfig::new("age").rules(vec![ValidationRule::default()]);
    assert!(!column.is_required());
}

#[test]
fn test_required_map_covers_visible_columns() {
    let columns = vec![
        ColumnConfig::new("name").rules(vec![ValidationRule::required("required")]),
        ColumnConfig::new("age"),
        ColumnConfig::new("hidden")
            .visible(false)
            .rules(vec![ValidationRule::required("required")]),
    ];
    let map = required_map(&columns);
    assert_eq!(map.get("name"), Some(&true));
    assert_eq!(map.get("age"), Some(&false));
    assert_eq!(map.get("hidden"), None);
}

#[test]
fn test_validate_unique_props_reports_duplicates() {
    let columns = vec![
        ColumnConfig::new("name"),
        ColumnConfig::new("age"),
        ColumnConfig::new("name"),
        ColumnConfig::new("age"),
        ColumnConfig::new("city"),
    ];
    let duplicates = validate_unique_props(&columns).unwrap_err();
    assert_eq!(duplicates, vec!["age".to_string(), "name".to_string()]);
}

#[test]
fn test_validate_unique_props_accepts_distinct() {
    let columns = vec![ColumnConfig::new("name"), ColumnConfig::new("age")];
    assert!(validate_unique_props(&columns).is_ok());
}

#[test]
fn test_header_text_prefers_label() {
    let column = ColumnConfig::new("name").label("Name").title("Other");
    assert_eq!(column.header_text(), "Name");

    let column = ColumnConfig::new("name").title("Title only");
    assert_eq!(column.header_text(), "Title only");

    assert_eq!(ColumnConfig::new("name").header_text(), "");
}

#[test]
fn test_model_name_defaults() {
    let column = ColumnConfig::new("name");
    assert_eq!(column.com_props.model_name(), DEFAULT_MODEL_NAME);

    let column = ColumnConfig::new("name").model_name("value");
    assert_eq!(column.com_props.model_name(), "value");
}
