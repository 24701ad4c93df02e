//! Table Demo
//!
//! Drives the engine end to end without a widget layer:
//! - standard backend with index, formatter and editable columns
//! - form mode validation through the facade
//! - virtualized backend with selection and a scrolled window

use std::error::Error;
use std::fs::File;
use std::sync::Arc;

use serde_json::json;
use simplelog::{Config, LevelFilter, WriteLogger};

use gridform::prelude::*;

fn main() -> Result<(), Box<dyn Error>> {
    WriteLogger::init(
        LevelFilter::Debug,
        Config::default(),
        File::create("table_demo.log")?,
    )?;

    let resolver = Resolver::new(Arc::new(ComponentRegistry::with_builtins()));

    let columns = vec![
        ColumnConfig::new("idx").render_type(RenderType::Index),
        ColumnConfig::new("name")
            .label("Name")
            .component("input")
            .rules(vec![ValidationRule::required("name is required")]),
        ColumnConfig::new("age").label("Age").formatter(Arc::new(|_, ctx| {
            Ok(Node::text(format!("{} years", ctx.value())))
        })),
    ];
    let rows = vec![
        RowRecord::from_value(json!({ "name": "ada", "age": 36 })),
        RowRecord::from_value(json!({ "name": "", "age": 41 })),
    ];

    // Display mode with pagination.
    let props = TableProps::new(columns.clone(), rows.clone()).pagination(PaginationState {
        page_num: 2,
        page_size: 10,
        total: 12,
    });
    let table = BaseTable::new(props, resolver.clone());
    println!("display:\n{}", render_lines(&table.render()?));

    // Form mode: the second row's name is blank, validation fails until the
    // host fills it in.
    let form_table = BaseTable::new(
        TableProps::new(columns.clone(), rows.clone()).form(true),
        resolver.clone(),
    );
    let facade = form_table.facade();
    println!("valid before edit: {}", facade.validate(Box::new(|_| {})));
    rows[1].set("name", json!("grace"));
    println!("valid after edit:  {}", facade.validate(Box::new(|_| {})));

    // Virtualized backend with a selection column and a scrolled window.
    let mut virtual_columns = vec![ColumnConfig::new("sel").render_type(RenderType::Selection)];
    virtual_columns.extend(columns);
    let many_rows: Vec<RowRecord> = (0..50)
        .map(|i| RowRecord::from_value(json!({ "name": format!("row {i}"), "age": i })))
        .collect();
    let virtual_table = BaseTable::new(
        TableProps::new(virtual_columns, many_rows).virtualized(true),
        resolver,
    );
    virtual_table.render()?;
    virtual_table
        .facade()
        .scroll_to_row(30, ScrollStrategy::Center);
    println!("virtualized window:\n{}", render_lines(&virtual_table.render()?));

    Ok(())
}

/// One line per top-level child, cells joined by pipes.
fn render_lines(node: &Node) -> String {
    let Node::Column { children } = node else {
        return node.plain_text();
    };
    children
        .iter()
        .map(|child| match child {
            Node::Row { children } => children
                .iter()
                .map(Node::plain_text)
                .collect::<Vec<_>>()
                .join(" | "),
            other => other.plain_text(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
