//! Standard table backend.
//!
//! Renders the full visible column set (including nested column groups) over
//! the entire row collection, wraps the rows in the single-key `tableData`
//! model in form mode, and attaches the pagination adapter below the body.
//! Selection and expansion columns map to the native widget's own mechanisms,
//! so this backend emits no cell content for them.

use std::sync::Arc;

use serde_json::Value;

use crate::config::{ColumnConfig, RenderType, visible_columns};
use crate::context::{BackendKind, RenderContext};
use crate::error::RenderError;
use crate::facade::{Facade, FormHandle, ValidateCallback};
use crate::node::{FieldPath, Node, TABLE_MODEL_KEY};
use crate::pagination::Paginator;
use crate::record::RowRecord;
use crate::resolver::Resolver;
use crate::state::Shared;

use super::{TableBackend, TableProps};

/// The standard renderer.
pub struct StandardTable {
    columns: Shared<Vec<ColumnConfig>>,
    rows: Shared<Vec<RowRecord>>,
    is_form: bool,
    resolver: Resolver,
    paginator: Paginator,
    facade: Facade,
}

impl StandardTable {
    pub fn new(props: TableProps, resolver: Resolver) -> Self {
        let columns = Shared::new(props.columns);
        let rows = Shared::new(props.rows);
        let paginator = Paginator::new(props.pagination).with_page_sizes(props.page_sizes);
        let facade = Facade::new();
        if props.is_form {
            facade.mount_form(Arc::new(TableFormHandle::new(
                columns.clone(),
                rows.clone(),
            )));
        }
        Self {
            columns,
            rows,
            is_form: props.is_form,
            resolver,
            paginator,
            facade,
        }
    }

    /// The pagination adapter, for host event wiring and state sync.
    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    /// The data model handed to the backing widget: the raw row array in
    /// display mode, the single-key `tableData` wrapper in form mode.
    pub fn model(&self) -> Value {
        let rows: Vec<Value> = self
            .rows
            .with(|rows| rows.iter().map(RowRecord::to_value).collect());
        if self.is_form {
            let mut wrapper = serde_json::Map::new();
            wrapper.insert(TABLE_MODEL_KEY.to_string(), Value::Array(rows));
            Value::Object(wrapper)
        } else {
            Value::Array(rows)
        }
    }

    /// Visible leaf columns in display order; groups contribute their
    /// children, never a cell of their own.
    fn leaf_columns(columns: &[ColumnConfig]) -> Vec<ColumnConfig> {
        let mut leaves = Vec::new();
        for column in visible_columns(columns) {
            if column.is_group() {
                leaves.extend(Self::leaf_columns(&column.children));
            } else {
                leaves.push(column.clone());
            }
        }
        leaves
    }

    /// Header node for one column: groups nest their children's headers
    /// below the group label.
    fn header_node(&self, column: &ColumnConfig) -> Node {
        if column.is_group() {
            let children = visible_columns(&column.children)
                .into_iter()
                .map(|child| self.header_node(child))
                .collect();
            Node::column(vec![Node::text(column.header_text()), Node::row(children)])
        } else {
            self.resolver
                .render_header(self.is_form, column, column.is_required())
        }
    }

    fn body_row(&self, row: &RowRecord, row_index: usize, leaves: &[ColumnConfig]) -> Node {
        let index_base = self.paginator.index_offset();
        let cells = leaves
            .iter()
            .map(|leaf| {
                let ctx = RenderContext::standard(row.clone(), row_index, leaf.clone());
                self.resolver.render_cell(self.is_form, &ctx, index_base)
            })
            .collect();
        Node::row(cells)
    }
}

impl TableBackend for StandardTable {
    fn kind(&self) -> BackendKind {
        BackendKind::Standard
    }

    fn render(&self) -> Result<Node, RenderError> {
        let columns = self.columns.get();
        let visible: Vec<ColumnConfig> = visible_columns(&columns).into_iter().cloned().collect();
        let leaves = Self::leaf_columns(&columns);

        let header = Node::row(visible.iter().map(|c| self.header_node(c)).collect());
        let rows = self.rows.get();
        let mut children = vec![header];
        children.extend(
            rows.iter()
                .enumerate()
                .map(|(i, row)| self.body_row(row, i, &leaves)),
        );

        // The pagination control never shows in form mode.
        if self.paginator.state().total > 0 && !self.is_form {
            children.push(self.paginator.render());
        }

        Ok(Node::column(children))
    }

    fn facade(&self) -> Facade {
        self.facade.clone()
    }

    fn set_columns(&self, columns: Vec<ColumnConfig>) {
        self.columns.set(columns);
    }

    fn set_rows(&self, rows: Vec<RowRecord>) {
        self.rows.set(rows);
    }
}

impl std::fmt::Debug for StandardTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StandardTable")
            .field("is_form", &self.is_form)
            .field("paginator", &self.paginator)
            .finish()
    }
}

/// Engine-side form handle over the table's rows.
///
/// Validation checks `required` rules against cell values; everything beyond
/// the required flag is the backing widget's job, so richer rule kinds pass
/// validation here. `reset_fields` restores the row snapshots taken at
/// construction.
pub struct TableFormHandle {
    columns: Shared<Vec<ColumnConfig>>,
    rows: Shared<Vec<RowRecord>>,
    initial: Vec<Value>,
}

impl TableFormHandle {
    pub fn new(columns: Shared<Vec<ColumnConfig>>, rows: Shared<Vec<RowRecord>>) -> Self {
        let initial = rows.with(|rows| rows.iter().map(RowRecord::to_value).collect());
        Self {
            columns,
            rows,
            initial,
        }
    }

    /// Editable leaves: visible, non-reserved columns.
    fn editable_leaves(&self) -> Vec<ColumnConfig> {
        self.columns.with(|columns| {
            StandardTable::leaf_columns(columns)
                .into_iter()
                .filter(|c| !c.render_type.as_ref().is_some_and(RenderType::is_reserved))
                .collect()
        })
    }

    fn is_blank(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    /// One cell passes when it has no required rule or a non-blank value.
    fn cell_valid(&self, row: &RowRecord, column: &ColumnConfig) -> bool {
        if !column.is_required() {
            return true;
        }
        let value = row.get(&column.prop).unwrap_or(Value::Null);
        !Self::is_blank(&value)
    }

    fn check_all(&self) -> bool {
        let leaves = self.editable_leaves();
        self.rows.with(|rows| {
            rows.iter()
                .all(|row| leaves.iter().all(|leaf| self.cell_valid(row, leaf)))
        })
    }

    fn check_paths(&self, paths: &[FieldPath]) -> bool {
        let leaves = self.editable_leaves();
        self.rows.with(|rows| {
            paths.iter().all(|path| {
                let Some(column) = leaves.iter().find(|c| c.prop == path.prop()) else {
                    return true;
                };
                match path {
                    FieldPath::Cell { index, .. } => rows
                        .get(*index)
                        .is_none_or(|row| self.cell_valid(row, column)),
                    FieldPath::Field(_) => {
                        rows.iter().all(|row| self.cell_valid(row, column))
                    }
                }
            })
        })
    }
}

impl FormHandle for TableFormHandle {
    fn validate(&self, on_done: ValidateCallback) -> bool {
        let ok = self.check_all();
        on_done(ok);
        ok
    }

    fn validate_field(&self, paths: &[FieldPath], on_done: ValidateCallback) -> bool {
        let ok = self.check_paths(paths);
        on_done(ok);
        ok
    }

    fn reset_fields(&self) {
        self.rows.with(|rows| {
            for (row, snapshot) in rows.iter().zip(&self.initial) {
                let Value::Object(fields) = snapshot else {
                    continue;
                };
                for key in row.keys() {
                    if !fields.contains_key(&key) {
                        row.remove(&key);
                    }
                }
                for (key, value) in fields {
                    row.set(key.clone(), value.clone());
                }
            }
        });
    }

    fn scroll_to_field(&self, path: &FieldPath) {
        // Scrolling is the backing widget's concern.
        log::trace!("scroll_to_field({path}) without a widget handle");
    }

    fn clear_validate(&self, _paths: &[FieldPath]) {
        // No validation messages are kept engine-side.
    }

    fn fields(&self) -> Vec<FieldPath> {
        let leaves = self.editable_leaves();
        self.rows.with(|rows| {
            (0..rows.len())
                .flat_map(|index| {
                    leaves
                        .iter()
                        .map(move |leaf| FieldPath::cell(index, leaf.prop.clone()))
                })
                .collect()
        })
    }

    fn get_field(&self, path: &FieldPath) -> Option<Value> {
        match path {
            FieldPath::Cell { index, prop } => self
                .rows
                .with(|rows| rows.get(*index).and_then(|row| row.get(prop))),
            FieldPath::Field(_) => None,
        }
    }
}
