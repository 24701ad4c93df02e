//! Bare form renderer.
//!
//! Renders a visible-filtered field list over one shared form record on a
//! 24-unit grid: each field takes its `col_props.span` (default the form's
//! base span) and fields wrap into a new row when the running span would
//! overflow the grid. Field editors resolve through the same resolver as
//! table cells; edits write through to the shared record.

use std::sync::Arc;

use serde_json::Value;

use crate::config::{ColumnConfig, RenderType, visible_columns};
use crate::context::RenderContext;
use crate::facade::{Facade, FormHandle, ValidateCallback};
use crate::node::{FieldPath, Node};
use crate::record::RowRecord;
use crate::resolver::{Resolver, UpdateFn};
use crate::state::Shared;

/// Grid units per row.
const GRID_SPAN: u16 = 24;

/// The form renderer.
pub struct FormRender {
    fields: Shared<Vec<ColumnConfig>>,
    record: RowRecord,
    /// Span a field takes when it declares none.
    base_col_span: u16,
    resolver: Resolver,
    facade: Facade,
}

impl FormRender {
    pub fn new(fields: Vec<ColumnConfig>, record: RowRecord, resolver: Resolver) -> Self {
        let fields = Shared::new(fields);
        let facade = Facade::new();
        facade.mount_form(Arc::new(RecordFormHandle::new(
            fields.clone(),
            record.clone(),
        )));
        Self {
            fields,
            record,
            base_col_span: GRID_SPAN,
            resolver,
            facade,
        }
    }

    pub fn with_base_col_span(mut self, span: u16) -> Self {
        self.base_col_span = span;
        self
    }

    pub fn facade(&self) -> Facade {
        self.facade.clone()
    }

    /// The shared form record.
    pub fn record(&self) -> &RowRecord {
        &self.record
    }

    pub fn set_fields(&self, fields: Vec<ColumnConfig>) {
        self.fields.set(fields);
    }

    /// Produce the current view tree: rows of span-packed field items.
    pub fn render(&self) -> Node {
        let fields = self.fields.get();
        let visible: Vec<&ColumnConfig> = visible_columns(&fields);

        let mut rows: Vec<Node> = Vec::new();
        let mut current: Vec<Node> = Vec::new();
        let mut used: u16 = 0;
        for field in visible {
            let span = field
                .col_props
                .as_ref()
                .and_then(|p| p.span)
                .unwrap_or(self.base_col_span)
                .min(GRID_SPAN);
            if used + span > GRID_SPAN && !current.is_empty() {
                rows.push(Node::row(std::mem::take(&mut current)));
                used = 0;
            }
            current.push(self.field_item(field));
            used += span;
        }
        if !current.is_empty() {
            rows.push(Node::row(current));
        }
        Node::column(rows)
    }

    /// One field: decorated label plus the validation-wrapped editor.
    fn field_item(&self, field: &ColumnConfig) -> Node {
        let label = self
            .resolver
            .render_header(true, field, field.is_required());

        let ctx = RenderContext::standard(self.record.clone(), 0, field.clone());
        let editor = match field.render_type {
            Some(RenderType::Slot) | Some(RenderType::Expand) => {
                self.resolver.render_slots(field, &ctx)
            }
            _ => {
                let value = self.record.get(&field.prop).unwrap_or(Value::Null);
                let update = UpdateFn::for_row(&self.record);
                self.resolver
                    .resolve(true, field, value, &update, Some(&ctx))
            }
        };

        let rules = field
            .item_props
            .as_ref()
            .map(|p| p.rules.clone())
            .unwrap_or_default();
        Node::row(vec![
            label,
            Node::field(FieldPath::field(field.prop.clone()), rules, editor),
        ])
    }
}

impl std::fmt::Debug for FormRender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormRender")
            .field("base_col_span", &self.base_col_span)
            .field("record", &self.record)
            .finish()
    }
}

/// Engine-side form handle over a single record.
///
/// Same scope as the table's handle: `required` rules are checked against
/// field values, richer rule kinds are the backing widget's job.
pub struct RecordFormHandle {
    fields: Shared<Vec<ColumnConfig>>,
    record: RowRecord,
    initial: Value,
}

impl RecordFormHandle {
    pub fn new(fields: Shared<Vec<ColumnConfig>>, record: RowRecord) -> Self {
        let initial = record.to_value();
        Self {
            fields,
            record,
            initial,
        }
    }

    fn editable_fields(&self) -> Vec<ColumnConfig> {
        self.fields.with(|fields| {
            visible_columns(fields)
                .into_iter()
                .filter(|f| !f.render_type.as_ref().is_some_and(RenderType::is_reserved))
                .cloned()
                .collect()
        })
    }

    fn field_valid(&self, field: &ColumnConfig) -> bool {
        if !field.is_required() {
            return true;
        }
        match self.record.get(&field.prop) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(_) => true,
        }
    }
}

impl FormHandle for RecordFormHandle {
    fn validate(&self, on_done: ValidateCallback) -> bool {
        let ok = self
            .editable_fields()
            .iter()
            .all(|field| self.field_valid(field));
        on_done(ok);
        ok
    }

    fn validate_field(&self, paths: &[FieldPath], on_done: ValidateCallback) -> bool {
        let fields = self.editable_fields();
        let ok = paths.iter().all(|path| {
            fields
                .iter()
                .find(|f| f.prop == path.prop())
                .is_none_or(|field| self.field_valid(field))
        });
        on_done(ok);
        ok
    }

    fn reset_fields(&self) {
        let Value::Object(fields) = &self.initial else {
            return;
        };
        for key in self.record.keys() {
            if !fields.contains_key(&key) {
                self.record.remove(&key);
            }
        }
        for (key, value) in fields {
            self.record.set(key.clone(), value.clone());
        }
    }

    fn scroll_to_field(&self, path: &FieldPath) {
        log::trace!("scroll_to_field({path}) without a widget handle");
    }

    fn clear_validate(&self, _paths: &[FieldPath]) {
        // No validation messages are kept engine-side.
    }

    fn fields(&self) -> Vec<FieldPath> {
        self.editable_fields()
            .into_iter()
            .map(|field| FieldPath::field(field.prop))
            .collect()
    }

    fn get_field(&self, path: &FieldPath) -> Option<Value> {
        self.record.get(path.prop())
    }
}
