//! Column and field configuration model.
//!
//! A [`ColumnConfig`] describes one displayable/editable data slot. The same
//! type doubles as the form-field configuration consumed by
//! [`FormRender`](crate::form::FormRender), exactly as the table and form
//! share one schema shape.
//!
//! # Prop uniqueness
//!
//! `prop` must be unique within a sibling column list: binding paths
//! (`tableData.<index>.<prop>`) resolve by prop, so duplicates produce
//! undefined binding behavior. The engine does not repair or reject
//! duplicates; hosts that want the check can call
//! [`validate_unique_props`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::RenderContext;
use crate::error::RenderError;
use crate::node::Node;

/// Default value-binding key for dynamic components in edit mode.
pub const DEFAULT_MODEL_NAME: &str = "modelValue";

/// What a configuration entry renders as.
///
/// The reserved kinds are a closed set; anything else names a dynamic
/// component looked up in the [`ComponentRegistry`](crate::registry::ComponentRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderType {
    /// Sequential row index cell.
    Index,
    /// Selection checkbox cell.
    Selection,
    /// Expanded-row content, resolved through slots.
    Expand,
    /// Named slot content.
    Slot,
    /// A dynamic component registered under this name.
    Component(String),
}

impl RenderType {
    /// Parse a render-type tag. Reserved names map to their built-in kind,
    /// everything else is a component name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "index" => Self::Index,
            "selection" => Self::Selection,
            "expand" => Self::Expand,
            "slot" => Self::Slot,
            other => Self::Component(other.to_string()),
        }
    }

    /// Whether this is one of the reserved built-in kinds.
    pub fn is_reserved(&self) -> bool {
        !matches!(self, Self::Component(_))
    }

    /// The dynamic component name, if any.
    pub fn component_name(&self) -> Option<&str> {
        match self {
            Self::Component(name) => Some(name),
            _ => None,
        }
    }
}

/// One validation rule forwarded to the field-validation container.
///
/// Only `required` is interpreted by the engine (for the advisory header
/// marker); everything else rides along verbatim for the host's validation
/// primitive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ValidationRule {
    /// A bare `required` rule with a message.
    pub fn required(message: impl Into<String>) -> Self {
        Self {
            required: true,
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Edit-wrapper configuration: validation rules plus free-form props
/// forwarded to the field container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemProps {
    #[serde(default)]
    pub rules: Vec<ValidationRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemProps {
    /// Whether any rule carries the `required` flag.
    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|rule| rule.required)
    }
}

/// Grid layout hints for the bare form renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<u16>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Display-mode formatter: renders a value for presentation.
///
/// A formatter that fails (or panics) never aborts the row; the resolver
/// substitutes the raw cell value.
pub type FormatterFn =
    Arc<dyn Fn(&ColumnConfig, &RenderContext) -> Result<Node, RenderError> + Send + Sync>;

/// Inline named sub-render callback ("slot").
pub type SlotFn = Arc<dyn Fn(&RenderContext) -> Node + Send + Sync>;

/// Event handler forwarded verbatim to a resolved component.
pub type EventFn = Arc<dyn Fn(Value) + Send + Sync>;

/// Properties forwarded verbatim to the resolved dynamic component.
#[derive(Clone, Default)]
pub struct ComProps {
    /// Value-binding key used in edit mode; defaults to
    /// [`DEFAULT_MODEL_NAME`] when absent.
    pub model_name: Option<String>,
    /// Display-mode formatter.
    pub formatter: Option<FormatterFn>,
    /// Inline named sub-render callbacks.
    pub slots: BTreeMap<String, SlotFn>,
    /// Open prop bag passed through to the component.
    pub extra: Map<String, Value>,
}

impl ComProps {
    /// The effective value-binding key.
    pub fn model_name(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_MODEL_NAME)
    }
}

impl fmt::Debug for ComProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComProps")
            .field("model_name", &self.model_name)
            .field("formatter", &self.formatter.as_ref().map(|_| ".."))
            .field("slots", &self.slots.keys().collect::<Vec<_>>())
            .field("extra", &self.extra)
            .finish()
    }
}

/// Event-name to handler mapping, forwarded verbatim.
#[derive(Clone, Default)]
pub struct ComEvents {
    handlers: BTreeMap<String, EventFn>,
}

impl ComEvents {
    pub fn insert(&mut self, name: impl Into<String>, handler: EventFn) {
        self.handlers.insert(name.into(), handler);
    }

    pub fn get(&self, name: &str) -> Option<&EventFn> {
        self.handlers.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for ComEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComEvents")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Configuration for one column (or form field).
#[derive(Debug, Clone, Default)]
pub struct ColumnConfig {
    /// Key into the row/form record. Required, unique within siblings.
    pub prop: String,
    /// Display header text (standard backend's field name).
    pub label: Option<String>,
    /// Display header text (virtualized backend's field name). Kept in sync
    /// with `label` by the virtualized column translation.
    pub title: Option<String>,
    /// Record key alias used by the virtualized backend; defaulted from
    /// `prop` by the translation.
    pub data_key: Option<String>,
    /// How to render this entry; absent means "render the raw value".
    pub render_type: Option<RenderType>,
    /// Validation rules and other edit-wrapper configuration.
    pub item_props: Option<ItemProps>,
    /// Props forwarded verbatim to the resolved component.
    pub com_props: ComProps,
    /// Events forwarded verbatim to the resolved component.
    pub com_events: ComEvents,
    /// Inclusion in the rendered column set; absent means visible.
    pub visible: Option<bool>,
    /// Nested/grouped columns. Standard backend only.
    pub children: Vec<ColumnConfig>,
    /// Grid layout hints for the bare form renderer.
    pub col_props: Option<ColProps>,
}

impl ColumnConfig {
    /// Create a configuration entry for the given record key.
    pub fn new(prop: impl Into<String>) -> Self {
        Self {
            prop: prop.into(),
            ..Self::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn data_key(mut self, data_key: impl Into<String>) -> Self {
        self.data_key = Some(data_key.into());
        self
    }

    pub fn render_type(mut self, render_type: RenderType) -> Self {
        self.render_type = Some(render_type);
        self
    }

    /// Render through the dynamic component registered under `name`.
    pub fn component(mut self, name: impl Into<String>) -> Self {
        self.render_type = Some(RenderType::Component(name.into()));
        self
    }

    pub fn item_props(mut self, item_props: ItemProps) -> Self {
        self.item_props = Some(item_props);
        self
    }

    pub fn rules(mut self, rules: Vec<ValidationRule>) -> Self {
        self.item_props.get_or_insert_with(ItemProps::default).rules = rules;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn child(mut self, child: ColumnConfig) -> Self {
        self.children.push(child);
        self
    }

    pub fn formatter(mut self, formatter: FormatterFn) -> Self {
        self.com_props.formatter = Some(formatter);
        self
    }

    pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
        self.com_props.model_name = Some(model_name.into());
        self
    }

    pub fn slot(mut self, name: impl Into<String>, slot: SlotFn) -> Self {
        self.com_props.slots.insert(name.into(), slot);
        self
    }

    pub fn event(mut self, name: impl Into<String>, handler: EventFn) -> Self {
        self.com_events.insert(name, handler);
        self
    }

    /// Add one entry to the open prop bag.
    pub fn prop_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.com_props.extra.insert(key.into(), value.into());
        self
    }

    pub fn span(mut self, span: u16) -> Self {
        self.col_props.get_or_insert_with(ColProps::default).span = Some(span);
        self
    }

    /// Included in the rendered column set? Absent `visible` means yes.
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    /// Advisory required flag: any rule with `required` set.
    pub fn is_required(&self) -> bool {
        self.item_props
            .as_ref()
            .map(ItemProps::is_required)
            .unwrap_or(false)
    }

    /// Header text: `label` first, `title` as the other backend's alias.
    pub fn header_text(&self) -> &str {
        self.label
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("")
    }

    /// Whether this is a group node (nested columns).
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Filter a column list down to the visible set, preserving order.
pub fn visible_columns(columns: &[ColumnConfig]) -> Vec<&ColumnConfig> {
    columns.iter().filter(|c| c.is_visible()).collect()
}

/// Recompute the advisory required-field map for a column list.
///
/// Called on every configuration change; the result only drives header
/// decoration, never enforcement.
pub fn required_map(columns: &[ColumnConfig]) -> BTreeMap<String, bool> {
    visible_columns(columns)
        .into_iter()
        .map(|c| (c.prop.clone(), c.is_required()))
        .collect()
}

/// Report duplicate `prop` keys within a sibling list.
///
/// Returns the offending keys, each listed once. The engine never calls this
/// implicitly; duplicates are documented undefined binding behavior.
pub fn validate_unique_props(columns: &[ColumnConfig]) -> Result<(), Vec<String>> {
    let mut seen = BTreeMap::new();
    for column in columns {
        *seen.entry(column.prop.clone()).or_insert(0usize) += 1;
    }
    let duplicates: Vec<String> = seen
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(prop, _)| prop)
        .collect();
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(duplicates)
    }
}
