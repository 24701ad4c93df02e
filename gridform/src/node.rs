//! Node types for the view tree.
//!
//! The engine's output is a tree of these nodes; the black-box widget
//! primitives consume it. Interactive nodes store their callbacks directly as
//! `Arc` closures so the host can drive edits and toggles imperatively in
//! tests and adapters.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ValidationRule;

/// Key under which the standard backend wraps its rows for form modeling.
pub const TABLE_MODEL_KEY: &str = "tableData";

/// Dotted address used for per-field validation targeting.
///
/// `Cell` paths render as `tableData.<index>.<prop>`, bare `Field` paths as
/// `<prop>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldPath {
    /// A bare form field.
    Field(String),
    /// A table cell inside the `tableData` wrapper record.
    Cell { index: usize, prop: String },
}

impl FieldPath {
    pub fn field(prop: impl Into<String>) -> Self {
        Self::Field(prop.into())
    }

    pub fn cell(index: usize, prop: impl Into<String>) -> Self {
        Self::Cell {
            index,
            prop: prop.into(),
        }
    }

    /// The record key this path ultimately addresses.
    pub fn prop(&self) -> &str {
        match self {
            Self::Field(prop) => prop,
            Self::Cell { prop, .. } => prop,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(prop) => write!(f, "{prop}"),
            Self::Cell { index, prop } => write!(f, "{TABLE_MODEL_KEY}.{index}.{prop}"),
        }
    }
}

/// Value-change callback carried by an editable node.
#[derive(Clone)]
pub struct Change(Arc<dyn Fn(Value) + Send + Sync>);

impl Change {
    pub fn new(f: impl Fn(Value) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, value: Value) {
        (self.0)(value)
    }
}

impl fmt::Debug for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Change(..)")
    }
}

/// Toggle callback carried by a checkbox node.
#[derive(Clone)]
pub struct Toggle(Arc<dyn Fn(bool) + Send + Sync>);

impl Toggle {
    pub fn new(f: impl Fn(bool) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, value: bool) {
        (self.0)(value)
    }
}

impl fmt::Debug for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Toggle(..)")
    }
}

/// Minimal text styling, enough for header decoration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStyle {
    pub bold: bool,
    pub color: Option<String>,
}

impl TextStyle {
    pub fn red() -> Self {
        Self {
            bold: false,
            color: Some("red".to_string()),
        }
    }
}

/// A node in the view tree.
#[derive(Debug, Clone, Default)]
pub enum Node {
    /// Renders nothing.
    #[default]
    Empty,

    /// Text content.
    Text { content: String, style: TextStyle },

    /// Horizontal container.
    Row { children: Vec<Node> },

    /// Vertical container.
    Column { children: Vec<Node> },

    /// Sibling nodes without a container of their own (slot results).
    Fragment(Vec<Node>),

    /// A stateful checkbox cell.
    Checkbox {
        checked: bool,
        indeterminate: bool,
        on_toggle: Option<Toggle>,
    },

    /// A bound text input produced by the built-in `input` component.
    Input {
        value: Value,
        /// Value-binding key the component was bound under.
        model_name: String,
        placeholder: String,
        on_change: Option<Change>,
    },

    /// Field-validation container addressed by a binding path.
    Field {
        path: FieldPath,
        rules: Vec<ValidationRule>,
        child: Box<Node>,
    },
}

impl Node {
    pub const fn empty() -> Self {
        Self::Empty
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
            style: TextStyle::default(),
        }
    }

    pub fn text_styled(content: impl Into<String>, style: TextStyle) -> Self {
        Self::Text {
            content: content.into(),
            style,
        }
    }

    /// Render a raw cell value as text: strings unquoted, null empty,
    /// everything else in JSON notation.
    pub fn text_of(value: &Value) -> Self {
        match value {
            Value::Null => Self::text(""),
            Value::String(s) => Self::text(s.clone()),
            other => Self::text(other.to_string()),
        }
    }

    pub fn row(children: Vec<Node>) -> Self {
        Self::Row { children }
    }

    pub fn column(children: Vec<Node>) -> Self {
        Self::Column { children }
    }

    pub fn fragment(children: Vec<Node>) -> Self {
        Self::Fragment(children)
    }

    pub fn field(path: FieldPath, rules: Vec<ValidationRule>, child: Node) -> Self {
        Self::Field {
            path,
            rules,
            child: Box::new(child),
        }
    }

    /// Concatenated text content of this subtree. Test and adapter helper.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Text { content, .. } => content.clone(),
            Self::Row { children } | Self::Column { children } | Self::Fragment(children) => {
                children.iter().map(Node::plain_text).collect()
            }
            Self::Field { child, .. } => child.plain_text(),
            Self::Input { value, .. } => match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            },
            Self::Empty | Self::Checkbox { .. } => String::new(),
        }
    }

    /// Whether this subtree renders nothing at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Fragment(children) => children.iter().all(Node::is_empty),
            _ => false,
        }
    }
}
