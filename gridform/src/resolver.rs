//! Component resolver.
//!
//! The dispatch logic that turns one configuration entry plus a current value
//! into a view node: reserved cell kinds (index, selection, expand, slot),
//! display-mode formatting, or an edit-mode dynamic component with a two-way
//! value binding, optionally wrapped in a field-validation container.
//!
//! # Fault tolerance
//!
//! Two recovery paths, both degrading to the raw cell value:
//! 1. a display-mode formatter that fails (or panics): the row keeps its
//!    unformatted value, it is never blanked;
//! 2. any failure while constructing the cell node as a whole (unknown
//!    component name, malformed props, a panicking slot). The catch is
//!    deliberately broad; narrowing it would change observable fault
//!    tolerance.
//! Everything outside these two paths propagates to the host as raised.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;

use crate::config::{ColumnConfig, RenderType, SlotFn};
use crate::context::{BackendKind, RenderContext};
use crate::error::{RenderError, extract_panic_message};
use crate::node::{Change, FieldPath, Node, TextStyle};
use crate::record::RowRecord;
use crate::registry::{ComponentBinding, ComponentRegistry};
use crate::selection;

/// Update callback: the caller uses it to mutate the backing record or form
/// state when a bound component reports a new value.
#[derive(Clone)]
pub struct UpdateFn(Arc<dyn Fn(&ColumnConfig, Value) + Send + Sync>);

impl UpdateFn {
    pub fn new(f: impl Fn(&ColumnConfig, Value) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// The usual table update: write the new value under the column's prop,
    /// in place, on the shared row.
    pub fn for_row(row: &RowRecord) -> Self {
        let row = row.clone();
        Self::new(move |config, value| row.set(config.prop.clone(), value))
    }

    pub fn call(&self, config: &ColumnConfig, value: Value) {
        (self.0)(config, value)
    }
}

impl fmt::Debug for UpdateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UpdateFn(..)")
    }
}

/// Caller-registered named render callbacks, keyed by column prop.
///
/// Consulted for `slot`/`expand` columns that declare no inline slots.
#[derive(Clone, Default)]
pub struct SlotRegistry {
    slots: BTreeMap<String, SlotFn>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        slot: impl Fn(&RenderContext) -> Node + Send + Sync + 'static,
    ) {
        self.slots.insert(name.into(), Arc::new(slot));
    }

    pub fn get(&self, name: &str) -> Option<&SlotFn> {
        self.slots.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for SlotRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotRegistry")
            .field("slots", &self.slots.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The dispatch engine shared by both table backends and the bare form.
#[derive(Clone, Debug)]
pub struct Resolver {
    registry: Arc<ComponentRegistry>,
    slots: SlotRegistry,
}

impl Resolver {
    pub fn new(registry: Arc<ComponentRegistry>) -> Self {
        Self {
            registry,
            slots: SlotRegistry::new(),
        }
    }

    pub fn with_slots(mut self, slots: SlotRegistry) -> Self {
        self.slots = slots;
        self
    }

    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// Resolve one configuration entry plus a current value into a node.
    ///
    /// Display mode (`form == false`) applies `comProps.formatter` when
    /// present, otherwise renders the raw value. Edit mode resolves the named
    /// dynamic component, binds its value under the configured model name and
    /// wires the change notification to `update`. Any failure degrades to the
    /// raw value.
    pub fn resolve(
        &self,
        form: bool,
        config: &ColumnConfig,
        value: Value,
        update: &UpdateFn,
        ctx: Option<&RenderContext>,
    ) -> Node {
        let raw = value.clone();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.try_resolve(form, config, value, update, ctx)
        }));
        match outcome {
            Ok(Ok(node)) => node,
            Ok(Err(err)) => {
                log::warn!(
                    "resolving column '{}' failed: {err}; rendering raw value",
                    config.prop
                );
                Node::text_of(&raw)
            }
            Err(payload) => {
                log::warn!(
                    "resolving column '{}' panicked: {}; rendering raw value",
                    config.prop,
                    extract_panic_message(&payload)
                );
                Node::text_of(&raw)
            }
        }
    }

    /// [`resolve`](Self::resolve) without the degrade wrapper. Display-mode
    /// formatter failures still recover internally (that path never errors).
    pub fn try_resolve(
        &self,
        form: bool,
        config: &ColumnConfig,
        value: Value,
        update: &UpdateFn,
        ctx: Option<&RenderContext>,
    ) -> Result<Node, RenderError> {
        if form {
            self.edit_node(config, value, update, ctx)
        } else {
            Ok(self.display_node(config, value, ctx))
        }
    }

    /// Full table-cell dispatch used by both backends.
    ///
    /// `index_base` is the page offset the index cell adds: the standard
    /// backend passes `(page_num - 1) * page_size`, the virtualized backend
    /// passes 0 (its index is page-independent; a documented asymmetry of the
    /// original design, reproduced here unchanged).
    pub fn render_cell(&self, form: bool, ctx: &RenderContext, index_base: usize) -> Node {
        let raw = ctx.value();
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| self.build_cell(form, ctx, index_base)));
        match outcome {
            Ok(Ok(node)) => node,
            Ok(Err(err)) => {
                log::warn!(
                    "cell for column '{}' failed: {err}; rendering raw value",
                    ctx.column.prop
                );
                Node::text_of(&raw)
            }
            Err(payload) => {
                log::warn!(
                    "cell for column '{}' panicked: {}; rendering raw value",
                    ctx.column.prop,
                    extract_panic_message(&payload)
                );
                Node::text_of(&raw)
            }
        }
    }

    fn build_cell(
        &self,
        form: bool,
        ctx: &RenderContext,
        index_base: usize,
    ) -> Result<Node, RenderError> {
        let config = &ctx.column;
        match &config.render_type {
            Some(RenderType::Index) => Ok(Node::text(
                (index_base + ctx.row_index + 1).to_string(),
            )),
            Some(RenderType::Selection) => Ok(match ctx.backend {
                // The standard widget runs its own native selection column.
                BackendKind::Standard => Node::Empty,
                BackendKind::Virtualized => selection::row_checkbox(&ctx.row),
            }),
            Some(RenderType::Expand) | Some(RenderType::Slot) => Ok(self.render_slots(config, ctx)),
            _ => {
                let update = UpdateFn::for_row(&ctx.row);
                let node = self.try_resolve(form, config, ctx.value(), &update, Some(ctx))?;
                if form {
                    let path = FieldPath::cell(ctx.row_index, config.prop.clone());
                    let rules = config
                        .item_props
                        .as_ref()
                        .map(|p| p.rules.clone())
                        .unwrap_or_default();
                    Ok(Node::field(path, rules, node))
                } else {
                    Ok(node)
                }
            }
        }
    }

    /// Header content for one column: the label, with the advisory `*`
    /// marker prepended in form mode when any rule is required.
    pub fn render_header(&self, form: bool, config: &ColumnConfig, required: bool) -> Node {
        if form && required {
            Node::row(vec![
                Node::text_styled("*", TextStyle::red()),
                Node::text(config.header_text()),
            ])
        } else {
            Node::text(config.header_text())
        }
    }

    /// Slot resolution: inline `comProps.slots` callbacks win; otherwise
    /// `slot`/`expand` columns fall back to a caller-registered callback
    /// keyed by the column's prop; nothing renders when neither exists.
    pub fn render_slots(&self, config: &ColumnConfig, ctx: &RenderContext) -> Node {
        if !config.com_props.slots.is_empty() {
            let children = config
                .com_props
                .slots
                .values()
                .map(|slot| slot(ctx))
                .collect();
            return Node::fragment(children);
        }
        if matches!(
            config.render_type,
            Some(RenderType::Slot) | Some(RenderType::Expand)
        ) && let Some(slot) = self.slots.get(&config.prop)
        {
            return slot(ctx);
        }
        Node::Empty
    }

    /// Display mode: formatter result when one is declared, raw value
    /// otherwise. A failing or panicking formatter yields the raw value.
    fn display_node(&self, config: &ColumnConfig, value: Value, ctx: Option<&RenderContext>) -> Node {
        let (Some(formatter), Some(ctx)) = (&config.com_props.formatter, ctx) else {
            return Node::text_of(&value);
        };
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| formatter(config, ctx)));
        match outcome {
            Ok(Ok(node)) => node,
            Ok(Err(err)) => {
                log::warn!(
                    "formatter for column '{}' failed: {err}; rendering raw value",
                    config.prop
                );
                Node::text_of(&value)
            }
            Err(payload) => {
                log::warn!(
                    "formatter for column '{}' panicked: {}; rendering raw value",
                    config.prop,
                    extract_panic_message(&payload)
                );
                Node::text_of(&value)
            }
        }
    }

    /// Edit mode: resolve the named dynamic component, bind the value and
    /// wire the change notification through `update`.
    fn edit_node(
        &self,
        config: &ColumnConfig,
        value: Value,
        update: &UpdateFn,
        ctx: Option<&RenderContext>,
    ) -> Result<Node, RenderError> {
        let name = match &config.render_type {
            Some(RenderType::Component(name)) => name.as_str(),
            _ => {
                return Err(RenderError::NotAComponent {
                    prop: config.prop.clone(),
                });
            }
        };
        let component = self.registry.resolve(name)?;
        let on_change = {
            let update = update.clone();
            let config = config.clone();
            Change::new(move |new_value| update.call(&config, new_value))
        };
        let binding = ComponentBinding {
            value,
            model_name: config.com_props.model_name().to_string(),
            on_change,
        };
        component.render(binding, config, ctx)
    }
}
