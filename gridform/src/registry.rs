//! Dynamic component registry.
//!
//! "Resolve a component by string name" is an explicit registry populated by
//! the host at startup, keeping the set of renderable kinds closed and
//! testable. Unknown names are an error from the registry itself; the
//! resolver's degrade path turns that error into the raw cell value.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::config::ColumnConfig;
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::node::{Change, Node, Toggle};

/// Value binding handed to a dynamic component in edit mode.
pub struct ComponentBinding {
    /// Current cell/field value.
    pub value: Value,
    /// Key the value is bound under (`comProps.modelName`, default
    /// `modelValue`).
    pub model_name: String,
    /// Value-change notification; the caller uses it to mutate the backing
    /// record.
    pub on_change: Change,
}

/// A renderable dynamic component.
///
/// Implementations receive the binding, the full column configuration (for
/// the verbatim `com_props`/`com_events` bags and declared slots) and the
/// render context when one exists.
pub trait DynamicComponent: Send + Sync {
    fn render(
        &self,
        binding: ComponentBinding,
        config: &ColumnConfig,
        ctx: Option<&RenderContext>,
    ) -> Result<Node, RenderError>;
}

impl std::fmt::Debug for dyn DynamicComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DynamicComponent")
    }
}

impl<F> DynamicComponent for F
where
    F: Fn(ComponentBinding, &ColumnConfig, Option<&RenderContext>) -> Result<Node, RenderError>
        + Send
        + Sync,
{
    fn render(
        &self,
        binding: ComponentBinding,
        config: &ColumnConfig,
        ctx: Option<&RenderContext>,
    ) -> Result<Node, RenderError> {
        self(binding, config, ctx)
    }
}

/// Name-to-factory mapping for dynamic components.
#[derive(Default)]
pub struct ComponentRegistry {
    components: HashMap<String, Arc<dyn DynamicComponent>>,
}

impl ComponentRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in `input` and `checkbox`
    /// components.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("input", builtin_input);
        registry.register("checkbox", builtin_checkbox);
        registry
    }

    /// Register a component under a name, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, component: impl DynamicComponent + 'static) {
        let name = name.into();
        log::debug!("registering dynamic component '{name}'");
        self.components.insert(name, Arc::new(component));
    }

    /// Register an already-shared component.
    pub fn register_arc(&mut self, name: impl Into<String>, component: Arc<dyn DynamicComponent>) {
        self.components.insert(name.into(), component);
    }

    /// Look up a component by name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn DynamicComponent>, RenderError> {
        self.components
            .get(name)
            .cloned()
            .ok_or_else(|| RenderError::UnknownComponent(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.components.keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("components", &self.names())
            .finish()
    }
}

/// Built-in text input: binds the value and wires the change notification.
fn builtin_input(
    binding: ComponentBinding,
    config: &ColumnConfig,
    _ctx: Option<&RenderContext>,
) -> Result<Node, RenderError> {
    let placeholder = config
        .com_props
        .extra
        .get("placeholder")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Ok(Node::Input {
        value: binding.value,
        model_name: binding.model_name,
        placeholder,
        on_change: Some(binding.on_change),
    })
}

/// Built-in checkbox: truthy value becomes checked, toggles notify as booleans.
fn builtin_checkbox(
    binding: ComponentBinding,
    _config: &ColumnConfig,
    _ctx: Option<&RenderContext>,
) -> Result<Node, RenderError> {
    let checked = matches!(binding.value, Value::Bool(true));
    let on_change = binding.on_change;
    Ok(Node::Checkbox {
        checked,
        indeterminate: false,
        on_toggle: Some(Toggle::new(move |v| on_change.call(Value::Bool(v)))),
    })
}
