//! gridform - a configuration-driven table and form rendering engine.
//!
//! One column/field configuration shape drives three headless renderers: a
//! standard table (nested column groups, pagination, native selection), a
//! virtualized table (flat translated columns, windowed rows, in-crate
//! selection) and a bare form (span-packed grid over one shared record). The
//! engine produces a [`Node`](node::Node) view tree and exposes imperative
//! control through a merged [`Facade`](facade::Facade); the actual widget
//! primitives stay black boxes behind capability traits.

pub mod config;
pub mod context;
pub mod error;
pub mod facade;
pub mod form;
pub mod node;
pub mod pagination;
pub mod record;
pub mod registry;
pub mod resolver;
pub mod selection;
pub mod state;
pub mod table;

pub mod prelude {
    pub use crate::config::{
        ColProps, ColumnConfig, ComEvents, ComProps, DEFAULT_MODEL_NAME, EventFn, FormatterFn,
        ItemProps, RenderType, SlotFn, ValidationRule, required_map, validate_unique_props,
        visible_columns,
    };
    pub use crate::context::{BackendKind, RenderContext};
    pub use crate::error::RenderError;
    pub use crate::facade::{
        Facade, FormHandle, ScrollStrategy, StandardTableHandle, VirtualTableHandle,
    };
    pub use crate::form::FormRender;
    pub use crate::node::{Change, FieldPath, Node, TABLE_MODEL_KEY, TextStyle, Toggle};
    pub use crate::pagination::{
        DEFAULT_PAGE_SIZES, PageEvent, PaginationState, Paginator,
    };
    pub use crate::record::{CHECKED_KEY, RowRecord};
    pub use crate::registry::{ComponentBinding, ComponentRegistry, DynamicComponent};
    pub use crate::resolver::{Resolver, SlotRegistry, UpdateFn};
    pub use crate::state::Shared;
    pub use crate::table::{BaseTable, StandardTable, TableBackend, TableProps, VirtualizedTable};
}
