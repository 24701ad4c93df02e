//! Table backends.
//!
//! Two renderers share one configuration shape and one resolver: the standard
//! backend (nested column groups, pagination, native selection/expand) and the
//! virtualized backend (flat column list, windowed rows, its own selection
//! sub-engine). The outer [`BaseTable`] selects an implementation once at
//! construction; nothing downstream branches on backend identity.

mod standard;
mod virtualized;

pub use standard::{StandardTable, TableFormHandle};
pub use virtualized::{
    CellRenderer, HeaderRenderer, SizeProvider, VirtualColumn, VirtualizedTable,
    translate_columns,
};

use crate::config::ColumnConfig;
use crate::context::BackendKind;
use crate::error::RenderError;
use crate::facade::Facade;
use crate::node::Node;
use crate::pagination::{DEFAULT_PAGE_SIZES, PaginationState};
use crate::record::RowRecord;
use crate::resolver::Resolver;

/// Construction-time table configuration.
#[derive(Debug, Clone)]
pub struct TableProps {
    /// Column configuration, order-preserving.
    pub columns: Vec<ColumnConfig>,
    /// Host-owned data rows, aliased by reference.
    pub rows: Vec<RowRecord>,
    /// Form mode: cells render editable and wrapped in validation containers.
    pub is_form: bool,
    /// Select the virtualized backend instead of the standard one.
    pub is_virtual: bool,
    /// Virtualized only: take the viewport size from a container provider
    /// instead of the fixed size.
    pub is_auto_resize: bool,
    /// Host-owned pagination state mirrored by the standard backend.
    pub pagination: PaginationState,
    /// Page-size choices offered by the pagination control.
    pub page_sizes: Vec<usize>,
}

impl Default for TableProps {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            is_form: false,
            is_virtual: false,
            is_auto_resize: false,
            pagination: PaginationState::default(),
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
        }
    }
}

impl TableProps {
    pub fn new(columns: Vec<ColumnConfig>, rows: Vec<RowRecord>) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    pub fn form(mut self, is_form: bool) -> Self {
        self.is_form = is_form;
        self
    }

    pub fn virtualized(mut self, is_virtual: bool) -> Self {
        self.is_virtual = is_virtual;
        self
    }

    pub fn auto_resize(mut self, is_auto_resize: bool) -> Self {
        self.is_auto_resize = is_auto_resize;
        self
    }

    pub fn pagination(mut self, pagination: PaginationState) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn page_sizes(mut self, page_sizes: Vec<usize>) -> Self {
        self.page_sizes = page_sizes;
        self
    }
}

/// The backend contract both renderers implement.
pub trait TableBackend: Send + Sync {
    /// Which backend this is.
    fn kind(&self) -> BackendKind;

    /// Produce the current view tree.
    fn render(&self) -> Result<Node, RenderError>;

    /// The imperative capability surface, shared with the host.
    fn facade(&self) -> Facade;

    /// Replace the column configuration.
    fn set_columns(&self, columns: Vec<ColumnConfig>);

    /// Replace the data rows.
    fn set_rows(&self, rows: Vec<RowRecord>);
}

/// The outer table: picks a backend once from the `virtual` flag.
pub struct BaseTable {
    backend: Box<dyn TableBackend>,
}

impl BaseTable {
    pub fn new(props: TableProps, resolver: Resolver) -> Self {
        let backend: Box<dyn TableBackend> = if props.is_virtual {
            Box::new(VirtualizedTable::new(props, resolver))
        } else {
            Box::new(StandardTable::new(props, resolver))
        };
        Self { backend }
    }

    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn render(&self) -> Result<Node, RenderError> {
        self.backend.render()
    }

    pub fn facade(&self) -> Facade {
        self.backend.facade()
    }

    pub fn set_columns(&self, columns: Vec<ColumnConfig>) {
        self.backend.set_columns(columns);
    }

    pub fn set_rows(&self, rows: Vec<RowRecord>) {
        self.backend.set_rows(rows);
    }

    pub fn backend(&self) -> &dyn TableBackend {
        self.backend.as_ref()
    }
}

impl std::fmt::Debug for BaseTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseTable")
            .field("kind", &self.backend.kind())
            .finish()
    }
}
