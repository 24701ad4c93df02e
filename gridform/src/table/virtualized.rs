//! Virtualized table backend.
//!
//! The backing widget wants flat, widget-shaped column descriptors with
//! renderer closures attached, so the configuration is translated before each
//! render pass: header aliases (`title` from `label`) and record-key aliases
//! (`data_key` from `prop`) are defaulted, and the header/cell renderers are
//! bound over the resolver. Grouped columns are rejected outright. Selection
//! runs through the in-crate sub-engine rather than a native widget column.

use std::sync::Arc;

use crate::config::{ColumnConfig, RenderType, visible_columns};
use crate::context::{BackendKind, RenderContext};
use crate::error::RenderError;
use crate::facade::{Facade, ScrollStrategy, VirtualTableHandle};
use crate::node::Node;
use crate::record::RowRecord;
use crate::resolver::Resolver;
use crate::selection;
use crate::state::Shared;

use super::{TableBackend, TableProps};

/// Renders one column's header cell.
pub type HeaderRenderer = Arc<dyn Fn() -> Node + Send + Sync>;

/// Renders one data cell from a row and its index.
pub type CellRenderer = Arc<dyn Fn(&RowRecord, usize) -> Node + Send + Sync>;

/// Reports the current container size (columns, rows) in auto-resize mode.
pub type SizeProvider = Arc<dyn Fn() -> (u16, u16) + Send + Sync>;

/// A widget-shaped column descriptor: the (alias-normalized) configuration
/// plus the renderer closures the widget invokes per cell.
#[derive(Clone)]
pub struct VirtualColumn {
    pub config: ColumnConfig,
    pub header_renderer: HeaderRenderer,
    pub cell_renderer: CellRenderer,
}

impl std::fmt::Debug for VirtualColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualColumn")
            .field("prop", &self.config.prop)
            .field("title", &self.config.title)
            .field("data_key", &self.config.data_key)
            .finish()
    }
}

/// Translate a column list into widget-shaped descriptors.
///
/// Visible columns only, order preserved. `title` defaults from `label` and
/// `data_key` from `prop`; a column already declaring both aliases passes
/// through unchanged. Any column with children is an error: this backend only
/// renders a flat column list.
pub fn translate_columns(
    resolver: &Resolver,
    columns: &[ColumnConfig],
    rows: &Shared<Vec<RowRecord>>,
    form: bool,
) -> Result<Vec<VirtualColumn>, RenderError> {
    visible_columns(columns)
        .into_iter()
        .map(|column| {
            if column.is_group() {
                return Err(RenderError::NestedColumnsUnsupported {
                    prop: column.prop.clone(),
                });
            }
            let mut config = column.clone();
            if config.title.is_none() {
                config.title = config.label.clone();
            }
            if config.data_key.is_none() {
                config.data_key = Some(config.prop.clone());
            }

            let header_renderer: HeaderRenderer =
                if config.render_type == Some(RenderType::Selection) {
                    let rows = rows.clone();
                    Arc::new(move || selection::header_checkbox(&rows.get()))
                } else {
                    let resolver = resolver.clone();
                    let config = config.clone();
                    let required = config.is_required();
                    Arc::new(move || resolver.render_header(form, &config, required))
                };

            let cell_renderer: CellRenderer = {
                let resolver = resolver.clone();
                let config = config.clone();
                Arc::new(move |row, row_index| {
                    let ctx = RenderContext::virtualized(row.clone(), row_index, config.clone());
                    // The index cell here is page-independent.
                    resolver.render_cell(form, &ctx, 0)
                })
            };

            Ok(VirtualColumn {
                config,
                header_renderer,
                cell_renderer,
            })
        })
        .collect()
}

/// Engine-side scroll state; implements the virtualized capability surface.
struct ScrollState {
    /// (left, top); `top` is in row units and drives the window.
    offset: Shared<(u32, u32)>,
    rows: Shared<Vec<RowRecord>>,
    /// Data rows the viewport holds, refreshed on every render pass.
    viewport_rows: Shared<usize>,
}

impl ScrollState {
    fn clamp_top(&self, top: u32) -> u32 {
        let total = self.rows.with(Vec::len) as u32;
        let viewport = self.viewport_rows.get() as u32;
        top.min(total.saturating_sub(viewport))
    }
}

impl VirtualTableHandle for ScrollState {
    fn scroll_to_offset(&self, left: Option<u32>, top: Option<u32>) {
        self.offset.update(|(l, t)| {
            if let Some(left) = left {
                *l = left;
            }
            if let Some(top) = top {
                *t = top;
            }
        });
        let clamped = self.clamp_top(self.offset.get().1);
        self.offset.update(|(_, t)| *t = clamped);
    }

    fn scroll_to_left(&self, left: u32) {
        self.scroll_to_offset(Some(left), None);
    }

    fn scroll_to_top(&self, top: u32) {
        self.scroll_to_offset(None, Some(top));
    }

    fn scroll_to_row(&self, row: usize, strategy: ScrollStrategy) {
        let viewport = self.viewport_rows.get().max(1);
        let row = row as u32;
        let viewport_u32 = viewport as u32;
        let (_, top) = self.offset.get();

        let target = match strategy {
            ScrollStrategy::Start => row,
            ScrollStrategy::End => (row + 1).saturating_sub(viewport_u32),
            ScrollStrategy::Center => row.saturating_sub(viewport_u32 / 2),
            ScrollStrategy::Smart => {
                // Leave an already-visible row alone, otherwise center it.
                if row >= top && row < top + viewport_u32 {
                    top
                } else {
                    row.saturating_sub(viewport_u32 / 2)
                }
            }
        };
        self.scroll_to_top(target);
    }
}

/// The virtualized renderer.
pub struct VirtualizedTable {
    columns: Shared<Vec<ColumnConfig>>,
    rows: Shared<Vec<RowRecord>>,
    is_form: bool,
    is_auto_resize: bool,
    resolver: Resolver,
    /// Fixed viewport size (columns, rows), used unless auto-resize is on.
    size: Shared<(u16, u16)>,
    size_provider: Shared<Option<SizeProvider>>,
    scroll: Arc<ScrollState>,
    facade: Facade,
}

impl VirtualizedTable {
    /// Default fixed viewport when the host sets nothing.
    const DEFAULT_SIZE: (u16, u16) = (80, 20);

    pub fn new(props: TableProps, resolver: Resolver) -> Self {
        let rows = Shared::new(props.rows);
        let scroll = Arc::new(ScrollState {
            offset: Shared::new((0, 0)),
            rows: rows.clone(),
            viewport_rows: Shared::new(0),
        });
        let facade = Facade::new();
        facade.mount_virtualized(scroll.clone());
        Self {
            columns: Shared::new(props.columns),
            rows,
            is_form: props.is_form,
            is_auto_resize: props.is_auto_resize,
            resolver,
            size: Shared::new(Self::DEFAULT_SIZE),
            size_provider: Shared::new(None),
            scroll,
            facade,
        }
    }

    /// Set the fixed viewport size (columns, rows).
    pub fn set_size(&self, width: u16, height: u16) {
        self.size.set((width, height));
    }

    /// Install the container-size provider consulted in auto-resize mode.
    pub fn set_size_provider(&self, provider: impl Fn() -> (u16, u16) + Send + Sync + 'static) {
        self.size_provider.set(Some(Arc::new(provider)));
    }

    /// Current scroll offset (left, top).
    pub fn scroll_offset(&self) -> (u32, u32) {
        self.scroll.offset.get()
    }

    /// The effective viewport: the provider's answer in auto-resize mode,
    /// the fixed size otherwise.
    fn viewport(&self) -> (u16, u16) {
        if self.is_auto_resize
            && let Some(provider) = self.size_provider.get()
        {
            return provider();
        }
        self.size.get()
    }

    /// The materialized row window for the current offset and viewport.
    fn visible_range(&self, total: usize, viewport_rows: usize) -> std::ops::Range<usize> {
        let top = self.scroll.offset.get().1 as usize;
        let start = top.min(total);
        let end = (start + viewport_rows).min(total);
        start..end
    }
}

impl TableBackend for VirtualizedTable {
    fn kind(&self) -> BackendKind {
        BackendKind::Virtualized
    }

    fn render(&self) -> Result<Node, RenderError> {
        let columns = self.columns.get();
        // Fresh translation per pass so the header tri-state tracks row state.
        let translated = translate_columns(&self.resolver, &columns, &self.rows, self.is_form)?;

        let (_, height) = self.viewport();
        let viewport_rows = usize::from(height.saturating_sub(1));
        self.scroll.viewport_rows.set(viewport_rows);

        let header = Node::row(
            translated
                .iter()
                .map(|column| (column.header_renderer)())
                .collect(),
        );

        let rows = self.rows.get();
        let range = self.visible_range(rows.len(), viewport_rows);
        let body = rows[range.clone()]
            .iter()
            .zip(range)
            .map(|(row, row_index)| {
                Node::row(
                    translated
                        .iter()
                        .map(|column| (column.cell_renderer)(row, row_index))
                        .collect(),
                )
            });

        let mut children = vec![header];
        children.extend(body);
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

impl std::fmt::Debug for VirtualizedTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualizedTable")
            .field("is_form", &self.is_form)
            .field("is_auto_resize", &self.is_auto_resize)
            .field("size", &self.size.get())
            .field("offset", &self.scroll.offset.get())
            .finish()
    }
}
