//! Pagination adapter.
//!
//! Maps host-owned page/size state to the index offset consumed by the
//! standard backend's index cell, and re-emits page changes upward. The
//! control's visual layout belongs to the host widget; [`Paginator::render`]
//! only emits a minimal placeholder row for the standard renderer to attach.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::state::Shared;

/// Page-size choices offered by default.
pub const DEFAULT_PAGE_SIZES: [usize; 5] = [10, 20, 50, 100, 500];

/// Host-owned page state, mirrored locally for index computation. The engine
/// never silently fetches or mutates `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub page_num: usize,
    pub page_size: usize,
    pub total: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_num: 1,
            page_size: 10,
            total: 0,
        }
    }
}

impl PaginationState {
    /// Offset added to a row-local index by the standard backend's index
    /// cell: `(page_num - 1) * page_size`.
    pub fn index_offset(&self) -> usize {
        self.page_num.saturating_sub(1) * self.page_size
    }
}

/// Events re-emitted upward on page-state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// Page or size changed (the combined `pagination` event).
    Pagination { page_num: usize, page_size: usize },
    /// Two-way sync: the current page changed.
    PageNum(usize),
    /// Two-way sync: the page size changed.
    PageSize(usize),
}

/// Upward event sink.
pub type PageEventFn = Arc<dyn Fn(PageEvent) + Send + Sync>;

/// Local mirror of the host's pagination state plus the upward event wiring.
#[derive(Clone)]
pub struct Paginator {
    state: Shared<PaginationState>,
    page_sizes: Vec<usize>,
    on_event: Shared<Option<PageEventFn>>,
}

impl Paginator {
    pub fn new(state: PaginationState) -> Self {
        Self {
            state: Shared::new(state),
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
            on_event: Shared::new(None),
        }
    }

    pub fn with_page_sizes(mut self, page_sizes: Vec<usize>) -> Self {
        self.page_sizes = page_sizes;
        self
    }

    /// Register the upward event sink.
    pub fn on_event(&self, f: impl Fn(PageEvent) + Send + Sync + 'static) {
        self.on_event.set(Some(Arc::new(f)));
    }

    pub fn state(&self) -> PaginationState {
        self.state.get()
    }

    pub fn page_sizes(&self) -> &[usize] {
        &self.page_sizes
    }

    /// Current index offset for the standard index cell.
    pub fn index_offset(&self) -> usize {
        self.state.get().index_offset()
    }

    /// Host replaced its state (new total after a fetch, etc.).
    pub fn sync(&self, state: PaginationState) {
        self.state.set(state);
    }

    /// The user moved to another page.
    pub fn handle_current_change(&self, page_num: usize) {
        self.state.update(|s| s.page_num = page_num);
        let state = self.state.get();
        self.emit(PageEvent::PageNum(state.page_num));
        self.emit(PageEvent::Pagination {
            page_num: state.page_num,
            page_size: state.page_size,
        });
    }

    /// The user picked another page size. When the current page would fall
    /// past the end at the new size, the page resets to 1.
    pub fn handle_size_change(&self, page_size: usize) {
        let mut reset = false;
        self.state.update(|s| {
            if s.page_num * page_size > s.total {
                s.page_num = 1;
                reset = true;
            }
            s.page_size = page_size;
        });
        let state = self.state.get();
        if reset {
            self.emit(PageEvent::PageNum(state.page_num));
        }
        self.emit(PageEvent::PageSize(state.page_size));
        self.emit(PageEvent::Pagination {
            page_num: state.page_num,
            page_size: state.page_size,
        });
    }

    fn emit(&self, event: PageEvent) {
        if let Some(sink) = self.on_event.get() {
            sink(event);
        }
    }

    /// Minimal placeholder row; the real control's layout is the host's.
    pub fn render(&self) -> Node {
        let state = self.state.get();
        Node::row(vec![Node::text(format!(
            "page {} · size {} · total {}",
            state.page_num, state.page_size, state.total
        ))])
    }
}

impl fmt::Debug for Paginator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("state", &self.state.get())
            .field("page_sizes", &self.page_sizes)
            .finish()
    }
}
