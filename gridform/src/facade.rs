//! Unified imperative control surface.
//!
//! One merged capability object is exposed to the host regardless of which
//! backend is active: the form operations are shared, the table operations
//! are backend-specific (the standard widget exposes selection, expansion,
//! sorting, filtering, layout and pixel scrolling; the virtualized widget
//! exposes only offset scrolling and scroll-to-row-by-strategy). Every
//! delegated call is a no-op (or resolves to an empty/false default) while
//! the corresponding backing widget has not mounted.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::node::FieldPath;
use crate::record::RowRecord;
use crate::state::Shared;

/// Scroll placement strategy for the virtualized backend's scroll-to-row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollStrategy {
    Start,
    Center,
    End,
    Smart,
}

/// Completion callback for validation calls.
pub type ValidateCallback = Box<dyn FnOnce(bool) + Send>;

/// Capability contract of the backing form widget.
pub trait FormHandle: Send + Sync {
    /// Validate the whole form; invokes `on_done` with the outcome and
    /// returns it.
    fn validate(&self, on_done: ValidateCallback) -> bool;
    /// Validate specific fields by binding path.
    fn validate_field(&self, paths: &[FieldPath], on_done: ValidateCallback) -> bool;
    fn reset_fields(&self);
    fn scroll_to_field(&self, path: &FieldPath);
    /// Clear validation state; an empty path list clears everything.
    fn clear_validate(&self, paths: &[FieldPath]);
    /// Enumerate the form's field paths.
    fn fields(&self) -> Vec<FieldPath>;
    fn get_field(&self, path: &FieldPath) -> Option<Value>;
}

/// Capability contract of the standard table widget.
pub trait StandardTableHandle: Send + Sync {
    fn clear_selection(&self);
    fn get_selection_rows(&self) -> Vec<RowRecord>;
    fn toggle_row_selection(&self, row: &RowRecord, selected: Option<bool>, ignore_selectable: bool);
    fn toggle_all_selection(&self);
    fn toggle_row_expansion(&self, row: &RowRecord, expanded: Option<bool>);
    fn set_current_row(&self, row: &RowRecord);
    fn clear_sort(&self);
    /// Clear filters; an empty key list clears all of them.
    fn clear_filter(&self, column_keys: &[String]);
    fn do_layout(&self);
    fn sort(&self, prop: &str, ascending: bool);
    fn scroll_to(&self, x: u32, y: u32);
    fn set_scroll_top(&self, top: u32);
    fn set_scroll_left(&self, left: u32);
}

/// Capability contract of the virtualized table widget.
pub trait VirtualTableHandle: Send + Sync {
    fn scroll_to_offset(&self, left: Option<u32>, top: Option<u32>);
    fn scroll_to_left(&self, left: u32);
    fn scroll_to_top(&self, top: u32);
    fn scroll_to_row(&self, row: usize, strategy: ScrollStrategy);
}

/// A late-bound widget handle: empty until the backing widget mounts.
pub struct Mount<H: ?Sized> {
    slot: Shared<Option<Arc<H>>>,
}

impl<H: ?Sized> Mount<H> {
    pub fn new() -> Self {
        Self {
            slot: Shared::new(None),
        }
    }

    pub fn mount(&self, handle: Arc<H>) {
        self.slot.set(Some(handle));
    }

    pub fn unmount(&self) {
        self.slot.set(None);
    }

    pub fn get(&self) -> Option<Arc<H>> {
        self.slot.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.slot.with(Option::is_some)
    }
}

impl<H: ?Sized> Clone for Mount<H> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<H: ?Sized> Default for Mount<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> fmt::Debug for Mount<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mount")
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

/// The merged capability set. Clones alias the same mount slots, so a facade
/// handed to the host before mounting starts working once the renderer
/// mounts its widgets.
#[derive(Clone, Debug, Default)]
pub struct Facade {
    form: Mount<dyn FormHandle>,
    standard: Mount<dyn StandardTableHandle>,
    virtualized: Mount<dyn VirtualTableHandle>,
}

impl Facade {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------
    // Mounting
    // -------------------------------------------------------------------

    pub fn mount_form(&self, handle: Arc<dyn FormHandle>) {
        self.form.mount(handle);
    }

    pub fn mount_standard(&self, handle: Arc<dyn StandardTableHandle>) {
        self.standard.mount(handle);
    }

    pub fn mount_virtualized(&self, handle: Arc<dyn VirtualTableHandle>) {
        self.virtualized.mount(handle);
    }

    pub fn unmount_all(&self) {
        self.form.unmount();
        self.standard.unmount();
        self.virtualized.unmount();
    }

    // -------------------------------------------------------------------
    // Form operations (shared across backends)
    // -------------------------------------------------------------------

    /// Validate the whole form. Resolves to `false` without invoking the
    /// callback when no form is mounted.
    pub fn validate(&self, on_done: ValidateCallback) -> bool {
        match self.form.get() {
            Some(form) => form.validate(on_done),
            None => false,
        }
    }

    /// Validate specific fields by binding path (`age`, or nested
    /// `tableData.0.age`).
    pub fn validate_field(&self, paths: &[FieldPath], on_done: ValidateCallback) -> bool {
        match self.form.get() {
            Some(form) => form.validate_field(paths, on_done),
            None => false,
        }
    }

    pub fn reset_fields(&self) {
        if let Some(form) = self.form.get() {
            form.reset_fields();
        }
    }

    pub fn scroll_to_field(&self, path: &FieldPath) {
        if let Some(form) = self.form.get() {
            form.scroll_to_field(path);
        }
    }

    pub fn clear_validate(&self, paths: &[FieldPath]) {
        if let Some(form) = self.form.get() {
            form.clear_validate(paths);
        }
    }

    pub fn fields(&self) -> Vec<FieldPath> {
        self.form.get().map(|form| form.fields()).unwrap_or_default()
    }

    pub fn get_field(&self, path: &FieldPath) -> Option<Value> {
        self.form.get().and_then(|form| form.get_field(path))
    }

    // -------------------------------------------------------------------
    // Standard-backend table operations
    // -------------------------------------------------------------------

    pub fn clear_selection(&self) {
        if let Some(table) = self.standard.get() {
            table.clear_selection();
        }
    }

    pub fn get_selection_rows(&self) -> Vec<RowRecord> {
        self.standard
            .get()
            .map(|table| table.get_selection_rows())
            .unwrap_or_default()
    }

    pub fn toggle_row_selection(
        &self,
        row: &RowRecord,
        selected: Option<bool>,
        ignore_selectable: bool,
    ) {
        if let Some(table) = self.standard.get() {
            table.toggle_row_selection(row, selected, ignore_selectable);
        }
    }

    pub fn toggle_all_selection(&self) {
        if let Some(table) = self.standard.get() {
            table.toggle_all_selection();
        }
    }

    pub fn toggle_row_expansion(&self, row: &RowRecord, expanded: Option<bool>) {
        if let Some(table) = self.standard.get() {
            table.toggle_row_expansion(row, expanded);
        }
    }

    pub fn set_current_row(&self, row: &RowRecord) {
        if let Some(table) = self.standard.get() {
            table.set_current_row(row);
        }
    }

    pub fn clear_sort(&self) {
        if let Some(table) = self.standard.get() {
            table.clear_sort();
        }
    }

    pub fn clear_filter(&self, column_keys: &[String]) {
        if let Some(table) = self.standard.get() {
            table.clear_filter(column_keys);
        }
    }

    pub fn do_layout(&self) {
        if let Some(table) = self.standard.get() {
            table.do_layout();
        }
    }

    pub fn sort(&self, prop: &str, ascending: bool) {
        if let Some(table) = self.standard.get() {
            table.sort(prop, ascending);
        }
    }

    pub fn scroll_to(&self, x: u32, y: u32) {
        if let Some(table) = self.standard.get() {
            table.scroll_to(x, y);
        }
    }

    pub fn set_scroll_top(&self, top: u32) {
        if let Some(table) = self.standard.get() {
            table.set_scroll_top(top);
        }
    }

    pub fn set_scroll_left(&self, left: u32) {
        if let Some(table) = self.standard.get() {
            table.set_scroll_left(left);
        }
    }

    // -------------------------------------------------------------------
    // Virtualized-backend table operations
    // -------------------------------------------------------------------

    pub fn scroll_to_offset(&self, left: Option<u32>, top: Option<u32>) {
        if let Some(table) = self.virtualized.get() {
            table.scroll_to_offset(left, top);
        }
    }

    pub fn scroll_to_left(&self, left: u32) {
        if let Some(table) = self.virtualized.get() {
            table.scroll_to_left(left);
        }
    }

    pub fn scroll_to_top(&self, top: u32) {
        if let Some(table) = self.virtualized.get() {
            table.scroll_to_top(top);
        }
    }

    pub fn scroll_to_row(&self, row: usize, strategy: ScrollStrategy) {
        if let Some(table) = self.virtualized.get() {
            table.scroll_to_row(row, strategy);
        }
    }
}
