//! Render-context bridge.
//!
//! The two backends hand their per-row/per-cell callbacks structurally
//! different scopes (the standard widget's `{row, $index}` versus the
//! virtualized widget's `{rowData, rowIndex, column}`). Both are normalized
//! into one [`RenderContext`] here so the resolver is written once. A context
//! is constructed fresh for every cell/header render call and never
//! persisted.

use serde_json::Value;

use crate::config::ColumnConfig;
use crate::record::RowRecord;

/// Which table backend a context originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Standard,
    Virtualized,
}

/// Normalized view of "where am I rendering".
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// The row being rendered; aliases the host's record.
    pub row: RowRecord,
    /// Index of the row within the current data collection.
    pub row_index: usize,
    /// The originating column configuration.
    pub column: ColumnConfig,
    /// Originating backend; the index cell's page-offset asymmetry keys off
    /// this.
    pub backend: BackendKind,
}

impl RenderContext {
    /// Bridge the standard backend's per-cell scope.
    pub fn standard(row: RowRecord, row_index: usize, column: ColumnConfig) -> Self {
        Self {
            row,
            row_index,
            column,
            backend: BackendKind::Standard,
        }
    }

    /// Bridge the virtualized backend's per-cell scope.
    pub fn virtualized(row: RowRecord, row_index: usize, column: ColumnConfig) -> Self {
        Self {
            row,
            row_index,
            column,
            backend: BackendKind::Virtualized,
        }
    }

    /// The current cell value (`Null` when the key is absent).
    pub fn value(&self) -> Value {
        self.row.get(&self.column.prop).unwrap_or(Value::Null)
    }
}
