//! Tabular results returned by the engine.
//!
//! A table is an ordered column list plus ordered rows mapping column
//! identifiers to JSON values. Column identifiers are the bracketed paths
//! the engine reports: measure columns carry the `[Measures].` prefix,
//! dimension caption columns a `[Dim X].[Level].[MEMBER_CAPTION]` path.

mod normalize;

pub use normalize::{grand_totals, normalize};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix identifying measure columns.
pub const MEASURE_COLUMN_PREFIX: &str = "[Measures].";

/// Caption presented for grand-total and rolled-up rows.
pub const TOTAL_CAPTION: &str = "Total";

/// Placeholder caption the engine emits for unresolved members.
pub const UNKNOWN_CAPTION: &str = "Unknown";

/// An ordered table of engine rows. Raw when it comes off the bridge,
/// normalized after [`normalize`] has run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column identifiers in result order.
    pub columns: Vec<String>,
    /// Rows in result order; each maps a column identifier to its value.
    pub rows: Vec<BTreeMap<String, Value>>,
}

impl Table {
    /// True when the identifier names a measure column.
    pub fn is_measure_column(column: &str) -> bool {
        column.starts_with(MEASURE_COLUMN_PREFIX)
    }

    /// Measure column identifiers, in column order.
    pub fn measure_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| Self::is_measure_column(c))
            .map(String::as_str)
            .collect()
    }

    /// Dimension caption column identifiers, in column order.
    pub fn caption_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| !Self::is_measure_column(c))
            .map(String::as_str)
            .collect()
    }
}

/// Display name of a measure column: `[Measures].[Quantity Sale]` →
/// `Quantity Sale`. Identifiers without the bracketed form are passed
/// through unchanged.
pub fn measure_display_name(column: &str) -> &str {
    column
        .strip_prefix(MEASURE_COLUMN_PREFIX)
        .and_then(|rest| rest.strip_prefix('['))
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(column)
}
