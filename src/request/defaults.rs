//! Per-operation request defaults.
//!
//! Every HTTP-facing operation falls back to the same declarative table
//! instead of hardcoding its own default dimensions and measures. The web
//! layer applies these before compilation; the compiler itself never
//! invents axes.

use super::{DimensionRef, QueryRequest};

/// The measure substituted when a request names none.
pub const DEFAULT_MEASURE: &str = "Total Item Price";

/// The HTTP-facing operations that accept (or synthesize) a query request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `GET /api/data` - the fixed browse query.
    Data,
    /// `POST /api/query` - a full caller-shaped request.
    Query,
    /// `POST /api/drill` - drill navigation; the drill spec shapes the rows.
    Drill,
    /// `POST /api/aggregate` - totals-shape response.
    Aggregate,
}

/// Default axis content for one operation.
#[derive(Debug, Clone, Copy)]
pub struct OperationDefaults {
    /// (dimension, level) pairs placed on rows when the request has no
    /// dimensions on either axis.
    pub rows: &'static [(&'static str, &'static str)],
    /// Measures used when the request names none.
    pub measures: &'static [&'static str],
}

const BROWSE_DEFAULTS: OperationDefaults = OperationDefaults {
    rows: &[("Dim Item", "Item Description")],
    measures: &[DEFAULT_MEASURE],
};

/// A drill defines its own row axis through the drill spec, so no row
/// default applies.
const DRILL_DEFAULTS: OperationDefaults = OperationDefaults {
    rows: &[],
    measures: &[DEFAULT_MEASURE],
};

/// The defaults table consulted for every operation.
pub fn defaults_for(operation: Operation) -> &'static OperationDefaults {
    match operation {
        Operation::Data | Operation::Query | Operation::Aggregate => &BROWSE_DEFAULTS,
        Operation::Drill => &DRILL_DEFAULTS,
    }
}

/// Fill the gaps in a request from the defaults table. Explicit request
/// content always wins; only empty fields are defaulted.
pub fn apply_defaults(request: &mut QueryRequest, operation: Operation) {
    let defaults = defaults_for(operation);

    if request.rows.is_empty() && request.columns.is_empty() && request.drill.is_none() {
        request.rows = defaults
            .rows
            .iter()
            .map(|(dimension, level)| DimensionRef::new(dimension, level))
            .collect();
    }

    if request.measures.is_empty() {
        request.measures = defaults.measures.iter().map(|m| m.to_string()).collect();
    }
}
