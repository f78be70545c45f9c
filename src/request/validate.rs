//! Boundary validation for incoming requests.
//!
//! Everything that can be malformed in a request is rejected here, before
//! compilation; the compiler is total over requests that pass.

use thiserror::Error;

use super::{Axis, QueryRequest};

/// A structurally invalid or semantically empty request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request has no dimensions on rows or columns")]
    EmptyAxes,

    #[error("dimension reference has an empty {0} name")]
    EmptyDimensionField(&'static str),

    #[error("filter of type {kind} requires a value")]
    MissingFilterValue { kind: &'static str },

    #[error("between filter requires both min and max")]
    IncompleteBetween,

    #[error("filter value for {kind} must be a string or number")]
    UnsupportedFilterValue { kind: &'static str },

    #[error("drill is missing required field {0}")]
    IncompleteDrill(&'static str),

    #[error("sort is missing a measure name")]
    EmptySortMeasure,

    #[error("topN requires n >= 1")]
    ZeroTopN,

    #[error("visibility on {0} requires at least one {0} dimension")]
    VisibilityWithoutDimension(Axis),
}

/// Validate a request's shape. Called once at the boundary; the compiler
/// re-checks nothing but the axis-emptiness rule (which depends on drill
/// presence).
pub fn validate(request: &QueryRequest) -> Result<(), RequestError> {
    for dim in request.rows.iter().chain(request.columns.iter()) {
        if dim.dimension.is_empty() {
            return Err(RequestError::EmptyDimensionField("dimension"));
        }
        if dim.level.is_empty() {
            return Err(RequestError::EmptyDimensionField("level"));
        }
    }

    for filter in &request.filters {
        if filter.dimension.is_empty() {
            return Err(RequestError::EmptyDimensionField("dimension"));
        }
        if filter.level.is_empty() {
            return Err(RequestError::EmptyDimensionField("level"));
        }
        filter.kind()?;
    }

    if let Some(drill) = &request.drill {
        if drill.dimension.is_empty() {
            return Err(RequestError::IncompleteDrill("dimension"));
        }
        if drill.current_level.is_empty() {
            return Err(RequestError::IncompleteDrill("currentLevel"));
        }
        if drill.target_level.is_empty() {
            return Err(RequestError::IncompleteDrill("targetLevel"));
        }
    }

    if let Some(sort) = &request.sort {
        if sort.measure.is_empty() {
            return Err(RequestError::EmptySortMeasure);
        }
    }

    if let Some(top_n) = &request.top_n {
        if top_n.n == 0 {
            return Err(RequestError::ZeroTopN);
        }
    }

    if let Some(visibility) = &request.visibility {
        let axis_dims = match visibility.axis {
            Axis::Rows => &request.rows,
            Axis::Columns => &request.columns,
        };
        // Rows can also be shaped by a drill, which carries its own paths.
        let rows_shaped_by_drill = visibility.axis == Axis::Rows && request.drill.is_some();
        if axis_dims.is_empty() && !rows_shaped_by_drill {
            return Err(RequestError::VisibilityWithoutDimension(visibility.axis));
        }
    }

    Ok(())
}
