//! Request model - the structured payload callers send.
//!
//! Requests arrive as JSON and are validated once at the boundary; the
//! compiler only ever sees shapes that passed [`validate`]. Loosely-typed
//! combinations (a `between` filter without both bounds, a drill without a
//! target level) are rejected here, not coerced downstream.

mod validate;

pub mod defaults;

pub use validate::{validate, RequestError};

use serde::{Deserialize, Serialize};

use crate::mdx::Scalar;

// =============================================================================
// Dimension references
// =============================================================================

/// A point in a dimension hierarchy, optionally pinned to one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionRef {
    pub dimension: String,
    pub level: String,
    /// When present, the axis shows this single member instead of the full
    /// member set at the level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
}

impl DimensionRef {
    pub fn new(dimension: &str, level: &str) -> Self {
        Self {
            dimension: dimension.into(),
            level: level.into(),
            member: None,
        }
    }

    pub fn with_member(mut self, member: &str) -> Self {
        self.member = Some(member.into());
        self
    }
}

// =============================================================================
// Filters
// =============================================================================

/// Filter predicate type, as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    Between,
}

impl FilterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::Equals => "equals",
            FilterType::Contains => "contains",
            FilterType::StartsWith => "starts_with",
            FilterType::EndsWith => "ends_with",
            FilterType::GreaterThan => "greater_than",
            FilterType::LessThan => "less_than",
            FilterType::Between => "between",
        }
    }
}

/// A filter as it arrives from the caller.
///
/// `value` vs `min`/`max` usage depends on `type`; [`Filter::kind`] turns
/// the loose shape into the tagged form or rejects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub dimension: String,
    pub level: String,
    #[serde(rename = "type")]
    pub filter_type: FilterType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<serde_json::Value>,
}

/// A validated filter predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterKind {
    Equals(String),
    Contains(String),
    StartsWith(String),
    EndsWith(String),
    GreaterThan(Scalar),
    LessThan(Scalar),
    Between { min: Scalar, max: Scalar },
}

impl Filter {
    pub fn new(dimension: &str, level: &str, filter_type: FilterType) -> Self {
        Self {
            dimension: dimension.into(),
            level: level.into(),
            filter_type,
            value: None,
            min: None,
            max: None,
        }
    }

    pub fn with_value(mut self, value: serde_json::Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_range(mut self, min: serde_json::Value, max: serde_json::Value) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Resolve the loose wire shape into a tagged predicate.
    pub fn kind(&self) -> Result<FilterKind, RequestError> {
        let kind = self.filter_type.as_str();
        match self.filter_type {
            FilterType::Equals => Ok(FilterKind::Equals(self.required_text(kind)?)),
            FilterType::Contains => Ok(FilterKind::Contains(self.required_text(kind)?)),
            FilterType::StartsWith => Ok(FilterKind::StartsWith(self.required_text(kind)?)),
            FilterType::EndsWith => Ok(FilterKind::EndsWith(self.required_text(kind)?)),
            FilterType::GreaterThan => Ok(FilterKind::GreaterThan(self.required_scalar(kind)?)),
            FilterType::LessThan => Ok(FilterKind::LessThan(self.required_scalar(kind)?)),
            FilterType::Between => {
                let (Some(min), Some(max)) = (&self.min, &self.max) else {
                    return Err(RequestError::IncompleteBetween);
                };
                Ok(FilterKind::Between {
                    min: to_scalar(min, kind)?,
                    max: to_scalar(max, kind)?,
                })
            }
        }
    }

    fn required_value(&self, kind: &'static str) -> Result<&serde_json::Value, RequestError> {
        self.value
            .as_ref()
            .ok_or(RequestError::MissingFilterValue { kind })
    }

    fn required_text(&self, kind: &'static str) -> Result<String, RequestError> {
        match to_scalar(self.required_value(kind)?, kind)? {
            Scalar::Text(s) => Ok(s),
            Scalar::Int(n) => Ok(n.to_string()),
            Scalar::Float(f) => Ok(f.to_string()),
        }
    }

    fn required_scalar(&self, kind: &'static str) -> Result<Scalar, RequestError> {
        to_scalar(self.required_value(kind)?, kind)
    }
}

/// Accept JSON strings and numbers as filter literals; anything else is a
/// boundary error.
fn to_scalar(value: &serde_json::Value, kind: &'static str) -> Result<Scalar, RequestError> {
    match value {
        serde_json::Value::String(s) => Ok(Scalar::Text(s.clone())),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Scalar::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Scalar::Float(f))
            } else {
                Err(RequestError::UnsupportedFilterValue { kind })
            }
        }
        _ => Err(RequestError::UnsupportedFilterValue { kind }),
    }
}

// =============================================================================
// Drill navigation
// =============================================================================

/// Navigation direction relative to a displayed member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillDirection {
    /// Expand to the member's children.
    #[default]
    Down,
    /// Collapse to the member's parent.
    Up,
    /// Expand to full detail at the target level, ignoring the member.
    Through,
}

/// A drill operation. Wire field names match the public API
/// (`currentLevel`, `targetLevel`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillSpec {
    pub dimension: String,
    #[serde(rename = "currentLevel")]
    pub current_level: String,
    #[serde(rename = "targetLevel")]
    pub target_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    #[serde(default)]
    pub direction: DrillDirection,
}

// =============================================================================
// Sort / top-N / visibility / aggregation hint
// =============================================================================

/// Sort direction on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl From<SortDirection> for crate::mdx::SortDir {
    fn from(dir: SortDirection) -> Self {
        match dir {
            SortDirection::Asc => crate::mdx::SortDir::Asc,
            SortDirection::Desc => crate::mdx::SortDir::Desc,
        }
    }
}

/// Order the row axis by a measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub measure: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Keep the first `n` row members ranked by a measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopNSpec {
    pub measure: String,
    pub n: u64,
}

/// Which axis a visibility list applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Rows,
    Columns,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Rows => write!(f, "rows"),
            Axis::Columns => write!(f, "columns"),
        }
    }
}

/// Restrict an axis to an explicit member list. Replaces, never augments,
/// whatever the axis would otherwise show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilitySpec {
    pub axis: Axis,
    pub members: Vec<String>,
}

/// Scope the query to a coarser time granularity; merged additively into
/// the WHERE tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationHint {
    pub dimension: String,
    pub level: String,
}

// =============================================================================
// The request
// =============================================================================

/// A complete analytical query request.
///
/// Constructed fresh per incoming call and immutable once handed to the
/// compiler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<DimensionRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<DimensionRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub measures: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drill: Option<DrillSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(default, rename = "topN", skip_serializing_if = "Option::is_none")]
    pub top_n: Option<TopNSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<VisibilitySpec>,
    #[serde(
        default,
        rename = "aggregationHint",
        skip_serializing_if = "Option::is_none"
    )]
    pub aggregation_hint: Option<AggregationHint>,
}

impl QueryRequest {
    /// The visibility spec targeting a given axis, if any.
    pub fn visibility_for(&self, axis: Axis) -> Option<&VisibilitySpec> {
        self.visibility.as_ref().filter(|v| v.axis == axis)
    }
}
