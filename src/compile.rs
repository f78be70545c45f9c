//! End-to-end compilation from a query request to MDX.
//!
//! This module provides the high-level API for turning a validated
//! [`QueryRequest`] into MDX text:
//!
//! ```text
//! QueryRequest → validate → resolve axes → row modifiers → WHERE tuple → MDX
//! ```
//!
//! # Example
//!
//! ```
//! use cubist::compile::{compile, CompileOptions};
//! use cubist::request::{DimensionRef, QueryRequest};
//!
//! let request = QueryRequest {
//!     rows: vec![DimensionRef::new("Dim Store", "Store ID")],
//!     measures: vec!["Total Item Price".to_string()],
//!     ..Default::default()
//! };
//!
//! let output = compile(&request, &CompileOptions::default()).unwrap();
//! assert!(output.mdx.contains("[Dim Store].[Store ID].MEMBERS"));
//! ```
//!
//! Compilation is pure: identical requests produce byte-identical MDX. Row
//! modifiers compose in a fixed order - ordering wraps the raw set, the
//! non-empty filter wraps the ordered set, and the top-count limit wraps
//! last - so sorting always ranks the full candidate set and emptiness is
//! judged afterwards.

use crate::mdx::{
    CaptionMatch, LevelRef, MdxQuery, MemberPredicate, MemberRef, Scalar, SetExpr, SlicerEntry,
    ValueCmp,
};
use crate::request::defaults::DEFAULT_MEASURE;
use crate::request::{
    self, Axis, DimensionRef, DrillDirection, DrillSpec, FilterKind, QueryRequest, RequestError,
    VisibilitySpec,
};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during compilation.
///
/// The compiler is total over validated requests, so every failure here is
/// an invalid request surfaced before any MDX is assembled.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("invalid request: {0}")]
    Request(#[from] RequestError),
}

pub type CompileResult<T> = Result<T, CompileError>;

// ============================================================================
// Options
// ============================================================================

/// Options for compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Name of the cube the query runs against.
    pub cube: String,

    /// Measure substituted when the request names none.
    pub default_measure: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            cube: "DW".to_string(),
            default_measure: DEFAULT_MEASURE.to_string(),
        }
    }
}

impl CompileOptions {
    /// Set the target cube name.
    pub fn with_cube(mut self, cube: &str) -> Self {
        self.cube = cube.into();
        self
    }

    /// Set the fallback measure.
    pub fn with_default_measure(mut self, measure: &str) -> Self {
        self.default_measure = measure.into();
        self
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Result of compiling a request.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// The generated MDX string.
    pub mdx: String,

    /// The query AST (for further inspection if needed).
    pub query: MdxQuery,
}

// ============================================================================
// Compilation
// ============================================================================

/// Compile a query request to MDX.
pub fn compile(request: &QueryRequest, options: &CompileOptions) -> CompileResult<CompileOutput> {
    request::validate(request)?;

    // A drill shapes the row axis on its own; otherwise at least one axis
    // must name a dimension.
    if request.rows.is_empty() && request.columns.is_empty() && request.drill.is_none() {
        return Err(RequestError::EmptyAxes.into());
    }

    let measures = if request.measures.is_empty() {
        vec![options.default_measure.clone()]
    } else {
        request.measures.clone()
    };

    let rows = compile_row_axis(request)?;
    let columns = compile_column_axis(request, &measures)?;
    let slicer = compile_slicer(request)?;

    let mut query = MdxQuery::new(&options.cube, columns).with_slicer(slicer);
    if let Some(rows) = rows {
        query = query.with_rows(rows);
    }

    Ok(CompileOutput {
        mdx: query.to_mdx(),
        query,
    })
}

/// Build the row axis: resolve the dimension sets (or the visibility
/// list), then apply the modifiers in their fixed order.
fn compile_row_axis(request: &QueryRequest) -> Result<Option<SetExpr>, RequestError> {
    let visibility = request.visibility_for(Axis::Rows);

    let (base, explicit) = match visibility {
        // An explicit member list replaces drill and defaults entirely.
        Some(vis) => (
            Some(explicit_set(vis, &request.rows, request.drill.as_ref())?),
            true,
        ),
        None => (resolve_dimension_sets(Axis::Rows, request), false),
    };

    let Some(mut expr) = base else {
        return Ok(None);
    };

    // Ordering ranks the unfiltered candidate set.
    if let Some(sort) = &request.sort {
        expr = expr.order_by(&sort.measure, sort.direction.into());
    }

    // Non-emptiness is judged after ordering; explicit lists are never
    // pruned.
    if !explicit {
        expr = expr.non_empty();
    }

    if let Some(top_n) = &request.top_n {
        expr = expr.top_count(top_n.n, &top_n.measure);
    }

    Ok(Some(expr))
}

/// Build the column axis: column dimensions (if any) cross-joined with the
/// measure set, else the measure set alone. The column axis never gets the
/// non-empty wrap.
fn compile_column_axis(
    request: &QueryRequest,
    measures: &[String],
) -> Result<SetExpr, RequestError> {
    let measure_set = SetExpr::MeasureSet(measures.to_vec());

    let base = match request.visibility_for(Axis::Columns) {
        Some(vis) => Some(explicit_set(vis, &request.columns, None)?),
        None => resolve_dimension_sets(Axis::Columns, request),
    };

    Ok(match base {
        Some(expr) => expr.crossjoin(measure_set),
        None => measure_set,
    })
}

/// Resolve an axis's dimension references in request order, folding
/// multiple sets into an explicit cross product. A drill spec replaces the
/// expression of the dimension it targets; a drill against a dimension not
/// on the axis is appended.
fn resolve_dimension_sets(axis: Axis, request: &QueryRequest) -> Option<SetExpr> {
    let refs = match axis {
        Axis::Rows => &request.rows,
        Axis::Columns => &request.columns,
    };
    // Drill navigation always targets the row axis.
    let drill = match axis {
        Axis::Rows => request.drill.as_ref(),
        Axis::Columns => None,
    };

    let mut parts: Vec<SetExpr> = Vec::with_capacity(refs.len());
    let mut drill_used = false;

    for dim in refs {
        match drill.filter(|d| d.dimension == dim.dimension) {
            Some(d) => {
                parts.push(drill_expr(d));
                drill_used = true;
            }
            None => parts.push(resolve_ref(dim)),
        }
    }

    if let Some(d) = drill {
        if !drill_used {
            parts.push(drill_expr(d));
        }
    }

    parts.into_iter().reduce(SetExpr::crossjoin)
}

/// A single dimension reference: pinned member or full expansion.
fn resolve_ref(dim: &DimensionRef) -> SetExpr {
    match &dim.member {
        Some(member) => SetExpr::Member(MemberRef::new(&dim.dimension, &dim.level, member)),
        None => SetExpr::Members(LevelRef::new(&dim.dimension, &dim.level)),
    }
}

/// Navigation expression for a drill spec.
fn drill_expr(drill: &DrillSpec) -> SetExpr {
    match (drill.direction, &drill.member) {
        (DrillDirection::Down, Some(member)) => SetExpr::Children(MemberRef::new(
            &drill.dimension,
            &drill.current_level,
            member,
        )),
        (DrillDirection::Up, Some(member)) => SetExpr::Parent(MemberRef::new(
            &drill.dimension,
            &drill.current_level,
            member,
        )),
        // `through`, and down/up without an anchor member, expand the
        // target level in full.
        _ => SetExpr::Members(LevelRef::new(&drill.dimension, &drill.target_level)),
    }
}

/// Member list for a visibility spec, anchored at the axis's first
/// dimension reference (or the drill target when a drill shapes the rows).
fn explicit_set(
    visibility: &VisibilitySpec,
    refs: &[DimensionRef],
    drill: Option<&DrillSpec>,
) -> Result<SetExpr, RequestError> {
    let level = if let Some(first) = refs.first() {
        LevelRef::new(&first.dimension, &first.level)
    } else if let Some(drill) = drill {
        LevelRef::new(&drill.dimension, &drill.target_level)
    } else {
        return Err(RequestError::VisibilityWithoutDimension(visibility.axis));
    };

    Ok(SetExpr::Explicit(
        visibility
            .members
            .iter()
            .map(|member| level.member(member))
            .collect(),
    ))
}

/// Assemble the WHERE tuple: one fragment per filter, plus the aggregation
/// hint's level expansion. The hint augments the filters, it never
/// replaces them.
fn compile_slicer(request: &QueryRequest) -> Result<Vec<SlicerEntry>, RequestError> {
    let mut entries = Vec::with_capacity(request.filters.len() + 1);

    for filter in &request.filters {
        let level = LevelRef::new(&filter.dimension, &filter.level);
        let entry = match filter.kind()? {
            FilterKind::Equals(value) => SlicerEntry::Member(level.member(&value)),
            FilterKind::Contains(literal) => caption_entry(level, CaptionMatch::Contains, literal),
            FilterKind::StartsWith(literal) => {
                caption_entry(level, CaptionMatch::StartsWith, literal)
            }
            FilterKind::EndsWith(literal) => caption_entry(level, CaptionMatch::EndsWith, literal),
            FilterKind::GreaterThan(value) => value_entry(level, ValueCmp::Gt, value),
            FilterKind::LessThan(value) => value_entry(level, ValueCmp::Lt, value),
            FilterKind::Between { min, max } => SlicerEntry::Set(SetExpr::Filtered {
                set: Box::new(SetExpr::Members(level.clone())),
                predicate: MemberPredicate::ValueBetween { level, min, max },
            }),
        };
        entries.push(entry);
    }

    if let Some(hint) = &request.aggregation_hint {
        entries.push(SlicerEntry::Set(SetExpr::Members(LevelRef::new(
            &hint.dimension,
            &hint.level,
        ))));
    }

    Ok(entries)
}

/// `FILTER(members, <caption test>)` restriction.
fn caption_entry(level: LevelRef, matcher: CaptionMatch, literal: String) -> SlicerEntry {
    SlicerEntry::Set(SetExpr::Filtered {
        set: Box::new(SetExpr::Members(level.clone())),
        predicate: MemberPredicate::Caption {
            level,
            matcher,
            literal,
        },
    })
}

/// `FILTER(members, MEMBERVALUE <cmp> literal)` restriction.
fn value_entry(level: LevelRef, cmp: ValueCmp, literal: Scalar) -> SlicerEntry {
    SlicerEntry::Set(SetExpr::Filtered {
        set: Box::new(SetExpr::Members(level.clone())),
        predicate: MemberPredicate::Value {
            level,
            cmp,
            literal,
        },
    })
}

// ============================================================================
// Tests
// ============================================================================
