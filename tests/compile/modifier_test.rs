//! Row-axis modifier composition: ordering, non-empty suppression,
//! top-count limits and visibility lists compose in a fixed order.

use cubist::compile::{compile, CompileError, CompileOptions};
use cubist::request::{
    Axis, DimensionRef, DrillDirection, DrillSpec, QueryRequest, RequestError, SortDirection,
    SortSpec, TopNSpec, VisibilitySpec,
};

fn options() -> CompileOptions {
    CompileOptions::default()
}

fn store_rows() -> Vec<DimensionRef> {
    vec![DimensionRef::new("Dim Store", "Store ID")]
}

#[test]
fn sort_wraps_before_non_empty() {
    // The ordering operator receives the unfiltered member set; the
    // non-empty filter wraps the ordered result, never the reverse.
    let request = QueryRequest {
        rows: store_rows(),
        measures: vec!["Total Item Price".to_string()],
        sort: Some(SortSpec {
            measure: "Total Item Price".to_string(),
            direction: SortDirection::Desc,
        }),
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output.mdx.contains(
        "NONEMPTY(ORDER([Dim Store].[Store ID].MEMBERS, [Measures].[Total Item Price], DESC))"
    ));
    assert!(!output.mdx.contains("ORDER(NONEMPTY"));
}

#[test]
fn sort_ascending_direction() {
    let request = QueryRequest {
        rows: store_rows(),
        measures: vec!["Quantity Sale".to_string()],
        sort: Some(SortSpec {
            measure: "Quantity Sale".to_string(),
            direction: SortDirection::Asc,
        }),
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output.mdx.contains("[Measures].[Quantity Sale], ASC)"));
}

#[test]
fn top_count_wraps_outermost() {
    let request = QueryRequest {
        rows: store_rows(),
        measures: vec!["Total Item Price".to_string()],
        sort: Some(SortSpec {
            measure: "Total Item Price".to_string(),
            direction: SortDirection::Desc,
        }),
        top_n: Some(TopNSpec {
            measure: "Total Item Price".to_string(),
            n: 10,
        }),
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output.mdx.contains(
        "TOPCOUNT(NONEMPTY(ORDER([Dim Store].[Store ID].MEMBERS, \
         [Measures].[Total Item Price], DESC)), 10, [Measures].[Total Item Price])"
    ));
}

#[test]
fn top_count_without_sort_still_wraps_non_empty() {
    let request = QueryRequest {
        rows: store_rows(),
        measures: vec!["Quantity Sale".to_string()],
        top_n: Some(TopNSpec {
            measure: "Quantity Sale".to_string(),
            n: 5,
        }),
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output.mdx.contains(
        "TOPCOUNT(NONEMPTY([Dim Store].[Store ID].MEMBERS), 5, [Measures].[Quantity Sale])"
    ));
}

#[test]
fn visibility_replaces_drill_expression() {
    // A drill-down plus a visibility list for the same axis compiles to
    // the visibility list only.
    let request = QueryRequest {
        rows: store_rows(),
        measures: vec!["Total Item Price".to_string()],
        drill: Some(DrillSpec {
            dimension: "Dim Store".to_string(),
            current_level: "Store ID".to_string(),
            target_level: "City ID".to_string(),
            member: Some("5".to_string()),
            direction: DrillDirection::Down,
        }),
        visibility: Some(VisibilitySpec {
            axis: Axis::Rows,
            members: vec!["1".to_string(), "2".to_string()],
        }),
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output.mdx.contains(
        "{[Dim Store].[Store ID].&[1], [Dim Store].[Store ID].&[2]} ON ROWS"
    ));
    assert!(!output.mdx.contains("CHILDREN"));
}

#[test]
fn visibility_list_is_never_pruned() {
    let request = QueryRequest {
        rows: store_rows(),
        measures: vec!["Total Item Price".to_string()],
        visibility: Some(VisibilitySpec {
            axis: Axis::Rows,
            members: vec!["1".to_string(), "2".to_string()],
        }),
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(!output.mdx.contains("NONEMPTY"));
}

#[test]
fn sorted_visibility_list_keeps_order_but_skips_non_empty() {
    let request = QueryRequest {
        rows: store_rows(),
        measures: vec!["Total Item Price".to_string()],
        sort: Some(SortSpec {
            measure: "Total Item Price".to_string(),
            direction: SortDirection::Desc,
        }),
        visibility: Some(VisibilitySpec {
            axis: Axis::Rows,
            members: vec!["1".to_string(), "2".to_string()],
        }),
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output.mdx.contains(
        "ORDER({[Dim Store].[Store ID].&[1], [Dim Store].[Store ID].&[2]}, \
         [Measures].[Total Item Price], DESC)"
    ));
    assert!(!output.mdx.contains("NONEMPTY"));
}

#[test]
fn column_visibility_still_crossjoins_measures() {
    let request = QueryRequest {
        rows: store_rows(),
        columns: vec![DimensionRef::new("Dim Time", "Year")],
        measures: vec!["Quantity Sale".to_string()],
        visibility: Some(VisibilitySpec {
            axis: Axis::Columns,
            members: vec!["2022".to_string(), "2023".to_string()],
        }),
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output.mdx.contains(
        "{CROSSJOIN({[Dim Time].[Year].&[2022], [Dim Time].[Year].&[2023]}, \
         {[Measures].[Quantity Sale]})} ON COLUMNS"
    ));
}

#[test]
fn column_axis_is_never_non_empty_wrapped() {
    let request = QueryRequest {
        rows: store_rows(),
        columns: vec![DimensionRef::new("Dim Time", "Year")],
        measures: vec!["Quantity Sale".to_string()],
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    let columns_axis = output.mdx.split("ON COLUMNS").next().unwrap();
    assert!(!columns_axis.contains("NONEMPTY"));
}

#[test]
fn drill_replaces_matching_row_dimension() {
    let request = QueryRequest {
        rows: vec![
            DimensionRef::new("Dim Store", "Store ID"),
            DimensionRef::new("Dim Time", "Year"),
        ],
        measures: vec!["Total Item Price".to_string()],
        drill: Some(DrillSpec {
            dimension: "Dim Store".to_string(),
            current_level: "Store ID".to_string(),
            target_level: "City ID".to_string(),
            member: Some("5".to_string()),
            direction: DrillDirection::Down,
        }),
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output.mdx.contains(
        "CROSSJOIN([Dim Store].[Store ID].&[5].CHILDREN, [Dim Time].[Year].MEMBERS)"
    ));
    assert!(!output.mdx.contains("[Dim Store].[Store ID].MEMBERS"));
}

#[test]
fn zero_top_n_is_rejected() {
    let request = QueryRequest {
        rows: store_rows(),
        top_n: Some(TopNSpec {
            measure: "Quantity Sale".to_string(),
            n: 0,
        }),
        ..Default::default()
    };

    let result = compile(&request, &options());
    assert!(matches!(
        result,
        Err(CompileError::Request(RequestError::ZeroTopN))
    ));
}
