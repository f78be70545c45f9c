//! End-to-end compiler checks: the documented request shapes compile to
//! their documented MDX.

use cubist::compile::{compile, CompileError, CompileOptions};
use cubist::request::{
    AggregationHint, DimensionRef, DrillDirection, DrillSpec, Filter, FilterType, QueryRequest,
    RequestError,
};
use serde_json::json;

fn options() -> CompileOptions {
    CompileOptions::default()
}

#[test]
fn test_store_rows_single_measure() {
    let request = QueryRequest {
        rows: vec![DimensionRef::new("Dim Store", "Store ID")],
        measures: vec!["Total Item Price".to_string()],
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();

    insta::assert_snapshot!(output.mdx, @r"
SELECT
  {[Measures].[Total Item Price]} ON COLUMNS,
  {NONEMPTY([Dim Store].[Store ID].MEMBERS)} ON ROWS
FROM [DW]
");
}

#[test]
fn test_compile_is_deterministic() {
    let request = QueryRequest {
        rows: vec![
            DimensionRef::new("Dim Store", "State"),
            DimensionRef::new("Dim Time", "Year"),
        ],
        measures: vec!["Quantity Sale".to_string(), "Quantity Ordered".to_string()],
        filters: vec![
            Filter::new("Dim Time", "Year", FilterType::Equals).with_value(json!("2023"))
        ],
        ..Default::default()
    };

    let first = compile(&request, &options()).unwrap();
    let second = compile(&request, &options()).unwrap();
    assert_eq!(first.mdx, second.mdx);
}

#[test]
fn test_empty_measures_use_default_measure() {
    let request = QueryRequest {
        rows: vec![DimensionRef::new("Dim Item", "Item Description")],
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output
        .mdx
        .contains("{[Measures].[Total Item Price]} ON COLUMNS"));
}

#[test]
fn test_two_row_dimensions_crossjoin_in_request_order() {
    let request = QueryRequest {
        rows: vec![
            DimensionRef::new("Dim Store", "State"),
            DimensionRef::new("Dim Item", "Item Size"),
        ],
        measures: vec!["Quantity Sale".to_string()],
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output.mdx.contains(
        "CROSSJOIN([Dim Store].[State].MEMBERS, [Dim Item].[Item Size].MEMBERS)"
    ));
}

#[test]
fn test_measures_render_in_request_order() {
    let request = QueryRequest {
        rows: vec![DimensionRef::new("Dim Store", "Store ID")],
        measures: vec![
            "Quantity Ordered".to_string(),
            "Total Item Price".to_string(),
        ],
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output.mdx.contains(
        "{[Measures].[Quantity Ordered], [Measures].[Total Item Price]}"
    ));
}

#[test]
fn test_equals_filter_pins_member_in_where() {
    let request = QueryRequest {
        rows: vec![DimensionRef::new("Dim Store", "Store ID")],
        measures: vec!["Total Item Price".to_string()],
        filters: vec![
            Filter::new("Dim Time", "Year", FilterType::Equals).with_value(json!("2023"))
        ],
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output.mdx.ends_with("WHERE ([Dim Time].[Year].&[2023])"));
}

#[test]
fn test_no_filters_no_where_clause() {
    let request = QueryRequest {
        rows: vec![DimensionRef::new("Dim Store", "Store ID")],
        measures: vec!["Total Item Price".to_string()],
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(!output.mdx.contains("WHERE"));
}

#[test]
fn test_drill_down_compiles_to_children() {
    let request = QueryRequest {
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
    assert!(output
        .mdx
        .contains("[Dim Store].[Store ID].&[5].CHILDREN"));
}

#[test]
fn test_drill_up_compiles_to_parent() {
    let request = QueryRequest {
        measures: vec!["Total Item Price".to_string()],
        drill: Some(DrillSpec {
            dimension: "Dim Store".to_string(),
            current_level: "City ID".to_string(),
            target_level: "State".to_string(),
            member: Some("12".to_string()),
            direction: DrillDirection::Up,
        }),
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output.mdx.contains("[Dim Store].[City ID].&[12].PARENT"));
}

#[test]
fn test_drill_through_expands_target_level() {
    let request = QueryRequest {
        measures: vec!["Total Item Price".to_string()],
        drill: Some(DrillSpec {
            dimension: "Dim Store".to_string(),
            current_level: "Store ID".to_string(),
            target_level: "City ID".to_string(),
            member: Some("5".to_string()),
            direction: DrillDirection::Through,
        }),
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output.mdx.contains("[Dim Store].[City ID].MEMBERS"));
    assert!(!output.mdx.contains("CHILDREN"));
}

#[test]
fn test_drill_down_without_member_falls_back_to_target_members() {
    let request = QueryRequest {
        measures: vec!["Total Item Price".to_string()],
        drill: Some(DrillSpec {
            dimension: "Dim Store".to_string(),
            current_level: "Store ID".to_string(),
            target_level: "City ID".to_string(),
            member: None,
            direction: DrillDirection::Down,
        }),
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output.mdx.contains("[Dim Store].[City ID].MEMBERS"));
}

#[test]
fn test_contains_filter_restricts_by_caption() {
    let request = QueryRequest {
        rows: vec![DimensionRef::new("Dim Item", "Item Description")],
        measures: vec!["Quantity Sale".to_string()],
        filters: vec![Filter::new("Dim Store", "City Name", FilterType::Contains)
            .with_value(json!("Spring"))],
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output.mdx.contains(
        "FILTER([Dim Store].[City Name].MEMBERS, \
         INSTR([Dim Store].[City Name].CURRENTMEMBER.MEMBER_CAPTION, \"Spring\") > 0)"
    ));
}

#[test]
fn test_starts_with_and_ends_with_filters() {
    let request = QueryRequest {
        rows: vec![DimensionRef::new("Dim Item", "Item Description")],
        measures: vec!["Quantity Sale".to_string()],
        filters: vec![
            Filter::new("Dim Item", "Item Description", FilterType::StartsWith)
                .with_value(json!("Choc")),
            Filter::new("Dim Item", "Item Description", FilterType::EndsWith)
                .with_value(json!("Bar")),
        ],
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output.mdx.contains("LEFT([Dim Item].[Item Description]"));
    assert!(output.mdx.contains("LEN(\"Choc\")) = \"Choc\""));
    assert!(output.mdx.contains("RIGHT([Dim Item].[Item Description]"));
    assert!(output.mdx.contains("LEN(\"Bar\")) = \"Bar\""));
}

#[test]
fn test_greater_and_less_than_filters() {
    let request = QueryRequest {
        rows: vec![DimensionRef::new("Dim Item", "Item Description")],
        measures: vec!["Quantity Sale".to_string()],
        filters: vec![
            Filter::new("Dim Item", "Price", FilterType::GreaterThan).with_value(json!(10)),
            Filter::new("Dim Item", "Price", FilterType::LessThan).with_value(json!(99.5)),
        ],
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output
        .mdx
        .contains("[Dim Item].[Price].CURRENTMEMBER.MEMBERVALUE > 10"));
    assert!(output
        .mdx
        .contains("[Dim Item].[Price].CURRENTMEMBER.MEMBERVALUE < 99.5"));
}

#[test]
fn test_between_filter_is_inclusive_range() {
    let request = QueryRequest {
        rows: vec![DimensionRef::new("Dim Item", "Item Description")],
        measures: vec!["Quantity Sale".to_string()],
        filters: vec![
            Filter::new("Dim Item", "Price", FilterType::Between).with_range(json!(10), json!(50))
        ],
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output.mdx.contains("MEMBERVALUE >= 10"));
    assert!(output.mdx.contains("MEMBERVALUE <= 50"));
}

#[test]
fn test_between_without_max_is_invalid_request() {
    let mut filter = Filter::new("Dim Item", "Price", FilterType::Between);
    filter.min = Some(json!(10));

    let request = QueryRequest {
        rows: vec![DimensionRef::new("Dim Item", "Item Description")],
        filters: vec![filter],
        ..Default::default()
    };

    let result = compile(&request, &options());
    assert!(matches!(
        result,
        Err(CompileError::Request(RequestError::IncompleteBetween))
    ));
}

#[test]
fn test_no_axes_is_invalid_request() {
    let request = QueryRequest {
        measures: vec!["Total Item Price".to_string()],
        ..Default::default()
    };

    let result = compile(&request, &options());
    assert!(matches!(
        result,
        Err(CompileError::Request(RequestError::EmptyAxes))
    ));
}

#[test]
fn test_aggregation_hint_augments_filters() {
    let request = QueryRequest {
        rows: vec![DimensionRef::new("Dim Store", "Store ID")],
        measures: vec!["Total Item Price".to_string()],
        filters: vec![
            Filter::new("Dim Time", "Year", FilterType::Equals).with_value(json!("2023"))
        ],
        aggregation_hint: Some(AggregationHint {
            dimension: "Dim Time".to_string(),
            level: "Quarter".to_string(),
        }),
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();
    assert!(output.mdx.ends_with(
        "WHERE ([Dim Time].[Year].&[2023], [Dim Time].[Quarter].MEMBERS)"
    ));
}

#[test]
fn test_column_dimension_crossjoins_measures() {
    let request = QueryRequest {
        rows: vec![DimensionRef::new("Dim Store", "Store ID")],
        columns: vec![DimensionRef::new("Dim Time", "Year")],
        measures: vec!["Quantity Sale".to_string()],
        ..Default::default()
    };

    let output = compile(&request, &options()).unwrap();

    insta::assert_snapshot!(output.mdx, @r"
SELECT
  {CROSSJOIN([Dim Time].[Year].MEMBERS, {[Measures].[Quantity Sale]})} ON COLUMNS,
  {NONEMPTY([Dim Store].[Store ID].MEMBERS)} ON ROWS
FROM [DW]
");
}

#[test]
fn test_custom_cube_name_in_from_clause() {
    let request = QueryRequest {
        rows: vec![DimensionRef::new("Dim Store", "Store ID")],
        ..Default::default()
    };

    let output = compile(&request, &options().with_cube("Sales")).unwrap();
    assert!(output.mdx.contains("FROM [Sales]"));
}
