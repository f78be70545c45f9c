//! Normalizer properties: zero-fill, relabeling, vacuous-row suppression
//! and the never-empty guarantee.

use std::collections::BTreeMap;

use cubist::result::{grand_totals, normalize, Table};
use serde_json::{json, Value};

const MEASURE: &str = "[Measures].[Total Item Price]";
const CAPTION: &str = "[Dim Item].[Item ID].[MEMBER_CAPTION]";

fn row(caption: Value, measure: Value) -> BTreeMap<String, Value> {
    BTreeMap::from([
        (CAPTION.to_string(), caption),
        (MEASURE.to_string(), measure),
    ])
}

fn table(rows: Vec<BTreeMap<String, Value>>) -> Table {
    Table {
        columns: vec![CAPTION.to_string(), MEASURE.to_string()],
        rows,
    }
}

#[test]
fn null_measures_are_zero_filled() {
    let normalized = normalize(table(vec![
        row(json!("Widget"), Value::Null),
        row(json!("Gadget"), json!(42)),
    ]));

    assert_eq!(normalized.rows[0][MEASURE], json!(0));
    assert_eq!(normalized.rows[1][MEASURE], json!(42));
}

#[test]
fn first_row_null_caption_becomes_grand_total() {
    let normalized = normalize(table(vec![
        row(Value::Null, json!(250)),
        row(json!("Widget"), json!(120)),
    ]));

    assert_eq!(normalized.rows[0][CAPTION], json!("Total"));
    assert_eq!(normalized.rows[1][CAPTION], json!("Widget"));
}

#[test]
fn unknown_captions_read_as_total() {
    let normalized = normalize(table(vec![row(json!("Unknown"), json!(10))]));
    assert_eq!(normalized.rows[0][CAPTION], json!("Total"));
}

#[test]
fn null_total_row_survives_unknown_row_dropped() {
    // The documented two-row case: a null-captioned grand-total row and a
    // fully-Unknown row. Relabeling runs first; the null-origin total row
    // is never vacuous, the Unknown-origin row is and goes because a row
    // remains.
    let normalized = normalize(table(vec![
        row(Value::Null, Value::Null),
        row(json!("Unknown"), json!(120)),
    ]));

    assert_eq!(normalized.rows.len(), 1);
    assert_eq!(normalized.rows[0][CAPTION], json!("Total"));
    assert_eq!(normalized.rows[0][MEASURE], json!(0));
}

#[test]
fn sole_unknown_row_is_kept() {
    // Never-empty guarantee: a one-row table whose sole row is
    // all-Unknown is not dropped.
    let normalized = normalize(table(vec![row(json!("Unknown"), Value::Null)]));

    assert_eq!(normalized.rows.len(), 1);
    assert_eq!(normalized.rows[0][CAPTION], json!("Total"));
}

#[test]
fn all_vacuous_rows_are_kept() {
    let normalized = normalize(table(vec![
        row(json!("Unknown"), json!(1)),
        row(json!("Unknown"), json!(2)),
    ]));

    assert_eq!(normalized.rows.len(), 2);
}

#[test]
fn partially_unknown_rows_are_not_vacuous() {
    let second_caption = "[Dim Store].[Store ID].[MEMBER_CAPTION]";
    let rows = vec![
        BTreeMap::from([
            (CAPTION.to_string(), json!("Unknown")),
            (second_caption.to_string(), json!("Store 7")),
            (MEASURE.to_string(), json!(10)),
        ]),
        BTreeMap::from([
            (CAPTION.to_string(), json!("Widget")),
            (second_caption.to_string(), json!("Store 9")),
            (MEASURE.to_string(), json!(20)),
        ]),
    ];
    let normalized = normalize(Table {
        columns: vec![
            CAPTION.to_string(),
            second_caption.to_string(),
            MEASURE.to_string(),
        ],
        rows,
    });

    assert_eq!(normalized.rows.len(), 2);
    assert_eq!(normalized.rows[0][CAPTION], json!("Total"));
    assert_eq!(normalized.rows[0][second_caption], json!("Store 7"));
}

#[test]
fn row_and_column_order_preserved() {
    let normalized = normalize(table(vec![
        row(json!("Zebra"), json!(1)),
        row(json!("Apple"), json!(2)),
        row(json!("Mango"), json!(3)),
    ]));

    let captions: Vec<&Value> = normalized.rows.iter().map(|r| &r[CAPTION]).collect();
    assert_eq!(
        captions,
        vec![&json!("Zebra"), &json!("Apple"), &json!("Mango")]
    );
    assert_eq!(
        normalized.columns,
        vec![CAPTION.to_string(), MEASURE.to_string()]
    );
}

#[test]
fn normalize_is_idempotent() {
    let once = normalize(table(vec![
        row(Value::Null, json!(250)),
        row(json!("Unknown"), json!(120)),
        row(json!("Widget"), Value::Null),
    ]));
    let twice = normalize(once.clone());

    assert_eq!(once, twice);
}

#[test]
fn totals_come_from_grand_total_row() {
    let normalized = normalize(table(vec![
        row(Value::Null, json!(250)),
        row(json!("Widget"), json!(120)),
        row(json!("Gadget"), json!(130)),
    ]));

    let totals = grand_totals(&normalized);
    assert_eq!(totals["Total Item Price"], 250.0);
}

#[test]
fn totals_are_summed_without_grand_total_row() {
    let normalized = normalize(table(vec![
        row(json!("Widget"), json!(120)),
        row(json!("Gadget"), json!(30)),
    ]));

    let totals = grand_totals(&normalized);
    assert_eq!(totals["Total Item Price"], 150.0);
}
