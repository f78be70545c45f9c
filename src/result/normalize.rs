//! Raw-table cleanup.
//!
//! The engine hands back rows with null measure cells, a null-captioned
//! grand-total row, and `Unknown` placeholder captions. Normalization
//! turns that into something a front end can render directly:
//!
//! 1. null measure cells become `0`
//! 2. a null caption in the first row becomes `Total` (the grand total)
//! 3. `Unknown` captions become `Total`
//! 4. rows that were `Unknown` in every caption column are dropped, as
//!    long as dropping them leaves the table non-empty
//!
//! Running it twice changes nothing.

use serde_json::Value;

use super::{measure_display_name, Table, TOTAL_CAPTION, UNKNOWN_CAPTION};

/// Normalize a raw engine table for display.
pub fn normalize(mut table: Table) -> Table {
    let measure_columns: Vec<String> = table
        .measure_columns()
        .into_iter()
        .map(String::from)
        .collect();
    let caption_columns: Vec<String> = table
        .caption_columns()
        .into_iter()
        .map(String::from)
        .collect();

    // A row is vacuous when every caption cell held the Unknown
    // placeholder before relabeling. A first row relabeled from null is a
    // grand total, not vacuous. Decided before any rewriting.
    let vacuous: Vec<bool> = table
        .rows
        .iter()
        .map(|row| {
            !caption_columns.is_empty()
                && caption_columns.iter().all(|column| {
                    row.get(column).and_then(Value::as_str) == Some(UNKNOWN_CAPTION)
                })
        })
        .collect();

    for (i, row) in table.rows.iter_mut().enumerate() {
        for column in &measure_columns {
            let missing = matches!(row.get(column), None | Some(Value::Null));
            if missing {
                row.insert(column.clone(), Value::from(0));
            }
        }

        for column in &caption_columns {
            let needs_total = match row.get(column) {
                None | Some(Value::Null) => i == 0,
                Some(value) => value.as_str() == Some(UNKNOWN_CAPTION),
            };
            if needs_total {
                row.insert(column.clone(), Value::from(TOTAL_CAPTION));
            }
        }
    }

    // Drop vacuous rows, but never normalize the table down to zero rows:
    // when every row is vacuous they all stay.
    let survivors = vacuous.iter().filter(|v| !**v).count();
    if table.rows.len() > 1 && survivors > 0 {
        let mut flags = vacuous.into_iter();
        table.rows.retain(|_| !flags.next().unwrap());
    }

    table
}

/// Reduce a normalized table to per-measure totals.
///
/// When the first row is a grand-total row (every caption reads `Total`)
/// its measure values are the totals; otherwise each measure is summed
/// over all rows.
pub fn grand_totals(table: &Table) -> std::collections::BTreeMap<String, f64> {
    let measure_columns = table.measure_columns();
    let caption_columns = table.caption_columns();

    if let Some(first) = table.rows.first() {
        let is_total_row = !caption_columns.is_empty()
            && caption_columns.iter().all(|column| {
                first.get(*column).and_then(Value::as_str) == Some(TOTAL_CAPTION)
            });
        if is_total_row {
            return measure_columns
                .iter()
                .map(|column| {
                    (
                        measure_display_name(column).to_string(),
                        cell_number(first.get(*column)),
                    )
                })
                .collect();
        }
    }

    let mut totals = std::collections::BTreeMap::new();
    for column in &measure_columns {
        let sum: f64 = table
            .rows
            .iter()
            .map(|row| cell_number(row.get(*column)))
            .sum();
        totals.insert(measure_display_name(column).to_string(), sum);
    }
    totals
}

fn cell_number(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(0.0)
}
