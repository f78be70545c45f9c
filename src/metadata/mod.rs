//! Published cube catalog.
//!
//! The dimensions, hierarchy levels and measures the service exposes on
//! `/api/metadata`. The cube schema is fixed per deployment, so this is a
//! static table rather than an introspection round trip.

use std::collections::BTreeMap;

use serde::Serialize;

/// The dimension/level and measure catalog of the published cube.
#[derive(Debug, Clone, Serialize)]
pub struct CubeMetadata {
    /// Dimension name to ordered hierarchy levels.
    pub dimensions: BTreeMap<String, Vec<String>>,
    /// Published measures, in display order.
    pub measures: Vec<String>,
}

/// The catalog of the warehouse cube this service fronts.
pub fn published() -> CubeMetadata {
    let mut dimensions = BTreeMap::new();
    dimensions.insert(
        "Dim Time".to_string(),
        vec!["Year", "Quarter", "Month", "Day"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    dimensions.insert(
        "Dim Store".to_string(),
        vec![
            "Store Name",
            "Store ID",
            "City Name",
            "City ID",
            "State",
            "Office Address",
            "Phone Number",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    );
    dimensions.insert(
        "Dim Customer".to_string(),
        vec!["Customer ID", "Customer Name"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    dimensions.insert(
        "Dim Item".to_string(),
        vec![
            "Item Description",
            "Item ID",
            "Item Size",
            "Item Weight",
            "Price",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    );

    CubeMetadata {
        dimensions,
        measures: vec![
            "Total Item Price".to_string(),
            "Quantity Sale".to_string(),
            "Quantity Ordered".to_string(),
        ],
    }
}
