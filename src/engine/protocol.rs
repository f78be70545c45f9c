//! Protocol types for bridge communication.
//!
//! The bridge is a small companion process that holds the ADOMD/XMLA
//! connection to the cube server and speaks NDJSON over stdin/stdout.
//! These types mirror its envelope format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::result::Table;

// ============================================================================
// Request/Response Envelope
// ============================================================================

/// Request envelope sent to the bridge.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope {
    /// Unique request ID for correlation.
    pub id: String,
    /// Method name (e.g., "cube.execute").
    pub method: String,
    /// Method-specific parameters.
    pub params: Value,
}

/// Response envelope received from the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    /// Request ID this response corresponds to.
    pub id: String,
    /// Whether the request succeeded.
    pub success: bool,
    /// Result data (present if success = true).
    #[serde(default)]
    pub result: Option<Value>,
    /// Error information (present if success = false).
    #[serde(default)]
    pub error: Option<ErrorInfo>,
}

/// Error information in a failed response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorInfo {
    /// Error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

// ============================================================================
// Connection Parameters (included in all requests)
// ============================================================================

/// Cube connection parameters. The bridge opens a session scoped to the
/// request and closes it when the request finishes, success or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// Cube server address.
    pub server: String,
    /// Catalog (database) holding the cube.
    pub catalog: String,
}

// ============================================================================
// Methods
// ============================================================================

/// Method name constants.
pub mod methods {
    pub const EXECUTE: &str = "cube.execute";
    pub const PING: &str = "cube.ping";
}

/// Parameters for `cube.execute`.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteParams {
    #[serde(flatten)]
    pub connection: ConnectionParams,
    /// The MDX text to run.
    pub mdx: String,
}

/// Result of `cube.execute`: the raw table.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteResponse {
    /// Column identifiers in result order.
    pub columns: Vec<String>,
    /// Rows in result order.
    pub rows: Vec<BTreeMap<String, Value>>,
}

impl From<ExecuteResponse> for Table {
    fn from(response: ExecuteResponse) -> Self {
        Table {
            columns: response.columns,
            rows: response.rows,
        }
    }
}

/// Parameters for `cube.ping`.
#[derive(Debug, Clone, Serialize)]
pub struct PingParams {
    #[serde(flatten)]
    pub connection: ConnectionParams,
}

/// Result of `cube.ping`.
#[derive(Debug, Clone, Deserialize)]
pub struct PingResponse {
    pub ok: bool,
}
