//! Axum web server for the cube API.
//!
//! Thin routing layer: every endpoint shapes a [`QueryRequest`], hands it
//! to the compiler, runs the MDX through the bridge, and normalizes the
//! result. The generated MDX is echoed in every response that produced
//! one, success or failure.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::compile::{compile, CompileOptions};
use crate::config::Settings;
use crate::engine::{BridgeClient, BridgeExecutor, ConnectionParams, CubeExecutor};
use crate::metadata::{self, CubeMetadata};
use crate::request::defaults::{apply_defaults, Operation};
use crate::request::{DrillDirection, DrillSpec, Filter, QueryRequest};
use crate::result::{grand_totals, normalize, Table};

/// Application state shared across handlers.
pub struct AppState {
    /// Executor running MDX against the cube.
    pub executor: Arc<dyn CubeExecutor>,
    /// Service configuration.
    pub settings: Settings,
}

/// Build the axum router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/metadata", get(get_metadata))
        .route("/api/data", get(get_data))
        .route("/api/query", post(execute_query))
        .route("/api/drill", post(drill))
        .route("/api/aggregate", post(aggregate))
        .route("/api/health", get(health))
        .layer(cors)
        .with_state(state)
}

/// Start the web server.
pub async fn serve(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let connection = ConnectionParams {
        server: settings.cube.resolved_server()?,
        catalog: settings.cube.catalog.clone(),
    };

    let client = BridgeClient::spawn_with_settings(&settings).await?;
    let executor = BridgeExecutor::new(client, connection);

    let state = Arc::new(AppState {
        executor: Arc::new(executor),
        settings: settings.clone(),
    });
    let app = router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("Cubist cube service");
    println!("   URL: http://{}", addr);
    println!(
        "   Cube: [{}] in {} on {}",
        settings.cube.name, settings.cube.catalog, settings.cube.server
    );
    println!();
    println!("   Press Ctrl+C to stop");

    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// Response shapes
// ============================================================================

/// Standard query response: normalized table plus the MDX that produced
/// it, or an error message (still carrying the MDX when one was built).
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Table>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mdx: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Totals-shape response for the aggregate endpoint.
#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mdx: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

// ============================================================================
// Pipeline
// ============================================================================

fn compile_options(settings: &Settings) -> CompileOptions {
    CompileOptions::default().with_cube(&settings.cube.name)
}

/// The request pipeline shared by every table-shaped endpoint: defaults,
/// compile, execute, normalize.
async fn run_query(
    state: &AppState,
    mut request: QueryRequest,
    operation: Operation,
) -> QueryResponse {
    apply_defaults(&mut request, operation);

    let output = match compile(&request, &compile_options(&state.settings)) {
        Ok(output) => output,
        Err(e) => {
            return QueryResponse {
                data: None,
                mdx: None,
                error: Some(e.to_string()),
            };
        }
    };

    tracing::debug!(mdx = %output.mdx, "compiled request");

    match state.executor.execute(&output.mdx).await {
        Ok(raw) => QueryResponse {
            data: Some(normalize(raw)),
            mdx: Some(output.mdx),
            error: None,
        },
        Err(e) => {
            tracing::error!(error = %e, "query execution failed");
            QueryResponse {
                data: None,
                mdx: Some(output.mdx),
                error: Some(e.to_string()),
            }
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/metadata - published dimensions and measures.
async fn get_metadata() -> Json<CubeMetadata> {
    Json(metadata::published())
}

/// GET /api/data - the fixed default browse query.
async fn get_data(State(state): State<Arc<AppState>>) -> Json<QueryResponse> {
    let response = run_query(&state, QueryRequest::default(), Operation::Data).await;
    Json(response)
}

/// POST /api/query - a full caller-shaped query.
async fn execute_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Json<QueryResponse> {
    let response = run_query(&state, request, Operation::Query).await;
    Json(response)
}

/// Drill request wire shape: the drill fields arrive flat, as the
/// navigation UI sends them.
#[derive(Debug, Deserialize)]
struct DrillRequest {
    dimension: String,
    #[serde(rename = "currentLevel")]
    current_level: String,
    #[serde(rename = "targetLevel")]
    target_level: String,
    #[serde(default)]
    member: Option<String>,
    #[serde(default)]
    direction: DrillDirection,
    #[serde(default)]
    measures: Vec<String>,
    #[serde(default)]
    filters: Vec<Filter>,
}

impl From<DrillRequest> for QueryRequest {
    fn from(request: DrillRequest) -> Self {
        QueryRequest {
            measures: request.measures,
            filters: request.filters,
            drill: Some(DrillSpec {
                dimension: request.dimension,
                current_level: request.current_level,
                target_level: request.target_level,
                member: request.member,
                direction: request.direction,
            }),
            ..Default::default()
        }
    }
}

/// POST /api/drill - navigate relative to a displayed member.
async fn drill(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DrillRequest>,
) -> Json<QueryResponse> {
    let response = run_query(&state, request.into(), Operation::Drill).await;
    Json(response)
}

/// POST /api/aggregate - run a query and reduce it to per-measure totals.
async fn aggregate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Json<TotalsResponse> {
    let response = run_query(&state, request, Operation::Aggregate).await;
    Json(TotalsResponse {
        totals: response.data.as_ref().map(grand_totals),
        mdx: response.mdx,
        error: response.error,
    })
}

/// GET /api/health - bridge and cube connectivity.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    match state.executor.ping().await {
        Ok(ok) => Json(HealthResponse { ok, error: None }),
        Err(e) => Json(HealthResponse {
            ok: false,
            error: Some(e.to_string()),
        }),
    }
}
