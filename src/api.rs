//! REST API over the request orchestrator.
//!
//! Provides endpoints for:
//! - Session state and snapshot reload
//! - View activation and scene export
//! - Result panels
//! - The five optimization operations
//! - Swagger UI at /q/swagger-ui

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::dto::{NetworkRequest, RouteRequest, SignalRequest};
use crate::error::PlannerError;
use crate::orchestrator::{PanelEntry, RequestOrchestrator, SessionState};
use crate::presenter::{present_error, ErrorNotice};
use crate::render::RedrawReport;
use crate::surface::SceneState;
use crate::view::ViewKind;

/// Application state shared across handlers.
pub struct AppState {
    pub orchestrator: RequestOrchestrator,
    pub backend_url: String,
}

/// Creates the API router with CORS and Swagger UI enabled.
pub fn create_router(orchestrator: RequestOrchestrator, backend_url: impl Into<String>) -> Router {
    let state = Arc::new(AppState {
        orchestrator,
        backend_url: backend_url.into(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & Info
        .route("/health", get(health))
        .route("/info", get(info))
        // Session
        .route("/api/session", get(get_session))
        .route("/api/session/reload", post(reload_session))
        // Views and panels
        .route("/api/views/{kind}", get(get_view))
        .route("/api/views/{kind}/activate", post(activate_view))
        .route("/api/panels/{kind}", get(get_panel))
        // Operations
        .route("/api/operations/network", post(run_network))
        .route("/api/operations/route", post(run_route))
        .route("/api/operations/emergency", post(run_emergency))
        .route("/api/operations/transport", post(run_transport))
        .route("/api/operations/signals", post(run_signals))
        .merge(SwaggerUi::new("/q/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(state)
}

/// Status code an operation failure answers with.
fn status_for(err: &PlannerError) -> StatusCode {
    match err {
        PlannerError::SnapshotNotLoaded => StatusCode::CONFLICT,
        PlannerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PlannerError::Snapshot(_) | PlannerError::Request(_) => StatusCode::BAD_GATEWAY,
        PlannerError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Error body for endpoints that are not tied to one view's panel.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(err: &PlannerError) -> ApiError {
    (
        status_for(err),
        Json(ErrorResponse {
            message: err.to_string(),
        }),
    )
}

// ============================================================================
// Health & Info
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Status indicator ("UP" when healthy).
    pub status: &'static str,
}

/// GET /health - Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

/// Application info response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    /// Optimization backend this instance talks to.
    pub backend_url: String,
}

/// GET /info - Application info endpoint.
#[utoipa::path(
    get,
    path = "/info",
    responses((status = 200, description = "Application info", body = InfoResponse))
)]
async fn info(State(state): State<Arc<AppState>>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "City Planner",
        version: env!("CARGO_PKG_VERSION"),
        backend_url: state.backend_url.clone(),
    })
}

// ============================================================================
// Session
// ============================================================================

/// GET /api/session - Load status, selection inputs and visible view.
#[utoipa::path(
    get,
    path = "/api/session",
    responses((status = 200, description = "Session state", body = SessionState))
)]
async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionState> {
    Json(state.orchestrator.with_session(|s| s.state()))
}

/// POST /api/session/reload - Fetch a fresh snapshot from the backend.
#[utoipa::path(
    post,
    path = "/api/session/reload",
    responses(
        (status = 200, description = "Snapshot installed", body = SessionState),
        (status = 502, description = "Snapshot could not be loaded", body = ErrorResponse)
    )
)]
async fn reload_session(State(state): State<Arc<AppState>>) -> Result<Json<SessionState>, ApiError> {
    state
        .orchestrator
        .load_snapshot()
        .await
        .map_err(|e| api_error(&e))?;
    Ok(Json(state.orchestrator.with_session(|s| s.state())))
}

// ============================================================================
// Views and panels
// ============================================================================

/// GET /api/views/{kind} - Scene of an initialized view.
#[utoipa::path(
    get,
    path = "/api/views/{kind}",
    params(("kind" = ViewKind, Path, description = "View kind")),
    responses(
        (status = 200, description = "Scene retrieved", body = SceneState),
        (status = 404, description = "View not initialized yet")
    )
)]
async fn get_view(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<ViewKind>,
) -> Result<Json<SceneState>, StatusCode> {
    state
        .orchestrator
        .with_session(|s| s.scene(kind))
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// POST /api/views/{kind}/activate - Show a view, initializing it if needed.
#[utoipa::path(
    post,
    path = "/api/views/{kind}/activate",
    params(("kind" = ViewKind, Path, description = "View kind")),
    responses(
        (status = 200, description = "View is now visible", body = SceneState),
        (status = 409, description = "No snapshot loaded", body = ErrorResponse)
    )
)]
async fn activate_view(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<ViewKind>,
) -> Result<Json<SceneState>, ApiError> {
    state.orchestrator.activate(kind).map_err(|e| api_error(&e))?;
    state
        .orchestrator
        .with_session(|s| s.scene(kind))
        .map(Json)
        .ok_or_else(|| api_error(&PlannerError::SnapshotNotLoaded))
}

/// GET /api/panels/{kind} - Summary or error notice for a view.
#[utoipa::path(
    get,
    path = "/api/panels/{kind}",
    params(("kind" = ViewKind, Path, description = "View kind")),
    responses((status = 200, description = "Panel content", body = PanelEntry))
)]
async fn get_panel(State(state): State<Arc<AppState>>, Path(kind): Path<ViewKind>) -> Json<PanelEntry> {
    Json(state.orchestrator.with_session(|s| s.panel(kind)))
}

// ============================================================================
// Operations
// ============================================================================

/// Result of one operation: the redraw, the panel and the view's scene.
#[derive(Debug, Serialize, ToSchema)]
pub struct OperationResponse {
    /// Absent when the operation failed.
    pub report: Option<RedrawReport>,
    pub panel: PanelEntry,
    pub scene: Option<SceneState>,
    /// Set when the operation failed.
    pub error: Option<ErrorNotice>,
}

fn respond(
    state: &AppState,
    view: ViewKind,
    outcome: Result<RedrawReport, PlannerError>,
) -> (StatusCode, Json<OperationResponse>) {
    let (status, report, error) = match outcome {
        Ok(report) => (StatusCode::OK, Some(report), None),
        Err(e) => (status_for(&e), None, Some(present_error(view, &e))),
    };
    let (panel, scene) = state
        .orchestrator
        .with_session(|s| (s.panel(view), s.scene(view)));
    (
        status,
        Json(OperationResponse {
            report,
            panel,
            scene,
            error,
        }),
    )
}

/// POST /api/operations/network - Optimize the road network.
#[utoipa::path(
    post,
    path = "/api/operations/network",
    request_body = NetworkRequest,
    responses(
        (status = 200, description = "Network view redrawn", body = OperationResponse),
        (status = 409, description = "No snapshot loaded", body = OperationResponse),
        (status = 502, description = "Backend failure", body = OperationResponse)
    )
)]
async fn run_network(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NetworkRequest>,
) -> (StatusCode, Json<OperationResponse>) {
    let outcome = state.orchestrator.optimize_network(request).await;
    respond(&state, ViewKind::Network, outcome)
}

/// POST /api/operations/route - Shortest route between two locations.
#[utoipa::path(
    post,
    path = "/api/operations/route",
    request_body = RouteRequest,
    responses(
        (status = 200, description = "Route view redrawn", body = OperationResponse),
        (status = 502, description = "Backend failure or no path", body = OperationResponse)
    )
)]
async fn run_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RouteRequest>,
) -> (StatusCode, Json<OperationResponse>) {
    let outcome = state.orchestrator.shortest_path(request).await;
    respond(&state, ViewKind::Route, outcome)
}

/// POST /api/operations/emergency - Fastest route to a hospital.
#[utoipa::path(
    post,
    path = "/api/operations/emergency",
    request_body = RouteRequest,
    responses(
        (status = 200, description = "Emergency view redrawn", body = OperationResponse),
        (status = 422, description = "Destination is not a medical facility", body = OperationResponse),
        (status = 502, description = "Backend failure or no path", body = OperationResponse)
    )
)]
async fn run_emergency(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RouteRequest>,
) -> (StatusCode, Json<OperationResponse>) {
    let outcome = state.orchestrator.emergency_route(request).await;
    respond(&state, ViewKind::Emergency, outcome)
}

/// POST /api/operations/transport - Optimize public transport.
#[utoipa::path(
    post,
    path = "/api/operations/transport",
    responses(
        (status = 200, description = "Transport view redrawn", body = OperationResponse),
        (status = 502, description = "Backend failure", body = OperationResponse)
    )
)]
async fn run_transport(State(state): State<Arc<AppState>>) -> (StatusCode, Json<OperationResponse>) {
    let outcome = state.orchestrator.optimize_transport().await;
    respond(&state, ViewKind::Transport, outcome)
}

/// POST /api/operations/signals - Optimize traffic signal timing.
#[utoipa::path(
    post,
    path = "/api/operations/signals",
    request_body = SignalRequest,
    responses(
        (status = 200, description = "Signals view redrawn", body = OperationResponse),
        (status = 502, description = "Backend failure", body = OperationResponse)
    )
)]
async fn run_signals(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignalRequest>,
) -> (StatusCode, Json<OperationResponse>) {
    let outcome = state.orchestrator.optimize_signals(request).await;
    respond(&state, ViewKind::Signals, outcome)
}

// ============================================================================
// OpenAPI
// ============================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        info,
        get_session,
        reload_session,
        get_view,
        activate_view,
        get_panel,
        run_network,
        run_route,
        run_emergency,
        run_transport,
        run_signals,
    ),
    components(schemas(
        HealthResponse,
        InfoResponse,
        ErrorResponse,
        OperationResponse,
        SessionState,
        SceneState,
        PanelEntry,
        RedrawReport,
        NetworkRequest,
        RouteRequest,
        SignalRequest,
        ViewKind,
    ))
)]
pub struct ApiDoc;
