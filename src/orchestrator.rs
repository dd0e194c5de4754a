//! Session state and the operations that drive it.
//!
//! # Overview
//!
//! - [`Session`]: owns the snapshot, the views, the result panels and the
//!   selection inputs
//! - [`RequestOrchestrator`]: validates, calls the backend, then fans the
//!   response out to the presenter and the renderer
//!
//! The session lives behind a `parking_lot::Mutex` that is only taken
//! between awaits, so a redraw always runs under one acquisition and two
//! redraws of the same view never interleave.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument, Span};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::client::Backend;
use crate::dto::{NetworkRequest, OptimizationResult, RouteRequest, SignalRequest};
use crate::error::{PlannerError, RequestError, SnapshotError, ValidationError};
use crate::presenter::{present, present_error, PanelContent};
use crate::render::{redraw, RedrawReport};
use crate::snapshot::{GraphSnapshot, SelectionInputs, SnapshotCounts};
use crate::surface::{DrawingSurface, Scene, SceneState};
use crate::view::{MapDefaults, ViewKind, ViewRegistry};

/// Outcome of the most recent snapshot load.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadStatus {
    Pending,
    Loaded { counts: SnapshotCounts },
    Failed { message: String },
}

/// One result panel.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PanelEntry {
    pub view: ViewKind,
    pub content: PanelContent,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Everything one operator session owns.
#[derive(Debug)]
pub struct Session<S> {
    snapshot: Option<Arc<GraphSnapshot>>,
    registry: ViewRegistry<S>,
    panels: BTreeMap<ViewKind, PanelEntry>,
    inputs: SelectionInputs,
    load_status: LoadStatus,
}

impl<S: DrawingSurface> Session<S> {
    pub fn new(defaults: MapDefaults) -> Self {
        Self {
            snapshot: None,
            registry: ViewRegistry::new(defaults),
            panels: BTreeMap::new(),
            inputs: SelectionInputs::default(),
            load_status: LoadStatus::Pending,
        }
    }

    pub fn snapshot(&self) -> Option<&Arc<GraphSnapshot>> {
        self.snapshot.as_ref()
    }

    pub fn registry(&self) -> &ViewRegistry<S> {
        &self.registry
    }

    pub fn inputs(&self) -> &SelectionInputs {
        &self.inputs
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    /// Current panel for `view`; empty until an operation writes to it.
    pub fn panel(&self, view: ViewKind) -> PanelEntry {
        self.panels.get(&view).cloned().unwrap_or(PanelEntry {
            view,
            content: PanelContent::Empty,
            updated_at: None,
        })
    }

    fn require_snapshot(&self) -> Result<Arc<GraphSnapshot>, PlannerError> {
        self.snapshot.clone().ok_or(PlannerError::SnapshotNotLoaded)
    }

    /// Replaces the snapshot, repopulates the inputs and shows the network.
    ///
    /// Views already initialized get their context redrawn from the new
    /// snapshot; their result overlays stay until the next redraw.
    fn install(&mut self, snapshot: GraphSnapshot) -> SnapshotCounts {
        let counts = snapshot.counts();
        self.inputs = SelectionInputs::from_snapshot(&snapshot);
        let snapshot = Arc::new(snapshot);
        self.registry.refresh_context(&snapshot);
        self.registry.activate(ViewKind::Network, &snapshot);
        self.snapshot = Some(snapshot);
        self.load_status = LoadStatus::Loaded { counts };
        counts
    }

    fn activate(&mut self, view: ViewKind) -> Result<(), PlannerError> {
        let snapshot = self.require_snapshot()?;
        self.registry.activate(view, &snapshot);
        Ok(())
    }

    /// Writes the summary and redraws the result's view.
    fn apply(&mut self, result: OptimizationResult) -> Result<RedrawReport, PlannerError> {
        let snapshot = self.require_snapshot()?;
        let kind = result.view_kind();
        let summary = present(&snapshot, &result);
        let view = self.registry.ensure_initialized(kind, &snapshot);
        let report = redraw(view, &snapshot, &result)?;
        self.set_panel(kind, PanelContent::Summary(summary));
        Ok(report)
    }

    fn fail(&mut self, view: ViewKind, err: &PlannerError) {
        self.set_panel(view, PanelContent::Error(present_error(view, err)));
    }

    fn set_panel(&mut self, view: ViewKind, content: PanelContent) {
        self.panels.insert(
            view,
            PanelEntry {
                view,
                content,
                updated_at: Some(Utc::now()),
            },
        );
    }
}

impl Session<Scene> {
    /// Exported scene of an initialized view.
    pub fn scene(&self, view: ViewKind) -> Option<SceneState> {
        self.registry.get(view).map(|v| v.surface().state())
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            load_status: self.load_status.clone(),
            visible_view: self.registry.visible(),
            initialized_views: ViewKind::ALL
                .into_iter()
                .filter(|k| self.registry.is_initialized(*k))
                .collect(),
            inputs: self.inputs.clone(),
        }
    }
}

/// Serializable overview of a session.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionState {
    pub load_status: LoadStatus,
    pub visible_view: Option<ViewKind>,
    pub initialized_views: Vec<ViewKind>,
    pub inputs: SelectionInputs,
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Runs operations against the backend and applies their results.
///
/// Cheap to clone; clones share the backend and the session.
#[derive(Clone)]
pub struct RequestOrchestrator {
    backend: Arc<dyn Backend>,
    session: Arc<Mutex<Session<Scene>>>,
}

fn operation_span(operation: &'static str) -> Span {
    info_span!("operation", operation, request_id = %Uuid::new_v4())
}

impl RequestOrchestrator {
    pub fn new(backend: Arc<dyn Backend>, defaults: MapDefaults) -> Self {
        Self {
            backend,
            session: Arc::new(Mutex::new(Session::new(defaults))),
        }
    }

    /// Runs `f` with the session locked. `f` must not block.
    pub fn with_session<R>(&self, f: impl FnOnce(&Session<Scene>) -> R) -> R {
        f(&self.session.lock())
    }

    /// Fetches and installs a fresh snapshot.
    ///
    /// Nothing is installed on failure; the load status records the error
    /// and the previous snapshot, if any, stays in place.
    pub async fn load_snapshot(&self) -> Result<SnapshotCounts, PlannerError> {
        async {
            let loaded = self
                .backend
                .road_network()
                .await
                .map_err(|e| match e {
                    RequestError::Decode(msg) => SnapshotError::Decode(msg),
                    other => SnapshotError::Request(other),
                })
                .and_then(GraphSnapshot::load);

            let mut session = self.session.lock();
            match loaded {
                Ok(snapshot) => {
                    let counts = session.install(snapshot);
                    info!(
                        neighborhoods = counts.neighborhoods,
                        facilities = counts.facilities,
                        existing_roads = counts.existing_roads,
                        potential_roads = counts.potential_roads,
                        "Snapshot loaded"
                    );
                    Ok(counts)
                }
                Err(e) => {
                    warn!(error = %e, "Snapshot load failed");
                    session.load_status = LoadStatus::Failed {
                        message: e.to_string(),
                    };
                    Err(e.into())
                }
            }
        }
        .instrument(operation_span("load_snapshot"))
        .await
    }

    /// Brings a view to the foreground.
    pub fn activate(&self, view: ViewKind) -> Result<(), PlannerError> {
        self.session.lock().activate(view)
    }

    pub async fn optimize_network(&self, request: NetworkRequest) -> Result<RedrawReport, PlannerError> {
        async {
            self.precheck(ViewKind::Network)?;
            let outcome = self.backend.optimize_network(&request).await;
            self.finish(ViewKind::Network, outcome.map(OptimizationResult::Network))
        }
        .instrument(operation_span("optimize_network"))
        .await
    }

    pub async fn shortest_path(&self, request: RouteRequest) -> Result<RedrawReport, PlannerError> {
        async {
            self.precheck(ViewKind::Route)?;
            let outcome = self.backend.shortest_path(&request).await;
            self.finish(ViewKind::Route, outcome.map(OptimizationResult::Route))
        }
        .instrument(operation_span("shortest_path"))
        .await
    }

    /// Emergency route to a hospital.
    ///
    /// A destination that is not a medical facility is rejected locally and
    /// never sent to the backend.
    pub async fn emergency_route(&self, request: RouteRequest) -> Result<RedrawReport, PlannerError> {
        async {
            let snapshot = self.precheck(ViewKind::Emergency)?;
            if !snapshot.is_medical(&request.end) {
                let err = PlannerError::from(ValidationError::NotMedicalDestination(request.end.clone()));
                warn!(destination = %request.end, "Emergency destination rejected");
                self.session.lock().fail(ViewKind::Emergency, &err);
                return Err(err);
            }
            let outcome = self.backend.emergency_route(&request).await;
            self.finish(ViewKind::Emergency, outcome.map(OptimizationResult::Emergency))
        }
        .instrument(operation_span("emergency_route"))
        .await
    }

    pub async fn optimize_transport(&self) -> Result<RedrawReport, PlannerError> {
        async {
            self.precheck(ViewKind::Transport)?;
            let outcome = self.backend.optimize_transport().await;
            self.finish(ViewKind::Transport, outcome.map(OptimizationResult::Transport))
        }
        .instrument(operation_span("optimize_transport"))
        .await
    }

    pub async fn optimize_signals(&self, request: SignalRequest) -> Result<RedrawReport, PlannerError> {
        async {
            self.precheck(ViewKind::Signals)?;
            let outcome = self.backend.optimize_signals(&request).await;
            self.finish(ViewKind::Signals, outcome.map(OptimizationResult::Signals))
        }
        .instrument(operation_span("optimize_signals"))
        .await
    }

    /// Fails the operation up front when no snapshot is loaded.
    fn precheck(&self, view: ViewKind) -> Result<Arc<GraphSnapshot>, PlannerError> {
        let mut session = self.session.lock();
        session.require_snapshot().inspect_err(|e| {
            warn!(view = %view, "Operation before snapshot load");
            session.fail(view, e);
        })
    }

    fn finish(
        &self,
        view: ViewKind,
        outcome: Result<OptimizationResult, RequestError>,
    ) -> Result<RedrawReport, PlannerError> {
        let mut session = self.session.lock();
        let applied = outcome
            .map_err(PlannerError::from)
            .and_then(|result| session.apply(result));
        match &applied {
            Ok(report) => info!(
                view = %view,
                drawn = report.drawn,
                skipped = report.skipped,
                "Operation completed"
            ),
            Err(e) => {
                warn!(view = %view, error = %e, "Operation failed");
                session.fail(view, e);
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::stub::StubBackend;
    use crate::domain::Coord;
    use crate::overlay::{Overlay, OverlayTag, Shape};
    use crate::presenter::Block;
    use crate::snapshot::ControlId;
    use reqwest::StatusCode;
    use serde_json::json;

    fn orchestrator(backend: StubBackend) -> (RequestOrchestrator, Arc<StubBackend>) {
        let backend = Arc::new(backend);
        (
            RequestOrchestrator::new(backend.clone(), MapDefaults::default()),
            backend,
        )
    }

    fn route(start: &str, end: &str) -> RouteRequest {
        RouteRequest {
            start: start.into(),
            end: end.into(),
            time_of_day: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_load_installs_snapshot_and_shows_network() {
        let (orch, _) = orchestrator(StubBackend::cairo());
        let counts = orch.load_snapshot().await.unwrap();
        assert_eq!(counts.neighborhoods, 15);

        orch.with_session(|s| {
            assert_eq!(s.registry().visible(), Some(ViewKind::Network));
            assert!(matches!(s.load_status(), LoadStatus::Loaded { .. }));
            let dest = s.inputs().control(ControlId::EmergencyEnd).unwrap();
            assert_eq!(dest.groups[0].options.len(), 4);
        });
    }

    #[tokio::test]
    async fn test_failed_load_installs_nothing() {
        let (orch, _) = orchestrator(StubBackend::default().with(
            "/api/road_network",
            StatusCode::OK,
            json!({"neighborhoods": [], "facilities": []}),
        ));
        let err = orch.load_snapshot().await.unwrap_err();
        assert_eq!(
            err,
            PlannerError::Snapshot(SnapshotError::MissingField("existing_roads"))
        );
        orch.with_session(|s| {
            assert!(s.snapshot().is_none());
            assert!(matches!(s.load_status(), LoadStatus::Failed { .. }));
            assert!(!s.registry().is_initialized(ViewKind::Network));
        });
    }

    #[tokio::test]
    async fn test_reload_keeps_initialized_views() {
        let (orch, _) = orchestrator(StubBackend::cairo());
        orch.load_snapshot().await.unwrap();
        orch.activate(ViewKind::Route).unwrap();

        orch.load_snapshot().await.unwrap();
        orch.with_session(|s| {
            assert!(s.registry().is_initialized(ViewKind::Route));
            assert_eq!(s.registry().visible(), Some(ViewKind::Network));
            assert!(!s.scene(ViewKind::Route).unwrap().visible);
        });
    }

    #[tokio::test]
    async fn test_reload_redraws_context_from_new_snapshot() {
        let (orch, backend) = orchestrator(StubBackend::cairo());
        orch.load_snapshot().await.unwrap();
        orch.activate(ViewKind::Emergency).unwrap();

        backend.respond(
            "/api/road_network",
            StatusCode::OK,
            json!({
                "neighborhoods": [{"id": 1, "name": "Downtown", "type": "Residential", "population": 5000, "x": 0.0, "y": 0.0}],
                "facilities": [{"id": "H1", "name": "General Hospital", "type": "Medical", "x": 10.0, "y": 10.0}],
                "existing_roads": [{"from": 1, "to": "H1", "distance": 14.1, "capacity": 2000, "condition": 8}],
                "potential_roads": []
            }),
        );
        backend.respond(
            "/api/emergency_route",
            StatusCode::OK,
            json!({
                "path": [1, "H1"],
                "distance": 14.1,
                "time": 12.0,
                "path_details": {"average_congestion": 0.2, "steps": []},
                "path_coords": [[0.0, 0.0], [10.0, 10.0]]
            }),
        );
        orch.load_snapshot().await.unwrap();
        orch.emergency_route(route("1", "H1")).await.unwrap();

        orch.with_session(|s| {
            let scene = s.scene(ViewKind::Emergency).unwrap();
            let hospitals: Vec<&Overlay> = scene
                .overlays
                .iter()
                .map(|o| &o.overlay)
                .filter(|o| o.tag == OverlayTag::Context)
                .collect();
            assert_eq!(hospitals.len(), 1);
            assert!(matches!(hospitals[0].shape, Shape::Marker { at, .. } if at == Coord::new(10.0, 10.0)));
        });
    }

    #[tokio::test]
    async fn test_operation_before_load_is_rejected() {
        let (orch, backend) = orchestrator(StubBackend::cairo());
        let err = orch.optimize_transport().await.unwrap_err();
        assert_eq!(err, PlannerError::SnapshotNotLoaded);
        assert_eq!(backend.calls_to("/api/optimize_transport"), 0);
        orch.with_session(|s| {
            assert!(matches!(s.panel(ViewKind::Transport).content, PanelContent::Error(_)));
        });
    }

    #[tokio::test]
    async fn test_non_medical_emergency_destination_never_sent() {
        let (orch, backend) = orchestrator(StubBackend::cairo());
        orch.load_snapshot().await.unwrap();

        let err = orch.emergency_route(route("1", "F5")).await.unwrap_err();
        assert_eq!(
            err,
            PlannerError::Validation(ValidationError::NotMedicalDestination("F5".into()))
        );
        assert_eq!(backend.calls_to("/api/emergency_route"), 0);
        orch.with_session(|s| match s.panel(ViewKind::Emergency).content {
            PanelContent::Error(notice) => assert!(notice.message.contains("valid hospital")),
            other => panic!("expected error notice, got {:?}", other),
        });
    }

    #[tokio::test]
    async fn test_emergency_route_redraws_emergency_view() {
        let (orch, backend) = orchestrator(StubBackend::cairo());
        backend.respond(
            "/api/emergency_route",
            StatusCode::OK,
            json!({
                "path": [8, 10, "F9"],
                "distance": 5.4,
                "time": 9.8,
                "path_details": {"average_congestion": 0.41, "steps": []},
                "path_coords": [[29.99, 31.21], [30.03, 31.21], [30.03, 31.23]]
            }),
        );
        orch.load_snapshot().await.unwrap();

        let report = orch.emergency_route(route("8", "F9")).await.unwrap();
        assert_eq!(report.view, ViewKind::Emergency);
        assert_eq!(report.drawn, 3);
        assert_eq!(backend.calls()[1].1["end"], "F9");

        orch.with_session(|s| {
            let scene = s.scene(ViewKind::Emergency).unwrap();
            assert!(!scene.visible);
            assert_eq!(s.registry().visible(), Some(ViewKind::Network));
            assert!(matches!(s.panel(ViewKind::Emergency).content, PanelContent::Summary(_)));
        });
    }

    #[tokio::test]
    async fn test_no_path_reply_surfaces_remediation() {
        let (orch, backend) = orchestrator(StubBackend::cairo());
        backend.respond(
            "/api/shortest_path",
            StatusCode::NOT_FOUND,
            json!({"error": "No path found between 1 and 13"}),
        );
        orch.load_snapshot().await.unwrap();

        let err = orch.shortest_path(route("1", "13")).await.unwrap_err();
        assert!(matches!(err, PlannerError::Request(RequestError::Status { status: 404, .. })));
        orch.with_session(|s| match s.panel(ViewKind::Route).content {
            PanelContent::Error(notice) => {
                assert_eq!(notice.message, "No path found between 1 and 13");
                assert_eq!(notice.remediation.len(), 3);
            }
            other => panic!("expected error notice, got {:?}", other),
        });
    }

    #[tokio::test]
    async fn test_successive_network_results_replace_each_other() {
        let (orch, backend) = orchestrator(StubBackend::cairo());
        orch.load_snapshot().await.unwrap();

        backend.respond(
            "/api/optimize_network",
            StatusCode::OK,
            json!({"total_cost": 0, "total_distance": 14.4, "critical_facilities_connected": true,
                   "edges": [{"from": 1, "to": 3, "distance": 8.5, "existing": true},
                             {"from": 3, "to": 6, "distance": 3.2, "existing": true},
                             {"from": 9, "to": 11, "distance": 6.9, "existing": false}]}),
        );
        orch.optimize_network(NetworkRequest::default()).await.unwrap();

        backend.respond(
            "/api/optimize_network",
            StatusCode::OK,
            json!({"total_cost": 150, "total_distance": 7.5, "critical_facilities_connected": false,
                   "edges": [{"from": 6, "to": 8, "distance": 7.5, "existing": false}]}),
        );
        let report = orch.optimize_network(NetworkRequest::default()).await.unwrap();
        assert_eq!(report.removed, 3);
        assert_eq!(report.drawn, 1);

        orch.with_session(|s| {
            let view = s.registry().get(ViewKind::Network).unwrap();
            assert_eq!(view.count(OverlayTag::Result), 1);
            assert_eq!(view.count(OverlayTag::Context), 27);
            match s.panel(ViewKind::Network).content {
                PanelContent::Summary(summary) => match &summary.sections[0].block {
                    Block::Items { items } => assert_eq!(items[0].title, "Zamalek to Giza"),
                    other => panic!("expected items, got {:?}", other),
                },
                other => panic!("expected summary, got {:?}", other),
            }
        });
    }

    #[tokio::test]
    async fn test_signals_request_body_and_redraw() {
        let (orch, backend) = orchestrator(StubBackend::cairo());
        backend.respond(
            "/api/optimize_signals",
            StatusCode::OK,
            json!([{"intersection": 3, "intersection_name": "Downtown Cairo", "approaches": 2,
                    "cycle_time": 60,
                    "signal_phases": [
                        {"approach_name": "From Maadi", "green_time": 25, "priority": 1.0, "emergency_priority": false},
                        {"approach_name": "From Qasr El Aini Hospital", "green_time": 30, "priority": 5.0, "emergency_priority": true}
                    ]}]),
        );
        orch.load_snapshot().await.unwrap();
        orch.activate(ViewKind::Signals).unwrap();

        let report = orch
            .optimize_signals(SignalRequest {
                intersections: vec!["3".into()],
                time_of_day: Default::default(),
            })
            .await
            .unwrap();
        assert_eq!(report.drawn, 3);
        let body = &backend.calls()[1].1;
        assert_eq!(body["intersections"], json!(["3"]));
        assert_eq!(body["time_of_day"], "morning");
        orch.with_session(|s| assert_eq!(s.registry().visible(), Some(ViewKind::Signals)));
    }

    #[tokio::test]
    async fn test_transport_backend_error_field_is_failure() {
        let (orch, backend) = orchestrator(StubBackend::cairo());
        backend.respond(
            "/api/optimize_transport",
            StatusCode::OK,
            json!({"error": "Transport data unavailable"}),
        );
        orch.load_snapshot().await.unwrap();
        let err = orch.optimize_transport().await.unwrap_err();
        assert_eq!(
            err,
            PlannerError::Request(RequestError::Backend("Transport data unavailable".into()))
        );
        orch.with_session(|s| assert!(!s.registry().is_initialized(ViewKind::Transport)));
    }
}
