//! Client for the optimization backend.
//!
//! [`Backend`] is the seam between the orchestrator and the network; the
//! orchestrator holds it as `Arc<dyn Backend>`. [`HttpBackend`] implements
//! it over `reqwest`.
//!
//! Every response goes through the same decoding steps:
//! 1. a non-2xx status fails with the body's `error` message, or the status
//!    reason when there is none
//! 2. a 2xx JSON object carrying an `error` string fails with that message
//! 3. anything else is decoded into the expected result type

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::dto::{
    IntersectionSignal, NetworkRequest, NetworkResult, RouteRequest, RouteResult,
    SignalRequest, SnapshotPayload, TransportResult,
};
use crate::error::RequestError;

/// The five optimization contracts plus the snapshot fetch.
pub trait Backend: Send + Sync {
    /// `GET /api/road_network`
    fn road_network(&self) -> BoxFuture<'_, Result<SnapshotPayload, RequestError>>;

    /// `POST /api/optimize_network`
    fn optimize_network<'a>(
        &'a self,
        request: &'a NetworkRequest,
    ) -> BoxFuture<'a, Result<NetworkResult, RequestError>>;

    /// `POST /api/shortest_path`
    fn shortest_path<'a>(
        &'a self,
        request: &'a RouteRequest,
    ) -> BoxFuture<'a, Result<RouteResult, RequestError>>;

    /// `POST /api/emergency_route`
    fn emergency_route<'a>(
        &'a self,
        request: &'a RouteRequest,
    ) -> BoxFuture<'a, Result<RouteResult, RequestError>>;

    /// `POST /api/optimize_transport`
    fn optimize_transport(&self) -> BoxFuture<'_, Result<TransportResult, RequestError>>;

    /// `POST /api/optimize_signals`
    fn optimize_signals<'a>(
        &'a self,
        request: &'a SignalRequest,
    ) -> BoxFuture<'a, Result<Vec<IntersectionSignal>, RequestError>>;
}

/// Backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("city-planner/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        debug!(path, "GET backend");
        let response = self.client.get(self.url(path)).send().await?;
        read_response(response).await
    }

    async fn post<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(path, "POST backend");
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        read_response(response).await
    }
}

async fn read_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RequestError> {
    let status = response.status();
    let body = response.bytes().await?;
    decode_response(status, &body)
}

/// Applies the status and `error`-field rules, then decodes `body` as `T`.
pub(crate) fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<T, RequestError> {
    let value: Option<Value> = serde_json::from_slice(body).ok();
    let error_field = value
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string);

    if !status.is_success() {
        return Err(RequestError::Status {
            status: status.as_u16(),
            message: error_field.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            }),
        });
    }
    if let Some(message) = error_field {
        return Err(RequestError::Backend(message));
    }

    let value = value.ok_or_else(|| RequestError::Decode("response body is not JSON".to_string()))?;
    serde_json::from_value(value).map_err(|e| RequestError::Decode(e.to_string()))
}

impl Backend for HttpBackend {
    fn road_network(&self) -> BoxFuture<'_, Result<SnapshotPayload, RequestError>> {
        self.get("/api/road_network").boxed()
    }

    fn optimize_network<'a>(
        &'a self,
        request: &'a NetworkRequest,
    ) -> BoxFuture<'a, Result<NetworkResult, RequestError>> {
        self.post("/api/optimize_network", Some(request)).boxed()
    }

    fn shortest_path<'a>(
        &'a self,
        request: &'a RouteRequest,
    ) -> BoxFuture<'a, Result<RouteResult, RequestError>> {
        self.post("/api/shortest_path", Some(request)).boxed()
    }

    fn emergency_route<'a>(
        &'a self,
        request: &'a RouteRequest,
    ) -> BoxFuture<'a, Result<RouteResult, RequestError>> {
        self.post("/api/emergency_route", Some(request)).boxed()
    }

    fn optimize_transport(&self) -> BoxFuture<'_, Result<TransportResult, RequestError>> {
        self.post::<Value, _>("/api/optimize_transport", None).boxed()
    }

    fn optimize_signals<'a>(
        &'a self,
        request: &'a SignalRequest,
    ) -> BoxFuture<'a, Result<Vec<IntersectionSignal>, RequestError>> {
        self.post("/api/optimize_signals", Some(request)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_success_uses_error_field() {
        let err = decode_response::<RouteResult>(
            StatusCode::NOT_FOUND,
            br#"{"error": "No path found between 1 and 13"}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            RequestError::Status {
                status: 404,
                message: "No path found between 1 and 13".into()
            }
        );
        assert!(err.is_no_path());
    }

    #[test]
    fn test_non_success_without_body_uses_reason() {
        let err = decode_response::<RouteResult>(StatusCode::INTERNAL_SERVER_ERROR, b"<html>").unwrap_err();
        assert_eq!(
            err,
            RequestError::Status {
                status: 500,
                message: "Internal Server Error".into()
            }
        );
    }

    #[test]
    fn test_success_with_error_field_is_failure() {
        let err = decode_response::<RouteResult>(
            StatusCode::OK,
            br#"{"path": [], "distance": 0, "time": 0, "error": "No path found"}"#,
        )
        .unwrap_err();
        assert_eq!(err, RequestError::Backend("No path found".into()));
    }

    #[test]
    fn test_signals_decode_from_bare_array() {
        let signals: Vec<IntersectionSignal> = decode_response(
            StatusCode::OK,
            br#"[{"intersection": 3, "intersection_name": "Downtown Cairo", "approaches": 4,
                 "cycle_time": 120, "signal_phases": []}]"#,
        )
        .unwrap();
        assert_eq!(signals[0].intersection.as_str(), "3");
    }

    #[test]
    fn test_contract_mismatch_is_decode_error() {
        let err = decode_response::<Vec<IntersectionSignal>>(StatusCode::OK, br#"{"signals": []}"#).unwrap_err();
        assert!(matches!(err, RequestError::Decode(_)));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let backend = HttpBackend::new("http://127.0.0.1:5000/").unwrap();
        assert_eq!(backend.url("/api/road_network"), "http://127.0.0.1:5000/api/road_network");
    }
}

/// Canned-response backend for tests.
#[cfg(test)]
pub(crate) mod stub {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    use crate::demo_data::cairo_network_json;

    /// Serves fixed JSON per path and records every call that reaches it.
    #[derive(Debug, Default)]
    pub struct StubBackend {
        responses: Mutex<HashMap<&'static str, (StatusCode, Value)>>,
        calls: Mutex<Vec<(&'static str, Value)>>,
    }

    impl StubBackend {
        /// Serves the Cairo demo network as the snapshot.
        pub fn cairo() -> Self {
            Self::default().with("/api/road_network", StatusCode::OK, cairo_network_json())
        }

        pub fn with(self, path: &'static str, status: StatusCode, body: Value) -> Self {
            self.responses.lock().insert(path, (status, body));
            self
        }

        pub fn respond(&self, path: &'static str, status: StatusCode, body: Value) {
            self.responses.lock().insert(path, (status, body));
        }

        pub fn calls(&self) -> Vec<(&'static str, Value)> {
            self.calls.lock().clone()
        }

        pub fn calls_to(&self, path: &str) -> usize {
            self.calls.lock().iter().filter(|(p, _)| *p == path).count()
        }

        fn serve<'a, T, B>(&'a self, path: &'static str, body: Option<&'a B>) -> BoxFuture<'a, Result<T, RequestError>>
        where
            T: DeserializeOwned + Send + 'a,
            B: Serialize + Sync + ?Sized,
        {
            async move {
                let sent = body
                    .map(|b| serde_json::to_value(b).unwrap_or(Value::Null))
                    .unwrap_or(Value::Null);
                self.calls.lock().push((path, sent));
                let (status, reply) = self
                    .responses
                    .lock()
                    .get(path)
                    .cloned()
                    .unwrap_or((StatusCode::NOT_FOUND, serde_json::json!({"error": "Not Found"})));
                decode_response(status, reply.to_string().as_bytes())
            }
            .boxed()
        }
    }

    impl Backend for StubBackend {
        fn road_network(&self) -> BoxFuture<'_, Result<SnapshotPayload, RequestError>> {
            self.serve::<_, Value>("/api/road_network", None)
        }

        fn optimize_network<'a>(
            &'a self,
            request: &'a NetworkRequest,
        ) -> BoxFuture<'a, Result<NetworkResult, RequestError>> {
            self.serve("/api/optimize_network", Some(request))
        }

        fn shortest_path<'a>(
            &'a self,
            request: &'a RouteRequest,
        ) -> BoxFuture<'a, Result<RouteResult, RequestError>> {
            self.serve("/api/shortest_path", Some(request))
        }

        fn emergency_route<'a>(
            &'a self,
            request: &'a RouteRequest,
        ) -> BoxFuture<'a, Result<RouteResult, RequestError>> {
            self.serve("/api/emergency_route", Some(request))
        }

        fn optimize_transport(&self) -> BoxFuture<'_, Result<TransportResult, RequestError>> {
            self.serve::<_, Value>("/api/optimize_transport", None)
        }

        fn optimize_signals<'a>(
            &'a self,
            request: &'a SignalRequest,
        ) -> BoxFuture<'a, Result<Vec<IntersectionSignal>, RequestError>> {
            self.serve("/api/optimize_signals", Some(request))
        }
    }
}
