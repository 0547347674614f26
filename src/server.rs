// 🌐 HTTP API - dashboard JSON per event plus the static page that draws it

use crate::context::DataContext;
use crate::dashboard::build_dashboard;
use crate::events::{all_events, find_event, EventProfile};
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// ============================================================================
// STATE & ERRORS
// ============================================================================

/// Shared application state. The context is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    ctx: Arc<DataContext>,
}

impl AppState {
    pub fn new(ctx: DataContext) -> Self {
        AppState { ctx: Arc::new(ctx) }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::UnknownEvent(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    gdp_records: usize,
    housing_records: usize,
}

#[derive(Serialize)]
struct EventSummary {
    key: &'static str,
    label: &'static str,
    countries: &'static [&'static str],
    has_yoy_chart: bool,
    has_housing_chart: bool,
    yoy_display_years: &'static [i32],
}

impl From<&'static EventProfile> for EventSummary {
    fn from(event: &'static EventProfile) -> Self {
        Self {
            key: event.key,
            label: event.label,
            countries: event.countries,
            has_yoy_chart: event.has_yoy_chart(),
            has_housing_chart: event.has_housing_chart(),
            yoy_display_years: event.yoy_display_years(),
        }
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /api/health
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "OK",
        gdp_records: state.ctx.gdp().len(),
        housing_records: state.ctx.housing().len(),
    }))
}

/// GET /api/events - selector options, default first
async fn list_events() -> impl IntoResponse {
    let events: Vec<EventSummary> = all_events().iter().map(EventSummary::from).collect();
    Json(ApiResponse::ok(events))
}

/// GET /api/events/:key - full dashboard for one event.
///
/// The body is a pure function of the data and the key, so its digest is a
/// strong ETag; a matching `If-None-Match` gets 304.
async fn get_dashboard(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let event = find_event(&key).ok_or_else(|| AppError::UnknownEvent(key.clone()))?;

    let dashboard = build_dashboard(&state.ctx, event);
    let body = serde_json::to_string(&ApiResponse::ok(dashboard))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let etag = format!("\"{}\"", body_digest(&body));

    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(|v| etag_matches(v, &etag))
        .unwrap_or(false);

    tracing::info!(event = event.key, not_modified, "dashboard requested");

    if not_modified {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::ETAG, etag),
        ],
        body,
    )
        .into_response())
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

/// Hex SHA-256 of a response body
pub fn body_digest(body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// `If-None-Match` check: a comma separated list of tags, weak comparison, `*` matches anything
pub fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    if_none_match.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
    })
}

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/events", get(list_events))
        .route("/events/:key", get(get_dashboard))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::HousingRecord;
    use crate::reshape::{GdpRecord, YearRange};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let gdp = vec![
            GdpRecord::new("Russia", 2020, Some(1.49e12)),
            GdpRecord::new("Russia", 2021, Some(1.84e12)),
            GdpRecord::new("Ukraine", 2020, Some(1.56e11)),
            GdpRecord::new("Ukraine", 2021, Some(1.99e11)),
        ];
        let housing = vec![HousingRecord::new("Russia", 2021, Some(130.0))];

        AppState::new(DataContext::new(gdp, housing, YearRange::ANALYSIS))
    }

    async fn send_get(app: Router, uri: &str) -> (StatusCode, HeaderMap, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _, body) = send_get(router(test_state()), "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["data"]["gdp_records"], 4);
        assert_eq!(value["data"]["housing_records"], 1);
    }

    #[tokio::test]
    async fn test_list_events() {
        let (status, _, body) = send_get(router(test_state()), "/api/events").await;

        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        let events = value["data"].as_array().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0]["label"], "2020 - Global - COVID-19");
        assert_eq!(events[1]["has_yoy_chart"], false);
        assert_eq!(events[2]["has_housing_chart"], false);
    }

    #[tokio::test]
    async fn test_dashboard_for_known_event() {
        let (status, headers, body) = send_get(router(test_state()), "/api/events/russia-ukraine-war").await;

        assert_eq!(status, StatusCode::OK);
        assert!(headers.contains_key(header::ETAG));

        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        let data = &value["data"];
        assert_eq!(data["event_label"], "2022 - Russia-Ukraine War");
        assert!(data["housing_chart"].is_null());
        assert_eq!(data["yoy_chart"]["groups"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_event_is_404() {
        let (status, _, body) = send_get(router(test_state()), "/api/events/brexit").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Unknown event: brexit"));
    }

    #[tokio::test]
    async fn test_repeat_request_has_same_etag_and_honours_if_none_match() {
        let app = router(test_state());

        let (_, first, body_a) = send_get(app.clone(), "/api/events/covid-19").await;
        let (_, second, body_b) = send_get(app.clone(), "/api/events/covid-19").await;
        assert_eq!(body_a, body_b);
        assert_eq!(first.get(header::ETAG), second.get(header::ETAG));

        let etag = first.get(header::ETAG).unwrap().clone();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/events/covid-19")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_if_none_match_list_containing_current_tag_is_304() {
        let app = router(test_state());
        let (_, headers, _) = send_get(app.clone(), "/api/events/russia-ukraine-war").await;
        let etag = headers.get(header::ETAG).unwrap().to_str().unwrap().to_string();

        for value in [format!("\"stale\", W/{}", etag), "*".to_string()] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri("/api/events/russia-ukraine-war")
                        .header(header::IF_NONE_MATCH, value.as_str())
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_MODIFIED, "{}", value);
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/events/russia-ukraine-war")
                    .header(header::IF_NONE_MATCH, "\"stale\"")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_etag_matches() {
        let tag = "\"abc\"";
        assert!(etag_matches("\"abc\"", tag));
        assert!(etag_matches("\"x\", \"abc\"", tag));
        assert!(etag_matches("W/\"abc\"", tag));
        assert!(etag_matches("*", tag));
        assert!(!etag_matches("\"abcd\"", tag));
        assert!(!etag_matches("abc", tag));
        assert!(!etag_matches("", tag));
    }

    #[tokio::test]
    async fn test_index_page_is_served() {
        let (status, _, body) = send_get(router(test_state()), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/api/events"));
    }

    #[test]
    fn test_body_digest_is_stable_hex() {
        let digest = body_digest("{}");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, body_digest("{}"));
        assert_ne!(digest, body_digest("[]"));
    }
}
