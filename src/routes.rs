//! HTTP surface: router, handlers and the CORS middleware.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Request, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::error::{ApiError, ThoughtsError};
use crate::models::{
    CreateThoughtParams, EndpointInfo, Envelope, HealthResponse, Thought, WelcomeResponse,
};
use crate::service::ThoughtService;
use crate::validation::ValidationError;

type AppState = Arc<ThoughtService>;

/// Routes served by this API, as listed on `GET /`.
const ENDPOINTS: &[(&str, &str)] = &[
    ("GET", "/"),
    ("GET", "/health"),
    ("GET", "/thoughts"),
    ("POST", "/thoughts"),
    ("POST", "/thoughts/{thought_id}/like"),
];

/// Build the complete router.
pub fn build_router(service: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/thoughts", get(list_thoughts).post(create_thought))
        .route("/thoughts/{thought_id}/like", post(like_thought))
        .with_state(service)
        .layer(middleware::from_fn(cors))
}

async fn index() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Happy Thoughts API!".to_string(),
        endpoints: ENDPOINTS
            .iter()
            .map(|(method, path)| EndpointInfo {
                method: method.to_string(),
                path: path.to_string(),
            })
            .collect(),
    })
}

async fn health(State(service): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    service
        .health()
        .await
        .map_err(|e| ApiError::new(e, "Store unavailable"))?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

/// The listing is a bare array; existing clients read it without an envelope.
async fn list_thoughts(State(service): State<AppState>) -> Result<Json<Vec<Thought>>, ApiError> {
    let thoughts = service
        .list_recent()
        .await
        .map_err(|e| ApiError::new(e, "Could not fetch thoughts"))?;
    Ok(Json(thoughts))
}

async fn create_thought(
    State(service): State<AppState>,
    payload: Result<Json<CreateThoughtParams>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Thought>>), ApiError> {
    const FAILED: &str = "Could not create thought";

    let Json(params) = payload.map_err(|rejection| {
        let err = ValidationError::MalformedBody {
            reason: rejection.body_text(),
        };
        ApiError::new(err.into(), FAILED)
    })?;

    let thought = service
        .create_thought(params)
        .await
        .map_err(|e| ApiError::new(e, FAILED))?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(thought, "Thought created successfully")),
    ))
}

async fn like_thought(
    State(service): State<AppState>,
    thought_id: Result<Path<String>, PathRejection>,
) -> Result<Json<Envelope<Thought>>, ApiError> {
    const FAILED: &str = "Could not like thought";

    let Path(thought_id) = thought_id.map_err(|rejection| {
        ApiError::new(ThoughtsError::InvalidId(rejection.body_text()), FAILED)
    })?;

    let thought = service
        .like_thought(&thought_id)
        .await
        .map_err(|e| ApiError::new(e, FAILED))?;
    Ok(Json(Envelope::success(thought, "Hearts incremented")))
}

/// Allow any origin. Preflight requests are answered here and never reach a handler.
async fn cors(req: Request, next: Next) -> Response {
    let requested_headers = req
        .headers()
        .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
        .cloned();

    if req.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        let headers = response.headers_mut();
        apply_cors_headers(headers);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, HEAD, POST, OPTIONS"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            requested_headers.unwrap_or_else(|| HeaderValue::from_static("content-type")),
        );
        return response;
    }

    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
}
