//! Route handlers binding the HTTP surface to the log store.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;
use std::io;

use crate::diagnostics::IntegrationStamp;
use crate::http::request::{capture_headers, ReceivedHeaders};
use crate::http::response::{self, json_error};
use crate::http::server::AppState;
use crate::store::{IoOp, LogRecord, StoreError, StoreResult};

/// Run a store call on the blocking pool.
async fn offload<T, F>(op: IoOp, f: F) -> StoreResult<T>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .unwrap_or_else(|e| Err(StoreError::Io {
            op,
            source: io::Error::other(e),
        }))
}

/// Path ids must stay a single file name inside the log directory.
fn is_single_segment(shop_id: &str) -> bool {
    !shop_id.contains(['/', '\\']) && shop_id != "." && shop_id != ".."
}

/// `POST /shop/{shop_id}`: capture the request into the shop's log.
pub async fn append_log(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
    method: Method,
    uri: Uri,
    Extension(received): Extension<ReceivedHeaders>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    capture(state, shop_id, method, uri, received, body).await
}

/// `POST /shop/`: no shop id in the path.
pub async fn append_without_shop(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Extension(received): Extension<ReceivedHeaders>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    capture(state, String::new(), method, uri, received, body).await
}

async fn capture(
    state: AppState,
    shop_id: String,
    method: Method,
    uri: Uri,
    received: ReceivedHeaders,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    if shop_id.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, response::MISSING_SHOP);
    }
    if !is_single_segment(&shop_id) {
        tracing::warn!(shop_id = %shop_id, "Rejected shop id that is not a single path segment");
        return json_error(StatusCode::BAD_REQUEST, response::INVALID_SHOP);
    }

    let body = match body {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(shop_id = %shop_id, error = %e, "Failed to read request body");
            return json_error(StatusCode::BAD_REQUEST, response::BODY_UNREADABLE);
        }
    };

    let record = LogRecord::capture(method.as_str(), uri.path(), capture_headers(&received.0), &body);
    let store = state.store.clone();
    let tenant = shop_id.clone();
    match offload(IoOp::Write, move || store.append(&tenant, &record)).await {
        Ok(()) => {
            tracing::info!(shop_id = %shop_id, method = %method, bytes = body.len(), "Request logged");
            Json(IntegrationStamp::now(&state.integration)).into_response()
        }
        Err(e) => response::append_failure(&shop_id, &e),
    }
}

/// `DELETE /shop/{shop_id}`: drop the shop's whole log.
pub async fn delete_log(State(state): State<AppState>, Path(shop_id): Path<String>) -> Response {
    remove(state, shop_id).await
}

/// `DELETE /shop/`: no shop id in the path.
pub async fn delete_without_shop(State(state): State<AppState>) -> Response {
    remove(state, String::new()).await
}

async fn remove(state: AppState, shop_id: String) -> Response {
    if !is_single_segment(&shop_id) {
        return json_error(StatusCode::BAD_REQUEST, response::INVALID_SHOP);
    }

    let store = state.store.clone();
    let tenant = shop_id.clone();
    match offload(IoOp::Remove, move || store.delete(&tenant)).await {
        Ok(()) => {
            tracing::info!(shop_id = %shop_id, "Log deleted");
            Json(json!({ "status": "лог удалён" })).into_response()
        }
        Err(e) => response::delete_failure(&shop_id, &e),
    }
}

/// `GET /shop/{shop_id}/logs`: HTML table of the shop's log.
pub async fn view_logs(State(state): State<AppState>, Path(shop_id): Path<String>) -> Response {
    if !is_single_segment(&shop_id) {
        return (StatusCode::BAD_REQUEST, response::INVALID_SHOP).into_response();
    }

    let store = state.store.clone();
    let tenant = shop_id.clone();
    match offload(IoOp::Read, move || store.read(&tenant)).await {
        Ok(report) => {
            if !report.skipped.is_empty() {
                tracing::warn!(
                    shop_id = %shop_id,
                    skipped = report.skipped.len(),
                    "Rendering log with malformed lines omitted"
                );
            }
            Html(state.renderer.render(&shop_id, &report.records)).into_response()
        }
        Err(e) => response::view_failure(&shop_id, &e),
    }
}

/// `GET /shop/{shop_id}/logs.json`: the shop's records as a JSON array.
pub async fn view_logs_json(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
) -> Response {
    if !is_single_segment(&shop_id) {
        return json_error(StatusCode::BAD_REQUEST, response::INVALID_SHOP);
    }

    let store = state.store.clone();
    let tenant = shop_id.clone();
    match offload(IoOp::Read, move || store.read_all(&tenant)).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => response::json_view_failure(&shop_id, &e),
    }
}

/// `GET /shops`: every shop that currently has a log.
pub async fn list_shops(State(state): State<AppState>) -> Response {
    let store = state.store.clone();
    match offload(IoOp::List, move || store.tenants()).await {
        Ok(shops) => Json(json!({ "shops": shops })).into_response(),
        Err(e) => response::list_failure(&e),
    }
}

/// `POST /shop/{shop_id}/externalError`: always 500.
pub async fn forced_error(State(state): State<AppState>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(state.diagnostics.forced_error()),
    )
        .into_response()
}

/// `GET|POST /shop/{shop_id}/slow`: 200 after the configured delay.
pub async fn slow_response(State(state): State<AppState>) -> Response {
    tracing::debug!(delay = ?state.diagnostics.delay(), "Delaying response");
    Json(state.diagnostics.forced_delay().await).into_response()
}

/// `GET /health`
pub async fn health() -> Response {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}
