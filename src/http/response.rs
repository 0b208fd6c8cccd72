//! Response payloads and error mapping.
//!
//! # Responsibilities
//! - Map store errors to HTTP status codes and fixed user-facing messages
//! - Log the internal error detail, never return it
//!
//! # Design Decisions
//! - Invalid tenant or unreadable body → 400
//! - Missing log → 404
//! - Everything else → 500 with a generic message

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::store::{IoOp, StoreError};

pub const MISSING_SHOP: &str = "не указан идентификатор магазина";
pub const INVALID_SHOP: &str = "недопустимый идентификатор магазина";
pub const BODY_UNREADABLE: &str = "не удалось прочитать тело запроса";
const ENCODE_FAILED: &str = "не удалось сериализовать лог";
const OPEN_FAILED: &str = "не удалось открыть файл";
const WRITE_FAILED: &str = "не удалось записать в файл";
const ALREADY_GONE: &str = "лог уже отсутствует";
const REMOVE_FAILED: &str = "не удалось удалить файл";
const LOG_NOT_FOUND: &str = "Лог не найден";
const READ_FAILED: &str = "Не удалось прочитать файл";
const PARSE_FAILED: &str = "Не удалось распарсить лог";
const LIST_FAILED: &str = "не удалось получить список магазинов";

/// `{"error": ...}` body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

pub fn json_error(status: StatusCode, message: &'static str) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

fn log_internal(tenant: &str, error: &StoreError) {
    tracing::error!(tenant, error = %error, "Log store operation failed");
}

/// Failure of an append, as JSON.
pub fn append_failure(tenant: &str, error: &StoreError) -> Response {
    match error {
        StoreError::InvalidTenant => json_error(StatusCode::BAD_REQUEST, MISSING_SHOP),
        StoreError::Encode(_) => {
            log_internal(tenant, error);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, ENCODE_FAILED)
        }
        StoreError::Io { op: IoOp::Open, .. } => {
            log_internal(tenant, error);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, OPEN_FAILED)
        }
        _ => {
            log_internal(tenant, error);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, WRITE_FAILED)
        }
    }
}

/// Failure of a delete, as JSON.
pub fn delete_failure(tenant: &str, error: &StoreError) -> Response {
    match error {
        StoreError::InvalidTenant => json_error(StatusCode::BAD_REQUEST, MISSING_SHOP),
        StoreError::NotFound(_) => json_error(StatusCode::NOT_FOUND, ALREADY_GONE),
        _ => {
            log_internal(tenant, error);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, REMOVE_FAILED)
        }
    }
}

/// Failure of the HTML view, as plain text.
pub fn view_failure(tenant: &str, error: &StoreError) -> Response {
    let (status, message) = read_failure_parts(error);
    if status.is_server_error() {
        log_internal(tenant, error);
    }
    (status, message).into_response()
}

/// Failure of the JSON view.
pub fn json_view_failure(tenant: &str, error: &StoreError) -> Response {
    let (status, message) = read_failure_parts(error);
    if status.is_server_error() {
        log_internal(tenant, error);
    }
    json_error(status, message)
}

/// Failure to list tenants.
pub fn list_failure(error: &StoreError) -> Response {
    tracing::error!(error = %error, "Failed to list tenant logs");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, LIST_FAILED)
}

fn read_failure_parts(error: &StoreError) -> (StatusCode, &'static str) {
    match error {
        StoreError::InvalidTenant => (StatusCode::BAD_REQUEST, MISSING_SHOP),
        StoreError::NotFound(_) => (StatusCode::NOT_FOUND, LOG_NOT_FOUND),
        StoreError::Decode { .. } => (StatusCode::INTERNAL_SERVER_ERROR, PARSE_FAILED),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, READ_FAILED),
    }
}
