use crate::errors::{FsError, Operation};
use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "fatal error")]
    Fatal,
}

/// Top-level response shape: `status` plus the body's fields inlined.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: Status,
    #[serde(flatten)]
    pub body: T,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct Empty {}

pub fn success<T: Serialize>(body: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::OK, Json(Envelope { status: Status::Success, body }))
}

pub fn error_message(op: Operation, err: &FsError) -> String {
    format!("Error \"{err}\" has occurred when {}.", op.describe())
}

/// Domain errors are reported as 200 with an error body; the status code
/// never carries the failure.
pub fn failure(op: Operation, err: &FsError) -> (StatusCode, Json<serde_json::Value>) {
    let value = if err.is_fatal() {
        tracing::error!(operation = op.name(), error = %err, "unexpected failure");
        serde_json::to_value(Envelope { status: Status::Fatal, body: Empty {} })
    } else {
        serde_json::to_value(Envelope {
            status: Status::Error,
            body: ErrorBody { message: error_message(op, err) },
        })
    };
    let value = value.unwrap_or_else(|_| serde_json::json!({ "status": "fatal error" }));
    (StatusCode::OK, Json(value))
}
