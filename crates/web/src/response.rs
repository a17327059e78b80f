//! Shared success responses.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Body returned by every successful `DELETE`.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

/// `200 {"message": "resource deleted successfully"}`.
#[derive(Debug, Clone, Copy)]
pub struct Deleted;

impl IntoResponse for Deleted {
    fn into_response(self) -> Response {
        Json(MessageBody {
            message: "resource deleted successfully",
        })
        .into_response()
    }
}
