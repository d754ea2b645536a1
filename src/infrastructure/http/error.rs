//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 错误响应格式：`{ "error": ..., "details": ... }`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            error: error.into(),
            details,
        }
    }
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    /// 请求无效 (400)
    BadRequest(String),
    /// 处理失败 (500)，`error` 为面向用户的概述，`details` 为底层原因
    Processing { error: &'static str, details: String },
}

impl ApiError {
    /// 按应用层错误构造，`context` 为 500 时的概述
    pub fn from_application(context: &'static str, err: ApplicationError) -> Self {
        match err {
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            other => ApiError::Processing {
                error: context,
                details: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, response) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "Bad request");
                (StatusCode::BAD_REQUEST, ErrorResponse::new(msg, None))
            }
            ApiError::Processing { error, details } => {
                tracing::error!(error = %error, details = %details, "Request processing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(error, Some(details)),
                )
            }
        };

        (status, Json(response)).into_response()
    }
}
