//! API响应模块
//! 定义各种API响应结构和错误到HTTP响应的唯一转换点

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use thiserror::Error;

use crate::service::{ValidationFailure, Violation};

pub const DETAIL_INVALID_REQUEST: &str = "Invalid request";
pub const DETAIL_MODEL_NOT_LOADED: &str = "Model not loaded";
pub const DETAIL_INTERNAL: &str = "Internal Server Error";
pub const DETAIL_NOT_FOUND: &str = "Not Found";
pub const DETAIL_METHOD_NOT_ALLOWED: &str = "Method Not Allowed";

/// 健康检查响应
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// 服务状态
    pub status: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// 通用错误响应 `{"detail": ...}`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub detail: &'static str,
}

/// 校验失败响应 `{"detail": "Invalid request", "errors": [...]}`
#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse<'a> {
    pub detail: &'static str,
    pub errors: &'a [Violation],
}

/// 路由层可见的全部错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 请求体不符合要求 -> 400
    #[error("{0}")]
    Validation(ValidationFailure),

    /// 模型未就绪 -> 503
    #[error("model not loaded")]
    NotReady,

    /// 其他意外错误 -> 500，细节只写日志
    #[error("unexpected fault: {0}")]
    Unexpected(#[from] crate::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            ApiError::Validation(failure) => builder.json(ValidationErrorResponse {
                detail: DETAIL_INVALID_REQUEST,
                errors: &failure.errors,
            }),
            ApiError::NotReady => builder.json(ErrorDetail {
                detail: DETAIL_MODEL_NOT_LOADED,
            }),
            ApiError::Unexpected(err) => {
                error!(component = "api", event = "unexpected_fault"; "prediction failed: {}", err);
                builder.json(ErrorDetail {
                    detail: DETAIL_INTERNAL,
                })
            }
        }
    }
}
