//! API request handlers

use actix_web::{web, HttpResponse};
use futures::StreamExt;
use log::debug;

use crate::api::gate::ReadyModel;
use crate::api::response::{
    ApiError, ErrorDetail, HealthResponse, DETAIL_METHOD_NOT_ALLOWED, DETAIL_NOT_FOUND,
};
use crate::service::{self, validation::MAX_BODY_BYTES, ValidationFailure};

/// 配置所有API路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/health")
            .route(web::get().to(health_check))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/predict")
            .route(web::post().to(predict))
            .default_service(web::to(method_not_allowed)),
    )
    .default_service(web::to(not_found));
}

/// 健康检查处理器：模型就绪才返回200
async fn health_check(_model: ReadyModel) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::ok())
}

/// 预测处理器：就绪检查 -> 校验 -> 预测 -> 响应
async fn predict(model: ReadyModel, mut payload: web::Payload) -> Result<HttpResponse, ApiError> {
    let body = read_body(&mut payload, MAX_BODY_BYTES).await?;
    let request = service::parse(&body).map_err(|failure| {
        debug!("rejected predict body: {}", failure);
        ApiError::Validation(failure)
    })?;

    let response = service::predict(&model, &request)?;
    Ok(HttpResponse::Ok().json(response))
}

/// 读取请求体，超过 `limit` 字节立即拒绝
async fn read_body(payload: &mut web::Payload, limit: usize) -> Result<web::BytesMut, ApiError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|err| ApiError::Validation(ValidationFailure::unreadable_body(err.to_string())))?;
        if body.len() + chunk.len() > limit {
            debug!("rejected predict body over {} bytes", limit);
            return Err(ApiError::Validation(ValidationFailure::body_too_large(limit)));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorDetail {
        detail: DETAIL_NOT_FOUND,
    })
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(ErrorDetail {
        detail: DETAIL_METHOD_NOT_ALLOWED,
    })
}
