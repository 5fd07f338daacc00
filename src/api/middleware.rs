//! 请求上下文中间件
//! 为每个请求分配 request id，写回 `X-Request-ID` 响应头并记录请求摘要

use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderName, HeaderValue};
use actix_web::Error;
use futures::future::LocalBoxFuture;
use lazy_static::lazy_static;
use log::{log, warn, Level};
use regex::Regex;
use uuid::Uuid;

use crate::logging;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

lazy_static! {
    static ref REQUEST_ID_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,127}$").unwrap();
}

/// 沿用调用方提供的合法 id，否则生成新的 UUID
pub fn sanitize_request_id(raw: Option<&str>) -> String {
    if let Some(candidate) = raw.map(str::trim) {
        if REQUEST_ID_PATTERN.is_match(candidate) {
            return candidate.to_string();
        }
    }
    Uuid::new_v4().to_string()
}

fn level_for_status(status: u16) -> Level {
    match status {
        500..=u16::MAX => Level::Error,
        400..=499 => Level::Warn,
        _ => Level::Info,
    }
}

/// 请求上下文中间件工厂
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestContext;

impl<S, B> Transform<S, ServiceRequest> for RequestContext
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestContextMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestContextMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestContextMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestContextMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = sanitize_request_id(
            req.headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok()),
        );
        let method = req.method().to_string();
        let path = req.path().to_string();
        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        let service = Rc::clone(&self.service);
        let started = Instant::now();

        Box::pin(logging::with_request_id(request_id.clone(), async move {
            let result = service.call(req).await;
            let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

            let status = match &result {
                Ok(res) => res.status().as_u16(),
                Err(err) => err.error_response().status().as_u16(),
            };
            log!(
                target: "app.request",
                level_for_status(status),
                event = "request",
                component = "api",
                path = path.as_str(),
                method = method.as_str(),
                status = status,
                duration_ms = duration_ms,
                user_agent = user_agent.as_str();
                "request handled"
            );

            let mut res = match result {
                Ok(res) => res,
                Err(err) => return Err(err),
            };
            match HeaderValue::from_str(&request_id) {
                Ok(value) => {
                    res.headers_mut()
                        .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                }
                Err(err) => {
                    warn!(
                        event = "request_id_header_error",
                        component = "api",
                        path = path.as_str(),
                        method = method.as_str();
                        "failed to set X-Request-ID response header: {}", err
                    );
                }
            }
            Ok::<_, Error>(res)
        }))
    }
}
