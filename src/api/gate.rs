//! 就绪检查提取器
//! 所有依赖模型的路由都通过 `ReadyModel` 参数拿到模型

use std::future::{ready, Ready};
use std::ops::Deref;
use std::sync::Arc;

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};

use crate::api::response::ApiError;
use crate::api::server::ApiServerState;
use crate::model::TrainedModel;
use crate::service::Readiness;

/// 已就绪的模型句柄
#[derive(Debug, Clone)]
pub struct ReadyModel(pub Arc<TrainedModel>);

impl Deref for ReadyModel {
    type Target = TrainedModel;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for ReadyModel {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // 未注册状态等同于槽位为空
        let readiness = req
            .app_data::<web::Data<ApiServerState>>()
            .map(|state| state.slot.get_model())
            .unwrap_or(Readiness::NotReady);

        ready(match readiness {
            Readiness::Ready(model) => Ok(ReadyModel(model)),
            Readiness::NotReady => Err(ApiError::NotReady),
        })
    }
}
