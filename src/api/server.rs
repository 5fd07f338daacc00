//! API服务器状态管理
//! 提供API服务器的状态结构和初始化逻辑

use actix_web::web;

use crate::service::ModelSlot;

/// API服务器状态
/// 每个worker持有一份只读副本，模型只在启动阶段写入
#[derive(Debug, Clone, Default)]
pub struct ApiServerState {
    /// 模型槽位（只能通过就绪检查访问）
    pub(crate) slot: ModelSlot,
}

impl ApiServerState {
    /// 创建新的API服务器状态
    pub fn new(slot: ModelSlot) -> Self {
        Self { slot }
    }
}

/// 初始化API服务器状态
/// 在 main.rs 中生命周期启动完成后调用
pub fn init_api_server_state(slot: ModelSlot) -> web::Data<ApiServerState> {
    web::Data::new(ApiServerState::new(slot))
}
