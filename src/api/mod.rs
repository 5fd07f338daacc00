//! HTTP API module
//!
//! `/health` and `/predict` on top of the inference service. The model is
//! reached only through the [`gate::ReadyModel`] extractor.

pub mod gate;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;


pub use handlers::configure_routes;
pub use middleware::RequestContext;
pub use server::{init_api_server_state, ApiServerState};
