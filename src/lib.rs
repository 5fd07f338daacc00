//! mlops-quickstart - demo inference service
//!
//! Fits a small Iris classifier once at startup and serves predictions over
//! HTTP, refusing model-dependent requests until the model is ready.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mlops_quickstart::{Component, InferenceService, PredictionRequest, Readiness, Result};
//!
//! fn main() -> Result<()> {
//!     let mut service = InferenceService::new();
//!     service.start()?;
//!
//!     if let Readiness::Ready(model) = service.slot().get_model() {
//!         let request = PredictionRequest::new([5.1, 3.5, 1.4, 0.2]);
//!         let response = mlops_quickstart::service::predict(&model, &request)?;
//!         println!("class {}", response.prediction);
//!     }
//!
//!     service.stop()
//! }
//! ```

// Core modules
pub mod error;
pub mod config;
pub mod logging;

// Model construction
pub mod dataset;
pub mod model;
pub mod training;

// Lifecycle, readiness gate and inference pipeline
pub mod service;

// API module (optional)
#[cfg(feature = "http-server")]
pub mod api;

// Re-export commonly used types
pub use error::{Error, Result};
pub use config::Config;
pub use model::TrainedModel;
pub use service::{
    InferenceService, ModelSlot, PredictionRequest, PredictionResponse, Readiness,
    ValidationFailure,
};

/// Component status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentStatus {
    Starting,
    Ready,
    Stopped,
}

impl std::fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentStatus::Starting => write!(f, "STARTING"),
            ComponentStatus::Ready => write!(f, "READY"),
            ComponentStatus::Stopped => write!(f, "STOPPED"),
        }
    }
}

/// Component trait
pub trait Component: Send + Sync {
    fn name(&self) -> &str;
    fn status(&self) -> ComponentStatus;
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
}

/// Package name, used as the default service name in log records
pub const NAME: &str = env!("CARGO_PKG_NAME");
