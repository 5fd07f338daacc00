//! Model lifecycle, readiness gate and the validation -> prediction pipeline.

pub mod lifecycle;
pub mod prediction;
pub mod slot;
pub mod validation;

pub use lifecycle::{InferenceService, Trainer};
pub use prediction::{predict, PredictionRequest, PredictionResponse};
pub use slot::{ModelSlot, Readiness};
pub use validation::{parse, ValidationFailure, Violation, ViolationKind};
