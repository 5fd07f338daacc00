use std::time::Instant;

use log::{error, info};

use crate::model::{self, TrainedModel};
use crate::service::slot::ModelSlot;
use crate::{training, Component, ComponentStatus, Error, Result};

/// Produces the model during the `Starting -> Ready` transition.
pub type Trainer = Box<dyn Fn() -> Result<TrainedModel> + Send + Sync>;

/// Owns the model slot and drives `Starting -> Ready -> Stopped`.
pub struct InferenceService {
    status: ComponentStatus,
    slot: ModelSlot,
    trainer: Trainer,
}

impl InferenceService {
    /// Service that trains with the bundled Iris recipe.
    pub fn new() -> Self {
        Self::with_trainer(Box::new(training::train))
    }

    pub fn with_trainer(trainer: Trainer) -> Self {
        Self {
            status: ComponentStatus::Starting,
            slot: ModelSlot::empty(),
            trainer,
        }
    }

    /// Read-only handle for request handlers. Taken before `start` it stays
    /// empty, so routes built from it answer "not ready".
    pub fn slot(&self) -> ModelSlot {
        self.slot.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.status == ComponentStatus::Ready
    }
}

impl Default for InferenceService {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for InferenceService {
    fn name(&self) -> &str {
        "inference-service"
    }

    fn status(&self) -> ComponentStatus {
        self.status
    }

    /// Train once and populate the slot. On failure the service stays in
    /// `Starting` with an empty slot and the error is returned to the caller.
    fn start(&mut self) -> Result<()> {
        if self.status != ComponentStatus::Starting {
            return Err(Error::lifecycle(format!(
                "cannot start {} from {}",
                self.name(),
                self.status
            )));
        }

        let started = Instant::now();
        let outcome = (self.trainer)().and_then(|model| {
            if model::matches_contract(&model) {
                Ok(model)
            } else {
                Err(Error::training(format!(
                    "model has {} features and {} classes",
                    model.n_features(),
                    model.n_classes()
                )))
            }
        });

        match outcome {
            Ok(model) => {
                self.slot = ModelSlot::populated(model);
                self.status = ComponentStatus::Ready;
                info!(
                    component = "lifecycle",
                    model_event = "loaded",
                    duration_ms = started.elapsed().as_secs_f64() * 1000.0;
                    "model loaded, service ready"
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    component = "lifecycle",
                    model_event = "load_failed";
                    "model training failed: {}", err
                );
                Err(Error::startup(err.to_string()))
            }
        }
    }

    fn stop(&mut self) -> Result<()> {
        if self.status != ComponentStatus::Ready {
            return Err(Error::lifecycle(format!(
                "cannot stop {} from {}",
                self.name(),
                self.status
            )));
        }
        self.slot.clear();
        self.status = ComponentStatus::Stopped;
        info!(component = "lifecycle", model_event = "unloaded"; "model slot cleared");
        Ok(())
    }
}
