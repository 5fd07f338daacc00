use std::sync::Arc;

use crate::model::TrainedModel;

/// Holder for the served model: absent until startup succeeds.
///
/// Cloning is cheap and yields an independent read-only handle; request
/// handlers receive such a clone and never write to it.
#[derive(Debug, Clone, Default)]
pub struct ModelSlot {
    model: Option<Arc<TrainedModel>>,
}

/// Outcome of the readiness gate.
#[derive(Debug, Clone)]
pub enum Readiness {
    Ready(Arc<TrainedModel>),
    NotReady,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready(_))
    }
}

impl ModelSlot {
    /// A slot with no model.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn populated(model: TrainedModel) -> Self {
        Self {
            model: Some(Arc::new(model)),
        }
    }

    /// The readiness gate: every model-dependent route goes through here.
    pub fn get_model(&self) -> Readiness {
        match &self.model {
            Some(model) => Readiness::Ready(Arc::clone(model)),
            None => Readiness::NotReady,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.model = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training;

    #[test]
    fn test_empty_slot_is_not_ready() {
        let slot = ModelSlot::empty();
        assert!(!slot.is_ready());
        assert!(matches!(slot.get_model(), Readiness::NotReady));
    }

    #[test]
    fn test_populated_slot_shares_one_model() {
        let slot = ModelSlot::populated(training::train().unwrap());
        let handle = slot.clone();

        match (slot.get_model(), handle.get_model()) {
            (Readiness::Ready(a), Readiness::Ready(b)) => assert!(Arc::ptr_eq(&a, &b)),
            _ => panic!("populated slot must be ready"),
        }
    }

    #[test]
    fn test_clear_does_not_affect_existing_handles() {
        let mut slot = ModelSlot::populated(training::train().unwrap());
        let handle = slot.clone();
        slot.clear();

        assert!(!slot.is_ready());
        assert!(handle.get_model().is_ready());
    }
}
