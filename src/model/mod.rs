//! Fitted standardizer + classifier pipeline.

pub mod logistic;
pub mod scaler;

use ndarray::ArrayView1;

use crate::dataset::{N_CLASSES, N_FEATURES};
use crate::{Error, Result};

pub use logistic::{LogisticRegression, LogisticRegressionParams};
pub use scaler::StandardScaler;

/// Standardised features are clamped to this magnitude before scoring so
/// extreme finite inputs cannot overflow the logits.
const MAX_STANDARDISED: f64 = 1e6;

/// The model served by the inference service.
///
/// Immutable once built; handlers share it behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    scaler: StandardScaler,
    classifier: LogisticRegression,
}

impl TrainedModel {
    pub fn new(scaler: StandardScaler, classifier: LogisticRegression) -> Result<Self> {
        if scaler.n_features() != classifier.n_features() {
            return Err(Error::training(format!(
                "scaler expects {} features but classifier expects {}",
                scaler.n_features(),
                classifier.n_features()
            )));
        }
        Ok(Self { scaler, classifier })
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn classifier(&self) -> &LogisticRegression {
        &self.classifier
    }

    pub fn n_features(&self) -> usize {
        self.scaler.n_features()
    }

    pub fn n_classes(&self) -> usize {
        self.classifier.n_classes()
    }

    /// Class probabilities ordered by class index.
    pub fn predict_probabilities(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.n_features() {
            return Err(Error::invalid_input(format!(
                "expected {} features, got {}",
                self.n_features(),
                features.len()
            )));
        }
        let mut scaled = self.scaler.transform(ArrayView1::from(features));
        scaled.mapv_inplace(|v| v.clamp(-MAX_STANDARDISED, MAX_STANDARDISED));
        Ok(self.classifier.predict_proba(scaled.view()).to_vec())
    }

    /// Index of the most probable class; ties go to the lowest index.
    pub fn predict_class(&self, features: &[f64]) -> Result<usize> {
        let probs = self.predict_probabilities(features)?;
        let mut best = 0;
        for (i, p) in probs.iter().enumerate().skip(1) {
            if *p > probs[best] {
                best = i;
            }
        }
        Ok(best)
    }
}

/// Whether `model` has the input/output shape the HTTP contract assumes.
pub fn matches_contract(model: &TrainedModel) -> bool {
    model.n_features() == N_FEATURES && model.n_classes() == N_CLASSES
}
