//! One-shot training of the served model.

use std::time::Instant;

use log::info;

use crate::dataset::{self, N_CLASSES};
use crate::error::WithErrorContext;
use crate::model::{LogisticRegression, LogisticRegressionParams, StandardScaler, TrainedModel};
use crate::Result;

/// Fit the standardizer and classifier on the bundled Iris data.
pub fn train() -> Result<TrainedModel> {
    train_with(&LogisticRegressionParams::default())
}

pub fn train_with(params: &LogisticRegressionParams) -> Result<TrainedModel> {
    let started = Instant::now();

    let data = dataset::load_iris().with_context("load iris dataset")?;
    let scaler = StandardScaler::fit(&data.features)?;
    let scaled = scaler.transform_matrix(&data.features);
    let classifier = LogisticRegression::fit(&scaled, &data.targets, N_CLASSES, params)
        .with_context("fit logistic regression")?;

    info!(
        component = "trainer",
        model_event = "trained",
        n_iter = classifier.n_iter(),
        converged = classifier.converged(),
        duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        "model trained on {} samples",
        data.n_samples()
    );

    TrainedModel::new(scaler, classifier)
}
