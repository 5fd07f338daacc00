use serde::{Deserialize, Serialize};

use crate::dataset::N_FEATURES;
use crate::model::TrainedModel;
use crate::{Error, Result};

/// A validated feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionRequest {
    values: [f64; N_FEATURES],
}

impl PredictionRequest {
    pub fn new(values: [f64; N_FEATURES]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64; N_FEATURES] {
        &self.values
    }
}

/// Body of a successful `/predict` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: usize,
    pub probabilities: Vec<f64>,
}

/// Run the model on one request.
///
/// Any error here is an unexpected fault, not a client mistake.
pub fn predict(model: &TrainedModel, request: &PredictionRequest) -> Result<PredictionResponse> {
    let prediction = model.predict_class(request.values())?;
    let probabilities = model.predict_probabilities(request.values())?;

    if probabilities.iter().any(|p| !p.is_finite()) {
        return Err(Error::internal(format!(
            "model produced non-finite probabilities {:?}",
            probabilities
        )));
    }

    Ok(PredictionResponse {
        prediction,
        probabilities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LogisticRegression, StandardScaler};
    use crate::training;
    use ndarray::{Array1, Array2};

    #[test]
    fn test_predict_setosa_sample() {
        let model = training::train().unwrap();
        let response = predict(&model, &PredictionRequest::new([5.1, 3.5, 1.4, 0.2])).unwrap();

        assert_eq!(response.prediction, 0);
        assert_eq!(response.probabilities.len(), 3);
        assert!((response.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-6);
        assert!(response.probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_predict_virginica_sample() {
        let model = training::train().unwrap();
        let response = predict(&model, &PredictionRequest::new([6.7, 3.0, 5.2, 2.3])).unwrap();
        assert_eq!(response.prediction, 2);
    }

    #[test]
    fn test_non_finite_output_is_internal_error() {
        let scaler = StandardScaler::fit(&Array2::from_shape_vec((2, 4), vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]).unwrap()).unwrap();
        let mut coef = Array2::zeros((3, 4));
        coef[[0, 0]] = f64::NAN;
        let classifier = LogisticRegression::from_parts(coef, Array1::zeros(3)).unwrap();
        let model = TrainedModel::new(scaler, classifier).unwrap();

        let result = predict(&model, &PredictionRequest::new([1.0, 1.0, 1.0, 1.0]));
        assert!(matches!(result, Err(Error::Internal(_))));
    }

    #[test]
    fn test_response_serializes_to_wire_shape() {
        let response = PredictionResponse {
            prediction: 1,
            probabilities: vec![0.1, 0.7, 0.2],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"prediction": 1, "probabilities": [0.1, 0.7, 0.2]}));
    }
}
