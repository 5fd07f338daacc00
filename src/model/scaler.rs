use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::{Error, Result};

/// Z-score standardizer: `(x - mean) / scale`.
///
/// Uses the population standard deviation; a zero-variance column keeps a
/// scale of 1.0 so it is only centred.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Fit column means and standard deviations on `features`.
    pub fn fit(features: &Array2<f64>) -> Result<Self> {
        let mean = features
            .mean_axis(Axis(0))
            .ok_or_else(|| Error::training("cannot fit scaler on an empty matrix"))?;
        let scale = features
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s.is_finite() && s > f64::EPSILON { s } else { 1.0 });

        Ok(Self { mean, scale })
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardize a single sample.
    pub fn transform(&self, sample: ArrayView1<f64>) -> Array1<f64> {
        (&sample - &self.mean) / &self.scale
    }

    /// Standardize every row of `features`.
    pub fn transform_matrix(&self, features: &Array2<f64>) -> Array2<f64> {
        (features - &self.mean) / &self.scale
    }
}
