//! Multinomial logistic regression fitted by full-batch gradient descent.

use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::{Error, Result};

/// Fitting hyper-parameters.
#[derive(Debug, Clone)]
pub struct LogisticRegressionParams {
    /// Inverse L2 regularisation strength; the intercept is not penalised.
    pub c: f64,
    /// Gradient descent step size
    pub learning_rate: f64,
    /// Upper bound on gradient descent iterations
    pub max_iter: usize,
    /// Stop once every gradient component is below this magnitude
    pub tol: f64,
}

impl Default for LogisticRegressionParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            learning_rate: 0.5,
            max_iter: 10_000,
            tol: 1e-6,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// Shape `(n_classes, n_features)`
    coef: Array2<f64>,
    intercept: Array1<f64>,
    n_iter: usize,
    converged: bool,
}

impl LogisticRegression {
    /// Build a classifier from already fitted weights.
    pub fn from_parts(coef: Array2<f64>, intercept: Array1<f64>) -> Result<Self> {
        if coef.nrows() != intercept.len() {
            return Err(Error::invalid_input(format!(
                "coef has {} rows but intercept has {} entries",
                coef.nrows(),
                intercept.len()
            )));
        }
        Ok(Self {
            coef,
            intercept,
            n_iter: 0,
            converged: true,
        })
    }

    /// Minimise `mean(cross_entropy) + ||W||^2 / (2 * C * n)`.
    ///
    /// Starts from zero weights, so the result is fully deterministic. A
    /// non-finite loss or weight aborts the fit; running out of iterations
    /// only logs a warning, matching the usual solver behaviour.
    pub fn fit(
        x: &Array2<f64>,
        y: &Array1<usize>,
        n_classes: usize,
        params: &LogisticRegressionParams,
    ) -> Result<Self> {
        let (n_samples, n_features) = x.dim();
        if n_samples == 0 || n_samples != y.len() {
            return Err(Error::training(format!(
                "got {} samples but {} labels",
                n_samples,
                y.len()
            )));
        }
        if params.c <= 0.0 || params.learning_rate <= 0.0 {
            return Err(Error::training("C and learning_rate must be positive"));
        }

        let mut one_hot = Array2::<f64>::zeros((n_samples, n_classes));
        for (i, &label) in y.iter().enumerate() {
            if label >= n_classes {
                return Err(Error::training(format!("label {} out of range", label)));
            }
            one_hot[[i, label]] = 1.0;
        }

        let n = n_samples as f64;
        let reg = 1.0 / (params.c * n);
        let mut coef = Array2::<f64>::zeros((n_classes, n_features));
        let mut intercept = Array1::<f64>::zeros(n_classes);
        let mut converged = false;
        let mut n_iter = 0;

        while n_iter < params.max_iter {
            let logits = x.dot(&coef.t()) + &intercept;
            let probs = softmax_rows(&logits);
            let residual = &probs - &one_hot;

            let grad_coef = residual.t().dot(x) / n + &coef * reg;
            let grad_intercept = residual.sum_axis(Axis(0)) / n;

            let max_grad = grad_coef
                .iter()
                .chain(grad_intercept.iter())
                .fold(0.0_f64, |acc, g| {
                    if g.is_finite() { acc.max(g.abs()) } else { f64::INFINITY }
                });
            if !max_grad.is_finite() {
                return Err(Error::training(format!(
                    "gradient diverged at iteration {}",
                    n_iter
                )));
            }
            if max_grad < params.tol {
                converged = true;
                break;
            }

            coef.scaled_add(-params.learning_rate, &grad_coef);
            intercept.scaled_add(-params.learning_rate, &grad_intercept);
            n_iter += 1;
        }

        let loss = cross_entropy(x, &one_hot, &coef, &intercept) + 0.5 * reg * coef.mapv(|w| w * w).sum();
        if !loss.is_finite() || coef.iter().any(|w| !w.is_finite()) {
            return Err(Error::training("fitted weights are not finite"));
        }

        if converged {
            debug!("logistic regression converged after {} iterations, loss {:.6}", n_iter, loss);
        } else {
            warn!(
                "logistic regression hit max_iter={} before reaching tol={}, loss {:.6}",
                params.max_iter, params.tol, loss
            );
        }

        Ok(Self {
            coef,
            intercept,
            n_iter,
            converged,
        })
    }

    pub fn coef(&self) -> &Array2<f64> {
        &self.coef
    }

    pub fn intercept(&self) -> &Array1<f64> {
        &self.intercept
    }

    pub fn n_classes(&self) -> usize {
        self.coef.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.coef.ncols()
    }

    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Class probabilities for one already standardised sample.
    pub fn predict_proba(&self, sample: ArrayView1<f64>) -> Array1<f64> {
        let logits = self.coef.dot(&sample) + &self.intercept;
        softmax(logits.view())
    }
}

fn softmax(logits: ArrayView1<f64>) -> Array1<f64> {
    let max = logits.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
    let exp = logits.mapv(|v| (v - max).exp());
    let total = exp.sum();
    exp / total
}

fn softmax_rows(logits: &Array2<f64>) -> Array2<f64> {
    let mut probs = logits.clone();
    for mut row in probs.rows_mut() {
        let normalised = softmax(row.view());
        row.assign(&normalised);
    }
    probs
}

fn cross_entropy(x: &Array2<f64>, one_hot: &Array2<f64>, coef: &Array2<f64>, intercept: &Array1<f64>) -> f64 {
    let probs = softmax_rows(&(x.dot(&coef.t()) + intercept));
    let n = x.nrows() as f64;
    -(one_hot * &probs.mapv(|p| p.max(f64::MIN_POSITIVE).ln())).sum() / n
}
