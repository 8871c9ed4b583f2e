//! Linear regression with elastic-net regularisation.
//!
//! The solver works on standardised features and label, so `reg_param` is
//! independent of the units of the input columns. The penalty is
//!
//! ```text
//! reg_param * (elastic_net_param * |w|_1 + (1 - elastic_net_param) / 2 * |w|^2)
//! ```
//!
//! where `elastic_net_param = 1` is the lasso and `0` is ridge regression.

mod summary;

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1, Axis};
use tracing::{debug, info, warn};

use btr::error::{Error, Result};
use btr::metrics::RegressionMetrics;
use btr::traits::{Fit, Predict, Summary};
use btr::Dataset;
use btr_numrs::{format_dense, mean_std, soft_threshold};

pub use summary::TrainingSummary;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRegression {
    max_iter: usize,
    reg_param: f64,
    elastic_net_param: f64,
    tolerance: f64,
}

impl Default for LinearRegression {
    fn default() -> Self {
        LinearRegression {
            max_iter: 100,
            reg_param: 0.0,
            elastic_net_param: 0.0,
            tolerance: 1e-6,
        }
    }
}

/// Configure and fit a linear regression model
impl LinearRegression {
    /// Create default parameters: no regularisation, 100 iterations.
    pub fn params() -> LinearRegression {
        LinearRegression::default()
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn reg_param(mut self, reg_param: f64) -> Self {
        self.reg_param = reg_param;
        self
    }

    /// Mix between the L1 (1.0) and L2 (0.0) penalty.
    pub fn elastic_net_param(mut self, elastic_net_param: f64) -> Self {
        self.elastic_net_param = elastic_net_param;
        self
    }

    /// Stop once no coefficient moves more than this in one iteration.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter(
                "max_iter must be at least 1".to_string(),
            ));
        }
        if !(self.reg_param >= 0.0 && self.reg_param.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "reg_param must be a finite non-negative number, got {}",
                self.reg_param
            )));
        }
        if !(0.0..=1.0).contains(&self.elastic_net_param) {
            return Err(Error::InvalidParameter(format!(
                "elastic_net_param must lie in [0, 1], got {}",
                self.elastic_net_param
            )));
        }
        if !(self.tolerance > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

impl Fit<Dataset> for LinearRegression {
    type Object = FittedLinearRegression;

    fn fit(&self, dataset: &Dataset) -> Result<FittedLinearRegression> {
        self.validate()?;
        if dataset.nsamples() == 0 {
            return Err(Error::EmptyDataset);
        }
        let x = dataset.records();
        let y = dataset.targets();

        let (y_mean, y_std) = mean_std(y);
        let (coefficients, intercept, total_iterations, objective_history) = if y_std == 0.0 {
            warn!(label = y_mean, "label is constant, fitting the intercept only");
            (Array1::zeros(x.ncols()), y_mean, 0, vec![0.0])
        } else {
            let scaled = Standardized::new(x, dataset.feature_names());
            let ys = y.mapv(|v| (v - y_mean) / y_std);
            let solution = self.coordinate_descent(&scaled.records, &ys, self.reg_param / y_std);

            let coefficients = Array1::from_shape_fn(x.ncols(), |j| {
                if scaled.std[j] > 0.0 {
                    solution.weights[j] * y_std / scaled.std[j]
                } else {
                    0.0
                }
            });
            let intercept = y_mean - coefficients.dot(&scaled.mean);
            (
                coefficients,
                intercept,
                solution.iterations,
                solution.objective_history,
            )
        };

        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(Error::NonFinite("coefficient".to_string()));
        }
        if !intercept.is_finite() {
            return Err(Error::NonFinite("intercept".to_string()));
        }

        let predictions = x.dot(&coefficients) + intercept;
        let summary =
            TrainingSummary::new(total_iterations, objective_history, y.view(), predictions)?;
        info!(
            iterations = total_iterations,
            rmse = summary.root_mean_squared_error(),
            "fitted linear regression"
        );

        Ok(FittedLinearRegression {
            coefficients,
            intercept,
            feature_names: dataset.feature_names().to_vec(),
            summary,
        })
    }
}

struct Solution {
    weights: Array1<f64>,
    iterations: usize,
    objective_history: Vec<f64>,
}

impl LinearRegression {
    // Cyclic coordinate descent; one sweep over all weights is one iteration.
    fn coordinate_descent(&self, x: &Array2<f64>, y: &Array1<f64>, lambda: f64) -> Solution {
        let n = x.nrows() as f64;
        let l1 = lambda * self.elastic_net_param;
        let l2 = lambda * (1.0 - self.elastic_net_param);
        let norms: Vec<f64> = x
            .axis_iter(Axis(1))
            .map(|col| col.dot(&col) / n)
            .collect();

        let mut weights = Array1::<f64>::zeros(x.ncols());
        let mut residual = y.clone();
        let mut objective_history = vec![objective(residual.view(), weights.view(), l1, l2)];
        let mut iterations = 0;

        for iteration in 0..self.max_iter {
            let mut max_delta = 0.0_f64;
            for (j, col) in x.axis_iter(Axis(1)).enumerate() {
                if norms[j] == 0.0 {
                    continue;
                }
                let rho = col.dot(&residual) / n + norms[j] * weights[j];
                let updated = soft_threshold(rho, l1) / (norms[j] + l2);
                let delta = updated - weights[j];
                if delta != 0.0 {
                    residual.scaled_add(-delta, &col);
                    weights[j] = updated;
                }
                max_delta = max_delta.max(delta.abs());
            }
            iterations += 1;

            let value = objective(residual.view(), weights.view(), l1, l2);
            debug!(iteration, objective = value, "coordinate descent step");
            objective_history.push(value);

            if max_delta < self.tolerance {
                break;
            }
        }

        Solution {
            weights,
            iterations,
            objective_history,
        }
    }
}

fn objective(residual: ArrayView1<f64>, weights: ArrayView1<f64>, l1: f64, l2: f64) -> f64 {
    let n = residual.len() as f64;
    let loss = residual.dot(&residual) / (2.0 * n);
    let l1_norm = weights.mapv(f64::abs).sum();
    let l2_norm = weights.dot(&weights);
    loss + l1 * l1_norm + l2 / 2.0 * l2_norm
}

/// Features scaled to zero mean and unit sample deviation. Constant columns
/// become all zeros.
struct Standardized {
    records: Array2<f64>,
    mean: Array1<f64>,
    std: Array1<f64>,
}

impl Standardized {
    fn new(x: &Array2<f64>, names: &[String]) -> Standardized {
        let mut records = Array2::<f64>::zeros(x.raw_dim());
        let mut mean = Array1::<f64>::zeros(x.ncols());
        let mut std = Array1::<f64>::zeros(x.ncols());
        for (j, col) in x.axis_iter(Axis(1)).enumerate() {
            let (m, s) = mean_std(&col);
            mean[j] = m;
            std[j] = s;
            if s > 0.0 {
                records.column_mut(j).assign(&col.mapv(|v| (v - m) / s));
            } else {
                warn!(feature = %names[j], "feature is constant, its coefficient stays zero");
            }
        }
        Standardized { records, mean, std }
    }
}

/// A fitted linear model together with its training diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedLinearRegression {
    coefficients: Array1<f64>,
    intercept: f64,
    feature_names: Vec<String>,
    summary: TrainingSummary,
}

impl FittedLinearRegression {
    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Score the model on another dataset.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<RegressionMetrics> {
        if dataset.nfeatures() != self.coefficients.len() {
            return Err(Error::ShapeMismatch {
                expected: self.coefficients.len(),
                actual: dataset.nfeatures(),
            });
        }
        let predictions = self.predict(dataset.records());
        RegressionMetrics::new(dataset.targets(), &predictions)
    }

    /// The model as an equation over the named features.
    pub fn equation(&self) -> String {
        let mut s = self.intercept.to_string();
        for (name, c) in self.feature_names.iter().zip(self.coefficients.iter()) {
            s.push_str(&format!(" + {} * {}", name, c));
        }
        s
    }
}

impl<'a> Predict<&'a Array2<f64>, Array1<f64>> for FittedLinearRegression {
    fn predict(&self, x: &'a Array2<f64>) -> Array1<f64> {
        x.dot(&self.coefficients) + self.intercept
    }
}

impl Summary for FittedLinearRegression {
    type Output = TrainingSummary;

    fn summary(&self) -> &TrainingSummary {
        &self.summary
    }
}

impl fmt::Display for FittedLinearRegression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Coefficients: {} Intercept: {:?}",
            format_dense(&self.coefficients),
            self.intercept
        )
    }
}
