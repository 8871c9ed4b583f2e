use ndarray::{Array1, ArrayView1};

use btr::error::Result;
use btr::metrics::RegressionMetrics;

/// Diagnostics of a fit over its own training data.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    total_iterations: usize,
    objective_history: Vec<f64>,
    predictions: Array1<f64>,
    residuals: Array1<f64>,
    metrics: RegressionMetrics,
}

impl TrainingSummary {
    pub(crate) fn new(
        total_iterations: usize,
        objective_history: Vec<f64>,
        labels: ArrayView1<f64>,
        predictions: Array1<f64>,
    ) -> Result<TrainingSummary> {
        let metrics = RegressionMetrics::new(&labels, &predictions)?;
        let residuals = &labels - &predictions;
        Ok(TrainingSummary {
            total_iterations,
            objective_history,
            predictions,
            residuals,
            metrics,
        })
    }

    pub fn total_iterations(&self) -> usize {
        self.total_iterations
    }

    /// Objective value before the first iteration and after each one.
    pub fn objective_history(&self) -> &[f64] {
        &self.objective_history
    }

    pub fn predictions(&self) -> &Array1<f64> {
        &self.predictions
    }

    /// Label minus prediction, per training row.
    pub fn residuals(&self) -> &Array1<f64> {
        &self.residuals
    }

    pub fn num_instances(&self) -> usize {
        self.residuals.len()
    }

    pub fn metrics(&self) -> &RegressionMetrics {
        &self.metrics
    }

    pub fn root_mean_squared_error(&self) -> f64 {
        self.metrics.root_mean_squared_error
    }

    pub fn mean_squared_error(&self) -> f64 {
        self.metrics.mean_squared_error
    }

    pub fn mean_absolute_error(&self) -> f64 {
        self.metrics.mean_absolute_error
    }

    pub fn r2(&self) -> f64 {
        self.metrics.r2
    }

    pub fn explained_variance(&self) -> f64 {
        self.metrics.explained_variance
    }
}
