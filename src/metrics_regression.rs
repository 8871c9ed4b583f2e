//! Common metrics for regression
//!
//! The ground truth is the receiver of every method, predictions are passed
//! as `compare_to`.

use ndarray::{Array1, ArrayBase, Data, Ix1};
use ndarray_stats::QuantileExt;

use crate::error::{Error, Result};

pub trait Regression {
    /// Maximal absolute error between two continuous variables
    fn max_error<S: Data<Elem = f64>>(&self, compare_to: &ArrayBase<S, Ix1>) -> Result<f64>;
    /// Mean of the absolute errors
    fn mean_absolute_error<S: Data<Elem = f64>>(&self, compare_to: &ArrayBase<S, Ix1>)
        -> Result<f64>;
    /// Mean of the squared errors
    fn mean_squared_error<S: Data<Elem = f64>>(&self, compare_to: &ArrayBase<S, Ix1>)
        -> Result<f64>;
    fn root_mean_squared_error<S: Data<Elem = f64>>(
        &self,
        compare_to: &ArrayBase<S, Ix1>,
    ) -> Result<f64> {
        self.mean_squared_error(compare_to).map(f64::sqrt)
    }
    /// Coefficient of determination
    fn r2<S: Data<Elem = f64>>(&self, compare_to: &ArrayBase<S, Ix1>) -> Result<f64>;
    /// Share of the target variance the predictions account for
    fn explained_variance<S: Data<Elem = f64>>(&self, compare_to: &ArrayBase<S, Ix1>)
        -> Result<f64>;
}

impl<D: Data<Elem = f64>> Regression for ArrayBase<D, Ix1> {
    fn max_error<S: Data<Elem = f64>>(&self, compare_to: &ArrayBase<S, Ix1>) -> Result<f64> {
        let abs = errors(self, compare_to)?.mapv(f64::abs);
        Ok(*abs.max_skipnan())
    }

    fn mean_absolute_error<S: Data<Elem = f64>>(
        &self,
        compare_to: &ArrayBase<S, Ix1>,
    ) -> Result<f64> {
        let abs = errors(self, compare_to)?.mapv(f64::abs);
        Ok(abs.sum() / abs.len() as f64)
    }

    fn mean_squared_error<S: Data<Elem = f64>>(
        &self,
        compare_to: &ArrayBase<S, Ix1>,
    ) -> Result<f64> {
        let sq = errors(self, compare_to)?.mapv(|v| v * v);
        Ok(sq.sum() / sq.len() as f64)
    }

    fn r2<S: Data<Elem = f64>>(&self, compare_to: &ArrayBase<S, Ix1>) -> Result<f64> {
        let residuals = errors(self, compare_to)?;
        let ss_res = residuals.mapv(|v| v * v).sum();
        let mean = self.sum() / self.len() as f64;
        let ss_tot = self.mapv(|v| (v - mean).powi(2)).sum();
        Ok(ratio_score(ss_res, ss_tot))
    }

    fn explained_variance<S: Data<Elem = f64>>(
        &self,
        compare_to: &ArrayBase<S, Ix1>,
    ) -> Result<f64> {
        let residuals = errors(self, compare_to)?;
        Ok(ratio_score(variance(&residuals), variance(self)))
    }
}

fn errors<D, S>(truth: &ArrayBase<D, Ix1>, predicted: &ArrayBase<S, Ix1>) -> Result<Array1<f64>>
where
    D: Data<Elem = f64>,
    S: Data<Elem = f64>,
{
    if truth.len() != predicted.len() {
        return Err(Error::ShapeMismatch {
            expected: truth.len(),
            actual: predicted.len(),
        });
    }
    if truth.is_empty() {
        return Err(Error::EmptyDataset);
    }
    Ok(truth - predicted)
}

fn variance<D: Data<Elem = f64>>(x: &ArrayBase<D, Ix1>) -> f64 {
    let mean = x.sum() / x.len() as f64;
    x.mapv(|v| (v - mean).powi(2)).sum() / x.len() as f64
}

// 1 - num / den, with a constant target scoring 1 only for a perfect fit.
fn ratio_score(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        if num == 0.0 {
            1.0
        } else {
            f64::NEG_INFINITY
        }
    } else {
        1.0 - num / den
    }
}

/// Standard summary of a regression fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionMetrics {
    pub root_mean_squared_error: f64,
    pub mean_squared_error: f64,
    pub mean_absolute_error: f64,
    pub max_error: f64,
    pub r2: f64,
    pub explained_variance: f64,
}

impl RegressionMetrics {
    pub fn new<D, S>(truth: &ArrayBase<D, Ix1>, predicted: &ArrayBase<S, Ix1>) -> Result<Self>
    where
        D: Data<Elem = f64>,
        S: Data<Elem = f64>,
    {
        let mean_squared_error = truth.mean_squared_error(predicted)?;
        Ok(RegressionMetrics {
            root_mean_squared_error: mean_squared_error.sqrt(),
            mean_squared_error,
            mean_absolute_error: truth.mean_absolute_error(predicted)?,
            max_error: truth.max_error(predicted)?,
            r2: truth.r2(predicted)?,
            explained_variance: truth.explained_variance(predicted)?,
        })
    }
}
