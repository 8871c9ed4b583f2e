//! Provide traits for the different stages of a training pipeline
//!
//! Estimators learn from data with [`Fit`] and hand back a fitted object.
//! Fitted feature stages implement [`Transformer`], fitted models implement
//! [`Predict`] and expose their training diagnostics through [`Summary`].

use crate::error::Result;

/// Apply a fitted stage to data
pub trait Transformer<T> {
    fn transform(&self, x: T) -> Result<T>;
}

/// Fit a set of parameters to data
pub trait Fit<T> {
    type Object;

    fn fit(&self, x: &T) -> Result<Self::Object>;

    /// Fit on `x`, then feed `x` through the fitted stage.
    fn fit_transform(&self, x: T) -> Result<T>
    where
        Self::Object: Transformer<T>,
    {
        let fitted = self.fit(&x)?;
        fitted.transform(x)
    }
}

/// Predict targets for a set of records
pub trait Predict<R, T> {
    fn predict(&self, x: R) -> T;
}

/// Diagnostics collected while fitting
pub trait Summary {
    type Output;

    fn summary(&self) -> &Self::Output;
}
