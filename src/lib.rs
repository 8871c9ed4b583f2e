//! `btr` provides the building blocks to train a trip duration model from
//! historical bus trip records.
//!
//! Kin in spirit to Spark ML, it loads a CSV into a [`DataFrame`] with an
//! inferred schema, turns the selected columns into a numeric [`Dataset`] and
//! offers regression metrics to judge the fitted model.
//!

pub mod dataset;
pub mod error;
pub mod frame;
mod metrics_regression;
pub mod prelude;
pub mod traits;

pub use dataset::Dataset;
pub use error::{Error, Result};
pub use frame::{CsvOptions, DataFrame, DataType, Field, Schema, Value};

/// Common metrics functions for regression
pub mod metrics {
    pub use crate::metrics_regression::{Regression, RegressionMetrics};
}
