//! btr prelude.
//!
//! This module contains the most used types, type aliases, traits and
//! functions that you can import easily as a group.
//!

pub use crate::error::{Error, Result};

pub use crate::traits::*;

pub use crate::dataset::Dataset;

pub use crate::frame::{CsvOptions, DataFrame, DataType, Field, Value};

pub use crate::metrics_regression::Regression;
