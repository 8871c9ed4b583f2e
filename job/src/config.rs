use btr::CsvOptions;
use btr_feature::{HandleInvalid, VectorIndexer};
use btr_linear::LinearRegression;

/// Rows held back to score the model on data it was not fitted on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Holdout {
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for Holdout {
    fn default() -> Self {
        Holdout {
            test_fraction: 0.3,
            seed: 24,
        }
    }
}

/// Everything the training job needs besides the input path.
#[derive(Debug, Clone, PartialEq)]
pub struct JobConfig {
    pub categorical_columns: Vec<String>,
    /// Columns with more distinct values than this are treated as continuous.
    pub max_categories: usize,
    /// Feature vector layout. Categorical columns are replaced by their
    /// indexed counterparts.
    pub feature_columns: Vec<String>,
    pub label_column: String,
    pub max_iter: usize,
    pub reg_param: f64,
    pub elastic_net_param: f64,
    pub tolerance: f64,
    pub csv: CsvOptions,
    pub handle_invalid: HandleInvalid,
    pub holdout: Option<Holdout>,
    /// Residual rows printed in the report.
    pub preview_rows: usize,
}

impl Default for JobConfig {
    fn default() -> Self {
        JobConfig {
            categorical_columns: strings(&["route", "week_day"]),
            // number of routes
            max_categories: 240,
            feature_columns: strings(&[
                "departure",
                "arrival",
                "route",
                "week_day",
                "difference_previous_schedule",
                "difference_next_schedule",
            ]),
            label_column: "duration".to_string(),
            max_iter: 10,
            reg_param: 0.3,
            elastic_net_param: 1.0,
            tolerance: 1e-6,
            csv: CsvOptions::default(),
            handle_invalid: HandleInvalid::Error,
            holdout: None,
            preview_rows: 20,
        }
    }
}

impl JobConfig {
    pub fn indexers(&self) -> Vec<VectorIndexer> {
        self.categorical_columns
            .iter()
            .map(|col| {
                VectorIndexer::params(col.clone(), index_column(col))
                    .max_categories(self.max_categories)
            })
            .collect()
    }

    /// Feature columns as they are named after indexing.
    pub fn assembled_columns(&self) -> Vec<String> {
        self.feature_columns
            .iter()
            .map(|col| {
                if self.categorical_columns.contains(col) {
                    index_column(col)
                } else {
                    col.clone()
                }
            })
            .collect()
    }

    pub fn estimator(&self) -> LinearRegression {
        LinearRegression::params()
            .max_iter(self.max_iter)
            .reg_param(self.reg_param)
            .elastic_net_param(self.elastic_net_param)
            .tolerance(self.tolerance)
    }
}

fn index_column(col: &str) -> String {
    format!("{}_index", col)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
