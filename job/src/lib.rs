//! Training job for the trip duration model.
//!
//! [`train`] reads the trips CSV, indexes the categorical columns, assembles
//! the feature vectors and fits the linear model. [`run`] does the same and
//! writes the report, all or nothing.

mod config;
mod report;

use std::io::Write;
use std::path::Path;

use tracing::info;

use btr::error::{Error, Result};
use btr::metrics::RegressionMetrics;
use btr::traits::Fit;
use btr::{DataFrame, Schema};
use btr_feature::VectorAssembler;
use btr_linear::FittedLinearRegression;

pub use config::{Holdout, JobConfig};
pub use report::render;

/// Everything the job learned, ready to be reported.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub input_schema: Schema,
    /// Schema tree followed by the first row.
    pub input_preview: String,
    pub indexed_schema: Schema,
    /// Same as `input_preview`, after the categorical columns were indexed.
    pub indexed_preview: String,
    pub model: FittedLinearRegression,
    pub holdout: Option<RegressionMetrics>,
}

pub fn train(config: &JobConfig, path: &Path) -> Result<JobOutcome> {
    if config.feature_columns.is_empty() {
        return Err(Error::InvalidParameter(
            "at least one feature column is required".to_string(),
        ));
    }

    let mut df = DataFrame::read_csv(path, &config.csv)?;
    info!(rows = df.n_rows(), path = %path.display(), "read training data");
    if df.is_empty() {
        return Err(Error::EmptyDataset);
    }
    let input_schema = df.schema().clone();
    let input_preview = format!("{}{}", df.print_schema(), df.show(1));

    for indexer in config.indexers() {
        df = indexer.fit_transform(df)?;
    }
    let indexed_schema = df.schema().clone();
    let indexed_preview = format!("{}{}", df.print_schema(), df.show(1));

    let dataset = VectorAssembler::new(config.assembled_columns())
        .handle_invalid(config.handle_invalid)
        .assemble(&df, &config.label_column)?;

    let estimator = config.estimator();
    let (model, holdout) = match config.holdout {
        None => (estimator.fit(&dataset)?, None),
        Some(holdout) => {
            let (train, test) = dataset.split_with_ratio(1.0 - holdout.test_fraction, holdout.seed)?;
            info!(train = train.nsamples(), test = test.nsamples(), "split holdout");
            let model = estimator.fit(&train)?;
            let metrics = model.evaluate(&test)?;
            (model, Some(metrics))
        }
    };
    info!(equation = %model.equation(), "trained duration model");

    Ok(JobOutcome {
        input_schema,
        input_preview,
        indexed_schema,
        indexed_preview,
        model,
        holdout,
    })
}

/// Train and write the report to `out`. Nothing is written on failure.
pub fn run<W: Write>(config: &JobConfig, path: &Path, out: &mut W) -> Result<JobOutcome> {
    let outcome = train(config, path)?;
    let text = render(&outcome, config.preview_rows)?;
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use btr::DataType;
    use btr::traits::Summary;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    const WEEK_DAYS: [&str; 7] = [
        "MONDAY",
        "TUESDAY",
        "WEDNESDAY",
        "THURSDAY",
        "FRIDAY",
        "SATURDAY",
        "SUNDAY",
    ];

    // duration = 2 * departure; the other columns cycle independently
    fn trips_csv(rows: usize, routes: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "route,week_day,departure,arrival,difference_previous_schedule,difference_next_schedule,duration"
        )
        .unwrap();
        for i in 0..rows {
            let departure = (i % 97) as f64 * 10.0 + (i / 97) as f64;
            writeln!(
                file,
                "{},{},{},{},{},{},{}",
                i % routes,
                WEEK_DAYS[i % 7],
                departure,
                (i * 37 % 60) * 10 + 5,
                i % 3,
                i % 4,
                2.0 * departure
            )
            .unwrap();
        }
        file
    }

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn unregularised_fit_recovers_departure_weight() {
        let file = trips_csv(120, 5);
        let config = JobConfig {
            reg_param: 0.0,
            max_iter: 2000,
            tolerance: 1e-12,
            ..JobConfig::default()
        };
        let outcome = train(&config, file.path()).unwrap();

        assert_abs_diff_eq!(outcome.model.coefficients()[0], 2.0, epsilon = 1e-3);
        assert_abs_diff_eq!(outcome.model.summary().r2(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn default_fit_recovers_departure_weight() {
        let file = trips_csv(120, 5);
        let outcome = train(&JobConfig::default(), file.path()).unwrap();
        let model = &outcome.model;

        assert_eq!(model.coefficients().len(), 6);
        assert_abs_diff_eq!(model.coefficients()[0], 2.0, epsilon = 1e-2);
        assert!(model.summary().total_iterations() <= 10);
        assert_eq!(
            model.feature_names()[2..4].to_vec(),
            vec!["route_index", "week_day_index"]
        );
    }

    #[test]
    fn training_is_deterministic() {
        let file = trips_csv(80, 5);
        let a = train(&JobConfig::default(), file.path()).unwrap();
        let b = train(&JobConfig::default(), file.path()).unwrap();

        assert_eq!(a.model.coefficients(), b.model.coefficients());
        assert_eq!(a.model.intercept(), b.model.intercept());
    }

    #[test]
    fn route_threshold_is_inclusive() {
        let at_limit = train(&JobConfig::default(), trips_csv(480, 240).path()).unwrap();
        let over_limit = train(&JobConfig::default(), trips_csv(482, 241).path()).unwrap();

        assert_abs_diff_eq!(at_limit.model.coefficients()[0], 2.0, epsilon = 1e-2);
        assert_eq!(
            at_limit.indexed_schema.field("route_index").unwrap().data_type,
            DataType::Integer
        );
        assert_eq!(
            over_limit.indexed_schema.field("route_index").unwrap().data_type,
            DataType::Double
        );
    }

    #[test]
    fn missing_label_aborts_without_report() {
        let file = write_csv("route,week_day,departure,arrival,difference_previous_schedule,difference_next_schedule\n1,MONDAY,10,20,0,0\n");
        let mut out = Vec::new();
        let err = run(&JobConfig::default(), file.path(), &mut out).unwrap_err();

        assert!(matches!(err, Error::MissingColumn(name) if name == "duration"));
        assert!(out.is_empty());
    }

    #[test]
    fn header_only_input_aborts() {
        let file = write_csv("route,week_day,departure,arrival,difference_previous_schedule,difference_next_schedule,duration\n");
        let mut out = Vec::new();
        let err = run(&JobConfig::default(), file.path(), &mut out).unwrap_err();

        assert!(matches!(err, Error::EmptyDataset));
        assert!(out.is_empty());
    }

    #[test]
    fn repeated_header_aborts_without_report() {
        let file = write_csv("route,week_day,departure,arrival,difference_previous_schedule,difference_next_schedule,duration,duration\n1,MONDAY,10,20,0,0,20,abc\n2,TUESDAY,20,30,1,1,40,def\n");
        let mut out = Vec::new();
        let err = run(&JobConfig::default(), file.path(), &mut out).unwrap_err();

        assert!(matches!(err, Error::DuplicateColumn(name) if name == "duration"));
        assert!(out.is_empty());
    }

    #[test]
    fn infinite_duration_aborts_without_report() {
        let file = write_csv("route,week_day,departure,arrival,difference_previous_schedule,difference_next_schedule,duration\n1,MONDAY,10,20,0,0,20\n2,TUESDAY,20,30,1,1,inf\n1,FRIDAY,30,45,2,0,60\n");
        let mut out = Vec::new();
        let err = run(&JobConfig::default(), file.path(), &mut out).unwrap_err();

        assert!(matches!(err, Error::NonFinite(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn unreadable_path_aborts() {
        let err = train(&JobConfig::default(), Path::new("/nonexistent/trips.csv")).unwrap_err();

        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn holdout_is_scored() {
        let file = trips_csv(100, 5);
        let config = JobConfig {
            holdout: Some(Holdout::default()),
            ..JobConfig::default()
        };
        let outcome = train(&config, file.path()).unwrap();

        assert_eq!(outcome.model.summary().num_instances(), 70);
        assert!(outcome.holdout.is_some());
    }

    #[test]
    fn run_writes_full_report() {
        let file = trips_csv(30, 5);
        let mut out = Vec::new();
        run(&JobConfig::default(), file.path(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let order = [
            "root",
            "Coefficients: [",
            "numIterations: ",
            "objectiveHistory: [",
            "residuals",
            "RMSE: ",
            "r2: ",
        ];
        let mut from = 0;
        for needle in order.iter() {
            let pos = text[from..].find(needle).unwrap_or_else(|| panic!("missing {}", needle));
            from += pos + needle.len();
        }
    }
}
