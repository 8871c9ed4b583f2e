use std::fmt::Write;

use btr::error::Result;
use btr::traits::Summary;
use btr::{DataFrame, DataType, Field, Value};
use btr_numrs::format_dense;

use crate::JobOutcome;

/// Render the training report shown to the user.
pub fn render(outcome: &JobOutcome, preview_rows: usize) -> Result<String> {
    let summary = outcome.model.summary();
    let residuals = DataFrame::new(
        vec![Field::new("residuals", DataType::Double)],
        vec![summary.residuals().iter().map(|r| Value::Double(*r)).collect()],
    )?;

    let mut out = String::new();
    // writing into a String cannot fail
    out.push_str(&outcome.input_preview);
    out.push_str(&outcome.indexed_preview);
    let _ = writeln!(out, "{}", outcome.model);
    let _ = writeln!(out, "numIterations: {}", summary.total_iterations());
    let _ = writeln!(out, "objectiveHistory: {}", format_dense(summary.objective_history()));
    out.push_str(&residuals.show(preview_rows));
    let _ = writeln!(out, "RMSE: {}", summary.root_mean_squared_error());
    let _ = writeln!(out, "r2: {}", summary.r2());
    let _ = writeln!(out, "MAE: {}", summary.mean_absolute_error());
    let _ = writeln!(out, "MSE: {}", summary.mean_squared_error());
    let _ = writeln!(out, "explainedVariance: {}", summary.explained_variance());
    if let Some(holdout) = &outcome.holdout {
        let _ = writeln!(out, "Holdout RMSE: {}", holdout.root_mean_squared_error);
        let _ = writeln!(out, "Holdout MAE: {}", holdout.mean_absolute_error);
        let _ = writeln!(out, "Holdout r2: {}", holdout.r2);
    }
    Ok(out)
}
