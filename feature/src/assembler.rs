use ndarray::{Array1, Array2};
use tracing::{debug, warn};

use btr::error::{Error, Result};
use btr::{DataFrame, DataType, Dataset, Value};

/// What to do with a row holding a null in an assembled column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleInvalid {
    Error,
    Skip,
}

impl Default for HandleInvalid {
    fn default() -> Self {
        HandleInvalid::Error
    }
}

/// Concatenates numeric columns, in the given order, into one feature
/// vector per row.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorAssembler {
    input_cols: Vec<String>,
    handle_invalid: HandleInvalid,
}

impl VectorAssembler {
    pub fn new<S: Into<String>>(input_cols: Vec<S>) -> VectorAssembler {
        VectorAssembler {
            input_cols: input_cols.into_iter().map(Into::into).collect(),
            handle_invalid: HandleInvalid::default(),
        }
    }

    pub fn handle_invalid(mut self, handle_invalid: HandleInvalid) -> VectorAssembler {
        self.handle_invalid = handle_invalid;
        self
    }

    pub fn input_cols(&self) -> &[String] {
        &self.input_cols
    }

    /// Build the numeric dataset with `label` as target.
    pub fn assemble(&self, df: &DataFrame, label: &str) -> Result<Dataset> {
        for name in self.input_cols.iter().map(String::as_str).chain(Some(label)) {
            df.field(name)?;
        }
        // header-only input types every column as string
        if df.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let features = self
            .input_cols
            .iter()
            .map(|name| numeric_column(df, name))
            .collect::<Result<Vec<_>>>()?;
        let target = numeric_column(df, label)?;

        let mut records = Vec::with_capacity(df.n_rows() * features.len());
        let mut targets = Vec::with_capacity(df.n_rows());
        let mut skipped = 0;
        'rows: for row in 0..df.n_rows() {
            let mut values = Vec::with_capacity(features.len() + 1);
            for (name, col) in self
                .input_cols
                .iter()
                .map(String::as_str)
                .zip(&features)
                .chain(std::iter::once((label, &target)))
            {
                match col[row].as_f64() {
                    Some(v) => values.push(v),
                    None if self.handle_invalid == HandleInvalid::Skip => {
                        skipped += 1;
                        continue 'rows;
                    }
                    None => {
                        return Err(Error::NullValue {
                            column: name.to_string(),
                            row,
                        })
                    }
                }
            }
            targets.extend(values.pop());
            records.extend(values);
        }

        if skipped > 0 {
            warn!(skipped, "dropped rows with null values");
        }
        if targets.is_empty() {
            return Err(Error::EmptyDataset);
        }
        debug!(rows = targets.len(), features = features.len(), "assembled features");

        let records = Array2::from_shape_vec((targets.len(), features.len()), records)
            .map_err(|_| Error::ShapeMismatch {
                expected: targets.len() * features.len(),
                actual: 0,
            })?;
        Dataset::new(records, Array1::from(targets))?.with_feature_names(self.input_cols.clone())
    }
}

fn numeric_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a [Value]> {
    let field = df.field(name)?;
    if field.data_type == DataType::String {
        return Err(Error::NotNumeric {
            column: name.to_string(),
            data_type: field.data_type.to_string(),
        });
    }
    df.column(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use btr::CsvOptions;
    use ndarray::array;

    fn frame(csv: &str) -> DataFrame {
        DataFrame::from_reader(csv.as_bytes(), &CsvOptions::default()).unwrap()
    }

    #[test]
    fn assemble_keeps_column_order() {
        let df = frame("duration,arrival,departure,rush\n10,5.5,3,true\n20,7.5,4,false\n");
        let dataset = VectorAssembler::new(vec!["departure", "arrival", "rush"])
            .assemble(&df, "duration")
            .unwrap();

        assert_eq!(dataset.records(), &array![[3.0, 5.5, 1.0], [4.0, 7.5, 0.0]]);
        assert_eq!(dataset.targets(), &array![10.0, 20.0]);
        assert_eq!(dataset.feature_names(), &["departure", "arrival", "rush"]);
    }

    #[test]
    fn null_fails_by_default() {
        let df = frame("duration,departure\n10,3\n,4\n");
        let err = VectorAssembler::new(vec!["departure"])
            .assemble(&df, "duration")
            .unwrap_err();

        assert!(matches!(err, Error::NullValue { ref column, row: 1 } if column == "duration"));
    }

    #[test]
    fn null_rows_can_be_skipped() {
        let df = frame("duration,departure\n10,3\n20,\n30,5\n");
        let dataset = VectorAssembler::new(vec!["departure"])
            .handle_invalid(HandleInvalid::Skip)
            .assemble(&df, "duration")
            .unwrap();

        assert_eq!(dataset.records(), &array![[3.0], [5.0]]);
        assert_eq!(dataset.targets(), &array![10.0, 30.0]);
    }

    #[test]
    fn string_column_is_rejected() {
        let df = frame("duration,week_day\n10,MONDAY\n");
        let err = VectorAssembler::new(vec!["week_day"])
            .assemble(&df, "duration")
            .unwrap_err();

        assert!(matches!(err, Error::NotNumeric { .. }));
    }

    #[test]
    fn missing_label_is_rejected() {
        let df = frame("departure\n3\n");
        let err = VectorAssembler::new(vec!["departure"])
            .assemble(&df, "duration")
            .unwrap_err();

        assert!(matches!(err, Error::MissingColumn(name) if name == "duration"));
    }

    #[test]
    fn header_only_input_is_empty() {
        let df = frame("duration,departure\n");
        let err = VectorAssembler::new(vec!["departure"])
            .assemble(&df, "duration")
            .unwrap_err();

        assert!(matches!(err, Error::EmptyDataset));
    }
}
