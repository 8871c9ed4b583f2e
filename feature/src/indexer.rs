use std::collections::HashMap;

use tracing::info;

use btr::error::{Error, Result};
use btr::traits::{Fit, Transformer};
use btr::{DataFrame, DataType, Field, Value};
use btr_numrs::distinct_sorted;

/// Learns integer codes for the values of one categorical column.
///
/// A numeric column with at most `max_categories` distinct values is indexed,
/// one with more is treated as continuous and passed through as `double`.
/// String columns are always indexed and fail above the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorIndexer {
    input_col: String,
    output_col: String,
    max_categories: usize,
}

impl VectorIndexer {
    pub fn params(input_col: impl Into<String>, output_col: impl Into<String>) -> VectorIndexer {
        VectorIndexer {
            input_col: input_col.into(),
            output_col: output_col.into(),
            max_categories: 20,
        }
    }

    pub fn max_categories(mut self, max_categories: usize) -> VectorIndexer {
        self.max_categories = max_categories;
        self
    }

    pub fn input_col(&self) -> &str {
        &self.input_col
    }

    pub fn output_col(&self) -> &str {
        &self.output_col
    }

    fn model(&self, kind: IndexerKind) -> VectorIndexerModel {
        VectorIndexerModel {
            input_col: self.input_col.clone(),
            output_col: self.output_col.clone(),
            kind,
        }
    }
}

/// Ordered category labels; a value's code is its position.
#[derive(Debug, Clone, PartialEq)]
pub enum Categories {
    /// Ascending, except that `0.0` always takes code 0 when present.
    Numeric(Vec<f64>),
    /// Most frequent first, ties in lexical order.
    Text(Vec<String>),
}

impl Categories {
    pub fn len(&self) -> usize {
        match self {
            Categories::Numeric(v) => v.len(),
            Categories::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndexerKind {
    Categorical(Categories),
    Continuous,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorIndexerModel {
    input_col: String,
    output_col: String,
    kind: IndexerKind,
}

impl VectorIndexerModel {
    pub fn kind(&self) -> &IndexerKind {
        &self.kind
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self.kind, IndexerKind::Categorical(_))
    }

    pub fn output_col(&self) -> &str {
        &self.output_col
    }
}

impl Fit<DataFrame> for VectorIndexer {
    type Object = VectorIndexerModel;

    fn fit(&self, df: &DataFrame) -> Result<VectorIndexerModel> {
        let field = df.field(&self.input_col)?;
        let values = df.column(&self.input_col)?;

        if field.data_type == DataType::String {
            let labels = frequency_order(values);
            if labels.len() > self.max_categories {
                return Err(Error::TooManyCategories {
                    column: self.input_col.clone(),
                    distinct: labels.len(),
                    max: self.max_categories,
                });
            }
            info!(column = %self.input_col, categories = labels.len(), "indexed string column");
            return Ok(self.model(IndexerKind::Categorical(Categories::Text(labels))));
        }

        let numbers: Vec<f64> = values.iter().filter_map(Value::as_f64).collect();
        let mut distinct = distinct_sorted(&numbers);
        if distinct.len() > self.max_categories {
            info!(
                column = %self.input_col,
                distinct = distinct.len(),
                max_categories = self.max_categories,
                "treating column as continuous"
            );
            return Ok(self.model(IndexerKind::Continuous));
        }
        if let Some(pos) = distinct.iter().position(|v| *v == 0.0) {
            let zero = distinct.remove(pos);
            distinct.insert(0, zero);
        }
        info!(column = %self.input_col, categories = distinct.len(), "indexed numeric column");
        Ok(self.model(IndexerKind::Categorical(Categories::Numeric(distinct))))
    }
}

impl Transformer<DataFrame> for VectorIndexerModel {
    fn transform(&self, df: DataFrame) -> Result<DataFrame> {
        let values = df.column(&self.input_col)?;
        let (data_type, out) = match &self.kind {
            IndexerKind::Continuous => {
                let out = values
                    .iter()
                    .map(|v| v.as_f64().map_or(Value::Null, Value::Double))
                    .collect();
                (DataType::Double, out)
            }
            IndexerKind::Categorical(Categories::Numeric(labels)) => {
                let out = values
                    .iter()
                    .map(|v| match v.as_f64() {
                        None => Ok(Value::Null),
                        Some(x) => {
                            let x = if x == 0.0 { 0.0 } else { x };
                            labels
                                .iter()
                                .position(|l| l.total_cmp(&x).is_eq())
                                .map(|code| Value::Integer(code as i64))
                                .ok_or_else(|| self.unseen(v))
                        }
                    })
                    .collect::<Result<Vec<_>>>()?;
                (DataType::Integer, out)
            }
            IndexerKind::Categorical(Categories::Text(labels)) => {
                let codes: HashMap<&str, usize> = labels
                    .iter()
                    .enumerate()
                    .map(|(code, label)| (label.as_str(), code))
                    .collect();
                let out = values
                    .iter()
                    .map(|v| match v {
                        Value::Null => Ok(Value::Null),
                        other => codes
                            .get(other.to_string().as_str())
                            .map(|code| Value::Integer(*code as i64))
                            .ok_or_else(|| self.unseen(other)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                (DataType::Integer, out)
            }
        };
        df.with_column(Field::new(self.output_col.clone(), data_type), out)
    }
}

impl VectorIndexerModel {
    fn unseen(&self, value: &Value) -> Error {
        Error::UnseenCategory {
            column: self.input_col.clone(),
            value: value.to_string(),
        }
    }
}

fn frequency_order(values: &[Value]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for v in values.iter().filter(|v| !v.is_null()) {
        *counts.entry(v.to_string()).or_insert(0) += 1;
    }
    let mut labels: Vec<(String, usize)> = counts.into_iter().collect();
    labels.sort_by(|(a, ca), (b, cb)| cb.cmp(ca).then_with(|| a.cmp(b)));
    labels.into_iter().map(|(label, _)| label).collect()
}
