//! Column-oriented table loaded from delimited text.
//!
//! Every column gets a single [`DataType`] guessed from the values it holds,
//! the same way a schema-inferring CSV reader does it: a column is an
//! `integer` column if all non-null values parse as `i64`, a `double` column
//! if they all parse as `f64`, a `boolean` column if they all read `true` or
//! `false`, and a `string` column otherwise.

use std::fmt;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// A single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the cell. Booleans read as 0 and 1, text and nulls
    /// have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            Value::Boolean(v) => Some(if *v { 1.0 } else { 0.0 }),
            Value::Null | Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{:?}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Text(v) => f.write_str(v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Integer,
    Double,
    Boolean,
    String,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Integer => "integer",
            DataType::Double => "double",
            DataType::Boolean => "boolean",
            DataType::String => "string",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Field {
        Field {
            name: name.into(),
            data_type,
            nullable: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Renders the schema as a tree, one line per column.
impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "root")?;
        for field in &self.fields {
            writeln!(
                f,
                " |-- {}: {} (nullable = {})",
                field.name, field.data_type, field.nullable
            )?;
        }
        Ok(())
    }
}

/// Options for reading delimited text.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Token read as null in addition to the empty field.
    pub null_value: Option<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            null_value: None,
        }
    }
}

impl CsvOptions {
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn null_value(mut self, token: impl Into<String>) -> Self {
        self.null_value = Some(token.into());
        self
    }

    fn is_null(&self, raw: &str) -> bool {
        raw.is_empty() || self.null_value.as_deref() == Some(raw)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    schema: Schema,
    columns: Vec<Vec<Value>>,
    n_rows: usize,
}

impl DataFrame {
    /// Build a frame from already typed columns.
    pub fn new(fields: Vec<Field>, columns: Vec<Vec<Value>>) -> Result<DataFrame> {
        if fields.len() != columns.len() {
            return Err(Error::ShapeMismatch {
                expected: fields.len(),
                actual: columns.len(),
            });
        }
        let n_rows = columns.first().map_or(0, Vec::len);
        if let Some(col) = columns.iter().find(|c| c.len() != n_rows) {
            return Err(Error::ShapeMismatch {
                expected: n_rows,
                actual: col.len(),
            });
        }
        Ok(DataFrame {
            schema: Schema { fields },
            columns,
            n_rows,
        })
    }

    pub fn read_csv<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<DataFrame> {
        let file = File::open(path.as_ref())?;
        let frame = DataFrame::from_reader(file, options)?;
        debug!(
            path = %path.as_ref().display(),
            rows = frame.n_rows(),
            columns = frame.schema().len(),
            "loaded csv"
        );
        Ok(frame)
    }

    pub fn from_reader<R: Read>(reader: R, options: &CsvOptions) -> Result<DataFrame> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        if headers.is_empty() || headers.iter().all(str::is_empty) {
            return Err(Error::EmptyHeader);
        }
        for (i, name) in headers.iter().enumerate() {
            if headers.iter().take(i).any(|seen| seen == name) {
                return Err(Error::DuplicateColumn(name.to_string()));
            }
        }

        let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for record in rdr.records() {
            let record = record?;
            for (col, cell) in raw.iter_mut().zip(record.iter()) {
                if options.is_null(cell) {
                    col.push(None);
                } else {
                    col.push(Some(cell.to_string()));
                }
            }
        }

        let mut fields = Vec::with_capacity(headers.len());
        let mut columns = Vec::with_capacity(headers.len());
        for (name, cells) in headers.iter().zip(raw) {
            let data_type = infer_type(&cells);
            columns.push(
                cells
                    .into_iter()
                    .map(|cell| parse_value(cell, data_type))
                    .collect(),
            );
            fields.push(Field::new(name, data_type));
        }
        DataFrame::new(fields, columns)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn field(&self, name: &str) -> Result<&Field> {
        self.schema
            .field(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Result<&[Value]> {
        let idx = self
            .schema
            .index_of(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))?;
        Ok(&self.columns[idx])
    }

    /// Append a column, replacing any column with the same name.
    pub fn with_column(mut self, field: Field, values: Vec<Value>) -> Result<DataFrame> {
        if values.len() != self.n_rows {
            return Err(Error::ShapeMismatch {
                expected: self.n_rows,
                actual: values.len(),
            });
        }
        match self.schema.index_of(&field.name) {
            Some(idx) => {
                self.schema.fields[idx] = field;
                self.columns[idx] = values;
            }
            None => {
                self.schema.fields.push(field);
                self.columns.push(values);
            }
        }
        Ok(self)
    }

    /// The schema as a tree, one line per column.
    pub fn print_schema(&self) -> String {
        self.schema.to_string()
    }

    /// Render the first `n` rows as a text table.
    pub fn show(&self, n: usize) -> String {
        let shown = n.min(self.n_rows);
        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|col| col[..shown].iter().map(Value::to_string).collect())
            .collect();
        let widths: Vec<usize> = self
            .schema
            .fields
            .iter()
            .zip(&cells)
            .map(|(field, col)| {
                col.iter()
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(field.name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut border = String::from("+");
        for w in &widths {
            border.push_str(&"-".repeat(*w));
            border.push('+');
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", border);
        out.push('|');
        for (field, w) in self.schema.fields.iter().zip(&widths) {
            let _ = write!(out, "{:>width$}|", field.name, width = w);
        }
        out.push('\n');
        let _ = writeln!(out, "{}", border);
        for row in 0..shown {
            out.push('|');
            for (col, w) in cells.iter().zip(&widths) {
                let _ = write!(out, "{:>width$}|", col[row], width = w);
            }
            out.push('\n');
        }
        let _ = writeln!(out, "{}", border);
        if shown < self.n_rows {
            let _ = writeln!(out, "only showing top {} rows", shown);
        }
        out
    }
}

fn infer_type(cells: &[Option<String>]) -> DataType {
    let mut values = cells.iter().flatten().peekable();
    if values.peek().is_none() {
        return DataType::String;
    }
    let values: Vec<&String> = values.collect();
    if values.iter().all(|v| v.parse::<i64>().is_ok()) {
        DataType::Integer
    } else if values.iter().all(|v| v.parse::<f64>().is_ok()) {
        DataType::Double
    } else if values.iter().all(|v| parse_bool(v).is_some()) {
        DataType::Boolean
    } else {
        DataType::String
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

// `data_type` was inferred from the same cells, so parsing cannot fail here.
fn parse_value(cell: Option<String>, data_type: DataType) -> Value {
    let raw = match cell {
        None => return Value::Null,
        Some(raw) => raw,
    };
    match data_type {
        DataType::Integer => raw.parse().map_or(Value::Null, Value::Integer),
        DataType::Double => raw.parse().map_or(Value::Null, Value::Double),
        DataType::Boolean => parse_bool(&raw).map_or(Value::Null, Value::Boolean),
        DataType::String => Value::Text(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIPS: &str = "route,week_day,departure,duration,holiday\n\
                         022,MONDAY,1.5,12,true\n\
                         507,TUESDAY,2,,false\n\
                         022,MONDAY,-,14,FALSE\n";

    #[test]
    fn from_reader_infers_schema() {
        let df = DataFrame::from_reader(TRIPS.as_bytes(), &CsvOptions::default()).unwrap();
        let types: Vec<DataType> = df.schema().fields().iter().map(|f| f.data_type).collect();

        assert_eq!(df.n_rows(), 3);
        assert_eq!(
            types,
            vec![
                DataType::Integer,
                DataType::String,
                DataType::String,
                DataType::Integer,
                DataType::Boolean
            ]
        );
        assert_eq!(df.column("route").unwrap()[1], Value::Integer(507));
        assert_eq!(df.column("duration").unwrap()[1], Value::Null);
    }

    #[test]
    fn from_reader_honours_null_token() {
        let options = CsvOptions::default().null_value("-");
        let df = DataFrame::from_reader(TRIPS.as_bytes(), &options).unwrap();

        assert_eq!(df.field("departure").unwrap().data_type, DataType::Double);
        assert_eq!(df.column("departure").unwrap()[1], Value::Double(2.0));
        assert!(df.column("departure").unwrap()[2].is_null());
    }

    #[test]
    fn from_reader_rejects_empty_input() {
        let err = DataFrame::from_reader("".as_bytes(), &CsvOptions::default()).unwrap_err();

        assert!(matches!(err, Error::EmptyHeader));
    }

    #[test]
    fn from_reader_rejects_ragged_rows() {
        let err = DataFrame::from_reader("a,b\n1,2\n3\n".as_bytes(), &CsvOptions::default())
            .unwrap_err();

        assert!(matches!(err, Error::Csv(_)));
    }

    #[test]
    fn from_reader_rejects_repeated_header() {
        let err = DataFrame::from_reader(
            "departure,duration,duration\n10,20,abc\n".as_bytes(),
            &CsvOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::DuplicateColumn(name) if name == "duration"));
    }

    #[test]
    fn from_reader_keeps_header_only_input() {
        let df = DataFrame::from_reader("a,b\n".as_bytes(), &CsvOptions::default()).unwrap();

        assert!(df.is_empty());
        assert_eq!(df.schema().len(), 2);
    }

    #[test]
    fn column_reports_missing_name() {
        let df = DataFrame::from_reader(TRIPS.as_bytes(), &CsvOptions::default()).unwrap();

        match df.column("arrival") {
            Err(Error::MissingColumn(name)) => assert_eq!(name, "arrival"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn with_column_appends_and_replaces() {
        let df = DataFrame::from_reader("a\n1\n2\n".as_bytes(), &CsvOptions::default()).unwrap();
        let df = df
            .with_column(
                Field::new("b", DataType::Double),
                vec![Value::Double(0.5), Value::Double(1.5)],
            )
            .unwrap();
        let df = df
            .with_column(
                Field::new("a", DataType::Boolean),
                vec![Value::Boolean(true), Value::Boolean(false)],
            )
            .unwrap();

        assert_eq!(df.schema().len(), 2);
        assert_eq!(df.field("a").unwrap().data_type, DataType::Boolean);
        assert_eq!(df.column("b").unwrap()[1], Value::Double(1.5));
    }

    #[test]
    fn with_column_rejects_wrong_length() {
        let df = DataFrame::from_reader("a\n1\n2\n".as_bytes(), &CsvOptions::default()).unwrap();
        let err = df
            .with_column(Field::new("b", DataType::Double), vec![Value::Null])
            .unwrap_err();

        assert!(matches!(err, Error::ShapeMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn print_schema_lists_fields() {
        let df = DataFrame::from_reader("route,duration\n1,2.5\n".as_bytes(), &CsvOptions::default())
            .unwrap();

        assert_eq!(
            df.print_schema(),
            "root\n |-- route: integer (nullable = true)\n |-- duration: double (nullable = true)\n"
        );
    }

    #[test]
    fn show_truncates_rows() {
        let df = DataFrame::from_reader("a,b\n1,x\n22,y\n3,z\n".as_bytes(), &CsvOptions::default())
            .unwrap();
        let table = df.show(2);

        assert_eq!(
            table,
            "+--+-+\n| a|b|\n+--+-+\n| 1|x|\n|22|y|\n+--+-+\nonly showing top 2 rows\n"
        );
    }

    #[test]
    fn show_aligns_non_ascii_text() {
        let df = DataFrame::from_reader("city,n\nSão Paulo,1\nRio,22\n".as_bytes(), &CsvOptions::default())
            .unwrap();

        assert_eq!(
            df.show(5),
            "+---------+--+\n|     city| n|\n+---------+--+\n|São Paulo| 1|\n|      Rio|22|\n+---------+--+\n"
        );
    }
}
