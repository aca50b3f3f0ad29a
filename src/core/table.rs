//! Columnar numeric tables.
//!
//! A [`Table`] is the flat, wide form that capture and export adapters
//! exchange with the core: named `f64` columns of equal height, where a
//! `None` cell is a missing sample.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::util::{nan_to_none, Error, Result};

/// One named column of nullable doubles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    values: Vec<Option<f64>>,
}

impl Column {
    /// Create a column from nullable values.
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Create a column from plain doubles, treating NaN as missing.
    pub fn from_f64(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().copied().map(nan_to_none).collect())
    }

    /// Cast loosely typed JSON cells to doubles.
    ///
    /// Numbers pass through, `null` is missing, booleans become 1.0/0.0 and
    /// strings must parse as floats. Anything else is rejected.
    pub fn from_json(name: impl Into<String>, cells: &[Value]) -> Result<Self> {
        let name = name.into();
        let mut values = Vec::with_capacity(cells.len());
        for (row, cell) in cells.iter().enumerate() {
            let value = match cell {
                Value::Null => None,
                Value::Number(n) => n.as_f64(),
                Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
                Value::String(s) => match s.trim().parse::<f64>() {
                    Ok(v) => nan_to_none(v),
                    Err(_) => return Err(non_numeric(&name, row, cell)),
                },
                Value::Array(_) | Value::Object(_) => return Err(non_numeric(&name, row, cell)),
            };
            values.push(value);
        }
        Ok(Self { name, values })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of missing cells.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Values with missing cells as NaN.
    pub fn to_f64(&self) -> Vec<f64> {
        self.values.iter().map(|v| v.unwrap_or(f64::NAN)).collect()
    }

    /// Same data under a new name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self::new(name, self.values.clone())
    }
}

fn non_numeric(column: &str, row: usize, cell: &Value) -> Error {
    Error::NonNumeric {
        column: column.to_string(),
        row,
        value: cell.to_string(),
    }
}

/// Ordered set of equal-height, uniquely named columns.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableRepr")]
pub struct Table {
    columns: Vec<Column>,
}

/// Columns as stored, before the height and name checks.
#[derive(Serialize, Deserialize)]
pub(crate) struct TableRepr {
    columns: Vec<Column>,
}

impl TryFrom<TableRepr> for Table {
    type Error = Error;

    fn try_from(r: TableRepr) -> Result<Self> {
        Self::from_columns(r.columns)
    }
}

impl From<Table> for TableRepr {
    fn from(table: Table) -> Self {
        Self {
            columns: table.columns,
        }
    }
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table, checking heights and names.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut table = Self::new();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Build a table from a JSON object mapping column names to arrays.
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::TypeMismatch {
                expected: "object of column arrays".into(),
                actual: json_type_name(value).into(),
            });
        };
        let mut table = Self::new();
        for (name, cells) in map {
            let Value::Array(cells) = cells else {
                return Err(Error::TypeMismatch {
                    expected: format!("array for column '{name}'"),
                    actual: json_type_name(cells).into(),
                });
            };
            table.push_column(Column::from_json(name.as_str(), cells)?)?;
        }
        Ok(table)
    }

    /// Append a column to the right.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.column(column.name()).is_some() {
            return Err(Error::DuplicateColumn(column.name().to_string()));
        }
        if let Some(first) = self.columns.first() {
            if first.len() != column.len() {
                return Err(Error::length(
                    format!("Column '{}'", column.name()),
                    first.len(),
                    column.len(),
                ));
            }
        }
        self.columns.push(column);
        Ok(())
    }

    /// Concatenate tables horizontally.
    pub fn hconcat(tables: impl IntoIterator<Item = Table>) -> Result<Self> {
        let mut out = Self::new();
        for table in tables {
            for column in table.columns {
                out.push_column(column)?;
            }
        }
        Ok(out)
    }

    /// Number of rows (0 for a table without columns).
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Find a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    /// Fail if any of `required` is absent, listing every missing name.
    pub fn require_columns(&self, what: &str, required: &[&str]) -> Result<()> {
        let missing: Vec<String> = required
            .iter()
            .filter(|name| self.column(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingColumns {
                table: what.to_string(),
                missing,
            })
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
