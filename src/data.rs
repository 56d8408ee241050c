//! Month-indexed price table
//!
//! Rows arrive as arrays of loosely-typed cells (the upstream sheet
//! serves numbers as strings), one row per month. Only two columns feed
//! the simulation: the price and the ball count. Everything else is
//! carried along untouched for labeling.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::{PRICE_COLUMN, SPAWN_COLUMN};
use crate::error::{Error, Result};

/// One row of cells, exactly as delivered upstream
pub type DataRow = Vec<Value>;

/// The fields of one row that drive a month's simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowFields {
    /// Price for the month, drives sieve bar length
    pub price: f32,
    /// How many balls to drop; negative values parse but are rejected
    /// later by the spawn path
    pub spawn_count: i64,
}

/// A table of monthly rows, indexed by month number starting at 0
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataTable {
    rows: Vec<DataRow>,
}

impl DataTable {
    /// Wrap already-parsed rows
    pub fn from_values(rows: Vec<DataRow>) -> Self {
        Self { rows }
    }

    /// Parse a JSON array-of-arrays, the shape the sheet API returns
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Number of months in the table
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw row access, for labels and display
    pub fn row(&self, index: usize) -> Option<&DataRow> {
        self.rows.get(index)
    }

    /// Extract the simulation-driving fields of one month.
    ///
    /// The index is signed so that callers can probe one step past either
    /// end of the table and get a clean range error back.
    pub fn fields(&self, index: i64) -> Result<RowFields> {
        if index < 0 || index as usize >= self.rows.len() {
            return Err(Error::MonthOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        let row_index = index as usize;
        let row = &self.rows[row_index];
        let price = numeric_cell(row, row_index, PRICE_COLUMN)? as f32;
        let spawn_count = integer_cell(row, row_index, SPAWN_COLUMN)?;
        Ok(RowFields { price, spawn_count })
    }
}

/// Read a cell as a finite number, accepting both JSON numbers and
/// numeric strings.
fn numeric_cell(row: &DataRow, row_index: usize, column: usize) -> Result<f64> {
    let parsed = match row.get(column) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(malformed(row, row_index, column)),
    }
}

/// Read a cell as a whole number. Values like "12.0" pass, "12.5" does not.
fn integer_cell(row: &DataRow, row_index: usize, column: usize) -> Result<i64> {
    let v = numeric_cell(row, row_index, column)?;
    if v.fract() == 0.0 && (i64::MIN as f64..=i64::MAX as f64).contains(&v) {
        Ok(v as i64)
    } else {
        Err(malformed(row, row_index, column))
    }
}

fn malformed(row: &DataRow, row_index: usize, column: usize) -> Error {
    let cell = match row.get(column) {
        Some(value) => value.to_string(),
        None => "<missing>".to_owned(),
    };
    Error::MalformedRow {
        row: row_index,
        column,
        cell,
    }
}
