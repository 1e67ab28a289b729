// Aggregated report row: ordered (column, cell) pairs.
// Columns stay in insertion order so the report can derive a stable
// first-seen header; metric cells that failed to fetch are simply absent.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(v) => write!(f, "{v}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// The flattened union of one instance, one volume, and their metric scalars.
/// Exactly one row exists per (instance, volume) pair.
#[derive(Debug, Clone, Default)]
pub struct AggregatedRow {
    cells: Vec<(String, CellValue)>,
}

impl AggregatedRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a cell, keeping first-insertion column order.
    pub fn set(&mut self, column: impl Into<String>, value: CellValue) {
        let column = column.into();
        match self.cells.iter_mut().find(|(c, _)| *c == column) {
            Some((_, v)) => *v = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    /// Numeric view of a cell; absent or non-numeric cells read as 0.
    pub fn number(&self, column: &str) -> f64 {
        match self.get(column) {
            Some(CellValue::Float(v)) => *v,
            Some(CellValue::Int(v)) => *v as f64,
            _ => 0.0,
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = (&str, &mut CellValue)> {
        self.cells.iter_mut().map(|(c, v)| (c.as_str(), v))
    }

    pub fn cells(&self) -> &[(String, CellValue)] {
        &self.cells
    }
}
