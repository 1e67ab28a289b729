// CSV report: growing row table, rewritten in full after every instance.
// Header is the union of columns in first-seen order; cells a row never got
// (failed metric fetches) serialize as empty fields.

use crate::models::AggregatedRow;
use std::path::Path;

#[derive(Debug, Default)]
pub struct Report {
    columns: Vec<String>,
    rows: Vec<AggregatedRow>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row, registering any columns not seen before.
    pub fn push(&mut self, row: AggregatedRow) {
        for column in row.columns() {
            if !self.columns.iter().any(|c| c == column) {
                self.columns.push(column.to_string());
            }
        }
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[AggregatedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialize the whole table, truncating whatever was there before. With
    /// no columns yet this still creates the (empty) file, so the output path
    /// exists before the first instance completes.
    pub fn write_csv(&self, path: &Path) -> anyhow::Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        if !self.columns.is_empty() {
            writer.write_record(&self.columns)?;
            for row in &self.rows {
                let record: Vec<String> = self
                    .columns
                    .iter()
                    .map(|column| {
                        row.get(column)
                            .map(|cell| cell.to_string())
                            .unwrap_or_default()
                    })
                    .collect();
                writer.write_record(&record)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}
