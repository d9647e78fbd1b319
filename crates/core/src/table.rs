//! Column-named tabular data as uploaded for batch scoring and exported for download.
//!
//! Cells are kept as the text they were read from so that a table written back
//! out is byte-for-byte what came in, plus any appended columns.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde_json::{Map, Value};

use crate::record::AttributeRecord;
use crate::schema;
use crate::{PipelineError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        if row.len() != self.columns.len() {
            return Err(PipelineError::Table(format!(
                "row has {} cells, table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Required columns the table lacks, in canonical order.
    pub fn missing_required(&self) -> Vec<String> {
        schema::missing_columns(self.columns.iter().map(String::as_str))
    }

    /// The attribute record for row `index`; every column becomes a text attribute.
    pub fn record(&self, index: usize) -> Option<AttributeRecord> {
        let row = self.rows.get(index)?;
        Some(
            self.columns
                .iter()
                .zip(row.iter())
                .map(|(col, cell)| (col.clone(), cell.clone()))
                .collect(),
        )
    }

    pub fn append_column(&mut self, name: impl Into<String>, values: Vec<String>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(PipelineError::Table(format!(
                "column has {} values, table has {} rows",
                values.len(),
                self.rows.len()
            )));
        }
        self.columns.push(name.into());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = rdr.headers()?.clone();
        let mut table = Table::new(headers.iter());
        for record in rdr.records() {
            table.push_row(record?.iter())?;
        }
        Ok(table)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_csv_reader(File::open(path)?)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|e| PipelineError::Table(e.to_string()))
    }

    /// One JSON object per row, keys in column order.
    pub fn to_json_records(&self) -> Value {
        Value::Array(
            self.rows
                .iter()
                .map(|row| {
                    let obj: Map<String, Value> = self
                        .columns
                        .iter()
                        .zip(row.iter())
                        .map(|(c, v)| (c.clone(), Value::String(v.clone())))
                        .collect();
                    Value::Object(obj)
                })
                .collect(),
        )
    }

    pub fn from_json_records(value: &Value) -> Result<Self> {
        let records = value
            .as_array()
            .ok_or_else(|| PipelineError::Table("expected a JSON array of records".to_string()))?;
        let Some(first) = records.first().and_then(Value::as_object) else {
            return Ok(Table::default());
        };
        let mut table = Table::new(first.keys().cloned());
        for (idx, record) in records.iter().enumerate() {
            let obj = record
                .as_object()
                .ok_or_else(|| PipelineError::Table(format!("record {idx} is not an object")))?;
            let mut cells = Vec::with_capacity(table.columns.len());
            for col in &table.columns {
                let cell = match obj.get(col) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                };
                cells.push(cell);
            }
            table.push_row(cells)?;
        }
        Ok(table)
    }
}

/// Five-order template offered for download on the batch surface.
pub fn sample_batch() -> Table {
    let rows: [[&str; 15]; 5] = [
        ["25", "4.5", "Sunny", "Medium", "1", "Meal", "Motorcycle", "0", "No", "Metropolitan", "5.2", "20", "12", "15", "0"],
        ["30", "4.2", "Cloudy", "Low", "2", "Snack", "Scooter", "1", "Yes", "Urban", "3.8", "15", "19", "16", "1"],
        ["35", "4.8", "Stormy", "High", "1", "Drinks", "Bicycle", "0", "No", "Semi-Urban", "7.1", "25", "13", "17", "0"],
        ["28", "4.1", "Windy", "Medium", "2", "Meal", "Motorcycle", "2", "No", "Metropolitan", "4.5", "18", "20", "18", "1"],
        ["32", "4.6", "Sunny", "Low", "1", "Buffet", "Electric Bike", "1", "Yes", "Urban", "6.3", "30", "14", "19", "0"],
    ];
    let mut table = Table::new(schema::REQUIRED_COLUMNS);
    for row in rows {
        table.rows.push(row.iter().map(|c| c.to_string()).collect());
    }
    table
}
