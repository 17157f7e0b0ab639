//! Tagged sample table: acquisition-ordered rows of physical values plus a verdict
//!
//! A missing value (`None`) is a sample lost in acquisition. Rows carrying one
//! are kept so downstream statistics can count and exclude them.

use crate::profiles::TestType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Table construction errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("Row has {actual} values but the table has {expected} columns")]
    RowWidthMismatch { expected: usize, actual: usize },
    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
}

/// One acquisition instant in physical units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRow {
    /// Nanoseconds since the Unix epoch
    pub timestamp: u64,
    /// Aligned with [`SampleTable::columns`]
    pub values: Vec<Option<f64>>,
    pub pass_fail: bool,
    /// Category for tests that mix measurement kinds, e.g. ICT "resistor"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Test point or channel label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SampleRow {
    pub fn new(timestamp: u64, values: Vec<Option<f64>>, pass_fail: bool) -> Self {
        Self { timestamp, values, pass_fail, group: None, label: None }
    }

    pub fn with_group(mut self, group: impl Into<String>, label: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self.label = Some(label.into());
        self
    }
}

/// Flat projection of a row, shaped like the relational record consumers persist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: usize,
    pub test_time: u64,
    pub fields: BTreeMap<String, Option<f64>>,
    /// "PASS" or "FAIL"
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleTable {
    pub test_type: Option<TestType>,
    columns: Vec<String>,
    rows: Vec<SampleRow>,
}

impl SampleTable {
    pub fn new<I, S>(columns: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for column in columns {
            let column = column.into();
            if names.contains(&column) {
                return Err(TableError::DuplicateColumn(column));
            }
            names.push(column);
        }
        Ok(Self { test_type: None, columns: names, rows: Vec::new() })
    }

    pub fn for_test(mut self, test_type: TestType) -> Self {
        self.test_type = Some(test_type);
        self
    }

    /// Append a row, keeping acquisition order
    pub fn push(&mut self, row: SampleRow) -> Result<(), TableError> {
        if row.values.len() != self.columns.len() {
            return Err(TableError::RowWidthMismatch {
                expected: self.columns.len(),
                actual: row.values.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[SampleRow] {
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

    /// All values of one column in row order, missing samples included
    pub fn column(&self, name: &str) -> Result<Vec<Option<f64>>, TableError> {
        let index = self
            .column_index(name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))?;
        Ok(self.rows.iter().map(|r| r.values[index]).collect())
    }

    pub fn pass_count(&self) -> usize {
        self.rows.iter().filter(|r| r.pass_fail).count()
    }

    /// Distinct row groups in first-seen order
    pub fn groups(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for group in self.rows.iter().filter_map(|r| r.group.as_deref()) {
            if !seen.contains(&group) {
                seen.push(group);
            }
        }
        seen
    }

    /// Sub-table holding only the rows of `group`, same schema
    pub fn filter_group(&self, group: &str) -> SampleTable {
        SampleTable {
            test_type: self.test_type,
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|r| r.group.as_deref() == Some(group))
                .cloned()
                .collect(),
        }
    }

    /// One flat record per row, ids starting at 1
    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        self.rows.iter().enumerate().map(move |(i, row)| Record {
            id: i + 1,
            test_time: row.timestamp,
            fields: self
                .columns
                .iter()
                .cloned()
                .zip(row.values.iter().copied())
                .collect(),
            result: if row.pass_fail { "PASS" } else { "FAIL" }.to_string(),
            group: row.group.clone(),
            label: row.label.clone(),
        })
    }
}
