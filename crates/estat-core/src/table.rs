// crates/estat-core/src/table.rs

//! # Table
//!
//! A small column-ordered table of JSON scalars: the shape the data-value
//! records are flattened into before names are substituted.
//!
//! Flattening follows the usual record-normalization rules:
//! nested object keys are joined to their parent key with `.`, list elements
//! are joined by index (`key.0`, `key.1`, ...) and one record is one row.
//! Columns appear in order of first occurrence; a record that lacks a column
//! gets `null` in that cell.

use crate::document::type_name;
use crate::error::{EStatError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Joins nested keys into one column identifier.
pub const SEPARATOR: char = '.';

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Builds a table from explicit columns and rows.
    ///
    /// Short rows are padded with `null`, long rows truncated.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Flattens `records` into one row per record.
    pub fn from_records(records: &[Value]) -> Result<Self> {
        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut rows: Vec<Vec<Value>> = Vec::with_capacity(records.len());

        for (i, record) in records.iter().enumerate() {
            let Value::Object(fields) = record else {
                return Err(EStatError::InvalidShape {
                    path: format!("VALUE[{i}]"),
                    reason: format!("expected a record object, found {}", type_name(record)),
                });
            };

            let mut cells = Vec::new();
            for (key, value) in fields {
                flatten_into(key.clone(), value, &mut cells);
            }

            let mut row = vec![Value::Null; columns.len()];
            for (column, value) in cells {
                let at = *index.entry(column.clone()).or_insert_with(|| {
                    columns.push(column);
                    columns.len() - 1
                });
                if at >= row.len() {
                    row.resize(at + 1, Value::Null);
                }
                row[at] = value;
            }
            rows.push(row);
        }

        let table = Self::new(columns, rows);
        debug!(rows = table.len(), columns = table.columns.len(), "flattened records");
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Cell at `row` in the first column named `column`.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let at = self.position(column)?;
        self.rows.get(row).map(|r| &r[at])
    }

    /// Cells of the first column named `column`, top to bottom.
    pub fn column(&self, column: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let at = self.position(column)?;
        Some(self.rows.iter().map(move |r| &r[at]))
    }

    /// Row `row` as an ordered JSON object.
    ///
    /// With duplicate column names the rightmost cell wins.
    pub fn record(&self, row: usize) -> Option<Map<String, Value>> {
        let cells = self.rows.get(row)?;
        Some(
            self.columns
                .iter()
                .cloned()
                .zip(cells.iter().cloned())
                .collect(),
        )
    }

    /// Replaces coded cells with names, column by column.
    ///
    /// Only string cells are matched; codes missing from a column's mapping
    /// and columns without a mapping are left as they are.
    pub fn replace_values(&mut self, code_to_name: &HashMap<String, HashMap<String, String>>) {
        if code_to_name.is_empty() {
            return;
        }
        let targets: Vec<(usize, &HashMap<String, String>)> = self
            .columns
            .iter()
            .enumerate()
            .filter_map(|(i, c)| code_to_name.get(c).map(|codes| (i, codes)))
            .collect();

        for row in &mut self.rows {
            for &(at, codes) in &targets {
                let name = match &row[at] {
                    Value::String(code) => codes.get(code).cloned(),
                    _ => None,
                };
                if let Some(name) = name {
                    row[at] = Value::String(name);
                }
            }
        }
    }

    /// Copying variant of [`Table::replace_values`].
    #[must_use]
    pub fn with_replaced_values(
        &self,
        code_to_name: &HashMap<String, HashMap<String, String>>,
    ) -> Self {
        let mut table = self.clone();
        table.replace_values(code_to_name);
        table
    }

    /// Renames columns found in `id_to_name`; others keep their identifier.
    pub fn rename_columns(&mut self, id_to_name: &HashMap<String, String>) {
        for column in &mut self.columns {
            if let Some(name) = id_to_name.get(column.as_str()) {
                *column = name.clone();
            }
        }
    }

    /// Copying variant of [`Table::rename_columns`].
    #[must_use]
    pub fn with_renamed_columns(&self, id_to_name: &HashMap<String, String>) -> Self {
        let mut table = self.clone();
        table.rename_columns(id_to_name);
        table
    }

    /// Projection onto `columns`, in the given order.
    ///
    /// Unknown and repeated names are skipped.
    #[must_use]
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Self {
        let mut seen = HashSet::new();
        let picked: Vec<(usize, String)> = columns
            .iter()
            .map(|c| c.as_ref())
            .filter(|c| seen.insert(*c))
            .filter_map(|c| self.position(c).map(|at| (at, c.to_string())))
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| picked.iter().map(|(at, _)| row[*at].clone()).collect())
            .collect();
        Self {
            columns: picked.into_iter().map(|(_, c)| c).collect(),
            rows,
        }
    }

    /// Inner join on every column name the two tables share.
    ///
    /// Result columns are this table's columns followed by the other table's
    /// non-shared ones; rows come out in this table's order, each repeated
    /// once per matching row of `other`.
    pub fn merge(&self, other: &Table) -> Result<Self> {
        let other_names: HashSet<&str> = other.columns.iter().map(String::as_str).collect();
        let mut shared: Vec<&str> = Vec::new();
        for column in &self.columns {
            if other_names.contains(column.as_str()) && !shared.contains(&column.as_str()) {
                shared.push(column);
            }
        }
        if shared.is_empty() {
            return Err(EStatError::NoSharedColumns);
        }

        let left_keys: Vec<usize> = shared.iter().filter_map(|c| self.position(c)).collect();
        let right_keys: Vec<usize> = shared.iter().filter_map(|c| other.position(c)).collect();
        let right_extra: Vec<usize> = other
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !shared.contains(&c.as_str()))
            .map(|(i, _)| i)
            .collect();

        let mut lookup: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, row) in other.rows.iter().enumerate() {
            lookup.entry(join_key(row, &right_keys)).or_default().push(i);
        }

        let mut rows = Vec::new();
        for row in &self.rows {
            let Some(matches) = lookup.get(&join_key(row, &left_keys)) else {
                continue;
            };
            for &m in matches {
                let mut merged = row.clone();
                merged.extend(right_extra.iter().map(|&at| other.rows[m][at].clone()));
                rows.push(merged);
            }
        }

        let mut columns = self.columns.clone();
        columns.extend(right_extra.iter().map(|&at| other.columns[at].clone()));
        Ok(Self { columns, rows })
    }
}

fn join_key(row: &[Value], keys: &[usize]) -> String {
    Value::Array(keys.iter().map(|&at| row[at].clone()).collect()).to_string()
}

fn flatten_into(key: String, value: &Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(fields) => {
            for (child, v) in fields {
                flatten_into(format!("{key}{SEPARATOR}{child}"), v, out);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten_into(format!("{key}{SEPARATOR}{i}"), v, out);
            }
        }
        scalar => out.push((key, scalar.clone())),
    }
}
