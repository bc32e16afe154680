// src/table/mod.rs

pub mod parse;
mod text;

pub use parse::parse_tables;

use crate::error::{ExtractError, Result};

/// A parsed HTML table: column labels plus string cells.
///
/// Every row holds exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table, padding short rows with empty cells and truncating long ones.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn num_columns(&self) -> usize {
        self.headers.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Keeps only `columns`, in the given order.
    ///
    /// Fails with every missing name at once, before any cell is copied.
    pub fn project(&self, columns: &[&str]) -> Result<Table> {
        let mut indices = Vec::with_capacity(columns.len());
        let mut missing = Vec::new();
        for &name in columns {
            match self.column_index(name) {
                Some(i) => indices.push(i),
                None => missing.push(name.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(ExtractError::MissingColumns {
                missing,
                available: self.headers.clone(),
            });
        }

        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|&i| row.get(i).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        Ok(Table {
            headers: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        })
    }

    /// Replaces the column labels positionally.
    pub fn rename(mut self, names: &[&str]) -> Table {
        debug_assert_eq!(names.len(), self.headers.len());
        for (header, name) in self.headers.iter_mut().zip(names) {
            *header = name.to_string();
        }
        self
    }
}

/// Picks one table by its position in document order.
pub fn select_table(mut tables: Vec<Table>, index: usize) -> Result<Table> {
    let found = tables.len();
    if index >= found {
        return Err(ExtractError::TableIndex { index, found });
    }
    Ok(tables.swap_remove(index))
}
