use std::collections::HashMap;

use anyhow::{ensure, Result};

/// Numeric attribute columns of a layer, stored column-major.
/// A missing or non-numeric source value is stored as `None`.
#[derive(Clone, Debug, Default)]
pub struct AttributeTable {
    len: usize,
    names: Vec<String>,
    index: HashMap<String, usize>,
    columns: Vec<Vec<Option<f64>>>,
}

impl AttributeTable {
    /// Create an empty table for `len` records with no columns.
    pub fn new(len: usize) -> Self {
        Self { len, ..Default::default() }
    }

    /// Build a table from named columns. Fails if a column length differs from `len`.
    pub fn from_columns(len: usize, columns: impl IntoIterator<Item = (String, Vec<Option<f64>>)>) -> Result<Self> {
        let mut table = Self::new(len);
        for (name, values) in columns {
            table.insert(name, values)?;
        }
        Ok(table)
    }

    /// Insert (or replace) a column.
    pub fn insert(&mut self, name: String, values: Vec<Option<f64>>) -> Result<()> {
        ensure!(values.len() == self.len,
            "[AttributeTable::insert] column {name:?} must have {} values, found {}", self.len, values.len());
        match self.index.get(&name) {
            Some(&col) => self.columns[col] = values,
            None => {
                self.index.insert(name.clone(), self.columns.len());
                self.names.push(name);
                self.columns.push(values);
            }
        }
        Ok(())
    }

    /// Number of records covered by the table.
    #[inline] pub fn len(&self) -> usize { self.len }

    /// Returns true if the table covers no records.
    #[inline] pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Column names in insertion order.
    #[inline] pub fn names(&self) -> &[String] { &self.names }

    /// Returns true if the table has a column called `name`.
    #[inline] pub fn contains(&self, name: &str) -> bool { self.index.contains_key(name) }

    /// Get the whole column `name`.
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.index.get(name).map(|&col| self.columns[col].as_slice())
    }

    /// Get the value of column `name` for record `idx`.
    /// Returns `None` both for an unknown column and for a null value.
    pub fn get(&self, name: &str, idx: usize) -> Option<f64> {
        self.column(name).and_then(|values| values[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_table() -> AttributeTable {
        AttributeTable::from_columns(3, [
            ("HH19".to_string(), vec![Some(1.0), None, Some(3.0)]),
            ("EMP19".to_string(), vec![Some(10.0), Some(20.0), Some(30.0)]),
        ]).unwrap()
    }

    #[test]
    fn lookup_by_name() {
        let table = make_test_table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.names(), &["HH19".to_string(), "EMP19".to_string()]);
        assert_eq!(table.get("HH19", 0), Some(1.0));
        assert_eq!(table.get("HH19", 1), None);
        assert_eq!(table.get("EMP19", 2), Some(30.0));
        assert_eq!(table.get("HH49", 0), None);
        assert!(!table.contains("HH49"));
    }

    #[test]
    fn insert_replaces_existing_column() {
        let mut table = make_test_table();
        table.insert("HH19".to_string(), vec![None, None, None]).unwrap();
        assert_eq!(table.names().len(), 2);
        assert_eq!(table.column("HH19"), Some(&[None, None, None][..]));
    }

    #[test]
    fn insert_rejects_length_mismatch() {
        let mut table = AttributeTable::new(3);
        let err = table.insert("HH19".to_string(), vec![Some(1.0)]).unwrap_err();
        assert!(err.to_string().contains("column \"HH19\" must have 3 values, found 1"));
        assert!(!table.contains("HH19"));
        assert!(AttributeTable::from_columns(2, [("EMP19".to_string(), vec![None])]).is_err());
    }
}
