// src/table.rs

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Width of every CA record: registration number through standard.
pub const FIELD_COUNT: usize = 19;

/// Position of the CA registration number within a record.
pub const REGISTRATION_FIELD: usize = 0;

/// Position of the status ("VÁLIDO", "VENCIDO", ...) within a record.
pub const STATUS_FIELD: usize = 2;

/// The parsed registry: configured column names plus rows that are all
/// exactly [`FIELD_COUNT`] wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CaTable {
    /// Callers guarantee `columns.len() == FIELD_COUNT` and that every row
    /// has already been padded or repaired to that width.
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        debug_assert_eq!(columns.len(), FIELD_COUNT);
        debug_assert!(rows.iter().all(|r| r.len() == FIELD_COUNT));
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl DoubleEndedIterator<Item = Record<'_>> + ExactSizeIterator {
        self.rows.iter().map(move |values| Record {
            columns: &self.columns,
            values,
        })
    }

    pub fn row(&self, index: usize) -> Option<Record<'_>> {
        self.rows.get(index).map(|values| Record {
            columns: &self.columns,
            values,
        })
    }
}

/// One row of the table, borrowed together with the column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    columns: &'a [String],
    values: &'a [String],
}

impl<'a> Record<'a> {
    pub fn values(&self) -> &'a [String] {
        self.values
    }

    pub fn registration(&self) -> &'a str {
        &self.values[REGISTRATION_FIELD]
    }

    pub fn status(&self) -> &'a str {
        &self.values[STATUS_FIELD]
    }

    /// Value of the column named `column`, if such a column exists.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i].as_str())
    }
}

/// Serialized as an object keyed by column name, in column order.
impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in self.columns.iter().zip(self.values) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Serialized as an array of records.
impl Serialize for CaTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for record in self.rows() {
            seq.serialize_element(&record)?;
        }
        seq.end()
    }
}
