// src/query.rs

use crate::table::{CaTable, Record};

/// Status text the registry uses for a certificate in force.
pub const VALID_STATUS: &str = "VÁLIDO";

impl CaTable {
    /// Every row for `ca`, in file order. `None` if there are none or `ca`
    /// is blank.
    pub fn history(&self, ca: &str) -> Option<Vec<Record<'_>>> {
        let ca = ca.trim();
        if ca.is_empty() {
            return None;
        }
        let found: Vec<Record<'_>> = self.rows().filter(|r| r.registration() == ca).collect();
        if found.is_empty() {
            None
        } else {
            Some(found)
        }
    }

    /// The most recent row for `ca` (the last one in the file).
    pub fn current(&self, ca: &str) -> Option<Record<'_>> {
        let ca = ca.trim();
        if ca.is_empty() {
            return None;
        }
        self.rows().rev().find(|r| r.registration() == ca)
    }

    /// Whether the current row for `ca` is in force; `None` for unknown CAs.
    pub fn is_valid(&self, ca: &str) -> Option<bool> {
        self.current(ca).map(|r| r.status() == VALID_STATUS)
    }
}
