//! Workbook, sheet, and cell value models.

use serde::{Deserialize, Serialize};

/// A single cell value.
///
/// Serialized untagged so the wire form stays a plain JSON scalar; an empty
/// cell is `null`. Variant order matters for deserialization: booleans and
/// numbers must be tried before the string fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Boolean cell.
    Bool(bool),
    /// Numeric cell.
    Number(f64),
    /// Text cell.
    Text(String),
    /// Empty cell.
    Empty,
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Empty
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// One sheet of a workbook: an ordered sequence of rows, each an ordered
/// sequence of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    /// Stable sheet identifier, referenced by structured updates.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Row data.
    pub rows: Vec<Vec<CellValue>>,
}

/// A structured tabular document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    /// Ordered sheets.
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// A blank workbook: one sheet with a single empty row.
    pub fn blank() -> Self {
        Self {
            sheets: vec![Sheet {
                id: "sheet-1".to_string(),
                name: "Sheet 1".to_string(),
                rows: vec![vec![CellValue::Text(String::new())]],
            }],
        }
    }

    /// Look up a sheet by its identifier.
    pub fn sheet_mut(&mut self, sheet_id: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.id == sheet_id)
    }

    /// Whether a sheet with the given identifier exists.
    pub fn has_sheet(&self, sheet_id: &str) -> bool {
        self.sheets.iter().any(|s| s.id == sheet_id)
    }

    /// Guarantee at least one sheet and at least one row per sheet, so
    /// callers never branch on an empty workbook.
    pub fn normalize(&mut self) {
        if self.sheets.is_empty() {
            self.sheets = Self::blank().sheets;
            return;
        }
        for sheet in &mut self.sheets {
            if sheet.rows.is_empty() {
                sheet.rows.push(vec![CellValue::Text(String::new())]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_empty_workbook() {
        let mut wb = Workbook { sheets: vec![] };
        wb.normalize();
        assert_eq!(wb.sheets.len(), 1);
        assert_eq!(wb.sheets[0].rows.len(), 1);
    }

    #[test]
    fn test_normalize_empty_sheet_gains_a_row() {
        let mut wb = Workbook {
            sheets: vec![Sheet {
                id: "s1".into(),
                name: "Data".into(),
                rows: vec![],
            }],
        };
        wb.normalize();
        assert_eq!(wb.sheets[0].rows.len(), 1);
    }

    #[test]
    fn test_normalize_keeps_existing_content() {
        let mut wb = Workbook {
            sheets: vec![Sheet {
                id: "s1".into(),
                name: "Data".into(),
                rows: vec![vec![CellValue::from(1.0), CellValue::from("x")]],
            }],
        };
        wb.normalize();
        assert_eq!(wb.sheets[0].rows[0].len(), 2);
    }

    #[test]
    fn test_sheet_lookup() {
        let mut wb = Workbook::blank();
        assert!(wb.has_sheet("sheet-1"));
        assert!(!wb.has_sheet("sheet-2"));
        assert!(wb.sheet_mut("sheet-1").is_some());
    }
}
