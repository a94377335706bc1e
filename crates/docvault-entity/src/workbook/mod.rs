//! Structured workbook entities and codec.

pub mod codec;
pub mod model;

pub use model::{CellValue, Sheet, Workbook};
