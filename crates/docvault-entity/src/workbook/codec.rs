//! Workbook wire codec.
//!
//! Workbooks are persisted as JSON documents: sheets in order, each sheet
//! its rows, each row its cell scalars.

use docvault_core::error::AppError;
use docvault_core::result::AppResult;

use super::model::Workbook;

/// Decode a workbook from stored blob bytes.
///
/// Fails with a corrupt-document error if the bytes are not a valid
/// workbook document.
pub fn decode(bytes: &[u8]) -> AppResult<Workbook> {
    serde_json::from_slice(bytes).map_err(|e| {
        AppError::with_source(
            docvault_core::error::ErrorKind::CorruptDocument,
            format!("Failed to decode workbook: {e}"),
            e,
        )
    })
}

/// Encode a workbook for storage.
pub fn encode(workbook: &Workbook) -> AppResult<Vec<u8>> {
    serde_json::to_vec_pretty(workbook)
        .map_err(|e| AppError::from(e))
}
