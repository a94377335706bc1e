//! Blank document payloads for the create-blank flow.

use bytes::Bytes;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_entity::file::FileKind;
use docvault_entity::workbook::{Workbook, codec};

/// Minimal empty PDF: one blank US-letter page.
const BLANK_PDF: &[u8] = b"%PDF-1.4\n\
1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n\
2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj\n\
3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >> endobj\n\
trailer << /Root 1 0 R >>\n\
%%EOF\n";

/// Minimal empty word-processing document: a single empty paragraph.
const BLANK_DOCX: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body><w:p/></w:body>
</w:document>
"#;

/// Produce the initial bytes for a blank document of the given kind.
///
/// Only document kinds can start blank; image kinds are rejected.
pub fn blank_payload(kind: FileKind) -> AppResult<Bytes> {
    match kind {
        FileKind::Pdf => Ok(Bytes::from_static(BLANK_PDF)),
        FileKind::Docx => Ok(Bytes::from_static(BLANK_DOCX)),
        FileKind::Xlsx => Ok(Bytes::from(codec::encode(&Workbook::blank())?)),
        other => Err(AppError::validation(format!(
            "Cannot create a blank {other} file"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::error::ErrorKind;

    #[test]
    fn test_blank_workbook_decodes() {
        let data = blank_payload(FileKind::Xlsx).unwrap();
        let wb = codec::decode(&data).unwrap();
        assert_eq!(wb.sheets.len(), 1);
        assert_eq!(wb.sheets[0].rows.len(), 1);
    }

    #[test]
    fn test_blank_pdf_has_header() {
        let data = blank_payload(FileKind::Pdf).unwrap();
        assert!(data.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_images_cannot_start_blank() {
        let err = blank_payload(FileKind::Png).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
