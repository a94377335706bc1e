//! File kind enumeration and the closed MIME mapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of document kinds DocVault accepts.
///
/// Anything outside this set is rejected at upload time; there is no
/// catch-all "binary" kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "file_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// PDF document.
    Pdf,
    /// Word-processing document.
    Docx,
    /// Spreadsheet workbook.
    Xlsx,
    /// PNG image.
    Png,
    /// JPEG image.
    Jpg,
    /// WebP image.
    Webp,
}

impl FileKind {
    /// Map a MIME type onto a file kind.
    ///
    /// The mapping matches on substrings so that both the short and the
    /// full OpenXML MIME spellings resolve (e.g. `application/msword` and
    /// `application/vnd...wordprocessingml.document` are both docx).
    /// Returns `None` for anything outside the closed set.
    pub fn from_mime(mime: &str) -> Option<Self> {
        if mime.contains("pdf") {
            Some(Self::Pdf)
        } else if mime.contains("msword") || mime.contains("wordprocessingml") {
            Some(Self::Docx)
        } else if mime.contains("excel") || mime.contains("spreadsheetml") {
            Some(Self::Xlsx)
        } else if mime.contains("image/png") {
            Some(Self::Png)
        } else if mime.contains("image/jpg") || mime.contains("image/jpeg") {
            Some(Self::Jpg)
        } else if mime.contains("image/webp") {
            Some(Self::Webp)
        } else {
            None
        }
    }

    /// Return the canonical file extension for this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Webp => "webp",
        }
    }

    /// Whether this kind opens in the spreadsheet editor.
    pub fn is_spreadsheet(&self) -> bool {
        matches!(self, Self::Xlsx)
    }

    /// The document type string the external editor expects.
    pub fn editor_document_type(&self) -> &'static str {
        if self.is_spreadsheet() { "spreadsheet" } else { "text" }
    }

    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        self.extension()
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = docvault_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "xlsx" => Ok(Self::Xlsx),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "webp" => Ok(Self::Webp),
            _ => Err(docvault_core::AppError::validation(format!(
                "Invalid file kind: '{s}'. Expected one of: pdf, docx, xlsx, png, jpg, webp"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_mapping_closed_set() {
        assert_eq!(FileKind::from_mime("application/pdf"), Some(FileKind::Pdf));
        assert_eq!(
            FileKind::from_mime("application/msword"),
            Some(FileKind::Docx)
        );
        assert_eq!(
            FileKind::from_mime(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            ),
            Some(FileKind::Docx)
        );
        assert_eq!(
            FileKind::from_mime("application/vnd.ms-excel"),
            Some(FileKind::Xlsx)
        );
        assert_eq!(
            FileKind::from_mime(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            ),
            Some(FileKind::Xlsx)
        );
        assert_eq!(FileKind::from_mime("image/png"), Some(FileKind::Png));
        assert_eq!(FileKind::from_mime("image/jpeg"), Some(FileKind::Jpg));
        assert_eq!(FileKind::from_mime("image/webp"), Some(FileKind::Webp));
    }

    #[test]
    fn test_unmapped_mime_is_rejected() {
        assert_eq!(FileKind::from_mime("video/mp4"), None);
        assert_eq!(FileKind::from_mime("text/plain"), None);
        assert_eq!(FileKind::from_mime("application/octet-stream"), None);
    }

    #[test]
    fn test_editor_document_type() {
        assert_eq!(FileKind::Xlsx.editor_document_type(), "spreadsheet");
        assert_eq!(FileKind::Docx.editor_document_type(), "text");
        assert_eq!(FileKind::Pdf.editor_document_type(), "text");
    }
}
