//! Render error types.

use thiserror::Error;

use crate::reports::ReportError;

/// Errors that can occur while rendering a document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Rejected before rendering started.
    #[error(transparent)]
    Validation(#[from] ReportError),

    /// Page-flow document could not be written.
    #[error("PDF rendering failed: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Encoded document could not be written to the output buffer.
    #[error("Document write failed: {0}")]
    Io(#[from] std::io::Error),

    /// Embedded text face could not be parsed.
    #[error("Font loading failed: {0}")]
    Font(#[from] ttf_parser::FaceParsingError),

    /// Workbook could not be written.
    #[error("XLSX rendering failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
