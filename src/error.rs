//! Error types for report rendering

use thiserror::Error;

/// Result type alias using ReportError
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while building or exporting a cut-list report
#[derive(Debug, Error)]
pub enum ReportError {
    /// Error from the underlying lopdf library
    #[error("PDF operation failed: {0}")]
    PdfError(#[from] lopdf::Error),

    /// Writing the document failed
    #[error("I/O failed: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid table structure
    #[error("Invalid table structure: {0}")]
    InvalidTable(String),

    /// Font data could not be used
    #[error("Font error: {0}")]
    FontError(String),

    /// Drawing or page management failed
    #[error("Drawing failed: {0}")]
    DrawingError(String),

    /// Page not found
    #[error("Page with ID {0:?} not found")]
    PageNotFound(lopdf::ObjectId),

    /// Export requested before any results were calculated
    #[error("No calculated results to export")]
    NotCalculated,
}
