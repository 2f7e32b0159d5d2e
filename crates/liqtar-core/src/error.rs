//! Error types for the liqtar-core library.

use thiserror::Error;

use crate::models::category::CategoryKey;

/// Main error type for the liqtar library.
#[derive(Error, Debug)]
pub enum LiqtarError {
    /// The page text extractor could not produce text for the document.
    #[error("text extraction unavailable: {0}")]
    ExtractionUnavailable(#[from] PdfError),

    /// Category extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// The report renderer could not produce output.
    #[error("rendering failure: {0}")]
    RenderingFailure(#[from] RenderError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to PDF text extraction.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to category extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Text does not follow the `1.234,56` amount grammar.
    #[error("malformed amount: {value:?}")]
    MalformedAmount { value: String },

    /// A labelled line carried a malformed amount and strict mode is on.
    #[error("malformed amount {value:?} for {category} on page {page}")]
    MalformedLine {
        page: usize,
        category: CategoryKey,
        value: String,
    },

    /// A running or derived total left the range of `Decimal`.
    #[error("total for {category} is out of range")]
    AmountOverflow { category: CategoryKey },

    /// The input document exceeds the configured size limit.
    #[error("document is {size} bytes, limit is {limit} bytes")]
    DocumentTooLarge { size: u64, limit: u64 },
}

/// Errors related to report rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Building the page content stream failed.
    #[error("failed to encode page content: {0}")]
    Content(String),

    /// Serializing the document failed.
    #[error("failed to write document: {0}")]
    Write(String),

    /// Nothing to render.
    #[error("summary has no rows")]
    Empty,
}

/// Result type for the liqtar library.
pub type Result<T> = std::result::Result<T, LiqtarError>;
