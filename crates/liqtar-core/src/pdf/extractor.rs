//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::{PageTextSource, Result};
use crate::error::PdfError;

/// PDF page text extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }

    /// Per-page text through lopdf's own content stream decoder.
    fn extract_pages_with_lopdf(&self, doc: &Document) -> Result<Vec<String>> {
        let mut pages = Vec::new();
        let mut failures = 0;

        for page_num in doc.get_pages().keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(text) => pages.push(text),
                Err(e) => {
                    warn!("Failed to extract text from page {}: {}", page_num, e);
                    failures += 1;
                    pages.push(String::new());
                }
            }
        }

        if !pages.is_empty() && failures == pages.len() {
            return Err(PdfError::TextExtraction(
                "no page text could be decoded".to_string(),
            ));
        }

        Ok(pages)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageTextSource for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // Save decrypted document to raw_data for pdf_extract
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_pages(&self) -> Result<Vec<String>> {
        let doc = self.document()?;
        let page_count = self.page_count() as usize;

        match pdf_extract::extract_text_from_mem_by_pages(&self.raw_data) {
            Ok(pages) if pages.len() == page_count => Ok(pages),
            Ok(pages) => {
                warn!(
                    "pdf-extract returned {} pages for a {} page document, using lopdf",
                    pages.len(),
                    page_count
                );
                self.extract_pages_with_lopdf(doc)
            }
            Err(e) => {
                warn!("pdf-extract failed ({}), using lopdf", e);
                self.extract_pages_with_lopdf(doc)
            }
        }
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }
        self.extract_pages()?
            .into_iter()
            .nth((page - 1) as usize)
            .ok_or(PdfError::InvalidPage(page))
    }
}
