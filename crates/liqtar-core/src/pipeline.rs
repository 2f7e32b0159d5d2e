//! End-to-end processing of a statement document.

use tracing::{debug, info};

use crate::error::{ExtractionError, Result};
use crate::models::config::LiqtarConfig;
use crate::models::summary::Summary;
use crate::pdf::{PageTextSource, PdfExtractor};
use crate::report::{PdfReportRenderer, ReportRenderer};
use crate::statement::{ExtractionResult, StatementExtractor, StatementParser};

/// Check the size limit and parse a PDF held in memory.
pub fn load_document(data: &[u8], config: &LiqtarConfig) -> Result<PdfExtractor> {
    if let Some(limit) = config.pdf.max_bytes() {
        let size = data.len() as u64;
        if size > limit {
            return Err(ExtractionError::DocumentTooLarge { size, limit }.into());
        }
    }

    let mut extractor = PdfExtractor::new();
    extractor.load(data)?;
    debug!("Loaded document with {} pages", extractor.page_count());
    Ok(extractor)
}

/// Extract the summary of a PDF statement held in memory.
pub fn process_document(data: &[u8], config: &LiqtarConfig) -> Result<ExtractionResult> {
    let pages = load_document(data, config)?.extract_pages()?;
    debug!("Extracted text from {} pages", pages.len());

    process_pages(&pages, config)
}

/// Extract the summary from already extracted page texts.
pub fn process_pages(pages: &[String], config: &LiqtarConfig) -> Result<ExtractionResult> {
    let parser = StatementParser::from_config(&config.extraction);
    let result = parser.extract_pages(pages)?;
    info!(
        "Summary ready: {} rows, {} warnings",
        result.summary.len(),
        result.warnings.len()
    );
    Ok(result)
}

/// Render a summary with the configured heading.
pub fn render_report(summary: &Summary, title: &str, config: &LiqtarConfig) -> Result<Vec<u8>> {
    let renderer = PdfReportRenderer::new().with_heading(config.report.heading.clone());
    Ok(renderer.render(&summary.rows, title)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LiqtarError, PdfError};
    use crate::models::category::CategoryKey;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// A plain PDF with one text run per line.
    fn statement_pdf(pages: &[&[&str]]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for lines in pages {
            let mut operations = Vec::new();
            for (i, line) in lines.iter().enumerate() {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
                operations.push(Operation::new("Td", vec![50.into(), (780 - 20 * i as i64).into()]));
                operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
                operations.push(Operation::new("ET", vec![]));
            }
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_process_document() {
        let pdf = statement_pdf(&[
            &["ARANCEL .......... 100,00", "IVA CRED.FISC.COMERCIO S/ARANC 21,00% ..... 21,00"],
            &["RETENCION IVA ..... 50,00"],
            &["RETENCION IVA ..... 50,00"],
        ]);

        let result = process_document(&pdf, &LiqtarConfig::default()).unwrap();

        assert_eq!(result.pages_scanned, 3);
        assert_eq!(result.totals.get(CategoryKey::Arancel), dec("100.00"));
        assert_eq!(result.totals.get(CategoryKey::Iva21), dec("21.00"));
        assert_eq!(result.totals.get(CategoryKey::RetencionIva), dec("100.00"));
        assert_eq!(result.derived.base_21, dec("100.00"));
    }

    #[test]
    fn test_blank_page_contributes_nothing() {
        let pdf = statement_pdf(&[&[], &["RETENCION GANANCIAS ..... 30,00"]]);
        let result = process_document(&pdf, &LiqtarConfig::default()).unwrap();
        assert_eq!(result.totals.get(CategoryKey::RetencionGanancias), dec("30.00"));
    }

    #[test]
    fn test_invalid_document_is_extraction_unavailable() {
        let err = process_document(b"%PDF-broken", &LiqtarConfig::default()).unwrap_err();
        assert!(matches!(err, LiqtarError::ExtractionUnavailable(PdfError::Parse(_))));
    }

    #[test]
    fn test_size_limit() {
        let mut config = LiqtarConfig::default();
        config.pdf.max_file_size_mb = 1;
        let data = vec![0u8; 1024 * 1024 + 1];

        let err = process_document(&data, &config).unwrap_err();
        assert!(matches!(
            err,
            LiqtarError::Extraction(ExtractionError::DocumentTooLarge { .. })
        ));
    }

    #[test]
    fn test_render_report_round_trip() {
        let result = process_pages(
            &["RETENCION IVA ..... 1.234,56".to_string()],
            &LiqtarConfig::default(),
        )
        .unwrap();

        let bytes = render_report(&result.summary, "Resumen de importes", &LiqtarConfig::default())
            .unwrap();

        let extractor = load_document(&bytes, &LiqtarConfig::default()).unwrap();
        assert_eq!(extractor.page_count(), 1);
        let text = extractor.extract_page_text(1).unwrap();
        assert!(text.contains("Retenciones IVA"));
        assert!(text.contains("1.234,56"));
    }
}
