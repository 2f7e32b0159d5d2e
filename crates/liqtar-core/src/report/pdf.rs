//! A4 summary report written with lopdf.

use chrono::{Local, NaiveDateTime};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use super::{ReportRenderer, Result};
use crate::error::RenderError;
use crate::models::summary::SummaryRow;
use crate::statement::rules::format_amount;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 56.0;

const LABEL_COLUMN: f32 = 360.0;
const AMOUNT_COLUMN: f32 = 140.0;
const ROW_HEIGHT: f32 = 18.0;
const CELL_PADDING: f32 = 6.0;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 10.0;

const HEADER_FILL: (f32, f32, f32) = (0.133, 0.133, 0.133);
const STRIPE_FILL: (f32, f32, f32) = (0.969, 0.969, 0.969);
const GRID_GRAY: f32 = 0.5;

/// Renders a title, generation timestamp and a two-column amount table.
#[derive(Debug, Clone)]
pub struct PdfReportRenderer {
    heading: String,
    generated_at: Option<NaiveDateTime>,
}

impl PdfReportRenderer {
    pub fn new() -> Self {
        Self {
            heading: "Resumen de importes".to_string(),
            generated_at: None,
        }
    }

    /// Heading printed above the table.
    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = heading.into();
        self
    }

    /// Fix the printed timestamp instead of using the current local time.
    pub fn with_timestamp(mut self, at: NaiveDateTime) -> Self {
        self.generated_at = Some(at);
        self
    }

    fn timestamp_line(&self) -> String {
        let at = self.generated_at.unwrap_or_else(|| Local::now().naive_local());
        format!("Generado: {}", at.format("%d/%m/%Y %H:%M"))
    }

    fn table_x() -> f32 {
        (PAGE_WIDTH - LABEL_COLUMN - AMOUNT_COLUMN) / 2.0
    }

    /// Split rows into pages. The first page loses room to the title block.
    fn paginate(rows: &[SummaryRow]) -> Vec<&[SummaryRow]> {
        let first_top = Self::first_table_top();
        let other_top = PAGE_HEIGHT - MARGIN;
        // one row of each page goes to the repeated header
        let first_capacity = (((first_top - MARGIN) / ROW_HEIGHT) as usize).saturating_sub(1).max(1);
        let other_capacity = (((other_top - MARGIN) / ROW_HEIGHT) as usize).saturating_sub(1).max(1);

        let mut pages = Vec::new();
        let (first, mut rest) = rows.split_at(first_capacity.min(rows.len()));
        pages.push(first);
        while !rest.is_empty() {
            let (page, tail) = rest.split_at(other_capacity.min(rest.len()));
            pages.push(page);
            rest = tail;
        }
        pages
    }

    fn first_table_top() -> f32 {
        PAGE_HEIGHT - MARGIN - TITLE_SIZE - 22.0 - 12.0 - HEADING_SIZE - 14.0
    }

    fn page_operations(&self, rows: &[SummaryRow], title: &str, first_page: bool) -> Vec<Operation> {
        let mut ops = Vec::new();
        let x = Self::table_x();
        let mut y = PAGE_HEIGHT - MARGIN;

        if first_page {
            y -= TITLE_SIZE;
            let title_width = text_width(title, TITLE_SIZE);
            text(&mut ops, "F2", TITLE_SIZE, (PAGE_WIDTH - title_width).max(MARGIN * 2.0) / 2.0, y, title, 0.0);
            y -= 22.0;
            text(&mut ops, "F1", BODY_SIZE, x, y, &self.timestamp_line(), 0.0);
            y -= 12.0 + HEADING_SIZE;
            text(&mut ops, "F2", HEADING_SIZE, x, y, &self.heading, 0.0);
            y = Self::first_table_top();
        }

        let width = LABEL_COLUMN + AMOUNT_COLUMN;
        let body_rows = rows.len() as f32;
        let table_bottom = y - ROW_HEIGHT * (body_rows + 1.0);

        // header band
        fill_rect(&mut ops, HEADER_FILL, x, y - ROW_HEIGHT, width, ROW_HEIGHT);
        for (i, _) in rows.iter().enumerate() {
            if i % 2 == 0 {
                let row_top = y - ROW_HEIGHT * (i as f32 + 1.0);
                fill_rect(&mut ops, STRIPE_FILL, x, row_top - ROW_HEIGHT, width, ROW_HEIGHT);
            }
        }

        let baseline = |row_top: f32| row_top - ROW_HEIGHT + (ROW_HEIGHT - BODY_SIZE) / 2.0 + 2.0;

        text(&mut ops, "F2", BODY_SIZE, x + CELL_PADDING, baseline(y), "Concepto", 1.0);
        text(&mut ops, "F2", BODY_SIZE, x + LABEL_COLUMN + CELL_PADDING, baseline(y), "Monto ($)", 1.0);

        for (i, row) in rows.iter().enumerate() {
            let row_top = y - ROW_HEIGHT * (i as f32 + 1.0);
            let amount = format_amount(row.amount);
            let amount_x = x + width - CELL_PADDING - text_width(&amount, BODY_SIZE);
            text(&mut ops, "F1", BODY_SIZE, x + CELL_PADDING, baseline(row_top), &row.label, 0.0);
            text(&mut ops, "F1", BODY_SIZE, amount_x, baseline(row_top), &amount, 0.0);
        }

        // grid
        ops.push(Operation::new("RG", vec![GRID_GRAY.into(), GRID_GRAY.into(), GRID_GRAY.into()]));
        ops.push(Operation::new("w", vec![0.25f32.into()]));
        for i in 0..=(rows.len() + 1) {
            let line_y = y - ROW_HEIGHT * i as f32;
            line(&mut ops, x, line_y, x + width, line_y);
        }
        for col_x in [x, x + LABEL_COLUMN, x + width] {
            line(&mut ops, col_x, y, col_x, table_bottom);
        }

        ops
    }
}

impl Default for PdfReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for PdfReportRenderer {
    fn render(&self, rows: &[SummaryRow], title: &str) -> Result<Vec<u8>> {
        if rows.is_empty() {
            return Err(RenderError::Empty);
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(font("Helvetica"));
        let bold_id = doc.add_object(font("Helvetica-Bold"));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let chunks = Self::paginate(rows);
        let mut kids: Vec<Object> = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            let content = Content {
                operations: self.page_operations(chunk, title, index == 0),
            };
            let encoded = content
                .encode()
                .map_err(|e| RenderError::Content(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.0f32.into(), 0.0f32.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut out = Vec::new();
        doc.save_to(&mut out)
            .map_err(|e| RenderError::Write(e.to_string()))?;

        debug!("Rendered report: {} rows, {} pages, {} bytes", rows.len(), page_count, out.len());
        Ok(out)
    }
}

fn font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Emit one text run. `gray` is the fill level (0 black, 1 white).
fn text(ops: &mut Vec<Operation>, font: &str, size: f32, x: f32, y: f32, s: &str, gray: f32) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("g", vec![gray.into()]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(s))]));
    ops.push(Operation::new("ET", vec![]));
}

fn fill_rect(ops: &mut Vec<Operation>, (r, g, b): (f32, f32, f32), x: f32, y: f32, w: f32, h: f32) {
    ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
    ops.push(Operation::new("re", vec![x.into(), y.into(), w.into(), h.into()]));
    ops.push(Operation::new("f", vec![]));
}

fn line(ops: &mut Vec<Operation>, x1: f32, y1: f32, x2: f32, y2: f32) {
    ops.push(Operation::new("m", vec![x1.into(), y1.into()]));
    ops.push(Operation::new("l", vec![x2.into(), y2.into()]));
    ops.push(Operation::new("S", vec![]));
}

/// Latin-1 subset of WinAnsiEncoding; other characters become '?'.
fn win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Helvetica advance width in points.
fn text_width(s: &str, size: f32) -> f32 {
    let units: u32 = s.chars().map(helvetica_width).sum();
    units as f32 * size / 1000.0
}

// Standard Helvetica AFM widths for the characters amounts and labels use;
// everything else is approximated with the digit width.
fn helvetica_width(c: char) -> u32 {
    match c {
        ' ' | ',' | '.' | '/' | 'I' | 'f' | 't' => 278,
        '-' | '(' | ')' | 'r' => 333,
        'i' | 'j' | 'l' => 222,
        '%' => 889,
        '+' => 584,
        'm' | 'M' => 833,
        'W' => 944,
        'w' => 722,
        'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 722,
        'G' | 'O' | 'Q' => 778,
        'F' | 'T' | 'Z' => 611,
        'J' | 'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 500,
        'L' => 556,
        _ => 556,
    }
}
