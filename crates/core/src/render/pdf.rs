//! Page-flow (PDF) writer.
//!
//! A4 pages, 500pt content width, right-aligned text. Vertical positions are
//! tracked top-down in whole points; when the offset passes 700pt a new page
//! starts at 50pt. Table column headers are drawn once, before the first row.
//!
//! Text is shaped and set in the embedded face. Glyph positions are computed
//! in hundredths of a point, so each text object scales the user space down
//! by `TEXT_SCALE` first.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};

use super::error::RenderError;
use super::font::{FontFace, LaidOutLine, glyph_bytes};
use super::layout::{AnomalyRow, Block, DocumentFooter, DocumentHeader, Table};
use crate::reports::Severity;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const CONTENT_WIDTH: i64 = 500;
const RIGHT_EDGE: i64 = MARGIN + CONTENT_WIDTH;
const PAGE_BREAK_AT: i64 = 700;
const BODY_START: i64 = 180;
const HUNDREDTHS: i64 = 100;
const TEXT_SCALE: f32 = 0.01;

type Rgb = [f32; 3];

const TITLE: Rgb = [0.173, 0.243, 0.314]; // #2c3e50
const SUBTLE: Rgb = [0.498, 0.549, 0.553]; // #7f8c8d
const BODY: Rgb = [0.204, 0.286, 0.369]; // #34495e
const WHITE: Rgb = [1.0, 1.0, 1.0];
const RULE: Rgb = [0.741, 0.765, 0.78]; // #bdc3c7
const FOOTER: Rgb = [0.584, 0.647, 0.651]; // #95a5a6
const HIGH: Rgb = [0.906, 0.298, 0.235]; // #e74c3c
const MEDIUM: Rgb = [0.953, 0.612, 0.071]; // #f39c12
const LOW: Rgb = [0.153, 0.682, 0.376]; // #27ae60

const fn severity_color(severity: Severity) -> Rgb {
    match severity {
        Severity::High => HIGH,
        Severity::Medium => MEDIUM,
        Severity::Low => LOW,
    }
}

/// Writes a document and returns the encoded bytes.
pub fn write_pdf(
    header: &DocumentHeader,
    blocks: &[Block],
    footer: &DocumentFooter,
) -> Result<Vec<u8>, RenderError> {
    let mut flow = PageFlow::new(FontFace::load()?);
    flow.header(header);
    for block in blocks {
        match block {
            Block::Heading(text) => flow.heading(text),
            Block::Line { label, value } => flow.line(&format!("{label}: {value}")),
            Block::Table(table) => flow.table(table),
            Block::Anomalies(rows) => flow.anomalies(rows),
            Block::Recommendations(items) => flow.recommendations(items),
        }
    }
    flow.footer(footer);
    flow.finish()
}

struct PageFlow {
    pages: Vec<Vec<Operation>>,
    y: i64,
    font: FontFace,
}

impl PageFlow {
    fn new(font: FontFace) -> Self {
        Self {
            pages: vec![Vec::new()],
            y: MARGIN,
            font,
        }
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn ops(&mut self) -> &mut Vec<Operation> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn ensure_room(&mut self) {
        if self.y > PAGE_BREAK_AT {
            self.pages.push(Vec::new());
            self.y = MARGIN;
        }
    }

    fn header(&mut self, header: &DocumentHeader) {
        self.text_right(&header.title, MARGIN, 20, TITLE);
        self.text_right(&header.subtitle, 80, 14, SUBTLE);
        self.text_right(&header.hijri_line, 110, 12, BODY);
        self.text_right(&header.gregorian_line, 130, 12, BODY);
        self.rule(160);
        self.y = BODY_START;
    }

    fn heading(&mut self, text: &str) {
        self.ensure_room();
        self.text_right(text, self.y, 16, TITLE);
        self.y += 30;
    }

    fn line(&mut self, text: &str) {
        self.ensure_room();
        self.text_right(text, self.y, 12, BODY);
        self.y += 20;
    }

    fn table(&mut self, table: &Table) {
        self.y += 10;
        self.heading(&table.title);

        let columns = table.columns.len();
        if columns == 0 {
            return;
        }
        let width = CONTENT_WIDTH / i64::try_from(columns).unwrap_or(1);

        self.ensure_room();
        self.fill_rect(MARGIN, self.y, CONTENT_WIDTH, 20, BODY);
        let top = self.y;
        self.cells(&table.columns, width, top + 5, 10, WHITE);
        self.y += 25;

        for row in &table.rows {
            self.ensure_room();
            let top = self.y;
            self.cells(row, width, top + 2, 9, TITLE);
            self.y += 20;
        }
        self.y += 20;
    }

    fn anomalies(&mut self, rows: &[AnomalyRow]) {
        self.y += 10;
        self.heading("الحالات الشاذة المكتشفة");
        for (idx, row) in rows.iter().enumerate() {
            self.ensure_room();
            self.text_right(&format!("{}. {}", idx + 1, row.description), self.y, 12, TITLE);
            self.y += 20;
            self.text_right(&format!("التفاصيل: {}", row.details), self.y, 10, BODY);
            self.y += 15;
            self.text_right(
                &format!("مستوى الخطورة: {}", row.severity_label),
                self.y,
                10,
                severity_color(row.severity),
            );
            self.y += 15;
            self.text_right(&format!("التاريخ: {}", row.date), self.y, 10, SUBTLE);
            self.y += 20;
        }
    }

    fn recommendations(&mut self, items: &[String]) {
        self.y += 10;
        self.heading("التوصيات");
        for (idx, item) in items.iter().enumerate() {
            self.line(&format!("{}. {item}", idx + 1));
        }
    }

    fn footer(&mut self, footer: &DocumentFooter) {
        let y = PAGE_HEIGHT - MARGIN;
        self.text_centered(&footer.generated_by, MARGIN, CONTENT_WIDTH, y, 8, FOOTER);
        self.text_centered(&footer.generated_on, MARGIN, CONTENT_WIDTH, y + 12, 8, FOOTER);
    }

    /// Draws cells right to left: logical column 0 is rightmost.
    fn cells(&mut self, cells: &[String], width: i64, top: i64, size: i64, color: Rgb) {
        let mut right = RIGHT_EDGE;
        for cell in cells {
            self.text_centered(cell, right - width, width, top, size, color);
            right -= width;
        }
    }

    fn text_right(&mut self, text: &str, top: i64, size: i64, color: Rgb) {
        let line = self.font.layout(text);
        let x = (RIGHT_EDGE * HUNDREDTHS - width(&line, size)).max(MARGIN * HUNDREDTHS);
        self.draw(&line, x, top, size, color);
    }

    fn text_centered(&mut self, text: &str, left: i64, width_pt: i64, top: i64, size: i64, color: Rgb) {
        let line = self.font.layout(text);
        let slack = (width_pt * HUNDREDTHS - width(&line, size)) / 2;
        self.draw(&line, left * HUNDREDTHS + slack.max(0), top, size, color);
    }

    /// Draws a laid-out line starting `x` hundredths of a point from the left.
    fn draw(&mut self, line: &LaidOutLine, x: i64, top: i64, size: i64, color: Rgb) {
        if line.runs.is_empty() {
            return;
        }
        let baseline = (PAGE_HEIGHT - top - size) * HUNDREDTHS;
        let scale = size * HUNDREDTHS;
        let ops = self.ops();
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "cm",
            vec![
                Object::Real(TEXT_SCALE),
                0.into(),
                0.into(),
                Object::Real(TEXT_SCALE),
                0.into(),
                0.into(),
            ],
        ));
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec!["F1".into(), 1.into()]));
        ops.push(Operation::new("rg", rgb(color)));
        for run in &line.runs {
            let left = x + run.offset * size / 10;
            ops.push(Operation::new(
                "Tm",
                vec![
                    scale.into(),
                    0.into(),
                    0.into(),
                    scale.into(),
                    left.into(),
                    baseline.into(),
                ],
            ));
            ops.push(Operation::new(
                "Tj",
                vec![Object::String(glyph_bytes(&run.glyphs), StringFormat::Hexadecimal)],
            ));
        }
        ops.push(Operation::new("ET", vec![]));
        ops.push(Operation::new("Q", vec![]));
    }

    fn fill_rect(&mut self, x: i64, top: i64, width: i64, height: i64, color: Rgb) {
        let bottom = PAGE_HEIGHT - top - height;
        let ops = self.ops();
        ops.push(Operation::new("rg", rgb(color)));
        ops.push(Operation::new(
            "re",
            vec![x.into(), bottom.into(), width.into(), height.into()],
        ));
        ops.push(Operation::new("f", vec![]));
    }

    fn rule(&mut self, top: i64) {
        let y = PAGE_HEIGHT - top;
        let ops = self.ops();
        ops.push(Operation::new("RG", rgb(RULE)));
        ops.push(Operation::new("w", vec![1.into()]));
        ops.push(Operation::new("m", vec![MARGIN.into(), y.into()]));
        ops.push(Operation::new("l", vec![RIGHT_EDGE.into(), y.into()]));
        ops.push(Operation::new("S", vec![]));
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = self.font.embed(&mut doc);
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let page_count = self.page_count();
        let mut kids: Vec<Object> = Vec::with_capacity(page_count);
        for operations in self.pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => i64::try_from(page_count).unwrap_or(i64::MAX),
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        doc.compress();
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

fn rgb(color: Rgb) -> Vec<Object> {
    color.iter().map(|c| Object::Real(*c)).collect()
}

/// Line width in hundredths of a point at `size`.
fn width(line: &LaidOutLine, size: i64) -> i64 {
    line.advance * size / 10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> DocumentHeader {
        DocumentHeader {
            title: "التقرير المالي".to_string(),
            subtitle: "Rasid".to_string(),
            hijri_line: "التاريخ الهجري: 14 شوال 1448هـ".to_string(),
            gregorian_line: "التاريخ الميلادي: 14/10/2026".to_string(),
        }
    }

    fn footer() -> DocumentFooter {
        DocumentFooter {
            generated_by: "Rasid".to_string(),
            generated_on: "14 أكتوبر 2026".to_string(),
        }
    }

    fn table(rows: usize) -> Block {
        Block::Table(Table {
            title: "تفاصيل المدفوعات".to_string(),
            columns: vec!["A".to_string(), "B".to_string()],
            rows: (0..rows)
                .map(|i| vec![format!("REF-{i}"), "1.00".to_string()])
                .collect(),
        })
    }

    fn flow() -> PageFlow {
        PageFlow::new(FontFace::load().unwrap())
    }

    fn page_count(bytes: &[u8]) -> usize {
        Document::load_mem(bytes).unwrap().get_pages().len()
    }

    #[test]
    fn test_empty_body_is_single_page() {
        let bytes = write_pdf(&header(), &[], &footer()).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn test_long_table_flows_onto_more_pages() {
        // 180 + 40 + 25 = 245 before rows; 20pt per row, break after 700.
        let bytes = write_pdf(&header(), &[table(100)], &footer()).unwrap();

        assert!(page_count(&bytes) >= 3);
    }

    #[test]
    fn test_column_headers_are_drawn_once() {
        let mut flow = flow();
        flow.header(&header());
        let Block::Table(t) = table(60) else {
            panic!("expected a table block");
        };

        flow.table(&t);

        assert!(flow.page_count() > 1);
        let header_bars = flow
            .pages
            .iter()
            .flatten()
            .filter(|op| op.operator == "re")
            .count();
        assert_eq!(header_bars, 1);
    }

    #[test]
    fn test_break_resets_offset_to_top_margin() {
        let mut flow = flow();
        flow.y = PAGE_BREAK_AT + 1;

        flow.line("x");

        assert_eq!(flow.page_count(), 2);
        assert_eq!(flow.y, MARGIN + 20);
    }

    #[test]
    fn test_first_logical_column_is_rightmost() {
        let mut flow = flow();

        flow.cells(&["R".to_string(), "L".to_string()], 250, 100, 10, BODY);

        let xs: Vec<i64> = flow.pages[0]
            .iter()
            .filter(|op| op.operator == "Tm")
            .map(|op| op.operands[4].as_i64().unwrap())
            .collect();
        assert!(xs[0] > xs[1]);
    }

    #[test]
    fn test_arabic_text_extracts_in_reading_order() {
        let blocks = [Block::Line {
            label: "الإجمالي".to_string(),
            value: "1,250.00".to_string(),
        }];
        let bytes = write_pdf(&header(), &blocks, &footer()).unwrap();

        let text = Document::load_mem(&bytes).unwrap().extract_text(&[1]).unwrap();

        assert!(text.contains("التقرير المالي"), "{text}");
        assert!(text.contains("التاريخ الميلادي: 14/10/2026"), "{text}");
        assert!(text.contains("الإجمالي: 1,250.00"), "{text}");
        assert!(!text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_font_is_embedded_with_unicode_map() {
        let bytes = write_pdf(&header(), &[], &footer()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();

        let page = *doc.get_pages().get(&1).unwrap();
        let fonts = doc.get_page_fonts(page).unwrap();
        let font = fonts.get(b"F1".as_slice()).unwrap();

        assert_eq!(font.get(b"Subtype").unwrap().as_name().unwrap(), b"Type0");
        assert_eq!(font.get(b"Encoding").unwrap().as_name().unwrap(), b"Identity-H");
        assert!(font.get(b"ToUnicode").is_ok());
    }

    #[test]
    fn test_text_uses_glyph_codes_not_utf8() {
        let mut flow = flow();

        flow.line("ب");

        let shown: Vec<&Object> = flow.pages[0]
            .iter()
            .filter(|op| op.operator == "Tj")
            .flat_map(|op| op.operands.iter())
            .collect();
        assert_eq!(shown.len(), 1);
        let Object::String(bytes, StringFormat::Hexadecimal) = shown[0] else {
            panic!("expected a hex glyph string");
        };
        assert_eq!(bytes.len(), 2);
        assert_ne!(bytes.as_slice(), "ب".as_bytes());
    }
}
