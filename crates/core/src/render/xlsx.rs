//! Workbook (XLSX) writer.
//!
//! The primary sheet is right-to-left with merged title, subtitle and
//! bilingual date rows. Financial reports carrying a chart series get a
//! second sheet with the raw monthly table.

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, ColNum, Format, FormatAlign, RowNum, Workbook, Worksheet};

use super::error::RenderError;
use super::layout::{AnomalyRow, Block, DocumentHeader, Table};
use crate::reports::{ChartSeries, Severity};

/// Primary sheet name.
pub const MAIN_SHEET: &str = "التقرير الرئيسي";
/// Chart data sheet name.
pub const CHART_SHEET: &str = "الرسوم البيانية";

const LAST_COL: ColNum = 7;
const BODY_START: RowNum = 4;

const HIGH: u32 = 0x00E7_4C3C;
const MEDIUM: u32 = 0x00F3_9C12;
const LOW: u32 = 0x0027_AE60;

const fn severity_color(severity: Severity) -> u32 {
    match severity {
        Severity::High => HIGH,
        Severity::Medium => MEDIUM,
        Severity::Low => LOW,
    }
}

struct Styles {
    title: Format,
    subtitle: Format,
    date: Format,
    section: Format,
    label: Format,
    column_header: Format,
    cell: Format,
    striped: Format,
    anomaly_section: Format,
    anomaly_header: Format,
    recommendation_section: Format,
    recommendation: Format,
}

impl Styles {
    fn new() -> Self {
        let centered = Format::new()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);
        Self {
            title: centered
                .clone()
                .set_bold()
                .set_font_size(18)
                .set_font_color(Color::RGB(0x002C_3E50))
                .set_background_color(Color::RGB(0x00EC_F0F1)),
            subtitle: centered
                .clone()
                .set_font_size(12)
                .set_font_color(Color::RGB(0x007F_8C8D)),
            date: centered.clone().set_font_size(10),
            section: centered
                .clone()
                .set_bold()
                .set_font_size(14)
                .set_background_color(Color::RGB(0x00D5_DBDB)),
            label: Format::new().set_bold(),
            column_header: centered
                .clone()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(0x0034_495E)),
            cell: centered.clone(),
            striped: centered.clone().set_background_color(Color::RGB(0x00F8_F9FA)),
            anomaly_section: centered
                .clone()
                .set_bold()
                .set_font_size(14)
                .set_font_color(Color::RGB(HIGH))
                .set_background_color(Color::RGB(0x00FF_EAA7)),
            anomaly_header: centered
                .clone()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(HIGH)),
            recommendation_section: centered
                .set_bold()
                .set_font_size(14)
                .set_font_color(Color::RGB(LOW))
                .set_background_color(Color::RGB(0x00D4_EDDA)),
            recommendation: Format::new()
                .set_align(FormatAlign::Right)
                .set_align(FormatAlign::VerticalCenter)
                .set_text_wrap(),
        }
    }
}

/// Writes a workbook and returns the encoded bytes.
pub fn write_xlsx(
    header: &DocumentHeader,
    blocks: &[Block],
    chart: Option<&ChartSeries>,
) -> Result<Vec<u8>, RenderError> {
    let styles = Styles::new();
    let mut workbook = Workbook::new();

    let mut sheet = Worksheet::new();
    sheet.set_name(MAIN_SHEET)?;
    sheet.set_right_to_left(true);
    for col in 0..=LAST_COL {
        sheet.set_column_width(col, 22)?;
    }

    write_header(&mut sheet, header, &styles)?;

    let mut row = BODY_START;
    for block in blocks {
        row = match block {
            Block::Heading(text) => section(&mut sheet, row, text, &styles.section)?,
            Block::Line { label, value } => {
                sheet.write_string_with_format(row, 0, label, &styles.label)?;
                sheet.write_string(row, 1, value)?;
                row + 1
            }
            Block::Table(table) => write_table(&mut sheet, row, table, &styles)?,
            Block::Anomalies(rows) => write_anomalies(&mut sheet, row, rows, &styles)?,
            Block::Recommendations(items) => {
                write_recommendations(&mut sheet, row, items, &styles)?
            }
        };
    }
    workbook.push_worksheet(sheet);

    if let Some(series) = chart {
        workbook.push_worksheet(chart_sheet(series, &styles)?);
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_header(
    sheet: &mut Worksheet,
    header: &DocumentHeader,
    styles: &Styles,
) -> Result<(), RenderError> {
    sheet.merge_range(0, 0, 0, LAST_COL, &header.title, &styles.title)?;
    sheet.merge_range(1, 0, 1, LAST_COL, &header.subtitle, &styles.subtitle)?;
    sheet.merge_range(2, 0, 2, 3, &header.hijri_line, &styles.date)?;
    sheet.merge_range(2, 4, 2, LAST_COL, &header.gregorian_line, &styles.date)?;
    sheet.set_row_height(0, 25)?;
    sheet.set_row_height(1, 20)?;
    sheet.set_row_height(2, 18)?;
    Ok(())
}

/// Writes a merged section heading; returns the next free row.
fn section(
    sheet: &mut Worksheet,
    row: RowNum,
    text: &str,
    format: &Format,
) -> Result<RowNum, RenderError> {
    let row = if row > BODY_START { row + 1 } else { row };
    sheet.merge_range(row, 0, row, LAST_COL, text, format)?;
    Ok(row + 2)
}

fn write_table(
    sheet: &mut Worksheet,
    row: RowNum,
    table: &Table,
    styles: &Styles,
) -> Result<RowNum, RenderError> {
    let mut row = section(sheet, row, &table.title, &styles.section)?;

    for (col, name) in (0..).zip(&table.columns) {
        sheet.write_string_with_format(row, col, name, &styles.column_header)?;
    }
    row += 1;

    for cells in &table.rows {
        let format = if row % 2 == 0 { &styles.striped } else { &styles.cell };
        for (col, text) in (0..).zip(cells) {
            sheet.write_string_with_format(row, col, text, format)?;
        }
        row += 1;
    }

    Ok(row)
}

fn write_anomalies(
    sheet: &mut Worksheet,
    row: RowNum,
    anomalies: &[AnomalyRow],
    styles: &Styles,
) -> Result<RowNum, RenderError> {
    let mut row = section(sheet, row, "الحالات الشاذة المكتشفة", &styles.anomaly_section)?;

    let headers = ["الوصف", "التفاصيل", "مستوى الخطورة", "التاريخ"];
    for (col, name) in (0..).zip(headers) {
        sheet.write_string_with_format(row, col, name, &styles.anomaly_header)?;
    }
    row += 1;

    let wrapped = styles.cell.clone().set_text_wrap();
    for anomaly in anomalies {
        let severity = wrapped
            .clone()
            .set_bold()
            .set_font_color(Color::RGB(severity_color(anomaly.severity)));
        sheet.write_string_with_format(row, 0, &anomaly.description, &wrapped)?;
        sheet.write_string_with_format(row, 1, &anomaly.details, &wrapped)?;
        sheet.write_string_with_format(row, 2, &anomaly.severity_label, &severity)?;
        sheet.write_string_with_format(row, 3, &anomaly.date, &wrapped)?;
        row += 1;
    }

    Ok(row)
}

fn write_recommendations(
    sheet: &mut Worksheet,
    row: RowNum,
    items: &[String],
    styles: &Styles,
) -> Result<RowNum, RenderError> {
    let mut row = section(sheet, row, "التوصيات", &styles.recommendation_section)?;

    for (idx, item) in items.iter().enumerate() {
        let text = format!("{}. {item}", idx + 1);
        sheet.merge_range(row, 0, row, LAST_COL, &text, &styles.recommendation)?;
        sheet.set_row_height(row, 25)?;
        row += 1;
    }

    Ok(row)
}

fn chart_sheet(series: &ChartSeries, styles: &Styles) -> Result<Worksheet, RenderError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(CHART_SHEET)?;
    sheet.set_right_to_left(true);
    sheet.set_column_width(0, 15)?;
    sheet.set_column_width(1, 20)?;

    sheet.write_string_with_format(0, 0, "الشهر", &styles.column_header)?;
    sheet.write_string_with_format(0, 1, "المبلغ", &styles.column_header)?;

    for (row, point) in (1..).zip(&series.points) {
        sheet.write_string(row, 0, &point.label)?;
        sheet.write_number(row, 1, point.amount.to_f64().unwrap_or_default())?;
    }

    Ok(sheet)
}
