//! Document rendering.
//!
//! `render_document` validates the format, selects the layout for the report
//! type once, and hands the layout's blocks to the page-flow or workbook
//! writer.

pub mod error;
mod font;
pub mod layout;
mod pdf;
mod shaping;
pub mod types;
mod xlsx;

pub use error::RenderError;
pub use layout::{
    AnomalyRow, Block, DocumentFooter, DocumentHeader, ReportLayout, Table, layout_for,
};
pub use types::{ExportFormat, RenderedArtifact, ReportType, suggested_file_name};
pub use xlsx::{CHART_SHEET, MAIN_SHEET};

use tracing::debug;

use crate::formatting::FormatConfig;
use crate::reports::Report;

/// Renders a report.
///
/// An unsupported `format` is rejected before any layout work; an unknown
/// `report_type` renders the general layout.
pub fn render_document(
    report: &Report,
    format: &str,
    report_type: &str,
    config: &FormatConfig,
) -> Result<RenderedArtifact, RenderError> {
    let format: ExportFormat = format.parse()?;
    render(report, format, ReportType::parse(report_type), config)
}

/// Renders a report with an already validated format and type.
pub fn render(
    report: &Report,
    format: ExportFormat,
    report_type: ReportType,
    config: &FormatConfig,
) -> Result<RenderedArtifact, RenderError> {
    let layout = layout_for(report_type);
    let header = layout.render_header(report, config);
    let blocks = layout.render_body(report, config);
    debug!(%report_type, %format, blocks = blocks.len(), "rendering document");

    let bytes = match format {
        ExportFormat::Pdf => {
            let footer = layout.render_footer(report, config);
            pdf::write_pdf(&header, &blocks, &footer)?
        }
        ExportFormat::Xlsx => {
            let chart = report
                .chart_series
                .as_ref()
                .filter(|_| report_type == ReportType::Financial);
            xlsx::write_xlsx(&header, &blocks, chart)?
        }
    };

    Ok(RenderedArtifact {
        format,
        bytes,
        suggested_file_name: suggested_file_name(report_type, report.generated_at, format),
    })
}
