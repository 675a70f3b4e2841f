//! End-to-end export: validate, aggregate, render, deliver.
//!
//! The pipeline owns no state beyond its configuration; each call builds
//! its own report and artifact and hands the bytes to the delivery adapter
//! exactly once.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::{ExportError, ExportErrorKind};

use chrono::Utc;
use tracing::debug;

use crate::formatting::FormatConfig;
use crate::payment::RecordSnapshot;
use crate::period::resolve_spec;
use crate::render::{ExportFormat, RenderedArtifact, ReportType, render};
use crate::reports::{Report, ReportAggregator, ReportOptions};
use crate::storage::{DeliveryAdapter, report_destination};

/// Result of a successful export.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    /// URL returned by the delivery adapter.
    pub url: String,
    /// The rendered artifact.
    pub artifact: RenderedArtifact,
    /// The report the artifact was rendered from.
    pub report: Report,
}

impl ExportOutcome {
    /// Number of records coerced or skipped during ingestion.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.report.metadata.warning_count()
    }
}

/// Runs exports against a delivery adapter.
pub struct ExportPipeline<D> {
    aggregator: ReportAggregator,
    format: FormatConfig,
    delivery: D,
}

impl<D: DeliveryAdapter> ExportPipeline<D> {
    /// Creates a pipeline. Calendar grouping uses the format timezone.
    #[must_use]
    pub fn new(format: FormatConfig, delivery: D) -> Self {
        Self {
            aggregator: ReportAggregator::new(format.timezone),
            format,
            delivery,
        }
    }

    /// Get the delivery adapter.
    #[must_use]
    pub fn delivery(&self) -> &D {
        &self.delivery
    }

    /// Exports `snapshot` as a `report_type` document in `format`.
    ///
    /// An unsupported format or an invalid period fails before any
    /// aggregation. Forensic exports always run anomaly detection and
    /// financial exports always carry the monthly chart series.
    pub async fn export(
        &self,
        snapshot: &RecordSnapshot,
        report_type: &str,
        format: &str,
        options: &ReportOptions,
    ) -> Result<ExportOutcome, ExportError> {
        let format: ExportFormat = format.parse()?;
        let report_type = ReportType::parse(report_type);
        let options = effective_options(report_type, options);

        let now = options.as_of.unwrap_or_else(Utc::now);
        let period = resolve_spec(&options.period, now, self.format.timezone)?;
        debug!(
            %report_type,
            %format,
            start = %period.start(),
            end = %period.end(),
            "export requested"
        );

        let report = self.aggregator.build_report(snapshot, period, &options)?;
        debug!(
            records = report.metadata.record_count,
            warnings = report.metadata.warning_count(),
            "report built"
        );

        let artifact = render(&report, format, report_type, &self.format)?;
        debug!(
            bytes = artifact.bytes.len(),
            file = %artifact.suggested_file_name,
            "artifact rendered"
        );

        let destination = report_destination(&artifact.suggested_file_name);
        let url = self
            .delivery
            .deliver(artifact.bytes.clone(), artifact.content_type(), &destination)
            .await?;

        Ok(ExportOutcome {
            url,
            artifact,
            report,
        })
    }
}

/// Options with the sections each report type always needs switched on.
fn effective_options(report_type: ReportType, options: &ReportOptions) -> ReportOptions {
    let mut options = options.clone();
    match report_type {
        ReportType::Forensic => options.detect_anomalies = true,
        ReportType::Financial => options.include_chart_data = true,
        ReportType::Member => options.include_member_stats = true,
        ReportType::General => {}
    }
    options
}
