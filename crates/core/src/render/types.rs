//! Render target and artifact types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::reports::ReportError;

/// Document variant. Unknown names fall back to [`ReportType::General`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// Summary, payments and breakdowns.
    Financial,
    /// Anomalies, recommendations and overdue ages.
    Forensic,
    /// Ranked member contributions.
    Member,
    /// Title and summary only.
    #[default]
    General,
}

impl ReportType {
    /// Parses a report type name, falling back to `General`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "financial" => Self::Financial,
            "forensic" => Self::Forensic,
            "member" | "members" => Self::Member,
            _ => Self::General,
        }
    }

    /// Returns the report type as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Financial => "financial",
            Self::Forensic => "forensic",
            Self::Member => "member",
            Self::General => "general",
        }
    }

    /// Arabic document title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Financial => "التقرير المالي",
            Self::Forensic => "تقرير التحليل الجنائي",
            Self::Member => "تقرير الأعضاء",
            Self::General => "التقرير العام",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ReportType {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Paginated page-flow document.
    Pdf,
    /// Spreadsheet workbook.
    Xlsx,
}

impl ExportFormat {
    /// File extension.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
        }
    }

    /// MIME type.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            _ => Err(ReportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// A rendered document held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    /// Document format.
    pub format: ExportFormat,
    /// Encoded document.
    pub bytes: Vec<u8>,
    /// `{report_type}-report-{timestamp}.{ext}`.
    pub suggested_file_name: String,
}

impl RenderedArtifact {
    /// MIME type of the artifact.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Builds `financial-report-2026-10-14T09-30-00-000Z.pdf`.
#[must_use]
pub fn suggested_file_name(
    report_type: ReportType,
    generated_at: DateTime<Utc>,
    format: ExportFormat,
) -> String {
    let stamp = generated_at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{report_type}-report-{stamp}.{}", format.extension())
}
