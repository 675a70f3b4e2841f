//! Command-line arguments.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;
use rasid_core::period::{PeriodName, PeriodSpec};
use rasid_core::render::ExportFormat;
use rasid_core::reports::ReportOptions;
use rasid_shared::config::ReportSettings;

#[derive(Debug, Parser)]
#[command(name = "rasid")]
#[command(version, about = "Render payment reports to PDF or XLSX and deliver them")]
pub struct Cli {
    /// Path to the JSON array of payment records
    pub records: PathBuf,

    /// financial, forensic, member or general (unknown values render general)
    #[arg(short = 't', long, default_value = "general")]
    pub report_type: String,

    /// pdf or xlsx
    #[arg(short, long, default_value = "pdf")]
    pub format: ExportFormat,

    /// Named period: today, week, month, quarter or year
    #[arg(short, long, conflicts_with_all = ["from", "to"])]
    pub period: Option<PeriodName>,

    /// Custom range start (RFC 3339)
    #[arg(long, requires = "to")]
    pub from: Option<DateTime<Utc>>,

    /// Custom range end, exclusive (RFC 3339)
    #[arg(long, requires = "from")]
    pub to: Option<DateTime<Utc>>,

    /// Reference instant for named periods and overdue ages (RFC 3339)
    #[arg(long)]
    pub as_of: Option<DateTime<Utc>>,

    /// Compare against the previous period
    #[arg(long)]
    pub trends: bool,

    /// Skip member contributions
    #[arg(long)]
    pub no_member_stats: bool,

    /// Skip overdue buckets
    #[arg(long)]
    pub no_overdue: bool,

    /// Number of ranked contributors
    #[arg(long)]
    pub top: Option<usize>,
}

impl Cli {
    /// Report options from the arguments on top of configured limits.
    pub fn options(&self, settings: &ReportSettings) -> ReportOptions {
        let defaults = ReportOptions::from_settings(settings);

        let period = match (self.from, self.to) {
            (Some(start), Some(end)) => PeriodSpec::Custom { start, end },
            _ => self
                .period
                .map_or(defaults.period, PeriodSpec::from),
        };

        ReportOptions {
            period,
            include_member_stats: !self.no_member_stats,
            include_overdue: !self.no_overdue,
            include_trends: self.trends,
            top_contributors_limit: self.top.unwrap_or(defaults.top_contributors_limit),
            as_of: self.as_of,
            ..defaults
        }
    }
}
