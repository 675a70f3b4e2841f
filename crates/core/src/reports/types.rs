//! Report types.

use chrono::{DateTime, Utc};
use rasid_shared::config::ReportSettings;
use rasid_shared::types::{MemberId, PaymentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::classify::Breakdown;
use crate::payment::{IngestWarning, PaymentRecord};
use crate::period::{PeriodRange, PeriodSpec};
use crate::trend::{CategoryTrend, TrendMetric};

/// Options controlling which sections a report carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Requested period. Resolved by the caller into a [`PeriodRange`].
    pub period: PeriodSpec,
    /// Compute member contributions.
    pub include_member_stats: bool,
    /// Compute overdue buckets.
    pub include_overdue: bool,
    /// Compare with the previous period.
    pub include_trends: bool,
    /// Compute the monthly chart series.
    pub include_chart_data: bool,
    /// Run forensic anomaly detection.
    pub detect_anomalies: bool,
    /// Number of ranked contributors kept.
    pub top_contributors_limit: usize,
    /// Reject snapshots larger than this.
    pub max_records: Option<usize>,
    /// Reference instant for overdue ages and named periods. Defaults to now.
    pub as_of: Option<DateTime<Utc>>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            period: PeriodSpec::default(),
            include_member_stats: true,
            include_overdue: true,
            include_trends: false,
            include_chart_data: false,
            detect_anomalies: false,
            top_contributors_limit: 10,
            max_records: None,
            as_of: None,
        }
    }
}

impl ReportOptions {
    /// Default options with limits taken from settings.
    #[must_use]
    pub fn from_settings(settings: &ReportSettings) -> Self {
        Self {
            top_contributors_limit: settings.top_contributors_limit,
            max_records: settings.max_records,
            ..Self::default()
        }
    }
}

/// Headline counts and amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Records in the period.
    pub total_count: usize,
    /// Sum of all amounts.
    pub total_amount: Decimal,
    /// Paid records.
    pub paid_count: usize,
    /// Sum of paid amounts.
    pub paid_amount: Decimal,
    /// Pending records.
    pub pending_count: usize,
    /// Sum of pending amounts.
    pub pending_amount: Decimal,
    /// Failed records.
    pub failed_count: usize,
    /// `paid_count / total_count * 100`, 2 decimal places.
    pub success_rate: Decimal,
    /// `total_amount / total_count`, 2 decimal places.
    pub average_payment: Decimal,
}

/// Classification breakdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdowns {
    /// By payment status.
    pub status: Breakdown,
    /// By category.
    pub category: Breakdown,
    /// By payment method. Records without a method are excluded.
    pub method: Breakdown,
}

/// One member's contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberContribution {
    /// 1-based rank.
    pub rank: usize,
    /// Member ID.
    pub member_id: MemberId,
    /// Member name.
    pub member_name: String,
    /// Number of payments.
    pub payment_count: usize,
    /// Sum of amounts.
    pub total_amount: Decimal,
    /// Latest payment timestamp.
    pub last_payment_at: DateTime<Utc>,
}

/// Ranked contributors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberContributions {
    /// Top contributors, highest total first.
    pub top: Vec<MemberContribution>,
    /// Total across every member, not just the top.
    pub grand_total: Decimal,
    /// Number of distinct members.
    pub contributor_count: usize,
}

/// Age band of an overdue payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OverdueBand {
    /// 30 to 59 days.
    #[serde(rename = "30-60days")]
    ThirtyToSixty,
    /// 60 to 89 days.
    #[serde(rename = "60-90days")]
    SixtyToNinety,
    /// 90 days or more.
    #[serde(rename = "90+days")]
    NinetyPlus,
}

impl OverdueBand {
    /// All bands in ascending age.
    pub const ALL: [Self; 3] = [Self::ThirtyToSixty, Self::SixtyToNinety, Self::NinetyPlus];

    /// Band for an age in whole days. Under 30 days is not overdue.
    #[must_use]
    pub const fn for_days(days: i64) -> Option<Self> {
        match days {
            i64::MIN..30 => None,
            30..60 => Some(Self::ThirtyToSixty),
            60..90 => Some(Self::SixtyToNinety),
            _ => Some(Self::NinetyPlus),
        }
    }

    /// Band key, e.g. `30-60days`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ThirtyToSixty => "30-60days",
            Self::SixtyToNinety => "60-90days",
            Self::NinetyPlus => "90+days",
        }
    }

    /// Arabic label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ThirtyToSixty => "30-60 يوم",
            Self::SixtyToNinety => "60-90 يوم",
            Self::NinetyPlus => "أكثر من 90 يوم",
        }
    }
}

/// Overdue payments in one age band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueBucket {
    /// Age band.
    pub band: OverdueBand,
    /// Number of overdue payments.
    pub count: usize,
    /// Sum of overdue amounts.
    pub total_amount: Decimal,
}

/// Overdue payments grouped by age. Always carries every band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueBuckets {
    /// Buckets in ascending age.
    pub buckets: Vec<OverdueBucket>,
}

impl Default for OverdueBuckets {
    fn default() -> Self {
        Self {
            buckets: OverdueBand::ALL
                .into_iter()
                .map(|band| OverdueBucket {
                    band,
                    count: 0,
                    total_amount: Decimal::ZERO,
                })
                .collect(),
        }
    }
}

impl OverdueBuckets {
    /// Bucket for a band.
    #[must_use]
    pub fn get(&self, band: OverdueBand) -> Option<&OverdueBucket> {
        self.buckets.iter().find(|bucket| bucket.band == band)
    }

    /// Total overdue payments.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.count).sum()
    }
}

/// Period-over-period comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trends {
    /// The period compared against.
    pub previous_period: PeriodRange,
    /// Paid amount.
    pub revenue: TrendMetric,
    /// Record count.
    pub volume: TrendMetric,
    /// Average payment.
    pub average_payment: TrendMetric,
    /// Per-category totals.
    pub categories: Vec<CategoryTrend>,
}

/// Anomaly severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational.
    Low,
    /// Needs review.
    Medium,
    /// Needs immediate review.
    High,
}

impl Severity {
    /// Returns the severity as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// What an anomaly detector flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Amount far above the period mean.
    AmountOutlier,
    /// Same member, amount and day.
    DuplicatePayment,
    /// Refunded payment.
    RefundedPayment,
}

/// A suspicious record found by forensic analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    /// Detector that raised it.
    pub kind: AnomalyKind,
    /// Short Arabic description.
    pub description: String,
    /// Arabic details.
    pub details: String,
    /// Severity.
    pub severity: Severity,
    /// When the flagged payment was made.
    pub date: DateTime<Utc>,
    /// Flagged payment.
    pub payment_id: PaymentId,
}

/// One point of a chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Month label, `YYYY-MM`.
    pub label: String,
    /// Paid amount in the month.
    pub amount: Decimal,
}

/// Chart-ready monthly paid totals, ascending by month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Data points.
    pub points: Vec<ChartPoint>,
}

/// Provenance of a report's data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Records in the snapshot.
    pub snapshot_count: usize,
    /// Records inside the period.
    pub record_count: usize,
    /// Ingestion warnings raised while normalizing the snapshot.
    pub warnings: Vec<IngestWarning>,
}

impl ReportMetadata {
    /// Number of ingestion warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

/// A built report. Never mutated by the renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Wall-clock time of construction.
    pub generated_at: DateTime<Utc>,
    /// Covered period.
    pub period: PeriodRange,
    /// Summary.
    pub summary: Summary,
    /// Breakdowns.
    pub breakdowns: Breakdowns,
    /// In-period records, newest first.
    pub payments: Vec<PaymentRecord>,
    /// Present when member stats were requested.
    pub member_contributions: Option<MemberContributions>,
    /// Present when overdue analysis was requested.
    pub overdue: Option<OverdueBuckets>,
    /// Present when trends were requested.
    pub trends: Option<Trends>,
    /// Present when anomaly detection was requested.
    pub anomalies: Option<Vec<Anomaly>>,
    /// Follow-up actions derived from the anomalies.
    pub recommendations: Vec<String>,
    /// Present when chart data was requested.
    pub chart_series: Option<ChartSeries>,
    /// Data provenance.
    pub metadata: ReportMetadata,
}
