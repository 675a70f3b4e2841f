//! Report aggregation service.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rasid_shared::types::MemberId;
use rust_decimal::Decimal;
use tracing::debug;

use super::anomaly::{AnomalyDetector, recommendations_for};
use super::error::ReportError;
use super::types::{
    Breakdowns, ChartPoint, ChartSeries, MemberContribution, MemberContributions, OverdueBand,
    OverdueBuckets, Report, ReportMetadata, ReportOptions, Summary, Trends,
};
use crate::classify::classify;
use crate::formatting::{round_money, sum_money};
use crate::payment::{PaymentRecord, PaymentStatus, RecordSnapshot};
use crate::period::{PeriodRange, previous_period};
use crate::trend::{category_trends, compute_trend};

/// Builds reports from record snapshots.
///
/// Holds only the canonical timezone used for calendar-day and calendar-month
/// grouping; every call allocates its own [`Report`].
#[derive(Debug, Clone, Copy)]
pub struct ReportAggregator {
    timezone: Tz,
}

impl Default for ReportAggregator {
    fn default() -> Self {
        Self::new(chrono_tz::Asia::Riyadh)
    }
}

impl ReportAggregator {
    /// Creates an aggregator for the given canonical timezone.
    #[must_use]
    pub const fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Builds a report for `period`.
    ///
    /// Sections not requested in `options` are left as `None`.
    pub fn build_report(
        &self,
        snapshot: &RecordSnapshot,
        period: PeriodRange,
        options: &ReportOptions,
    ) -> Result<Report, ReportError> {
        if let Some(limit) = options.max_records
            && snapshot.len() > limit
        {
            return Err(ReportError::TooManyRecords {
                count: snapshot.len(),
                limit,
            });
        }

        let as_of = options.as_of.unwrap_or_else(Utc::now);
        let records = Self::filter_period(snapshot.records(), &period);
        debug!(
            snapshot = snapshot.len(),
            in_period = records.len(),
            start = %period.start(),
            end = %period.end(),
            "aggregating report"
        );

        let (summary, breakdowns) = Self::summarize(&records);

        let member_contributions = options
            .include_member_stats
            .then(|| Self::member_contributions(&records, options.top_contributors_limit));

        // Ageing looks at every outstanding record, not only those created
        // inside the period.
        let overdue = options
            .include_overdue
            .then(|| Self::overdue_buckets(snapshot.records(), as_of));

        let trends = options.include_trends.then(|| {
            let previous = previous_period(&period);
            let previous_records = Self::filter_period(snapshot.records(), &previous);
            let (previous_summary, previous_breakdowns) = Self::summarize(&previous_records);
            debug!(in_previous = previous_records.len(), "computed previous period summary");

            Trends {
                previous_period: previous,
                revenue: compute_trend(summary.paid_amount, previous_summary.paid_amount),
                volume: compute_trend(
                    Decimal::from(summary.total_count),
                    Decimal::from(previous_summary.total_count),
                ),
                average_payment: compute_trend(
                    summary.average_payment,
                    previous_summary.average_payment,
                ),
                categories: category_trends(&breakdowns.category, &previous_breakdowns.category),
            }
        });

        let (anomalies, recommendations) = if options.detect_anomalies {
            let anomalies = AnomalyDetector::new(self.timezone).detect(&records);
            let recommendations = recommendations_for(&anomalies);
            debug!(anomalies = anomalies.len(), "ran anomaly detection");
            (Some(anomalies), recommendations)
        } else {
            (None, Vec::new())
        };

        let chart_series = options
            .include_chart_data
            .then(|| self.monthly_paid_series(&records));

        let metadata = ReportMetadata {
            snapshot_count: snapshot.len(),
            record_count: records.len(),
            warnings: snapshot.warnings().to_vec(),
        };

        let mut payments = records;
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        Ok(Report {
            generated_at: Utc::now(),
            period,
            summary,
            breakdowns,
            payments,
            member_contributions,
            overdue,
            trends,
            anomalies,
            recommendations,
            chart_series,
            metadata,
        })
    }

    fn filter_period(records: &[PaymentRecord], period: &PeriodRange) -> Vec<PaymentRecord> {
        records
            .iter()
            .filter(|r| r.created_within(period.start(), period.end()))
            .cloned()
            .collect()
    }

    /// Summary and breakdowns only; shared by the current and previous period.
    fn summarize(records: &[PaymentRecord]) -> (Summary, Breakdowns) {
        let mut summary = Summary {
            total_count: records.len(),
            ..Summary::default()
        };

        for record in records {
            summary.total_amount = summary.total_amount.saturating_add(record.amount);
            match record.status {
                PaymentStatus::Paid => {
                    summary.paid_count += 1;
                    summary.paid_amount = summary.paid_amount.saturating_add(record.amount);
                }
                PaymentStatus::Pending => {
                    summary.pending_count += 1;
                    summary.pending_amount = summary.pending_amount.saturating_add(record.amount);
                }
                PaymentStatus::Failed => summary.failed_count += 1,
                PaymentStatus::Cancelled | PaymentStatus::Refunded => {}
            }
        }

        if summary.total_count > 0 {
            let count = Decimal::from(summary.total_count);
            summary.average_payment = round_money(summary.total_amount / count);
            summary.success_rate =
                round_money(Decimal::from(summary.paid_count) / count * Decimal::ONE_HUNDRED);
        }

        let breakdowns = Breakdowns {
            status: classify(records, |r| Some(r.status.as_str())),
            category: classify(records, |r| Some(r.category.as_str())),
            method: classify(
                records.iter().filter(|r| r.method.is_some()),
                |r| r.method.as_deref(),
            ),
        };

        (summary, breakdowns)
    }

    fn member_contributions(records: &[PaymentRecord], limit: usize) -> MemberContributions {
        struct Acc<'a> {
            name: &'a str,
            count: usize,
            total: Decimal,
            last: DateTime<Utc>,
        }

        let mut by_member: HashMap<MemberId, Acc<'_>> = HashMap::new();
        for record in records.iter().filter(|r| r.status == PaymentStatus::Paid) {
            let acc = by_member.entry(record.member_id).or_insert(Acc {
                name: record.member_name.as_str(),
                count: 0,
                total: Decimal::ZERO,
                last: record.created_at,
            });
            acc.count += 1;
            acc.total = acc.total.saturating_add(record.amount);
            if record.created_at > acc.last {
                acc.last = record.created_at;
            }
            if acc.name.is_empty() {
                acc.name = record.member_name.as_str();
            }
        }

        let grand_total = sum_money(by_member.values().map(|acc| acc.total));
        let contributor_count = by_member.len();

        let mut ranked: Vec<(MemberId, Acc<'_>)> = by_member.into_iter().collect();
        ranked.sort_by(|(a_id, a), (b_id, b)| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.name.cmp(b.name))
                .then_with(|| a_id.cmp(b_id))
        });

        let top = ranked
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(idx, (member_id, acc))| MemberContribution {
                rank: idx + 1,
                member_id,
                member_name: acc.name.to_string(),
                payment_count: acc.count,
                total_amount: acc.total,
                last_payment_at: acc.last,
            })
            .collect();

        MemberContributions {
            top,
            grand_total,
            contributor_count,
        }
    }

    fn overdue_buckets(records: &[PaymentRecord], as_of: DateTime<Utc>) -> OverdueBuckets {
        let mut buckets = OverdueBuckets::default();

        for record in records.iter().filter(|r| r.status.is_outstanding()) {
            let Some(due) = record.due_date else {
                continue;
            };
            // num_days truncates toward zero, which is floor for past due dates.
            let days = (as_of - due).num_days();
            let Some(band) = OverdueBand::for_days(days) else {
                continue;
            };
            if let Some(bucket) = buckets.buckets.iter_mut().find(|b| b.band == band) {
                bucket.count += 1;
                bucket.total_amount = bucket.total_amount.saturating_add(record.amount);
            }
        }

        buckets
    }

    fn monthly_paid_series(&self, records: &[PaymentRecord]) -> ChartSeries {
        let mut months: BTreeMap<String, Decimal> = BTreeMap::new();
        for record in records.iter().filter(|r| r.status == PaymentStatus::Paid) {
            let label = record
                .created_at
                .with_timezone(&self.timezone)
                .format("%Y-%m")
                .to_string();
            let month = months.entry(label).or_insert(Decimal::ZERO);
            *month = month.saturating_add(record.amount);
        }

        ChartSeries {
            points: months
                .into_iter()
                .map(|(label, amount)| ChartPoint { label, amount })
                .collect(),
        }
    }
}
