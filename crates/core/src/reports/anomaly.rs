//! Forensic anomaly detection.
//!
//! Three detectors run over the in-period records:
//! - amount outlier: above 3x the period mean (at least 3 records), high above 5x
//! - duplicate payment: same member, same amount, same local day
//! - refunded payment

use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono_tz::Tz;
use rasid_shared::types::MemberId;
use rust_decimal::Decimal;

use super::types::{Anomaly, AnomalyKind, Severity};
use crate::formatting::{round_money, sum_money};
use crate::payment::{PaymentRecord, PaymentStatus};

const MIN_RECORDS_FOR_OUTLIERS: usize = 3;
const OUTLIER_FACTOR: Decimal = Decimal::from_parts(3, 0, 0, false, 0);
const HIGH_OUTLIER_FACTOR: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Runs every detector over a set of records.
#[derive(Debug, Clone, Copy)]
pub struct AnomalyDetector {
    timezone: Tz,
}

impl AnomalyDetector {
    /// Creates a detector. Calendar days are taken in `timezone`.
    #[must_use]
    pub const fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Flags anomalies, most severe first, then oldest first.
    #[must_use]
    pub fn detect(&self, records: &[PaymentRecord]) -> Vec<Anomaly> {
        let mut anomalies = Vec::new();
        anomalies.extend(Self::amount_outliers(records));
        anomalies.extend(self.duplicates(records));
        anomalies.extend(Self::refunds(records));

        anomalies.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.date.cmp(&b.date))
                .then_with(|| a.kind.cmp(&b.kind))
                .then_with(|| a.payment_id.cmp(&b.payment_id))
        });
        anomalies
    }

    fn amount_outliers(records: &[PaymentRecord]) -> Vec<Anomaly> {
        if records.len() < MIN_RECORDS_FOR_OUTLIERS {
            return Vec::new();
        }

        let count = Decimal::from(records.len());
        let total = sum_money(records.iter().map(|r| r.amount));
        let mean = total / count;
        let above = |amount: Decimal, factor: Decimal| {
            amount.saturating_mul(count) > total.saturating_mul(factor)
        };

        // amount > k * mean  <=>  amount * n > k * total
        records
            .iter()
            .filter(|r| above(r.amount, OUTLIER_FACTOR))
            .map(|r| {
                let severity = if above(r.amount, HIGH_OUTLIER_FACTOR) {
                    Severity::High
                } else {
                    Severity::Medium
                };
                Anomaly {
                    kind: AnomalyKind::AmountOutlier,
                    description: "مبلغ دفع غير اعتيادي".to_string(),
                    details: format!(
                        "المبلغ {} يتجاوز ثلاثة أضعاف متوسط الفترة ({})",
                        round_money(r.amount),
                        round_money(mean)
                    ),
                    severity,
                    date: r.created_at,
                    payment_id: r.id,
                }
            })
            .collect()
    }

    fn duplicates(&self, records: &[PaymentRecord]) -> Vec<Anomaly> {
        let mut groups: BTreeMap<(MemberId, Decimal, NaiveDate), Vec<&PaymentRecord>> =
            BTreeMap::new();
        for record in records {
            let day = record.created_at.with_timezone(&self.timezone).date_naive();
            groups
                .entry((record.member_id, record.amount.normalize(), day))
                .or_default()
                .push(record);
        }

        groups
            .into_values()
            .filter(|group| group.len() > 1)
            .filter_map(|mut group| {
                group.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
                let repeated = group.get(1)?;
                Some(Anomaly {
                    kind: AnomalyKind::DuplicatePayment,
                    description: "دفعة مكررة محتملة".to_string(),
                    details: format!(
                        "{} دفعات بمبلغ {} من العضو {} في نفس اليوم",
                        group.len(),
                        round_money(repeated.amount),
                        member_label(repeated)
                    ),
                    severity: Severity::Medium,
                    date: repeated.created_at,
                    payment_id: repeated.id,
                })
            })
            .collect()
    }

    fn refunds(records: &[PaymentRecord]) -> Vec<Anomaly> {
        records
            .iter()
            .filter(|r| r.status == PaymentStatus::Refunded)
            .map(|r| Anomaly {
                kind: AnomalyKind::RefundedPayment,
                description: "دفعة مستردة".to_string(),
                details: format!(
                    "تم استرداد مبلغ {} للعضو {}",
                    round_money(r.amount),
                    member_label(r)
                ),
                severity: Severity::Low,
                date: r.created_at,
                payment_id: r.id,
            })
            .collect()
    }
}

fn member_label(record: &PaymentRecord) -> String {
    if record.member_name.is_empty() {
        record.member_id.to_string()
    } else {
        record.member_name.clone()
    }
}

/// Follow-up actions for the kinds of anomalies present.
#[must_use]
pub fn recommendations_for(anomalies: &[Anomaly]) -> Vec<String> {
    let has = |kind: AnomalyKind| anomalies.iter().any(|a| a.kind == kind);

    let mut recommendations = Vec::new();
    if has(AnomalyKind::AmountOutlier) {
        recommendations.push("مراجعة المدفوعات ذات المبالغ غير الاعتيادية والتحقق من مستنداتها".to_string());
    }
    if has(AnomalyKind::DuplicatePayment) {
        recommendations.push("مطابقة الدفعات المكررة مع كشوف الحساب البنكية".to_string());
    }
    if has(AnomalyKind::RefundedPayment) {
        recommendations.push("توثيق أسباب عمليات الاسترداد واعتمادها".to_string());
    }
    if recommendations.is_empty() {
        recommendations.push("لم تُكتشف حالات شاذة، يوصى بالاستمرار في المراجعة الدورية".to_string());
    }
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rasid_shared::types::PaymentId;
    use rust_decimal_macros::dec;

    const RIYADH: Tz = chrono_tz::Asia::Riyadh;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 5, hour, 0, 0).unwrap()
    }

    fn record(member: MemberId, amount: Decimal, created_at: DateTime<Utc>) -> PaymentRecord {
        PaymentRecord {
            id: PaymentId::new(),
            amount,
            status: PaymentStatus::Paid,
            category: "subscription".to_string(),
            method: None,
            created_at,
            due_date: None,
            member_id: member,
            member_name: "فهد".to_string(),
            reference_number: None,
        }
    }

    #[test]
    fn test_outlier_severity_by_factor() {
        let member = MemberId::new();
        let mut records: Vec<PaymentRecord> = (0..9)
            .map(|i| record(MemberId::new(), dec!(100), at(1) + Duration::days(i)))
            .collect();
        // mean = (900 + 1100) / 10 = 200; 1100 > 5 * 200
        records.push(record(member, dec!(1100), at(2)));

        let anomalies = AnomalyDetector::new(RIYADH).detect(&records);

        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::AmountOutlier);
        assert_eq!(anomalies[0].severity, Severity::High);
    }

    #[test]
    fn test_medium_outlier() {
        let mut records: Vec<PaymentRecord> = (0..9)
            .map(|i| record(MemberId::new(), dec!(100), at(1) + Duration::days(i)))
            .collect();
        // mean = (900 + 500) / 10 = 140; 3x = 420 < 500 <= 5x = 700
        records.push(record(MemberId::new(), dec!(500), at(2)));

        let anomalies = AnomalyDetector::new(RIYADH).detect(&records);

        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].severity, Severity::Medium);
    }

    #[test]
    fn test_too_few_records_for_outliers() {
        let records = vec![
            record(MemberId::new(), dec!(1), at(1)),
            record(MemberId::new(), dec!(10_000), at(2)),
        ];

        assert!(AnomalyDetector::amount_outliers(&records).is_empty());
    }

    #[test]
    fn test_duplicate_same_local_day() {
        let member = MemberId::new();
        // 22:00 UTC Oct 4 and 08:00 UTC Oct 5 are both Oct 5 in Riyadh.
        let first = Utc.with_ymd_and_hms(2026, 10, 4, 22, 0, 0).unwrap();
        let records = vec![
            record(member, dec!(250), first),
            record(member, dec!(250.00), at(8)),
            record(member, dec!(250), at(8) + Duration::days(1)),
        ];

        let anomalies = AnomalyDetector::new(RIYADH).detect(&records);

        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::DuplicatePayment);
        assert_eq!(anomalies[0].date, at(8));
    }

    #[test]
    fn test_refund_is_low_and_sorted_last() {
        let member = MemberId::new();
        let mut refunded = record(MemberId::new(), dec!(50), at(1));
        refunded.status = PaymentStatus::Refunded;
        let records = vec![
            refunded,
            record(member, dec!(70), at(3)),
            record(member, dec!(70), at(4)),
        ];

        let anomalies = AnomalyDetector::new(RIYADH).detect(&records);

        let severities: Vec<Severity> = anomalies.iter().map(|a| a.severity).collect();
        assert_eq!(severities, vec![Severity::Medium, Severity::Low]);
    }

    #[test]
    fn test_recommendations_follow_kinds() {
        let mut refunded = record(MemberId::new(), dec!(50), at(1));
        refunded.status = PaymentStatus::Refunded;
        let anomalies = AnomalyDetector::new(RIYADH).detect(&[refunded]);

        let recommendations = recommendations_for(&anomalies);

        assert_eq!(recommendations.len(), 1);
        assert!(recommendations[0].contains("الاسترداد"));
        assert_eq!(recommendations_for(&[]).len(), 1);
    }
}
