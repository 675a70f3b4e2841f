//! Loosely-typed record ingestion.
//!
//! Defaulting rules:
//! - missing or non-numeric amount → 0 (warning)
//! - negative amount → 0 (warning)
//! - amount above 10^15 → 0 (warning)
//! - missing or unknown status → pending (warning)
//! - missing category → `"other"`
//! - empty method → none
//! - missing or invalid id / member id → nil UUID (warning)
//! - invalid due date → none (warning)
//! - missing or invalid `created_at` → record skipped (warning)

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rasid_shared::types::{MemberId, PaymentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::types::{OTHER_CATEGORY, PaymentRecord, PaymentStatus};

/// Largest accepted amount, in whole currency units.
const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000_000;

/// A record as received from upstream storage.
///
/// Accepts both snake_case and camelCase field names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPaymentRecord {
    /// Payment ID (UUID text).
    #[serde(default)]
    pub id: Option<String>,
    /// Amount as a JSON number or numeric string.
    #[serde(default)]
    pub amount: Option<Value>,
    /// Status text.
    #[serde(default, alias = "payment_status")]
    pub status: Option<String>,
    /// Category key.
    #[serde(default)]
    pub category: Option<String>,
    /// Payment method.
    #[serde(default, alias = "payment_method")]
    pub method: Option<String>,
    /// Creation timestamp (RFC 3339, naive ISO 8601, or a plain date).
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    /// Due date in the same formats as `created_at`.
    #[serde(default, alias = "dueDate")]
    pub due_date: Option<String>,
    /// Paying member ID (UUID text).
    #[serde(default, alias = "memberId")]
    pub member_id: Option<String>,
    /// Paying member's name.
    #[serde(default, alias = "memberName")]
    pub member_name: Option<String>,
    /// Reference number.
    #[serde(default, alias = "referenceNumber")]
    pub reference_number: Option<String>,
}

/// A field that was coerced or a record that was dropped during ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestWarning {
    /// Position of the record in the input.
    pub index: usize,
    /// Name of the offending field.
    pub field: String,
    /// What was wrong and what was done about it.
    pub message: String,
}

/// An immutable, normalized snapshot of payment records.
#[derive(Debug, Clone, Default)]
pub struct RecordSnapshot {
    records: Vec<PaymentRecord>,
    warnings: Vec<IngestWarning>,
}

impl RecordSnapshot {
    /// Wraps already typed records.
    #[must_use]
    pub fn new(records: Vec<PaymentRecord>) -> Self {
        Self {
            records,
            warnings: Vec::new(),
        }
    }

    /// Normalizes raw records, collecting a warning per coercion.
    #[must_use]
    pub fn from_raw(raw: Vec<RawPaymentRecord>) -> Self {
        let mut records = Vec::with_capacity(raw.len());
        let mut warnings = Vec::new();

        for (index, record) in raw.into_iter().enumerate() {
            let mut ctx = Normalizer {
                index,
                warnings: &mut warnings,
            };
            if let Some(record) = ctx.normalize(record) {
                records.push(record);
            }
        }

        Self { records, warnings }
    }

    /// Parses a JSON array of raw records.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: Vec<RawPaymentRecord> = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    /// Normalized records.
    #[must_use]
    pub fn records(&self) -> &[PaymentRecord] {
        &self.records
    }

    /// Ingestion warnings.
    #[must_use]
    pub fn warnings(&self) -> &[IngestWarning] {
        &self.warnings
    }

    /// Number of normalized records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no record survived ingestion.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

struct Normalizer<'a> {
    index: usize,
    warnings: &'a mut Vec<IngestWarning>,
}

impl Normalizer<'_> {
    fn warn(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        warn!(index = self.index, field, %message, "coerced payment record field");
        self.warnings.push(IngestWarning {
            index: self.index,
            field: field.to_string(),
            message,
        });
    }

    fn normalize(&mut self, raw: RawPaymentRecord) -> Option<PaymentRecord> {
        let Some(created_at) = raw.created_at.as_deref().and_then(parse_timestamp) else {
            self.warn("created_at", "missing or invalid timestamp; record skipped");
            return None;
        };

        let amount = self.amount(raw.amount.as_ref());
        let status = self.status(raw.status.as_deref());

        let id = match raw.id.as_deref().map(PaymentId::from_str) {
            Some(Ok(id)) => id,
            _ => {
                self.warn("id", "missing or invalid payment id; using nil id");
                PaymentId::nil()
            }
        };
        let member_id = match raw.member_id.as_deref().map(MemberId::from_str) {
            Some(Ok(id)) => id,
            _ => {
                self.warn("member_id", "missing or invalid member id; using nil id");
                MemberId::nil()
            }
        };

        let due_date = match raw.due_date.as_deref().filter(|s| !s.trim().is_empty()) {
            None => None,
            Some(text) => {
                let parsed = parse_timestamp(text);
                if parsed.is_none() {
                    self.warn("due_date", format!("invalid due date '{text}'; ignored"));
                }
                parsed
            }
        };

        Some(PaymentRecord {
            id,
            amount,
            status,
            category: non_empty(raw.category).unwrap_or_else(|| OTHER_CATEGORY.to_string()),
            method: non_empty(raw.method),
            created_at,
            due_date,
            member_id,
            member_name: non_empty(raw.member_name).unwrap_or_default(),
            reference_number: non_empty(raw.reference_number),
        })
    }

    fn amount(&mut self, value: Option<&Value>) -> Decimal {
        let parsed = match value {
            Some(Value::Number(n)) => parse_decimal(&n.to_string()),
            Some(Value::String(s)) => parse_decimal(s.trim()),
            _ => None,
        };

        match parsed {
            Some(amount) if amount.is_sign_negative() && !amount.is_zero() => {
                self.warn("amount", format!("negative amount {amount}; using 0"));
                Decimal::ZERO
            }
            Some(amount) if amount > Decimal::new(MAX_AMOUNT_UNITS, 0) => {
                self.warn("amount", format!("amount {amount} exceeds {MAX_AMOUNT_UNITS}; using 0"));
                Decimal::ZERO
            }
            Some(amount) => amount,
            None => {
                self.warn("amount", "missing or non-numeric amount; using 0");
                Decimal::ZERO
            }
        }
    }

    fn status(&mut self, value: Option<&str>) -> PaymentStatus {
        match value.map(PaymentStatus::from_str) {
            Some(Ok(status)) => status,
            Some(Err(err)) => {
                self.warn("status", format!("{err}; using pending"));
                PaymentStatus::Pending
            }
            None => {
                self.warn("status", "missing status; using pending");
                PaymentStatus::Pending
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const MEMBER: &str = "6ba7b811-9dad-11d1-80b4-00c04fd430c8";
    const PAYMENT: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn test_well_formed_record_has_no_warnings() {
        let json = format!(
            r#"[{{
                "id": "{PAYMENT}",
                "amount": 150.75,
                "status": "paid",
                "category": "subscription",
                "method": "bank_transfer",
                "createdAt": "2026-10-01T08:00:00Z",
                "memberId": "{MEMBER}",
                "memberName": "سالم"
            }}]"#
        );

        let snapshot = RecordSnapshot::from_json(&json).expect("valid json");

        assert!(snapshot.warnings().is_empty());
        let record = &snapshot.records()[0];
        assert_eq!(record.amount, dec!(150.75));
        assert_eq!(record.status, PaymentStatus::Paid);
        assert_eq!(record.method.as_deref(), Some("bank_transfer"));
        assert_eq!(record.member_id.to_string(), MEMBER);
    }

    #[test]
    fn test_snake_case_aliases() {
        let json = format!(
            r#"[{{
                "id": "{PAYMENT}",
                "amount": "20",
                "payment_status": "completed",
                "payment_method": "app_payment",
                "created_at": "2026-10-01",
                "member_id": "{MEMBER}"
            }}]"#
        );

        let snapshot = RecordSnapshot::from_json(&json).expect("valid json");

        assert!(snapshot.warnings().is_empty());
        let record = &snapshot.records()[0];
        assert_eq!(record.status, PaymentStatus::Paid);
        assert_eq!(record.method.as_deref(), Some("app_payment"));
        assert_eq!(record.category, OTHER_CATEGORY);
    }

    #[test]
    fn test_malformed_fields_are_coerced_with_warnings() {
        let raw = RawPaymentRecord {
            id: Some(PAYMENT.to_string()),
            amount: Some(Value::String("abc".to_string())),
            status: Some("on_hold".to_string()),
            created_at: Some("2026-10-01T08:00:00Z".to_string()),
            member_id: Some(MEMBER.to_string()),
            due_date: Some("not a date".to_string()),
            ..RawPaymentRecord::default()
        };

        let snapshot = RecordSnapshot::from_raw(vec![raw]);

        assert_eq!(snapshot.len(), 1);
        let record = &snapshot.records()[0];
        assert_eq!(record.amount, Decimal::ZERO);
        assert_eq!(record.status, PaymentStatus::Pending);
        assert!(record.due_date.is_none());

        let fields: Vec<&str> = snapshot.warnings().iter().map(|w| w.field.as_str()).collect();
        assert_eq!(fields, vec!["amount", "status", "due_date"]);
    }

    #[test]
    fn test_negative_amount_is_zeroed() {
        let raw = RawPaymentRecord {
            id: Some(PAYMENT.to_string()),
            amount: Some(serde_json::json!(-40)),
            status: Some("paid".to_string()),
            created_at: Some("2026-10-01T08:00:00Z".to_string()),
            member_id: Some(MEMBER.to_string()),
            ..RawPaymentRecord::default()
        };

        let snapshot = RecordSnapshot::from_raw(vec![raw]);

        assert_eq!(snapshot.records()[0].amount, Decimal::ZERO);
        assert_eq!(snapshot.warnings().len(), 1);
    }

    #[test]
    fn test_amount_above_limit_is_zeroed() {
        let json = format!(
            r#"[
                {{"amount": "79228162514264337593543950335", "status": "paid", "createdAt": "2026-10-01", "memberId": "{MEMBER}"}},
                {{"amount": "1000000000000000", "status": "paid", "createdAt": "2026-10-01", "memberId": "{MEMBER}"}}
            ]"#
        );

        let snapshot = RecordSnapshot::from_json(&json).expect("valid json");

        assert_eq!(snapshot.records()[0].amount, Decimal::ZERO);
        assert_eq!(snapshot.records()[1].amount, dec!(1000000000000000));
        let amount_warnings: Vec<usize> = snapshot
            .warnings()
            .iter()
            .filter(|w| w.field == "amount")
            .map(|w| w.index)
            .collect();
        assert_eq!(amount_warnings, vec![0]);
    }

    #[test]
    fn test_record_without_timestamp_is_skipped() {
        let raw = RawPaymentRecord {
            amount: Some(serde_json::json!(10)),
            status: Some("paid".to_string()),
            ..RawPaymentRecord::default()
        };

        let snapshot = RecordSnapshot::from_raw(vec![raw]);

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.warnings().len(), 1);
        assert_eq!(snapshot.warnings()[0].field, "created_at");
    }

    #[test]
    fn test_timestamp_formats() {
        assert!(parse_timestamp("2026-10-01T08:00:00+03:00").is_some());
        assert!(parse_timestamp("2026-10-01T08:00:00.250").is_some());
        assert!(parse_timestamp("2026-10-01 08:00:00").is_some());
        assert!(parse_timestamp("2026-10-01").is_some());
        assert!(parse_timestamp("01/10/2026").is_none());
    }
}
