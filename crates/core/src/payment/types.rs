//! Payment record types.

use chrono::{DateTime, Utc};
use rasid_shared::types::{MemberId, PaymentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category key used when a record carries none.
pub const OTHER_CATEGORY: &str = "other";

/// Lifecycle status of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting payment or verification.
    Pending,
    /// Settled.
    Paid,
    /// Attempted and rejected.
    Failed,
    /// Withdrawn before settlement.
    Cancelled,
    /// Settled and returned.
    Refunded,
}

impl PaymentStatus {
    /// Stable lowercase key used in breakdowns and label lookup.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }

    /// Returns true if a record with this status is still awaiting payment.
    ///
    /// A failed attempt is not outstanding on its own; the retry is a new
    /// pending record.
    #[must_use]
    pub const fn is_outstanding(self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "pending_payment" | "pending_verification" => Ok(Self::Pending),
            "paid" | "completed" | "approved" => Ok(Self::Paid),
            "failed" | "rejected" => Ok(Self::Failed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            _ => Err(format!("Unknown payment status: {s}")),
        }
    }
}

/// A single payment, read-only once ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Payment ID.
    pub id: PaymentId,
    /// Non-negative amount, full precision.
    pub amount: Decimal,
    /// Payment status.
    pub status: PaymentStatus,
    /// Classification key (`"other"` when absent upstream).
    pub category: String,
    /// Payment method, if known.
    pub method: Option<String>,
    /// When the payment was recorded.
    pub created_at: DateTime<Utc>,
    /// When the payment falls due, if it has a due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Paying member.
    pub member_id: MemberId,
    /// Paying member's display name.
    pub member_name: String,
    /// Human-facing reference number.
    pub reference_number: Option<String>,
}

impl PaymentRecord {
    /// Returns true if `created_at` falls in `[start, end)`.
    #[must_use]
    pub fn created_within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.created_at >= start && self.created_at < end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("paid", PaymentStatus::Paid)]
    #[case("completed", PaymentStatus::Paid)]
    #[case("approved", PaymentStatus::Paid)]
    #[case("PENDING", PaymentStatus::Pending)]
    #[case("pending_verification", PaymentStatus::Pending)]
    #[case("rejected", PaymentStatus::Failed)]
    #[case("canceled", PaymentStatus::Cancelled)]
    #[case("refunded", PaymentStatus::Refunded)]
    fn test_status_from_str(#[case] input: &str, #[case] expected: PaymentStatus) {
        assert_eq!(PaymentStatus::from_str(input).unwrap(), expected);
    }

    #[test]
    fn test_status_from_str_unknown() {
        assert!(PaymentStatus::from_str("on_hold").is_err());
    }

    #[test]
    fn test_outstanding_statuses() {
        assert!(PaymentStatus::Pending.is_outstanding());
        assert!(!PaymentStatus::Failed.is_outstanding());
        assert!(!PaymentStatus::Paid.is_outstanding());
        assert!(!PaymentStatus::Cancelled.is_outstanding());
        assert!(!PaymentStatus::Refunded.is_outstanding());
    }
}
