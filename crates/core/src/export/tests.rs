use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use lopdf::Document;

use super::*;
use crate::period::{PeriodName, PeriodSpec};
use crate::reports::ReportError;
use crate::storage::{StorageConfig, StorageError, StorageProvider, StorageService};

#[derive(Default)]
struct RecordingAdapter {
    calls: Mutex<Vec<(String, String, usize)>>,
}

impl RecordingAdapter {
    fn calls(&self) -> Vec<(String, String, usize)> {
        self.calls.lock().expect("lock").clone()
    }
}

impl DeliveryAdapter for RecordingAdapter {
    async fn deliver(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        destination: &str,
    ) -> Result<String, StorageError> {
        self.calls.lock().expect("lock").push((
            destination.to_string(),
            content_type.to_string(),
            bytes.len(),
        ));
        Ok(format!("https://files.example.com/{destination}"))
    }
}

struct FailingAdapter;

impl DeliveryAdapter for FailingAdapter {
    async fn deliver(
        &self,
        _bytes: Vec<u8>,
        _content_type: &str,
        _destination: &str,
    ) -> Result<String, StorageError> {
        Err(StorageError::operation("bucket unreachable"))
    }
}

const SNAPSHOT: &str = r#"[
    {
        "id": "0192a6f0-0000-7000-8000-000000000001",
        "amount": "250.00",
        "status": "paid",
        "category": "subscription",
        "method": "bank_transfer",
        "created_at": "2026-10-05T10:00:00Z",
        "member_id": "0192a6f0-0000-7000-8000-0000000000a1",
        "member_name": "سارة"
    },
    {
        "id": "0192a6f0-0000-7000-8000-000000000002",
        "amount": 100,
        "status": "pending",
        "category": "donation",
        "created_at": "2026-10-06T10:00:00Z",
        "due_date": "2026-08-01T00:00:00Z",
        "member_id": "0192a6f0-0000-7000-8000-0000000000a2",
        "member_name": "خالد"
    },
    {
        "id": "0192a6f0-0000-7000-8000-000000000003",
        "amount": "abc",
        "status": "paid",
        "created_at": "2026-10-07T10:00:00Z",
        "member_id": "0192a6f0-0000-7000-8000-0000000000a1",
        "member_name": "سارة"
    },
    {
        "id": "0192a6f0-0000-7000-8000-000000000004",
        "amount": 80,
        "status": "paid",
        "created_at": "not a date",
        "member_id": "0192a6f0-0000-7000-8000-0000000000a2",
        "member_name": "خالد"
    }
]"#;

fn snapshot() -> RecordSnapshot {
    RecordSnapshot::from_json(SNAPSHOT).expect("valid json")
}

fn options() -> ReportOptions {
    ReportOptions {
        period: PeriodSpec::Named(PeriodName::Month),
        as_of: Some(Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap()),
        ..ReportOptions::default()
    }
}

#[tokio::test]
async fn test_export_delivers_exactly_once() {
    let pipeline = ExportPipeline::new(FormatConfig::default(), RecordingAdapter::default());

    let outcome = pipeline
        .export(&snapshot(), "financial", "pdf", &options())
        .await
        .expect("export should succeed");

    let calls = pipeline.delivery().calls();
    assert_eq!(calls.len(), 1);

    let (destination, content_type, size) = &calls[0];
    assert_eq!(
        *destination,
        format!("reports/{}", outcome.artifact.suggested_file_name)
    );
    assert_eq!(content_type, "application/pdf");
    assert_eq!(*size, outcome.artifact.bytes.len());
    assert_eq!(outcome.url, format!("https://files.example.com/{destination}"));

    let doc = Document::load_mem(&outcome.artifact.bytes).expect("valid pdf");
    assert!(!doc.get_pages().is_empty());
}

#[tokio::test]
async fn test_export_resolves_named_period_from_as_of() {
    let pipeline = ExportPipeline::new(FormatConfig::default(), RecordingAdapter::default());

    let outcome = pipeline
        .export(&snapshot(), "general", "xlsx", &options())
        .await
        .expect("export should succeed");

    // Calendar month in Riyadh: 2026-10-01 00:00 +03:00.
    assert_eq!(
        outcome.report.period.start(),
        Utc.with_ymd_and_hms(2026, 9, 30, 21, 0, 0).unwrap()
    );
    assert_eq!(outcome.report.summary.total_count, 3);
    assert!(outcome.artifact.suggested_file_name.starts_with("general-report-"));
    assert!(outcome.artifact.suggested_file_name.ends_with(".xlsx"));
}

#[tokio::test]
async fn test_export_counts_ingestion_warnings() {
    let pipeline = ExportPipeline::new(FormatConfig::default(), RecordingAdapter::default());

    let outcome = pipeline
        .export(&snapshot(), "general", "pdf", &options())
        .await
        .expect("export should succeed");

    // Non-numeric amount coerced, unparsable timestamp skipped.
    assert_eq!(outcome.warning_count(), 2);
}

#[tokio::test]
async fn test_unsupported_format_rejected_before_delivery() {
    let pipeline = ExportPipeline::new(FormatConfig::default(), RecordingAdapter::default());

    let err = pipeline
        .export(&snapshot(), "financial", "csv", &options())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ExportErrorKind::Validation);
    assert!(matches!(
        err,
        ExportError::Validation(ReportError::UnsupportedFormat(ref f)) if f == "csv"
    ));
    assert!(pipeline.delivery().calls().is_empty());
}

#[tokio::test]
async fn test_invalid_custom_range_rejected() {
    let pipeline = ExportPipeline::new(FormatConfig::default(), RecordingAdapter::default());
    let options = ReportOptions {
        period: PeriodSpec::Custom {
            start: Utc.with_ymd_and_hms(2026, 10, 10, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
        },
        ..options()
    };

    let err = pipeline
        .export(&snapshot(), "general", "pdf", &options)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ExportError::Validation(ReportError::InvalidDateRange { .. })
    ));
    assert!(pipeline.delivery().calls().is_empty());
}

#[tokio::test]
async fn test_too_many_records_rejected() {
    let pipeline = ExportPipeline::new(FormatConfig::default(), RecordingAdapter::default());
    let options = ReportOptions {
        max_records: Some(2),
        ..options()
    };

    let err = pipeline
        .export(&snapshot(), "general", "pdf", &options)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ExportError::Validation(ReportError::TooManyRecords { count: 3, limit: 2 })
    ));
}

#[tokio::test]
async fn test_forensic_export_detects_anomalies() {
    let pipeline = ExportPipeline::new(FormatConfig::default(), RecordingAdapter::default());

    let outcome = pipeline
        .export(&snapshot(), "forensic", "xlsx", &options())
        .await
        .expect("export should succeed");

    assert!(outcome.report.anomalies.is_some());
    assert!(!outcome.report.recommendations.is_empty());
}

#[tokio::test]
async fn test_financial_export_carries_chart_series() {
    let pipeline = ExportPipeline::new(FormatConfig::default(), RecordingAdapter::default());

    let outcome = pipeline
        .export(&snapshot(), "financial", "xlsx", &options())
        .await
        .expect("export should succeed");

    let series = outcome.report.chart_series.expect("chart series");
    assert_eq!(series.points.len(), 1);
    assert_eq!(series.points[0].label, "2026-10");
}

#[tokio::test]
async fn test_delivery_error_propagates() {
    let pipeline = ExportPipeline::new(FormatConfig::default(), FailingAdapter);

    let err = pipeline
        .export(&snapshot(), "member", "pdf", &options())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ExportErrorKind::Delivery);
    assert!(matches!(err, ExportError::Delivery(StorageError::Operation(_))));
}

#[tokio::test]
async fn test_export_to_local_storage() {
    let dir = tempfile::tempdir().expect("temp dir");
    let storage = StorageService::from_config(StorageConfig::new(StorageProvider::local_fs(
        dir.path(),
    )))
    .expect("storage");
    let pipeline = ExportPipeline::new(FormatConfig::default(), storage);

    let outcome = pipeline
        .export(&snapshot(), "member", "xlsx", &options())
        .await
        .expect("export should succeed");

    assert!(outcome.url.starts_with("file://"));
    let stored = std::fs::read(
        dir.path()
            .join("reports")
            .join(&outcome.artifact.suggested_file_name),
    )
    .expect("artifact written");
    assert_eq!(stored, outcome.artifact.bytes);
}
