//! Per-variant document layouts.
//!
//! A layout turns a [`Report`] into a target-neutral [`DocumentHeader`] and a
//! list of [`Block`]s. Every string in the output is already formatted and
//! localized; the page-flow and workbook writers only place it.

use rust_decimal::Decimal;

use super::types::ReportType;
use crate::formatting::{
    FormatConfig, NOT_AVAILABLE, NOT_SPECIFIED, approximate_hijri_date, format_currency,
    format_gregorian_date, format_long_date, round_money, translate_severity, translate_status,
};
use crate::reports::{Report, Severity};
use crate::trend::{TrendDirection, TrendMetric};

/// Title block drawn once at the top of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHeader {
    /// Document title.
    pub title: String,
    /// Organization name.
    pub subtitle: String,
    /// `التاريخ الهجري: ...`
    pub hijri_line: String,
    /// `التاريخ الميلادي: ...`
    pub gregorian_line: String,
}

/// Closing lines drawn after the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFooter {
    /// Attribution line.
    pub generated_by: String,
    /// Generation date line.
    pub generated_on: String,
}

/// A table with a fixed logical column order.
///
/// The first logical column is the rightmost one on a right-to-left page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Section title drawn above the table.
    pub title: String,
    /// Column headers in logical order.
    pub columns: Vec<String>,
    /// Cell text, one inner vector per row.
    pub rows: Vec<Vec<String>>,
}

/// One anomaly prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnomalyRow {
    /// Description.
    pub description: String,
    /// Details.
    pub details: String,
    /// Severity, used by writers for color-coding.
    pub severity: Severity,
    /// Translated severity.
    pub severity_label: String,
    /// Formatted date.
    pub date: String,
}

/// A body element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Section heading.
    Heading(String),
    /// `label: value` line.
    Line {
        /// Label.
        label: String,
        /// Value.
        value: String,
    },
    /// Tabular data.
    Table(Table),
    /// Detected anomalies.
    Anomalies(Vec<AnomalyRow>),
    /// Numbered recommendations.
    Recommendations(Vec<String>),
}

/// A document variant.
pub trait ReportLayout: Sync {
    /// Variant this layout renders.
    fn report_type(&self) -> ReportType;

    /// Title, subtitle and bilingual date stamp.
    fn render_header(&self, report: &Report, config: &FormatConfig) -> DocumentHeader {
        let hijri = approximate_hijri_date(report.generated_at, config).to_string();
        let gregorian = format_gregorian_date(report.generated_at, config);
        DocumentHeader {
            title: self.report_type().title().to_string(),
            subtitle: config.organization.clone(),
            hijri_line: config.localize(&format!("التاريخ الهجري: {hijri}")),
            gregorian_line: config.localize(&format!("التاريخ الميلادي: {gregorian}")),
        }
    }

    /// Ordered body blocks.
    fn render_body(&self, report: &Report, config: &FormatConfig) -> Vec<Block>;

    /// Attribution and generation date.
    fn render_footer(&self, report: &Report, config: &FormatConfig) -> DocumentFooter {
        DocumentFooter {
            generated_by: format!("تم إنشاء هذا التقرير بواسطة {}", config.organization),
            generated_on: config.localize(&format!(
                "تاريخ الإنشاء: {}",
                format_long_date(report.generated_at, config)
            )),
        }
    }
}

/// Selects the layout for a report type.
#[must_use]
pub fn layout_for(report_type: ReportType) -> &'static dyn ReportLayout {
    match report_type {
        ReportType::Financial => &FinancialLayout,
        ReportType::Forensic => &ForensicLayout,
        ReportType::Member => &MemberLayout,
        ReportType::General => &GeneralLayout,
    }
}

/// Summary, payments, breakdowns and trends.
#[derive(Debug, Clone, Copy)]
pub struct FinancialLayout;

/// Anomalies, recommendations and overdue ages.
#[derive(Debug, Clone, Copy)]
pub struct ForensicLayout;

/// Ranked member contributions.
#[derive(Debug, Clone, Copy)]
pub struct MemberLayout;

/// Title and summary only.
#[derive(Debug, Clone, Copy)]
pub struct GeneralLayout;

impl ReportLayout for FinancialLayout {
    fn report_type(&self) -> ReportType {
        ReportType::Financial
    }

    fn render_body(&self, report: &Report, config: &FormatConfig) -> Vec<Block> {
        let fmt = Fmt(config);
        let mut blocks = vec![Block::Heading("ملخص مالي".to_string())];
        blocks.extend(summary_lines(report, fmt));

        if !report.payments.is_empty() {
            blocks.push(Block::Table(Table {
                title: "تفاصيل المدفوعات".to_string(),
                columns: columns(&["الرقم المرجعي", "التاريخ", "طريقة الدفع", "الحالة", "المبلغ"]),
                rows: report
                    .payments
                    .iter()
                    .map(|payment| {
                        vec![
                            payment
                                .reference_number
                                .clone()
                                .unwrap_or_else(|| payment.id.to_string()),
                            fmt.date(payment.created_at),
                            payment
                                .method
                                .clone()
                                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
                            translate_status(payment.status.as_str()).into_owned(),
                            fmt.money(payment.amount),
                        ]
                    })
                    .collect(),
            }));
        }

        for (title, breakdown, key_is_status) in [
            ("توزيع المدفوعات حسب الفئة", &report.breakdowns.category, false),
            ("توزيع المدفوعات حسب طريقة الدفع", &report.breakdowns.method, false),
            ("توزيع المدفوعات حسب الحالة", &report.breakdowns.status, true),
        ] {
            if breakdown.is_empty() {
                continue;
            }
            blocks.push(Block::Table(Table {
                title: title.to_string(),
                columns: columns(&["البند", "العدد", "المبلغ", "النسبة"]),
                rows: breakdown
                    .buckets()
                    .iter()
                    .map(|bucket| {
                        let key = if key_is_status {
                            translate_status(&bucket.key).into_owned()
                        } else {
                            bucket.key.clone()
                        };
                        vec![
                            key,
                            fmt.count(bucket.count),
                            fmt.money(bucket.total_amount),
                            fmt.percent(bucket.percentage_of_total),
                        ]
                    })
                    .collect(),
            }));
        }

        if let Some(trends) = &report.trends {
            blocks.push(Block::Heading("مقارنة بالفترة السابقة".to_string()));
            blocks.push(fmt.trend_line("الإيرادات", &trends.revenue));
            blocks.push(fmt.trend_line("عدد المعاملات", &trends.volume));
            blocks.push(fmt.trend_line("متوسط الدفعة", &trends.average_payment));
            for category in &trends.categories {
                blocks.push(fmt.trend_line(&category.key, &category.metric));
            }
        }

        blocks
    }
}

impl ReportLayout for ForensicLayout {
    fn report_type(&self) -> ReportType {
        ReportType::Forensic
    }

    fn render_body(&self, report: &Report, config: &FormatConfig) -> Vec<Block> {
        let fmt = Fmt(config);
        let anomalies = report.anomalies.as_deref().unwrap_or_default();

        let mut blocks = vec![Block::Heading("ملخص التحليل".to_string())];
        blocks.extend(summary_lines(report, fmt));
        blocks.push(fmt.line("عدد الحالات الشاذة", fmt.count(anomalies.len())));

        if !anomalies.is_empty() {
            blocks.push(Block::Anomalies(
                anomalies
                    .iter()
                    .map(|anomaly| AnomalyRow {
                        description: anomaly.description.clone(),
                        details: if anomaly.details.is_empty() {
                            NOT_AVAILABLE.to_string()
                        } else {
                            config.localize(&anomaly.details)
                        },
                        severity: anomaly.severity,
                        severity_label: translate_severity(anomaly.severity.as_str()).into_owned(),
                        date: fmt.date(anomaly.date),
                    })
                    .collect(),
            ));
        }

        if !report.recommendations.is_empty() {
            blocks.push(Block::Recommendations(report.recommendations.clone()));
        }

        if let Some(overdue) = &report.overdue {
            blocks.push(Block::Table(Table {
                title: "المدفوعات المتأخرة".to_string(),
                columns: columns(&["مدة التأخير", "العدد", "المبلغ"]),
                rows: overdue
                    .buckets
                    .iter()
                    .map(|bucket| {
                        vec![
                            config.localize(bucket.band.label()),
                            fmt.count(bucket.count),
                            fmt.money(bucket.total_amount),
                        ]
                    })
                    .collect(),
            }));
        }

        blocks
    }
}

impl ReportLayout for MemberLayout {
    fn report_type(&self) -> ReportType {
        ReportType::Member
    }

    fn render_body(&self, report: &Report, config: &FormatConfig) -> Vec<Block> {
        let fmt = Fmt(config);
        let mut blocks = vec![Block::Heading("مساهمات الأعضاء".to_string())];

        let Some(members) = &report.member_contributions else {
            blocks.push(fmt.line("عدد المساهمين", fmt.count(0)));
            return blocks;
        };

        blocks.push(fmt.line("عدد المساهمين", fmt.count(members.contributor_count)));
        blocks.push(fmt.line("إجمالي المساهمات", fmt.money(members.grand_total)));

        if !members.top.is_empty() {
            blocks.push(Block::Table(Table {
                title: "ترتيب الأعضاء حسب المساهمة".to_string(),
                columns: columns(&["الترتيب", "الاسم", "عدد المدفوعات", "الإجمالي", "آخر دفعة"]),
                rows: members
                    .top
                    .iter()
                    .map(|member| {
                        vec![
                            fmt.count(member.rank),
                            if member.member_name.is_empty() {
                                NOT_SPECIFIED.to_string()
                            } else {
                                member.member_name.clone()
                            },
                            fmt.count(member.payment_count),
                            fmt.money(member.total_amount),
                            fmt.date(member.last_payment_at),
                        ]
                    })
                    .collect(),
            }));
        }

        blocks
    }
}

impl ReportLayout for GeneralLayout {
    fn report_type(&self) -> ReportType {
        ReportType::General
    }

    fn render_body(&self, report: &Report, config: &FormatConfig) -> Vec<Block> {
        let mut blocks = vec![Block::Heading("تقرير عام".to_string())];
        blocks.extend(summary_lines(report, Fmt(config)));
        blocks
    }
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

fn summary_lines(report: &Report, fmt: Fmt<'_>) -> Vec<Block> {
    let summary = &report.summary;
    vec![
        fmt.line("إجمالي المدفوعات", fmt.money(summary.total_amount)),
        fmt.line("المدفوعات المكتملة", fmt.money(summary.paid_amount)),
        fmt.line("المدفوعات المعلقة", fmt.money(summary.pending_amount)),
        fmt.line("عدد المعاملات", fmt.count(summary.total_count)),
        fmt.line("نسبة النجاح", fmt.percent(summary.success_rate)),
        fmt.line("متوسط الدفعة", fmt.money(summary.average_payment)),
    ]
}

const fn direction_label(direction: TrendDirection) -> &'static str {
    match direction {
        TrendDirection::Up => "ارتفاع",
        TrendDirection::Down => "انخفاض",
        TrendDirection::Stable => "مستقر",
    }
}

#[derive(Clone, Copy)]
struct Fmt<'a>(&'a FormatConfig);

impl Fmt<'_> {
    fn money(self, amount: Decimal) -> String {
        self.0.localize(&format_currency(amount, self.0))
    }

    fn count(self, count: usize) -> String {
        self.0.localize(&count.to_string())
    }

    fn percent(self, value: Decimal) -> String {
        let mut rounded = round_money(value);
        rounded.rescale(2);
        self.0.localize(&format!("{rounded}%"))
    }

    fn date(self, at: chrono::DateTime<chrono::Utc>) -> String {
        self.0.localize(&format_gregorian_date(at, self.0))
    }

    fn line(self, label: &str, value: String) -> Block {
        Block::Line {
            label: label.to_string(),
            value,
        }
    }

    fn trend_line(self, label: &str, metric: &TrendMetric) -> Block {
        self.line(
            label,
            format!(
                "{} ({})",
                self.percent(metric.percentage_change),
                direction_label(metric.direction)
            ),
        )
    }
}
