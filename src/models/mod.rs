//! Shared data models for validation output and bill/table inputs.

pub mod bill;
pub mod tables;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
/// Severity attached to a flag.
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// Kind of billing issue a flag reports.
pub enum FlagKind {
    Duplicate,
    InvalidCode,
    Overcharge,
}

impl FlagKind {
    /// Fixed severity per kind.
    pub fn severity(self) -> Severity {
        match self {
            FlagKind::Duplicate | FlagKind::Overcharge => Severity::High,
            FlagKind::InvalidCode => Severity::Medium,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
/// A single detected billing issue.
pub struct Flag {
    #[serde(rename = "type")]
    pub kind: FlagKind,
    pub severity: Severity,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_savings: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
/// A group of line items billed for the same service.
///
/// `codes` lists the distinct normalized codes in the group; more than one
/// entry means the group was joined through an equivalence set.
pub struct DuplicateGroup {
    pub key: String,
    pub codes: Vec<String>,
    pub description: String,
    pub occurrences: usize,
    pub potential_savings: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
/// A charge above the benchmark price for its procedure code.
pub struct Overcharge {
    pub code: String,
    pub description: String,
    pub charged: f64,
    pub benchmark: f64,
    pub percent_over: i64,
    pub potential_savings: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
/// A code that failed validation for its declared type.
pub struct InvalidCode {
    pub code: String,
    pub code_type: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
/// Flag counts by severity plus the number of line items scanned.
pub struct Summary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub items: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
/// Aggregate output of one validation pass over one bill.
///
/// `total_issues` always equals `flags.len()`, and each detail entry in
/// `duplicates`/`overcharges`/`invalid_codes` corresponds to exactly one
/// flag of the matching kind. `potential_savings` is summed from the
/// detail lists, never re-derived from `flags`.
pub struct ValidationResult {
    pub bill_id: String,
    pub flags: Vec<Flag>,
    pub duplicates: Vec<DuplicateGroup>,
    pub overcharges: Vec<Overcharge>,
    pub invalid_codes: Vec<InvalidCode>,
    pub total_issues: usize,
    pub potential_savings: f64,
    pub summary: Summary,
}
