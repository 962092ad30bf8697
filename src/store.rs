//! Write-through annotation of flagged line items.
//!
//! The line-item store is an external collaborator (a hosted database in
//! the full application). Annotation runs as its own phase after the pure
//! validation pass, is best-effort per item, and never fails the run: a
//! failed write becomes a failed `AnnotateOutcome` for the caller to log.

use crate::error::StoreError;
use crate::models::{FlagKind, Severity, ValidationResult};
use std::sync::Mutex;

#[derive(Debug, Clone)]
/// Flag metadata written back onto a persisted line item.
pub struct FlagAnnotation {
    pub flag_type: FlagKind,
    pub flag_severity: Severity,
    pub flag_explanation: String,
}

/// External persistence for line-item flag metadata, keyed by bill id and
/// code.
pub trait LineItemStore {
    fn update_line_item_flag(
        &self,
        bill_id: &str,
        code: &str,
        annotation: &FlagAnnotation,
    ) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
/// Result of one annotation write.
pub struct AnnotateOutcome {
    pub code: String,
    pub ok: bool,
    pub detail: Option<String>,
}

/// Annotate every overcharged line item on the store.
///
/// Failures are collected, not propagated; the validation result already
/// carries the flags regardless of what the store does.
pub fn annotate_line_items(
    store: &dyn LineItemStore,
    bill_id: &str,
    result: &ValidationResult,
) -> Vec<AnnotateOutcome> {
    result
        .overcharges
        .iter()
        .map(|over| {
            let annotation = FlagAnnotation {
                flag_type: FlagKind::Overcharge,
                flag_severity: FlagKind::Overcharge.severity(),
                flag_explanation: format!(
                    "charged ${:.2} against a ${:.2} benchmark ({}% above)",
                    over.charged, over.benchmark, over.percent_over
                ),
            };
            match store.update_line_item_flag(bill_id, &over.code, &annotation) {
                Ok(()) => AnnotateOutcome {
                    code: over.code.clone(),
                    ok: true,
                    detail: None,
                },
                Err(e) => AnnotateOutcome {
                    code: over.code.clone(),
                    ok: false,
                    detail: Some(e.to_string()),
                },
            }
        })
        .collect()
}

#[derive(Debug, Default)]
/// In-memory store, used as a test double and reference implementation.
pub struct MemoryStore {
    pub written: Mutex<Vec<(String, String, FlagAnnotation)>>,
    /// Codes whose writes should fail, for exercising the best-effort path.
    pub fail_codes: Vec<String>,
}

impl LineItemStore for MemoryStore {
    fn update_line_item_flag(
        &self,
        bill_id: &str,
        code: &str,
        annotation: &FlagAnnotation,
    ) -> Result<(), StoreError> {
        if self.fail_codes.iter().any(|c| c == code) {
            return Err(StoreError(format!("write rejected for {}", code)));
        }
        self.written.lock().expect("store mutex poisoned").push((
            bill_id.to_string(),
            code.to_string(),
            annotation.clone(),
        ));
        Ok(())
    }
}
