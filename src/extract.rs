//! Boundary for producing a structured bill from raw extracted text.
//!
//! Upstream, an OCR pass and a text-to-structured-data step (hosted model
//! APIs) turn an uploaded bill into the JSON shape consumed here. The
//! validator depends only on this capability, never on a specific
//! provider's response format.

use crate::error::BillError;
use crate::models::bill::StructuredBill;
use std::fs;
use std::path::Path;

/// Anything that can turn raw extracted text into a structured bill.
pub trait BillSource {
    fn structured_bill(&self, origin: &str, raw: &str) -> Result<StructuredBill, BillError>;
}

/// Adapter for text that already is structured-bill JSON, optionally
/// wrapped in Markdown code fences the way model providers return it.
pub struct StructuredJson;

impl BillSource for StructuredJson {
    fn structured_bill(&self, origin: &str, raw: &str) -> Result<StructuredBill, BillError> {
        let cleaned = strip_code_fences(raw);
        serde_json::from_str(cleaned).map_err(|e| BillError::Parse {
            origin: origin.to_string(),
            detail: e.to_string(),
        })
    }
}

/// Read a structured-bill JSON file from disk.
pub fn load_bill(path: &Path) -> Result<StructuredBill, BillError> {
    let raw = fs::read_to_string(path).map_err(|e| BillError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    StructuredJson.structured_bill(&path.to_string_lossy(), &raw)
}

/// Trim surrounding ```/```json fences, leaving inner payloads intact.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line, then the closing fence.
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => return trimmed,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_parses() {
        let raw = r#"{"line_items": [{"description": "ECG", "code": "93000", "code_type": "CPT", "total_charge": 90}]}"#;
        let bill = StructuredJson.structured_bill("test", raw).unwrap();
        assert_eq!(bill.line_items.len(), 1);
    }

    #[test]
    fn test_fenced_json_parses() {
        let raw = "```json\n{\"line_items\": []}\n```";
        let bill = StructuredJson.structured_bill("test", raw).unwrap();
        assert!(bill.line_items.is_empty());
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let err = StructuredJson
            .structured_bill("test", "not json at all")
            .unwrap_err();
        assert!(matches!(err, BillError::Parse { .. }));
    }
}
