//! Code normalization and per-type validation.
//!
//! Validation is format-first: a code with the right shape for its type is
//! accepted even when the reference table has no entry for it, so that
//! legitimate but unlisted codes are never disputed. Unrecognized code
//! types pass unconditionally.

use crate::models::tables::ReferenceTables;
use regex::Regex;

/// Strip a modifier suffix ("99213-25" -> "99213") and surrounding
/// whitespace. Used for duplicate grouping and benchmark lookups.
pub fn normalize_code(code: &str) -> String {
    code.trim()
        .split('-')
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

#[derive(Debug, Clone, PartialEq)]
/// Outcome of validating one code.
pub struct CodeCheck {
    pub valid: bool,
    pub message: String,
}

impl CodeCheck {
    fn ok(message: impl Into<String>) -> Self {
        CodeCheck {
            valid: true,
            message: message.into(),
        }
    }

    fn bad(message: impl Into<String>) -> Self {
        CodeCheck {
            valid: false,
            message: message.into(),
        }
    }
}

/// Validates codes against format rules and the injected reference table.
pub struct CodeValidator<'t> {
    tables: &'t ReferenceTables,
    cpt: Regex,
    rev: Regex,
    ndc: Regex,
    icd10: Regex,
}

impl<'t> CodeValidator<'t> {
    pub fn new(tables: &'t ReferenceTables) -> Self {
        CodeValidator {
            tables,
            cpt: Regex::new(r"^\d{5}$").unwrap(),
            rev: Regex::new(r"^\d{3,4}$").unwrap(),
            // Segmented (labeler-product-package) or contiguous 10/11 digits.
            ndc: Regex::new(r"^(\d{4,5}-\d{3,4}-\d{1,2}|\d{10,11})$").unwrap(),
            icd10: Regex::new(r"^(?i)[A-Z]\d{2}(\.[0-9A-Z]{1,4})?$").unwrap(),
        }
    }

    /// Validate `code` under its declared `code_type`.
    ///
    /// Pure function of the inputs and the reference table; never fails.
    pub fn validate(&self, code: &str, code_type: &str) -> CodeCheck {
        let code = code.trim();
        if code.is_empty() {
            return CodeCheck::bad("code is empty");
        }
        let kind = code_type.trim().to_ascii_uppercase();
        match kind.as_str() {
            "CPT" => {
                let base = normalize_code(code);
                if !self.cpt.is_match(&base) {
                    return CodeCheck::bad("CPT codes are five digits");
                }
                match self.tables.describe("CPT", &base) {
                    Some(desc) => CodeCheck::ok(desc),
                    None => CodeCheck::ok("well-formed CPT code (not in reference list)"),
                }
            }
            "REV" => {
                if !self.rev.is_match(code) {
                    return CodeCheck::bad("revenue codes are three or four digits");
                }
                match self.tables.describe("REV", code) {
                    Some(desc) => CodeCheck::ok(desc),
                    None => CodeCheck::ok("well-formed revenue code"),
                }
            }
            "NDC" => {
                if !self.ndc.is_match(code) {
                    return CodeCheck::bad(
                        "NDC codes are 10-11 digits, plain or hyphen-segmented",
                    );
                }
                CodeCheck::ok("well-formed NDC code")
            }
            "ICD-10" | "ICD10" => {
                if !self.icd10.is_match(code) {
                    return CodeCheck::bad(
                        "ICD-10 codes are a letter, two digits, and an optional subcategory",
                    );
                }
                CodeCheck::ok("well-formed ICD-10 code")
            }
            // Fail open: a format we do not understand must not generate
            // a dispute.
            _ => CodeCheck::ok("unrecognized code type; not checked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(tables: &ReferenceTables) -> CodeValidator<'_> {
        CodeValidator::new(tables)
    }

    #[test]
    fn test_normalize_strips_modifier() {
        assert_eq!(normalize_code("99213-25"), "99213");
        assert_eq!(normalize_code(" 99213 "), "99213");
        assert_eq!(normalize_code("99213"), "99213");
    }

    #[test]
    fn test_cpt_format_and_reference_lookup() {
        let tables = ReferenceTables::builtin();
        let v = validator(&tables);
        let listed = v.validate("99213", "CPT");
        assert!(listed.valid);
        assert!(listed.message.contains("Office visit"));
        // Well-formed but unlisted stays valid.
        assert!(v.validate("12345", "CPT").valid);
        // Modifier suffix does not break format validation.
        assert!(v.validate("99213-25", "CPT").valid);
        assert!(!v.validate("9921", "CPT").valid);
        assert!(!v.validate("ABCDE", "CPT").valid);
    }

    #[test]
    fn test_rev_ndc_icd10_formats() {
        let tables = ReferenceTables::builtin();
        let v = validator(&tables);
        assert!(v.validate("0270", "REV").valid);
        assert!(v.validate("450", "REV").valid);
        assert!(!v.validate("27", "REV").valid);
        assert!(v.validate("0002-1433-80", "NDC").valid);
        assert!(v.validate("0002143380", "NDC").valid);
        assert!(!v.validate("12-34", "NDC").valid);
        assert!(v.validate("E11.9", "ICD-10").valid);
        assert!(v.validate("M54.5", "ICD10").valid);
        assert!(v.validate("S72.001A", "ICD-10").valid);
        assert!(!v.validate("11.9", "ICD-10").valid);
    }

    #[test]
    fn test_unknown_type_fails_open() {
        let tables = ReferenceTables::builtin();
        let v = validator(&tables);
        assert!(v.validate("whatever", "HCPCS-II").valid);
        assert!(v.validate("???", "").valid);
    }
}
