//! Validation orchestrator.
//!
//! Runs the duplicate detector over the whole bill, then the code
//! validator and overcharge detector per line item, and aggregates the
//! findings into a `ValidationResult`. Pure with respect to the bill and
//! the injected tables; persistence of flag annotations is a separate
//! phase (see `store`).

use crate::codes::CodeValidator;
use crate::duplicates::DuplicateDetector;
use crate::models::bill::StructuredBill;
use crate::models::tables::ReferenceTables;
use crate::models::{
    Flag, FlagKind, InvalidCode, Overcharge, Severity, Summary, ValidationResult,
};
use crate::pricing::OverchargeDetector;

/// Runs all checks for one bill against one set of reference tables.
pub struct Validator<'t> {
    codes: CodeValidator<'t>,
    pricing: OverchargeDetector<'t>,
    duplicates: DuplicateDetector,
}

impl<'t> Validator<'t> {
    pub fn new(tables: &'t ReferenceTables) -> Self {
        Validator {
            codes: CodeValidator::new(tables),
            pricing: OverchargeDetector::new(tables),
            duplicates: DuplicateDetector::new(tables),
        }
    }

    /// Validate one bill.
    ///
    /// Flag order is detection order: one flag per duplicate group first,
    /// then invalid-code and overcharge flags per line item in encounter
    /// order. An empty bill yields an empty zero-issue result.
    pub fn run(&self, bill_id: &str, bill: &StructuredBill) -> ValidationResult {
        let mut flags: Vec<Flag> = Vec::new();

        let duplicates = self.duplicates.find(&bill.line_items);
        for group in &duplicates {
            flags.push(Flag {
                kind: FlagKind::Duplicate,
                severity: FlagKind::Duplicate.severity(),
                code: group.codes.join("+"),
                message: format!(
                    "duplicate charge: '{}' billed {} times",
                    group.description, group.occurrences
                ),
                potential_savings: Some(group.potential_savings),
            });
        }

        let mut invalid_codes: Vec<InvalidCode> = Vec::new();
        let mut overcharges: Vec<Overcharge> = Vec::new();
        for item in &bill.line_items {
            let (Some(code), Some(code_type)) = (item.code.as_deref(), item.code_type.as_deref())
            else {
                continue;
            };
            let check = self.codes.validate(code, code_type);
            if !check.valid {
                invalid_codes.push(InvalidCode {
                    code: code.to_string(),
                    code_type: code_type.to_string(),
                    message: check.message.clone(),
                });
                flags.push(Flag {
                    kind: FlagKind::InvalidCode,
                    severity: FlagKind::InvalidCode.severity(),
                    code: code.to_string(),
                    message: format!("invalid code {}: {}", code, check.message),
                    potential_savings: None,
                });
            }

            // Price checks only apply to procedure codes that passed
            // validation; an invalid code cannot support a price claim.
            if check.valid && code_type.trim().eq_ignore_ascii_case("CPT") {
                let price = self.pricing.check(code, item.total_charge);
                if price.overcharged {
                    let benchmark = price.benchmark.unwrap_or(0.0);
                    overcharges.push(Overcharge {
                        code: code.to_string(),
                        description: item.description.clone(),
                        charged: item.total_charge,
                        benchmark,
                        percent_over: price.percent_over,
                        potential_savings: price.potential_savings,
                    });
                    flags.push(Flag {
                        kind: FlagKind::Overcharge,
                        severity: FlagKind::Overcharge.severity(),
                        code: code.to_string(),
                        message: format!("charge is {}% above benchmark", price.percent_over),
                        potential_savings: Some(price.potential_savings),
                    });
                }
            }
        }

        // Totalled from the detail lists so a code that is both duplicated
        // and overcharged contributes each finding exactly once.
        let potential_savings = duplicates
            .iter()
            .map(|g| g.potential_savings)
            .sum::<f64>()
            + overcharges.iter().map(|o| o.potential_savings).sum::<f64>();

        let mut summary = Summary {
            high: 0,
            medium: 0,
            low: 0,
            items: bill.line_items.len(),
        };
        for flag in &flags {
            match flag.severity {
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
        }

        ValidationResult {
            bill_id: bill_id.to_string(),
            total_issues: flags.len(),
            flags,
            duplicates,
            overcharges,
            invalid_codes,
            potential_savings,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bill::LineItem;
    use crate::models::tables::{EquivalenceSet, PricingPolicy};

    fn item(code: Option<&str>, code_type: Option<&str>, charge: f64) -> LineItem {
        LineItem {
            description: format!("service {}", code.unwrap_or("uncoded")),
            code: code.map(|c| c.to_string()),
            code_type: code_type.map(|t| t.to_string()),
            total_charge: charge,
            ..LineItem::default()
        }
    }

    fn bill(items: Vec<LineItem>) -> StructuredBill {
        StructuredBill {
            line_items: items,
            ..StructuredBill::default()
        }
    }

    fn test_tables() -> ReferenceTables {
        let mut tables = ReferenceTables::default();
        tables.benchmarks.insert("99213".to_string(), 100.0);
        tables.benchmarks.insert("74176".to_string(), 300.0);
        tables.equivalents.push(EquivalenceSet {
            name: "ct-abdomen-pelvis".to_string(),
            description: None,
            codes: vec!["74176".to_string(), "74177".to_string()],
        });
        tables.policy = PricingPolicy {
            tolerance_percent: 0.0,
        };
        tables
    }

    #[test]
    fn test_empty_bill_yields_zero_issue_result() {
        let tables = test_tables();
        let validator = Validator::new(&tables);
        let result = validator.run("bill-1", &bill(vec![]));
        assert!(result.flags.is_empty());
        assert_eq!(result.total_issues, 0);
        assert!(result.duplicates.is_empty());
        assert!(result.overcharges.is_empty());
        assert!(result.invalid_codes.is_empty());
        assert_eq!(result.potential_savings, 0.0);
    }

    #[test]
    fn test_detection_order_duplicates_then_per_item() {
        let tables = test_tables();
        let validator = Validator::new(&tables);
        let result = validator.run(
            "bill-1",
            &bill(vec![
                item(Some("BAD"), Some("CPT"), 50.0),
                item(Some("99213"), Some("CPT"), 145.0),
                item(Some("99213"), Some("CPT"), 145.0),
            ]),
        );
        assert_eq!(result.flags[0].kind, FlagKind::Duplicate);
        assert_eq!(result.flags[1].kind, FlagKind::InvalidCode);
        // Both 99213 items are above the 100.0 benchmark, in line order.
        assert_eq!(result.flags[2].kind, FlagKind::Overcharge);
        assert_eq!(result.flags[3].kind, FlagKind::Overcharge);
        assert_eq!(result.total_issues, result.flags.len());
    }

    #[test]
    fn test_severities_are_fixed_per_kind() {
        let tables = test_tables();
        let validator = Validator::new(&tables);
        let result = validator.run(
            "bill-1",
            &bill(vec![
                item(Some("BAD"), Some("CPT"), 50.0),
                item(Some("99213"), Some("CPT"), 150.0),
                item(Some("99213"), Some("CPT"), 150.0),
            ]),
        );
        for flag in &result.flags {
            match flag.kind {
                FlagKind::Duplicate | FlagKind::Overcharge => {
                    assert_eq!(flag.severity, Severity::High)
                }
                FlagKind::InvalidCode => assert_eq!(flag.severity, Severity::Medium),
            }
        }
        assert_eq!(result.summary.medium, 1);
        assert!(result.summary.high >= 2);
    }

    #[test]
    fn test_invalid_code_blocks_price_check() {
        let mut tables = test_tables();
        tables.benchmarks.insert("00000".to_string(), 1.0);
        // "9921" is malformed; even a listed benchmark cannot be claimed.
        let validator = Validator::new(&tables);
        let result = validator.run(
            "bill-1",
            &bill(vec![item(Some("9921"), Some("CPT"), 400.0)]),
        );
        assert_eq!(result.invalid_codes.len(), 1);
        assert!(result.overcharges.is_empty());
    }

    #[test]
    fn test_non_cpt_items_skip_price_check() {
        let tables = test_tables();
        let validator = Validator::new(&tables);
        let result = validator.run(
            "bill-1",
            &bill(vec![item(Some("0450"), Some("REV"), 9000.0)]),
        );
        assert!(result.overcharges.is_empty());
    }

    #[test]
    fn test_savings_total_counts_each_finding_once() {
        let tables = test_tables();
        let validator = Validator::new(&tables);
        // 99213 twice at 150: duplicate group saves 150, and each item is
        // 50 over benchmark. The total is the sum of the detail lists.
        let result = validator.run(
            "bill-1",
            &bill(vec![
                item(Some("99213"), Some("CPT"), 150.0),
                item(Some("99213"), Some("CPT"), 150.0),
            ]),
        );
        assert_eq!(result.duplicates.len(), 1);
        assert_eq!(result.overcharges.len(), 2);
        assert_eq!(result.potential_savings, 150.0 + 50.0 + 50.0);
        // Flags carry the same numbers; totalling them would double count
        // nothing here, but the result is defined by the detail lists.
        assert_eq!(result.total_issues, 3);
    }

    #[test]
    fn test_equivalence_class_duplicate_pair() {
        let tables = test_tables();
        let validator = Validator::new(&tables);
        let result = validator.run(
            "bill-1",
            &bill(vec![
                item(Some("74177"), Some("CPT"), 910.0),
                item(Some("74176"), Some("CPT"), 820.0),
            ]),
        );
        assert_eq!(result.duplicates.len(), 1);
        assert_eq!(result.duplicates[0].potential_savings, 820.0);
        assert_eq!(result.flags[0].code, "74177+74176");
    }

    #[test]
    fn test_uncoded_and_untyped_items_are_ignored() {
        let tables = test_tables();
        let validator = Validator::new(&tables);
        let result = validator.run(
            "bill-1",
            &bill(vec![
                item(None, None, 80.0),
                item(Some("99213"), None, 80.0),
                item(None, Some("CPT"), 80.0),
            ]),
        );
        assert_eq!(result.invalid_codes.len(), 0);
        assert_eq!(result.overcharges.len(), 0);
        // An item with a code but no type still joins duplicate grouping.
        assert_eq!(result.total_issues, 0);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let tables = test_tables();
        let validator = Validator::new(&tables);
        let input = bill(vec![
            item(Some("99213"), Some("CPT"), 150.0),
            item(Some("99213"), Some("CPT"), 150.0),
            item(Some("BAD"), Some("CPT"), 10.0),
        ]);
        let a = validator.run("bill-1", &input);
        let b = validator.run("bill-1", &input);
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
    }
}
