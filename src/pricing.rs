//! Overcharge detection against the benchmark price table.

use crate::codes::normalize_code;
use crate::models::tables::ReferenceTables;
use regex::Regex;

#[derive(Debug, Clone, PartialEq)]
/// Outcome of checking one charge against its benchmark.
pub struct PriceCheck {
    pub overcharged: bool,
    /// None when the code has no benchmark or is not a procedure code.
    pub benchmark: Option<f64>,
    /// Whole-percent overage, rounded half away from zero. Negative when
    /// the charge is below benchmark.
    pub percent_over: i64,
    /// Dollar amount above benchmark, full precision, never negative.
    pub potential_savings: f64,
    pub message: String,
}

impl PriceCheck {
    fn no_claim(message: impl Into<String>) -> Self {
        PriceCheck {
            overcharged: false,
            benchmark: None,
            percent_over: 0,
            potential_savings: 0.0,
            message: message.into(),
        }
    }
}

/// Compares charged amounts to benchmark prices under the pricing policy.
pub struct OverchargeDetector<'t> {
    tables: &'t ReferenceTables,
    cpt: Regex,
}

impl<'t> OverchargeDetector<'t> {
    pub fn new(tables: &'t ReferenceTables) -> Self {
        OverchargeDetector {
            tables,
            cpt: Regex::new(r"^\d{5}$").unwrap(),
        }
    }

    /// Check one charge. Callers filter to CPT items; the format check
    /// here is defensive so stray codes return a no-claim result instead
    /// of a bogus flag.
    ///
    /// A charge is overcharged when its whole-percent overage strictly
    /// exceeds `policy.tolerance_percent` (default 0: any amount above
    /// benchmark). Savings stay at full precision; only the percentage is
    /// rounded.
    pub fn check(&self, code: &str, charged: f64) -> PriceCheck {
        let base = normalize_code(code);
        if !self.cpt.is_match(&base) {
            return PriceCheck::no_claim("not a procedure code");
        }
        let Some(benchmark) = self.tables.benchmark(&base) else {
            return PriceCheck::no_claim("no benchmark available");
        };
        let percent_over = (((charged - benchmark) / benchmark) * 100.0).round() as i64;
        let overcharged = percent_over as f64 > self.tables.policy.tolerance_percent;
        let potential_savings = (charged - benchmark).max(0.0);
        let message = if overcharged {
            format!(
                "charged ${:.2} against a ${:.2} benchmark ({}% above)",
                charged, benchmark, percent_over
            )
        } else {
            format!("within benchmark (${:.2} vs ${:.2})", charged, benchmark)
        };
        PriceCheck {
            overcharged,
            benchmark: Some(benchmark),
            percent_over,
            potential_savings,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tables::PricingPolicy;

    fn tables_with(code: &str, price: f64, tolerance: f64) -> ReferenceTables {
        let mut tables = ReferenceTables::default();
        tables.benchmarks.insert(code.to_string(), price);
        tables.policy = PricingPolicy {
            tolerance_percent: tolerance,
        };
        tables
    }

    #[test]
    fn test_overcharge_above_benchmark() {
        let tables = tables_with("99213", 100.0, 0.0);
        let det = OverchargeDetector::new(&tables);
        let check = det.check("99213", 150.0);
        assert!(check.overcharged);
        assert_eq!(check.benchmark, Some(100.0));
        assert_eq!(check.percent_over, 50);
        assert_eq!(check.potential_savings, 50.0);
    }

    #[test]
    fn test_at_benchmark_is_not_overcharged() {
        let tables = tables_with("99213", 100.0, 0.0);
        let det = OverchargeDetector::new(&tables);
        let check = det.check("99213", 100.0);
        assert!(!check.overcharged);
        assert_eq!(check.percent_over, 0);
        assert_eq!(check.potential_savings, 0.0);
    }

    #[test]
    fn test_no_benchmark_no_claim() {
        let tables = tables_with("99213", 100.0, 0.0);
        let det = OverchargeDetector::new(&tables);
        let check = det.check("99999", 5000.0);
        assert!(!check.overcharged);
        assert_eq!(check.benchmark, None);
        assert_eq!(check.potential_savings, 0.0);
    }

    #[test]
    fn test_non_procedure_code_no_claim() {
        let tables = tables_with("99213", 100.0, 0.0);
        let det = OverchargeDetector::new(&tables);
        assert!(!det.check("0270", 500.0).overcharged);
        assert!(!det.check("E11.9", 500.0).overcharged);
    }

    #[test]
    fn test_modifier_stripped_for_lookup() {
        let tables = tables_with("99213", 100.0, 0.0);
        let det = OverchargeDetector::new(&tables);
        let check = det.check("99213-25", 120.0);
        assert!(check.overcharged);
        assert_eq!(check.percent_over, 20);
    }

    #[test]
    fn test_tolerance_band() {
        let tables = tables_with("99213", 100.0, 10.0);
        let det = OverchargeDetector::new(&tables);
        // 8% over: inside the band.
        assert!(!det.check("99213", 108.0).overcharged);
        // 10% over: not strictly above the tolerance.
        assert!(!det.check("99213", 110.0).overcharged);
        // 15% over: flagged, savings measured from the benchmark.
        let check = det.check("99213", 115.0);
        assert!(check.overcharged);
        assert_eq!(check.potential_savings, 15.0);
    }

    #[test]
    fn test_savings_keep_cents_precision() {
        let tables = tables_with("99213", 100.0, 0.0);
        let det = OverchargeDetector::new(&tables);
        let check = det.check("99213", 100.37);
        // Rounds to 0% over, so the tolerance policy does not flag it,
        // but the raw dollar delta is preserved.
        assert!(!check.overcharged);
        assert_eq!(check.potential_savings, 100.37 - 100.0);
    }
}
