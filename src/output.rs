//! Output rendering for validation results.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-bill results and a top-level summary with the savings total.

use crate::models::{Severity, ValidationResult};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Print validation results for one or more bills in the requested format.
pub fn print_validation(results: &[ValidationResult], output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_validation_json(results)).unwrap()
        ),
        _ => {
            let color = use_colors(output);
            for res in results {
                let header = if color {
                    res.bill_id.clone().bold().to_string()
                } else {
                    res.bill_id.clone()
                };
                println!("{}", header);
                if res.flags.is_empty() {
                    if color {
                        println!("  {}", "no issues found".green().to_string());
                    } else {
                        println!("  no issues found");
                    }
                    continue;
                }
                for flag in &res.flags {
                    let sev = match flag.severity {
                        Severity::High => {
                            if color {
                                "⟦high⟧".red().bold().to_string()
                            } else {
                                "⟦high⟧".to_string()
                            }
                        }
                        Severity::Medium => {
                            if color {
                                "⟦medium⟧".yellow().bold().to_string()
                            } else {
                                "⟦medium⟧".to_string()
                            }
                        }
                        Severity::Low => {
                            if color {
                                "⟦low⟧".blue().bold().to_string()
                            } else {
                                "⟦low⟧".to_string()
                            }
                        }
                    };
                    let icon = match flag.severity {
                        Severity::High => "✖".red().to_string(),
                        Severity::Medium => "▲".yellow().to_string(),
                        Severity::Low => "◆".blue().to_string(),
                    };
                    let savings = match flag.potential_savings {
                        Some(s) if s > 0.0 => format!(" (save ${:.2})", s),
                        _ => String::new(),
                    };
                    println!(
                        "  {} {} ❲{}❳ — {}{}",
                        icon, sev, flag.code, flag.message, savings
                    );
                }
            }
            let totals = overall_totals(results);
            let summary = format!(
                "— Summary — bills={} flags={} high={} medium={} low={} savings=${:.2}",
                results.len(),
                totals.flags,
                totals.high,
                totals.medium,
                totals.low,
                totals.savings
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

struct Totals {
    flags: usize,
    high: usize,
    medium: usize,
    low: usize,
    savings: f64,
}

fn overall_totals(results: &[ValidationResult]) -> Totals {
    let mut t = Totals {
        flags: 0,
        high: 0,
        medium: 0,
        low: 0,
        savings: 0.0,
    };
    for res in results {
        t.flags += res.total_issues;
        t.high += res.summary.high;
        t.medium += res.summary.medium;
        t.low += res.summary.low;
        t.savings += res.potential_savings;
    }
    t
}

/// Compose the validation JSON object (pure) for testing purposes.
pub fn compose_validation_json(results: &[ValidationResult]) -> JsonVal {
    let totals = overall_totals(results);
    json!({
        "bills": results,
        "summary": {
            "bills": results.len(),
            "totalFlags": totals.flags,
            "high": totals.high,
            "medium": totals.medium,
            "low": totals.low,
            "potentialSavings": totals.savings,
        }
    })
}
