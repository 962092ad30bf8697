//! BillBuddy CLI binary entry point.
//! Resolves configuration, loads reference tables, and validates bills.

use billbuddy::cli::{Cli, Commands};
use billbuddy::models::tables::ReferenceTables;
use billbuddy::models::ValidationResult;
use billbuddy::{config, extract, output, utils, validate};
use clap::Parser;
use glob::glob;
use rayon::prelude::*;
use std::path::PathBuf;

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Validate {
            patterns,
            root,
            tables,
            output,
            tolerance,
        } => {
            let eff = config::resolve_effective(
                root.as_deref(),
                tables.as_deref(),
                output.as_deref(),
                &patterns,
                tolerance,
            );
            if config::load_config(&eff.root).is_none() {
                eprintln!(
                    "{} {}",
                    utils::note_prefix(),
                    "No billbuddy.toml found; using defaults."
                );
            }

            let mut tables = match eff.tables.as_deref() {
                Some(rel) => {
                    let path = eff.root.join(rel);
                    match ReferenceTables::load(&path) {
                        Ok(t) => t,
                        Err(e) => {
                            eprintln!("{} {}", utils::error_prefix(), e);
                            std::process::exit(2);
                        }
                    }
                }
                None => {
                    if eff.output != "json" {
                        eprintln!(
                            "{} {}",
                            utils::note_prefix(),
                            "Using built-in reference tables."
                        );
                    }
                    ReferenceTables::builtin()
                }
            };
            if let Some(t) = eff.tolerance {
                tables.policy.tolerance_percent = t;
            }

            if eff.bills.is_empty() {
                eprintln!(
                    "{} {}",
                    utils::error_prefix(),
                    "No bill files given. Pass patterns or set bills in billbuddy.toml."
                );
                std::process::exit(2);
            }

            let mut files: Vec<PathBuf> = Vec::new();
            for pat in &eff.bills {
                let abs_glob = eff.root.join(pat);
                let pattern = abs_glob.to_string_lossy().to_string();
                match glob(&pattern) {
                    Ok(entries) => {
                        for entry in entries.flatten() {
                            files.push(entry);
                        }
                    }
                    Err(e) => {
                        eprintln!(
                            "{} {}",
                            utils::error_prefix(),
                            format!("bad pattern '{}': {}", pat, e)
                        );
                        std::process::exit(2);
                    }
                }
            }
            files.sort();
            files.dedup();
            if files.is_empty() {
                eprintln!(
                    "{} {}",
                    utils::error_prefix(),
                    format!("No bill files matched: [{}]", eff.bills.join(", "))
                );
                std::process::exit(2);
            }

            // Each bill is an independent validation run; fan out per file.
            let validator = validate::Validator::new(&tables);
            let outcomes: Vec<Result<ValidationResult, String>> = files
                .par_iter()
                .map(|path| {
                    let bill_id = utils::display_path(&eff.root, path);
                    extract::load_bill(path)
                        .map(|bill| validator.run(&bill_id, &bill))
                        .map_err(|e| e.to_string())
                })
                .collect();

            let mut results: Vec<ValidationResult> = Vec::new();
            let mut skipped = 0usize;
            for outcome in outcomes {
                match outcome {
                    Ok(res) => results.push(res),
                    Err(e) => {
                        skipped += 1;
                        eprintln!("{} {}", utils::warn_prefix(), format!("skipped: {}", e));
                    }
                }
            }
            if results.is_empty() {
                eprintln!(
                    "{} {}",
                    utils::error_prefix(),
                    "No bill could be loaded."
                );
                std::process::exit(2);
            }
            if skipped > 0 && eff.output != "json" {
                eprintln!(
                    "{} {}",
                    utils::info_prefix(),
                    format!("{} file(s) skipped.", skipped)
                );
            }

            output::print_validation(&results, &eff.output);
            if results.iter().any(|r| r.total_issues > 0) {
                std::process::exit(1);
            }
        }
    }
}
