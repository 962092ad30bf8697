//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "billbuddy",
    version,
    about = "BillBuddy (Rust + TOML)",
    long_about = "BillBuddy — a tiny, fast CLI that checks structured medical bills for duplicate charges, invalid billing codes, and overcharges against benchmark prices.\n\nConfiguration precedence: CLI > billbuddy.toml > defaults.",
    after_help = "Examples:\n  billbuddy validate bills/*.json\n  billbuddy validate bills/er-visit.json --output json\n  billbuddy validate --tables conventions/tables.toml --tolerance 5",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(
        about = "Show version",
        long_about = "Print the current billbuddy version."
    )]
    Version,
    /// Validate structured bills
    #[command(
        about = "Run validation checks",
        long_about = "Validate structured bill JSON files: duplicate charges (including equivalent-code pairs), invalid billing codes, and charges above benchmark prices. Exits 1 when any flag is raised.",
        after_help = "Examples:\n  billbuddy validate bills/*.json\n  billbuddy validate bills/a.json --output json\n  billbuddy validate --tables conventions/tables.yaml bills/a.json"
    )]
    Validate {
        #[arg(help = "Structured bill JSON files or glob patterns")]
        patterns: Vec<String>,
        #[arg(long, help = "Project root (default: current dir)")]
        root: Option<String>,
        #[arg(long, help = "Path to a reference tables file (TOML or YAML)")]
        tables: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(
            long,
            help = "Overcharge tolerance in whole percent above benchmark (default: 0)"
        )]
        tolerance: Option<f64>,
    },
}
