//! Configuration discovery and effective settings resolution.
//!
//! BillBuddy reads `billbuddy.toml|yaml|yml` from the working directory
//! (or closest ancestor) and merges it with CLI flags. Defaults:
//! - `tables`: none (compiled-in reference tables)
//! - `output`: `human`
//! - `bills`: none (patterns must come from the CLI)
//! - `policy.tolerance_percent`: taken from the tables file when unset
//!
//! Overrides precedence: CLI > config file > defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `billbuddy.toml|yaml`.
pub struct BillBuddyConfig {
    /// Path to a reference tables file, relative to the detected root.
    pub tables: Option<String>,
    pub output: Option<String>,
    /// Default bill-file patterns used when the CLI passes none.
    #[serde(default)]
    pub bills: Option<Vec<String>>,
    #[serde(default)]
    pub policy: Option<PolicyCfg>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Pricing policy overrides under `[policy]`.
pub struct PolicyCfg {
    pub tolerance_percent: Option<f64>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub root: PathBuf,
    /// None means the compiled-in tables.
    pub tables: Option<String>,
    pub output: String,
    pub bills: Vec<String>,
    /// Tolerance override layered on top of whatever the tables carry.
    pub tolerance: Option<f64>,
}

/// Walk upward from `start` to detect the project root.
///
/// Stops when a `billbuddy.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("billbuddy.toml").exists()
            || cur.join("billbuddy.yaml").exists()
            || cur.join("billbuddy.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `BillBuddyConfig` from `billbuddy.toml` or `billbuddy.yaml|yml`
/// if present.
pub fn load_config(root: &Path) -> Option<BillBuddyConfig> {
    let toml_path = root.join("billbuddy.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        let cfg: BillBuddyConfig = toml::from_str(&s).ok()?;
        return Some(cfg);
    }
    for yml in ["billbuddy.yaml", "billbuddy.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            let cfg: BillBuddyConfig = serde_yaml::from_str(&s).ok()?;
            return Some(cfg);
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and
/// defaults.
pub fn resolve_effective(
    cli_root: Option<&str>,
    cli_tables: Option<&str>,
    cli_output: Option<&str>,
    cli_patterns: &[String],
    cli_tolerance: Option<f64>,
) -> Effective {
    let start = PathBuf::from(cli_root.unwrap_or("."));
    let root = detect_root(&start);
    let cfg = load_config(&root).unwrap_or_default();

    let tables = cli_tables.map(|s| s.to_string()).or(cfg.tables);

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let bills = if cli_patterns.is_empty() {
        cfg.bills.unwrap_or_default()
    } else {
        cli_patterns.to_vec()
    };

    let tolerance = cli_tolerance.or_else(|| cfg.policy.as_ref().and_then(|p| p.tolerance_percent));

    Effective {
        root,
        tables,
        output,
        bills,
        tolerance,
    }
}
