//! Static reference data: code descriptions, benchmark prices, equivalence
//! sets, and the pricing policy.
//!
//! Tables load from one TOML or YAML file and are read-only afterwards.
//! They are injected into the validator at construction, never consulted
//! as ambient state. When no file is configured the compiled-in defaults
//! apply.

use crate::error::TableError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
/// Root of a tables file.
pub struct ReferenceTables {
    /// Code type ("CPT", "REV", ...) to code-to-description map. Presence
    /// confirms a code and supplies a description; absence of a well-formed
    /// code is not an error.
    #[serde(default)]
    pub codes: HashMap<String, HashMap<String, String>>,
    /// CPT code to reference price in dollars.
    #[serde(default)]
    pub benchmarks: HashMap<String, f64>,
    /// Sets of differently-coded services billed as the same service.
    #[serde(default)]
    pub equivalents: Vec<EquivalenceSet>,
    #[serde(default)]
    pub policy: PricingPolicy,
}

#[derive(Debug, Clone, Deserialize)]
/// Named set of codes that represent one clinical service or supply.
pub struct EquivalenceSet {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub codes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
/// Tunable pricing policy.
pub struct PricingPolicy {
    /// A charge is flagged when its whole-percent overage above benchmark
    /// strictly exceeds this value. 0 means any amount above benchmark.
    #[serde(default)]
    pub tolerance_percent: f64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            tolerance_percent: 0.0,
        }
    }
}

const CPT_DESCRIPTIONS: &[(&str, &str)] = &[
    ("99202", "Office visit, new patient, straightforward"),
    ("99203", "Office visit, new patient, low complexity"),
    ("99204", "Office visit, new patient, moderate complexity"),
    ("99213", "Office visit, established patient, low complexity"),
    ("99214", "Office visit, established patient, moderate complexity"),
    ("99215", "Office visit, established patient, high complexity"),
    ("99283", "Emergency department visit, moderate severity"),
    ("99284", "Emergency department visit, high severity"),
    ("99285", "Emergency department visit, highest severity"),
    ("36415", "Collection of venous blood by venipuncture"),
    ("80053", "Comprehensive metabolic panel"),
    ("85025", "Complete blood count with differential"),
    ("81001", "Urinalysis with microscopy"),
    ("93000", "Electrocardiogram with interpretation"),
    ("71046", "Chest X-ray, two views"),
    ("70450", "CT head without contrast"),
    ("72148", "MRI lumbar spine without contrast"),
    ("74176", "CT abdomen and pelvis without contrast"),
    ("74177", "CT abdomen and pelvis with contrast"),
    ("76700", "Ultrasound, abdomen, complete"),
];

const CPT_BENCHMARKS: &[(&str, f64)] = &[
    ("99202", 75.0),
    ("99203", 110.0),
    ("99204", 170.0),
    ("99213", 95.0),
    ("99214", 135.0),
    ("99215", 185.0),
    ("99283", 220.0),
    ("99284", 380.0),
    ("99285", 560.0),
    ("36415", 10.0),
    ("80053", 15.0),
    ("85025", 11.0),
    ("81001", 12.0),
    ("93000", 25.0),
    ("71046", 35.0),
    ("70450", 230.0),
    ("72148", 240.0),
    ("74176", 300.0),
    ("74177", 390.0),
    ("76700", 120.0),
];

const REV_DESCRIPTIONS: &[(&str, &str)] = &[
    ("0250", "Pharmacy, general"),
    ("0270", "Medical/surgical supplies, general"),
    ("0272", "Sterile supply"),
    ("0450", "Emergency room"),
];

impl ReferenceTables {
    /// Compiled-in default tables.
    pub fn builtin() -> Self {
        let mut codes = HashMap::new();
        codes.insert(
            "CPT".to_string(),
            CPT_DESCRIPTIONS
                .iter()
                .map(|(c, d)| (c.to_string(), d.to_string()))
                .collect(),
        );
        codes.insert(
            "REV".to_string(),
            REV_DESCRIPTIONS
                .iter()
                .map(|(c, d)| (c.to_string(), d.to_string()))
                .collect(),
        );
        ReferenceTables {
            codes,
            benchmarks: CPT_BENCHMARKS
                .iter()
                .map(|(c, p)| (c.to_string(), *p))
                .collect(),
            equivalents: vec![
                EquivalenceSet {
                    name: "ct-abdomen-pelvis".to_string(),
                    description: Some(
                        "CT abdomen/pelvis billed both with and without contrast".to_string(),
                    ),
                    codes: vec!["74176".to_string(), "74177".to_string()],
                },
                EquivalenceSet {
                    name: "surgical-supplies".to_string(),
                    description: Some(
                        "General and sterile supply revenue codes for the same supply".to_string(),
                    ),
                    codes: vec!["0270".to_string(), "0272".to_string()],
                },
            ],
            policy: PricingPolicy::default(),
        }
    }

    /// Load tables from a TOML (default) or YAML file, then sanity-check.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        if !path.exists() {
            return Err(TableError::NotFound(path.to_path_buf()));
        }
        let data = fs::read_to_string(path).map_err(|e| TableError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let tables: ReferenceTables = if yaml {
            serde_yaml::from_str(&data).map_err(|e| TableError::Parse {
                path: path.to_path_buf(),
                format: "YAML",
                detail: e.to_string(),
            })?
        } else {
            toml::from_str(&data).map_err(|e| TableError::Parse {
                path: path.to_path_buf(),
                format: "TOML",
                detail: e.to_string(),
            })?
        };
        tables.verify()?;
        Ok(tables)
    }

    /// Config-time sanity checks; lookup misses at validation time are
    /// handled by the detectors, not here.
    pub fn verify(&self) -> Result<(), TableError> {
        for set in &self.equivalents {
            if set.codes.len() < 2 {
                return Err(TableError::EquivalenceSetTooSmall(set.name.clone()));
            }
        }
        for (code, price) in &self.benchmarks {
            if *price <= 0.0 {
                return Err(TableError::NonPositiveBenchmark {
                    code: code.clone(),
                    price: *price,
                });
            }
        }
        Ok(())
    }

    /// Description for a code of the given type, if listed.
    pub fn describe(&self, code_type: &str, code: &str) -> Option<&str> {
        self.codes
            .get(code_type)?
            .get(code)
            .map(|s| s.as_str())
    }

    /// Reference price for a CPT code, if listed.
    pub fn benchmark(&self, code: &str) -> Option<f64> {
        self.benchmarks.get(code).copied()
    }
}
