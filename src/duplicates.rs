//! Duplicate charge detection.
//!
//! Items group by normalized code, or by equivalence set when the code
//! belongs to one, so differently-coded renditions of the same service
//! ("74176"/"74177") still pair up. The first occurrence in encounter
//! order is the legitimate charge; savings are attributed to every later
//! occurrence. Codeless items never participate.

use crate::codes::normalize_code;
use crate::models::bill::LineItem;
use crate::models::tables::ReferenceTables;
use crate::models::DuplicateGroup;
use std::collections::HashMap;

struct GroupAcc {
    codes: Vec<String>,
    description: String,
    occurrences: usize,
    savings: f64,
}

/// Groups line items that bill the same service more than once.
pub struct DuplicateDetector {
    /// Normalized code to equivalence-set name.
    classes: HashMap<String, String>,
}

impl DuplicateDetector {
    pub fn new(tables: &ReferenceTables) -> Self {
        let mut classes = HashMap::new();
        for set in &tables.equivalents {
            for code in &set.codes {
                classes.insert(normalize_code(code), set.name.clone());
            }
        }
        DuplicateDetector { classes }
    }

    /// Find duplicate groups, reported in order of first appearance.
    pub fn find(&self, items: &[LineItem]) -> Vec<DuplicateGroup> {
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, GroupAcc> = HashMap::new();

        for item in items {
            let Some(code) = item.code.as_deref() else {
                continue;
            };
            let base = normalize_code(code);
            if base.is_empty() {
                continue;
            }
            let key = self
                .classes
                .get(&base)
                .cloned()
                .unwrap_or_else(|| base.clone());
            match groups.get_mut(&key) {
                Some(acc) => {
                    acc.occurrences += 1;
                    // First occurrence is kept; this one is disputable.
                    acc.savings += item.total_charge;
                    if !acc.codes.contains(&base) {
                        acc.codes.push(base);
                    }
                }
                None => {
                    order.push(key.clone());
                    groups.insert(
                        key,
                        GroupAcc {
                            codes: vec![base],
                            description: item.description.clone(),
                            occurrences: 1,
                            savings: 0.0,
                        },
                    );
                }
            }
        }

        order
            .into_iter()
            .filter_map(|key| {
                let acc = groups.remove(&key)?;
                if acc.occurrences < 2 {
                    return None;
                }
                Some(DuplicateGroup {
                    key,
                    codes: acc.codes,
                    description: acc.description,
                    occurrences: acc.occurrences,
                    potential_savings: acc.savings,
                })
            })
            .collect()
    }
}
