//! Structured bill input models.
//!
//! The upstream extraction step emits snake_case JSON with amounts that may
//! arrive as strings (`"$1,234.50"`). Deserialization here is deliberately
//! forgiving: camelCase aliases are accepted, missing fields default, and
//! malformed numeric fields coerce to 0 (quantity to 1) instead of failing
//! the whole bill.

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Default, Deserialize)]
/// One bill as produced by the extraction step. Only `line_items` matters
/// to validation; the rest is metadata carried for reporting.
pub struct StructuredBill {
    #[serde(default, alias = "patientInfo")]
    pub patient_info: Option<PatientInfo>,
    #[serde(default)]
    pub provider: Option<Provider>,
    #[serde(default, alias = "serviceDate")]
    pub service_date: Option<String>,
    #[serde(default, alias = "lineItems")]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub summary: Option<BillTotals>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default, alias = "accountNumber")]
    pub account_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Provider {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillTotals {
    #[serde(default, alias = "totalCharges", deserialize_with = "de_money")]
    pub total_charges: f64,
    #[serde(default, alias = "insurancePaid", deserialize_with = "de_money")]
    pub insurance_paid: f64,
    #[serde(
        default,
        alias = "patientResponsibility",
        deserialize_with = "de_money"
    )]
    pub patient_responsibility: f64,
}

#[derive(Debug, Clone, Deserialize)]
/// One billed charge.
pub struct LineItem {
    #[serde(default)]
    pub description: String,
    /// Raw code as billed, possibly with a modifier suffix ("99213-25").
    /// Empty strings deserialize as absent.
    #[serde(default, deserialize_with = "de_code")]
    pub code: Option<String>,
    #[serde(default, alias = "codeType", deserialize_with = "de_code")]
    pub code_type: Option<String>,
    #[serde(default = "one", deserialize_with = "de_quantity")]
    pub quantity: u32,
    #[serde(default, alias = "unitPrice", deserialize_with = "de_money")]
    pub unit_price: f64,
    /// The authoritative charged amount for this item.
    #[serde(
        default,
        alias = "totalCharge",
        alias = "charge_amount",
        deserialize_with = "de_money"
    )]
    pub total_charge: f64,
}

impl Default for LineItem {
    fn default() -> Self {
        LineItem {
            description: String::new(),
            code: None,
            code_type: None,
            quantity: 1,
            unit_price: 0.0,
            total_charge: 0.0,
        }
    }
}

fn one() -> u32 {
    1
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Num(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Coerce a money field: numbers pass through, strings are stripped of
/// currency punctuation, anything unparsable yields 0. Negative amounts
/// clamp to 0 (charges are non-negative by contract).
fn de_money<'de, D>(d: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawScalar>::deserialize(d)?;
    Ok(match raw {
        Some(RawScalar::Num(n)) if n.is_finite() => n.max(0.0),
        Some(RawScalar::Text(s)) => parse_money(&s),
        _ => 0.0,
    })
}

/// Coerce a quantity field: anything missing, non-positive, or unparsable
/// counts as a single unit.
fn de_quantity<'de, D>(d: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawScalar>::deserialize(d)?;
    let n = match raw {
        Some(RawScalar::Num(n)) if n.is_finite() => n,
        Some(RawScalar::Text(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n >= 1.0 {
        Ok(n as u32)
    } else {
        Ok(1)
    }
}

/// Treat empty or whitespace-only strings as absent.
fn de_code<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Safe currency parse: strips `$`, commas, and whitespace. Unparsable
/// input and negative amounts both yield 0.
pub fn parse_money(s: &str) -> f64 {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    cleaned.parse::<f64>().map(|n| n.max(0.0)).unwrap_or(0.0)
}
