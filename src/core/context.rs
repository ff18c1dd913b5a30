use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::extraction::FaqEntry;

/// Everything a graph builder may read about the fetched page. Constructed
/// once per generation request by the orchestrator, read-only afterwards.
#[derive(Debug, Clone)]
pub struct SchemaContext {
    pub page_url: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub faqs: Vec<FaqEntry>,
    pub body_text: Option<String>,
    pub aggregate_rating: Option<Value>,
}

/// Raw extraction output kept alongside the generated graph for reporting
/// and persistence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub title: String,
    pub description: String,
    pub image: String,
    pub faqs: Vec<FaqEntry>,
    pub body_text: String,
}

/// One completed generation: the request identity, what was extracted and
/// the JSON-LD document that was built.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaRecord {
    pub url: String,
    pub name: String,
    pub schema_type: String,
    pub extracted: ExtractionSummary,
    pub schema: Value,
}

impl SchemaRecord {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Caller-supplied override tables, one slot per schema type plus the
/// cross-cutting catalog/rating knobs. Shapes mirror the static default
/// tables; deep-merge semantics apply downstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOverrides {
    pub price_spec: Option<Value>,
    pub bank_defaults: Option<Value>,
    pub payment_service_defaults: Option<Value>,
    pub insurance_defaults: Option<Value>,
    pub loan_defaults: Option<Value>,
    pub financial_product_defaults: Option<Value>,
    pub investment_defaults: Option<Value>,
    pub blog_defaults: Option<Value>,
    pub offer_catalog_key: Option<String>,
    pub aggregate_rating: Option<Value>,
}

impl GraphOverrides {
    /// Load overrides from a YAML or JSON file (decided by extension).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read overrides file: {}", path.display()))?;

        let overrides = if path.extension().and_then(|s| s.to_str()) == Some("json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        Ok(overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_deserialize_with_missing_fields() {
        let overrides: GraphOverrides =
            serde_yaml::from_str("loan_defaults:\n  amount:\n    maxValue: 500000\n").unwrap();
        assert_eq!(
            overrides.loan_defaults.unwrap()["amount"]["maxValue"],
            serde_json::json!(500000)
        );
        assert!(overrides.bank_defaults.is_none());
        assert!(overrides.offer_catalog_key.is_none());
    }

    #[test]
    fn record_serializes_with_schema_graph() {
        let record = SchemaRecord {
            url: "https://x/page".into(),
            name: "Producto".into(),
            schema_type: "payment_card".into(),
            extracted: ExtractionSummary::default(),
            schema: serde_json::json!({"@context": "https://schema.org", "@graph": []}),
        };
        let value = record.to_value();
        assert_eq!(value["schema"]["@context"], "https://schema.org");
        assert_eq!(value["schema_type"], "payment_card");
    }
}
