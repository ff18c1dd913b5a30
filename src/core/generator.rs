use scraper::Html;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config;
use crate::extraction::{extract_basic_meta, extract_faqs, resolve_base_url, select_body_text};
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::schema::{build_offer_catalog_node, SchemaType};
use crate::utils::graph_envelope;

use super::context::{ExtractionSummary, GraphOverrides, SchemaContext, SchemaRecord};
use super::error::SchemaError;

/// One generation request: the page to fetch, a display name for the
/// resource and the schema type to build, plus any override tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub url: String,
    pub name: String,
    #[serde(default = "default_schema_type")]
    pub schema_type: String,
    #[serde(default, flatten)]
    pub overrides: GraphOverrides,
}

fn default_schema_type() -> String {
    "payment_card".to_string()
}

/// Sequences fetch, extraction, configuration resolution and graph
/// building. One instance can serve any number of independent requests.
pub struct SchemaGenerator {
    fetcher: Box<dyn PageFetcher>,
}

impl SchemaGenerator {
    pub fn new() -> Self {
        Self::with_fetcher(Box::new(HttpFetcher::new()))
    }

    pub fn with_fetcher(fetcher: Box<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetches the page and builds the full schema record for it.
    ///
    /// The schema type is validated before the fetch so a bad key never
    /// costs a network round trip.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<SchemaRecord, SchemaError> {
        let schema_type = SchemaType::parse(&request.schema_type)?;
        info!("Generating {} schema for {}", schema_type, request.url);

        let page = self.fetcher.fetch(&request.url).await?;

        Ok(build_record(
            &page.html,
            &page.final_url,
            &request.name,
            schema_type,
            &request.schema_type,
            &request.overrides,
        ))
    }
}

impl Default for SchemaGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Pure entry point for callers that already hold the page markup: parses,
/// extracts, dispatches to the builder and wraps the result. Fails only on
/// an unknown schema type.
pub fn build_from_html(
    html: &str,
    final_url: &str,
    name: &str,
    schema_type: &str,
    overrides: &GraphOverrides,
) -> Result<SchemaRecord, SchemaError> {
    let parsed = SchemaType::parse(schema_type)?;
    Ok(build_record(
        html,
        final_url,
        name,
        parsed,
        schema_type,
        overrides,
    ))
}

fn build_record(
    html: &str,
    final_url: &str,
    name: &str,
    schema_type: SchemaType,
    requested_type: &str,
    overrides: &GraphOverrides,
) -> SchemaRecord {
    let document = Html::parse_document(html);

    let base_url = resolve_base_url(&document, final_url);
    let meta = extract_basic_meta(&document, Some(&base_url));
    let faqs = extract_faqs(&document);
    let body_text = select_body_text(&document);

    debug!(
        "Extracted title={:?} faqs={} body_chars={}",
        meta.title,
        faqs.len(),
        body_text.len()
    );

    let aggregate_rating = resolve_aggregate_rating(overrides.aggregate_rating.as_ref());

    let context = SchemaContext {
        page_url: final_url.to_string(),
        name: name.to_string(),
        description: meta.description.clone(),
        image_url: (!meta.image.is_empty()).then(|| meta.image.clone()),
        faqs: faqs.clone(),
        body_text: (!body_text.is_empty()).then(|| body_text.clone()),
        aggregate_rating,
    };

    let mut graph = schema_type.build_graph(&context, overrides);

    if let Some(catalog_key) = overrides
        .offer_catalog_key
        .as_deref()
        .filter(|key| !key.is_empty())
    {
        attach_offer_catalog(&mut graph, &context.page_url, catalog_key);
    }

    info!("Built {} graph with {} nodes", schema_type, graph.len());

    SchemaRecord {
        url: final_url.to_string(),
        name: name.to_string(),
        schema_type: requested_type.to_string(),
        extracted: ExtractionSummary {
            title: meta.title,
            description: meta.description,
            image: meta.image,
            faqs,
            body_text,
        },
        schema: graph_envelope(graph),
    }
}

/// The caller's rating block wins over the coded default; an explicitly
/// empty block disables the rating entirely.
fn resolve_aggregate_rating(explicit: Option<&Value>) -> Option<Value> {
    let source = match explicit {
        None => config::DEFAULT_AGG_RATING.clone(),
        Some(value) => value.clone(),
    };
    match source {
        Value::Object(map) if map.is_empty() => None,
        Value::Object(mut map) => {
            map.entry("@type").or_insert_with(|| json!("AggregateRating"));
            Some(Value::Object(map))
        }
        _ => None,
    }
}

/// Appends the resolved catalog node and, when its provider organization is
/// not yet present by `@id`, that organization as well.
fn attach_offer_catalog(graph: &mut Vec<Value>, page_url: &str, catalog_key: &str) {
    let (catalog_node, provider_org) = build_offer_catalog_node(page_url, catalog_key);
    let Some(catalog_node) = catalog_node else {
        debug!("Offer catalog {catalog_key} resolved to nothing");
        return;
    };
    graph.push(catalog_node);

    if let Some(provider_org) = provider_org {
        let provider_id = provider_org
            .get("@id")
            .and_then(Value::as_str)
            .map(str::to_string);
        if let Some(provider_id) = provider_id {
            let already_present = graph
                .iter()
                .any(|node| node.get("@id").and_then(Value::as_str) == Some(provider_id.as_str()));
            if !already_present {
                graph.push(provider_org);
            }
        }
    }
}
