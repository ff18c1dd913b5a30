use serde_json::{json, Value};

use crate::config::{self, DEFAULT_LANGUAGE};
use crate::core::SchemaContext;
use crate::extraction::FaqEntry;

/// Copies every entry of `extra` onto `node`, replacing existing keys.
pub(crate) fn apply_extra(node: &mut Value, extra: Value) {
    if let (Some(node_map), Value::Object(extra_map)) = (node.as_object_mut(), extra) {
        for (key, value) in extra_map {
            node_map.insert(key, value);
        }
    }
}

/// Valid Question entities for a FAQPage. Pairs with a blank question or
/// answer are excluded here, whatever the extractors kept.
pub fn faq_entities(faqs: &[FaqEntry]) -> Vec<Value> {
    faqs.iter()
        .filter(|faq| !faq.question.trim().is_empty() && !faq.answer.trim().is_empty())
        .map(|faq| {
            json!({
                "@type": "Question",
                "name": faq.question.trim(),
                "acceptedAnswer": {"@type": "Answer", "text": faq.answer.trim()},
            })
        })
        .collect()
}

/// FAQPage node, or `None` when no valid question/answer pair exists. An
/// empty FAQPage is never emitted.
pub fn build_faq_page(faqs: &[FaqEntry], node_id: &str, extra: Option<Value>) -> Option<Value> {
    let entities = faq_entities(faqs);
    if entities.is_empty() {
        return None;
    }

    let mut node = json!({
        "@type": "FAQPage",
        "@id": node_id,
        "inLanguage": DEFAULT_LANGUAGE,
        "mainEntity": entities,
    });
    if let Some(extra) = extra {
        apply_extra(&mut node, extra);
    }
    Some(node)
}

/// Uniform Product facet mirrored into every schema type's graph.
pub fn build_product_node(
    node_id: &str,
    name: &str,
    image_url: Option<&str>,
    aggregate_rating: Option<&Value>,
    description: Option<&str>,
    extra: Option<Value>,
) -> Value {
    let mut node = json!({"@type": "Product", "@id": node_id, "name": name});
    let map = node.as_object_mut().expect("product node is an object");
    if let Some(image) = image_url.filter(|url| !url.is_empty()) {
        map.insert("image".into(), json!(image));
    }
    if let Some(rating) = aggregate_rating {
        map.insert("aggregateRating".into(), rating.clone());
    }
    if let Some(description) = description.filter(|text| !text.is_empty()) {
        map.insert("description".into(), json!(description));
    }
    if let Some(extra) = extra {
        apply_extra(&mut node, extra);
    }
    node
}

/// Offer node addressable by `@id`; the URL defaults to the page URL when
/// the data block does not carry one.
pub fn build_offer_node(page_url: &str, node_id: &str, data: Value) -> Value {
    let url = data
        .get("url")
        .and_then(Value::as_str)
        .unwrap_or(page_url)
        .to_string();

    let mut node = json!({"@type": "Offer", "@id": node_id, "url": url});
    if let (Some(node_map), Value::Object(data_map)) = (node.as_object_mut(), data) {
        for (key, value) in data_map {
            if key == "url" {
                continue;
            }
            node_map.insert(key, value);
        }
    }
    node
}

/// WebPage node: site-wide defaults plus the per-page identity fields.
pub fn build_webpage_node(ctx: &SchemaContext, extra: Option<Value>) -> Value {
    let mut node = config::WEBPAGE_DEFAULTS.clone();
    let map = node.as_object_mut().expect("webpage defaults are an object");
    map.insert("@id".into(), json!(format!("{}#WebPage", ctx.page_url)));
    map.insert("url".into(), json!(ctx.page_url));
    map.insert("name".into(), json!(ctx.name));
    if !ctx.description.is_empty() {
        map.insert("description".into(), json!(ctx.description));
    }
    if let Some(extra) = extra {
        apply_extra(&mut node, extra);
    }
    node
}

/// Price value coerced to the string form used across all offers: missing,
/// null or empty becomes the literal "0".
pub(crate) fn price_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => "0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faq(question: &str, answer: &str) -> FaqEntry {
        FaqEntry {
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }

    #[test]
    fn faq_page_is_omitted_without_valid_entries() {
        assert!(build_faq_page(&[], "https://x/p#FAQPage", None).is_none());
        assert!(build_faq_page(&[faq("", "respuesta")], "https://x/p#FAQPage", None).is_none());
        assert!(build_faq_page(&[faq("¿Pregunta?", "  ")], "https://x/p#FAQPage", None).is_none());
    }

    #[test]
    fn faq_page_carries_question_entities() {
        let node = build_faq_page(
            &[faq("¿Cómo?", "Así."), faq("", "descartada")],
            "https://x/p#FAQPage",
            None,
        )
        .unwrap();
        assert_eq!(node["@type"], "FAQPage");
        assert_eq!(node["mainEntity"].as_array().unwrap().len(), 1);
        assert_eq!(node["mainEntity"][0]["acceptedAnswer"]["text"], "Así.");
    }

    #[test]
    fn offer_node_defaults_url_to_page_url() {
        let node = build_offer_node("https://x/p", "https://x/p#Offer", json!({"price": "0"}));
        assert_eq!(node["url"], "https://x/p");
        assert_eq!(node["price"], "0");
    }

    #[test]
    fn offer_node_respects_explicit_url() {
        let node = build_offer_node(
            "https://x/p",
            "https://x/p#Offer",
            json!({"url": "https://x/other"}),
        );
        assert_eq!(node["url"], "https://x/other");
    }

    #[test]
    fn product_node_skips_empty_optionals() {
        let node = build_product_node("https://x/p#Product", "Producto", None, None, Some(""), None);
        assert!(node.get("image").is_none());
        assert!(node.get("description").is_none());
        assert!(node.get("aggregateRating").is_none());
    }

    #[test]
    fn price_string_defaults_to_zero() {
        assert_eq!(price_string(None), "0");
        assert_eq!(price_string(Some(&Value::Null)), "0");
        assert_eq!(price_string(Some(&json!(""))), "0");
        assert_eq!(price_string(Some(&json!("150"))), "150");
        assert_eq!(price_string(Some(&json!(150))), "150");
    }
}
