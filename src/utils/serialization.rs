use serde_json::{json, Value};

/// Wraps an ordered node list in the JSON-LD envelope.
pub fn graph_envelope(nodes: Vec<Value>) -> Value {
    json!({
        "@context": "https://schema.org",
        "@graph": nodes,
    })
}

/// Serializes a JSON-LD document as a `<script>` tag ready to embed in an
/// HTML page.
pub fn as_script_tag(schema: &Value) -> String {
    let payload = serde_json::to_string_pretty(schema).unwrap_or_else(|_| "{}".to_string());
    format!("<script type=\"application/ld+json\">\n{payload}\n</script>")
}
