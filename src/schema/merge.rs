use serde_json::{json, Map, Value};
use std::collections::HashSet;

use crate::config;

/// Recursively merges two configuration trees.
///
/// Where both sides hold nested mappings the merge recurses; any other
/// override value fully replaces the default (replace-wins, including
/// sequences). Neither input is mutated; a `Null` override leaves the
/// defaults untouched.
pub fn deep_merge(base: &Value, overrides: &Value) -> Value {
    match (base, overrides) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in override_map {
                let resolved = match merged.get(key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        deep_merge(existing, value)
                    }
                    _ => value.clone(),
                };
                merged.insert(key.clone(), resolved);
            }
            Value::Object(merged)
        }
        (base, Value::Null) => base.clone(),
        (_, overrides) => overrides.clone(),
    }
}

/// One-level dict-merge: nested mappings merge key-by-key, everything else
/// is replaced. Keys listed in `skip` are ignored.
fn apply_shallow(base: &mut Map<String, Value>, patch: &Map<String, Value>, skip: &[&str]) {
    for (key, value) in patch {
        if skip.contains(&key.as_str()) {
            continue;
        }
        match (base.get_mut(key), value.as_object()) {
            (Some(Value::Object(existing)), Some(patch_map)) => {
                for (patch_key, patch_value) in patch_map {
                    existing.insert(patch_key.clone(), patch_value.clone());
                }
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Resolves a configuration fragment to a full organization record.
///
/// Resolution order: explicit `id`/`@id` match against the catalog, else
/// `org_key` lookup, else the named default key. Top-level fields of the
/// fragment are then applied one level deep, followed by its `overrides`
/// block. Lookup misses always fall back to the default record.
pub fn resolve_organization(fragment: Option<&Value>, default_key: &str) -> Value {
    let empty = Map::new();
    let cfg = fragment.and_then(Value::as_object).unwrap_or(&empty);

    let org_key = cfg
        .get("org_key")
        .and_then(Value::as_str)
        .filter(|key| !key.is_empty())
        .unwrap_or(default_key);

    let mut base = config::organization(org_key)
        .or_else(|| config::organization(default_key))
        .cloned()
        .unwrap_or_else(|| json!({}));

    let explicit_id = cfg
        .get("id")
        .or_else(|| cfg.get("@id"))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty());
    if let Some(org_id) = explicit_id {
        if let Some(matched) = config::organization_by_id(org_id) {
            base = matched.clone();
        }
    }

    if let Some(base_map) = base.as_object_mut() {
        apply_shallow(base_map, cfg, &["org_key", "overrides"]);
        if let Some(overrides) = cfg.get("overrides").and_then(Value::as_object) {
            apply_shallow(base_map, overrides, &[]);
        }
    }

    base
}

/// Cross-node reference to an organization: `{"@id": ...}`.
pub fn organization_reference(org: &Value) -> Value {
    json!({"@id": org.get("@id").cloned().unwrap_or(Value::Null)})
}

/// Reference to a catalog organization looked up by logical key.
pub fn organization_reference_by_key(key: &str) -> Value {
    match config::organization(key) {
        Some(org) => organization_reference(org),
        None => json!({"@id": Value::Null}),
    }
}

/// Appends an organization node to the graph at most once per `@id`.
pub fn append_organization(graph: &mut Vec<Value>, org: Value, added_ids: &mut HashSet<String>) {
    let org_id = org.get("@id").and_then(Value::as_str).map(str::to_string);
    if let Some(id) = &org_id {
        if added_ids.contains(id) {
            return;
        }
    }
    graph.push(org);
    if let Some(id) = org_id {
        added_ids.insert(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_merge_with_empty_overrides_is_identity() {
        let defaults = json!({"a": 1, "b": {"c": [1, 2], "d": "x"}});
        assert_eq!(deep_merge(&defaults, &json!({})), defaults);
        assert_eq!(deep_merge(&defaults, &Value::Null), defaults);
    }

    #[test]
    fn deep_merge_recurses_into_nested_maps() {
        let defaults = json!({"amount": {"currency": "ARS", "minValue": 10000, "maxValue": 9000000}});
        let overrides = json!({"amount": {"maxValue": 500000}});
        let merged = deep_merge(&defaults, &overrides);
        assert_eq!(merged["amount"]["maxValue"], json!(500000));
        assert_eq!(merged["amount"]["minValue"], json!(10000));
        assert_eq!(merged["amount"]["currency"], json!("ARS"));
    }

    #[test]
    fn deep_merge_replaces_non_mapping_values_wholesale() {
        let defaults = json!({"tags": ["a", "b"], "nested": {"x": 1}});
        let overrides = json!({"tags": ["c"], "nested": "flat"});
        let merged = deep_merge(&defaults, &overrides);
        assert_eq!(merged["tags"], json!(["c"]));
        assert_eq!(merged["nested"], json!("flat"));
    }

    #[test]
    fn deep_merge_does_not_mutate_inputs() {
        let defaults = json!({"a": {"b": 1}});
        let overrides = json!({"a": {"b": 2}});
        let snapshot = defaults.clone();
        let _ = deep_merge(&defaults, &overrides);
        assert_eq!(defaults, snapshot);
    }

    #[test]
    fn resolve_organization_defaults_on_missing_fragment() {
        let org = resolve_organization(None, "tarjeta_naranja");
        assert_eq!(org["name"], json!("Tarjeta Naranja S.A.U."));
    }

    #[test]
    fn resolve_organization_prefers_explicit_id_match() {
        let fragment = json!({
            "org_key": "tarjeta_naranja",
            "@id": "https://www.naranjax.com/#OrgNaranjaX",
        });
        let org = resolve_organization(Some(&fragment), "tarjeta_naranja");
        assert_eq!(org["name"], json!("Naranja X"));
        // the fragment's own @id field is applied afterwards, same value here
        assert_eq!(org["@id"], json!("https://www.naranjax.com/#OrgNaranjaX"));
    }

    #[test]
    fn resolve_organization_applies_field_and_override_layers() {
        let fragment = json!({
            "org_key": "naranja_x",
            "name": "Nombre directo",
            "overrides": {
                "logo": {"url": "https://example.com/logo.png"},
            },
        });
        let org = resolve_organization(Some(&fragment), "tarjeta_naranja");
        assert_eq!(org["name"], json!("Nombre directo"));
        assert_eq!(org["logo"]["url"], json!("https://example.com/logo.png"));
        // untouched nested keys survive the one-level merge
        assert_eq!(org["logo"]["@type"], json!("ImageObject"));
    }

    #[test]
    fn resolve_organization_unknown_key_falls_back_to_default() {
        let fragment = json!({"org_key": "inexistente"});
        let org = resolve_organization(Some(&fragment), "naranja_digital");
        assert_eq!(
            org["name"],
            json!("Naranja Digital Compañía Financiera S.A.U.")
        );
    }

    #[test]
    fn append_organization_deduplicates_by_id() {
        let mut graph = Vec::new();
        let mut added = HashSet::new();
        let org = json!({"@type": "Organization", "@id": "https://x/#org"});
        append_organization(&mut graph, org.clone(), &mut added);
        append_organization(&mut graph, org, &mut added);
        assert_eq!(graph.len(), 1);
    }
}
