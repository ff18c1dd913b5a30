use regex::Regex;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::config;
use crate::core::{GraphOverrides, SchemaContext};

use super::merge::{
    append_organization, deep_merge, organization_reference, organization_reference_by_key,
    resolve_organization,
};
use super::nodes::{
    apply_extra, build_faq_page, build_offer_node, build_product_node, build_webpage_node,
    price_string,
};

static NULL: Value = Value::Null;

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[^0-9A-Za-z]+").unwrap());
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

fn field<'a>(cfg: &'a Value, key: &str) -> &'a Value {
    cfg.get(key).unwrap_or(&NULL)
}

fn str_or<'a>(cfg: &'a Value, key: &str, default: &'a str) -> &'a str {
    cfg.get(key).and_then(Value::as_str).unwrap_or(default)
}

fn nonempty_str<'a>(cfg: &'a Value, key: &str) -> Option<&'a str> {
    cfg.get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

fn slugify(name: &str) -> String {
    SLUG_RE
        .replace_all(name, "-")
        .trim_matches('-')
        .to_string()
}

fn offset_date(cfg: &Value, key: &str, default_days: i64) -> String {
    let days = cfg.get(key).and_then(Value::as_i64).unwrap_or(default_days);
    (config::today() + chrono::Duration::days(days)).to_string()
}

/// Formats a rate table into human-readable text: trailing zeros and bare
/// decimal points trimmed, a percent sign appended when not already one,
/// entries joined with commas.
fn rates_text(rates: &Value) -> String {
    let Some(map) = rates.as_object() else {
        return String::new();
    };
    let mut parts = Vec::new();
    for (code, value) in map {
        let formatted = match value {
            Value::Number(number) => match number.as_f64() {
                Some(rate) => {
                    let fixed = format!("{rate:.2}");
                    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
                }
                None => number.to_string(),
            },
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        let formatted = if !formatted.is_empty() && !formatted.ends_with('%') {
            format!("{formatted} %")
        } else {
            formatted
        };
        let part = format!("{code} {formatted}").trim().to_string();
        if !part.is_empty() {
            parts.push(part);
        }
    }
    parts.join(", ")
}

/// QuantitativeValue-shaped sub-node; suppressed when no numeric field is
/// present (a bare unit does not justify a node).
fn quantitative_node(cfg: &Value) -> Option<Value> {
    let map = cfg.as_object()?;
    let mut node = json!({
        "@type": map.get("@type").and_then(Value::as_str).unwrap_or("QuantitativeValue"),
    });
    let node_map = node.as_object_mut().expect("node is an object");
    let mut has_value = false;
    for key in ["minValue", "maxValue", "unitText", "value"] {
        if let Some(value) = map.get(key).filter(|value| !value.is_null()) {
            node_map.insert(key.to_string(), value.clone());
            if key != "unitText" {
                has_value = true;
            }
        }
    }
    has_value.then_some(node)
}

fn shallow_section_merge(base: &Value, overrides: &Value) -> Map<String, Value> {
    let mut merged = base.as_object().cloned().unwrap_or_default();
    if let Some(patch) = overrides.as_object() {
        for (key, value) in patch {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

// Builders, one per schema type ----------------------------------------------

pub fn build_payment_card_graph(ctx: &SchemaContext, _overrides: &GraphOverrides) -> Vec<Value> {
    let mut graph = Vec::new();
    let mut added_orgs = HashSet::new();

    let offer_id = format!("{}#Offer", ctx.page_url);

    let mut payment_card = json!({
        "@type": "PaymentCard",
        "@id": format!("{}#PaymentCard", ctx.page_url),
        "url": ctx.page_url,
        "name": ctx.name,
        "description": ctx.description,
        "areaServed": "AR",
        "provider": [organization_reference_by_key("tarjeta_naranja")],
        "mainEntityOfPage": ctx.page_url,
        "offers": {"@id": offer_id},
    });
    if let Some(image) = &ctx.image_url {
        apply_extra(
            &mut payment_card,
            json!({"image": {
                "@type": "ImageObject",
                "@id": format!("{}#PaymentCardImage", ctx.page_url),
                "url": image,
            }}),
        );
    }
    graph.push(payment_card);

    let offer = build_offer_node(
        &ctx.page_url,
        &offer_id,
        json!({
            "name": ctx.name,
            "price": "0",
            "priceCurrency": "ARS",
            "availability": "https://schema.org/InStock",
            "areaServed": "AR",
            "priceValidUntil": config::price_valid_until_default(),
        }),
    );
    graph.push(offer);

    graph.push(build_product_node(
        &format!("{}#Product", ctx.page_url),
        &ctx.name,
        ctx.image_url.as_deref(),
        ctx.aggregate_rating.as_ref(),
        Some(&ctx.description),
        Some(json!({"url": ctx.page_url, "offers": {"@id": offer_id}})),
    ));

    if let Some(faq_page) = build_faq_page(&ctx.faqs, &format!("{}#FAQPage", ctx.page_url), None) {
        graph.push(faq_page);
    }

    graph.push(build_webpage_node(ctx, None));

    append_organization(
        &mut graph,
        resolve_organization(None, "tarjeta_naranja"),
        &mut added_orgs,
    );

    graph
}

pub fn build_loan_or_credit_graph(ctx: &SchemaContext, overrides: &GraphOverrides) -> Vec<Value> {
    let mut graph = Vec::new();
    let mut added_orgs = HashSet::new();

    let defaults = deep_merge(
        &config::LOAN_OR_CREDIT_DEFAULTS,
        overrides.loan_defaults.as_ref().unwrap_or(&NULL),
    );
    let amount_cfg = field(&defaults, "amount");
    let currency_value = nonempty_str(&defaults, "currency")
        .or_else(|| nonempty_str(amount_cfg, "currency"));
    let loan_type_value = nonempty_str(&defaults, "loan_type").unwrap_or(&ctx.name);

    let offer_id = format!("{}#Offer", ctx.page_url);

    let mut loan_node = json!({
        "@type": "LoanOrCredit",
        "@id": format!("{}#LoanOrCredit", ctx.page_url),
        "url": ctx.page_url,
        "name": ctx.name,
        "provider": [
            organization_reference_by_key("naranja_digital"),
            organization_reference_by_key("tarjeta_naranja"),
        ],
        "mainEntityOfPage": ctx.page_url,
        "offers": {"@id": offer_id},
        "loanType": loan_type_value,
    });
    let loan_map = loan_node.as_object_mut().expect("loan node is an object");

    if let Some(currency) = currency_value {
        loan_map.insert("currency".into(), json!(currency));
    }

    if let Some(amount_map) = amount_cfg.as_object().filter(|map| !map.is_empty()) {
        let mut amount_node = json!({"@type": "MonetaryAmount"});
        let node_map = amount_node.as_object_mut().expect("amount node is an object");
        let amount_currency = amount_map
            .get("currency")
            .and_then(Value::as_str)
            .or(currency_value);
        if let Some(currency) = amount_currency.filter(|text| !text.is_empty()) {
            node_map.insert("currency".into(), json!(currency));
        }
        for key in ["minValue", "maxValue"] {
            if let Some(value) = amount_map.get(key).filter(|value| !value.is_null()) {
                node_map.insert(key.to_string(), value.clone());
            }
        }
        if node_map.len() > 1 {
            loan_map.insert("amount".into(), amount_node);
        }
    }

    if let Some(term) = quantitative_node(field(&defaults, "loan_term")) {
        loan_map.insert("loanTerm".into(), term);
    }
    if let Some(interest) = quantitative_node(field(&defaults, "interest_rate")) {
        loan_map.insert("interestRate".into(), interest);
    }
    if let Some(apr) = quantitative_node(field(&defaults, "annual_percentage_rate")) {
        loan_map.insert("annualPercentageRate".into(), apr);
    }

    let repayment_cfg = field(&defaults, "loan_repayment_form");
    if let Some(repayment_map) = repayment_cfg.as_object().filter(|map| !map.is_empty()) {
        let mut repayment_node = json!({
            "@type": repayment_map
                .get("@type")
                .and_then(Value::as_str)
                .unwrap_or("RepaymentSpecification"),
        });
        let node_map = repayment_node
            .as_object_mut()
            .expect("repayment node is an object");
        for key in ["name", "description"] {
            if let Some(text) = repayment_map
                .get(key)
                .and_then(Value::as_str)
                .filter(|text| !text.is_empty())
            {
                node_map.insert(key.to_string(), json!(text));
            }
        }
        if node_map.len() > 1 {
            loan_map.insert("loanRepaymentForm".into(), repayment_node);
        }
    }

    if let Some(image) = &ctx.image_url {
        loan_map.insert(
            "image".into(),
            json!({
                "@type": "ImageObject",
                "@id": format!("{}#LoanImage", ctx.page_url),
                "url": image,
            }),
        );
    }
    graph.push(loan_node);

    let offer_price = price_string(
        overrides
            .price_spec
            .as_ref()
            .and_then(|spec| spec.get("price")),
    );

    let offer = build_offer_node(
        &ctx.page_url,
        &offer_id,
        json!({
            "name": ctx.name,
            "priceCurrency": "ARS",
            "areaServed": "AR",
            "availability": "https://schema.org/InStock",
            "priceValidUntil": config::price_valid_until_default(),
            "price": offer_price,
        }),
    );
    graph.push(offer);

    graph.push(build_product_node(
        &format!("{}#Product", ctx.page_url),
        &ctx.name,
        ctx.image_url.as_deref(),
        ctx.aggregate_rating.as_ref(),
        Some(&ctx.description),
        Some(json!({"url": ctx.page_url, "offers": {"@id": offer_id}})),
    ));

    if let Some(faq_page) = build_faq_page(&ctx.faqs, &format!("{}#FAQPage", ctx.page_url), None) {
        graph.push(faq_page);
    }

    graph.push(build_webpage_node(ctx, None));

    append_organization(
        &mut graph,
        resolve_organization(None, "naranja_digital"),
        &mut added_orgs,
    );
    append_organization(
        &mut graph,
        resolve_organization(None, "tarjeta_naranja"),
        &mut added_orgs,
    );

    graph
}

pub fn build_bank_account_graph(ctx: &SchemaContext, overrides: &GraphOverrides) -> Vec<Value> {
    let mut graph = Vec::new();
    let mut added_orgs = HashSet::new();

    let cfg = overrides.bank_defaults.as_ref().unwrap_or(&NULL);
    let today = config::today().to_string();
    let next_year_end = config::end_of_next_year();

    let price_currency = str_or(cfg, "price_currency", "ARS");
    let valid_from = str_or(cfg, "valid_from", &today);
    let valid_through = str_or(cfg, "valid_through", &next_year_end);

    let area_served_place = json!({
        "@type": "Place",
        "name": "Argentina",
        "address": {"@type": "PostalAddress", "addressCountry": "AR"},
    });

    let offer_id = format!("{}#Offer", ctx.page_url);

    let bank_account = json!({
        "@type": "BankAccount",
        "@id": format!("{}#bankaccount", ctx.page_url),
        "name": ctx.name,
        "description": ctx.description,
        "areaServed": area_served_place.clone(),
        "provider": organization_reference_by_key("tarjeta_naranja"),
        "offers": {"@id": offer_id},
    });
    graph.push(bank_account);

    let price_valid_until = nonempty_str(cfg, "price_valid_until").unwrap_or(valid_through);

    let offer = build_offer_node(
        &ctx.page_url,
        &offer_id,
        json!({
            "priceCurrency": price_currency,
            "availability": "https://schema.org/InStock",
            "validFrom": valid_from,
            "validThrough": valid_through,
            "areaServed": area_served_place,
            "eligibleRegion": "AR",
            "seller": organization_reference_by_key("tarjeta_naranja"),
            "priceValidUntil": price_valid_until,
            "price": price_string(cfg.get("price")),
        }),
    );
    graph.push(offer);

    graph.push(build_product_node(
        &format!("{}#Product", ctx.page_url),
        &ctx.name,
        ctx.image_url.as_deref(),
        ctx.aggregate_rating.as_ref(),
        Some(&ctx.description),
        Some(json!({"url": ctx.page_url, "offers": {"@id": offer_id}})),
    ));

    if let Some(faq_page) = build_faq_page(
        &ctx.faqs,
        &format!("{}#faq", ctx.page_url),
        Some(json!({
            "url": ctx.page_url,
            "name": format!("Preguntas frecuentes sobre {}", ctx.name),
            "inLanguage": config::DEFAULT_LANGUAGE,
        })),
    ) {
        graph.push(faq_page);
    }

    graph.push(build_webpage_node(ctx, None));

    append_organization(
        &mut graph,
        resolve_organization(None, "tarjeta_naranja"),
        &mut added_orgs,
    );

    graph
}

pub fn build_payment_service_graph(ctx: &SchemaContext, overrides: &GraphOverrides) -> Vec<Value> {
    let mut graph = Vec::new();
    let mut added_orgs = HashSet::new();

    let cfg = deep_merge(
        &config::PAYMENT_SERVICE_DEFAULTS,
        overrides.payment_service_defaults.as_ref().unwrap_or(&NULL),
    );
    let area_served = field(&cfg, "area_served").clone();
    let provider = resolve_organization(cfg.get("provider"), "naranja_x");

    let offer_id = format!("{}#Offer", ctx.page_url);

    let mut service_node = json!({
        "@type": "PaymentService",
        "@id": format!("{}#PaymentService", ctx.page_url),
        "name": ctx.name,
        "description": ctx.description,
        "areaServed": area_served.clone(),
        "provider": organization_reference(&provider),
        "offers": {"@id": offer_id},
    });
    if let Some(image) = &ctx.image_url {
        apply_extra(&mut service_node, json!({"image": image}));
    }
    graph.push(service_node);

    let offer_cfg = field(&cfg, "offer");
    let today = config::today().to_string();
    let next_year_end = config::end_of_next_year();
    let valid_from = str_or(offer_cfg, "valid_from", &today);
    let valid_through = str_or(offer_cfg, "valid_through", &next_year_end);
    let availability_starts = str_or(offer_cfg, "availability_starts", valid_from);
    let price_valid_until = nonempty_str(offer_cfg, "price_valid_until")
        .map(str::to_string)
        .unwrap_or_else(config::price_valid_until_default);

    let offer = build_offer_node(
        &ctx.page_url,
        &offer_id,
        json!({
            "priceCurrency": str_or(offer_cfg, "price_currency", "ARS"),
            "areaServed": area_served,
            "validFrom": valid_from,
            "validThrough": valid_through,
            "availabilityStarts": availability_starts,
            "eligibleRegion": str_or(offer_cfg, "eligible_region", "AR"),
            "priceValidUntil": price_valid_until,
            "price": price_string(offer_cfg.get("price")),
        }),
    );
    graph.push(offer);

    let mut brand_ref = organization_reference(&provider);
    apply_extra(&mut brand_ref, json!({"@type": "Organization"}));

    graph.push(build_product_node(
        &format!("{}#Product", ctx.page_url),
        &ctx.name,
        ctx.image_url.as_deref(),
        ctx.aggregate_rating.as_ref(),
        Some(&ctx.description),
        Some(json!({
            "url": ctx.page_url,
            "brand": brand_ref,
            "offers": {"@id": offer_id},
        })),
    ));

    if let Some(faq_page) = build_faq_page(&ctx.faqs, &format!("{}#FAQPage", ctx.page_url), None) {
        graph.push(faq_page);
    }

    graph.push(build_webpage_node(ctx, None));

    append_organization(&mut graph, provider, &mut added_orgs);

    graph
}

pub fn build_financial_product_graph(
    ctx: &SchemaContext,
    overrides: &GraphOverrides,
) -> Vec<Value> {
    let mut graph = Vec::new();
    let mut added_orgs = HashSet::new();

    let defaults = &*config::FINANCIAL_PRODUCT_DEFAULTS;
    let ov = overrides
        .financial_product_defaults
        .as_ref()
        .unwrap_or(&NULL);

    let area_served = ov
        .get("area_served")
        .cloned()
        .unwrap_or_else(|| field(defaults, "area_served").clone());

    let provider_cfg = deep_merge(field(defaults, "provider"), field(ov, "provider"));
    let provider = resolve_organization(
        Some(&provider_cfg),
        str_or(field(defaults, "provider"), "org_key", "tarjeta_naranja"),
    );

    let rates = ov
        .get("rates")
        .unwrap_or(&*config::FINANCIAL_PRODUCT_ZERO_RATES);
    let rates_line = rates_text(rates);

    let offer_defaults = field(defaults, "offer");
    let offer_overrides = field(ov, "offer");
    let valid_from = nonempty_str(offer_overrides, "valid_from")
        .map(str::to_string)
        .unwrap_or_else(|| offset_date(offer_defaults, "valid_from_offset", 0));
    let valid_through = nonempty_str(offer_overrides, "valid_through")
        .map(str::to_string)
        .unwrap_or_else(|| offset_date(offer_defaults, "valid_through_offset", 30));
    let price_currency = str_or(
        offer_overrides,
        "price_currency",
        str_or(offer_defaults, "price_currency", "ARS"),
    );
    let billing_increment = str_or(
        offer_overrides,
        "billing_increment",
        str_or(offer_defaults, "billing_increment", "1"),
    );
    let min_price = str_or(
        offer_overrides,
        "min_price",
        str_or(offer_defaults, "min_price", "0"),
    );
    let offer_area_served = offer_overrides
        .get("area_served")
        .or_else(|| offer_defaults.get("area_served"))
        .cloned()
        .unwrap_or_else(|| area_served.clone());
    let description_template = str_or(
        offer_overrides,
        "description_template",
        str_or(
            offer_defaults,
            "description_template",
            "Características financieras: {rates_text}.",
        ),
    );
    let offer_description = nonempty_str(offer_overrides, "description")
        .map(str::to_string)
        .unwrap_or_else(|| description_template.replace("{rates_text}", &rates_line));

    let identifier = ov
        .get("identifier")
        .or_else(|| defaults.get("identifier"))
        .cloned()
        .filter(|value| !value.is_null() && value.as_str() != Some(""))
        .or_else(|| {
            let slug = slugify(&ctx.name);
            (!slug.is_empty()).then(|| json!(slug))
        });

    let product_defaults = field(defaults, "product");
    let product_overrides = field(ov, "product");
    let product_id_suffix = str_or(
        product_overrides,
        "id_suffix",
        str_or(product_defaults, "id_suffix", "#Product"),
    );
    let product_id = nonempty_str(product_overrides, "id")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}{}", ctx.page_url, product_id_suffix));
    let product_name = str_or(
        product_overrides,
        "name",
        str_or(product_defaults, "name", &ctx.name),
    );

    let faq_id_suffix = str_or(ov, "faq_id_suffix", str_or(defaults, "faq_id_suffix", "#FAQPage"));
    let faq_id = format!("{}{}", ctx.page_url, faq_id_suffix);

    let offer_id = format!("{}#Offer", ctx.page_url);

    let mut financial_product = json!({
        "@type": "FinancialProduct",
        "@id": format!("{}#FinancialProduct", ctx.page_url),
        "name": ctx.name,
        "description": ctx.description,
        "areaServed": area_served,
        "provider": organization_reference(&provider),
        "offers": {"@id": offer_id},
    });
    let product_map = financial_product
        .as_object_mut()
        .expect("anchor node is an object");
    if let Some(image) = &ctx.image_url {
        product_map.insert("image".into(), json!(image));
    }
    if let Some(identifier) = identifier {
        product_map.insert("identifier".into(), identifier);
    }
    graph.push(financial_product);

    append_organization(&mut graph, provider, &mut added_orgs);

    let offer = build_offer_node(
        &ctx.page_url,
        &offer_id,
        json!({
            "priceCurrency": price_currency,
            "areaServed": offer_area_served,
            "validFrom": valid_from,
            "validThrough": valid_through,
            "itemOffered": {"@id": product_id},
            "priceValidUntil": config::price_valid_until_default(),
            "price": min_price,
            "priceSpecification": {
                "@type": "UnitPriceSpecification",
                "billingIncrement": billing_increment,
                "price": min_price,
                "priceCurrency": price_currency,
                "description": offer_description,
            },
        }),
    );
    graph.push(offer);

    graph.push(build_product_node(
        &product_id,
        product_name,
        ctx.image_url.as_deref(),
        ctx.aggregate_rating.as_ref(),
        Some(&ctx.description),
        Some(json!({"url": ctx.page_url, "offers": {"@id": offer_id}})),
    ));

    if let Some(faq_page) = build_faq_page(&ctx.faqs, &faq_id, None) {
        graph.push(faq_page);
    }

    graph.push(build_webpage_node(ctx, None));

    graph
}

pub fn build_investment_or_deposit_graph(
    ctx: &SchemaContext,
    overrides: &GraphOverrides,
) -> Vec<Value> {
    let mut graph = Vec::new();
    let mut added_orgs = HashSet::new();

    let defaults = &*config::INVESTMENT_OR_DEPOSIT_DEFAULTS;
    let ov = overrides.investment_defaults.as_ref().unwrap_or(&NULL);

    let area_served = ov
        .get("area_served")
        .cloned()
        .unwrap_or_else(|| field(defaults, "area_served").clone());

    let combined_globals = shallow_section_merge(field(defaults, "globals"), field(ov, "globals"));

    let provider_cfg = deep_merge(field(defaults, "provider"), field(ov, "provider"));
    let provider = resolve_organization(
        Some(&provider_cfg),
        str_or(field(defaults, "provider"), "org_key", "naranja_x"),
    );

    let investment_defaults_cfg = field(defaults, "investment");
    let investment_overrides = field(ov, "investment");

    let investment_types = investment_overrides
        .get("types")
        .or_else(|| investment_defaults_cfg.get("types"))
        .cloned()
        .unwrap_or_else(|| json!(["InvestmentOrDeposit"]));
    let investment_types = match investment_types {
        Value::String(single) => json!([single]),
        other => other,
    };

    let investment_id_suffix = str_or(
        investment_overrides,
        "id_suffix",
        str_or(investment_defaults_cfg, "id_suffix", "#investment"),
    );
    let investment_id = nonempty_str(investment_overrides, "id")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}{}", ctx.page_url, investment_id_suffix));
    let alternate_name = investment_overrides
        .get("alternate_name")
        .or_else(|| investment_defaults_cfg.get("alternate_name"))
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty());
    let service_type = investment_overrides
        .get("service_type")
        .or_else(|| investment_defaults_cfg.get("service_type"))
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty());
    let audience = investment_overrides
        .get("audience")
        .or_else(|| investment_defaults_cfg.get("audience"))
        .cloned()
        .filter(|value| !value.is_null());

    let identifier = ov
        .get("identifier")
        .or_else(|| investment_overrides.get("identifier"))
        .cloned()
        .filter(|value| !value.is_null() && value.as_str() != Some(""))
        .or_else(|| {
            let slug = slugify(&ctx.name);
            (!slug.is_empty()).then(|| json!(slug))
        });

    let interest_defaults = field(investment_defaults_cfg, "interest_rate");
    let interest_overrides = field(investment_overrides, "interest_rate");
    let interest_type = str_or(
        interest_overrides,
        "type",
        str_or(interest_defaults, "type", "QuantitativeValue"),
    );
    let interest_unit = str_or(
        interest_overrides,
        "unit_text",
        str_or(interest_defaults, "unit_text", "TNA"),
    );
    let default_rate_value = interest_defaults
        .get("value")
        .cloned()
        .unwrap_or_else(|| combined_globals.get("interest_rate").cloned().unwrap_or(json!("")));
    let interest_value = interest_overrides
        .get("value")
        .cloned()
        .unwrap_or(default_rate_value);

    let offer_defaults_cfg = field(defaults, "offer");
    let offer_overrides = field(ov, "offer");
    let offer_id_suffix = str_or(
        offer_overrides,
        "id_suffix",
        str_or(offer_defaults_cfg, "id_suffix", "#offer"),
    );
    let offer_id = nonempty_str(offer_overrides, "id")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}{}", ctx.page_url, offer_id_suffix));
    let offer_price_currency = str_or(
        offer_overrides,
        "price_currency",
        str_or(offer_defaults_cfg, "price_currency", "ARS"),
    );
    let offer_area_served = offer_overrides
        .get("area_served")
        .or_else(|| offer_defaults_cfg.get("area_served"))
        .cloned()
        .unwrap_or_else(|| area_served.clone());
    let offer_eligible_region = offer_overrides
        .get("eligible_region")
        .or_else(|| offer_defaults_cfg.get("eligible_region"))
        .cloned()
        .unwrap_or_else(|| area_served.clone());
    let offer_availability = str_or(
        offer_overrides,
        "availability",
        str_or(offer_defaults_cfg, "availability", "https://schema.org/InStock"),
    );

    let valid_from = nonempty_str(offer_overrides, "valid_from")
        .map(str::to_string)
        .unwrap_or_else(|| offset_date(offer_defaults_cfg, "valid_from_offset", 0));
    let valid_through = nonempty_str(offer_overrides, "valid_through")
        .map(str::to_string)
        .unwrap_or_else(|| offset_date(offer_defaults_cfg, "valid_through_offset", 0));

    let offer_name = nonempty_str(offer_overrides, "name")
        .map(str::to_string)
        .unwrap_or_else(|| {
            if !ctx.name.is_empty() {
                ctx.name.clone()
            } else {
                str_or(investment_overrides, "name", &ctx.name).to_string()
            }
        });
    let offer_duration = nonempty_str(offer_overrides, "eligible_duration")
        .map(str::to_string)
        .or_else(|| {
            combined_globals
                .get("duration")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_default();

    let product_defaults_cfg = field(defaults, "product");
    let product_overrides = field(ov, "product");
    let product_id_suffix = str_or(
        product_overrides,
        "id_suffix",
        str_or(product_defaults_cfg, "id_suffix", "#product"),
    );
    let product_id = nonempty_str(product_overrides, "id")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}{}", ctx.page_url, product_id_suffix));

    let faq_id_suffix = str_or(ov, "faq_id_suffix", str_or(defaults, "faq_id_suffix", "#FAQPage"));
    let faq_id = format!("{}{}", ctx.page_url, faq_id_suffix);

    let mut investment_node = json!({
        "@type": investment_types,
        "@id": investment_id,
        "name": ctx.name,
        "description": ctx.description,
        "areaServed": area_served,
        "mainEntityOfPage": ctx.page_url,
        "provider": provider.clone(),
        "offers": {"@id": offer_id},
        "interestRate": {
            "@type": interest_type,
            "unitText": interest_unit,
        },
    });
    let investment_map = investment_node
        .as_object_mut()
        .expect("investment node is an object");

    if let Some(alternate_name) = alternate_name {
        investment_map.insert("alternateName".into(), json!(alternate_name));
    }
    if let Some(service_type) = service_type {
        investment_map.insert("serviceType".into(), json!(service_type));
    }
    if let Some(audience) = audience {
        investment_map.insert("audience".into(), audience);
    }
    if let Some(image) = &ctx.image_url {
        investment_map.insert("image".into(), json!(image));
    }
    if let Some(identifier) = identifier {
        investment_map.insert("identifier".into(), identifier);
    }

    let has_rate_value = match &interest_value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        _ => true,
    };
    if has_rate_value {
        if let Some(rate_map) = investment_map
            .get_mut("interestRate")
            .and_then(Value::as_object_mut)
        {
            rate_map.insert("value".into(), interest_value);
        }
    }

    graph.push(investment_node);

    append_organization(&mut graph, provider, &mut added_orgs);

    let offer = build_offer_node(
        &ctx.page_url,
        &offer_id,
        json!({
            "name": offer_name,
            "priceCurrency": offer_price_currency,
            "areaServed": offer_area_served,
            "eligibleRegion": offer_eligible_region,
            "availability": offer_availability,
            "validFrom": valid_from,
            "validThrough": valid_through,
            "priceValidUntil": config::price_valid_until_default(),
            "eligibleDuration": offer_duration,
        }),
    );
    graph.push(offer);

    graph.push(build_product_node(
        &product_id,
        &ctx.name,
        ctx.image_url.as_deref(),
        ctx.aggregate_rating.as_ref(),
        Some(&ctx.description),
        Some(json!({"url": ctx.page_url, "offers": {"@id": offer_id}})),
    ));

    if let Some(faq_page) = build_faq_page(&ctx.faqs, &faq_id, None) {
        graph.push(faq_page);
    }

    graph.push(build_webpage_node(ctx, None));

    graph
}

pub fn build_insurance_agency_graph(ctx: &SchemaContext, overrides: &GraphOverrides) -> Vec<Value> {
    let mut graph = Vec::new();
    let mut added_orgs = HashSet::new();

    let defaults = &*config::INSURANCE_AGENCY_DEFAULTS;
    let ov = overrides.insurance_defaults.as_ref().unwrap_or(&NULL);

    let agency_base = field(defaults, "agency");
    let agency_overrides = field(ov, "agency");

    let identifier_map = shallow_section_merge(
        field(agency_base, "identifier"),
        field(agency_overrides, "identifier"),
    );
    let has_identifier = identifier_map
        .get("propertyID")
        .and_then(Value::as_str)
        .is_some_and(|text| !text.is_empty())
        && identifier_map
            .get("value")
            .and_then(Value::as_str)
            .is_some_and(|text| !text.is_empty());

    let mut logo_map =
        shallow_section_merge(field(agency_base, "logo"), field(agency_overrides, "logo"));
    let logo_has_url = logo_map
        .get("url")
        .and_then(Value::as_str)
        .is_some_and(|text| !text.is_empty());
    if !logo_has_url {
        if let Some(image) = &ctx.image_url {
            logo_map.insert("url".into(), json!(image));
        }
    }

    let same_as = agency_overrides
        .get("same_as")
        .or_else(|| agency_base.get("same_as"))
        .cloned()
        .unwrap_or_else(|| json!([]));
    let same_as = match same_as {
        Value::String(single) => json!([single]),
        other => other,
    };
    let has_same_as = same_as.as_array().is_some_and(|list| !list.is_empty());

    let area_served = ov
        .get("area_served")
        .or_else(|| agency_base.get("area_served"))
        .cloned()
        .unwrap_or_else(|| json!("AR"));
    let addresses = ov
        .get("addresses")
        .or_else(|| agency_base.get("addresses"))
        .cloned()
        .filter(|value| !value.is_null());

    let agency_id_suffix = str_or(
        agency_overrides,
        "id_suffix",
        str_or(agency_base, "id_suffix", "#insurance-agency"),
    );
    let agency_id = nonempty_str(agency_overrides, "id")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}{}", ctx.page_url, agency_id_suffix));

    let mut agency_node = json!({
        "@type": "InsuranceAgency",
        "@id": agency_id,
        "name": ctx.name,
        "description": ctx.description,
        "areaServed": area_served,
        "url": ctx.page_url,
    });
    let agency_map = agency_node.as_object_mut().expect("agency node is an object");
    if has_identifier {
        agency_map.insert("identifier".into(), Value::Object(identifier_map));
    }
    if !logo_map.is_empty() {
        agency_map.insert("logo".into(), Value::Object(logo_map));
    }
    if let Some(addresses) = addresses {
        agency_map.insert("address".into(), addresses);
    }
    if has_same_as {
        agency_map.insert("sameAs".into(), same_as);
    }
    graph.push(agency_node);

    // the agency node already owns this @id; never emit a second node for it
    added_orgs.insert(agency_id.clone());

    let offer_defaults = field(defaults, "offer");
    let offer_overrides = field(ov, "offer");
    let offer_id_suffix = str_or(
        offer_overrides,
        "id_suffix",
        str_or(offer_defaults, "id_suffix", "#offer"),
    );
    let offer_id = nonempty_str(offer_overrides, "id")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}{}", ctx.page_url, offer_id_suffix));
    let offer_name = str_or(
        offer_overrides,
        "name",
        str_or(offer_defaults, "name", &ctx.name),
    );
    let price_valid_until = nonempty_str(offer_overrides, "price_valid_until")
        .map(str::to_string)
        .unwrap_or_else(config::price_valid_until_default);

    let offer_price = price_string(
        offer_overrides
            .get("price")
            .or_else(|| offer_defaults.get("price")),
    );

    let offer = build_offer_node(
        &ctx.page_url,
        &offer_id,
        json!({
            "name": offer_name,
            "priceCurrency": str_or(
                offer_overrides,
                "price_currency",
                str_or(offer_defaults, "price_currency", "ARS"),
            ),
            "availability": str_or(
                offer_overrides,
                "availability",
                str_or(offer_defaults, "availability", "https://schema.org/InStock"),
            ),
            "areaServed": str_or(
                offer_overrides,
                "area_served",
                str_or(offer_defaults, "area_served", "AR"),
            ),
            "eligibleRegion": str_or(
                offer_overrides,
                "eligible_region",
                str_or(offer_defaults, "eligible_region", "AR"),
            ),
            "priceValidUntil": price_valid_until,
            "price": offer_price,
        }),
    );
    graph.push(offer);

    let product_defaults = field(defaults, "product");
    let product_overrides = field(ov, "product");
    let product_id_suffix = str_or(
        product_overrides,
        "id_suffix",
        str_or(product_defaults, "id_suffix", "#producto"),
    );
    let product_id = nonempty_str(product_overrides, "id")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}{}", ctx.page_url, product_id_suffix));

    let mut product = build_product_node(
        &product_id,
        &ctx.name,
        ctx.image_url.as_deref(),
        ctx.aggregate_rating.as_ref(),
        Some(&ctx.description),
        Some(json!({"url": ctx.page_url, "offers": {"@id": offer_id}})),
    );
    let product_category = nonempty_str(product_overrides, "category")
        .or_else(|| nonempty_str(product_defaults, "category"));
    if let Some(category) = product_category {
        apply_extra(&mut product, json!({"category": category}));
    }
    graph.push(product);

    if let Some(faq_page) = build_faq_page(&ctx.faqs, &format!("{}#FAQPage", ctx.page_url), None) {
        graph.push(faq_page);
    }

    graph.push(build_webpage_node(ctx, None));

    append_organization(
        &mut graph,
        resolve_organization(Some(&json!({"@id": agency_id})), "naranja_x"),
        &mut added_orgs,
    );

    graph
}

pub fn build_blog_posting_graph(ctx: &SchemaContext, overrides: &GraphOverrides) -> Vec<Value> {
    let mut graph = Vec::new();
    let mut added_orgs = HashSet::new();

    let cfg = overrides.blog_defaults.as_ref().unwrap_or(&NULL);

    let author_org = resolve_organization(cfg.get("author"), "naranja_x");
    let publisher_org = resolve_organization(cfg.get("publisher"), "naranja_x");

    let editor_names: Vec<String> = cfg
        .get("editors")
        .and_then(Value::as_array)
        .filter(|names| !names.is_empty())
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_else(|| {
            vec![
                "Natalí Ciappini".to_string(),
                "Francisco Piccini".to_string(),
            ]
        });
    let editors: Vec<Value> = editor_names
        .iter()
        .filter(|name| !name.is_empty())
        .map(|name| json!({"@type": "Person", "name": name}))
        .collect();

    let article_body = ctx.body_text.clone().unwrap_or_default();
    let word_count = if article_body.is_empty() {
        0
    } else {
        WORD_RE.find_iter(&article_body).count()
    };

    let mut author_ref = organization_reference(&author_org);
    apply_extra(&mut author_ref, json!({"@type": "Organization"}));
    let mut publisher_ref = organization_reference(&publisher_org);
    apply_extra(&mut publisher_ref, json!({"@type": "Organization"}));

    let in_language = str_or(cfg, "in_language", config::DEFAULT_LANGUAGE);

    let mut blog_posting = json!({
        "@type": "BlogPosting",
        "@id": format!("{}#BlogPosting", ctx.page_url),
        "url": ctx.page_url,
        "headline": str_or(cfg, "headline", &ctx.name),
        "description": str_or(cfg, "description", &ctx.description),
        "mainEntityOfPage": {"@type": "WebPage", "@id": format!("{}#WebPage", ctx.page_url)},
        "author": author_ref,
        "publisher": publisher_ref.clone(),
        "inLanguage": in_language,
    });
    let blog_map = blog_posting.as_object_mut().expect("blog node is an object");

    if !editors.is_empty() {
        blog_map.insert("editor".into(), json!(editors));
    }
    if let Some(image) = &ctx.image_url {
        blog_map.insert("image".into(), json!([image]));
    }
    if !article_body.is_empty() {
        blog_map.insert("articleBody".into(), json!(article_body));
    }
    if word_count > 0 {
        blog_map.insert("wordCount".into(), json!(word_count));
    }

    let date_published = nonempty_str(cfg, "date_published").or_else(|| nonempty_str(cfg, "datePublished"));
    if let Some(date) = date_published {
        blog_map.insert("datePublished".into(), json!(date));
    }
    let date_modified = nonempty_str(cfg, "date_modified").or_else(|| nonempty_str(cfg, "dateModified"));
    if let Some(date) = date_modified {
        blog_map.insert("dateModified".into(), json!(date));
    }

    let article_section =
        nonempty_str(cfg, "article_section").or_else(|| nonempty_str(cfg, "articleSection"));
    if let Some(section) = article_section {
        blog_map.insert("articleSection".into(), json!(section));
    }

    if let Some(keywords) = cfg.get("keywords").filter(|value| !value.is_null()) {
        blog_map.insert("keywords".into(), keywords.clone());
    }

    if let Some(extra) = cfg.get("extra").cloned() {
        apply_extra(&mut blog_posting, extra);
    }

    graph.push(blog_posting);

    graph.push(build_webpage_node(
        ctx,
        Some(json!({
            "publisher": publisher_ref,
            "inLanguage": in_language,
        })),
    ));

    append_organization(&mut graph, author_org, &mut added_orgs);
    append_organization(&mut graph, publisher_org, &mut added_orgs);

    graph
}

// Offer catalog attachment ----------------------------------------------------

/// Resolves a named catalog into an OfferCatalog node plus its provider
/// organization. Unknown keys or catalogs with no valid items yield nothing
/// to attach.
pub fn build_offer_catalog_node(
    page_url: &str,
    catalog_key: &str,
) -> (Option<Value>, Option<Value>) {
    let Some(catalog) = config::offer_catalog(catalog_key) else {
        return (None, None);
    };

    let catalog_name = str_or(catalog, "name", catalog_key);
    let suffix = {
        let slug = slugify(catalog_name);
        if slug.is_empty() {
            catalog_key.to_string()
        } else {
            slug
        }
    };
    let node_id = format!("{page_url}#OfferCatalog{suffix}");

    let mut item_list = Vec::new();
    let items = catalog
        .get("items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    for (index, item) in items.iter().enumerate() {
        let Some(name) = nonempty_str(item, "name") else {
            continue;
        };
        let Some(url) = nonempty_str(item, "url") else {
            continue;
        };
        let offer_id = format!("{}-Offer{}", node_id, index + 1);

        let item_id_override = nonempty_str(item, "item_id").or_else(|| nonempty_str(item, "@id"));
        let id_suffix = nonempty_str(item, "id_suffix");
        let item_type = str_or(item, "item_type", "Product");

        let item_offered = if let Some(item_id) = item_id_override {
            json!({"@id": item_id})
        } else if let Some(suffix) = id_suffix {
            json!({"@id": format!("{url}{suffix}")})
        } else {
            json!({"@type": item_type, "name": name, "url": url})
        };

        let offer_props = field(item, "offer");
        let offer_price = price_string(
            offer_props
                .get("price")
                .or_else(|| catalog.get("default_price")),
        );
        let offer_currency = nonempty_str(offer_props, "priceCurrency")
            .or_else(|| nonempty_str(offer_props, "price_currency"))
            .unwrap_or_else(|| str_or(catalog, "price_currency", "ARS"));
        let offer_availability = nonempty_str(offer_props, "availability")
            .unwrap_or_else(|| str_or(catalog, "availability", "https://schema.org/InStock"));
        let offer_price_valid_until = nonempty_str(offer_props, "priceValidUntil")
            .or_else(|| nonempty_str(offer_props, "price_valid_until"))
            .or_else(|| nonempty_str(catalog, "price_valid_until"))
            .map(str::to_string)
            .unwrap_or_else(config::price_valid_until_default);

        item_list.push(json!({
            "@type": "Offer",
            "@id": offer_id,
            "name": name,
            "price": offer_price,
            "priceCurrency": offer_currency,
            "availability": offer_availability,
            "priceValidUntil": offer_price_valid_until,
            "itemOffered": item_offered,
            "url": url,
        }));
    }

    if item_list.is_empty() {
        return (None, None);
    }

    let catalog_node = json!({
        "@type": "OfferCatalog",
        "@id": node_id,
        "name": catalog_name,
        "itemListElement": item_list,
    });

    let provider_key = str_or(catalog, "provider", "naranja_x");
    let provider_org = config::organization(provider_key).cloned();

    (Some(catalog_node), provider_org)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::FaqEntry;

    fn context() -> SchemaContext {
        SchemaContext {
            page_url: "https://www.naranjax.com/prestamos/express".to_string(),
            name: "Préstamo Express".to_string(),
            description: "Pedí tu préstamo online.".to_string(),
            image_url: Some("https://www.naranjax.com/img/prestamo.png".to_string()),
            faqs: vec![FaqEntry {
                question: "¿Cómo pido el préstamo?".to_string(),
                answer: "Desde la app.".to_string(),
            }],
            body_text: Some("Pedí tu préstamo cien por ciento online".to_string()),
            aggregate_rating: Some(config::DEFAULT_AGG_RATING.clone()),
        }
    }

    fn node_types(graph: &[Value]) -> Vec<String> {
        graph
            .iter()
            .filter_map(|node| node.get("@type"))
            .map(|t| match t {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    }

    fn find<'a>(graph: &'a [Value], type_name: &str) -> &'a Value {
        graph
            .iter()
            .find(|node| node.get("@type").and_then(Value::as_str) == Some(type_name))
            .unwrap_or_else(|| panic!("no {type_name} node"))
    }

    #[test]
    fn payment_card_graph_has_expected_nodes() {
        let ctx = context();
        let graph = build_payment_card_graph(&ctx, &GraphOverrides::default());
        let types = node_types(&graph);
        assert_eq!(
            types,
            vec!["PaymentCard", "Offer", "Product", "FAQPage", "WebPage", "Organization"]
        );

        let offer = find(&graph, "Offer");
        assert_eq!(offer["price"], "0");
        assert_eq!(offer["url"], ctx.page_url);

        let card = find(&graph, "PaymentCard");
        assert_eq!(card["offers"]["@id"], offer["@id"]);
    }

    #[test]
    fn faq_page_is_absent_without_faqs() {
        let mut ctx = context();
        ctx.faqs.clear();
        let graph = build_payment_card_graph(&ctx, &GraphOverrides::default());
        assert!(!node_types(&graph).contains(&"FAQPage".to_string()));
    }

    #[test]
    fn loan_overrides_merge_into_amount_defaults() {
        let ctx = context();
        let overrides = GraphOverrides {
            loan_defaults: Some(json!({"amount": {"maxValue": 500000}})),
            ..Default::default()
        };
        let graph = build_loan_or_credit_graph(&ctx, &overrides);
        let loan = find(&graph, "LoanOrCredit");
        assert_eq!(loan["amount"]["maxValue"], json!(500000));
        assert_eq!(loan["amount"]["minValue"], json!(10000));
        assert_eq!(loan["amount"]["currency"], json!("ARS"));
        assert_eq!(loan["loanType"], json!(ctx.name));
    }

    #[test]
    fn loan_quantitative_node_without_numbers_is_suppressed() {
        let ctx = context();
        let overrides = GraphOverrides {
            loan_defaults: Some(json!({
                "interest_rate": {
                    "minValue": null,
                    "maxValue": null,
                    "unitText": "PERCENT",
                },
            })),
            ..Default::default()
        };
        let graph = build_loan_or_credit_graph(&ctx, &overrides);
        let loan = find(&graph, "LoanOrCredit");
        assert!(loan.get("interestRate").is_none());
        // the untouched APR table still produces its node
        assert_eq!(loan["annualPercentageRate"]["unitText"], json!("PERCENT"));
    }

    #[test]
    fn loan_graph_appends_both_providers_once() {
        let ctx = context();
        let graph = build_loan_or_credit_graph(&ctx, &GraphOverrides::default());
        let orgs: Vec<&Value> = graph
            .iter()
            .filter(|node| node.get("@type").and_then(Value::as_str) == Some("Organization"))
            .collect();
        assert_eq!(orgs.len(), 2);
        let ids: HashSet<&str> = orgs
            .iter()
            .filter_map(|org| org.get("@id").and_then(Value::as_str))
            .collect();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn bank_account_validity_window_defaults() {
        let ctx = context();
        let graph = build_bank_account_graph(&ctx, &GraphOverrides::default());
        let offer = find(&graph, "Offer");
        assert_eq!(offer["validFrom"], json!(config::today().to_string()));
        assert_eq!(offer["validThrough"], json!(config::end_of_next_year()));
        assert_eq!(offer["priceValidUntil"], offer["validThrough"]);
        assert_eq!(offer["price"], json!("0"));

        let account = find(&graph, "BankAccount");
        assert_eq!(account["areaServed"]["@type"], json!("Place"));
    }

    #[test]
    fn payment_service_resolves_configured_provider() {
        let ctx = context();
        let overrides = GraphOverrides {
            payment_service_defaults: Some(json!({"provider": {"org_key": "tarjeta_naranja"}})),
            ..Default::default()
        };
        let graph = build_payment_service_graph(&ctx, &overrides);
        let org = find(&graph, "Organization");
        assert_eq!(org["name"], json!("Tarjeta Naranja S.A.U."));

        let service = find(&graph, "PaymentService");
        assert_eq!(service["provider"]["@id"], org["@id"]);

        let product = find(&graph, "Product");
        assert_eq!(product["brand"]["@type"], json!("Organization"));
    }

    #[test]
    fn financial_product_formats_rates_into_offer_description() {
        let ctx = context();
        let overrides = GraphOverrides {
            financial_product_defaults: Some(json!({
                "rates": {"TNA": 55, "TEA": 71.22},
            })),
            ..Default::default()
        };
        let graph = build_financial_product_graph(&ctx, &overrides);
        let offer = find(&graph, "Offer");
        let description = offer["priceSpecification"]["description"].as_str().unwrap();
        assert_eq!(
            description,
            "Hasta 3 cuotas sin interés. TNA 55 %, TEA 71.22 %."
        );
    }

    #[test]
    fn financial_product_identifier_falls_back_to_slug() {
        let ctx = context();
        let graph = build_financial_product_graph(&ctx, &GraphOverrides::default());
        let anchor = find(&graph, "FinancialProduct");
        assert_eq!(anchor["identifier"], json!("Pr-stamo-Express"));
    }

    #[test]
    fn investment_supports_multiple_types_and_rate_value() {
        let ctx = context();
        let overrides = GraphOverrides {
            investment_defaults: Some(json!({
                "globals": {"duration": "P28D", "interest_rate": "42"},
                "investment": {"types": ["InvestmentOrDeposit", "FinancialProduct"]},
            })),
            ..Default::default()
        };
        let graph = build_investment_or_deposit_graph(&ctx, &overrides);
        let investment = &graph[0];
        assert_eq!(
            investment["@type"],
            json!(["InvestmentOrDeposit", "FinancialProduct"])
        );
        assert_eq!(investment["interestRate"]["value"], json!("42"));
        assert_eq!(investment["interestRate"]["unitText"], json!("TNA"));

        let offer = find(&graph, "Offer");
        assert_eq!(offer["eligibleDuration"], json!("P28D"));
    }

    #[test]
    fn investment_rate_without_value_keeps_bare_unit() {
        let ctx = context();
        let graph = build_investment_or_deposit_graph(&ctx, &GraphOverrides::default());
        let investment = &graph[0];
        assert_eq!(investment["interestRate"]["unitText"], json!("TNA"));
        assert!(investment["interestRate"].get("value").is_none());
    }

    #[test]
    fn insurance_agency_graph_has_unique_ids() {
        let ctx = context();
        let graph = build_insurance_agency_graph(&ctx, &GraphOverrides::default());
        let mut seen = HashSet::new();
        for node in &graph {
            if let Some(id) = node.get("@id").and_then(Value::as_str) {
                assert!(seen.insert(id.to_string()), "duplicate @id: {id}");
            }
        }
        let agency = find(&graph, "InsuranceAgency");
        assert_eq!(agency["identifier"]["propertyID"], json!("CUIT"));
        assert!(agency["address"].is_array());
    }

    #[test]
    fn insurance_identifier_suppressed_when_incomplete() {
        let ctx = context();
        let overrides = GraphOverrides {
            insurance_defaults: Some(json!({
                "agency": {"identifier": {"value": ""}},
            })),
            ..Default::default()
        };
        let graph = build_insurance_agency_graph(&ctx, &overrides);
        let agency = find(&graph, "InsuranceAgency");
        assert!(agency.get("identifier").is_none());
    }

    #[test]
    fn blog_posting_counts_words_and_defaults_editors() {
        let ctx = context();
        let graph = build_blog_posting_graph(&ctx, &GraphOverrides::default());
        let blog = find(&graph, "BlogPosting");
        assert_eq!(blog["wordCount"], json!(7));
        let editors = blog["editor"].as_array().unwrap();
        assert_eq!(editors.len(), 2);
        assert_eq!(editors[0]["name"], json!("Natalí Ciappini"));
    }

    #[test]
    fn blog_posting_single_org_when_author_is_publisher() {
        let ctx = context();
        let graph = build_blog_posting_graph(&ctx, &GraphOverrides::default());
        let orgs: Vec<&Value> = graph
            .iter()
            .filter(|node| node.get("@type").and_then(Value::as_str) == Some("Organization"))
            .collect();
        assert_eq!(orgs.len(), 1);
        assert_eq!(orgs[0]["name"], json!("Naranja X"));
    }

    #[test]
    fn offer_catalog_resolves_three_items() {
        let (node, provider) =
            build_offer_catalog_node("https://www.naranjax.com/seguros", "seguros");
        let node = node.unwrap();
        assert_eq!(node["@type"], json!("OfferCatalog"));
        let items = node["itemListElement"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["price"], json!("0"));
        assert_eq!(
            items[0]["itemOffered"]["@id"],
            json!("https://www.naranjax.com/seguros/vida#producto")
        );
        assert_eq!(
            provider.unwrap()["@id"],
            json!("https://www.naranjax.com/#OrgNaranjaX")
        );
    }

    #[test]
    fn offer_catalog_unknown_key_attaches_nothing() {
        let (node, provider) = build_offer_catalog_node("https://x/p", "inexistente");
        assert!(node.is_none());
        assert!(provider.is_none());
    }

    #[test]
    fn rates_text_trims_trailing_zeros() {
        let text = rates_text(&json!({"TNA": 55, "TEA": 71.22, "CFT": 0}));
        assert_eq!(text, "TNA 55 %, TEA 71.22 %, CFT 0 %");
    }

    #[test]
    fn rates_text_keeps_existing_percent_sign() {
        let text = rates_text(&json!({"TNA": "55%"}));
        assert_eq!(text, "TNA 55%");
    }
}
