use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde_json::{json, Value};
use std::sync::LazyLock;

/// Default language tag applied to WebPage and FAQPage nodes.
pub const DEFAULT_LANGUAGE: &str = "es-AR";

/// Days added to today when no explicit `priceValidUntil` is supplied.
pub const DEFAULT_PRICE_VALIDITY_DAYS: i64 = 365;

const LOGO_URL: &str = "https://images.ctfassets.net/yxlyq25bynna/1IxKUBv3dtISflaWQoSIZW/11e239808ff23ee64b26ba44bfcd93a0/Logo_NX.jpeg";
const INVESTMENT_LOGO_URL: &str = "https://images.ctfassets.net/yxlyq25bynna/5aunl52F9uDLxXLUC8L7O4/b025683cc1824c386a19c478a5dd46ae/isologo-naranjax.png";

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// ISO date used as the default `priceValidUntil` value.
pub fn default_price_valid_until(days: i64) -> String {
    (today() + Duration::days(days)).to_string()
}

pub fn price_valid_until_default() -> String {
    default_price_valid_until(DEFAULT_PRICE_VALIDITY_DAYS)
}

/// December 31st of next year, used as the catch-all offer validity end.
pub fn end_of_next_year() -> String {
    let now = today();
    NaiveDate::from_ymd_opt(now.year() + 1, 12, 31)
        .expect("valid calendar date")
        .to_string()
}

pub static DEFAULT_AGG_RATING: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "@type": "AggregateRating",
        "ratingValue": 4.6,
        "ratingCount": 991000,
        "bestRating": 5,
        "worstRating": 1,
    })
});

// Organizations and addresses ------------------------------------------------

pub static ORGANIZATIONS: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "tarjeta_naranja": {
            "@type": "Organization",
            "@id": "https://www.naranjax.com/#OrgTarjetaNaranja",
            "name": "Tarjeta Naranja S.A.U.",
            "url": "https://www.naranjax.com/",
            "logo": {
                "@type": "ImageObject",
                "@id": "https://www.naranjax.com/#LogoTarjetaNaranja",
                "url": LOGO_URL,
                "contentUrl": LOGO_URL,
            },
            "sameAs": [],
            "identifier": {
                "@type": "PropertyValue",
                "propertyID": "CUIT",
                "value": "30-68537634-9",
            },
        },
        "naranja_digital": {
            "@type": "Organization",
            "@id": "https://www.naranjax.com/#OrgNaranjaDigital",
            "name": "Naranja Digital Compañía Financiera S.A.U.",
            "url": "https://www.naranjax.com/",
            "logo": {
                "@type": "ImageObject",
                "@id": "https://www.naranjax.com/#LogoNaranjaDigital",
                "url": LOGO_URL,
                "contentUrl": LOGO_URL,
            },
            "sameAs": [],
            "identifier": {
                "@type": "PropertyValue",
                "propertyID": "CUIT",
                "value": "30-68537634-9",
            },
        },
        "naranja_x": {
            "@type": "Organization",
            "@id": "https://www.naranjax.com/#OrgNaranjaX",
            "name": "Naranja X",
            "url": "https://www.naranjax.com/",
            "logo": {
                "@type": "ImageObject",
                "@id": "https://www.naranjax.com/#LogoNaranjaX",
                "url": LOGO_URL,
                "contentUrl": LOGO_URL,
            },
            "sameAs": [
                "https://www.linkedin.com/company/naranja-x/",
                "https://twitter.com/naranjax",
            ],
            "identifier": {
                "@type": "PropertyValue",
                "propertyID": "CUIT",
                "value": "30-68537634-9",
            },
        },
    })
});

/// Looks up an organization record by its logical key.
pub fn organization(key: &str) -> Option<&'static Value> {
    ORGANIZATIONS.get(key)
}

/// Looks up an organization record by its stable `@id`.
pub fn organization_by_id(org_id: &str) -> Option<&'static Value> {
    ORGANIZATIONS
        .as_object()
        .and_then(|orgs| {
            orgs.values()
                .find(|org| org.get("@id").and_then(Value::as_str) == Some(org_id))
        })
}

pub static NARANJA_X_ADDRESSES: LazyLock<Value> = LazyLock::new(|| {
    json!([
        {
            "@type": "PostalAddress",
            "name": "Casa Naranja",
            "streetAddress": "La Tablada 451",
            "addressLocality": "Córdoba",
            "addressRegion": "Córdoba",
            "postalCode": "X5000",
            "addressCountry": "AR",
        },
        {
            "@type": "PostalAddress",
            "name": "Naranja X Buenos Aires",
            "streetAddress": "Leiva 4070",
            "addressLocality": "Ciudad Autónoma de Buenos Aires",
            "addressRegion": "Buenos Aires",
            "postalCode": "C1427BQA",
            "addressCountry": "AR",
        },
    ])
});

pub static WEBPAGE_DEFAULTS: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "@type": "WebPage",
        "inLanguage": DEFAULT_LANGUAGE,
        "isPartOf": {
            "@type": "WebSite",
            "@id": "https://www.naranjax.com/#website",
        },
        "publisher": {"@id": "https://www.naranjax.com/#OrgTarjetaNaranja"},
    })
});

// Product defaults -----------------------------------------------------------

pub static PRICE_SPEC_DEFAULT: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "TNA": {"min": 55, "max": 153},
        "TEA": {"min": 71.22, "max": 322.08},
        "CFTEA": {"min": 91.11, "max": 459.39},
    })
});

pub static PAYMENT_SERVICE_DEFAULTS: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "area_served": {"@type": "Country", "name": "Argentina"},
        "provider": {
            "org_key": "naranja_x",
        },
        "offer": {
            "price_currency": "ARS",
            "eligible_region": "AR",
        },
    })
});

pub static INSURANCE_AGENCY_DEFAULTS: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "agency": {
            "id_suffix": "#insurance-agency",
            "area_served": {"@type": "AdministrativeArea", "name": "Argentina"},
            "addresses": NARANJA_X_ADDRESSES.clone(),
            "identifier": {
                "propertyID": "CUIT",
                "value": "30-68537634-9",
            },
            "logo": {
                "id": LOGO_URL,
                "url": LOGO_URL,
                "contentUrl": LOGO_URL,
            },
            "same_as": [],
        },
        "product": {
            "id_suffix": "#producto",
            "category": "Insurance",
        },
        "offer": {
            "id_suffix": "#offer-basica",
            "name": "Cobertura Básica",
            "price_currency": "ARS",
            "availability": "https://schema.org/InStock",
            "area_served": "AR",
            "eligible_region": "AR",
        },
    })
});

pub static FINANCIAL_PRODUCT_ZERO_RATES: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "TNA": 0,
        "TEA": 0,
        "CFT": 0,
    })
});

pub static LOAN_OR_CREDIT_DEFAULTS: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "amount": {
            "currency": "ARS",
            "minValue": 10000,
            "maxValue": 9000000,
        },
        "currency": "ARS",
        "loan_term": {
            "@type": "QuantitativeValue",
            "maxValue": 48,
            "unitText": "MONTH",
        },
        "interest_rate": {
            "minValue": 55.0,
            "maxValue": 153.0,
            "unitText": "PERCENT",
        },
        "annual_percentage_rate": {
            "minValue": 91.11,
            "maxValue": 459.39,
            "unitText": "PERCENT",
        },
        "loan_repayment_form": {
            "@type": "RepaymentSpecification",
            "name": "Sistema de amortización francés",
            "description": "Cuotas fijas mensuales con interés fijo durante todo el plazo (método francés).",
        },
    })
});

pub static FINANCIAL_PRODUCT_DEFAULTS: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "area_served": "AR",
        "provider": {
            "org_key": "tarjeta_naranja",
        },
        "offer": {
            "price_currency": "ARS",
            "billing_increment": "1",
            "min_price": "0",
            "area_served": "AR",
            "valid_from_offset": 0,
            "valid_through_offset": 30,
            "description_template": "Hasta 3 cuotas sin interés. {rates_text}.",
        },
        "product": {
            "id_suffix": "#financial-product",
        },
        "faq_id_suffix": "#FAQPage",
    })
});

pub static INVESTMENT_OR_DEPOSIT_DEFAULTS: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "area_served": "AR",
        "globals": {
            "duration": "",
            "interest_rate": "",
        },
        "provider": {
            "org_key": "naranja_x",
            "overrides": {
                "logo": {
                    "@type": "ImageObject",
                    "@id": "https://www.naranjax.com/#LogoNaranjaXInvestment",
                    "url": INVESTMENT_LOGO_URL,
                    "contentUrl": INVESTMENT_LOGO_URL,
                }
            },
        },
        "investment": {
            "id_suffix": "#producto",
            "types": ["InvestmentOrDeposit"],
            "alternate_name": "Ahorro por objetivos con TNA",
            "service_type": "Ahorro por objetivos con interés (TNA)",
            "audience": {
                "@type": "Audience",
                "audienceType": "Usuarios de banca minorista en Argentina",
            },
            "interest_rate": {
                "type": "QuantitativeValue",
                "unit_text": "TNA",
            },
        },
        "offer": {
            "id_suffix": "#offer",
            "price_currency": "ARS",
            "area_served": "AR",
            "eligible_region": "AR",
            "availability": "https://schema.org/InStock",
            "valid_from_offset": 0,
            "valid_through_offset": 28,
        },
        "product": {
            "id_suffix": "#product",
        },
        "faq_id_suffix": "#FAQPage",
    })
});

// Offer catalogs -------------------------------------------------------------

pub static OFFER_CATALOGS: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "prestamos": {
            "name": "Catálogo de Préstamos",
            "items": [
                {
                    "name": "Préstamos para monotributistas",
                    "url": "https://www.naranjax.com/prestamos/monotributistas",
                    "id_suffix": "#LoanOrCredit",
                },
                {
                    "name": "Préstamos express",
                    "url": "https://www.naranjax.com/prestamos/express",
                    "id_suffix": "#LoanOrCredit",
                },
                {
                    "name": "Préstamos para viajes",
                    "url": "https://www.naranjax.com/prestamos/viajes",
                    "id_suffix": "#LoanOrCredit",
                },
            ],
        },
        "tarjeta_credito": {
            "name": "Catálogo de Tarjetas de Crédito",
            "items": [
                {
                    "name": "Tarjeta Naranja X",
                    "url": "https://www.naranjax.com/tarjetas-de-credito/tarjeta-naranja",
                    "id_suffix": "#PaymentCard",
                },
                {
                    "name": "Tarjeta Naranja X Visa",
                    "url": "https://www.naranjax.com/tarjetas-de-credito/tarjeta-naranja-visa",
                    "id_suffix": "#PaymentCard",
                },
                {
                    "name": "Tarjeta Naranja X Mastercard",
                    "url": "https://www.naranjax.com/tarjetas-de-credito/tarjeta-naranja-mastercard",
                    "id_suffix": "#PaymentCard",
                },
            ],
        },
        "seguros": {
            "name": "Catálogo de Seguros",
            "items": [
                {
                    "name": "Seguro de Vida",
                    "url": "https://www.naranjax.com/seguros/vida",
                    "id_suffix": "#producto",
                },
                {
                    "name": "Seguro para Celulares",
                    "url": "https://www.naranjax.com/seguros/celulares",
                    "id_suffix": "#producto",
                },
                {
                    "name": "Seguro para Hogar",
                    "url": "https://www.naranjax.com/seguros/hogar",
                    "id_suffix": "#producto",
                },
            ],
        },
        "cuenta": {
            "name": "Catálogo de Cuentas",
            "items": [
                {
                    "name": "Cuenta Remunerada",
                    "url": "https://www.naranjax.com/cuenta-remunerada",
                    "id_suffix": "#bankaccount",
                },
                {
                    "name": "Cuenta en Dólares",
                    "url": "https://www.naranjax.com/cuenta-dolar",
                    "id_suffix": "#bankaccount",
                },
                {
                    "name": "Caja de Ahorro",
                    "url": "https://www.naranjax.com/cuentagratuitauniversal",
                    "id_suffix": "#bankaccount",
                },
            ],
        },
    })
});

/// Looks up a named offer catalog.
pub fn offer_catalog(key: &str) -> Option<&'static Value> {
    OFFER_CATALOGS.get(key)
}

/// Keys of all configured offer catalogs, in declaration order.
pub fn offer_catalog_keys() -> Vec<&'static str> {
    OFFER_CATALOGS
        .as_object()
        .map(|catalogs| catalogs.keys().map(String::as_str).collect())
        .unwrap_or_default()
}
