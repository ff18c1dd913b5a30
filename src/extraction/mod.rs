pub mod faqs;
pub mod meta;
pub mod text;

pub use faqs::{extract_faqs, extract_faqs_fallback, extract_faqs_from_accordion, FaqEntry};
pub use meta::{extract_basic_meta, resolve_base_url, PageMeta};
pub use text::{clean_text, extract_flat_text};

use scraper::{Html, Selector};
use std::sync::LazyLock;

static SELECTOR_ARTICLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("article").unwrap());
static SELECTOR_MAIN: LazyLock<Selector> = LazyLock::new(|| Selector::parse("main").unwrap());
static SELECTOR_ROLE_MAIN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[role="main"]"#).unwrap());
static SELECTOR_BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());

/// Flattens the main content region of the page to clean single-line text.
///
/// Candidates are tried in priority order (article, main, explicit main
/// role, document body); the first one with non-whitespace content wins.
pub fn select_body_text(document: &Html) -> String {
    let candidates = [
        &*SELECTOR_ARTICLE,
        &*SELECTOR_MAIN,
        &*SELECTOR_ROLE_MAIN,
        &*SELECTOR_BODY,
    ];

    for selector in candidates {
        if let Some(element) = document.select(selector).next() {
            let text = extract_flat_text(element);
            if !text.is_empty() {
                return text;
            }
        }
    }

    String::new()
}
