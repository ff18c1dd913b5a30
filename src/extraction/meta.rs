use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

static SELECTOR_TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static SELECTOR_META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());
static SELECTOR_OG_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static SELECTOR_OG_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:description"]"#).unwrap());
static SELECTOR_OG_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:image"]"#).unwrap());
static SELECTOR_BASE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("base[href]").unwrap());

/// Basic head metadata of a page. Missing fields are empty strings, never
/// absent keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub image: String,
}

fn meta_content(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .and_then(|tag| tag.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

/// Pulls title, description and preview image from document head metadata.
///
/// Open Graph title wins over the `<title>` tag; the standard meta
/// description wins over `og:description`; the image is resolved against the
/// base URL when both are present.
pub fn extract_basic_meta(document: &Html, base_url: Option<&str>) -> PageMeta {
    let mut title = document
        .select(&SELECTOR_TITLE)
        .next()
        .map(|tag| tag.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let og_title = meta_content(document, &SELECTOR_OG_TITLE);
    if !og_title.is_empty() {
        title = og_title;
    }

    let mut description = meta_content(document, &SELECTOR_META_DESCRIPTION);
    if description.is_empty() {
        description = meta_content(document, &SELECTOR_OG_DESCRIPTION);
    }

    let mut image = meta_content(document, &SELECTOR_OG_IMAGE);
    if let (Some(base), false) = (base_url, image.is_empty()) {
        if let Ok(resolved) = Url::parse(base).and_then(|b| b.join(&image)) {
            image = resolved.to_string();
        }
    }

    PageMeta {
        title,
        description,
        image,
    }
}

/// Base URL of a document: the first `<base href>` resolved against the
/// final URL, else the final URL itself.
pub fn resolve_base_url(document: &Html, final_url: &str) -> String {
    let href = document
        .select(&SELECTOR_BASE)
        .next()
        .and_then(|tag| tag.value().attr("href"));

    match href {
        Some(href) => Url::parse(final_url)
            .and_then(|base| base.join(href))
            .map(|resolved| resolved.to_string())
            .unwrap_or_else(|_| final_url.to_string()),
        None => final_url.to_string(),
    }
}
