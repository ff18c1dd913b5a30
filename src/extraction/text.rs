use scraper::ElementRef;
use unicode_normalization::UnicodeNormalization;

// Elements whose subtrees never contribute visible content.
const SKIP_ELEMENTS: [&str; 15] = [
    "script", "style", "noscript", "template", "svg", "canvas", "iframe", "form", "button",
    "select", "input", "textarea", "header", "footer", "nav",
];

/// Canonicalizes a string extracted from the DOM: NFKC composition,
/// non-breaking spaces to regular spaces, zero-width characters removed,
/// whitespace runs collapsed to a single space, ends trimmed.
///
/// Pure and total; normalizing an already-normalized string returns it
/// unchanged.
pub fn clean_text(value: &str) -> String {
    let normalized: String = value.nfkc().collect();
    let normalized = normalized.replace('\u{00a0}', " ").replace('\u{200b}', "");
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of a single element, space-joined and cleaned.
pub(crate) fn element_text(element: ElementRef) -> String {
    let raw = element.text().collect::<Vec<_>>().join(" ");
    clean_text(&raw)
}

/// Flattens an element to one clean line of text, skipping non-content
/// subtrees and turning line breaks into spaces.
pub fn extract_flat_text(element: ElementRef) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    clean_text(&out)
}

fn collect_text(element: ElementRef, out: &mut String) {
    let name = element.value().name();
    if SKIP_ELEMENTS.contains(&name) {
        return;
    }
    if name == "br" || name == "hr" {
        out.push(' ');
        return;
    }
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(document: &'a Html, css: &str) -> ElementRef<'a> {
        let selector = Selector::parse(css).unwrap();
        document.select(&selector).next().unwrap()
    }

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  hola \t\n  mundo  "), "hola mundo");
    }

    #[test]
    fn clean_text_handles_invisible_characters() {
        assert_eq!(clean_text("hola\u{00a0}mundo"), "hola mundo");
        assert_eq!(clean_text("ho\u{200b}la"), "hola");
    }

    #[test]
    fn clean_text_is_idempotent() {
        let once = clean_text("  Pr\u{00e9}stamos \u{00a0} Express ");
        assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn clean_text_composes_unicode() {
        // "e" + combining acute accent composes to a single code point
        assert_eq!(clean_text("caf\u{0065}\u{0301}"), "caf\u{00e9}");
    }

    #[test]
    fn flat_text_strips_non_content_elements() {
        let html = Html::parse_document(
            "<div id='c'><p>Visible</p><script>var x = 1;</script><nav>menu</nav><p>text</p></div>",
        );
        assert_eq!(extract_flat_text(first(&html, "#c")), "Visible text");
    }

    #[test]
    fn flat_text_turns_breaks_into_spaces() {
        let html = Html::parse_document("<div id='c'>uno<br>dos<hr>tres</div>");
        assert_eq!(extract_flat_text(first(&html, "#c")), "uno dos tres");
    }
}
