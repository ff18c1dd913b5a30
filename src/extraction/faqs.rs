use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

use super::text::{element_text, extract_flat_text};

static SELECTOR_ACCORDION_ROOT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("accordion-list ul.accordion-list").unwrap());
static SELECTOR_ACCORDION_LABEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3.accordion-label").unwrap());
static SELECTOR_PROJECTED_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".accordion__projected-title h3").unwrap());
static SELECTOR_ACCORDION_BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".accordion__body, .accordion__body-container").unwrap());
static SELECTOR_ACCORDION_HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".accordion__heading").unwrap());
static SELECTOR_PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static SELECTOR_LIST: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ul, ol").unwrap());
static SELECTOR_HEADING_OR_BUTTON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3, button").unwrap());

/// One extracted question/answer pair. Uniqueness is defined by the whole
/// pair; insertion order is preserved by the extractors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

fn direct_children<'a>(
    element: ElementRef<'a>,
    name: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == name)
}

fn next_element_sibling(element: ElementRef) -> Option<ElementRef> {
    element.next_siblings().filter_map(ElementRef::wrap).next()
}

fn dedupe(faqs: Vec<FaqEntry>) -> Vec<FaqEntry> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut unique = Vec::new();
    for faq in faqs {
        if seen.insert((faq.question.clone(), faq.answer.clone())) {
            unique.push(faq);
        }
    }
    unique
}

/// Turns an accordion panel into readable plain text: paragraphs first, then
/// bulleted list items, falling back to the panel's raw flattened text.
fn extract_answer_text(body: ElementRef) -> String {
    let mut chunks: Vec<String> = Vec::new();

    for paragraph in body.select(&SELECTOR_PARAGRAPH) {
        let text = element_text(paragraph);
        if !text.is_empty() {
            chunks.push(text);
        }
    }

    for list in body.select(&SELECTOR_LIST) {
        let items: Vec<String> = direct_children(list, "li")
            .map(element_text)
            .filter(|text| !text.is_empty())
            .map(|text| format!("• {text}"))
            .collect();
        if !items.is_empty() {
            chunks.push(items.join("\n"));
        }
    }

    if chunks.is_empty() {
        let raw = element_text(body);
        if !raw.is_empty() {
            chunks.push(raw);
        }
    }

    chunks.join("\n\n")
}

/// Extracts FAQs from the structured accordion-list component.
///
/// Items without a heading or an answer body are skipped silently. A heading
/// with blank text still produces an entry when the body has text.
pub fn extract_faqs_from_accordion(document: &Html) -> Vec<FaqEntry> {
    let mut faqs = Vec::new();

    for root in document.select(&SELECTOR_ACCORDION_ROOT) {
        for item in direct_children(root, "li") {
            let question_node = item
                .select(&SELECTOR_ACCORDION_LABEL)
                .next()
                .or_else(|| item.select(&SELECTOR_PROJECTED_TITLE).next());
            let Some(question_node) = question_node else {
                continue;
            };
            let question = element_text(question_node);

            let body = item.select(&SELECTOR_ACCORDION_BODY).next().or_else(|| {
                item.select(&SELECTOR_ACCORDION_HEADING)
                    .next()
                    .and_then(next_element_sibling)
            });
            let Some(body) = body else {
                continue;
            };

            let answer = extract_answer_text(body);
            if answer.is_empty() {
                continue;
            }

            faqs.push(FaqEntry { question, answer });
        }
    }

    dedupe(faqs)
}

/// Generic heuristic: heading/button-like elements whose visible text
/// contains a question mark, answered by the next sibling's flattened text.
pub fn extract_faqs_fallback(document: &Html) -> Vec<FaqEntry> {
    let mut faqs = Vec::new();

    for node in document.select(&SELECTOR_HEADING_OR_BUTTON) {
        let question = element_text(node);
        if question.is_empty() || !question.contains('?') {
            continue;
        }
        let answer = next_element_sibling(node)
            .map(extract_flat_text)
            .unwrap_or_default();
        if answer.is_empty() {
            continue;
        }
        faqs.push(FaqEntry { question, answer });
    }

    dedupe(faqs)
}

/// Combined entry point: the accordion strategy wins when it finds anything,
/// else the generic fallback runs. The two results are never merged.
pub fn extract_faqs(document: &Html) -> Vec<FaqEntry> {
    let faqs = extract_faqs_from_accordion(document);
    if !faqs.is_empty() {
        return faqs;
    }
    extract_faqs_fallback(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accordion(items: &str) -> String {
        format!(
            "<html><body><accordion-list><ul class='accordion-list'>{items}</ul></accordion-list></body></html>"
        )
    }

    #[test]
    fn accordion_extracts_question_and_paragraphs() {
        let html = Html::parse_document(&accordion(
            "<li><h3 class='accordion-label'>¿Cómo pido la tarjeta?</h3>\
             <div class='accordion__body'><p>Desde la app.</p><p>O en una sucursal.</p></div></li>",
        ));
        let faqs = extract_faqs_from_accordion(&html);
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].question, "¿Cómo pido la tarjeta?");
        assert_eq!(faqs[0].answer, "Desde la app.\n\nO en una sucursal.");
    }

    #[test]
    fn accordion_prefixes_list_items_with_bullets() {
        let html = Html::parse_document(&accordion(
            "<li><h3 class='accordion-label'>¿Qué necesito?</h3>\
             <div class='accordion__body'><ul><li>DNI</li><li>Ser mayor de 18</li></ul></div></li>",
        ));
        let faqs = extract_faqs_from_accordion(&html);
        assert_eq!(faqs[0].answer, "• DNI\n• Ser mayor de 18");
    }

    #[test]
    fn accordion_falls_back_to_projected_title_and_sibling_body() {
        let html = Html::parse_document(&accordion(
            "<li><div class='accordion__heading'>\
               <div class='accordion__projected-title'><h3>¿Tiene costo?</h3></div>\
             </div><div><p>No tiene costo.</p></div></li>",
        ));
        let faqs = extract_faqs_from_accordion(&html);
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].question, "¿Tiene costo?");
        assert_eq!(faqs[0].answer, "No tiene costo.");
    }

    #[test]
    fn accordion_skips_items_without_body() {
        let html = Html::parse_document(&accordion(
            "<li><h3 class='accordion-label'>¿Sin respuesta?</h3></li>\
             <li><h3 class='accordion-label'>¿Con respuesta?</h3>\
             <div class='accordion__body'><p>Sí.</p></div></li>",
        ));
        let faqs = extract_faqs_from_accordion(&html);
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].question, "¿Con respuesta?");
    }

    // The structured strategy deliberately keeps an entry whose heading text
    // is blank; only graph assembly filters it out. Questionable but matches
    // the shipped behavior.
    #[test]
    fn accordion_keeps_blank_question_when_body_has_text() {
        let html = Html::parse_document(&accordion(
            "<li><h3 class='accordion-label'></h3>\
             <div class='accordion__body'><p>Respuesta huérfana.</p></div></li>",
        ));
        let faqs = extract_faqs_from_accordion(&html);
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].question, "");
        assert_eq!(faqs[0].answer, "Respuesta huérfana.");
    }

    #[test]
    fn deduplication_preserves_first_seen_order() {
        let html = Html::parse_document(&accordion(
            "<li><h3 class='accordion-label'>¿A?</h3><div class='accordion__body'><p>1</p></div></li>\
             <li><h3 class='accordion-label'>¿B?</h3><div class='accordion__body'><p>2</p></div></li>\
             <li><h3 class='accordion-label'>¿A?</h3><div class='accordion__body'><p>1</p></div></li>",
        ));
        let faqs = extract_faqs_from_accordion(&html);
        assert_eq!(faqs.len(), 2);
        assert_eq!(faqs[0].question, "¿A?");
        assert_eq!(faqs[1].question, "¿B?");
    }

    #[test]
    fn fallback_requires_question_mark_and_sibling_answer() {
        let html = Html::parse_document(
            "<html><body>\
             <h3>¿Cuánto cuesta?</h3><p>Nada.</p>\
             <h3>Sin pregunta</h3><p>Ignorado.</p>\
             <button>¿Dónde aplico?</button><div>En la app.</div>\
             </body></html>",
        );
        let faqs = extract_faqs_fallback(&html);
        assert_eq!(faqs.len(), 2);
        assert_eq!(faqs[0].question, "¿Cuánto cuesta?");
        assert_eq!(faqs[0].answer, "Nada.");
        assert_eq!(faqs[1].question, "¿Dónde aplico?");
        assert_eq!(faqs[1].answer, "En la app.");
    }

    #[test]
    fn accordion_result_wins_over_fallback() {
        let mut page = accordion(
            "<li><h3 class='accordion-label'>¿Del acordeón?</h3>\
             <div class='accordion__body'><p>Sí.</p></div></li>",
        );
        page.push_str("<h3>¿Del fallback?</h3><p>No debería aparecer.</p>");
        let html = Html::parse_document(&page);
        let faqs = extract_faqs(&html);
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].question, "¿Del acordeón?");
    }

    #[test]
    fn fallback_runs_when_accordion_is_empty() {
        let html = Html::parse_document(
            "<html><body><h3>¿Funciona el fallback?</h3><p>Claro.</p></body></html>",
        );
        let faqs = extract_faqs(&html);
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].question, "¿Funciona el fallback?");
    }
}
