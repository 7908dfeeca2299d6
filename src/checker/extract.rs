//! SEO signal extraction from fetched HTML.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("static selector"));
static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("static selector"));
static META_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="description" i]"#).expect("static selector"));

/// The three text fields a check records. Missing elements are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSignals {
    pub title: String,
    pub h1: String,
    pub description: String,
}

/// Pull title, first `<h1>` and meta description out of a document.
///
/// The parser is error-recovering, so malformed markup still yields whatever
/// elements it could make sense of.
pub fn extract_signals(html: &str) -> PageSignals {
    let doc = Html::parse_document(html);

    let title = doc.select(&TITLE).next().map(element_text).unwrap_or_default();
    let h1 = doc.select(&H1).next().map(element_text).unwrap_or_default();
    let description = doc
        .select(&META_DESCRIPTION)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(str::to_string)
        .unwrap_or_default();

    PageSignals { title, h1, description }
}

/// Descendant text with runs of whitespace collapsed to single spaces.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn extracts_all_three_fields() {
        let html = r#"<html><head><title>T</title>
            <meta name="description" content="D"></head>
            <body><h1>H</h1></body></html>"#;

        assert_eq!(
            extract_signals(html),
            PageSignals {
                title: "T".into(),
                h1: "H".into(),
                description: "D".into(),
            }
        );
    }

    #[test]
    fn missing_elements_are_empty() {
        assert_eq!(extract_signals("<html><body><p>nothing</p></body></html>"), PageSignals::default());
        assert_eq!(extract_signals(""), PageSignals::default());
    }

    #[test]
    fn first_h1_wins_and_nested_text_is_joined() {
        let html = "<h1>  Main <span>Header</span>\n </h1><h1>Second</h1>";
        assert_eq!(extract_signals(html).h1, "Main Header");
    }

    #[test]
    fn description_needs_name_attribute() {
        let html = r#"<meta property="og:description" content="og">
            <meta name="Description" content="real">"#;
        assert_eq!(extract_signals(html).description, "real");
    }

    #[test]
    fn tolerates_broken_markup() {
        let html = "<title>Broken <h1>still here<meta name=description content=x";
        let signals = extract_signals(html);
        assert!(signals.title.starts_with("Broken"));
    }

    #[test]
    fn not_html_yields_nothing() {
        assert_eq!(extract_signals(r#"{"json": true}"#), PageSignals::default());
    }
}
