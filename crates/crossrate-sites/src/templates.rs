//! Pieces shared by the injected rating blocks of both sites.

use crate::dom::Element;
use crate::numbers::DisplayLocale;

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_COUNT: &str = "-";

pub fn count_label(count: Option<u64>, noun: &str, locale: &DisplayLocale) -> String {
    match count {
        Some(1) => format!("1 {}", noun),
        Some(n) => format!("{} {}s", locale.format_count(n), noun),
        None => NO_COUNT.to_string(),
    }
}

/// Anchor wrapping its contents, opening the source page
pub fn source_link(href: &str, title: &str) -> Element {
    Element::new("a")
        .with_attr("href", href)
        .with_attr("title", title)
        .with_attr("target", "_blank")
        .with_attr("rel", "noopener")
}

pub fn span(class: &str, text: impl Into<String>) -> Element {
    Element::new("span").with_class(class).with_text(text)
}
