//! HTML and XML text helpers

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// Escape HTML special characters for text and attribute values
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape the characters that break XML: `&`, `"`, `<`, `>`
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    TAG.replace_all(s, "").into_owned()
}

/// Generate a `<meta>` tag; empty content yields nothing
pub fn meta_tag(attr: &str, key: &str, content: &str) -> Option<String> {
    if content.is_empty() {
        return None;
    }
    Some(format!(
        r#"<meta {}="{}" content="{}">"#,
        attr,
        key,
        html_escape(content)
    ))
}

/// Generate a `<link>` tag
pub fn link_tag(rel: &str, href: &str, hreflang: Option<&str>) -> String {
    match hreflang {
        Some(lang) => format!(
            r#"<link rel="{}" hreflang="{}" href="{}">"#,
            rel,
            lang,
            html_escape(href)
        ),
        None => format!(r#"<link rel="{}" href="{}">"#, rel, html_escape(href)),
    }
}
