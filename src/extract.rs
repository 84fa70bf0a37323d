//! Paragraph text extraction and cleanup.
//!
//! Turns an article's HTML into plain text:
//!
//! 1. Collect the text of every `<p>` element in document order
//! 2. Drop paragraphs containing a disclaimer substring (exact, case-sensitive)
//! 3. Join the rest with `\n`
//! 4. Delete `&word;` entity codes
//!
//! Entity codes are deleted, not decoded: `&amp;` disappears rather than
//! becoming `&`.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::borrow::Cow;

/// Editorial-review sentence as published, with a typographic apostrophe.
pub const EDITORIAL_DISCLAIMER: &str =
    "Our editors will review what you\u{2019}ve submitted and determine whether to revise the article.";

/// Same sentence with an ASCII apostrophe.
pub const EDITORIAL_DISCLAIMER_ASCII: &str =
    "Our editors will review what you've submitted and determine whether to revise the article.";

static ENTITY_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"&\w+;").unwrap());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Default disclaimer list.
pub fn default_disclaimers() -> Vec<String> {
    vec![
        EDITORIAL_DISCLAIMER.to_string(),
        EDITORIAL_DISCLAIMER_ASCII.to_string(),
    ]
}

/// Text of every `<p>` element, in document order.
///
/// Descendant text nodes are concatenated without any separator, so inline
/// markup such as `<b>` or `<a>` does not introduce spaces.
pub fn paragraph_texts(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>())
        .collect()
}

/// Whether `text` contains any of the disclaimer substrings.
pub fn is_disclaimer(text: &str, disclaimers: &[String]) -> bool {
    disclaimers
        .iter()
        .any(|d| !d.is_empty() && text.contains(d.as_str()))
}

/// Delete every `&word;` sequence.
///
/// Deletion repeats until nothing matches, since removing one code can join
/// its neighbours into another (`&a&b;;` -> `&a;` -> ``).
pub fn strip_entity_codes(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        match ENTITY_CODE.replace_all(&current, "") {
            Cow::Borrowed(_) => return current,
            Cow::Owned(next) => current = next,
        }
    }
}

/// Full cleanup of one page: extract, filter, join, strip.
pub fn extract_page_text(html: &str, disclaimers: &[String]) -> String {
    let joined = paragraph_texts(html)
        .into_iter()
        .filter(|p| !is_disclaimer(p, disclaimers))
        .collect::<Vec<_>>()
        .join("\n");
    strip_entity_codes(&joined)
}
