//! Small HTML scraping helpers
//!
//! Genius pages are scraped with regular expressions and a balanced `<div>`
//! walk rather than a full DOM. That is enough for the handful of containers
//! the tagger reads and keeps the markup assumptions in one place.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

static DIV_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<(/?)div\b[^>]*>").unwrap());

static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));").unwrap());

static CLASS_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());

/// Replace `<br>`, `<br/>` and `<br />` with newlines.
pub fn normalize_line_breaks(html: &str) -> String {
    LINE_BREAK.replace_all(html, "\n").into_owned()
}

/// Remove every markup tag, keeping the text between them.
pub fn strip_tags(html: &str) -> String {
    ANY_TAG.replace_all(html, "").into_owned()
}

/// Decode the named entities Genius emits plus any numeric entity.
pub fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY.replace_all(text, |caps: &Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (_, Some(dec)) => dec.as_str().parse::<u32>().ok(),
            _ => None,
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    // &amp; last so "&amp;lt;" stays "&lt;"
    numeric
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Visible text of a fragment: tags stripped, entities decoded, trimmed.
pub fn element_text(fragment: &str) -> String {
    decode_entities(&strip_tags(fragment)).trim().to_string()
}

/// Class names listed in an opening tag.
pub fn class_names(open_tag: &str) -> Vec<&str> {
    CLASS_ATTR
        .captures(open_tag)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().split_whitespace().collect())
        .unwrap_or_default()
}

/// Outer HTML of every top-level `<div>` whose opening tag satisfies `matches`.
///
/// Matching divs nested inside an already returned div are not reported
/// again. A div left unclosed runs to the end of the document.
pub fn find_divs<'a, F>(html: &'a str, matches: F) -> Vec<&'a str>
where
    F: Fn(&str) -> bool,
{
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(caps) = DIV_TAG.captures_at(html, pos) {
        let Some(tag) = caps.get(0) else { break };
        pos = tag.end();

        if !caps[1].is_empty() || !matches(tag.as_str()) {
            continue;
        }

        let end = closing_div_end(html, tag.end());
        found.push(&html[tag.start()..end]);
        pos = end;
    }

    found
}

fn closing_div_end(html: &str, from: usize) -> usize {
    let mut depth = 1usize;
    for caps in DIV_TAG.captures_iter(&html[from..]) {
        let Some(tag) = caps.get(0) else { continue };
        if caps[1].is_empty() {
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                return from + tag.end();
            }
        }
    }
    html.len()
}
