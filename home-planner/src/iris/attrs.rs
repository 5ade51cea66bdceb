//! Attribute and element scraping for timetable markup.
//!
//! The timetable payloads look like XML but are not guaranteed to be
//! well-formed, so they are scanned with patterns rather than parsed.
//! Nothing here fails: unrecognized text simply yields fewer results.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("attribute pattern is valid")
});

static CHAR_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#x([0-9A-Fa-f]+)|#([0-9]+)|(amp|lt|gt|quot|apos));")
        .expect("character reference pattern is valid")
});

/// Attributes of one tag, by name.
pub type Attributes = HashMap<String, String>;

/// Extract `name="value"` / `name='value'` pairs from a tag fragment.
///
/// Later occurrences of a name replace earlier ones. Character references
/// in values are decoded.
///
/// # Examples
///
/// ```
/// use home_planner::iris::extract_attributes;
///
/// let attrs = extract_attributes(r#"pt="2401151230" pp='7' ppth="A|B""#);
/// assert_eq!(attrs["pt"], "2401151230");
/// assert_eq!(attrs["pp"], "7");
/// assert_eq!(attrs["ppth"], "A|B");
/// ```
pub fn extract_attributes(fragment: &str) -> Attributes {
    ATTRIBUTE
        .captures_iter(fragment)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
            Some((name.to_string(), decode_entities(value)))
        })
        .collect()
}

/// Attributes of the first `<name ...>` start tag in `body`, if any.
pub fn element_attributes(body: &str, name: &str) -> Option<Attributes> {
    let needle = format!("<{name}");
    let mut rest = body;

    while let Some(pos) = rest.find(&needle) {
        let after = &rest[pos + needle.len()..];
        // Require a tag boundary so "<s" does not match "<station".
        match after.chars().next() {
            Some(c) if c.is_whitespace() || c == '>' || c == '/' => {
                let end = after.find('>').unwrap_or(after.len());
                return Some(extract_attributes(&after[..end]));
            }
            Some(_) => rest = after,
            None => return None,
        }
    }

    None
}

/// Split a payload into `(start-tag attributes, inner body)` for each
/// `<name ...>...</name>` element. Self-closing elements have an empty
/// body. Elements must not nest.
pub fn elements<'a>(payload: &'a str, name: &str) -> Vec<(Attributes, &'a str)> {
    let open = format!("<{name}");
    let close = format!("</{name}>");
    let mut found = Vec::new();
    let mut rest = payload;

    while let Some(pos) = rest.find(&open) {
        let after = &rest[pos + open.len()..];
        let boundary = after
            .chars()
            .next()
            .is_some_and(|c| c.is_whitespace() || c == '>' || c == '/');
        if !boundary {
            rest = after;
            continue;
        }

        let Some(tag_end) = after.find('>') else {
            break;
        };
        let tag = &after[..tag_end];
        let attrs = extract_attributes(tag);
        let content = &after[tag_end + 1..];

        if tag.trim_end().ends_with('/') {
            found.push((attrs, ""));
            rest = content;
            continue;
        }

        match content.find(&close) {
            Some(body_end) => {
                found.push((attrs, &content[..body_end]));
                rest = &content[body_end + close.len()..];
            }
            None => {
                // Unterminated element: take what is left and stop.
                found.push((attrs, content));
                break;
            }
        }
    }

    found
}

fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }

    CHAR_REF
        .replace_all(value, |caps: &regex::Captures<'_>| {
            let decoded = if let Some(hex) = caps.get(1) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = caps.get(2) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else {
                caps.get(3).map(|named| match named.as_str() {
                    "amp" => '&',
                    "lt" => '<',
                    "gt" => '>',
                    "quot" => '"',
                    _ => '\'',
                })
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}
