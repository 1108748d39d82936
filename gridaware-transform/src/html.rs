//! Structured tag/attribute scanning over rendered HTML fragments
//!
//! The transformers only ever touch well-formed, narrowly-scoped fragments
//! (one image or iframe per block), but attribute order and whitespace are
//! not guaranteed. This module gives them a small cursor over open tags so
//! extraction and mutation survive reordering, instead of freeform regex
//! over the whole fragment.

use std::ops::Range;

// ============================================================================
// ATTRIBUTE ESCAPING
// ============================================================================

/// Escape a string for use inside a double-quoted HTML attribute.
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape_attr`]: decode the five entities it emits.
pub fn unescape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let decoded = [
            ("&amp;", '&'),
            ("&lt;", '<'),
            ("&gt;", '>'),
            ("&quot;", '"'),
            ("&#039;", '\''),
        ]
        .iter()
        .find(|(entity, _)| rest.starts_with(entity));
        match decoded {
            Some((entity, c)) => {
                out.push(*c);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// TAG SCANNING
// ============================================================================

/// Byte range of one open tag (`<name … >`) inside a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpan {
    /// Index of the `<`
    pub start: usize,
    /// Index one past the closing `>`
    pub end: usize,
}

/// Find every open tag with the given name (case-insensitive).
pub fn find_tags(html: &str, name: &str) -> Vec<TagSpan> {
    let bytes = html.as_bytes();
    let mut tags = Vec::new();
    let mut i = 0;
    while let Some(offset) = html[i..].find('<') {
        let start = i + offset;
        let after = start + 1;
        if tag_name_matches(&html[after..], name) {
            if let Some(close) = find_tag_close(bytes, after + name.len()) {
                tags.push(TagSpan {
                    start,
                    end: close + 1,
                });
                i = close + 1;
                continue;
            }
        }
        i = start + 1;
    }
    tags
}

/// `true` when the text begins with the tag name followed by a delimiter.
fn tag_name_matches(rest: &str, name: &str) -> bool {
    // Byte-wise compare: `rest` may start mid-way through a multibyte
    // character, where a str slice at `name.len()` would panic.
    let bytes = rest.as_bytes();
    if bytes.len() < name.len() || !bytes[..name.len()].eq_ignore_ascii_case(name.as_bytes()) {
        return false;
    }
    matches!(
        bytes.get(name.len()),
        Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b'>') | Some(b'/') | None
    )
}

/// Index of the `>` terminating the open tag, honoring quoted values.
fn find_tag_close(bytes: &[u8], mut i: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    while i < bytes.len() {
        match (quote, bytes[i]) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, b'"') | (None, b'\'') => quote = Some(bytes[i]),
            (None, b'>') => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// One parsed attribute inside an open tag.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrSpan {
    name: String,
    /// Byte range of the raw (still-encoded) value, exclusive of quotes;
    /// `None` for boolean attributes
    value: Option<Range<usize>>,
}

/// Parse the attributes of one open tag into spans (absolute indices).
fn parse_attrs(html: &str, tag: &TagSpan) -> Vec<AttrSpan> {
    let bytes = html.as_bytes();
    // Skip "<name"
    let mut i = tag.start + 1;
    while i < tag.end - 1 && !bytes[i].is_ascii_whitespace() && bytes[i] != b'/' {
        i += 1;
    }

    let mut attrs = Vec::new();
    let limit = tag.end - 1; // index of '>'
    while i < limit {
        while i < limit && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= limit {
            break;
        }
        let name_start = i;
        while i < limit && !bytes[i].is_ascii_whitespace() && bytes[i] != b'=' && bytes[i] != b'/' {
            i += 1;
        }
        let name = html[name_start..i].to_lowercase();
        while i < limit && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < limit && bytes[i] == b'=' {
            i += 1;
            while i < limit && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < limit && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                let value_start = i + 1;
                i = value_start;
                while i < limit && bytes[i] != quote {
                    i += 1;
                }
                attrs.push(AttrSpan {
                    name,
                    value: Some(value_start..i),
                });
                i += 1; // past closing quote
            } else {
                let value_start = i;
                while i < limit && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                attrs.push(AttrSpan {
                    name,
                    value: Some(value_start..i),
                });
            }
        } else if !name.is_empty() {
            attrs.push(AttrSpan { name, value: None });
        }
    }
    attrs
}

/// Decoded value of the first `attr` on the first `tag_name` tag.
pub fn get_attr(html: &str, tag_name: &str, attr: &str) -> Option<String> {
    let tag = find_tags(html, tag_name).into_iter().next()?;
    let attrs = parse_attrs(html, &tag);
    let span = attrs.iter().find(|a| a.name == attr)?;
    span.value
        .as_ref()
        .map(|range| unescape_attr(&html[range.clone()]))
}

/// Whether the first `tag_name` tag carries `attr` at all.
pub fn has_attr(html: &str, tag_name: &str, attr: &str) -> bool {
    find_tags(html, tag_name)
        .first()
        .map(|tag| parse_attrs(html, tag).iter().any(|a| a.name == attr))
        .unwrap_or(false)
}

/// Rewrite the value of `attr` on every `tag_name` tag.
///
/// `f` receives the decoded value and returns the replacement, or `None` to
/// leave that tag untouched. Everything outside the touched value spans is
/// copied byte for byte.
pub fn map_attr<F>(html: &str, tag_name: &str, attr: &str, mut f: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    for tag in find_tags(html, tag_name) {
        let attrs = parse_attrs(html, &tag);
        let Some(range) = attrs
            .iter()
            .find(|a| a.name == attr)
            .and_then(|a| a.value.clone())
        else {
            continue;
        };
        let decoded = unescape_attr(&html[range.clone()]);
        if let Some(replacement) = f(&decoded) {
            out.push_str(&html[last..range.start]);
            out.push_str(&escape_attr(&replacement));
            last = range.end;
        }
    }
    out.push_str(&html[last..]);
    out
}

/// Add `attr="value"` to every `tag_name` tag that lacks the attribute.
///
/// A minimal insertion before the tag's `>` (or `/>`): existing attributes
/// are never reordered or re-quoted.
pub fn inject_attr_if_absent(html: &str, tag_name: &str, attr: &str, value: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    for tag in find_tags(html, tag_name) {
        if parse_attrs(html, &tag).iter().any(|a| a.name == attr) {
            continue;
        }
        let mut insert_at = tag.end - 1;
        // Slip in before a self-closing slash
        if insert_at > tag.start && html.as_bytes()[insert_at - 1] == b'/' {
            insert_at -= 1;
        }
        out.push_str(&html[last..insert_at]);
        if !html[..insert_at].ends_with(char::is_whitespace) {
            out.push(' ');
        }
        out.push_str(attr);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
        if html.as_bytes()[insert_at] == b'/' {
            out.push(' ');
        }
        last = insert_at;
    }
    out.push_str(&html[last..]);
    out
}

// ============================================================================
// UNIT TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_unescape_roundtrip() {
        let original = r#"<img src="a.jpg" alt="Tom & Jerry's 'best' <day>">"#;
        assert_eq!(unescape_attr(&escape_attr(original)), original);
    }

    #[test]
    fn test_unescape_leaves_unknown_entities() {
        assert_eq!(unescape_attr("a &copy; b"), "a &copy; b");
        assert_eq!(unescape_attr("&amp;copy;"), "&copy;");
    }

    #[test]
    fn test_find_tags_case_and_prefix() {
        let html = r#"<figure><IMG src="a.jpg"><imgx></figure>"#;
        assert_eq!(find_tags(html, "img").len(), 1);
    }

    #[test]
    fn test_find_tags_multibyte_after_bracket() {
        // `<` followed by a multibyte char must not panic or match.
        let html = "a <çç b <img src=\"über.jpg\"> ç";
        let tags = find_tags(html, "img");
        assert_eq!(tags.len(), 1);
        assert!(html[tags[0].start..tags[0].end].contains("über.jpg"));
        assert!(find_tags("prose with <é and <i̇mg only", "img").is_empty());
    }

    #[test]
    fn test_find_tags_quoted_gt() {
        let html = r#"<img alt="a > b" src="x.jpg"><p>after</p>"#;
        let tags = find_tags(html, "img");
        assert_eq!(tags.len(), 1);
        assert!(html[tags[0].start..tags[0].end].ends_with("x.jpg\">"));
    }

    #[test]
    fn test_get_attr_reorder_and_whitespace() {
        let a = r#"<img src="a.jpg" alt="hello">"#;
        let b = "<img   alt='hello'\n src='a.jpg'>";
        assert_eq!(get_attr(a, "img", "alt").as_deref(), Some("hello"));
        assert_eq!(get_attr(b, "img", "alt").as_deref(), Some("hello"));
    }

    #[test]
    fn test_get_attr_decodes_entities() {
        let html = r#"<img alt="Tom &amp; Jerry">"#;
        assert_eq!(get_attr(html, "img", "alt").as_deref(), Some("Tom & Jerry"));
    }

    #[test]
    fn test_get_attr_missing() {
        assert_eq!(get_attr("<img src='a.jpg'>", "img", "alt"), None);
        assert_eq!(get_attr("<p>no img</p>", "img", "alt"), None);
    }

    #[test]
    fn test_has_attr_boolean() {
        assert!(has_attr("<img src='a' hidden>", "img", "hidden"));
        assert!(!has_attr("<img src='a'>", "img", "hidden"));
    }

    #[test]
    fn test_map_attr_rewrites_all_matching_tags() {
        let html = r#"<iframe src="https://a.example/1"></iframe><iframe src="https://a.example/2"></iframe>"#;
        let out = map_attr(html, "iframe", "src", |src| {
            Some(src.replace("a.example", "b.example"))
        });
        assert_eq!(out.matches("b.example").count(), 2);
        assert!(!out.contains("a.example"));
    }

    #[test]
    fn test_map_attr_none_leaves_untouched() {
        let html = r#"<iframe src="keep"></iframe>"#;
        assert_eq!(map_attr(html, "iframe", "src", |_| None), html);
    }

    #[test]
    fn test_map_attr_escapes_replacement() {
        let html = r#"<iframe src="u"></iframe>"#;
        let out = map_attr(html, "iframe", "src", |_| Some("a&b".to_string()));
        assert!(out.contains(r#"src="a&amp;b""#));
    }

    #[test]
    fn test_inject_attr_if_absent() {
        let html = r#"<img src="a.jpg">"#;
        let out = inject_attr_if_absent(html, "img", "loading", "lazy");
        assert_eq!(out, r#"<img src="a.jpg" loading="lazy">"#);
    }

    #[test]
    fn test_inject_attr_present_is_noop() {
        let html = r#"<img loading="lazy" src="a.jpg">"#;
        assert_eq!(inject_attr_if_absent(html, "img", "loading", "lazy"), html);
    }

    #[test]
    fn test_inject_attr_self_closing() {
        let html = r#"<img src="a.jpg"/>"#;
        let out = inject_attr_if_absent(html, "img", "loading", "lazy");
        assert_eq!(out, r#"<img src="a.jpg" loading="lazy" />"#);
    }

    #[test]
    fn test_inject_attr_idempotent() {
        let html = r#"<img src="a.jpg">"#;
        let once = inject_attr_if_absent(html, "img", "loading", "lazy");
        let twice = inject_attr_if_absent(&once, "img", "loading", "lazy");
        assert_eq!(once, twice);
    }
}

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// escape then unescape recovers any input
        #[test]
        fn prop_escape_roundtrip(s in ".{0,200}") {
            prop_assert_eq!(unescape_attr(&escape_attr(&s)), s);
        }

        /// escaped output never contains raw markup-significant characters
        #[test]
        fn prop_escape_neutralizes(s in ".{0,200}") {
            let escaped = escape_attr(&s);
            prop_assert!(!escaped.contains('<'));
            prop_assert!(!escaped.contains('>'));
            prop_assert!(!escaped.contains('"'));
        }
    }
}
