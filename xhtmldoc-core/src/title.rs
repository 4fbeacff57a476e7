//! Document title derivation from a rendered fragment.

use once_cell::sync::Lazy;
use regex::Regex;

/// Title used when a fragment has no usable level-1 heading
pub const FALLBACK_TITLE: &str = "Documentation";

static H1_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h1(?:\s[^>]*)?>(.*?)</h1\s*>").expect("valid h1 regex"));

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Text of the first `<h1>` in `fragment`, inner tags stripped.
///
/// This is tag removal, not HTML parsing: `<h1>A <em>b</em></h1>` gives
/// `A b`, and entity references such as `&amp;` are kept as written so
/// the result can go straight into a `<title>` element. A heading that is
/// empty after stripping counts as missing.
pub fn extract_title(fragment: &str) -> String {
    H1_RE
        .captures(fragment)
        .and_then(|caps| caps.get(1))
        .map(|inner| strip_tags(inner.as_str()))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string())
}

fn strip_tags(html: &str) -> String {
    let text = TAG_RE.replace_all(html, "");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_heading() {
        assert_eq!(extract_title("<h1>Getting Started</h1>"), "Getting Started");
    }

    #[test]
    fn test_missing_heading_falls_back() {
        assert_eq!(extract_title("<h2>Only h2</h2><p>Body</p>"), "Documentation");
        assert_eq!(extract_title(""), "Documentation");
    }

    #[test]
    fn test_first_heading_wins() {
        let html = "<p>intro</p>\n<h1>First</h1>\n<h1>Second</h1>";
        assert_eq!(extract_title(html), "First");
    }

    #[test]
    fn test_nested_markup_flattened() {
        let html = r#"<h1 id="x">The <code>build</code> <em>command</em></h1>"#;
        assert_eq!(extract_title(html), "The build command");
    }

    #[test]
    fn test_entities_kept() {
        assert_eq!(extract_title("<h1>Tips &amp; Tricks</h1>"), "Tips &amp; Tricks");
    }

    #[test]
    fn test_empty_heading_falls_back() {
        assert_eq!(extract_title("<h1> <img src=\"a.png\" alt=\"\" /> </h1>"), "Documentation");
    }

    #[test]
    fn test_does_not_match_similar_tags() {
        assert_eq!(extract_title("<h10>nope</h10><header>no</header>"), "Documentation");
    }

    #[test]
    fn test_multiline_heading() {
        assert_eq!(extract_title("<h1>\n  Spread\n  Out\n</h1>"), "Spread Out");
    }
}
