//! URL targeting: path normalization and include/exclude rules
//!
//! Canonical paths always start and end with `/` and are compared
//! case-sensitively. Patterns are tried per line: exact match, then trailing
//! `*` wildcard, then prefix (parent path covers its descendants).
//! Request paths are percent-decoded once, so `/caf%C3%A9/` matches `/café/`.

use url::Url;

/// Outcome of the targeting rules for one path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Targeting {
    Shown,
    Excluded,
    NotIncluded,
}

/// Canonicalize a path or pattern to `/segment/.../`
///
/// Absolute http(s) URLs are reduced to their path first.
pub fn normalize(url: &str) -> String {
    let trimmed = url.trim();
    let path = absolute_path(trimmed).unwrap_or_else(|| trimmed.to_string());
    let inner = path.trim_matches('/');
    if inner.is_empty() {
        "/".to_string()
    } else {
        format!("/{inner}/")
    }
}

/// Canonical path of a request URL, query string and fragment removed
pub fn request_path(current: &str) -> String {
    let trimmed = current.trim();
    let path = match absolute_path(trimmed) {
        Some(path) => path,
        None => {
            let end = trimmed.find(['?', '#']).unwrap_or(trimmed.len());
            percent_decoded(&trimmed[..end])
        }
    };
    normalize(&path)
}

/// Split free text on any line-ending style into deduplicated canonical patterns
pub fn parse_list(text: &str) -> Vec<String> {
    let mut patterns: Vec<String> = Vec::new();
    for line in text.split(['\r', '\n']) {
        if line.trim().is_empty() {
            continue;
        }
        let pattern = normalize(line);
        if !patterns.contains(&pattern) {
            patterns.push(pattern);
        }
    }
    patterns
}

/// Whether a canonical path matches a canonical pattern
pub fn matches(path: &str, pattern: &str) -> bool {
    if path == pattern {
        return true;
    }
    if let Some(prefix) = pattern
        .strip_suffix("*/")
        .or_else(|| pattern.strip_suffix('*'))
    {
        return path.starts_with(prefix);
    }
    path.starts_with(pattern)
}

fn matches_any(path: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| matches(path, pattern))
}

/// Apply the display rules; exclusions veto in both modes
pub fn evaluate(current_url: &str, sitewide: bool, include: &str, exclude: &str) -> Targeting {
    let path = request_path(current_url);

    if matches_any(&path, &parse_list(exclude)) {
        return Targeting::Excluded;
    }
    if sitewide {
        return Targeting::Shown;
    }

    let includes = parse_list(include);
    // An empty include list keeps the legacy "show everywhere" behavior
    if includes.is_empty() || matches_any(&path, &includes) {
        Targeting::Shown
    } else {
        Targeting::NotIncluded
    }
}

pub fn should_display(current_url: &str, sitewide: bool, include: &str, exclude: &str) -> bool {
    evaluate(current_url, sitewide, include, exclude) == Targeting::Shown
}

/// Decoded path of an absolute http(s) URL
fn absolute_path(value: &str) -> Option<String> {
    let parsed = Url::parse(value).ok()?;
    matches!(parsed.scheme(), "http" | "https").then(|| percent_decoded(parsed.path()))
}

/// Percent-decode, keeping the raw text when the bytes are not UTF-8
fn percent_decoded(path: &str) -> String {
    match urlencoding::decode(path) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_wraps_with_slashes() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("   "), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("shop"), "/shop/");
        assert_eq!(normalize("/shop"), "/shop/");
        assert_eq!(normalize("shop/"), "/shop/");
        assert_eq!(normalize("  /shop/shoes//  "), "/shop/shoes/");
        assert_eq!(normalize("/Shop/"), "/Shop/");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["", "/", "a", "/a/b", "a/b/", "//x//", " /y ", "https://example.com/z", "/p/*"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn test_absolute_urls_reduce_to_path() {
        assert_eq!(normalize("https://example.com/shop/"), "/shop/");
        assert_eq!(normalize("http://example.com"), "/");
        assert_eq!(request_path("https://example.com/checkout/?step=2#top"), "/checkout/");
    }

    #[test]
    fn test_non_ascii_paths_compare_decoded() {
        assert_eq!(normalize("https://example.com/café/"), "/café/");
        assert_eq!(request_path("https://example.com/caf%C3%A9/?x=1"), "/café/");
        assert_eq!(request_path("/caf%C3%A9/menu/"), "/café/menu/");
        assert!(should_display("https://example.com/café/menu/", false, "/café/", ""));
        assert!(!should_display("/caf%C3%A9/", true, "", "/café/"));
        assert_eq!(request_path("/bad%FF/"), "/bad%FF/");
    }

    #[test]
    fn test_request_path_strips_query_and_fragment() {
        assert_eq!(request_path("/checkout/?x=1"), "/checkout/");
        assert_eq!(request_path("/about#team"), "/about/");
        assert_eq!(request_path("?s=term"), "/");
    }

    #[test]
    fn test_parse_list_handles_all_line_endings() {
        let patterns = parse_list("/a/\r\n/b\r/c/\n\n  \n/a");
        assert_eq!(patterns, vec!["/a/", "/b/", "/c/"]);
        assert!(parse_list("").is_empty());
        assert!(parse_list("\r\n\n").is_empty());
    }

    #[test]
    fn test_match_precedence() {
        assert!(matches("/shop/", "/shop/"));
        assert!(matches("/shop/shoes/", "/shop/*/"));
        assert!(matches("/shopping/", "/shop*/"));
        assert!(matches("/shop/shoes/red/", "/shop/"));
        assert!(!matches("/blog/", "/shop/"));
        assert!(!matches("/Shop/", "/shop/"));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        assert!(!should_display("/a/", false, "/a/", "/a/"));
        assert_eq!(evaluate("/a/", false, "/a/", "/a/"), Targeting::Excluded);
    }

    #[test]
    fn test_sitewide_without_exclusions_shows_everywhere() {
        for path in ["/", "/shop/", "/a/b/c/", "/checkout/?x=1"] {
            assert!(should_display(path, true, "", ""));
        }
    }

    #[test]
    fn test_empty_include_list_shows_everywhere() {
        for path in ["/", "/shop/", "/deep/path/"] {
            assert!(should_display(path, false, "", ""));
        }
    }

    #[test]
    fn test_specific_pages_only() {
        let include = "/shop/\n/sale/*";
        assert!(should_display("/shop/", false, include, ""));
        assert!(should_display("/shop/item-1/", false, include, ""));
        assert!(should_display("/sale/summer/", false, include, ""));
        assert_eq!(evaluate("/blog/", false, include, ""), Targeting::NotIncluded);
        assert!(!should_display("/shop/cart/", false, include, "/shop/cart/"));
    }

    #[test]
    fn test_sitewide_ignores_include_list() {
        assert!(should_display("/blog/", true, "/shop/", ""));
        assert!(!should_display("/checkout/", true, "", "/checkout/"));
    }
}
