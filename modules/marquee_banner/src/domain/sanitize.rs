//! Rich-text sanitizer for the banner message
//!
//! The message is parsed into a tree with `tl` and re-serialized, keeping only a
//! small inline tag set. Elements outside the set are unwrapped (children kept),
//! except `script`/`style` whose content is dropped. Character references in text
//! are left untouched, so `&nbsp;` survives. A `<` that cannot open a tag is
//! text and is escaped before parsing.

const ALLOWED_TAGS: &[&str] = &["strong", "em", "b", "i", "span", "br", "a"];
const DROPPED_CONTENT_TAGS: &[&str] = &["script", "style"];
const GLOBAL_ATTRIBUTES: &[&str] = &["class", "style", "title"];
const LINK_ATTRIBUTES: &[&str] = &["href", "target", "rel"];
const DANGEROUS_SCHEMES: &[&str] = &["javascript:", "data:", "vbscript:", "file:", "ftp:"];
/// Serialization order of kept attributes
const ATTRIBUTE_ORDER: &[&str] = &["href", "target", "rel", "class", "title", "style"];
const UNSAFE_STYLE_TOKENS: &[&str] = &["expression(", "url(", "javascript:", "behavior:"];

/// Something the sanitizer removed from the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Neutralized {
    /// Element outside the allow-list, children kept
    UnwrappedTag(String),
    /// Element removed together with its content
    DroppedTag(String),
    /// `on*` attribute
    EventHandler(String),
    /// Attribute outside the allow-list
    Attribute(String),
    /// URL-bearing value with a script-capable scheme
    DangerousUrl { attribute: String },
    /// `style` value able to load or run code
    UnsafeStyle,
}

impl Neutralized {
    /// Whether the removed item could have executed script
    pub fn is_security_relevant(&self) -> bool {
        matches!(
            self,
            Self::DroppedTag(_) | Self::EventHandler(_) | Self::DangerousUrl { .. } | Self::UnsafeStyle
        )
    }
}

/// Sanitizer output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sanitized {
    pub html: String,
    pub neutralized: Vec<Neutralized>,
    /// Text was cut to fit the character budget
    pub truncated: bool,
}

/// Sanitize user-supplied rich text down to the inline allow-list
pub fn sanitize_message(input: &str) -> Sanitized {
    sanitize_message_within(input, usize::MAX)
}

/// Sanitize and keep at most `max_chars` characters of visible text
///
/// The budget counts decoded text, so `&gt;` is one character. The cut
/// happens inside a text node and every open element is still closed, so
/// sanitizing the output again returns it unchanged.
pub fn sanitize_message_within(input: &str, max_chars: usize) -> Sanitized {
    let mut writer = Writer {
        out: Sanitized::default(),
        remaining: max_chars,
    };
    if input.trim().is_empty() {
        return writer.out;
    }

    let source = escape_stray_brackets(input);
    match tl::parse(&source, tl::ParserOptions::default()) {
        Ok(dom) => {
            let parser = dom.parser();
            for handle in dom.children() {
                writer.node(*handle, parser);
            }
        }
        Err(e) => {
            tracing::debug!("Message markup could not be parsed, keeping escaped text: {:?}", e);
            writer.text(&escape_text(&source));
        }
    }

    let mut out = writer.out;
    let trimmed = out.html.trim();
    if trimmed.len() != out.html.len() {
        out.html = trimmed.to_string();
    }
    out
}

/// Text content of `input` with every tag removed and character references decoded
pub fn plain_text(input: &str) -> String {
    let mut text = String::new();
    let source = escape_stray_brackets(input);
    if let Ok(dom) = tl::parse(&source, tl::ParserOptions::default()) {
        let parser = dom.parser();
        for handle in dom.children() {
            collect_text(*handle, parser, &mut text);
        }
    }
    decode_char_refs(&text).trim().to_string()
}

/// Whether a URL-bearing value starts with a script-capable scheme
///
/// Whitespace and control characters are removed and numeric character
/// references decoded first, so `jav&#x09;ascript:` is caught too.
pub fn is_dangerous_url(value: &str) -> bool {
    let normalized: String = decode_char_refs(value)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    DANGEROUS_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

struct Writer {
    out: Sanitized,
    /// Visible characters still allowed
    remaining: usize,
}

impl Writer {
    fn node(&mut self, handle: tl::NodeHandle, parser: &tl::Parser<'_>) {
        if self.out.truncated {
            return;
        }
        if self.remaining == 0 {
            self.out.truncated = true;
            return;
        }
        match handle.get(parser) {
            Some(tl::Node::Raw(bytes)) => self.text(&escape_text(&bytes.as_utf8_str())),
            Some(tl::Node::Tag(tag)) => self.tag(tag, parser),
            Some(tl::Node::Comment(_)) | None => {}
        }
    }

    /// Append escaped text, cutting it when the budget runs out
    fn text(&mut self, escaped: &str) {
        let decoded = decode_char_refs(escaped);
        let visible = decoded.chars().count();
        if visible <= self.remaining {
            self.remaining -= visible;
            self.out.html.push_str(escaped);
            return;
        }
        let kept: String = decoded.chars().take(self.remaining).collect();
        self.out.html.push_str(&escape_decoded(&kept));
        self.remaining = 0;
        self.out.truncated = true;
    }

    fn tag(&mut self, tag: &tl::HTMLTag<'_>, parser: &tl::Parser<'_>) {
        // `<br/>` arrives with the slash in the name
        let name = tag
            .name()
            .as_utf8_str()
            .trim_end_matches('/')
            .to_ascii_lowercase();

        if DROPPED_CONTENT_TAGS.contains(&name.as_str()) {
            self.out.neutralized.push(Neutralized::DroppedTag(name));
            return;
        }

        let allowed = ALLOWED_TAGS.contains(&name.as_str());
        let attributes = if allowed {
            filter_attributes(&name, tag, &mut self.out.neutralized)
        } else {
            self.out.neutralized.push(Neutralized::UnwrappedTag(name.clone()));
            Vec::new()
        };

        // An anchor without a usable href is unwrapped like any other element
        let keep = allowed && (name != "a" || attributes.iter().any(|(key, _)| key == "href"));

        if keep {
            let html = &mut self.out.html;
            html.push('<');
            html.push_str(&name);
            for (key, value) in &attributes {
                html.push(' ');
                html.push_str(key);
                html.push_str("=\"");
                html.push_str(&escape_attribute(value));
                html.push('"');
            }
            html.push('>');
        }

        for child in tag.children().top().iter() {
            self.node(*child, parser);
        }

        if keep && name != "br" {
            self.out.html.push_str("</");
            self.out.html.push_str(&name);
            self.out.html.push('>');
        }
    }
}

fn filter_attributes(
    tag: &str,
    element: &tl::HTMLTag<'_>,
    neutralized: &mut Vec<Neutralized>,
) -> Vec<(String, String)> {
    let mut kept: Vec<(String, String)> = Vec::new();

    for (key, value) in element.attributes().iter() {
        let key = key.to_ascii_lowercase();
        let value = value.map(|v| v.into_owned()).unwrap_or_default();

        if key.starts_with("on") {
            neutralized.push(Neutralized::EventHandler(key));
            continue;
        }

        let allowed = GLOBAL_ATTRIBUTES.contains(&key.as_str())
            || (tag == "a" && LINK_ATTRIBUTES.contains(&key.as_str()));
        if !allowed {
            neutralized.push(Neutralized::Attribute(key));
            continue;
        }

        if is_dangerous_url(&value) {
            neutralized.push(Neutralized::DangerousUrl { attribute: key });
            continue;
        }

        if key == "style" && !is_safe_style(&value) {
            neutralized.push(Neutralized::UnsafeStyle);
            continue;
        }

        if kept.iter().any(|(existing, _)| existing == &key) {
            continue;
        }
        kept.push((key, value));
    }

    let opens_new_window = kept
        .iter()
        .any(|(key, value)| key == "target" && value.trim().eq_ignore_ascii_case("_blank"));
    if opens_new_window {
        kept.retain(|(key, _)| key != "rel");
        kept.push(("rel".to_string(), "noopener noreferrer".to_string()));
    }

    kept.sort_by_key(|(key, _)| ATTRIBUTE_ORDER.iter().position(|known| *known == key.as_str()));
    kept
}

fn is_safe_style(value: &str) -> bool {
    let compact: String = decode_char_refs(value)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    !UNSAFE_STYLE_TOKENS.iter().any(|token| compact.contains(token))
}

fn collect_text(handle: tl::NodeHandle, parser: &tl::Parser<'_>, text: &mut String) {
    match handle.get(parser) {
        Some(tl::Node::Raw(bytes)) => text.push_str(&bytes.as_utf8_str()),
        Some(tl::Node::Tag(tag)) => {
            let name = tag
                .name()
                .as_utf8_str()
                .trim_end_matches('/')
                .to_ascii_lowercase();
            if DROPPED_CONTENT_TAGS.contains(&name.as_str()) {
                return;
            }
            for child in tag.children().top().iter() {
                collect_text(*child, parser, text);
            }
        }
        Some(tl::Node::Comment(_)) | None => {}
    }
}

/// Escape every `<` that cannot start a tag, comment or end tag
fn escape_stray_brackets(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        let opens_markup = chars
            .peek()
            .is_some_and(|next| next.is_ascii_alphabetic() || matches!(next, '/' | '!'));
        if c == '<' && !opens_markup {
            out.push_str("&lt;");
        } else {
            out.push(c);
        }
    }
    out
}

/// Escape markup-significant characters in text, leaving `&` so references survive
fn escape_text(value: &str) -> String {
    value.replace('<', "&lt;").replace('>', "&gt;")
}

/// Escape already decoded text so each character reads back as one
fn escape_decoded(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\u{a0}', "&nbsp;")
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Decode numeric and a few named character references
fn decode_char_refs(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match decode_reference(tail) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode one reference at the start of `tail` (which begins with `&`)
fn decode_reference(tail: &str) -> Option<(char, usize)> {
    let body = &tail[1..];

    if let Some(numeric) = body.strip_prefix('#') {
        let (radix, digits_start) = match numeric.chars().next() {
            Some('x') | Some('X') => (16, 1),
            _ => (10, 0),
        };
        let digits: String = numeric[digits_start..]
            .chars()
            .take_while(|c| c.is_digit(radix))
            .collect();
        if digits.is_empty() {
            return None;
        }
        let ch = u32::from_str_radix(&digits, radix).ok().and_then(char::from_u32)?;
        let mut consumed = 2 + digits_start + digits.len();
        if tail[consumed..].starts_with(';') {
            consumed += 1;
        }
        return Some((ch, consumed));
    }

    let end = body.find(';').filter(|end| *end <= 8)?;
    let ch = match body[..end].to_ascii_lowercase().as_str() {
        "colon" => ':',
        "tab" => '\t',
        "newline" => '\n',
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => return None,
    };
    Some((ch, end + 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_markup_passes_through() {
        assert_eq!(sanitize_message("<strong>ok</strong>").html, "<strong>ok</strong>");
        assert_eq!(
            sanitize_message("Big <em>sale</em><br>").html,
            "Big <em>sale</em><br>"
        );
    }

    #[test]
    fn test_disallowed_elements_are_unwrapped() {
        let result = sanitize_message("<div>text</div>");
        assert_eq!(result.html, "text");
        assert_eq!(result.neutralized, vec![Neutralized::UnwrappedTag("div".to_string())]);

        assert_eq!(
            sanitize_message("<p>Hello <strong>world</strong></p>").html,
            "Hello <strong>world</strong>"
        );
    }

    #[test]
    fn test_script_is_removed() {
        let result = sanitize_message("<script>alert(1)</script>Sale");
        assert!(!result.html.contains("<script"));
        assert!(!result.html.contains("alert"));
        assert_eq!(result.html, "Sale");
        assert!(result.neutralized.iter().any(Neutralized::is_security_relevant));
    }

    #[test]
    fn test_event_handlers_are_stripped() {
        let result = sanitize_message("<span onclick=\"steal()\" class=\"hot\">Deal</span>");
        assert!(!result.html.contains("onclick"));
        assert!(result.html.contains("Deal"));
        assert!(result
            .neutralized
            .contains(&Neutralized::EventHandler("onclick".to_string())));
    }

    #[test]
    fn test_javascript_href_is_neutralized() {
        let result = sanitize_message("<a href=\"javascript:alert(1)\">x</a>");
        assert!(!result.html.contains("javascript"));
        assert!(!result.html.contains("href"));
        assert_eq!(result.html, "x");
    }

    #[test]
    fn test_obfuscated_schemes_are_caught() {
        assert!(is_dangerous_url("JavaScript:alert(1)"));
        assert!(is_dangerous_url("  javascript:alert(1)"));
        assert!(is_dangerous_url("jav&#x09;ascript:alert(1)"));
        assert!(is_dangerous_url("&#106;avascript:alert(1)"));
        assert!(is_dangerous_url("data:text/html;base64,xx"));
        assert!(is_dangerous_url("vbscript:msgbox"));
        assert!(is_dangerous_url("file:///etc/passwd"));
        assert!(is_dangerous_url("ftp://example.com"));
        assert!(!is_dangerous_url("https://example.com/sale"));
        assert!(!is_dangerous_url("/shop/"));
    }

    #[test]
    fn test_safe_links_keep_href_and_get_rel() {
        let result = sanitize_message("<a href=\"https://example.com\" target=\"_blank\">Shop</a>");
        assert_eq!(
            result.html,
            "<a href=\"https://example.com\" target=\"_blank\" rel=\"noopener noreferrer\">Shop</a>"
        );
    }

    #[test]
    fn test_anchor_without_href_is_unwrapped() {
        assert_eq!(sanitize_message("<a title=\"t\">plain</a>").html, "plain");
    }

    #[test]
    fn test_nbsp_is_preserved() {
        assert_eq!(sanitize_message("A&nbsp;B").html, "A&nbsp;B");
    }

    #[test]
    fn test_unsafe_style_is_removed() {
        let result = sanitize_message("<span style=\"background:url(http://x/y.png)\">x</span>");
        assert_eq!(result.html, "<span>x</span>");
        assert!(result.neutralized.contains(&Neutralized::UnsafeStyle));
    }

    #[test]
    fn test_sanitizing_is_stable() {
        let once = sanitize_message("<div><a href=\"/x\" onclick=\"y\">Go</a> <i>now</i></div>").html;
        let twice = sanitize_message(&once).html;
        assert_eq!(once, twice);
    }

    #[test]
    fn test_bare_angle_brackets_are_text() {
        assert_eq!(sanitize_message("Price < $50").html, "Price &lt; $50");
        assert_eq!(sanitize_message("5 > 3 and 2 < 4").html, "5 &gt; 3 and 2 &lt; 4");
        assert_eq!(sanitize_message("a < b and c > d").html, "a &lt; b and c &gt; d");
        assert_eq!(sanitize_message("1<2 <b>ok</b>").html, "1&lt;2 <b>ok</b>");
        assert_eq!(plain_text("Under < $5"), "Under < $5");
    }

    #[test]
    fn test_self_closing_break_is_kept() {
        assert_eq!(
            sanitize_message("<em>a</em><br/><em>b</em>").html,
            "<em>a</em><br><em>b</em>"
        );
        assert_eq!(sanitize_message("<br/>x<BR>").html, "<br>x<br>");
        assert_eq!(sanitize_message("a<br />b").html, "a<br>b");
    }

    #[test]
    fn test_budget_cuts_text_not_tags() {
        let result = sanitize_message_within("<strong>Hello world</strong> <a href=\"/x\">Go</a>", 5);
        assert!(result.truncated);
        assert_eq!(result.html, "<strong>Hello</strong>");

        let result = sanitize_message_within("a>b>c>d>e>", 10);
        assert!(!result.truncated);
        assert_eq!(result.html, "a&gt;b&gt;c&gt;d&gt;e&gt;");

        let result = sanitize_message_within("Tom &amp; Jerry", 5);
        assert_eq!(result.html, "Tom &amp;");
    }

    #[test]
    fn test_budgeted_output_is_stable() {
        let input = format!("{} <a href=\"/x\" target=\"_blank\">Go</a> & more > less", "x".repeat(30));
        for budget in [10, 31, 32, 33, 40, 200] {
            let once = sanitize_message_within(&input, budget);
            let twice = sanitize_message_within(&once.html, budget);
            assert_eq!(once.html, twice.html, "budget {budget}");
            assert!(!twice.truncated, "budget {budget}");
        }
    }

    #[test]
    fn test_plain_text_strips_everything() {
        assert_eq!(plain_text("<b>Shop</b> &amp; save"), "Shop & save");
        assert_eq!(plain_text("<script>x()</script>Go"), "Go");
    }
}
