use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("URL pattern is valid"));

const LINK_TEMPLATE: &str = r#"<a href="$0" target="_blank" rel="noopener noreferrer">$0</a>"#;

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Formats message text as markup for the transcript.
///
/// The text is escaped first, so only the anchors and line breaks added here
/// can end up as live markup. URLs open in a new browsing context.
pub fn render_message(text: &str) -> String {
    let escaped = escape_html(text);
    let linked = URL_PATTERN.replace_all(&escaped, LINK_TEMPLATE);
    linked.replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unchanged() {
        let text = "Hello there, how are you today";
        assert_eq!(render_message(text), text);
    }

    #[test]
    fn special_characters_are_escaped_and_nothing_else_changes() {
        assert_eq!(
            render_message(r#"a < b && "c" > 'd'"#),
            "a &lt; b &amp;&amp; &quot;c&quot; &gt; &#39;d&#39;"
        );
    }

    #[test]
    fn each_newline_becomes_one_break() {
        let markup = render_message("one\ntwo\n\nthree\n");
        assert_eq!(markup.matches("<br>").count(), 4);
        assert!(!markup.contains('\n'));
        assert_eq!(markup, "one<br>two<br><br>three<br>");
    }

    #[test]
    fn urls_become_new_tab_links() {
        let markup = render_message("see https://example.com/x for more");
        assert_eq!(
            markup,
            "see <a href=\"https://example.com/x\" target=\"_blank\" \
             rel=\"noopener noreferrer\">https://example.com/x</a> for more"
        );
    }

    #[test]
    fn plain_http_and_multiple_links() {
        let markup = render_message("http://a.test and https://b.test/path?q=1");
        assert_eq!(markup.matches("<a href=").count(), 2);
        assert!(markup.contains(">http://a.test</a>"));
        assert!(markup.contains(">https://b.test/path?q=1</a>"));
    }

    #[test]
    fn link_stops_at_line_break() {
        let markup = render_message("Learn more: https://en.wikipedia.org/wiki/Rust\nRelated");
        assert!(markup.contains(">https://en.wikipedia.org/wiki/Rust</a><br>Related"));
    }

    #[test]
    fn markup_in_text_cannot_inject_elements() {
        let markup = render_message("<script>alert(1)</script><img src=x onerror=alert(1)>");
        assert!(!markup.contains("<script"));
        assert!(!markup.contains("<img"));
        assert!(markup.starts_with("&lt;script&gt;"));
    }

    #[test]
    fn quotes_in_url_cannot_break_out_of_href() {
        let markup = render_message("https://evil.test/\"onmouseover=\"alert(1)");
        assert!(!markup.contains("\"onmouseover"));
        assert!(markup.contains("&quot;onmouseover=&quot;"));
    }

    #[test]
    fn ampersands_in_urls_stay_escaped() {
        let markup = render_message("https://a.test/?x=1&y=2");
        assert!(markup.contains("href=\"https://a.test/?x=1&amp;y=2\""));
    }
}
