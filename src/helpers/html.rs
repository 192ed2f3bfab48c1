//! HTML and XML string helpers

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HEADING_OPEN: Regex = Regex::new(r"<h[1-6][^>]*>").unwrap();
    static ref HEADING_CLOSE: Regex = Regex::new(r"</h[1-6]>").unwrap();
}

/// Escape the XML/HTML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Turn heading elements into running text: closing tags become `": "` so the
/// heading reads as a lead-in, opening tags disappear.
pub fn strip_headings(s: &str) -> String {
    let closed = HEADING_CLOSE.replace_all(s, ": ");
    HEADING_OPEN.replace_all(&closed, "").into_owned()
}

/// Collapse whitespace and truncate to at most `max` words, appending `...`
/// when anything was cut.
pub fn truncate_words(s: &str, max: usize) -> String {
    let words: Vec<&str> = s.split_whitespace().collect();
    if words.len() > max {
        format!("{}...", words[..max].join(" "))
    } else {
        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(
            escape_xml(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>World</b></p>"), "Hello World");
    }

    #[test]
    fn test_strip_headings() {
        assert_eq!(
            strip_headings("<h1>Title</h1><p>Body</p>"),
            "Title: <p>Body</p>"
        );
        assert_eq!(strip_headings(r#"<h2 id="x">Sub</h2>text"#), "Sub: text");
    }

    #[test]
    fn test_truncate_words_short_input() {
        assert_eq!(truncate_words("Hello, World!", 50), "Hello, World!");
    }

    #[test]
    fn test_truncate_words_long_input() {
        let long = vec!["word"; 60].join(" ");
        let truncated = truncate_words(&long, 50);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.split_whitespace().count(), 50);
    }

    #[test]
    fn test_truncate_words_collapses_whitespace() {
        assert_eq!(truncate_words("a  b\n c", 50), "a b c");
    }
}
