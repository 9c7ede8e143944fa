/// Make `text` safe to place inside a quoted node label.
///
/// `"` becomes `'`, `&`, `<` and `>` become HTML entities, and carriage
/// returns and newlines become single spaces.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => out.push('\''),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' | '\r' => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

/// Escape `text` and wrap it in double quotes.
#[must_use]
pub fn escape_label(text: &str) -> String {
    format!("\"{}\"", escape_text(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_quotes() {
        assert_eq!(escape_text(r#"say "hi""#), "say 'hi'");
    }

    #[test]
    fn html_entities() {
        assert_eq!(escape_text("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    }

    #[test]
    fn newlines_become_spaces() {
        assert_eq!(escape_text("a\nb\r\nc"), "a b  c");
    }

    #[test]
    fn label_is_quoted() {
        assert_eq!(escape_label("always true"), "\"always true\"");
        assert_eq!(escape_label(""), "\"\"");
    }

    #[test]
    fn plain_text_is_unchanged() {
        let text = "actor_attribute_equals(role: admin)";
        assert_eq!(escape_text(text), text);
        assert_eq!(escape_text(&escape_text(text)), escape_text(text));
    }
}
