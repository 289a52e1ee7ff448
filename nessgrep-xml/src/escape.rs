/// Escape character data for element content.
pub fn escape_text(s: &str) -> String {
    escape(s, false)
}

/// Escape an attribute value for use inside double quotes.
pub fn escape_attribute(s: &str) -> String {
    escape(s, true)
}

fn escape(s: &str, quote: bool) -> String {
    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if quote => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_escapes_markup_only() {
        assert_eq!(escape_text("plain"), "plain");
        assert_eq!(escape_text("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_text("say \"hi\" it's"), "say \"hi\" it's");
    }

    #[test]
    fn attribute_escapes_quotes() {
        assert_eq!(escape_attribute("SSL / TLS"), "SSL / TLS");
        assert_eq!(
            escape_attribute("<\"x\" & y>"),
            "&lt;&quot;x&quot; &amp; y&gt;"
        );
    }
}
