//! Context extraction for the `xml_min` projection.

use std::ops::Range;

use regex::Regex;

/// Byte ranges of every non-overlapping match, each widened back to the
/// nearest `<` before the match start.
///
/// A match with no `<` before it keeps its own start.
pub fn snippet_spans<'s>(
    serialized: &'s str,
    regex: &'s Regex,
) -> impl Iterator<Item = Range<usize>> + 's {
    regex.find_iter(serialized).map(move |m| {
        let start = serialized[..m.start()].rfind('<').unwrap_or(m.start());
        start..m.end()
    })
}

/// The text of each span from [`snippet_spans`].
pub fn snippets<'s>(serialized: &'s str, regex: &'s Regex) -> impl Iterator<Item = &'s str> + 's {
    snippet_spans(serialized, regex).map(move |span| &serialized[span])
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = r#"<ReportHost name="h"><tag name="host-ip">10.0.0.5</tag><ReportItem port="443" svc_name="www"/></ReportHost>"#;

    #[test]
    fn snippet_starts_at_enclosing_element() {
        let regex = Regex::new("www").unwrap();
        let found: Vec<_> = snippets(HOST, &regex).collect();
        assert_eq!(found, vec![r#"<ReportItem port="443" svc_name="www"#]);
    }

    #[test]
    fn one_snippet_per_match() {
        let regex = Regex::new("host").unwrap();
        let found: Vec<_> = snippets(HOST, &regex).collect();
        assert_eq!(found, vec![r#"<tag name="host"#]);

        let regex = Regex::new(r"\d+").unwrap();
        let found: Vec<_> = snippets(HOST, &regex).collect();
        assert_eq!(
            found,
            vec![
                "<tag name=\"host-ip\">10",
                "<tag name=\"host-ip\">10.0",
                "<tag name=\"host-ip\">10.0.0",
                "<tag name=\"host-ip\">10.0.0.5",
                "<ReportItem port=\"443",
            ]
        );
    }

    #[test]
    fn span_ends_exactly_at_match_end() {
        let regex = Regex::new(r"10\.0").unwrap();
        let spans: Vec<_> = snippet_spans(HOST, &regex).collect();
        assert_eq!(spans.len(), 1);
        let m = regex.find(HOST).unwrap();
        assert_eq!(spans[0].end, m.end());
        assert_eq!(spans[0].start, HOST.find("<tag").unwrap());
    }

    #[test]
    fn match_at_host_start_keeps_its_own_start() {
        let regex = Regex::new("<ReportHost").unwrap();
        let found: Vec<_> = snippets(HOST, &regex).collect();
        assert_eq!(found, vec!["<ReportHost"]);
    }

    #[test]
    fn match_on_closing_tag_reaches_back_to_it() {
        let regex = Regex::new("/ReportHost").unwrap();
        let found: Vec<_> = snippets(HOST, &regex).collect();
        assert_eq!(found, vec!["</ReportHost"]);
    }
}
