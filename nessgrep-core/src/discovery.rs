//! Expands a base directory plus a file glob into candidate report files.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Files matching `pattern` under `base`.
///
/// `pattern` may contain `/`-separated segments; each segment supports `*`,
/// `?` and `[...]` classes. Wildcards never match a leading `.` unless the
/// segment itself starts with one. Missing or unreadable directories yield
/// nothing. Entries are visited in name order.
pub fn discover_files(base: &Path, pattern: &str) -> Vec<PathBuf> {
    let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let mut found = Vec::new();
    expand(base, &segments, &mut found);
    debug!(base = %base.display(), pattern, files = found.len(), "discovered report files");
    found
}

fn expand(dir: &Path, segments: &[&str], found: &mut Vec<PathBuf>) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };

    if !has_wildcard(segment) {
        visit(dir.join(segment), rest, found);
        return;
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "cannot read directory");
            return;
        }
    };

    let mut names: Vec<String> = entries
        .flatten()
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| segment_matches(segment, name))
        .collect();
    names.sort();

    for name in names {
        visit(dir.join(name), rest, found);
    }
}

fn visit(path: PathBuf, rest: &[&str], found: &mut Vec<PathBuf>) {
    if rest.is_empty() {
        if path.is_file() {
            found.push(path);
        }
    } else if path.is_dir() {
        expand(&path, rest, found);
    }
}

fn has_wildcard(segment: &str) -> bool {
    segment.contains(['*', '?', '['])
}

fn segment_matches(segment: &str, name: &str) -> bool {
    if name.starts_with('.') && !segment.starts_with('.') {
        return false;
    }
    glob_match(segment, name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyOne,
    AnyRun,
    Class { negated: bool, ranges: Vec<(char, char)> },
}

impl Token {
    fn matches(&self, c: char) -> bool {
        match self {
            Token::Literal(l) => *l == c,
            Token::AnyOne => true,
            Token::AnyRun => true,
            Token::Class { negated, ranges } => {
                ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi) != *negated
            }
        }
    }
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => tokens.push(Token::AnyRun),
            '?' => tokens.push(Token::AnyOne),
            '[' => {
                if let Some((token, next)) = parse_class(&chars, i) {
                    tokens.push(token);
                    i = next;
                    continue;
                }
                tokens.push(Token::Literal('['));
            }
            c => tokens.push(Token::Literal(c)),
        }
        i += 1;
    }
    tokens
}

/// Parse `[...]` starting at `open`. Returns the token and the index after
/// the closing `]`, or `None` if the class is never closed.
fn parse_class(chars: &[char], open: usize) -> Option<(Token, usize)> {
    let mut i = open + 1;
    let negated = matches!(chars.get(i), Some('!'));
    if negated {
        i += 1;
    }
    let mut ranges = Vec::new();
    let mut first = true;
    while i < chars.len() {
        let c = chars[i];
        if c == ']' && !first {
            return Some((Token::Class { negated, ranges }, i + 1));
        }
        first = false;
        if chars.get(i + 1) == Some(&'-') && chars.get(i + 2).is_some_and(|&hi| hi != ']') {
            ranges.push((c, chars[i + 2]));
            i += 3;
        } else {
            ranges.push((c, c));
            i += 1;
        }
    }
    None
}

/// Glob matching supporting `*` (any run), `?` (one char) and `[...]`.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern = tokenize(pattern);
    let text: Vec<char> = text.chars().collect();
    let mut dp = vec![vec![false; text.len() + 1]; pattern.len() + 1];
    dp[0][0] = true;

    // Leading runs match the empty string.
    for (i, token) in pattern.iter().enumerate() {
        if *token == Token::AnyRun {
            dp[i + 1][0] = dp[i][0];
        }
    }

    for (i, token) in pattern.iter().enumerate() {
        for (j, &tc) in text.iter().enumerate() {
            if *token == Token::AnyRun {
                dp[i + 1][j + 1] = dp[i][j + 1] || dp[i + 1][j];
            } else if token.matches(tc) {
                dp[i + 1][j + 1] = dp[i][j];
            }
        }
    }

    dp[pattern.len()][text.len()]
}
