//! Glob-style route patterns.
//!
//! Two wildcards are understood: `*` matches one non-empty path segment
//! (or a run of non-`/` characters inside a segment, as in `*.md`), and
//! `**` matches zero or more whole segments. Everything else is literal and
//! case-sensitive. Both the pattern and the path are compared with leading
//! and trailing `/` stripped, and the match is anchored at both ends.

use regex::Regex;

/// Single-segment wildcard expansion.
const SEGMENT: &str = "[^/]+";

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

/// One `/`-separated piece of a normalized pattern.
#[derive(Debug, PartialEq)]
enum Token<'a> {
    Globstar,
    Literal(&'a str),
}

impl Pattern {
    /// Compile a pattern, rejecting malformed wildcard syntax.
    ///
    /// A trailing `**` also matches its bare prefix: `docs/**` matches `docs`.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let normalized = normalize(pattern);
        let tokens = tokenize(normalized)?;

        let mut expr = String::with_capacity(normalized.len() * 2 + 2);
        expr.push('^');

        // `**` absorbs the separator next to it so that it can also match
        // zero segments: `docs/**` matches `docs`, `**/api` matches `api`.
        let mut leading_globstar = false;

        for (i, token) in tokens.iter().enumerate() {
            match token {
                Token::Globstar if tokens.len() == 1 => expr.push_str(".*"),
                Token::Globstar if i == 0 => {
                    expr.push_str("(?:.*/)?");
                    leading_globstar = true;
                }
                Token::Globstar => expr.push_str("(?:/.*)?"),
                Token::Literal(segment) => {
                    if i > 0 && !(i == 1 && leading_globstar) {
                        expr.push('/');
                    }
                    for (j, fragment) in segment.split('*').enumerate() {
                        if j > 0 {
                            expr.push_str(SEGMENT);
                        }
                        expr.push_str(&regex::escape(fragment));
                    }
                }
            }
        }

        expr.push('$');

        let regex = Regex::new(&expr).map_err(|e| PatternError::Compile {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Whether `path` matches this pattern.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(normalize(path))
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Match a path against a pattern.
///
/// A malformed pattern never matches; the problem is logged.
pub fn matches(path: &str, pattern: &str) -> bool {
    match Pattern::compile(pattern) {
        Ok(compiled) => compiled.is_match(path),
        Err(e) => {
            tracing::warn!("{}", e);
            false
        }
    }
}

/// Strip leading and trailing `/`.
fn normalize(path: &str) -> &str {
    path.trim_matches('/')
}

fn tokenize(normalized: &str) -> Result<Vec<Token<'_>>, PatternError> {
    if let Some(c) = normalized
        .chars()
        .find(|c| c.is_whitespace() || c.is_control())
    {
        return Err(PatternError::InvalidCharacter {
            pattern: normalized.to_string(),
            character: c,
        });
    }

    if normalized.contains("***") {
        return Err(PatternError::WildcardRun(normalized.to_string()));
    }

    let mut tokens = Vec::new();
    for segment in normalized.split('/') {
        if segment == "**" {
            // `**/**` is the same as `**`
            if tokens.last() != Some(&Token::Globstar) {
                tokens.push(Token::Globstar);
            }
        } else if segment.contains("**") {
            return Err(PatternError::UnbalancedGlob(normalized.to_string()));
        } else {
            tokens.push(Token::Literal(segment));
        }
    }

    Ok(tokens)
}

/// Errors for malformed route patterns.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid pattern '{0}': three or more consecutive '*'")]
    WildcardRun(String),

    #[error("Invalid pattern '{0}': '**' must be a whole path segment")]
    UnbalancedGlob(String),

    #[error("Invalid pattern '{pattern}': unsupported character {character:?}")]
    InvalidCharacter { pattern: String, character: char },

    #[error("Invalid pattern '{pattern}': {message}")]
    Compile { pattern: String, message: String },
}
