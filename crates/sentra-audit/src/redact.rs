//! Redaction of sensitive substrings.

use regex::Regex;
use tracing::debug;

/// Replacement written over every redacted match.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// A single operator-supplied pattern, compiled once.
#[derive(Debug, Clone)]
enum CompiledPattern {
    /// The pattern compiled as a regular expression.
    Regex(Regex),
    /// The pattern did not compile; match it as a literal substring.
    Literal(String),
}

/// Applies the configured redaction patterns to recorded text.
///
/// Each pattern is tried as a regular expression first. A pattern that
/// fails to compile is demoted to a literal substring match — the failure
/// is never surfaced to the caller, so a clumsy pattern still redacts
/// rather than silently logging secrets.
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    patterns: Vec<CompiledPattern>,
}

impl Redactor {
    /// Compile the given patterns.
    #[must_use]
    pub fn new(patterns: &[String]) -> Self {
        let patterns = patterns
            .iter()
            .filter(|p| !p.is_empty())
            .map(|pattern| match Regex::new(pattern) {
                Ok(re) => CompiledPattern::Regex(re),
                Err(_) => {
                    debug!(pattern = %pattern, "Redaction pattern is not a regex, using literal match");
                    CompiledPattern::Literal(pattern.clone())
                },
            })
            .collect();
        Self { patterns }
    }

    /// Check whether any patterns are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Replace every match of every pattern with [`REDACTION_MARKER`].
    ///
    /// Unmatched content is preserved byte-for-byte.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        let mut redacted = text.to_owned();
        for pattern in &self.patterns {
            redacted = match pattern {
                CompiledPattern::Regex(re) => {
                    re.replace_all(&redacted, REDACTION_MARKER).into_owned()
                },
                CompiledPattern::Literal(literal) => redacted.replace(literal, REDACTION_MARKER),
            };
        }
        redacted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redactor(patterns: &[&str]) -> Redactor {
        let patterns: Vec<String> = patterns.iter().map(ToString::to_string).collect();
        Redactor::new(&patterns)
    }

    #[test]
    fn test_regex_pattern_redacts_all_matches() {
        let r = redactor(&["sk-[a-z0-9]+"]);
        let out = r.apply("key1=sk-abc123 key2=sk-def456");
        assert_eq!(out, "key1=[REDACTED] key2=[REDACTED]");
    }

    #[test]
    fn test_invalid_regex_falls_back_to_literal() {
        // "[secret" is not a valid regex (unclosed class) but must still redact.
        let r = redactor(&["[secret"]);
        let out = r.apply("prefix [secret suffix");
        assert_eq!(out, "prefix [REDACTED] suffix");
    }

    #[test]
    fn test_unrelated_content_is_untouched() {
        let r = redactor(&["hunter2"]);
        let input = r#"{"query": "weather in paris", "lang": "fr"}"#;
        assert_eq!(r.apply(input), input);
    }

    #[test]
    fn test_patterns_apply_in_turn() {
        let r = redactor(&["alpha", "beta"]);
        assert_eq!(r.apply("alpha beta gamma"), "[REDACTED] [REDACTED] gamma");
    }

    #[test]
    fn test_no_patterns_is_identity() {
        let r = redactor(&[]);
        assert!(r.is_empty());
        assert_eq!(r.apply("anything at all"), "anything at all");
    }

    #[test]
    fn test_empty_pattern_is_ignored() {
        // An empty literal would otherwise explode every string.
        let r = redactor(&[""]);
        assert_eq!(r.apply("text"), "text");
    }
}
