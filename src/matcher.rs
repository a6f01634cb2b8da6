//! Compiled name matchers for index, role, user and host patterns.
//!
//! A pattern list compiles once into a [`WildcardMatcher`]. Three pattern forms are
//! recognized:
//! - `*` on its own matches every name;
//! - `/regex/` is a regular expression that must match the whole name;
//! - anything else is literal text where `*` matches any run of characters and `?`
//!   matches exactly one. Literals without wildcards are compared by equality.
//!
//! An empty list matches nothing. Matching is case-sensitive.

use std::collections::HashSet;

use regex::{Regex, RegexSet};

use crate::constants::MATCH_ALL_PATTERN;
use crate::error::{GuardError, Result};

/// A compiled, immutable set of name patterns.
#[derive(Debug, Clone, Default)]
pub struct WildcardMatcher {
    patterns: Vec<String>,
    kind: MatcherKind,
}

#[derive(Debug, Clone, Default)]
enum MatcherKind {
    #[default]
    Nothing,
    Any,
    Compiled {
        exact: HashSet<String>,
        wildcards: Option<RegexSet>,
    },
}

impl WildcardMatcher {
    /// Matcher that rejects every name.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Compile a pattern list. Fails on the first malformed pattern; no partial
    /// matcher is ever returned.
    pub fn compile<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|pattern| pattern.as_ref().to_string())
            .collect();

        if patterns.is_empty() {
            return Ok(Self::none());
        }

        let mut exact = HashSet::new();
        let mut sources = Vec::new();
        let mut any = false;

        for pattern in &patterns {
            match parse_pattern(pattern)? {
                ParsedPattern::Any => any = true,
                ParsedPattern::Exact(name) => {
                    exact.insert(name);
                }
                ParsedPattern::Regex(source) => sources.push(source),
            }
        }

        let kind = if any {
            MatcherKind::Any
        } else {
            let wildcards = if sources.is_empty() {
                None
            } else {
                Some(RegexSet::new(&sources).map_err(|err| {
                    GuardError::invalid_pattern(&patterns.join(","), err.to_string())
                })?)
            };
            MatcherKind::Compiled { exact, wildcards }
        };

        Ok(Self { patterns, kind })
    }

    /// Whether `name` matches at least one pattern.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match &self.kind {
            MatcherKind::Nothing => false,
            MatcherKind::Any => true,
            MatcherKind::Compiled { exact, wildcards } => {
                exact.contains(name)
                    || wildcards
                        .as_ref()
                        .is_some_and(|set| set.is_match(name))
            }
        }
    }

    /// Whether any of `names` matches at least one pattern. An empty input never matches.
    pub fn matches_any<I, S>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if matches!(self.kind, MatcherKind::Nothing) {
            return false;
        }
        names.into_iter().any(|name| self.matches(name.as_ref()))
    }

    /// True when the matcher was compiled from an empty list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, MatcherKind::Nothing)
    }

    /// The source patterns, in configured order.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

enum ParsedPattern {
    Any,
    Exact(String),
    Regex(String),
}

fn parse_pattern(pattern: &str) -> Result<ParsedPattern> {
    if pattern.trim().is_empty() {
        return Err(GuardError::invalid_pattern(pattern, "pattern is blank"));
    }
    if pattern == MATCH_ALL_PATTERN {
        return Ok(ParsedPattern::Any);
    }

    if pattern.len() > 1 && pattern.starts_with('/') && pattern.ends_with('/') {
        let body = &pattern[1..pattern.len() - 1];
        if body.is_empty() {
            return Err(GuardError::invalid_pattern(pattern, "regex body is empty"));
        }
        let source = format!("^(?:{body})$");
        Regex::new(&source).map_err(|err| GuardError::invalid_pattern(pattern, err.to_string()))?;
        return Ok(ParsedPattern::Regex(source));
    }

    if pattern.contains(['*', '?']) {
        return Ok(ParsedPattern::Regex(wildcard_to_regex(pattern)));
    }

    Ok(ParsedPattern::Exact(pattern.to_string()))
}

fn wildcard_to_regex(pattern: &str) -> String {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push_str("(?s)^");
    let mut buf = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            other => source.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }
    source.push('$');
    source
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_matches_nothing() {
        let matcher = WildcardMatcher::compile(Vec::<String>::new()).unwrap();
        assert!(matcher.is_empty());
        assert!(!matcher.matches("anything"));
        assert!(!matcher.matches(""));
        assert!(!matcher.matches_any(["a", "b"]));
    }

    #[test]
    fn star_matches_everything() {
        let matcher = WildcardMatcher::compile(["*"]).unwrap();
        assert!(matcher.matches("finance-2024"));
        assert!(matcher.matches(""));
        assert!(matcher.matches_any(["x"]));
        assert!(!matcher.matches_any(Vec::<&str>::new()));
    }

    #[test]
    fn wildcards_are_anchored() {
        let matcher = WildcardMatcher::compile(["finance-*", "log?"]).unwrap();
        assert!(matcher.matches("finance-2024"));
        assert!(matcher.matches("finance-"));
        assert!(!matcher.matches("old-finance-2024"));
        assert!(matcher.matches("logs"));
        assert!(!matcher.matches("log"));
        assert!(!matcher.matches("logs2"));
    }

    #[test]
    fn literal_characters_are_escaped() {
        let matcher = WildcardMatcher::compile([".sys-*"]).unwrap();
        assert!(matcher.matches(".sys-audit"));
        assert!(!matcher.matches("xsys-audit"));
    }

    #[test]
    fn exact_patterns_compare_by_equality() {
        let matcher = WildcardMatcher::compile(["finance_admin"]).unwrap();
        assert!(matcher.matches("finance_admin"));
        assert!(!matcher.matches("Finance_admin"));
        assert!(!matcher.matches("finance_admin2"));
    }

    #[test]
    fn regex_patterns_match_whole_name() {
        let matcher = WildcardMatcher::compile(["/audit-[0-9]{4}/"]).unwrap();
        assert!(matcher.matches("audit-2024"));
        assert!(!matcher.matches("audit-2024-01"));
        assert!(!matcher.matches("x-audit-2024"));
    }

    #[test]
    fn malformed_patterns_fail_fast() {
        let err = WildcardMatcher::compile(["ok-*", "/[unclosed/"]).unwrap_err();
        match err {
            GuardError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "/[unclosed/"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(WildcardMatcher::compile(["  "]).is_err());
        assert!(WildcardMatcher::compile(["//"]).is_err());
    }

    #[test]
    fn patterns_are_kept_in_order() {
        let matcher = WildcardMatcher::compile(["b", "a*"]).unwrap();
        assert_eq!(matcher.patterns(), ["b".to_string(), "a*".to_string()]);
    }
}
