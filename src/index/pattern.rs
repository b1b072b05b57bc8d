//! Glob token matching
//!
//! One query pattern token is compiled into a [`TokenMatcher`] and evaluated
//! against the child keys of a trie node. Supported metacharacters are `*`
//! (zero or more bytes), `?` and `[...]` (character class, handed to the
//! regex engine). Matching is byte-wise, not Unicode-aware.
//!
//! Most patterns never reach the regex engine: lone `*`, plain literals,
//! single-`*` prefix/suffix forms and single-`?` head/tail forms are matched
//! with direct byte comparisons. Everything else becomes an anchored regex
//! built by substituting `*` → `.*` and `?` → `.?`.
//!
//! The `?` substitution is `.?`, i.e. *zero or one* byte on the regex path,
//! while the head/tail fast paths require exactly one byte. This asymmetry
//! is long-standing observable behaviour and is kept as-is.

use regex::bytes::Regex;

/// A single pattern token, compiled to its cheapest matching strategy.
#[derive(Debug)]
pub enum TokenMatcher {
    /// `*` — matches every child key
    Any,
    /// No metacharacters — exact key lookup
    Literal(String),
    /// `abc*` — key must start with the stored prefix
    Prefix(String),
    /// `*abc` — key must end with the stored suffix
    Suffix(String),
    /// `?abc` — equal length, all bytes after the first equal
    HeadWild(String),
    /// `abc?` — equal length, all bytes before the last equal
    TailWild(String),
    /// Anchored regex fallback
    Pattern(Regex),
    /// Malformed class expression — matches nothing
    Never,
}

impl TokenMatcher {
    /// Compile one pattern token.
    pub fn compile(pattern: &str) -> Self {
        if pattern == "*" {
            return TokenMatcher::Any;
        }

        let has_star = pattern.contains('*');
        let has_question = pattern.contains('?');
        let has_class = pattern.contains('[') || pattern.contains(']');

        if !has_star && !has_question && !has_class {
            return TokenMatcher::Literal(pattern.to_string());
        }

        if has_class {
            return Self::regex(pattern, true, true);
        }

        if has_star && !has_question {
            let first = pattern.find('*').unwrap();
            let last = pattern.rfind('*').unwrap();
            if first == last {
                if first == 0 {
                    return TokenMatcher::Suffix(pattern[1..].to_string());
                }
                if first == pattern.len() - 1 {
                    return TokenMatcher::Prefix(pattern[..pattern.len() - 1].to_string());
                }
            }
            // more than one star or a star in the middle
            return Self::regex(pattern, true, false);
        }

        if has_question && !has_star {
            let first = pattern.find('?').unwrap();
            let last = pattern.rfind('?').unwrap();
            if first == last {
                if first == 0 {
                    return TokenMatcher::HeadWild(pattern.to_string());
                }
                if first == pattern.len() - 1 {
                    return TokenMatcher::TailWild(pattern.to_string());
                }
            }
            return Self::regex(pattern, false, true);
        }

        // both * and ?
        Self::regex(pattern, true, true)
    }

    fn regex(pattern: &str, subst_star: bool, subst_question: bool) -> Self {
        let mut body = pattern.to_string();
        if subst_star {
            body = body.replace('*', ".*");
        }
        if subst_question {
            body = body.replace('?', ".?");
        }
        match Regex::new(&format!("(?-u)^{body}$")) {
            Ok(re) => TokenMatcher::Pattern(re),
            Err(_) => TokenMatcher::Never,
        }
    }

    /// Returns the literal key when this matcher can be resolved with a
    /// single map lookup.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            TokenMatcher::Literal(key) => Some(key),
            _ => None,
        }
    }

    /// Test a child key against this matcher.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            TokenMatcher::Any => true,
            TokenMatcher::Literal(p) => key == p,
            TokenMatcher::Prefix(p) => key.starts_with(p.as_str()),
            TokenMatcher::Suffix(p) => key.ends_with(p.as_str()),
            TokenMatcher::HeadWild(p) => {
                key.len() == p.len() && key.as_bytes()[1..] == p.as_bytes()[1..]
            }
            TokenMatcher::TailWild(p) => {
                key.len() == p.len()
                    && key.as_bytes()[..key.len() - 1] == p.as_bytes()[..p.len() - 1]
            }
            TokenMatcher::Pattern(re) => re.is_match(key.as_bytes()),
            TokenMatcher::Never => false,
        }
    }
}
