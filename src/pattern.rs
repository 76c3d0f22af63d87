//! Path patterns and segment-wise matching.
//!
//! A pattern is an ordered sequence of `/`-delimited segments. Each segment
//! is either a literal, a named parameter (`:name`) that consumes exactly one
//! non-empty segment, or a catch-all (`*name`) that consumes everything up to
//! the end of the path, embedded slashes included. A catch-all must be the
//! final segment of its pattern.
//!
//! Matching is purely structural: a pattern either captures a path or it does
//! not. Precedence between overlapping patterns is decided by the order in
//! which routes were registered, never here.

use std::fmt;

/// One element of a parsed pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Must equal the request segment exactly (case-sensitive).
    Literal(String),
    /// Consumes exactly one non-empty segment.
    Param(String),
    /// Consumes the remaining path, slashes included. Final segment only.
    CatchAll(String),
}

/// A parsed route pattern.
///
/// ```rust
/// use routetable::pattern::Pattern;
///
/// let pattern = Pattern::parse("/files/*file_path");
/// let caps = pattern.capture("/files/a/b/c.txt").unwrap();
/// assert_eq!(caps, vec![("file_path", "a/b/c.txt".to_owned())]);
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Parse a pattern string.
    ///
    /// Panics on a malformed pattern. Patterns are only parsed while the
    /// route table is being built at startup, where a malformed table is a
    /// fatal configuration error.
    pub fn parse(raw: &str) -> Self {
        if !raw.starts_with('/') {
            panic!("expect pattern beginning with '/', found: '{}'", raw);
        }

        let mut segments = Vec::new();
        let parts: Vec<&str> = raw[1..].split('/').collect();
        for (i, part) in parts.iter().enumerate() {
            if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    panic!("empty parameter name in pattern '{}'", raw);
                }
                segments.push(Segment::Param(name.to_owned()));
            } else if let Some(name) = part.strip_prefix('*') {
                if name.is_empty() {
                    panic!("empty catch-all name in pattern '{}'", raw);
                }
                if i + 1 != parts.len() {
                    panic!("catch-all must be the final segment of pattern '{}'", raw);
                }
                segments.push(Segment::CatchAll(name.to_owned()));
            } else {
                segments.push(Segment::Literal((*part).to_owned()));
            }
        }

        Pattern {
            raw: raw.to_owned(),
            segments,
        }
    }

    /// The pattern string as registered.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether `name` is declared as a `:name` or `*name` segment.
    pub fn has_param(&self, name: &str) -> bool {
        self.segments.iter().any(|s| match s {
            Segment::Param(n) | Segment::CatchAll(n) => n == name,
            Segment::Literal(_) => false,
        })
    }

    /// Names of all parameter segments, in pattern order.
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(n) | Segment::CatchAll(n) => Some(n.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Attempt a segment-wise match of `path` against this pattern.
    ///
    /// Returns the raw (uncoerced) captures in pattern order, or `None` if
    /// the path does not fit. Segment counts must agree exactly unless the
    /// pattern ends in a catch-all.
    pub fn capture(&self, path: &str) -> Option<Vec<(&str, String)>> {
        let rest = path.strip_prefix('/')?;
        let parts: Vec<&str> = rest.split('/').collect();

        let mut caps = Vec::new();
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                Segment::Literal(lit) => {
                    if *parts.get(i)? != lit.as_str() {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let part = *parts.get(i)?;
                    // An empty segment never satisfies a parameter, so
                    // `/items/` falls through to a literal `/items/` route.
                    if part.is_empty() {
                        return None;
                    }
                    caps.push((name.as_str(), part.to_owned()));
                }
                Segment::CatchAll(name) => {
                    if parts.len() < self.segments.len() {
                        return None;
                    }
                    caps.push((name.as_str(), parts[i..].join("/")));
                    return Some(caps);
                }
            }
        }

        if parts.len() == self.segments.len() {
            Some(caps)
        } else {
            None
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
