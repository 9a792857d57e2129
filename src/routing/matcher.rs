//! Path template matching.
//!
//! # Responsibilities
//! - Recognise template paths (`/users/{id}`)
//! - Match a request path segment by segment
//! - Collect named captures
//!
//! # Design Decisions
//! - A segment is a capture only when it is exactly `{name}` with a non-empty name;
//!   anything else (including `{` fragments) is a literal
//! - Splitting keeps empty segments, so `/users/{id}` never matches `/users/7/`
//! - A capture never matches an empty segment
//! - Matching is case-sensitive, no decoding or normalisation

/// One segment of a compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Capture(String),
}

/// A compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
    literals: usize,
}

impl PathPattern {
    /// Compile `path` if it contains at least one capture segment.
    /// Plain paths return `None` and are served by exact lookup instead.
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<Segment> = path
            .split('/')
            .map(|s| match capture_name(s) {
                Some(name) => Segment::Capture(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();

        let literals = segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count();
        if literals == segments.len() {
            return None;
        }

        Some(Self {
            source: path.to_string(),
            segments,
            literals,
        })
    }

    /// The template as registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of literal segments; more literals means a more specific route.
    pub fn specificity(&self) -> usize {
        self.literals
    }

    /// Whether both templates match exactly the same paths: equal literals at
    /// equal positions, captures in the same places. Capture names are ignored.
    pub fn same_shape(&self, other: &PathPattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Literal(a), Segment::Literal(b)) => a == b,
                    (Segment::Capture(_), Segment::Capture(_)) => true,
                    _ => false,
                })
    }

    /// Match `path` against the template, returning the captures on success.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let mut params = PathParams::default();
        let mut parts = path.split('/');

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Capture(_) if part.is_empty() => return None,
                Segment::Capture(name) => params.push(name.clone(), part.to_string()),
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }
}

fn capture_name(segment: &str) -> Option<&str> {
    let name = segment.strip_prefix('{')?.strip_suffix('}')?;
    if name.is_empty() || name.contains(['{', '}']) {
        None
    } else {
        Some(name)
    }
}

/// Named captures extracted from a template match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    entries: Vec<(String, String)>,
}

impl PathParams {
    fn push(&mut self, name: String, value: String) {
        self.entries.push((name, value));
    }

    /// Value captured for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}
