//! Query identity and deterministic cache keys
//!
//! A [`Query`] captures everything that determines a remote search: resource
//! kind, regex source(s), positional video number, and the ordered filter
//! list. Its hash is a pure function of those fields, so identical queries
//! always map to the same cache entry. The API key is deliberately excluded
//! from the hash so credentials never leak into cache paths.

use std::fmt;

use crate::constants::api;

/// Kind of catalog resource a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Show,
    Video,
}

impl ResourceKind {
    /// List endpoint path segment for this kind
    pub fn endpoint(&self) -> &'static str {
        match self {
            ResourceKind::Show => api::SHOWS_ENDPOINT,
            ResourceKind::Video => api::VIDEOS_ENDPOINT,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Show => write!(f, "show"),
            ResourceKind::Video => write!(f, "video"),
        }
    }
}

/// Immutable description of one remote search
///
/// Constructed once by the orchestrator and never mutated; the filter list
/// order is significant and preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub kind: ResourceKind,
    /// Regex source matched against the record name, when pattern-selected
    pub pattern: Option<String>,
    /// Secondary regex source matched against the show title (combined search)
    pub show_pattern: Option<String>,
    /// Positional selection: Nth record, 0 = most recent
    pub video_number: Option<usize>,
    /// Ordered filter predicates, e.g. `premium:true`, `video_show:17`
    pub filters: Vec<String>,
    pub page_size: u32,
}

impl Query {
    /// Query that resolves a show by title regex
    pub fn shows(pattern: &str) -> Self {
        Self {
            kind: ResourceKind::Show,
            pattern: Some(pattern.to_string()),
            show_pattern: None,
            video_number: None,
            filters: Vec::new(),
            page_size: api::DEFAULT_PAGE_SIZE,
        }
    }

    /// Query that resolves a video by name regex within the given filters
    pub fn videos(pattern: &str, filters: Vec<String>) -> Self {
        Self {
            kind: ResourceKind::Video,
            pattern: Some(pattern.to_string()),
            show_pattern: None,
            video_number: None,
            filters,
            page_size: api::DEFAULT_PAGE_SIZE,
        }
    }

    /// Query that selects the Nth most recent video within the given filters
    pub fn video_number(number: usize, filters: Vec<String>) -> Self {
        Self {
            kind: ResourceKind::Video,
            pattern: None,
            show_pattern: None,
            video_number: Some(number),
            filters,
            page_size: api::DEFAULT_PAGE_SIZE,
        }
    }

    /// Combined search: video name regex plus show title regex, no show filter
    pub fn video_search(video_pattern: &str, show_pattern: &str, filters: Vec<String>) -> Self {
        Self {
            kind: ResourceKind::Video,
            pattern: Some(video_pattern.to_string()),
            show_pattern: Some(show_pattern.to_string()),
            video_number: None,
            filters,
            page_size: api::DEFAULT_PAGE_SIZE,
        }
    }

    /// Deterministic cache key for this query
    ///
    /// MD5 digest over the identity fields. Each field is length-prefixed
    /// before digesting, so the concatenation is injective even when a
    /// pattern or filter contains the kind of bytes a separator would use.
    /// Filter order is significant.
    pub fn hash(&self) -> String {
        fn push_field(identity: &mut String, value: &str) {
            identity.push_str(&value.len().to_string());
            identity.push(':');
            identity.push_str(value);
        }

        fn push_optional(identity: &mut String, value: Option<&str>) {
            match value {
                Some(value) => push_field(identity, value),
                None => identity.push('-'),
            }
        }

        let mut identity = String::new();
        push_field(&mut identity, self.kind.endpoint());
        push_optional(&mut identity, self.pattern.as_deref());
        push_optional(&mut identity, self.show_pattern.as_deref());
        match self.video_number {
            Some(n) => push_field(&mut identity, &n.to_string()),
            None => identity.push('-'),
        }
        for filter in &self.filters {
            push_field(&mut identity, filter);
        }

        format!("{:x}", md5::compute(identity.as_bytes()))
    }
}
