//! Query key primitives.
//!
//! A [`QueryKey`] is an ordered list of primitive segments identifying one
//! cached asynchronous result. Keys for queries over the same resource
//! share a leading prefix (the resource class) so a mutation can drop the
//! whole class in one call.

use uuid::Uuid;

/// One primitive element of a [`QueryKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Static text, usually the resource class or operation name.
    Text(String),
    /// Integer parameter such as a page limit.
    Int(i64),
    /// Boolean parameter such as a filter toggle.
    Bool(bool),
    /// Identifier parameter.
    Uuid(Uuid),
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Int(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Uuid(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Segment {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Segment {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Segment {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for Segment {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Uuid> for Segment {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

/// Ordered list of primitive values identifying a cached query result.
///
/// # Examples
/// ```
/// use query_cache::QueryKey;
///
/// let class = QueryKey::root("posts");
/// let key = QueryKey::root("posts").with("list").with(20_i64);
/// assert!(key.starts_with(&class));
/// assert_eq!(key.to_string(), "posts:list:20");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<Segment>);

impl QueryKey {
    /// Start a key with its leading segment.
    #[must_use]
    pub fn root(segment: impl Into<Segment>) -> Self {
        Self(vec![segment.into()])
    }

    /// Append a segment, consuming and returning the key.
    #[must_use]
    pub fn with(mut self, segment: impl Into<Segment>) -> Self {
        self.0.push(segment.into());
        self
    }

    /// Borrow the ordered segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Whether this key lies under `prefix`.
    ///
    /// A key is its own prefix; an empty prefix matches nothing, so an
    /// accidentally empty resource class cannot drop the whole cache.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        !prefix.0.is_empty() && self.0.starts_with(&prefix.0)
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for segment in &self.0 {
            if !first {
                f.write_str(":")?;
            }
            write!(f, "{segment}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for key construction and prefix matching.
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    #[rstest]
    fn keys_with_equal_segments_are_equal() {
        let a = QueryKey::root("posts").with("list").with(20_i64);
        let b = QueryKey::root("posts").with("list").with(20_i64);
        assert_eq!(a, b);
    }

    #[rstest]
    fn differing_parameters_produce_distinct_keys() {
        let a = QueryKey::root("posts").with("list").with(20_i64);
        let b = QueryKey::root("posts").with("list").with(50_i64);
        assert_ne!(a, b);
    }

    #[rstest]
    fn prefix_matches_resource_class() {
        let id = Uuid::new_v4();
        let key = QueryKey::root("posts").with("detail").with(id);
        assert!(key.starts_with(&QueryKey::root("posts")));
        assert!(!key.starts_with(&QueryKey::root("users")));
    }

    #[rstest]
    fn key_is_its_own_prefix() {
        let key = QueryKey::root("posts").with("list");
        let same = QueryKey::root("posts").with("list");
        assert!(key.starts_with(&same));
    }

    #[rstest]
    fn longer_prefix_does_not_match_shorter_key() {
        let key = QueryKey::root("posts");
        let longer = QueryKey::root("posts").with("list");
        assert!(!key.starts_with(&longer));
    }

    #[rstest]
    fn display_joins_segments_with_colons() {
        let key = QueryKey::root("posts").with("visible").with(true);
        assert_eq!(key.to_string(), "posts:visible:true");
    }
}
