//! The mutable set of tags consulted by conditions.
//!
//! A [`TagContext`] lives for a whole pass. `define` and `undef` directives
//! mutate it in place and every later condition sees the change; closing a
//! conditional group never rolls anything back.

use std::collections::HashSet;

/// Document-scoped set of defined tag names.
///
/// Tags are case-sensitive and compared byte for byte. They need not be
/// valid UTF-8.
///
/// # Examples
///
/// ```
/// use stpp::TagContext;
///
/// let mut tags: TagContext = ["linux"].into_iter().collect();
/// assert!(tags.define("debug"));
/// assert!(!tags.define("debug"));
/// assert!(tags.is_defined("linux"));
/// assert!(tags.undef("linux"));
/// assert!(!tags.undef("linux"));
/// assert_eq!(tags.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagContext {
    tags: HashSet<Vec<u8>>,
}

impl TagContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `tag`. Returns `true` when the tag was not already defined.
    pub fn define(&mut self, tag: impl Into<Vec<u8>>) -> bool {
        self.tags.insert(tag.into())
    }

    /// Remove `tag`. Returns `true` when the tag was defined.
    pub fn undef(&mut self, tag: impl AsRef<[u8]>) -> bool {
        self.tags.remove(tag.as_ref())
    }

    /// Whether `tag` is currently defined.
    #[must_use]
    pub fn is_defined(&self, tag: impl AsRef<[u8]>) -> bool {
        self.tags.contains(tag.as_ref())
    }

    /// Number of defined tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether no tag is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate over the defined tags in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.tags.iter().map(Vec::as_slice)
    }
}

impl<S: Into<Vec<u8>>> FromIterator<S> for TagContext {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<Vec<u8>>> Extend<S> for TagContext {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.tags.extend(iter.into_iter().map(Into::into));
    }
}
