//! Ordered path-list segments and their textual form.

/// Ordered segments of a path-list variable. Position is search precedence.
///
/// Uniqueness is not enforced here; it is an outcome of
/// [`crate::core::transform::apply_command`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathList {
    segments: Vec<String>,
}

impl PathList {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Split a raw variable value on `separator`.
    ///
    /// Empty segments are kept as empty strings, so an empty value is one
    /// empty segment.
    pub fn split(raw: &str, separator: char) -> Self {
        Self::new(raw.split(separator).map(str::to_string).collect())
    }

    /// Serialize back to a single variable value.
    pub fn join(&self, separator: char) -> String {
        let mut buf = [0u8; 4];
        self.segments.join(separator.encode_utf8(&mut buf))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Keep only segments for which `keep` returns true, preserving order.
    pub(crate) fn retain<F: FnMut(&str) -> bool>(&mut self, mut keep: F) {
        self.segments.retain(|segment| keep(segment));
    }

    /// Insert `entries` ahead of every existing segment, keeping their order.
    pub(crate) fn prepend(&mut self, entries: &[String]) {
        self.segments.splice(0..0, entries.iter().cloned());
    }

    pub(crate) fn append(&mut self, entries: &[String]) {
        self.segments.extend(entries.iter().cloned());
    }
}

impl<'a> FromIterator<&'a str> for PathList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(str::to_string).collect())
    }
}
