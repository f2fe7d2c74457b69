//! Dotted field paths and the errors raised when walking them.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Separator between path segments in the textual form.
pub const PATH_SEPARATOR: char = '.';

/// Errors produced when parsing a path or resolving it against a document.
///
/// Resolution errors are programming errors in the sense that a
/// schema-conforming document never produces them for a path obtained from
/// [`crate::ConfigDocument::leaf_paths`].  They are still returned as values
/// so an editor front end can reject a bad path before a draft exists.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    /// The path string was empty.
    #[error("field path is empty")]
    Empty,

    /// The path contained an empty segment, e.g. `"a..b"` or `".a"`.
    #[error("field path {path:?} contains an empty segment")]
    EmptySegment { path: String },

    /// A segment names a field that does not exist.
    #[error("unknown field {path}")]
    UnknownField { path: String },

    /// A non-terminal segment resolved to a leaf instead of a mapping.
    #[error("{path} is a value, not a group of fields")]
    NotABranch { path: String },

    /// The terminal segment resolved to a mapping instead of a leaf.
    #[error("{path} is a group of fields, not a value")]
    NotALeaf { path: String },
}

/// An ordered, non-empty sequence of field names identifying a leaf.
///
/// # Examples
///
/// ```rust
/// use pagekit_core::FieldPath;
///
/// let path: FieldPath = "affiliateLinks.amazon".parse().unwrap();
/// assert_eq!(path.len(), 2);
/// assert_eq!(path.to_string(), "affiliateLinks.amazon");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a dotted path.
    ///
    /// # Errors
    ///
    /// [`PathError::Empty`] for `""` and [`PathError::EmptySegment`] when any
    /// segment between separators is empty.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        if text.is_empty() {
            return Err(PathError::Empty);
        }
        Self::from_segments(text.split(PATH_SEPARATOR))
    }

    /// Builds a path from already-split segments.
    ///
    /// # Errors
    ///
    /// Same as [`parse`](Self::parse).
    pub fn from_segments<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment {
                path: segments.join("."),
            });
        }
        Ok(Self { segments })
    }

    /// The field names, root first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments; always at least 1.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`: a `FieldPath` cannot be empty.  Present for API symmetry
    /// with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The last segment (the leaf's own field name).
    pub fn leaf_name(&self) -> &str {
        // `from_segments` guarantees at least one segment.
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Dotted text of the first `depth` segments; used in error messages.
    pub(crate) fn prefix(&self, depth: usize) -> String {
        self.segments[..depth.min(self.segments.len())].join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
