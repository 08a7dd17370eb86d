//! Field paths and the itemised error map produced by validation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::REQUIRED_MESSAGE;

/// Rendering used for violations on the input as a whole.
pub const ROOT_PATH: &str = "$";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside the validated input.
///
/// Renders keys with dots and array positions with brackets, so a nested
/// violation is addressable as `address.city` or `tags[2]`.
///
/// # Examples
/// ```
/// use server_actions::domain::schema::FieldPath;
///
/// let path = FieldPath::root().key("items").index(0).key("name");
/// assert_eq!(path.to_string(), "items[0].name");
/// assert_eq!(FieldPath::root().to_string(), "$");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// Path addressing the whole input.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Child path for an object key.
    #[must_use]
    pub fn key(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(name.to_owned()));
        Self(segments)
    }

    /// Child path for an array position.
    #[must_use]
    pub fn index(&self, position: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(position));
        Self(segments)
    }

    /// Whether the path addresses the whole input.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(ROOT_PATH);
        }
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(name) if position == 0 => f.write_str(name)?,
                PathSegment::Key(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Mapping from rendered field path to the violation messages for it.
///
/// Keys are kept in lexical order so identical failures always serialise
/// identically. Serialises transparently as a JSON object of string arrays.
///
/// # Examples
/// ```
/// use server_actions::domain::schema::{FieldErrors, FieldPath};
///
/// let mut errors = FieldErrors::new();
/// errors.push(&FieldPath::root().key("title"), "Title too long");
/// errors.push(&FieldPath::root().key("content"), "Required");
///
/// assert_eq!(errors.get("title"), Some(&["Title too long".to_owned()][..]));
/// assert_eq!(errors.summary(), "Content is required, Title too long");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation for `path`, keeping earlier messages.
    pub fn push(&mut self, path: &FieldPath, message: impl Into<String>) {
        self.push_raw(path.to_string(), message);
    }

    /// Record a violation for an already rendered path.
    pub fn push_raw(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_default().push(message.into());
    }

    /// Whether no violation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of violated fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Messages recorded for a rendered path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.0.get(path).map(Vec::as_slice)
    }

    /// Violated field paths in lexical order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Paths with their messages in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(path, messages)| (path.as_str(), messages.as_slice()))
    }

    /// One-line human-readable description of every violation.
    ///
    /// A field whose first message is `Required` renders as
    /// `<Field> is required`; otherwise its messages are joined with `and`.
    /// Fields are separated by commas.
    #[must_use]
    pub fn summary(&self) -> String {
        self.0
            .iter()
            .map(|(path, messages)| match messages.first() {
                Some(first) if first == REQUIRED_MESSAGE => {
                    format!("{} is required", capitalise(path))
                }
                _ => messages.join(" and "),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn capitalise(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
