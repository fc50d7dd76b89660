//! Untyped manifest entry model.
//!
//! Both manifest shapes (TOML `Pipfile`, JSON `Pipfile.lock`) are lowered into
//! these types by the loader before normalization, so the normalizer never
//! sees a serialization-specific value.

/// A single attribute value from a manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    String(String),
    Bool(bool),
    List(Vec<RawValue>),
    Table(RawAttributeSet),
}

impl RawValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&RawAttributeSet> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Returns the list items as strings, or `None` if any item is not a string.
    pub fn as_string_list(&self) -> Option<Vec<&str>> {
        self.as_list()?.iter().map(Self::as_str).collect()
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for RawValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<RawAttributeSet> for RawValue {
    fn from(table: RawAttributeSet) -> Self {
        Self::Table(table)
    }
}

/// Attribute set of one dependency entry.
///
/// Keeps keys in insertion order. Inserting an existing key replaces its value
/// in place.
///
/// # Examples
///
/// ```
/// use pipfile2req_core::types::{RawAttributeSet, RawValue};
///
/// let attrs: RawAttributeSet = [
///     ("version", RawValue::from(">=1.0")),
///     ("extras", RawValue::from(vec!["test", "sec"])),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(attrs.get("version").and_then(RawValue::as_str), Some(">=1.0"));
/// assert!(!attrs.contains_key("markers"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAttributeSet {
    entries: Vec<(String, RawValue)>,
}

impl RawAttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawAttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

/// One manifest entry as written: either the bare version shorthand
/// (`requests = "*"`) or a full attribute set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEntry {
    Shorthand(String),
    Attributes(RawAttributeSet),
}

impl From<&str> for RawEntry {
    fn from(version: &str) -> Self {
        Self::Shorthand(version.to_string())
    }
}

impl From<String> for RawEntry {
    fn from(version: String) -> Self {
        Self::Shorthand(version)
    }
}

impl From<RawAttributeSet> for RawEntry {
    fn from(attrs: RawAttributeSet) -> Self {
        Self::Attributes(attrs)
    }
}

impl From<(&str, RawValue)> for RawEntry {
    fn from((key, value): (&str, RawValue)) -> Self {
        Self::Attributes([(key, value)].into_iter().collect())
    }
}
