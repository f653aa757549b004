use std::fmt;

use indexmap::IndexMap;

use crate::document::DEFAULT_SECTION_NAME;
use crate::parser::ESCAPE_TOKEN;

/// Characters that would make a written line read back as a comment or a header.
const LINE_MARKERS: [char; 3] = ['#', ';', '['];

/// A named, insertion-ordered mapping of unique keys to string values.
///
/// Equality compares the name and the key/value contents; the order of the keys is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    props: IndexMap<String, String>,
}

impl Section {
    #[must_use]
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            props: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if this is the section holding content that precedes any header.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_SECTION_NAME
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.props.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.props.contains_key(key)
    }

    /// Sets `key` to `value`, returning the value it replaced. An overwritten key keeps its
    /// original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.props.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.props.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.props.clear();
    }

    /// Upserts every pair of `other` into this section. Keys only present here are kept.
    pub fn extend_from(&mut self, other: &Section) {
        for (key, value) in &other.props {
            self.props.insert(key.clone(), value.clone());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.props.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.props.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.props.values().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_default() {
            writeln!(f, "[{}]", self.name)?;
        }

        for (key, value) in &self.props {
            if key.starts_with(LINE_MARKERS) {
                write!(f, "{ESCAPE_TOKEN}")?;
            }
            writeln!(f, "{key} = {value}")?;
        }

        Ok(())
    }
}
