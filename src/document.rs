use std::fmt;
use std::io::Read;

use indexmap::IndexMap;

use crate::error::ConfigError;
use crate::parser::Parser;
use crate::section::Section;
use crate::util::clean_name;

/// Name of the section holding content that appears before any `[name]` header.
pub const DEFAULT_SECTION_NAME: &str = "";

/// The UTF-8 encoding of U+FEFF. Skipped if present at the very start of the data.
///
/// <https://en.wikipedia.org/wiki/Byte_order_mark>
const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];

/// A parsed configuration: an insertion-ordered collection of uniquely named [`Section`]s.
///
/// Every method taking a section name trims it first, and an empty or whitespace-only name
/// refers to the default section.
///
/// Two documents are equal when they hold the same section names and each pair of same-named
/// sections holds the same key/value pairs, regardless of order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    sections: IndexMap<String, Section>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a deep copy of `defaults`, intended as the base a later [`Document::merge`]
    /// overrides. Changes to the new document never reach `defaults`.
    #[must_use]
    pub fn from_defaults(defaults: &Document) -> Self {
        defaults.clone()
    }

    /// Parses a document from text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedLine`] for the first content line lacking a key or a value.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Parser::new(text).into_document()
    }

    /// Parses a document from UTF-8 encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Decode`] if the data is not valid UTF-8, otherwise the same
    /// errors as [`Document::parse`].
    pub fn from_bytes(buffer: &[u8]) -> Result<Self, ConfigError> {
        let buffer = buffer.strip_prefix(BOM_UTF8).unwrap_or(buffer);
        let text = std::str::from_utf8(buffer).map_err(|source| ConfigError::Decode { source })?;
        Self::parse(text)
    }

    /// Reads `reader` to the end, then parses what was read. The reader is not retained.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if reading fails, otherwise the same errors as
    /// [`Document::from_bytes`].
    pub fn from_reader<R>(mut reader: R) -> Result<Self, ConfigError>
    where
        R: Read,
    {
        let mut buffer = Vec::with_capacity(4096);
        reader
            .read_to_end(&mut buffer)
            .map_err(|source| ConfigError::Read { source })?;

        Self::from_bytes(&buffer)
    }

    /// Returns `true` if there are no sections or every section is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.values().all(Section::is_empty)
    }

    /// The number of sections, including empty ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    #[must_use]
    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains_key(clean_name(name))
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(clean_name(name))
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.get_mut(clean_name(name))
    }

    /// Returns the named section, creating an empty one first if it does not exist.
    pub fn add_section(&mut self, name: &str) -> &mut Section {
        let name = clean_name(name);

        self.sections
            .entry(name.to_owned())
            .or_insert_with(|| Section::new(name.to_owned()))
    }

    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        self.sections.shift_remove(clean_name(name))
    }

    /// Sets a key in the named section, creating the section if needed. Returns the value the
    /// key previously held.
    pub fn set(
        &mut self,
        section: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.add_section(section).insert(key, value)
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    #[must_use]
    pub fn get_or<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.get(section, key).unwrap_or(default)
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Section;
    type IntoIter = indexmap::map::Values<'a, String, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.values()
    }
}

impl fmt::Display for Document {
    /// Writes the document back out as text. The default section comes first, since it has no
    /// header to introduce it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let default = self.sections.get(DEFAULT_SECTION_NAME);
        let named = self.sections.values().filter(|s| !s.is_default());

        for (i, section) in default.into_iter().chain(named).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{section}")?;
        }

        Ok(())
    }
}
