use crate::document::Document;

impl Document {
    /// Merges `other` into this document with key-level override.
    ///
    /// Each section of `other` is looked up or created here, then every pair it holds is
    /// upserted. Keys and sections only present in `self` are left untouched; nothing is ever
    /// removed.
    pub fn merge(&mut self, other: &Document) {
        for section in other {
            self.add_section(section.name()).extend_from(section);
        }
    }

    /// Returns a deep copy of `self` with `overrides` merged into it.
    #[must_use]
    pub fn merged_with(&self, overrides: &Document) -> Document {
        let mut result = Document::from_defaults(self);
        result.merge(overrides);
        result
    }
}

/// Combines framework defaults with user configuration, either of which may be absent.
///
/// With both present the result is a fresh document seeded from `defaults` with `overrides`
/// merged in; neither input is modified.
#[must_use]
pub fn merge_optional(
    defaults: Option<&Document>,
    overrides: Option<&Document>,
) -> Option<Document> {
    match (defaults, overrides) {
        (None, None) => None,
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (Some(defaults), Some(overrides)) => Some(defaults.merged_with(overrides)),
    }
}
