use crate::document::DEFAULT_SECTION_NAME;

/// Trims surrounding whitespace from a section name. Empty and whitespace-only names resolve to
/// the default section.
pub(crate) fn clean_name(name: &str) -> &str {
    let name = name.trim();

    if name.is_empty() {
        tracing::trace!("empty section name; defaulting to the default section (name = \"\")");
        return DEFAULT_SECTION_NAME;
    }

    name
}
