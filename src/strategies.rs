//! Generators for property tests.

use proptest::prelude::*;

use crate::document::{DEFAULT_SECTION_NAME, Document};

/// Keys and values free of separators and escape tokens. They may still start with characters
/// that mark comments or headers.
pub(crate) fn token() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.,*/#;\\[\\]-]{1,8}"
}

pub(crate) fn section_name() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(DEFAULT_SECTION_NAME.to_owned()),
        4 => "[a-z][a-z0-9_]{0,5}",
    ]
}

/// Documents whose sections each hold at least one pair.
pub(crate) fn document() -> impl Strategy<Value = Document> {
    prop::collection::vec(
        (section_name(), prop::collection::vec((token(), token()), 1..5)),
        0..5,
    )
    .prop_map(|sections| {
        let mut document = Document::new();
        for (name, pairs) in sections {
            for (key, value) in pairs {
                document.set(&name, key, value);
            }
        }
        document
    })
}
