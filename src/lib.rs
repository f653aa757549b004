#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

//! Parsing and merging of section-structured INI configuration.
//!
//! ```text
//! ; content before any header belongs to the default section ("")
//! timeout = 30
//!
//! [users]
//! root = secret, admin
//! guest : guest
//! long = first part \
//!        second part
//! ```
//!
//! Keys and values are plain strings. Whitespace, `:` or `=` separate a key from its value, a
//! backslash before a separator makes it part of the key, and a line ending in an odd number of
//! backslashes continues on the next line.
//!
//! A [`Document`] seeded from defaults can be overridden key by key with [`Document::merge`].

mod document;
mod error;
mod merge;
mod parser;
pub mod resource;
mod section;
#[cfg(test)]
mod strategies;
mod util;

pub use document::{DEFAULT_SECTION_NAME, Document};
pub use error::ConfigError;
pub use merge::merge_optional;
pub use parser::{ESCAPE_TOKEN, Parser, is_continued, split_key_value};
pub use section::Section;
