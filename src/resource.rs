//! Loading documents from filesystem locations.

use std::fs::File;
use std::io;
use std::path::Path;

use crate::document::Document;
use crate::error::ConfigError;

/// Opens and parses the file at `path`.
///
/// An optional location that cannot be opened yields `Ok(None)`. A required location must exist
/// and produce a non-empty document. Parse errors are returned either way.
pub fn load_path(path: impl AsRef<Path>, required: bool) -> Result<Option<Document>, ConfigError> {
    let path = path.as_ref();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if required && err.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::RequiredResourceMissing {
                path: path.to_owned(),
            });
        }
        Err(source) if required => {
            return Err(ConfigError::Open {
                path: path.to_owned(),
                source,
            });
        }
        Err(err) => {
            tracing::debug!("unable to load optional path '{}': {err}", path.display());
            return Ok(None);
        }
    };

    let document = Document::from_reader(file)?;

    if document.is_empty() {
        if required {
            return Err(ConfigError::RequiredResourceMissing {
                path: path.to_owned(),
            });
        }
        tracing::warn!("'{}' found, but it did not contain any data", path.display());
    } else {
        tracing::debug!("loaded configuration from '{}'", path.display());
    }

    Ok(Some(document))
}

/// Returns the first location that yields a non-empty document. Every location is optional.
pub fn first_non_empty<I, P>(paths: I) -> Result<Option<Document>, ConfigError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    for path in paths {
        match load_path(&path, false)? {
            Some(document) if !document.is_empty() => {
                tracing::debug!(
                    "discovered non-empty configuration at '{}'",
                    path.as_ref().display()
                );
                return Ok(Some(document));
            }
            _ => {}
        }
    }

    Ok(None)
}
