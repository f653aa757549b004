use std::path::PathBuf;
use std::{io, str};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration data")]
    Read {
        #[source]
        source: io::Error,
    },

    #[error("configuration data is not valid UTF-8")]
    Decode {
        #[source]
        source: str::Utf8Error,
    },

    #[error("line {line}: line must contain both a key and a value: {content:?}")]
    MalformedLine { line: usize, content: String },

    #[error("unable to open configuration location '{}'", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "required configuration location '{}' does not exist or did not contain any INI configuration",
        path.display()
    )]
    RequiredResourceMissing { path: PathBuf },
}

impl ConfigError {
    /// Returns `true` if the error was caused by the content of the text rather than by how it
    /// was obtained.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::MalformedLine { .. })
    }
}
