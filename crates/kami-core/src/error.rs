use std::{io, path::PathBuf};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed response from {url}\npath: {path}\nerror: {message}")]
    Decode {
        url: String,
        path: String,
        message: String,
    },

    #[error("{resource} was not found")]
    NotFound { resource: String },

    #[error("no eligible builds found for {version}")]
    NoEligibleBuild { version: String },

    #[error("could not hash {}: {source}", path.display())]
    IntegrityCheck {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{tag}` is not a valid version: {source}")]
    VersionParse {
        tag: String,
        #[source]
        source: semver::Error,
    },

    #[error("checksum of {} does not match\nexpected: {expected}\nactual: {actual}", path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("download of {url} stalled")]
    Timeout { url: String },

    #[error("download of {url} ended after {received} of {expected} bytes")]
    Truncated {
        url: String,
        expected: u64,
        received: u64,
    },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to build the HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    /// Replaces the resource of a [`Error::NotFound`] with a readable key.
    #[must_use]
    pub fn describe_missing(self, resource: impl Into<String>) -> Self {
        match self {
            Self::NotFound { .. } => Self::NotFound {
                resource: resource.into(),
            },
            other => other,
        }
    }
}
