/// Error types for listing and fetching result files
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    /// Request failed or the server answered with an error status
    #[error("HTTP request to {url} failed: {message}")]
    Http { url: String, message: String },

    /// Local directory or file could not be read
    #[error("I/O error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Payload was not valid JSON
    #[error("invalid JSON in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// The file name does not follow `<component>_results_<date>...json`
    #[error("could not extract component name from file: {0}")]
    UnknownComponent(String),
}

impl SourceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SourceError::Io { path: path.into(), source }
    }

    pub fn http(url: &str, err: ureq::Error) -> Self {
        let message = match err {
            ureq::Error::Status(code, _) => format!("HTTP error! Status: {}", code),
            other => other.to_string(),
        };
        SourceError::Http { url: url.to_string(), message }
    }
}
