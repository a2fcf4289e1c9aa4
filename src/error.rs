use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The input string does not name a package on a PyPI-style index.
    /// Hosts use this to try another resolver, not to report a failure.
    #[error("not a package identifier: {0}")]
    NotApplicable(String),

    #[error("package not found: {0}")]
    PackageNotFound(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed index response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("index response is missing required field `{0}`")]
    MissingField(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
