use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("request to {url} failed")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("'{0}' is not a valid data span")]
    InvalidDataSpan(String),
}

pub type Result<T> = std::result::Result<T, Error>;
