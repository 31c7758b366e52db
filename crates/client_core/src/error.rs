use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid registry url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("registry request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("registry returned {status} for {url}")]
    Status { status: StatusCode, url: String },
    #[error("invalid registry payload: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("invalid postal lookup url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("postal lookup request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("postal lookup returned {status} for {url}")]
    Status { status: StatusCode, url: String },
    #[error("invalid postal lookup payload: {0}")]
    Decode(#[source] reqwest::Error),
}

pub(crate) fn classify_gateway(err: reqwest::Error) -> GatewayError {
    if err.is_decode() {
        GatewayError::Decode(err)
    } else {
        GatewayError::Transport(err)
    }
}

pub(crate) fn classify_lookup(err: reqwest::Error) -> LookupError {
    if err.is_decode() {
        LookupError::Decode(err)
    } else {
        LookupError::Transport(err)
    }
}
