//! CEP normalization and the address lookup collaborator.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{AddressFragment, PostalLookupResponse};
use url::Url;

use crate::error::{classify_lookup, LookupError};

/// Raw input longer than this is truncated before normalization, leaving room
/// for one separator as in `01001-000`.
pub const POSTAL_CODE_INPUT_CAP: usize = 9;
pub const POSTAL_CODE_DIGITS: usize = 8;

/// A complete, digits-only postal code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

impl PostalCode {
    /// Accepts only exactly eight ASCII digits.
    pub fn parse(digits: &str) -> Option<Self> {
        (digits.len() == POSTAL_CODE_DIGITS && digits.bytes().all(|b| b.is_ascii_digit()))
            .then(|| Self(digits.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Applies the input cap and keeps only the digits.
pub fn normalize_postal_input(raw: &str) -> String {
    raw.chars()
        .take(POSTAL_CODE_INPUT_CAP)
        .filter(char::is_ascii_digit)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(AddressFragment),
    NotFound,
}

#[async_trait]
pub trait PostalCodeLookup: Send + Sync {
    async fn lookup(&self, code: &PostalCode) -> Result<LookupOutcome, LookupError>;
}

/// ViaCEP-style service: `GET {base}/{cep}/json/`.
pub struct ViaCepClient {
    http: Client,
    base_url: Url,
}

impl ViaCepClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://viacep.com.br/ws";

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LookupError> {
        let base_url = Url::parse(base_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LookupError::Transport)?;
        Ok(Self { http, base_url })
    }

    fn lookup_url(&self, code: &PostalCode) -> Result<Url, LookupError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend([code.as_str(), "json", ""]);
        Ok(url)
    }
}

#[async_trait]
impl PostalCodeLookup for ViaCepClient {
    async fn lookup(&self, code: &PostalCode) -> Result<LookupOutcome, LookupError> {
        let url = self.lookup_url(code)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(LookupError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                status,
                url: response.url().to_string(),
            });
        }

        let body: PostalLookupResponse = response.json().await.map_err(classify_lookup)?;
        if body.is_not_found() {
            Ok(LookupOutcome::NotFound)
        } else {
            Ok(LookupOutcome::Found(body.into_address()))
        }
    }
}

#[cfg(test)]
#[path = "tests/postal_tests.rs"]
mod tests;
