//! Registry API adapter: the `/clientes` collection over plain JSON HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{CustomerId, FilterCriteria},
    protocol::{Customer, CustomerListResponse},
};
use url::Url;

use crate::error::{classify_gateway, GatewayError};

const COLLECTION: &str = "clientes";

#[async_trait]
pub trait CustomerGateway: Send + Sync {
    /// Records matching every constraint in `filters`, in server order.
    async fn list(&self, filters: &FilterCriteria) -> Result<Vec<Customer>, GatewayError>;
    /// Stores a new record; the returned copy carries the assigned id.
    async fn create(&self, customer: &Customer) -> Result<Customer, GatewayError>;
    /// Replaces the record stored under `id`.
    async fn update(&self, id: &CustomerId, customer: &Customer)
        -> Result<Customer, GatewayError>;
    async fn delete(&self, id: &CustomerId) -> Result<(), GatewayError>;
}

pub struct HttpCustomerGateway {
    http: Client,
    base_url: Url,
}

impl HttpCustomerGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let base_url = Url::parse(base_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GatewayError::Transport)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn collection_url(&self) -> Result<Url, GatewayError> {
        extend_path(&self.base_url, &[COLLECTION])
    }

    fn record_url(&self, id: &CustomerId) -> Result<Url, GatewayError> {
        extend_path(&self.base_url, &[COLLECTION, &id.to_string()])
    }
}

fn extend_path(base: &Url, segments: &[&str]) -> Result<Url, GatewayError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn ensure_success(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(GatewayError::Status {
            status,
            url: response.url().to_string(),
        })
    }
}

#[async_trait]
impl CustomerGateway for HttpCustomerGateway {
    async fn list(&self, filters: &FilterCriteria) -> Result<Vec<Customer>, GatewayError> {
        let response = self
            .http
            .get(self.collection_url()?)
            .query(&filters.to_query())
            .send()
            .await
            .map_err(GatewayError::Transport)?;
        let body: CustomerListResponse = ensure_success(response)?
            .json()
            .await
            .map_err(classify_gateway)?;
        Ok(body.items)
    }

    async fn create(&self, customer: &Customer) -> Result<Customer, GatewayError> {
        let response = self
            .http
            .post(self.collection_url()?)
            .json(&customer.without_id())
            .send()
            .await
            .map_err(GatewayError::Transport)?;
        ensure_success(response)?
            .json()
            .await
            .map_err(classify_gateway)
    }

    async fn update(
        &self,
        id: &CustomerId,
        customer: &Customer,
    ) -> Result<Customer, GatewayError> {
        let response = self
            .http
            .put(self.record_url(id)?)
            .json(customer)
            .send()
            .await
            .map_err(GatewayError::Transport)?;
        ensure_success(response)?
            .json()
            .await
            .map_err(classify_gateway)
    }

    async fn delete(&self, id: &CustomerId) -> Result<(), GatewayError> {
        let response = self
            .http
            .delete(self.record_url(id)?)
            .send()
            .await
            .map_err(GatewayError::Transport)?;
        ensure_success(response)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
