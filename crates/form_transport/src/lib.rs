//! HTTP delivery of the contact form.

use std::time::Duration;

use async_trait::async_trait;
use page_core::view::FormTransport;
use reqwest::{header::ACCEPT, Client};
use shared::{error::DeliveryError, protocol::FormSnapshot};
use tracing::{debug, warn};
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Posts the form's field set url-encoded to its action URL.
pub struct HttpFormTransport {
    http: Client,
    fallback_endpoint: Option<Url>,
}

impl HttpFormTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            fallback_endpoint: None,
        })
    }

    /// Endpoint used when a snapshot carries no action.
    pub fn with_fallback_endpoint(mut self, endpoint: Url) -> Self {
        self.fallback_endpoint = Some(endpoint);
        self
    }

    fn endpoint_for(&self, form: &FormSnapshot) -> Result<Url, DeliveryError> {
        let action = form.action.trim();
        if action.is_empty() {
            return self
                .fallback_endpoint
                .clone()
                .ok_or_else(|| DeliveryError::transport("form has no action endpoint"));
        }
        Url::parse(action).map_err(|err| {
            DeliveryError::transport(format!("invalid form action '{action}': {err}"))
        })
    }
}

#[async_trait]
impl FormTransport for HttpFormTransport {
    async fn deliver(&self, form: &FormSnapshot) -> Result<(), DeliveryError> {
        let endpoint = self.endpoint_for(form)?;
        debug!(%endpoint, fields = form.fields.len(), "posting contact form");

        let response = self
            .http
            .post(endpoint.clone())
            .header(ACCEPT, "application/json")
            .form(&form.fields)
            .send()
            .await
            .map_err(|err| {
                warn!(%endpoint, %err, "contact form request failed");
                DeliveryError::transport(err.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            warn!(%endpoint, status = status.as_u16(), "contact form rejected");
            Err(DeliveryError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
