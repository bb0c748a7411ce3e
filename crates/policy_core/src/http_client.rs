use async_trait::async_trait;
use reqwest::Client;
use shared::{domain::PolicyRecord, error::TransportError};
use url::Url;

use crate::PolicyClient;

/// `PolicyClient` backed by the replication management HTTP API.
pub struct HttpPolicyClient {
    http: Client,
    endpoint: String,
}

impl HttpPolicyClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.as_str().trim_end_matches('/').to_string(),
        }
    }
}

fn transport_error(err: reqwest::Error) -> TransportError {
    match err.status() {
        Some(status) => TransportError::with_status(status.as_u16(), err.to_string()),
        None => TransportError::new(err.to_string()),
    }
}

#[async_trait]
impl PolicyClient for HttpPolicyClient {
    async fn list_policies(&self) -> Result<Vec<PolicyRecord>, TransportError> {
        let response = self
            .http
            .get(format!("{}/sync-policy", self.endpoint))
            .query(&[("bucket", ""), ("zonegroup", ""), ("all-buckets", "true")])
            .send()
            .await
            .map_err(transport_error)?
            .error_for_status()
            .map_err(transport_error)?;

        response
            .json::<Vec<PolicyRecord>>()
            .await
            .map_err(transport_error)
    }

    async fn delete_policy(
        &self,
        group_name: &str,
        bucket: Option<&str>,
    ) -> Result<(), TransportError> {
        let mut request = self
            .http
            .delete(format!("{}/sync-policy/{group_name}", self.endpoint));
        if let Some(bucket) = bucket {
            request = request.query(&[("bucket_name", bucket)]);
        }

        request
            .send()
            .await
            .map_err(transport_error)?
            .error_for_status()
            .map_err(transport_error)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/http_client_tests.rs"]
mod tests;
