use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::traits::QueryGateway;
use super::types::{
    AcquisitionTypesResponse, DepartmentsResponse, QueryResponse, StatsResponse,
};
use crate::constants::HTTP_REQUEST_TIMEOUT_SECS;
use crate::utils::GatewayError;

/// HTTP implementation of the query gateway, talking JSON to the
/// procurement API server
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

/// Error body shape used by the server for non-2xx responses
#[derive(Deserialize)]
struct ApiErrorBody {
    detail: String,
}

impl HttpGateway {
    /// Create a new gateway for the given server base URL
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into an Api error, pulling the
    /// message out of the body when the server sent one
    async fn into_api_error(response: reqwest::Response) -> GatewayError {
        let status = response.status().as_u16();
        let message = match response.json::<ApiErrorBody>().await {
            Ok(body) => body.detail,
            Err(_) => format!("Server returned status {}", status),
        };
        GatewayError::Api { status, message }
    }

    /// List all department names known to the dataset
    pub async fn departments(&self) -> Result<Vec<String>, GatewayError> {
        let response = self
            .client
            .get(self.endpoint("/api/departments"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::into_api_error(response).await);
        }

        let body: DepartmentsResponse = response.json().await?;
        Ok(body.departments)
    }

    /// List the acquisition types present in the dataset
    pub async fn acquisition_types(&self) -> Result<Vec<String>, GatewayError> {
        let response = self
            .client
            .get(self.endpoint("/api/acquisition-types"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::into_api_error(response).await);
        }

        let body: AcquisitionTypesResponse = response.json().await?;
        Ok(body.acquisition_types)
    }
}

#[async_trait]
impl QueryGateway for HttpGateway {
    async fn ask(&self, question: &str) -> Result<QueryResponse, GatewayError> {
        let response = self
            .client
            .post(self.endpoint("/api/query"))
            .json(&json!({ "question": question }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::into_api_error(response).await);
        }

        Ok(response.json().await?)
    }

    async fn stats(&self) -> Result<StatsResponse, GatewayError> {
        let response = self.client.get(self.endpoint("/api/stats")).send().await?;

        if !response.status().is_success() {
            return Err(Self::into_api_error(response).await);
        }

        Ok(response.json().await?)
    }
}
