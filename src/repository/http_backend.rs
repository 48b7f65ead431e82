//! HTTP Remote Store
//!
//! reqwest implementation of the product and registration endpoints.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use super::traits::{
    CreateProductRequest, DeleteProductRequest, ProductStore, RegisterUserRequest, StoreError,
    StoreResult, UserRegistry,
};
use crate::config::BackendConfig;
use crate::domain::{ProductId, TrackedProduct};

const LIST_PATH: &str = "api/products/";
const CREATE_PATH: &str = "api/scrape/";
const DELETE_PATH: &str = "api/products/delete/";
const REGISTER_PATH: &str = "api/register/";

/// Error body the store sends with non-2xx responses
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Remote store reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> StoreResult<Self> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| StoreError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> StoreResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| StoreError::InvalidUrl(format!("{}: {}", path, e)))
    }

    async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> StoreResult<reqwest::Response> {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        self.client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))
    }
}

/// Turn a failed response into `StoreError::Status`, keeping the body's message
async fn status_error(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let message = match response.text().await {
        Ok(text) => serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message),
        Err(e) => {
            warn!(status, error = %e, "could not read error body");
            None
        }
    };
    StoreError::Status { status, message }
}

#[async_trait]
impl ProductStore for HttpBackend {
    async fn list_products(&self, user: &str) -> StoreResult<Vec<TrackedProduct>> {
        let mut url = self.endpoint(LIST_PATH)?;
        url.query_pairs_mut().append_pair("user", user);
        debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(status_error(response).await);
        }

        response
            .json::<Vec<TrackedProduct>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn create_product(&self, request: &CreateProductRequest) -> StoreResult<()> {
        let response = self.post_json(CREATE_PATH, request).await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        // Acknowledgement body is not used, but must be JSON
        response
            .json::<serde_json::Value>()
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn delete_product(&self, id: &ProductId) -> StoreResult<()> {
        let body = DeleteProductRequest {
            id: id.as_str().to_string(),
        };
        let response = self.post_json(DELETE_PATH, &body).await?;
        if response.status() != StatusCode::OK {
            return Err(status_error(response).await);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRegistry for HttpBackend {
    async fn register_user(&self, request: &RegisterUserRequest) -> StoreResult<()> {
        let response = self.post_json(REGISTER_PATH, request).await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(())
    }
}
