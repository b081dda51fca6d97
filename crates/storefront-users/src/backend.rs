//! HTTP client for the storefront admin backend.
//!
//! Implements [`UserBackend`] over the REST endpoints under `/users`:
//! - `GET    /users/resumen/{id}` composite read model
//! - `PUT    /users/{id}/informacion` basic info
//! - `PUT    /users/{id}/direcciones/{addrId}`, `POST /users/{id}/direcciones`
//! - `GET    /users/{id}/pedidos/historial`
//! - `PUT    /users/{id}/seguridad`
//! - `GET    /users/getAll[?rolId=]`
//! - `DELETE /users/{id}`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use storefront_types::config::BackendConfig;
use storefront_types::errors::StorefrontError;
use storefront_types::models::*;
use storefront_types::traits::UserBackend;

/// reqwest-backed [`UserBackend`].
pub struct HttpUserBackend {
    /// HTTP client for API requests.
    client: Client,
    /// Base URL without a trailing slash.
    base_url: String,
    /// Bearer token sent with every request.
    auth_token: Option<String>,
}

impl HttpUserBackend {
    /// Build a backend client with the configured timeouts.
    pub fn new(config: &BackendConfig) -> Result<Self, StorefrontError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| StorefrontError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, config.base_url.clone(), config.auth_token.clone()))
    }

    /// Use an existing client (custom TLS, test timeouts).
    pub fn with_client(client: Client, base_url: String, auth_token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode the JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, StorefrontError> {
        let response = Self::send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| StorefrontError::Serialization(format!("failed to decode response: {e}")))
    }

    /// Send a request, mapping transport failures and non-success statuses.
    async fn send(builder: RequestBuilder) -> Result<reqwest::Response, StorefrontError> {
        let response = builder.send().await.map_err(classify_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, body))
    }
}

fn classify_transport_error(err: reqwest::Error) -> StorefrontError {
    if err.is_timeout() {
        StorefrontError::Timeout(format!("backend request timed out: {err}"))
    } else if err.is_connect() {
        StorefrontError::Transport(format!("failed to connect to backend: {err}"))
    } else {
        StorefrontError::Transport(format!("backend request failed: {err}"))
    }
}

fn classify_status(status: StatusCode, body: String) -> StorefrontError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            StorefrontError::Unauthorized(format!("backend rejected credentials (HTTP {status})"))
        }
        StatusCode::NOT_FOUND => StorefrontError::NotFound(if body.is_empty() {
            "resource not found".to_string()
        } else {
            body
        }),
        _ => StorefrontError::Backend {
            status: status.as_u16(),
            body,
        },
    }
}

/// Reject ids that would produce a malformed path.
fn segment<'a>(kind: &str, id: &'a str) -> Result<&'a str, StorefrontError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(StorefrontError::InvalidInput(format!("{kind} id must not be empty")));
    }
    if id.contains(['/', '?', '#']) {
        return Err(StorefrontError::InvalidInput(format!(
            "{kind} id contains reserved characters: '{id}'"
        )));
    }
    Ok(id)
}

#[async_trait]
impl UserBackend for HttpUserBackend {
    async fn fetch_summary(&self, subject_id: &str) -> Result<AggregateRecord, StorefrontError> {
        let id = segment("subject", subject_id)?;
        self.send_json(self.request(Method::GET, &format!("/users/resumen/{id}")))
            .await
    }

    async fn update_basic_info(
        &self,
        subject_id: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, StorefrontError> {
        let id = segment("subject", subject_id)?;
        self.send_json(
            self.request(Method::PUT, &format!("/users/{id}/informacion"))
                .json(update),
        )
        .await
    }

    async fn save_address(
        &self,
        subject_id: &str,
        address: &Address,
    ) -> Result<Vec<Address>, StorefrontError> {
        let id = segment("subject", subject_id)?;
        let builder = match address.id.as_deref().filter(|_| !address.is_new()) {
            Some(address_id) => {
                let address_id = segment("address", address_id)?;
                self.request(Method::PUT, &format!("/users/{id}/direcciones/{address_id}"))
            }
            None => self.request(Method::POST, &format!("/users/{id}/direcciones")),
        };
        self.send_json(builder.json(address)).await
    }

    async fn fetch_order_history(
        &self,
        subject_id: &str,
    ) -> Result<Vec<OrderSummary>, StorefrontError> {
        let id = segment("subject", subject_id)?;
        self.send_json(self.request(Method::GET, &format!("/users/{id}/pedidos/historial")))
            .await
    }

    async fn update_security(
        &self,
        subject_id: &str,
        config: &SecurityConfig,
    ) -> Result<SecurityConfig, StorefrontError> {
        let id = segment("subject", subject_id)?;
        self.send_json(
            self.request(Method::PUT, &format!("/users/{id}/seguridad"))
                .json(config),
        )
        .await
    }

    async fn list_users(&self, role_id: Option<&str>) -> Result<Vec<UserProfile>, StorefrontError> {
        let mut builder = self.request(Method::GET, "/users/getAll");
        if let Some(role_id) = role_id.map(str::trim).filter(|r| !r.is_empty()) {
            builder = builder.query(&[("rolId", role_id)]);
        }
        self.send_json(builder).await
    }

    async fn delete_user(&self, subject_id: &str) -> Result<(), StorefrontError> {
        let id = segment("subject", subject_id)?;
        Self::send(self.request(Method::DELETE, &format!("/users/{id}"))).await?;
        Ok(())
    }
}
