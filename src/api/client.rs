//! HTTP client for the REST backend.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::accounts::AccountsApi;
use super::catalog::CatalogApi;
use super::envelope::error_message;
use super::error::{ApiError, Result};
use super::management::ManagementApi;
use super::orders::OrdersApi;
use super::portfolio::PortfolioApi;
use super::services::ServicesApi;
use crate::config::BackendConfig;
use crate::forms::FormPayload;

/// Shared client for the backend API.
///
/// Holds the connection pool; per-request credentials are attached through
/// the [`Backend`] view returned by [`BackendClient::anonymous`] or
/// [`BackendClient::authorized`].
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use metalworks_web::api::BackendClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = BackendClient::new(
///     "http://localhost:8000/api",
///     "http://localhost:8000",
///     Duration::from_secs(15),
/// )?;
///
/// let featured = client.anonymous().catalog().featured_products().await?;
/// let overview = client.authorized("token").management().overview().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BackendClient {
    api_base: Url,
    media_base: String,
    http: reqwest::Client,
}

impl BackendClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `api_base_url` - Root of the REST API (e.g. "http://localhost:8000/api")
    /// * `media_base_url` - Origin for relative media paths
    /// * `timeout` - Per-request timeout
    pub fn new(
        api_base_url: impl AsRef<str>,
        media_base_url: impl AsRef<str>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(api_base_url, media_base_url, http)
    }

    /// Create a new client with a custom reqwest client.
    pub fn with_client(
        api_base_url: impl AsRef<str>,
        media_base_url: impl AsRef<str>,
        http: reqwest::Client,
    ) -> Result<Self> {
        // Without the trailing slash `Url::join` would replace the last segment.
        let mut base = api_base_url.as_ref().trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            api_base: Url::parse(&base)?,
            media_base: media_base_url.as_ref().trim().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(
            &config.api_base_url,
            &config.media_base_url,
            config.request_timeout(),
        )
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Credentials
    // ─────────────────────────────────────────────────────────────────────────

    pub fn anonymous(&self) -> Backend<'_> {
        Backend {
            client: self,
            token: None,
        }
    }

    /// Requests carry `Authorization: Bearer <token>`.
    pub fn authorized<'a>(&'a self, token: &'a str) -> Backend<'a> {
        Backend {
            client: self,
            token: Some(token),
        }
    }

    pub fn for_token<'a>(&'a self, token: Option<&'a str>) -> Backend<'a> {
        Backend {
            client: self,
            token,
        }
    }

    /// Absolute URL for a media path. Absolute URLs pass through, blanks are `None`.
    pub fn media_url(&self, path: Option<&str>) -> Option<String> {
        let path = path.map(str::trim).filter(|p| !p.is_empty())?;
        if path.starts_with("http") {
            return Some(path.to_string());
        }
        let separator = if path.starts_with('/') { "" } else { "/" };
        Some(format!("{}{separator}{path}", self.media_base))
    }
}

/// Client bound to one caller's credentials.
#[derive(Debug, Clone, Copy)]
pub struct Backend<'a> {
    client: &'a BackendClient,
    token: Option<&'a str>,
}

impl<'a> Backend<'a> {
    pub fn client(self) -> &'a BackendClient {
        self.client
    }

    pub fn is_authorized(self) -> bool {
        self.token.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Login, registration, profile, addresses and admin user management.
    pub fn accounts(self) -> AccountsApi<'a> {
        AccountsApi { backend: self }
    }

    /// Categories, materials, products and reviews.
    pub fn catalog(self) -> CatalogApi<'a> {
        CatalogApi { backend: self }
    }

    /// Quotation requests and service bookings.
    pub fn orders(self) -> OrdersApi<'a> {
        OrdersApi { backend: self }
    }

    pub fn services(self) -> ServicesApi<'a> {
        ServicesApi { backend: self }
    }

    pub fn portfolio(self) -> PortfolioApi<'a> {
        PortfolioApi { backend: self }
    }

    /// Analytics, overview, HR and internal projects.
    pub fn management(self) -> ManagementApi<'a> {
        ManagementApi { backend: self }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn request(self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.client.api_base.join(path.trim_start_matches('/'))?;
        let mut request = self.client.http.request(method, url);
        if let Some(token) = self.token {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    pub(crate) async fn get(
        self,
        path: &str,
        query: &[(&str, String)],
        fallback: &str,
    ) -> Result<Value> {
        let request = self.request(Method::GET, path)?.query(query);
        Self::execute(Method::GET, path, request, fallback).await
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        self,
        method: Method,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<Value> {
        let request = self.request(method.clone(), path)?.json(body);
        Self::execute(method, path, request, fallback).await
    }

    pub(crate) async fn send_form(
        self,
        method: Method,
        path: &str,
        form: FormPayload,
        fallback: &str,
    ) -> Result<Value> {
        let request = self
            .request(method.clone(), path)?
            .multipart(form.into_multipart()?);
        Self::execute(method, path, request, fallback).await
    }

    pub(crate) async fn delete(self, path: &str, fallback: &str) -> Result<()> {
        let request = self.request(Method::DELETE, path)?;
        Self::execute(Method::DELETE, path, request, fallback).await?;
        Ok(())
    }

    async fn execute(
        method: Method,
        path: &str,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<Value> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(name: "backend.error", %method, path, error = %e, "Backend unreachable");
            ApiError::from(e)
        })?;
        let status = response.status();
        tracing::debug!(name: "backend.request", %method, path, status = status.as_u16(), "Backend call");

        let result = handle_response(response, fallback).await;
        if let Err(err) = &result {
            tracing::warn!(name: "backend.error", %method, path, status = status.as_u16(), error = %err, "Backend call failed");
        }
        result
    }
}

/// Decodes a response body, mapping failures to [`ApiError`].
///
/// Empty bodies (`204`) decode as `null`. A 401, or any body carrying
/// `code: "token_not_valid"`, is reported as [`ApiError::Unauthorized`].
pub(crate) async fn handle_response(response: reqwest::Response, fallback: &str) -> Result<Value> {
    let status = response.status();
    let bytes = response.bytes().await?;
    let body: Value = if bytes.is_empty() || status == StatusCode::NO_CONTENT {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    let token_invalid = body.get("code").and_then(Value::as_str) == Some("token_not_valid");
    if status.is_success() && !token_invalid {
        return Ok(body);
    }

    let message = error_message(&body).unwrap_or_else(|| fallback.to_string());
    if status == StatusCode::UNAUTHORIZED || token_invalid {
        return Err(ApiError::Unauthorized(message));
    }
    Err(ApiError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api: &str) -> BackendClient {
        BackendClient::new(api, "http://localhost:8000/", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn api_base_gains_trailing_slash() {
        let client = client("http://localhost:8000/api");
        assert_eq!(client.api_base().as_str(), "http://localhost:8000/api/");
        let url = client
            .api_base()
            .join("products/categories/".trim_start_matches('/'))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/products/categories/");
    }

    #[test]
    fn media_paths_resolve_against_media_base() {
        let client = client("http://localhost:8000/api/");
        assert_eq!(
            client.media_url(Some("/media/products/gate.jpg")).as_deref(),
            Some("http://localhost:8000/media/products/gate.jpg")
        );
        assert_eq!(
            client.media_url(Some("media/a.jpg")).as_deref(),
            Some("http://localhost:8000/media/a.jpg")
        );
        assert_eq!(
            client.media_url(Some("https://cdn.example.com/a.jpg")).as_deref(),
            Some("https://cdn.example.com/a.jpg")
        );
        assert_eq!(client.media_url(Some("  ")), None);
        assert_eq!(client.media_url(None), None);
    }

    #[test]
    fn backend_view_carries_token() {
        let client = client("http://localhost:8000/api/");
        assert!(!client.anonymous().is_authorized());
        assert!(client.authorized("abc").is_authorized());
        assert!(!client.for_token(None).is_authorized());
    }
}
