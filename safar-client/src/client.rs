use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use safar_core::{ApiError, ApiResult, Endpoint, RestBackend};
use safar_shared::{unwrap_list, Masked};

use crate::context::AppContext;

/// HTTP implementation of [`RestBackend`]. Every request carries the bearer
/// token and the `organization` query parameter.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<Masked<String>>,
    organization: i64,
}

impl ApiClient {
    pub fn new(context: &AppContext) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(context.timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("http client setup failed: {e}")))?;
        Ok(Self {
            http,
            base_url: context.base_url.trim_end_matches('/').to_string(),
            token: context.access_token.clone(),
            organization: context.organization_id,
        })
    }

    fn headers(&self) -> ApiResult<HeaderMap> {
        let token = match &self.token {
            Some(token) if !token.is_blank() => token,
            _ => return Err(ApiError::MissingAuth),
        };
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {}", token.expose().trim()))
            .map_err(|_| ApiError::MissingAuth)?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    #[instrument(skip(self, query, body), fields(organization = self.organization))]
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> ApiResult<Value> {
        let headers = self.headers()?;
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .http
            .request(method, &url)
            .headers(headers)
            .query(&[("organization", self.organization.to_string())])
            .query(query);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ApiError::Decode(e.to_string()))?;

        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), &text);
            if status.is_server_error() {
                error!("{} answered {}: {}", path, status, err);
            } else {
                warn!("{} answered {}: {}", path, status, err);
            }
            return Err(err);
        }

        debug!("{} answered {}", path, status);
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RestBackend for ApiClient {
    async fn list(&self, endpoint: Endpoint, query: &[(&str, String)]) -> ApiResult<Vec<Value>> {
        let body = self.send(Method::GET, endpoint.path(), query, None).await?;
        Ok(unwrap_list(body))
    }

    async fn fetch(&self, endpoint: Endpoint, id: i64) -> ApiResult<Value> {
        self.send(Method::GET, &endpoint.item_path(id), &[], None).await
    }

    async fn create(&self, endpoint: Endpoint, body: &Value) -> ApiResult<Value> {
        self.send(Method::POST, endpoint.path(), &[], Some(body)).await
    }

    async fn update(&self, endpoint: Endpoint, id: i64, body: &Value) -> ApiResult<Value> {
        self.send(Method::PUT, &endpoint.item_path(id), &[], Some(body)).await
    }

    async fn patch(&self, endpoint: Endpoint, id: i64, body: &Value) -> ApiResult<Value> {
        self.send(Method::PATCH, &endpoint.item_path(id), &[], Some(body)).await
    }

    async fn delete(&self, endpoint: Endpoint, id: i64) -> ApiResult<()> {
        self.send(Method::DELETE, &endpoint.item_path(id), &[], None).await?;
        Ok(())
    }
}
