//! JSON-over-HTTP resource client.
//!
//! Routes, relative to the API base URL:
//! - `GET    /{endpoint}` (`?page=&per_page=` when paginated)
//! - `POST   /{endpoint}`
//! - `PUT    /{endpoint}/{uid}`
//! - `DELETE /{endpoint}/{uid}`
//!
//! A bearer token is attached when the session has one. Listing is retried on
//! transport failures; writes are never retried.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;

use super::{PageRequest, ResourceClient};
use crate::http::{HttpError, HttpTransport, Method, RequestBuilder, Response};
use crate::{AdminConfig, CrudError, Patch, Record, Uid};

#[derive(Debug, Clone)]
pub struct HttpResourceClient {
    transport: HttpTransport,
    base_url: String,
    token: Option<String>,
    list_retries: u32,
}

impl HttpResourceClient {
    /// Fails with `Validation` unless `base_url` is an absolute http(s) URL.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CrudError> {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        match reqwest::Url::parse(&base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(CrudError::Validation(format!(
                    "API base URL must use http(s), got {}",
                    url.scheme()
                )));
            }
            Err(e) => {
                return Err(CrudError::Validation(format!(
                    "invalid API base URL `{base_url}`: {e}"
                )));
            }
        }

        let transport = HttpTransport::new(timeout)
            .map_err(|e| CrudError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            transport,
            base_url,
            token: None,
            list_retries: 0,
        })
    }

    pub fn from_config(config: &AdminConfig) -> Result<Self, CrudError> {
        Ok(Self::new(config.api_base_url(), config.request_timeout())?
            .with_list_retries(config.list_retries()))
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_list_retries(mut self, retries: u32) -> Self {
        self.list_retries = retries;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_matches('/'))
    }

    fn item_url(&self, endpoint: &str, uid: Uid) -> Result<String, CrudError> {
        let mut url = reqwest::Url::parse(&self.collection_url(endpoint))
            .map_err(|e| CrudError::Validation(format!("invalid endpoint url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| CrudError::Validation("endpoint url cannot carry a path".to_owned()))?
            .push(uid.as_str());
        Ok(url.into())
    }

    fn request(&self, method: Method, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(method, url).bearer(self.token.as_deref())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, CrudError> {
        debug!("{:?} {}", request.method(), request.url());
        let response = self.transport.send(request).await.map_err(network_error)?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(classify_status(&response))
        }
    }

    async fn list_once(
        &self,
        endpoint: &str,
        page: Option<PageRequest>,
    ) -> Result<Vec<Record>, CrudError> {
        let mut request = self.request(Method::Get, self.collection_url(endpoint));
        if let Some(PageRequest { page, per_page }) = page {
            request = request.query("page", page).query("per_page", per_page);
        }

        let response = self.send(request).await?;
        let body: Value = parse_body(&response)?;
        let items = match body {
            Value::Array(items) => items,
            Value::Object(mut envelope) => match envelope.remove("data") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(CrudError::server(
                        Some(response.status),
                        "list response has no `data` array",
                    ));
                }
            },
            _ => {
                return Err(CrudError::server(
                    Some(response.status),
                    "list response is neither an array nor an object",
                ));
            }
        };

        Ok(items
            .into_iter()
            .filter_map(|item| match Record::try_from(item) {
                Ok(record) => Some(record),
                Err(other) => {
                    warn!("skipping non-object list item from {endpoint}: {other}");
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn list(
        &self,
        endpoint: &str,
        page: Option<PageRequest>,
    ) -> Result<Vec<Record>, CrudError> {
        let mut attempt = 0;
        loop {
            match self.list_once(endpoint, page).await {
                Err(CrudError::Network(message)) if attempt < self.list_retries => {
                    attempt += 1;
                    warn!(
                        "listing {endpoint} failed ({message}), retry {attempt}/{}",
                        self.list_retries
                    );
                }
                result => return result,
            }
        }
    }

    async fn create(&self, endpoint: &str, record: &Record) -> Result<Record, CrudError> {
        let request = self
            .request(Method::Post, self.collection_url(endpoint))
            .json(record)
            .map_err(|e| CrudError::Validation(format!("failed to serialize record: {e}")))?;

        let response = self.send(request).await?;
        if response.is_empty() {
            return Err(CrudError::server(
                Some(response.status),
                "create returned an empty body",
            ));
        }
        parse_body(&response)
    }

    async fn update(&self, endpoint: &str, uid: Uid, patch: &Patch) -> Result<Record, CrudError> {
        let request = self
            .request(Method::Put, self.item_url(endpoint, uid)?)
            .json(patch)
            .map_err(|e| CrudError::Validation(format!("failed to serialize patch: {e}")))?;

        let response = self.send(request).await?;
        // 204 means the patch was taken as-is.
        if response.is_empty() {
            return Ok(patch.clone());
        }
        parse_body(&response)
    }

    async fn delete(&self, endpoint: &str, uid: Uid) -> Result<(), CrudError> {
        let request = self.request(Method::Delete, self.item_url(endpoint, uid)?);
        self.send(request).await?;
        Ok(())
    }
}

fn network_error(err: HttpError) -> CrudError {
    CrudError::Network(err.to_string())
}

fn parse_body<T: serde::de::DeserializeOwned>(response: &Response) -> Result<T, CrudError> {
    response.json().map_err(|e| {
        CrudError::server(Some(response.status), format!("invalid response body: {e}"))
    })
}

/// Map a non-2xx response onto the error taxonomy.
pub(crate) fn classify_status(response: &Response) -> CrudError {
    let message = error_message(response);
    match response.status {
        400 | 422 => CrudError::Validation(message),
        401 => CrudError::Unauthorized(message),
        403 => CrudError::Forbidden(message),
        404 => CrudError::NotFound(message),
        409 | 412 => CrudError::Conflict(message),
        status => CrudError::server(Some(status), message),
    }
}

/// Prefer a `message`/`error` string from a JSON body, then the raw body text.
fn error_message(response: &Response) -> String {
    if let Ok(Value::Object(body)) = response.json::<Value>() {
        for key in ["message", "error"] {
            if let Some(Value::String(message)) = body.get(key) {
                return message.clone();
            }
        }
    }
    let text = response.text();
    let text = text.trim();
    if text.is_empty() {
        format!("status {}", response.status)
    } else {
        text.to_owned()
    }
}
