use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use search_logging::{query_preview, search_debug};

use crate::decode::{decode_predictions, decode_search_results};
use crate::{FailureKind, FetchError, Suggestion};

pub const COMPLETION_PATH: &str = "/completion/complete";
pub const SEARCH_PATH: &str = "/api/v2/search";

/// Base URL of one remote service plus headers sent with every request to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub base_url: String,
    pub headers: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub prediction: Endpoint,
    pub search: Endpoint,
    /// `None` keeps the transport default.
    pub connect_timeout: Option<Duration>,
    /// `None` keeps the transport default.
    pub request_timeout: Option<Duration>,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Accepted response content types; empty accepts anything.
    pub allowed_content_types: Vec<String>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            prediction: Endpoint::new("http://127.0.0.1:8000"),
            search: Endpoint::new("http://127.0.0.1:8001"),
            connect_timeout: None,
            request_timeout: None,
            redirect_limit: 5,
            max_bytes: 2 * 1024 * 1024,
            allowed_content_types: vec!["application/json".to_string()],
        }
    }
}

#[async_trait::async_trait]
pub trait CompletionService: Send + Sync {
    /// Ranked completions for `text`. Any string, including empty, is sent as-is.
    async fn complete(&self, text: &str) -> Result<Vec<Suggestion>, FetchError>;
}

#[async_trait::async_trait]
pub trait SearchService: Send + Sync {
    /// Entities matching `query`, in service order.
    async fn search(&self, query: &str) -> Result<Vec<serde_json::Value>, FetchError>;
}

/// Both services over one pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestServices {
    settings: ServiceSettings,
    client: reqwest::Client,
    prediction_headers: HeaderMap,
    search_headers: HeaderMap,
}

impl ReqwestServices {
    pub fn new(settings: ServiceSettings) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit));
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        let prediction_headers = build_headers(&settings.prediction.headers)?;
        let search_headers = build_headers(&settings.search.headers)?;

        Ok(Self {
            settings,
            client,
            prediction_headers,
            search_headers,
        })
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        if self.settings.allowed_content_types.is_empty() {
            return true;
        }
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    /// Sends `request` and returns the body, enforcing status, type and size limits.
    async fn read_body(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, FetchError> {
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        if let Some(ct) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        {
            if !self.is_content_type_allowed(ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl CompletionService for ReqwestServices {
    async fn complete(&self, text: &str) -> Result<Vec<Suggestion>, FetchError> {
        let url = endpoint_url(&self.settings.prediction, COMPLETION_PATH)?;
        search_debug!("POST {} text={:?}", url, query_preview(text));

        let body = serde_json::json!({ "text": text }).to_string();
        let request = self
            .client
            .post(url)
            .headers(self.prediction_headers.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        let bytes = self.read_body(request).await?;
        decode_predictions(&bytes)
    }
}

#[async_trait::async_trait]
impl SearchService for ReqwestServices {
    async fn search(&self, query: &str) -> Result<Vec<serde_json::Value>, FetchError> {
        let mut url = endpoint_url(&self.settings.search, SEARCH_PATH)?;
        url.query_pairs_mut().append_pair("q", query);
        search_debug!("GET {}", url);

        let request = self.client.get(url).headers(self.search_headers.clone());

        let bytes = self.read_body(request).await?;
        decode_search_results(&bytes)
    }
}

fn endpoint_url(endpoint: &Endpoint, path: &str) -> Result<url::Url, FetchError> {
    let raw = format!("{}{}", endpoint.base_url.trim_end_matches('/'), path);
    url::Url::parse(&raw).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
}

fn build_headers(pairs: &[(String, String)]) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::with_capacity(pairs.len());
    for (name, value) in pairs {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| FetchError::new(FailureKind::InvalidHeader, err.to_string()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|err| FetchError::new(FailureKind::InvalidHeader, err.to_string()))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_tolerates_trailing_slash() {
        let url = endpoint_url(&Endpoint::new("http://host:9000/"), COMPLETION_PATH).unwrap();
        assert_eq!(url.as_str(), "http://host:9000/completion/complete");
    }

    #[test]
    fn endpoint_url_keeps_base_path() {
        let url = endpoint_url(&Endpoint::new("https://api.example.com/v1"), SEARCH_PATH).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/api/v2/search");
    }

    #[test]
    fn bad_base_url_is_reported() {
        let err = endpoint_url(&Endpoint::new("not a url"), SEARCH_PATH).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }

    #[test]
    fn invalid_header_name_fails_construction() {
        let settings = ServiceSettings {
            prediction: Endpoint {
                base_url: "http://127.0.0.1:1".to_string(),
                headers: vec![("bad header".to_string(), "x".to_string())],
            },
            ..ServiceSettings::default()
        };
        let err = ReqwestServices::new(settings).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidHeader);
    }
}
