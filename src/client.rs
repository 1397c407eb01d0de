use futures::Stream;
use futures::stream::{self, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::client_logger::ClientLogger;
use crate::config::ApiKey;
use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS, STREAM_TTFB,
};
use crate::sse::process_sse;
use crate::types::{GenerateContentRequest, GenerateContentResponse, Model};

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A boxed stream of response chunks from `streamGenerateContent`.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<GenerateContentResponse>> + Send>>;

/// Client for the Gemini `generateContent` REST API.
#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl Gemini {
    /// Create a new Gemini client.
    ///
    /// The API key can be provided directly or read from the environment; see
    /// [`ApiKey::from_env`].
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => ApiKey::new(key)?,
            None => ApiKey::from_env()?,
        };

        let mut base_url = base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url)
            .map_err(|e| Error::url(format!("Invalid base URL '{base_url}': {e}"), Some(e)))?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            api_key: api_key.into_string(),
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that observes every request, response and stream chunk.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The request timeout applied to every call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| Error::authentication("API key contains invalid characters"))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);
        Ok(headers)
    }

    /// Build the URL of `{model}:{method}`.
    fn endpoint(&self, model: &Model, method: &str) -> Result<Url> {
        let path = format!("{}:{method}", model.resource_name());
        self.base_url
            .join(&path)
            .map_err(|e| Error::url(format!("Invalid endpoint '{path}': {e}"), Some(e)))
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        CLIENT_REQUEST_ERRORS.click();
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    async fn post(
        &self,
        url: Url,
        headers: HeaderMap,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<Response> {
        if let Some(logger) = &self.logger {
            logger.log_request(model, request);
        }
        CLIENT_REQUESTS.click();
        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }
        Ok(response)
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        error_from_body(status_code, retry_after, &error_body)
    }

    /// Generate a complete response in one call.
    pub async fn generate_content(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let start = Instant::now();
        let url = self.endpoint(model, "generateContent")?;
        let response = self
            .post(url, self.default_headers()?, model, request)
            .await?;

        let response = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                CLIENT_REQUEST_ERRORS.click();
                Error::serialization(
                    format!("Failed to parse response: {}", e),
                    Some(Box::new(e)),
                )
            })?;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if let Some(logger) = &self.logger {
            logger.log_response(&response);
        }
        Ok(response)
    }

    /// Generate a response incrementally over server-sent events.
    ///
    /// Returns a stream of response chunks in arrival order.  Each chunk
    /// carries the next fragment of text; the last one usually carries the
    /// finish reason and usage metadata.
    pub async fn stream_generate_content(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<ChunkStream> {
        let start = Instant::now();
        let mut url = self.endpoint(model, "streamGenerateContent")?;
        url.query_pairs_mut().append_pair("alt", "sse");

        let mut headers = self.default_headers()?;
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/event-stream"),
        );

        let response = self.post(url, headers, model, request).await?;
        let chunks = process_sse(response.bytes_stream());
        let logger = self.logger.clone();

        let observed = stream::unfold(
            (Box::pin(chunks), 0usize, logger),
            move |(mut chunks, seen, logger)| async move {
                match chunks.next().await {
                    Some(Ok(chunk)) => {
                        if seen == 0 {
                            STREAM_TTFB.add(start.elapsed().as_secs_f64());
                        }
                        if let Some(logger) = &logger {
                            logger.log_stream_chunk(&chunk);
                        }
                        Some((Ok(chunk), (chunks, seen + 1, logger)))
                    }
                    Some(Err(e)) => Some((Err(e), (chunks, seen, logger))),
                    None => {
                        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
                        if let Some(logger) = &logger {
                            logger.log_stream_complete(seen);
                        }
                        None
                    }
                }
            },
        );
        Ok(Box::pin(observed))
    }
}

impl fmt::Debug for Gemini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gemini")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

/// Map an error status and Google's `{"error": {...}}` body to an [`Error`].
fn error_from_body(status_code: u16, retry_after: Option<u64>, body: &str) -> Error {
    #[derive(Deserialize)]
    struct ErrorResponse {
        error: Option<ErrorDetail>,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        message: Option<String>,
        status: Option<String>,
    }

    // Streaming endpoints wrap the error object in an array.
    let parsed = serde_json::from_str::<ErrorResponse>(body).ok().or_else(|| {
        serde_json::from_str::<Vec<ErrorResponse>>(body)
            .ok()
            .and_then(|v| v.into_iter().next())
    });
    let detail = parsed.and_then(|e| e.error);
    let status = detail.as_ref().and_then(|d| d.status.clone());
    let message = detail
        .and_then(|d| d.message)
        .unwrap_or_else(|| body.to_string());

    match status_code {
        400 if message.contains("API key not valid") => Error::authentication(message),
        400 => Error::bad_request(message, status),
        401 => Error::authentication(message),
        403 => Error::permission(message),
        404 => Error::not_found(message),
        408 => Error::timeout(message, None),
        429 => Error::rate_limit(message, retry_after),
        500 => Error::internal_server(message),
        502..=504 => Error::service_unavailable(message, retry_after),
        _ => Error::api(status_code, status, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;

    #[test]
    fn client_creation() {
        let client = Gemini::new(Some("test-key".to_string())).unwrap();
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url.as_str(), DEFAULT_API_URL);
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);

        let client = Gemini::with_options(
            Some("test-key".to_string()),
            Some("https://custom-api.example.com/v1".to_string()),
            Some(Duration::from_secs(30)),
        )
        .unwrap();
        assert_eq!(client.base_url.as_str(), "https://custom-api.example.com/v1/");
        assert_eq!(client.timeout, Duration::from_secs(30));
    }

    #[test]
    fn blank_key_is_rejected() {
        let err = Gemini::new(Some("   ".to_string())).unwrap_err();
        assert!(err.is_authentication());
    }

    #[test]
    fn debug_redacts_key() {
        let client = Gemini::new(Some("secret-key".to_string())).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn endpoints() {
        let client = Gemini::new(Some("test-key".to_string())).unwrap();
        let model = Model::from(KnownModel::Gemini20Flash);
        assert_eq!(
            client.endpoint(&model, "generateContent").unwrap().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        let tuned = Model::from("tunedModels/my-model");
        assert_eq!(
            client.endpoint(&tuned, "streamGenerateContent").unwrap().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/tunedModels/my-model:streamGenerateContent"
        );
    }

    #[test]
    fn error_mapping() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        let err = error_from_body(429, Some(7), body);
        assert!(err.is_rate_limit());
        assert!(err.to_string().contains("Quota exceeded"));

        let body = r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#;
        assert!(error_from_body(400, None, body).is_authentication());

        let body = r#"{"error": {"code": 400, "message": "bad field", "status": "INVALID_ARGUMENT"}}"#;
        assert!(error_from_body(400, None, body).is_bad_request());

        let body = r#"[{"error": {"code": 404, "message": "model not found", "status": "NOT_FOUND"}}]"#;
        let err = error_from_body(404, None, body);
        assert!(err.is_not_found());
        assert!(err.to_string().contains("model not found"));

        assert!(error_from_body(403, None, "{}").is_permission());
        assert!(error_from_body(503, None, "unavailable").is_server_error());

        let err = error_from_body(418, None, "teapot");
        assert_eq!(err.status_code(), Some(418));
        assert!(err.to_string().contains("teapot"));
    }

    #[tokio::test]
    #[ignore] // Requires a real API key.
    async fn live_stream_generate_content() {
        let Ok(client) = Gemini::new(None) else {
            println!("Skipping live_stream_generate_content: no API key set");
            return;
        };
        let request = GenerateContentRequest::new(vec![crate::types::Content::user(
            "Respond with a short greeting.",
        )]);
        let mut stream = client
            .stream_generate_content(&Model::default(), &request)
            .await
            .unwrap();
        let mut text = String::new();
        while let Some(chunk) = stream.next().await {
            text.push_str(&chunk.unwrap().text().unwrap());
        }
        assert!(!text.is_empty());
    }
}
