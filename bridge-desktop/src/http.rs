//! HTTP Client Implementation using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{FormPart, HttpClient, HttpMethod, HttpRequest, HttpResponse, MultipartForm},
};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("nowplaying-presence/", env!("CARGO_PKG_VERSION"));

/// Reqwest-based HTTP client implementation
///
/// Provides HTTP operations with:
/// - Connection pooling via reqwest
/// - rustls TLS
/// - Multipart form bodies
///
/// Each call is a single attempt; nothing is retried here.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Create a new HTTP client with a 30 second overall timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a new HTTP client with custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .pool_max_idle_per_host(2)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                BridgeError::NotAvailable(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Convert bridge HttpMethod to reqwest Method
    fn convert_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }

    /// Convert a bridge multipart form into a reqwest form
    fn convert_form(form: MultipartForm) -> Result<Form> {
        let mut out = Form::new();

        for part in form.parts {
            out = match part {
                FormPart::Text { name, value } => out.text(name, value),
                FormPart::File {
                    name,
                    file_name,
                    mime_type,
                    data,
                } => {
                    let mut file = Part::bytes(data.to_vec()).file_name(file_name);
                    if let Some(mime) = mime_type {
                        file = file.mime_str(&mime).map_err(|e| {
                            BridgeError::OperationFailed(format!(
                                "Invalid MIME type '{}': {}",
                                mime, e
                            ))
                        })?;
                    }
                    out.part(name, file)
                }
            };
        }

        Ok(out)
    }

    /// Build reqwest request from bridge request
    fn build_request(&self, request: HttpRequest) -> Result<reqwest::RequestBuilder> {
        let method = Self::convert_method(request.method);
        let mut req = self.client.request(method, &request.url);

        // Add headers
        for (key, value) in request.headers {
            req = req.header(key, value);
        }

        // Multipart takes precedence; the builder keeps only one of the two
        if let Some(form) = request.form {
            req = req.multipart(Self::convert_form(form)?);
        } else if let Some(body) = request.body {
            req = req.body(body);
        }

        // Add timeout if specified
        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        Ok(req)
    }

    fn map_send_error(e: reqwest::Error) -> BridgeError {
        if e.is_timeout() {
            BridgeError::Timeout(format!("Request timed out: {}", e))
        } else if e.is_connect() {
            BridgeError::OperationFailed(format!("Connection failed: {}", e))
        } else {
            BridgeError::OperationFailed(e.to_string())
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(method = ?request.method, url = %request.url, "Executing HTTP request");

        let response = self
            .build_request(request)?
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "HTTP request failed");
                Self::map_send_error(e)
            })?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
            .collect();

        let body = response.bytes().await.map_err(Self::map_send_error)?;

        debug!(status, bytes = body.len(), "HTTP response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_http_client_creation() {
        assert!(ReqwestHttpClient::new().is_ok());
        assert!(ReqwestHttpClient::with_timeout(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(
            ReqwestHttpClient::convert_method(HttpMethod::Get),
            reqwest::Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::convert_method(HttpMethod::Post),
            reqwest::Method::POST
        );
    }

    #[test]
    fn test_multipart_request_sets_form_content_type() {
        let client = ReqwestHttpClient::new().unwrap();
        let form = MultipartForm::new().text("reqtype", "fileupload").file(
            "fileToUpload",
            "artwork.jpg",
            Some("image/jpeg".to_string()),
            Bytes::from_static(b"\xFF\xD8\xFF"),
        );
        let request = HttpRequest::new(HttpMethod::Post, "https://catbox.moe/user/api.php")
            .multipart(form)
            .timeout(Duration::from_secs(3));

        let built = client.build_request(request).unwrap().build().unwrap();

        let content_type = built
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        assert_eq!(built.method(), &reqwest::Method::POST);
        assert_eq!(built.timeout(), Some(&Duration::from_secs(3)));
    }

    #[test]
    fn test_invalid_mime_type_is_rejected() {
        let form = MultipartForm::new().file(
            "fileToUpload",
            "artwork.jpg",
            Some("not a mime".to_string()),
            Bytes::new(),
        );

        assert!(ReqwestHttpClient::convert_form(form).is_err());
    }

    #[test]
    fn test_raw_body_request() {
        let client = ReqwestHttpClient::new().unwrap();
        let request = HttpRequest::new(HttpMethod::Put, "https://example.com/upload")
            .header("X-Test", "1")
            .body(Bytes::from_static(b"payload"));

        let built = client.build_request(request).unwrap().build().unwrap();

        assert_eq!(built.method(), &reqwest::Method::PUT);
        assert_eq!(built.headers().get("X-Test").unwrap(), "1");
        assert_eq!(
            built.body().and_then(|b| b.as_bytes()),
            Some(&b"payload"[..])
        );
    }
}
