//! Product endpoints and the predict request.

use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{FinparseError, Result};
use crate::input::InputSource;

/// Identifies a product on the API: `products/{owner}/{url_name}/v{version}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSpec {
    pub owner: &'static str,
    pub url_name: &'static str,
    pub version: &'static str,
}

impl ProductSpec {
    pub const fn new(owner: &'static str, url_name: &'static str, version: &'static str) -> Self {
        Self {
            owner,
            url_name,
            version,
        }
    }
}

/// Per-request flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Ask the API to return the full OCR word list.
    pub include_words: bool,
    /// Ask the API to detect and crop multiple documents on one image.
    pub cropper: bool,
}

/// A product endpoint bound to an API key.
#[derive(Debug, Clone)]
pub struct Endpoint {
    product: ProductSpec,
    base_url: String,
    api_key: String,
}

impl Endpoint {
    pub fn new(product: ProductSpec, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            product,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn product(&self) -> ProductSpec {
        self.product
    }

    /// Full predict URL.
    pub fn url(&self) -> String {
        format!(
            "{}/products/{}/{}/v{}/predict",
            self.base_url.trim_end_matches('/'),
            self.product.owner,
            self.product.url_name,
            self.product.version
        )
    }

    /// Send the document and return the raw JSON body on success.
    pub async fn predict(
        &self,
        http: &reqwest::Client,
        input: &InputSource,
        options: RequestOptions,
    ) -> Result<Value> {
        let part = Part::bytes(input.data().to_vec())
            .file_name(input.filename().to_string())
            .mime_str(input.mime_type().as_str())?;
        let mut form = Form::new().part("document", part);
        if options.include_words {
            form = form.text("include_mvision", "true");
        }

        let url = self.url();
        info!("POST {} ({})", url, input.filename());
        let mut request = http
            .post(&url)
            .header(AUTHORIZATION, format!("Token {}", self.api_key))
            .header(USER_AGENT, concat!("finparse/", env!("CARGO_PKG_VERSION")))
            .multipart(form);
        if options.cropper {
            request = request.query(&[("cropper", "true")]);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!("Response status {} ({} bytes)", status, text.len());

        if status.is_success() {
            Ok(serde_json::from_str(&text)?)
        } else {
            let body: Value = serde_json::from_str(&text).unwrap_or_default();
            Err(error_from_response(status.as_u16(), &body))
        }
    }
}

/// Map an API error envelope (`api_request.error`) to an error.
pub fn error_from_response(status: u16, body: &Value) -> FinparseError {
    let error = body
        .get("api_request")
        .and_then(|request| request.get("error"));
    let text = |key: &str| match error.and_then(|error| error.get(key)) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    FinparseError::Api {
        status,
        code: text("code"),
        message: text("message"),
        details: text("details"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const INVOICE: ProductSpec = ProductSpec::new("mindee", "invoices", "4");

    #[test]
    fn test_url() {
        let endpoint = Endpoint::new(INVOICE, "https://api.example.com/v1/", "key");
        assert_eq!(
            endpoint.url(),
            "https://api.example.com/v1/products/mindee/invoices/v4/predict"
        );
    }

    #[test]
    fn test_error_from_envelope() {
        let body = json!({
            "api_request": {
                "error": {
                    "code": "BadRequest",
                    "message": "Invalid fields in form",
                    "details": { "document": ["Missing data for required field."] }
                },
                "status_code": 400
            }
        });
        match error_from_response(400, &body) {
            FinparseError::Api { status, code, message, details } => {
                assert_eq!(status, 400);
                assert_eq!(code, "BadRequest");
                assert_eq!(message, "Invalid fields in form");
                assert!(details.contains("Missing data"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_error_without_envelope() {
        let err = error_from_response(502, &json!({}));
        assert_eq!(err.to_string(), "API error (502) : ");
    }
}
