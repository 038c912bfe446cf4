//! High-level client: input in, typed document out.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::{FinparseError, Result};
use crate::http::{Endpoint, RequestOptions};
use crate::input::{InputSource, MimeType};
use crate::models::FinparseConfig;
use crate::parsing::{Document, Prediction};
use crate::pdf::PageOptions;

/// Options for a single parse call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOptions {
    pub request: RequestOptions,
    /// Page cutting applied to PDF inputs before upload.
    pub page_options: Option<PageOptions>,
}

impl ParseOptions {
    /// Options taken from the `parse` and `pages` config sections.
    pub fn from_config(config: &FinparseConfig) -> Self {
        Self {
            request: RequestOptions {
                include_words: config.parse.include_words,
                cropper: config.parse.cropper,
            },
            page_options: config.pages.enabled.then(|| config.pages.options.clone()),
        }
    }
}

/// Client for the prediction API.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl Client {
    pub fn new(config: &FinparseConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api.base_url.clone(),
            api_key: config.resolve_api_key(),
            api_key_env: config.api.api_key_env.clone(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Endpoint serving product `P` for an input of type `mime_type`.
    pub fn endpoint<P: Prediction>(&self, mime_type: MimeType) -> Result<Endpoint> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            FinparseError::Config(format!(
                "missing API key: set it in the config file or the {} environment variable",
                self.api_key_env
            ))
        })?;
        Ok(Endpoint::new(P::product(mime_type), self.base_url.as_str(), api_key))
    }

    /// Cut pages if requested, upload the document and parse the response.
    pub async fn parse<P: Prediction>(
        &self,
        mut input: InputSource,
        options: &ParseOptions,
    ) -> Result<Document<P>> {
        let endpoint = self.endpoint::<P>(input.mime_type())?;

        if let Some(page_options) = &options.page_options {
            let cut = input.apply_page_options(page_options)?;
            debug!("Page options applied: {}", cut);
        }

        let response = endpoint.predict(&self.http, &input, options.request).await?;
        let document = Document::from_response(&response)?;
        info!(
            "Parsed '{}' with {} v{}",
            input.filename(),
            document.inference.product.name,
            document.inference.product.version
        );
        Ok(document)
    }
}
