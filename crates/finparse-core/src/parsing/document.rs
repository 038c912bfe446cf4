//! The `document` envelope wrapping every prediction response.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{ensure_object, list_of, record, Prediction};
use crate::error::{ParseError, Result};

/// Product that produced the inference.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductInfo {
    pub name: String,
    pub version: String,
}

/// Prediction for a single page.
#[derive(Debug, Clone, Serialize)]
pub struct Page<P> {
    /// Zero-based page number.
    pub id: u32,
    pub prediction: P,
}

/// Document-level prediction plus one prediction per page.
#[derive(Debug, Clone, Serialize)]
pub struct Inference<P> {
    pub product: ProductInfo,
    pub prediction: P,
    pub pages: Vec<Page<P>>,
}

/// A parsed API response.
#[derive(Debug, Clone, Serialize)]
pub struct Document<P> {
    pub id: String,
    pub filename: String,
    pub n_pages: u32,
    pub inference: Inference<P>,
}

impl<P: Prediction> Document<P> {
    /// Parse a full response body (`{"document": {...}}`).
    pub fn from_response(response: &Value) -> Result<Self> {
        let document = response
            .get("document")
            .ok_or_else(|| ParseError::MissingKey("document".to_string()))?;
        Self::from_document(document)
    }

    /// Parse the `document` object itself.
    pub fn from_document(document: &Value) -> Result<Self> {
        ensure_object(document, "document")?;
        let inference = document
            .get("inference")
            .ok_or_else(|| ParseError::MissingKey("document.inference".to_string()))?;
        ensure_object(inference, "document.inference")?;

        let prediction = P::from_prediction(record(inference, "prediction"), None)?;
        let pages = list_of(inference, "pages")
            .iter()
            .enumerate()
            .map(|(index, page)| -> Result<Page<P>> {
                let id = page
                    .get("id")
                    .and_then(Value::as_u64)
                    .and_then(|id| u32::try_from(id).ok())
                    .unwrap_or(index as u32);
                Ok(Page {
                    id,
                    prediction: P::from_prediction(record(page, "prediction"), Some(id))?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let product = record(inference, "product");
        let text = |value: &Value, key: &str| {
            value.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
        };
        let n_pages = document
            .get("n_pages")
            .and_then(Value::as_u64)
            .map(|n| n as u32)
            .unwrap_or(pages.len() as u32);

        debug!("Parsed document with {} page predictions", pages.len());
        Ok(Self {
            id: text(document, "id"),
            filename: text(document, "name"),
            n_pages,
            inference: Inference {
                product: ProductInfo {
                    name: text(product, "name"),
                    version: text(product, "version"),
                },
                prediction,
                pages,
            },
        })
    }
}

impl<P: std::fmt::Display> std::fmt::Display for Document<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "########\nDocument\n########")?;
        writeln!(f, ":Document ID: {}", self.id)?;
        writeln!(f, ":Filename: {}", self.filename)?;
        writeln!(f)?;
        writeln!(f, "Inference\n#########")?;
        writeln!(
            f,
            ":Product: {} v{}",
            self.inference.product.name, self.inference.product.version
        )?;
        writeln!(f)?;
        writeln!(f, "Prediction\n==========")?;
        writeln!(f, "{}", self.inference.prediction)?;
        if !self.inference.pages.is_empty() {
            writeln!(f)?;
            write!(f, "Page Predictions\n================")?;
            for page in &self.inference.pages {
                let title = format!("Page {}", page.id);
                write!(f, "\n\n{}\n{}\n{}", title, "-".repeat(title.len()), page.prediction)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
