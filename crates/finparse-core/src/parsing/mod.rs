//! Turning API responses into typed documents.

mod document;
pub mod normalize;
pub mod reconstruct;

pub use document::{Document, Inference, Page, ProductInfo};
pub use normalize::fix_api_inconsistencies;
pub use reconstruct::{reconstruct, PageScope, Totals};

use serde_json::Value;

use crate::error::{ParseError, Result};
use crate::http::ProductSpec;
use crate::input::MimeType;

/// A document product the API can predict.
pub trait Prediction: Sized {
    /// Product to call for an input of the given type.
    fn product(mime_type: MimeType) -> ProductSpec;

    /// Build the prediction from its JSON object. `page_id` is `None` for the
    /// document-level prediction and the page number for page predictions.
    fn from_prediction(prediction: &Value, page_id: Option<u32>) -> Result<Self>;
}

/// Items of a list-valued key, empty when the key is missing or not a list.
pub(crate) fn list_of<'a>(prediction: &'a Value, key: &str) -> &'a [Value] {
    prediction
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

static NULL: Value = Value::Null;

/// Value under `key`, `Null` when absent.
pub(crate) fn record<'a>(prediction: &'a Value, key: &str) -> &'a Value {
    prediction.get(key).unwrap_or(&NULL)
}

pub(crate) fn ensure_object(prediction: &Value, what: &str) -> Result<()> {
    if prediction.is_object() {
        Ok(())
    } else {
        Err(ParseError::NotAnObject(what.to_string()).into())
    }
}

/// Accumulates `:Label: value` lines, trimming trailing whitespace.
#[derive(Default)]
pub(crate) struct Summary {
    lines: Vec<String>,
}

impl Summary {
    pub fn line(&mut self, label: &str, value: impl std::fmt::Display) -> &mut Self {
        let line = format!(":{}: {}", label, value);
        self.lines.push(line.trim_end().to_string());
        self
    }

    pub fn raw(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(text.into());
        self
    }

    pub fn finish(&self) -> String {
        self.lines.join("\n")
    }
}

/// Join displayable items with `separator`.
pub(crate) fn join<T: std::fmt::Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}
