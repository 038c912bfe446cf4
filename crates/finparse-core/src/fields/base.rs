//! Base field record and the aggregate helpers used by total reconstruction.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geometry::{Polygon, Quadrilateral};

/// Scalar types a field value can be read as.
pub trait FieldValue: Sized {
    /// Convert the raw `value` of a prediction record, `None` when absent or
    /// of the wrong shape.
    fn from_json(value: &Value) -> Option<Self>;
}

impl FieldValue for f64 {
    fn from_json(value: &Value) -> Option<Self> {
        let raw = match value {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse().ok()?,
            _ => return None,
        };
        // amounts are carried at three decimals at most
        Some((raw * 1000.0).round() / 1000.0)
    }
}

impl FieldValue for String {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl FieldValue for bool {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

/// A typed, confidence-scored, located value extracted by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field<T> {
    value: Option<T>,
    confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Polygon::is_empty")]
    polygon: Polygon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bounding_box: Option<Quadrilateral>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    page_id: Option<u32>,
    #[serde(default)]
    reconstructed: bool,
}

/// Numeric amount, rounded to three decimals on read.
pub type AmountField = Field<f64>;

/// Free text value.
pub type TextField = Field<String>;

/// Yes/no value.
pub type BooleanField = Field<bool>;

impl<T: FieldValue> Field<T> {
    /// Build a field from a `{value, confidence, polygon, page_id}` record.
    ///
    /// An explicit `page_id` wins over the one carried by the record. A null
    /// or missing record gives a field with every attribute absent.
    pub fn from_prediction(prediction: &Value, page_id: Option<u32>) -> Self {
        let polygon = Polygon::from_prediction(prediction.get("polygon"));
        let bounding_box = polygon.bounding_box();
        Self {
            value: prediction.get("value").and_then(T::from_json),
            confidence: prediction.get("confidence").and_then(Value::as_f64),
            polygon,
            bounding_box,
            page_id: page_id.or_else(|| read_page_id(prediction)),
            reconstructed: false,
        }
    }
}

impl<T> Field<T> {
    /// A field computed from other fields rather than read from the response.
    pub fn reconstructed(value: Option<T>, confidence: Option<f64>, page_id: Option<u32>) -> Self {
        Self {
            value,
            confidence,
            polygon: Polygon::default(),
            bounding_box: None,
            page_id,
            reconstructed: true,
        }
    }

    /// A field with nothing extracted.
    pub fn empty(page_id: Option<u32>) -> Self {
        Self {
            value: None,
            confidence: None,
            polygon: Polygon::default(),
            bounding_box: None,
            page_id,
            reconstructed: false,
        }
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    /// Overwrite the confidence score.
    pub fn set_confidence(&mut self, confidence: Option<f64>) {
        self.confidence = confidence;
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn bounding_box(&self) -> Option<&Quadrilateral> {
        self.bounding_box.as_ref()
    }

    pub fn page_id(&self) -> Option<u32> {
        self.page_id
    }

    /// True when the value was computed from other fields.
    pub fn is_reconstructed(&self) -> bool {
        self.reconstructed
    }
}

impl Field<f64> {
    /// Numeric value, if present.
    pub fn amount(&self) -> Option<f64> {
        self.value
    }
}

impl std::fmt::Display for Field<f64> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&float_to_string(self.value, 2))
    }
}

impl std::fmt::Display for Field<String> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.value.as_deref().unwrap_or(""))
    }
}

impl std::fmt::Display for Field<bool> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value {
            Some(value) => write!(f, "{}", value),
            None => Ok(()),
        }
    }
}

/// Access to the underlying [`Field`] of a composite field record.
pub trait AsField {
    type Value;

    fn field(&self) -> &Field<Self::Value>;
}

impl<T> AsField for Field<T> {
    type Value = T;

    fn field(&self) -> &Field<T> {
        self
    }
}

pub(crate) fn read_page_id(prediction: &Value) -> Option<u32> {
    prediction
        .get("page_id")
        .and_then(Value::as_u64)
        .and_then(|id| u32::try_from(id).ok())
}

/// Product of all confidences.
///
/// Returns 0.0 as soon as a member has no value or no confidence, 1.0 for an
/// empty slice.
pub fn array_confidence<F: AsField>(fields: &[F]) -> f64 {
    let mut product = 1.0;
    for field in fields {
        let field = field.field();
        match (field.has_value(), field.confidence) {
            (true, Some(confidence)) => product *= confidence,
            _ => return 0.0,
        }
    }
    product
}

/// Sum of all values.
///
/// Returns 0.0 as soon as a member has no value, 0.0 for an empty slice.
pub fn array_sum<F: AsField<Value = f64>>(fields: &[F]) -> f64 {
    let mut sum = 0.0;
    for field in fields {
        match field.field().value {
            Some(value) => sum += value,
            None => return 0.0,
        }
    }
    sum
}

/// Format a float keeping every decimal the value already carries, with at
/// least `min_precision` digits after the point. Empty string for `None`.
pub fn float_to_string(value: Option<f64>, min_precision: usize) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let repr = value.to_string();
    let present = repr.split_once('.').map(|(_, decimals)| decimals.len()).unwrap_or(0);
    let precision = present.max(min_precision);
    format!("{:.*}", precision, value)
}
