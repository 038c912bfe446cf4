//! Composite fields shared by several document products.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::base::{float_to_string, read_page_id, AmountField, AsField, Field, FieldValue, TextField};
use crate::geometry::{Polygon, Quadrilateral};

fn opt_string(prediction: &Value, key: &str) -> Option<String> {
    prediction.get(key).and_then(String::from_json)
}

fn opt_f64(prediction: &Value, key: &str) -> Option<f64> {
    prediction.get(key).and_then(Value::as_f64)
}

/// A single tax line: amount with its rate, code and taxable base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxField {
    #[serde(flatten)]
    pub amount: AmountField,
    /// Tax rate as a percentage.
    pub rate: Option<f64>,
    /// Tax code, e.g. "TVA" or "VAT".
    pub code: Option<String>,
    /// Amount the tax applies to.
    pub basis: Option<f64>,
}

impl TaxField {
    pub fn from_prediction(prediction: &Value, page_id: Option<u32>) -> Self {
        Self {
            amount: AmountField::from_prediction(prediction, page_id),
            rate: opt_f64(prediction, "rate"),
            code: opt_string(prediction, "code"),
            basis: opt_f64(prediction, "basis").or_else(|| {
                prediction
                    .get("basis")
                    .and_then(|basis| basis.get("value"))
                    .and_then(Value::as_f64)
            }),
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.amount.amount()
    }
}

impl AsField for TaxField {
    type Value = f64;

    fn field(&self) -> &Field<f64> {
        &self.amount
    }
}

impl std::fmt::Display for TaxField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let line = format!(
            "Base: {}, Code: {}, Rate (%): {}, Amount: {}",
            float_to_string(self.basis, 2),
            self.code.as_deref().unwrap_or(""),
            float_to_string(self.rate, 2),
            self.amount,
        );
        f.write_str(line.trim())
    }
}

/// Company registration number together with its scheme (VAT, SIRET, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRegistration {
    #[serde(flatten)]
    pub number: TextField,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl CompanyRegistration {
    pub fn from_prediction(prediction: &Value, page_id: Option<u32>) -> Self {
        Self {
            number: TextField::from_prediction(prediction, page_id),
            kind: opt_string(prediction, "type"),
        }
    }
}

impl AsField for CompanyRegistration {
    type Value = String;

    fn field(&self) -> &Field<String> {
        &self.number
    }
}

impl std::fmt::Display for CompanyRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number)
    }
}

/// Date in ISO `YYYY-MM-DD` form, kept both raw and parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateField {
    #[serde(flatten)]
    pub raw: TextField,
    pub date: Option<NaiveDate>,
}

impl DateField {
    pub fn from_prediction(prediction: &Value, page_id: Option<u32>) -> Self {
        let raw = TextField::from_prediction(prediction, page_id);
        let date = raw
            .value()
            .and_then(|value| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok());
        Self { raw, date }
    }
}

impl AsField for DateField {
    type Value = String;

    fn field(&self) -> &Field<String> {
        &self.raw
    }
}

impl std::fmt::Display for DateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Bank coordinates of the supplier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub account_number: Option<String>,
    pub iban: Option<String>,
    pub routing_number: Option<String>,
    pub swift: Option<String>,
    pub confidence: Option<f64>,
    pub page_id: Option<u32>,
}

impl PaymentDetails {
    pub fn from_prediction(prediction: &Value, page_id: Option<u32>) -> Self {
        Self {
            account_number: opt_string(prediction, "account_number"),
            iban: opt_string(prediction, "iban"),
            routing_number: opt_string(prediction, "routing_number"),
            swift: opt_string(prediction, "swift"),
            confidence: opt_f64(prediction, "confidence"),
            page_id: page_id.or_else(|| read_page_id(prediction)),
        }
    }
}

impl std::fmt::Display for PaymentDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();
        for part in [&self.account_number, &self.iban, &self.routing_number, &self.swift] {
            out.push_str(part.as_deref().unwrap_or(""));
            out.push_str("; ");
        }
        f.write_str(out.trim())
    }
}

/// Location of an object on the page, with no value attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionField {
    pub polygon: Polygon,
    pub bounding_box: Option<Quadrilateral>,
    pub quadrangle: Option<Quadrilateral>,
    pub rectangle: Option<Quadrilateral>,
    pub page_id: Option<u32>,
}

impl PositionField {
    pub fn from_prediction(prediction: &Value, page_id: Option<u32>) -> Self {
        let polygon = Polygon::from_prediction(prediction.get("polygon"));
        Self {
            bounding_box: Quadrilateral::from_prediction(prediction.get("bounding_box"))
                .or_else(|| polygon.bounding_box()),
            quadrangle: Quadrilateral::from_prediction(prediction.get("quadrangle")),
            rectangle: Quadrilateral::from_prediction(prediction.get("rectangle")),
            polygon,
            page_id: page_id.or_else(|| read_page_id(prediction)),
        }
    }
}

impl std::fmt::Display for PositionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.polygon.is_empty() {
            return Ok(());
        }
        write!(f, "{}", self.polygon)
    }
}

/// Language, country and currency detected on the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Locale {
    pub value: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub confidence: Option<f64>,
}

impl Locale {
    pub fn from_prediction(prediction: &Value) -> Self {
        Self {
            value: opt_string(prediction, "value"),
            language: opt_string(prediction, "language"),
            country: opt_string(prediction, "country"),
            currency: opt_string(prediction, "currency"),
            confidence: opt_f64(prediction, "confidence"),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();
        for part in [&self.value, &self.language, &self.country, &self.currency] {
            if let Some(part) = part {
                out.push_str(part);
                out.push_str("; ");
            }
        }
        f.write_str(out.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{array_confidence, array_sum};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_tax_field() {
        let tax = TaxField::from_prediction(
            &json!({ "value": 20.0, "rate": 20.0, "code": "TVA", "basis": 100.0, "confidence": 0.9 }),
            None,
        );
        assert_eq!(tax.value(), Some(20.0));
        assert_eq!(tax.to_string(), "Base: 100.00, Code: TVA, Rate (%): 20.00, Amount: 20.00");
    }

    #[test]
    fn test_tax_field_missing_parts() {
        let tax = TaxField::from_prediction(&json!({ "value": 3.5 }), None);
        assert_eq!(tax.to_string(), "Base: , Code: , Rate (%): , Amount: 3.50");
    }

    #[test]
    fn test_aggregates_over_taxes() {
        let taxes = vec![
            TaxField::from_prediction(&json!({ "value": 5.0, "confidence": 0.5 }), None),
            TaxField::from_prediction(&json!({ "value": 2.5, "confidence": 0.5 }), None),
        ];
        assert_eq!(array_sum(&taxes), 7.5);
        assert_eq!(array_confidence(&taxes), 0.25);
    }

    #[test]
    fn test_company_registration() {
        let reg = CompanyRegistration::from_prediction(
            &json!({ "value": "FR12345678901", "type": "VAT NUMBER", "confidence": 0.8 }),
            Some(0),
        );
        assert_eq!(reg.kind.as_deref(), Some("VAT NUMBER"));
        assert_eq!(reg.to_string(), "FR12345678901");
        assert_eq!(reg.number.page_id(), Some(0));
    }

    #[test]
    fn test_date_field() {
        let date = DateField::from_prediction(&json!({ "value": "2023-02-28", "confidence": 0.99 }), None);
        assert_eq!(date.date, NaiveDate::from_ymd_opt(2023, 2, 28));
        assert_eq!(date.to_string(), "2023-02-28");

        let bad = DateField::from_prediction(&json!({ "value": "28/02/2023" }), None);
        assert_eq!(bad.date, None);
        assert_eq!(bad.to_string(), "28/02/2023");
    }

    #[test]
    fn test_payment_details_display() {
        let details = PaymentDetails::from_prediction(
            &json!({ "iban": "FR7630006000011234567890189", "swift": "AGRIFRPP" }),
            None,
        );
        assert_eq!(details.to_string(), "; FR7630006000011234567890189; ; AGRIFRPP;");
    }

    #[test]
    fn test_position_field_box_from_polygon() {
        let position = PositionField::from_prediction(
            &json!({ "polygon": [[0.1, 0.2], [0.5, 0.2], [0.5, 0.4], [0.1, 0.4]] }),
            Some(1),
        );
        assert!(position.bounding_box.is_some());
        assert!(position.quadrangle.is_none());
        assert_eq!(position.page_id, Some(1));
    }

    #[test]
    fn test_locale_display() {
        let locale = Locale::from_prediction(&json!({ "value": "fr", "language": "fr", "currency": "EUR" }));
        assert_eq!(locale.to_string(), "fr; fr; EUR;");
    }
}
