//! Invoice line items.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fields::float_to_string;

/// A single row of the line item table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    /// Product code referring to the item.
    pub product_code: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
    pub total_amount: Option<f64>,
    /// Tax rate as a percentage.
    pub tax_rate: Option<f64>,
    pub tax_amount: Option<f64>,
    pub confidence: Option<f64>,
    pub page_id: Option<u32>,
}

impl InvoiceLineItem {
    pub fn from_prediction(prediction: &Value, page_id: Option<u32>) -> Self {
        let number = |key: &str| prediction.get(key).and_then(Value::as_f64);
        let text = |key: &str| prediction.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            product_code: text("product_code"),
            description: text("description"),
            quantity: number("quantity"),
            unit_price: number("unit_price"),
            total_amount: number("total_amount"),
            tax_rate: number("tax_rate"),
            tax_amount: number("tax_amount"),
            confidence: number("confidence"),
            page_id,
        }
    }
}

impl std::fmt::Display for InvoiceLineItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tax = float_to_string(self.tax_amount, 2);
        if self.tax_rate.is_some() {
            tax.push_str(&format!(" ({}%)", float_to_string(self.tax_rate, 2)));
        }

        let description = self.description.as_deref().unwrap_or("");
        let description = if description.chars().count() > 35 {
            format!("{}...", description.chars().take(33).collect::<String>())
        } else {
            description.to_string()
        };

        write!(
            f,
            "{:<22} {:<8} {:<9} {:<10} {:<18} {}",
            self.product_code.as_deref().unwrap_or(""),
            float_to_string(self.quantity, 2),
            float_to_string(self.unit_price, 2),
            float_to_string(self.total_amount, 2),
            tax,
            description
        )
    }
}
