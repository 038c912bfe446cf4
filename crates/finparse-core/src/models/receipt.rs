//! Expense receipt prediction.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::fields::{AmountField, DateField, Locale, TaxField, TextField};
use crate::http::ProductSpec;
use crate::input::MimeType;
use crate::parsing::{ensure_object, join, list_of, record, Prediction, Summary};

/// Receipt fields as returned by the API. Totals are not reconstructed.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptV4 {
    pub locale: Locale,
    pub total_amount: AmountField,
    pub total_net: AmountField,
    pub total_tax: AmountField,
    pub tip: AmountField,
    pub date: DateField,
    pub category: TextField,
    pub subcategory: TextField,
    pub document_type: TextField,
    /// Merchant name as seen on the receipt.
    pub supplier: TextField,
    pub time: TextField,
    pub taxes: Vec<TaxField>,
}

impl Prediction for ReceiptV4 {
    fn product(_mime_type: MimeType) -> ProductSpec {
        ProductSpec::new("mindee", "expense_receipts", "4")
    }

    fn from_prediction(prediction: &Value, page_id: Option<u32>) -> Result<Self> {
        ensure_object(prediction, "receipt prediction")?;
        let text = |key: &str| TextField::from_prediction(record(prediction, key), page_id);
        let amount = |key: &str| AmountField::from_prediction(record(prediction, key), page_id);

        Ok(Self {
            locale: Locale::from_prediction(record(prediction, "locale")),
            total_amount: amount("total_amount"),
            total_net: amount("total_net"),
            total_tax: amount("total_tax"),
            tip: amount("tip"),
            date: DateField::from_prediction(record(prediction, "date"), page_id),
            category: text("category"),
            subcategory: text("subcategory"),
            document_type: text("document_type"),
            supplier: text("supplier"),
            time: text("time"),
            taxes: list_of(prediction, "taxes")
                .iter()
                .map(|item| TaxField::from_prediction(item, page_id))
                .collect(),
        })
    }
}

impl std::fmt::Display for ReceiptV4 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut summary = Summary::default();
        summary
            .line("Locale", &self.locale)
            .line("Date", &self.date)
            .line("Category", &self.category)
            .line("Subcategory", &self.subcategory)
            .line("Document type", &self.document_type)
            .line("Time", &self.time)
            .line("Supplier name", &self.supplier)
            .line("Taxes", join(&self.taxes, "\n       "))
            .line("Total net", &self.total_net)
            .line("Total taxes", &self.total_tax)
            .line("Tip", &self.tip)
            .line("Total amount", &self.total_amount);
        f.write_str(&summary.finish())
    }
}
