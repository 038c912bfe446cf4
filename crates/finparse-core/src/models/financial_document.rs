//! Financial document (invoice or receipt) prediction.

use serde::Serialize;
use serde_json::Value;

use super::line_item::InvoiceLineItem;
use crate::error::Result;
use crate::fields::{
    AmountField, CompanyRegistration, DateField, Locale, PaymentDetails, TaxField, TextField,
};
use crate::http::ProductSpec;
use crate::input::MimeType;
use crate::parsing::{
    ensure_object, fix_api_inconsistencies, join, list_of, record, PageScope, Prediction, Summary,
    Totals,
};

const INVOICE_PRODUCT: ProductSpec = ProductSpec::new("mindee", "invoices", "4");
const RECEIPT_PRODUCT: ProductSpec = ProductSpec::new("mindee", "expense_receipts", "4");

/// Invoice or receipt, with totals reconstructed from the tax lines.
#[derive(Debug, Clone, Serialize)]
pub struct FinancialDocumentV1 {
    pub locale: Locale,
    /// One of "INVOICE", "CREDIT NOTE", "EXPENSE RECEIPT", "CREDIT CARD RECEIPT".
    pub document_type: TextField,
    pub category: TextField,
    pub subcategory: TextField,
    pub date: DateField,
    pub due_date: DateField,
    /// Time as seen on the receipt, HH:MM.
    pub time: TextField,
    pub invoice_number: TextField,
    pub reference_numbers: Vec<TextField>,
    pub supplier_name: TextField,
    pub supplier_address: TextField,
    pub supplier_company_registrations: Vec<CompanyRegistration>,
    pub supplier_payment_details: Vec<PaymentDetails>,
    pub customer_name: TextField,
    pub customer_address: TextField,
    pub customer_company_registrations: Vec<CompanyRegistration>,
    pub tip: AmountField,
    pub taxes: Vec<TaxField>,
    #[serde(flatten)]
    pub totals: Totals,
    pub line_items: Vec<InvoiceLineItem>,
}

impl Prediction for FinancialDocumentV1 {
    /// PDFs go to the invoice product, images to the receipt product.
    fn product(mime_type: MimeType) -> ProductSpec {
        match mime_type {
            MimeType::Pdf => INVOICE_PRODUCT,
            _ => RECEIPT_PRODUCT,
        }
    }

    fn from_prediction(prediction: &Value, page_id: Option<u32>) -> Result<Self> {
        ensure_object(prediction, "financial document prediction")?;
        let prediction = fix_api_inconsistencies(prediction);
        let p = &prediction;

        let text = |key: &str| TextField::from_prediction(record(p, key), page_id);
        let date = |key: &str| DateField::from_prediction(record(p, key), page_id);
        let amount = |key: &str| AmountField::from_prediction(record(p, key), page_id);
        let registrations = |key: &str| {
            list_of(p, key)
                .iter()
                .map(|item| CompanyRegistration::from_prediction(item, page_id))
                .collect::<Vec<_>>()
        };

        let taxes: Vec<TaxField> = list_of(p, "taxes")
            .iter()
            .map(|item| TaxField::from_prediction(item, page_id))
            .collect();
        let mut totals = Totals {
            total_amount: amount("total_amount"),
            total_net: amount("total_net"),
            total_tax: amount("total_tax"),
        };
        totals.reconstruct(&taxes, PageScope::from_page_id(page_id));

        Ok(Self {
            locale: Locale::from_prediction(record(p, "locale")),
            document_type: text("document_type"),
            category: text("category"),
            subcategory: text("subcategory"),
            date: date("date"),
            due_date: date("due_date"),
            time: text("time"),
            invoice_number: text("invoice_number"),
            reference_numbers: list_of(p, "reference_numbers")
                .iter()
                .map(|item| TextField::from_prediction(item, page_id))
                .collect(),
            supplier_name: text("supplier_name"),
            supplier_address: text("supplier_address"),
            supplier_company_registrations: registrations("supplier_company_registrations"),
            supplier_payment_details: list_of(p, "supplier_payment_details")
                .iter()
                .map(|item| PaymentDetails::from_prediction(item, page_id))
                .collect(),
            customer_name: text("customer_name"),
            customer_address: text("customer_address"),
            customer_company_registrations: registrations("customer_company_registrations"),
            tip: amount("tip"),
            taxes,
            totals,
            line_items: list_of(p, "line_items")
                .iter()
                .map(|item| InvoiceLineItem::from_prediction(item, page_id))
                .collect(),
        })
    }
}

impl FinancialDocumentV1 {
    fn line_items_table(&self, summary: &mut Summary) {
        summary.raw("").raw(":Line Items:");
        if self.line_items.is_empty() {
            return;
        }
        let separator = format!(
            "{} {} {} {} {} {}",
            "=".repeat(22),
            "=".repeat(8),
            "=".repeat(9),
            "=".repeat(10),
            "=".repeat(18),
            "=".repeat(36)
        );
        summary
            .raw(separator.clone())
            .raw("Code                   QTY      Price     Amount     Tax (Rate)         Description")
            .raw(separator.clone());
        for item in &self.line_items {
            summary.raw(item.to_string());
        }
        summary.raw(separator);
    }
}

impl std::fmt::Display for FinancialDocumentV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let customer_registrations: Vec<String> = self
            .customer_company_registrations
            .iter()
            .filter_map(|reg| reg.number.value().cloned())
            .collect();

        let mut summary = Summary::default();
        summary
            .line("Document type", &self.document_type)
            .line("Category", &self.category)
            .line("Subcategory", &self.subcategory)
            .line("Locale", &self.locale)
            .line("Date", &self.date)
            .line("Due date", &self.due_date)
            .line("Time", &self.time)
            .line("Number", &self.invoice_number)
            .line("Reference numbers", join(&self.reference_numbers, ", "))
            .line("Supplier name", &self.supplier_name)
            .line("Supplier address", &self.supplier_address)
            .line(
                "Supplier company registrations",
                join(&self.supplier_company_registrations, "; "),
            )
            .line(
                "Supplier payment details",
                join(&self.supplier_payment_details, "\n                 "),
            )
            .line("Customer name", &self.customer_name)
            .line("Customer address", &self.customer_address)
            .line("Customer company registrations", customer_registrations.join("; "))
            .line("Tip", &self.tip)
            .line("Taxes", join(&self.taxes, "\n       "))
            .line("Total taxes", &self.totals.total_tax)
            .line("Total net", &self.totals.total_net)
            .line("Total amount", &self.totals.total_amount);
        self.line_items_table(&mut summary);

        f.write_str(&summary.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::Document;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn prediction() -> Value {
        json!({
            "locale": { "value": "en", "language": "en", "currency": "EUR", "confidence": 0.9 },
            "document_type": { "value": "INVOICE", "confidence": 1.0 },
            "category": { "value": null, "confidence": 0.0 },
            "subcategory": { "value": null, "confidence": 0.0 },
            "date": { "value": "2023-03-01", "confidence": 0.99, "page_id": 0 },
            "due_date": { "value": null, "confidence": 0.0 },
            "time": { "value": [], "confidence": [], "polygon": [] },
            "invoice_number": { "value": "INV-001", "confidence": 0.98 },
            "reference_numbers": [{ "value": "PO-7", "confidence": 0.7 }],
            "supplier_name": { "value": "ACME CORP", "confidence": 0.95 },
            "supplier_address": { "value": "1 Main St", "confidence": 0.9 },
            "supplier_company_registration": [
                { "value": "FR123", "type": "VAT NUMBER", "confidence": 0.8 }
            ],
            "customer_name": { "value": "JOHN DOE", "confidence": 0.9 },
            "customer_address": { "value": null, "confidence": 0.0 },
            "customer_company_registration": null,
            "tip": { "value": [], "confidence": [], "polygon": [] },
            "taxes": [{ "value": 5.0, "rate": 5.0, "code": "VAT", "confidence": 0.9 }],
            "total_amount": { "value": null, "confidence": 0.0 },
            "total_net": { "value": 95.0, "confidence": 0.8 },
            "line_items": [{
                "product_code": "A1",
                "description": "Widget",
                "quantity": 1.0,
                "unit_price": 95.0,
                "total_amount": 95.0,
                "tax_rate": 5.0,
                "tax_amount": 5.0
            }]
        })
    }

    #[test]
    fn test_document_scope_reconstruction() {
        let doc = FinancialDocumentV1::from_prediction(&prediction(), None).unwrap();

        assert_eq!(doc.totals.total_amount.amount(), Some(100.0));
        assert!(doc.totals.total_amount.is_reconstructed());
        assert!((doc.totals.total_amount.confidence().unwrap() - 0.72).abs() < 1e-9);
        assert_eq!(doc.totals.total_tax.amount(), Some(5.0));
        assert!(doc.totals.total_tax.is_reconstructed());
    }

    #[test]
    fn test_page_scope_keeps_missing_total_amount() {
        let doc = FinancialDocumentV1::from_prediction(&prediction(), Some(0)).unwrap();

        assert!(!doc.totals.total_amount.has_value());
        assert_eq!(doc.totals.total_tax.amount(), Some(5.0));
        assert_eq!(doc.totals.total_tax.page_id(), Some(0));
    }

    #[test]
    fn test_api_quirks_repaired() {
        let doc = FinancialDocumentV1::from_prediction(&prediction(), None).unwrap();

        assert!(!doc.tip.has_value());
        assert!(!doc.time.has_value());
        assert_eq!(doc.supplier_company_registrations.len(), 1);
        assert_eq!(doc.supplier_company_registrations[0].kind.as_deref(), Some("VAT NUMBER"));
        assert!(doc.customer_company_registrations.is_empty());
        assert!(doc.supplier_payment_details.is_empty());
    }

    #[test]
    fn test_non_object_prediction_rejected() {
        assert!(FinancialDocumentV1::from_prediction(&json!([]), None).is_err());
    }

    #[test]
    fn test_product_by_input_type() {
        assert_eq!(FinancialDocumentV1::product(MimeType::Pdf).url_name, "invoices");
        assert_eq!(FinancialDocumentV1::product(MimeType::Jpeg).url_name, "expense_receipts");
    }

    #[test]
    fn test_render() {
        let doc = FinancialDocumentV1::from_prediction(&prediction(), None).unwrap();
        let separator = "====================== ======== ========= ========== ================== ====================================";
        let expected = [
            ":Document type: INVOICE",
            ":Category:",
            ":Subcategory:",
            ":Locale: en; en; EUR;",
            ":Date: 2023-03-01",
            ":Due date:",
            ":Time:",
            ":Number: INV-001",
            ":Reference numbers: PO-7",
            ":Supplier name: ACME CORP",
            ":Supplier address: 1 Main St",
            ":Supplier company registrations: FR123",
            ":Supplier payment details:",
            ":Customer name: JOHN DOE",
            ":Customer address:",
            ":Customer company registrations:",
            ":Tip:",
            ":Taxes: Base: , Code: VAT, Rate (%): 5.00, Amount: 5.00",
            ":Total taxes: 5.00",
            ":Total net: 95.00",
            ":Total amount: 100.00",
            "",
            ":Line Items:",
            separator,
            "Code                   QTY      Price     Amount     Tax (Rate)         Description",
            separator,
            "A1                     1.00     95.00     95.00      5.00 (5.00%)       Widget",
            separator,
        ]
        .join("\n");
        assert_eq!(doc.to_string(), expected);
    }

    #[test]
    fn test_document_envelope() {
        let response = json!({
            "api_request": { "status": "success", "status_code": 201 },
            "document": {
                "id": "abc-123",
                "name": "invoice.pdf",
                "n_pages": 1,
                "inference": {
                    "product": { "name": "mindee/invoices", "version": "4.1" },
                    "prediction": prediction(),
                    "pages": [{ "id": 0, "prediction": prediction() }]
                }
            }
        });

        let document: Document<FinancialDocumentV1> = Document::from_response(&response).unwrap();

        assert_eq!(document.id, "abc-123");
        assert_eq!(document.filename, "invoice.pdf");
        assert_eq!(document.n_pages, 1);
        assert_eq!(document.inference.product.version, "4.1");
        assert!(document.inference.prediction.totals.total_amount.has_value());
        assert_eq!(document.inference.pages.len(), 1);
        assert_eq!(document.inference.pages[0].id, 0);
        assert!(!document.inference.pages[0].prediction.totals.total_amount.has_value());

        let rendered = document.to_string();
        assert!(rendered.contains(":Document ID: abc-123"));
        assert!(rendered.contains(":Product: mindee/invoices v4.1"));
        assert!(rendered.contains("Page 0\n------\n:Document type: INVOICE"));
    }

    #[test]
    fn test_envelope_missing_document() {
        let result = Document::<FinancialDocumentV1>::from_response(&json!({ "api_request": {} }));
        assert!(result.is_err());
    }
}
