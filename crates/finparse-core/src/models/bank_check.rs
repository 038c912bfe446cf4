//! US bank check prediction.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::fields::{AmountField, DateField, PositionField, TextField};
use crate::http::ProductSpec;
use crate::input::MimeType;
use crate::parsing::{ensure_object, list_of, record, Prediction, Summary};

#[derive(Debug, Clone, Serialize)]
pub struct BankCheckV1 {
    /// Payer's bank account number.
    pub account_number: TextField,
    pub amount: AmountField,
    pub check_number: TextField,
    pub routing_number: TextField,
    /// Date the check was issued.
    pub date: DateField,
    /// Where the check sits on the image.
    pub check_position: PositionField,
    pub signatures_positions: Vec<PositionField>,
    pub payees: Vec<TextField>,
}

impl Prediction for BankCheckV1 {
    fn product(_mime_type: MimeType) -> ProductSpec {
        ProductSpec::new("mindee", "bank_check", "1")
    }

    fn from_prediction(prediction: &Value, page_id: Option<u32>) -> Result<Self> {
        ensure_object(prediction, "bank check prediction")?;
        let text = |key: &str| TextField::from_prediction(record(prediction, key), page_id);

        Ok(Self {
            account_number: text("account_number"),
            amount: AmountField::from_prediction(record(prediction, "amount"), page_id),
            check_number: text("check_number"),
            routing_number: text("routing_number"),
            date: DateField::from_prediction(record(prediction, "date"), page_id),
            check_position: PositionField::from_prediction(record(prediction, "check_position"), page_id),
            signatures_positions: list_of(prediction, "signatures_positions")
                .iter()
                .map(|item| PositionField::from_prediction(item, page_id))
                .collect(),
            payees: list_of(prediction, "payees")
                .iter()
                .map(|item| TextField::from_prediction(item, page_id))
                .collect(),
        })
    }
}

impl std::fmt::Display for BankCheckV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let payees: Vec<&str> = self
            .payees
            .iter()
            .filter_map(|payee| payee.value().map(String::as_str))
            .collect();

        let mut summary = Summary::default();
        summary
            .line("Routing number", &self.routing_number)
            .line("Account number", &self.account_number)
            .line("Check number", &self.check_number)
            .line("Date", &self.date)
            .line("Amount", &self.amount)
            .line("Payees", payees.join(", "));
        f.write_str(&summary.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn prediction() -> Value {
        json!({
            "account_number": { "value": "12345678910", "confidence": 0.99 },
            "amount": { "value": 6496.58, "confidence": 0.99 },
            "check_number": { "value": "0003401", "confidence": 0.98 },
            "routing_number": { "value": "012345678", "confidence": 0.99 },
            "date": { "value": "2022-04-26", "confidence": 0.99 },
            "check_position": {
                "polygon": [[0.05, 0.1], [0.95, 0.1], [0.95, 0.45], [0.05, 0.45]]
            },
            "signatures_positions": [
                { "polygon": [[0.6, 0.35], [0.8, 0.35], [0.8, 0.42], [0.6, 0.42]] }
            ],
            "payees": [
                { "value": "JOHN DOE", "confidence": 0.9 },
                { "value": "JANE DOE", "confidence": 0.8 }
            ]
        })
    }

    #[test]
    fn test_from_prediction() {
        let check = BankCheckV1::from_prediction(&prediction(), Some(0)).unwrap();
        assert_eq!(check.amount.amount(), Some(6496.58));
        assert_eq!(check.signatures_positions.len(), 1);
        assert!(check.check_position.bounding_box.is_some());
        assert_eq!(check.check_position.page_id, Some(0));
    }

    #[test]
    fn test_render() {
        let check = BankCheckV1::from_prediction(&prediction(), None).unwrap();
        let expected = [
            ":Routing number: 012345678",
            ":Account number: 12345678910",
            ":Check number: 0003401",
            ":Date: 2022-04-26",
            ":Amount: 6496.58",
            ":Payees: JOHN DOE, JANE DOE",
        ]
        .join("\n");
        assert_eq!(check.to_string(), expected);
    }

    #[test]
    fn test_missing_lists_are_empty() {
        let check = BankCheckV1::from_prediction(&json!({}), None).unwrap();
        assert!(check.payees.is_empty());
        assert!(check.signatures_positions.is_empty());
        assert_eq!(check.to_string().lines().count(), 6);
    }
}
