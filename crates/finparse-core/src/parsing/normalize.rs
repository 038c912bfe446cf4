//! Repairs for known shape inconsistencies in API predictions.

use serde_json::{json, Map, Value};
use tracing::trace;

/// Keys whose registration list is delivered under a singular name.
const REGISTRATION_KEYS: [(&str, &str); 2] = [
    ("customer_company_registrations", "customer_company_registration"),
    ("supplier_company_registrations", "supplier_company_registration"),
];

/// Scalar fields sometimes delivered with an empty array instead of null.
const ARRAY_PLACEHOLDER_KEYS: [&str; 2] = ["tip", "time"];

/// Return a corrected copy of a financial document prediction.
///
/// - registration lists are read from their singular key, defaulting to `[]`
/// - a missing or null `supplier_payment_details` becomes `[]`
/// - `tip` and `time` records whose value is an array become an explicit
///   absent-value record
///
/// Non-object input is returned unchanged.
pub fn fix_api_inconsistencies(prediction: &Value) -> Value {
    let Some(source) = prediction.as_object() else {
        return prediction.clone();
    };
    let mut fixed: Map<String, Value> = source.clone();

    for (plural, singular) in REGISTRATION_KEYS {
        let list = match source.get(singular) {
            Some(Value::Null) | None => json!([]),
            Some(list) => list.clone(),
        };
        fixed.insert(plural.to_string(), list);
    }

    if matches!(fixed.get("supplier_payment_details"), None | Some(Value::Null)) {
        fixed.insert("supplier_payment_details".to_string(), json!([]));
    }

    for key in ARRAY_PLACEHOLDER_KEYS {
        let placeholder = fixed
            .get(key)
            .and_then(|record| record.get("value"))
            .is_some_and(Value::is_array);
        if placeholder {
            trace!("Replacing array placeholder for '{}'", key);
            fixed.insert(
                key.to_string(),
                json!({ "value": null, "confidence": null, "polygon": [] }),
            );
        }
    }

    Value::Object(fixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_registrations_read_from_singular_key() {
        let raw = json!({
            "supplier_company_registration": [{ "value": "123", "type": "SIRET" }],
            "customer_company_registrations": [{ "value": "ignored" }]
        });
        let fixed = fix_api_inconsistencies(&raw);
        assert_eq!(
            fixed["supplier_company_registrations"],
            json!([{ "value": "123", "type": "SIRET" }])
        );
        // the plural key is always overwritten from the singular one
        assert_eq!(fixed["customer_company_registrations"], json!([]));
    }

    #[test]
    fn test_payment_details_default() {
        let fixed = fix_api_inconsistencies(&json!({ "supplier_payment_details": null }));
        assert_eq!(fixed["supplier_payment_details"], json!([]));

        let fixed = fix_api_inconsistencies(&json!({}));
        assert_eq!(fixed["supplier_payment_details"], json!([]));

        let kept = json!({ "supplier_payment_details": [{ "iban": "X" }] });
        assert_eq!(fix_api_inconsistencies(&kept)["supplier_payment_details"], json!([{ "iban": "X" }]));
    }

    #[test]
    fn test_array_placeholders_become_null_records() {
        let raw = json!({
            "tip": { "value": [], "confidence": [], "polygon": [] },
            "time": { "value": "12:30", "confidence": 0.9, "polygon": [] }
        });
        let fixed = fix_api_inconsistencies(&raw);
        assert_eq!(fixed["tip"], json!({ "value": null, "confidence": null, "polygon": [] }));
        assert_eq!(fixed["time"]["value"], json!("12:30"));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let raw = json!({ "tip": { "value": [] } });
        let _ = fix_api_inconsistencies(&raw);
        assert_eq!(raw, json!({ "tip": { "value": [] } }));
    }

    #[test]
    fn test_non_object_passthrough() {
        assert_eq!(fix_api_inconsistencies(&json!(null)), json!(null));
    }
}
