//! Typed fields built from API prediction records.

mod base;
mod common;

pub use base::{
    array_confidence, array_sum, float_to_string, AmountField, AsField, BooleanField, Field,
    FieldValue, TextField,
};
pub use common::{CompanyRegistration, DateField, Locale, PaymentDetails, PositionField, TaxField};
