//! Document products and configuration.

pub mod bank_check;
pub mod config;
pub mod financial_document;
pub mod line_item;
pub mod receipt;

pub use bank_check::BankCheckV1;
pub use config::{ApiConfig, FinparseConfig, PagesConfig, ParseConfig};
pub use financial_document::FinancialDocumentV1;
pub use line_item::InvoiceLineItem;
pub use receipt::ReceiptV4;
