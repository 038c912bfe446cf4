//! Core library for the financial document extraction API client.
//!
//! This crate provides:
//! - Typed prediction fields with confidence and geometry
//! - Reconstruction of missing document totals from tax lines
//! - PDF page selection before upload
//! - Document products (financial documents, receipts, bank checks)
//! - An async client for the prediction API

pub mod client;
pub mod error;
pub mod fields;
pub mod geometry;
pub mod http;
pub mod input;
pub mod models;
pub mod parsing;
pub mod pdf;

pub use client::{Client, ParseOptions};
pub use error::{FinparseError, Result};
pub use fields::{AmountField, BooleanField, Field, TaxField, TextField};
pub use input::{InputSource, MimeType};
pub use models::{BankCheckV1, FinancialDocumentV1, FinparseConfig, ReceiptV4};
pub use parsing::{Document, PageScope, Prediction, Totals};
pub use pdf::{LopdfProcessor, PageOperation, PageOptions, PdfProcessor};
