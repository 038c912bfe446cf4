//! Error types for the finparse-core library.

use thiserror::Error;

/// Main error type for the finparse library.
#[derive(Error, Debug)]
pub enum FinparseError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Input document error.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Prediction parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The API answered with an error envelope.
    #[error("API error ({status}) {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        details: String,
    },

    /// Transport error from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to write the PDF back out.
    #[error("failed to save PDF: {0}")]
    Save(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,
}

/// Errors related to input documents.
#[derive(Error, Debug)]
pub enum InputError {
    /// The file type is not accepted by the API.
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    /// The base64 payload could not be decoded.
    #[error("invalid base64 input: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The input file is empty.
    #[error("input document is empty: {0}")]
    Empty(String),
}

/// Errors related to reading API responses.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Expected a JSON object.
    #[error("expected a JSON object for {0}")]
    NotAnObject(String),

    /// Required key is missing from the response.
    #[error("missing key in response: {0}")]
    MissingKey(String),
}

/// Result type for the finparse library.
pub type Result<T> = std::result::Result<T, FinparseError>;
