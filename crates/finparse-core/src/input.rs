//! Input documents: loading, file type detection and page cutting.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{InputError, Result};
use crate::pdf::{self, PageOptions};

/// File types accepted by the extraction API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MimeType {
    Pdf,
    Jpeg,
    Png,
    Tiff,
    Webp,
    Heic,
}

impl MimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::Pdf => "application/pdf",
            MimeType::Jpeg => "image/jpeg",
            MimeType::Png => "image/png",
            MimeType::Tiff => "image/tiff",
            MimeType::Webp => "image/webp",
            MimeType::Heic => "image/heic",
        }
    }

    /// Detect the type from the leading magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"%PDF") {
            Some(MimeType::Pdf)
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(MimeType::Jpeg)
        } else if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(MimeType::Png)
        } else if data.starts_with(b"II*\0") || data.starts_with(b"MM\0*") {
            Some(MimeType::Tiff)
        } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Some(MimeType::Webp)
        } else if data.len() >= 12
            && &data[4..8] == b"ftyp"
            && matches!(&data[8..12], b"heic" | b"heix" | b"heim" | b"heis" | b"mif1" | b"msf1")
        {
            Some(MimeType::Heic)
        } else {
            None
        }
    }

    /// Guess the type from a file name extension.
    pub fn from_extension(filename: &str) -> Option<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())?
            .to_lowercase();
        match extension.as_str() {
            "pdf" => Some(MimeType::Pdf),
            "jpg" | "jpeg" | "jpga" => Some(MimeType::Jpeg),
            "png" => Some(MimeType::Png),
            "tif" | "tiff" => Some(MimeType::Tiff),
            "webp" => Some(MimeType::Webp),
            "heic" => Some(MimeType::Heic),
            _ => None,
        }
    }
}

/// A document ready to be sent to the API.
#[derive(Debug, Clone)]
pub struct InputSource {
    filename: String,
    data: Vec<u8>,
    mime_type: MimeType,
}

impl InputSource {
    /// Read a document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes(data, filename)
    }

    /// Wrap raw bytes. The type is sniffed from the content first and from
    /// the file name second.
    pub fn from_bytes(data: Vec<u8>, filename: impl Into<String>) -> Result<Self> {
        let filename = filename.into();
        if data.is_empty() {
            return Err(InputError::Empty(filename).into());
        }
        let mime_type = MimeType::sniff(&data)
            .or_else(|| MimeType::from_extension(&filename))
            .ok_or_else(|| InputError::UnsupportedType(filename.clone()))?;
        debug!("Input '{}' detected as {}", filename, mime_type.as_str());
        Ok(Self {
            filename,
            data,
            mime_type,
        })
    }

    /// Decode a base64 payload. Whitespace and line breaks are ignored.
    pub fn from_base64(encoded: &str, filename: impl Into<String>) -> Result<Self> {
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let data = STANDARD.decode(compact).map_err(InputError::from)?;
        Self::from_bytes(data, filename)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> MimeType {
        self.mime_type
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == MimeType::Pdf
    }

    /// Number of pages, 1 for images.
    pub fn page_count(&self) -> Result<u32> {
        if !self.is_pdf() {
            return Ok(1);
        }
        Ok(pdf::page_count(&self.data)?)
    }

    /// Cut pages out of a PDF input. Returns true when the document was
    /// rewritten; images and documents below `on_min_pages` are untouched.
    pub fn apply_page_options(&mut self, options: &PageOptions) -> Result<bool> {
        if !self.is_pdf() {
            return Ok(false);
        }
        match pdf::apply_page_options(&self.data, options)? {
            Some(data) => {
                info!(
                    "Applied {} {:?} to '{}'",
                    options.operation, options.page_indices, self.filename
                );
                self.data = data;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Consume the source, returning the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
