//! PDF page removal and re-serialization using lopdf.

use std::collections::BTreeSet;

use lopdf::Document;
use tracing::{debug, trace};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF processor backed by an in-memory lopdf document.
pub struct LopdfProcessor {
    document: Option<Document>,
}

impl LopdfProcessor {
    /// Create a new processor with no document loaded.
    pub fn new() -> Self {
        Self { document: None }
    }

    fn document_mut(&mut self) -> Result<&mut Document> {
        self.document
            .as_mut()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }
}

impl Default for LopdfProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for LopdfProcessor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        debug!("Loaded PDF with {} pages", doc.get_pages().len());
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn delete_pages(&mut self, pages: &BTreeSet<u32>) -> Result<()> {
        let doc = self.document_mut()?;
        // lopdf numbers pages from 1
        let page_numbers: Vec<u32> = pages.iter().map(|page| page + 1).collect();
        trace!("Deleting page numbers {:?}", page_numbers);
        doc.delete_pages(&page_numbers);
        doc.prune_objects();
        Ok(())
    }

    fn save(&mut self) -> Result<Vec<u8>> {
        let doc = self.document_mut()?;
        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|e| PdfError::Save(e.to_string()))?;
        debug!("Serialized PDF: {} bytes", output.len());
        Ok(output)
    }
}
