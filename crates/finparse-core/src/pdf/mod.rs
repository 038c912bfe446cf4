//! PDF page selection and processing.

mod processor;
mod selector;

pub use processor::LopdfProcessor;
pub use selector::{normalize_index, select_pages, PageOperation, PageOptions, PageSelection};

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Delete pages by zero-based index.
    fn delete_pages(&mut self, pages: &BTreeSet<u32>) -> Result<()>;

    /// Serialize the current document.
    fn save(&mut self) -> Result<Vec<u8>>;
}

/// Apply `options` to the PDF in `data`.
///
/// Returns `None` when the document is below `on_min_pages` and was left
/// alone, otherwise the re-serialized document. The delete call is skipped
/// when nothing would be deleted or when every page would be, in which case
/// the document passes through with its pages intact.
pub fn cut_pages<P: PdfProcessor>(
    processor: &mut P,
    data: &[u8],
    options: &PageOptions,
) -> Result<Option<Vec<u8>>> {
    processor.load(data)?;
    let total_pages = processor.page_count();

    let to_delete = match options.select(total_pages) {
        PageSelection::Unchanged => return Ok(None),
        PageSelection::Delete(pages) => pages,
    };

    if to_delete.is_empty() || to_delete.len() == total_pages as usize {
        debug!(
            "Skipping page deletion ({} of {} pages selected)",
            to_delete.len(),
            total_pages
        );
    } else {
        processor.delete_pages(&to_delete)?;
    }

    processor.save().map(Some)
}

/// Apply `options` with the default lopdf processor.
pub fn apply_page_options(data: &[u8], options: &PageOptions) -> Result<Option<Vec<u8>>> {
    cut_pages(&mut LopdfProcessor::new(), data, options)
}

/// Count pages with the default lopdf processor.
pub fn page_count(data: &[u8]) -> Result<u32> {
    let mut processor = LopdfProcessor::new();
    processor.load(data)?;
    Ok(processor.page_count())
}

#[cfg(test)]
pub(crate) mod test_support {
    use lopdf::{dictionary, Document, Object};

    /// Build a minimal PDF with `pages` blank pages, each page's MediaBox
    /// width set to `100 + index` so pages can be told apart after cutting.
    pub fn blank_pdf(pages: u32) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let kids: Vec<Object> = (0..pages)
            .map(|index| {
                let width = 100 + index as i64;
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), width.into(), 842.into()],
                })
                .into()
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();
        data
    }

    /// MediaBox widths of the remaining pages, in page order.
    pub fn page_widths(data: &[u8]) -> Vec<i64> {
        let doc = Document::load_mem(data).unwrap();
        doc.get_pages()
            .values()
            .map(|id| {
                let page = doc.get_object(*id).unwrap().as_dict().unwrap();
                page.get(b"MediaBox").unwrap().as_array().unwrap()[2].as_i64().unwrap()
            })
            .collect()
    }
}
