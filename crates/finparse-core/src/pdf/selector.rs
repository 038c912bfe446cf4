//! Resolution of requested page indices into the set of pages to delete.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FinparseError;

/// What to do with the requested pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageOperation {
    /// Keep only the requested pages.
    #[default]
    KeepOnly,
    /// Remove the requested pages.
    Remove,
}

impl FromStr for PageOperation {
    type Err = FinparseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "KEEP_ONLY" => Ok(PageOperation::KeepOnly),
            "REMOVE" => Ok(PageOperation::Remove),
            _ => Err(FinparseError::Config(format!(
                "operation must be one of KEEP_ONLY or REMOVE, sent '{}'",
                s
            ))),
        }
    }
}

impl std::fmt::Display for PageOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageOperation::KeepOnly => f.write_str("KEEP_ONLY"),
            PageOperation::Remove => f.write_str("REMOVE"),
        }
    }
}

/// Page cutting request applied to multi-page PDFs before upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageOptions {
    /// Zero-based indices, negative values count from the end.
    pub page_indices: Vec<i64>,

    /// Whether the indices are kept or removed.
    pub operation: PageOperation,

    /// Documents with fewer pages than this are left untouched.
    pub on_min_pages: u32,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            page_indices: vec![0],
            operation: PageOperation::KeepOnly,
            on_min_pages: 0,
        }
    }
}

impl PageOptions {
    pub fn new(page_indices: Vec<i64>, operation: PageOperation) -> Self {
        Self {
            page_indices,
            operation,
            ..Self::default()
        }
    }

    pub fn with_min_pages(mut self, on_min_pages: u32) -> Self {
        self.on_min_pages = on_min_pages;
        self
    }

    /// Compute the pages to delete from a document of `total_pages` pages.
    pub fn select(&self, total_pages: u32) -> PageSelection {
        select_pages(&self.page_indices, self.operation, total_pages, self.on_min_pages)
    }
}

/// Outcome of page selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSelection {
    /// The document is below the minimum page count, nothing is done.
    Unchanged,
    /// Zero-based indices of the pages to delete.
    Delete(BTreeSet<u32>),
}

/// Map a requested index onto `0..total_pages`.
///
/// Negative indices are remapped as `total_pages - (index + 2)`. This is not
/// Python-style indexing: `-1` is the last page but `-2` and below land past
/// the end and are dropped. Existing callers depend on this mapping.
pub fn normalize_index(index: i64, total_pages: u32) -> Option<u32> {
    let len = i64::from(total_pages);
    let index = if index < 0 {
        len.checked_sub(index + 2)?
    } else {
        index
    };
    if (0..len).contains(&index) {
        u32::try_from(index).ok()
    } else {
        None
    }
}

/// Compute the deletion set for `operation` over a document of
/// `total_pages` pages. Out-of-range indices are ignored.
pub fn select_pages(
    page_indices: &[i64],
    operation: PageOperation,
    total_pages: u32,
    on_min_pages: u32,
) -> PageSelection {
    if total_pages < on_min_pages {
        debug!(
            "Document has {} pages, below minimum of {}: leaving it unchanged",
            total_pages, on_min_pages
        );
        return PageSelection::Unchanged;
    }

    let requested: BTreeSet<u32> = page_indices
        .iter()
        .filter_map(|&index| normalize_index(index, total_pages))
        .collect();

    let to_delete: BTreeSet<u32> = match operation {
        PageOperation::KeepOnly => (0..total_pages).filter(|page| !requested.contains(page)).collect(),
        PageOperation::Remove => requested,
    };

    debug!(
        "{} {:?} over {} pages -> deleting {:?}",
        operation, page_indices, total_pages, to_delete
    );
    PageSelection::Delete(to_delete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(pages: &[u32]) -> BTreeSet<u32> {
        pages.iter().copied().collect()
    }

    #[test]
    fn test_negative_index_remap() {
        assert_eq!(normalize_index(-1, 5), Some(4));
        assert_eq!(normalize_index(-2, 5), None);
        assert_eq!(normalize_index(-3, 5), None);
        assert_eq!(normalize_index(-1, 3), Some(2));
        assert_eq!(normalize_index(-1, 0), None);
        assert_eq!(normalize_index(i64::MIN, 5), None);
    }

    #[test]
    fn test_positive_index_range() {
        assert_eq!(normalize_index(0, 5), Some(0));
        assert_eq!(normalize_index(4, 5), Some(4));
        assert_eq!(normalize_index(5, 5), None);
        assert_eq!(normalize_index(0, 0), None);
    }

    #[test]
    fn test_keep_only_first_and_last() {
        let selection = select_pages(&[0, -1], PageOperation::KeepOnly, 3, 0);
        assert_eq!(selection, PageSelection::Delete(set(&[1])));
    }

    #[test]
    fn test_keep_only_default_options() {
        let selection = PageOptions::default().select(4);
        assert_eq!(selection, PageSelection::Delete(set(&[1, 2, 3])));
    }

    #[test]
    fn test_remove_pages() {
        let selection = select_pages(&[1, -1, 7, 1], PageOperation::Remove, 5, 0);
        assert_eq!(selection, PageSelection::Delete(set(&[1, 4])));
    }

    #[test]
    fn test_keep_only_with_nothing_in_range_deletes_all() {
        let selection = select_pages(&[10, -4], PageOperation::KeepOnly, 3, 0);
        assert_eq!(selection, PageSelection::Delete(set(&[0, 1, 2])));
    }

    #[test]
    fn test_order_independent() {
        let a = select_pages(&[2, 0, 3], PageOperation::KeepOnly, 6, 0);
        let b = select_pages(&[3, 2, 0], PageOperation::KeepOnly, 6, 0);
        assert_eq!(a, b);
        assert_eq!(a, PageSelection::Delete(set(&[1, 4, 5])));
    }

    #[test]
    fn test_min_pages_guard() {
        let options = PageOptions::new(vec![0], PageOperation::KeepOnly).with_min_pages(5);
        assert_eq!(options.select(2), PageSelection::Unchanged);
        assert_eq!(options.select(5), PageSelection::Delete(set(&[1, 2, 3, 4])));
    }

    #[test]
    fn test_operation_parsing() {
        assert_eq!("KEEP_ONLY".parse::<PageOperation>().unwrap(), PageOperation::KeepOnly);
        assert_eq!("keep-only".parse::<PageOperation>().unwrap(), PageOperation::KeepOnly);
        assert_eq!("remove".parse::<PageOperation>().unwrap(), PageOperation::Remove);

        let err = "SPLIT".parse::<PageOperation>().unwrap_err();
        assert!(matches!(err, FinparseError::Config(_)));
        assert!(err.to_string().contains("SPLIT"));
    }

    #[test]
    fn test_operation_serde_tokens() {
        assert_eq!(serde_json::to_string(&PageOperation::KeepOnly).unwrap(), "\"KEEP_ONLY\"");
        let op: PageOperation = serde_json::from_str("\"REMOVE\"").unwrap();
        assert_eq!(op, PageOperation::Remove);
        assert!(serde_json::from_str::<PageOperation>("\"SPLIT\"").is_err());
    }
}
