use std::num::NonZeroUsize;

use crate::remote::{DirectoryListing, Entry};

/// A window onto a listing. Borrowed from the listing, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub struct Page<'a> {
    pub listing_path: &'a str,
    pub index: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub entries: &'a [Entry],
}

impl Page<'_> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Number of pages for `total` entries. An empty listing still has one page.
pub fn page_count(total: usize, page_size: NonZeroUsize) -> usize {
    total.div_ceil(page_size.get()).max(1)
}

pub fn last_page_index(total: usize, page_size: NonZeroUsize) -> usize {
    page_count(total, page_size) - 1
}

/// Slice out page `page_index`, clamped to the last page.
pub fn page(listing: &DirectoryListing, page_size: NonZeroUsize, page_index: usize) -> Page<'_> {
    let total = listing.entries.len();
    let index = page_index.min(last_page_index(total, page_size));
    let start = (index * page_size.get()).min(total);
    let end = (start + page_size.get()).min(total);
    Page {
        listing_path: &listing.path,
        index,
        start_index: start,
        end_index: end,
        entries: &listing.entries[start..end],
    }
}
