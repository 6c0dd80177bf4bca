//! Append-only accumulation of fetched pages.

use crate::models::{Link, Listing};

/// Ordered sequence of fetched listings.
///
/// Listings are appended only after a successful fetch and are never
/// reordered or mutated in place; the flattened link sequence therefore
/// always matches fetch order exactly.
#[derive(Debug, Default)]
pub struct PaginationState {
    listings: Vec<Listing>,
}

impl PaginationState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one fetched page. Never fails.
    pub fn append(&mut self, listing: Listing) {
        self.listings.push(listing);
    }

    /// Cursor for the next page: the `after` of the most recent listing,
    /// or `None` before the first successful fetch.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.listings.last().and_then(|l| l.after.as_deref())
    }

    /// All accumulated links, in fetch order.
    pub fn flattened_links(&self) -> impl Iterator<Item = &Link> {
        self.listings.iter().flat_map(|l| l.links.iter())
    }

    #[must_use]
    pub fn total_links(&self) -> usize {
        self.listings.iter().map(|l| l.links.len()).sum()
    }

    #[must_use]
    pub fn listing_count(&self) -> usize {
        self.listings.len()
    }
}
