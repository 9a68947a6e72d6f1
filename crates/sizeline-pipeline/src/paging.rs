//! Continuation-token bookkeeping shared by the listing and scan loops.

use std::collections::HashSet;

use sizeline_store::StoreError;

/// Why a paginated traversal stopped before reaching its last page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PagingError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The adapter handed back a token already followed in this traversal.
    /// Following it would cycle through the same pages forever.
    #[error("continuation token {0:?} repeated; traversal would not terminate")]
    RepeatedToken(String),

    /// Summing the traversed entries overflowed `u64`.
    #[error("running total overflowed after {0} entries")]
    Overflow(u64),

    #[error("traversal exceeded the limit of {0} pages")]
    PageLimit(usize),
}

/// Tracks the position of one paginated traversal.
///
/// Usage: call [`PageCursor::start_page`] before each fetch, pass
/// [`PageCursor::token`] to the adapter, then hand the returned
/// `next_token` to [`PageCursor::advance`]. `advance` returns `false` once
/// the last page has been seen.
#[derive(Debug)]
pub struct PageCursor {
    token: Option<String>,
    seen: HashSet<String>,
    pages: usize,
    max_pages: Option<usize>,
}

impl PageCursor {
    pub fn new(max_pages: Option<usize>) -> Self {
        Self {
            token: None,
            seen: HashSet::new(),
            pages: 0,
            max_pages,
        }
    }

    /// Token to send with the next fetch (`None` for the first page).
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Number of pages fetched so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Account for a page about to be fetched.
    pub fn start_page(&mut self) -> Result<(), PagingError> {
        if let Some(limit) = self.max_pages {
            if self.pages >= limit {
                return Err(PagingError::PageLimit(limit));
            }
        }
        self.pages += 1;
        Ok(())
    }

    /// Record the continuation returned with the page just fetched.
    ///
    /// Returns `Ok(true)` if another page should be fetched.
    pub fn advance(&mut self, next: Option<String>) -> Result<bool, PagingError> {
        match next {
            None => {
                self.token = None;
                Ok(false)
            }
            Some(next) if self.seen.contains(&next) => Err(PagingError::RepeatedToken(next)),
            Some(next) => {
                self.seen.insert(next.clone());
                self.token = Some(next);
                Ok(true)
            }
        }
    }
}
