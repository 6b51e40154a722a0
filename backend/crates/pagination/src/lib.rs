//! Offset pagination primitives shared by the list endpoints.
//!
//! A [`PageRequest`] carries the one-based page number and the page size a
//! client asked for, clamped to [`MAX_PAGE_SIZE`]. Repositories answer with a
//! [`Page`], which couples the returned slice of items with the
//! [`PageMetadata`] clients need to walk the collection. The metadata is
//! published to HTTP clients as a JSON header value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a client may request; larger values are clamped.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Errors raised when a page request cannot be honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Page numbers are one-based.
    #[error("page number must be at least 1")]
    ZeroPageNumber,
    /// A page must be able to hold at least one item.
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

/// One-based page selection requested by a client.
///
/// # Examples
/// ```
/// use pagination::{MAX_PAGE_SIZE, PageRequest};
///
/// let request = PageRequest::new(2, 500).expect("valid request");
/// assert_eq!(request.page_size(), MAX_PAGE_SIZE);
/// assert_eq!(request.offset(), u64::from(MAX_PAGE_SIZE));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPageRequest")]
pub struct PageRequest {
    page_number: u32,
    page_size: u32,
}

/// Wire shape of [`PageRequest`]; deserialisation goes through
/// [`PageRequest::new`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPageRequest {
    page_number: u32,
    page_size: u32,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = PageRequestError;

    fn try_from(raw: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(raw.page_number, raw.page_size)
    }
}

impl PageRequest {
    /// Build a request, clamping the page size to [`MAX_PAGE_SIZE`].
    pub fn new(page_number: u32, page_size: u32) -> Result<Self, PageRequestError> {
        if page_number == 0 {
            return Err(PageRequestError::ZeroPageNumber);
        }
        if page_size == 0 {
            return Err(PageRequestError::ZeroPageSize);
        }
        Ok(Self {
            page_number,
            page_size: page_size.min(MAX_PAGE_SIZE),
        })
    }

    /// Build a request from optional query parameters, applying defaults.
    pub fn from_query(
        page_number: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<Self, PageRequestError> {
        Self::new(
            page_number.unwrap_or(1),
            page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }

    /// One-based page number.
    #[must_use]
    pub const fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items that precede the first item of this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number.saturating_sub(1)) * u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Navigation metadata describing a page within the full collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// One-based number of the returned page.
    pub current_page: u32,
    /// Number of pages needed to hold `total_count` items.
    pub total_pages: u64,
    /// Page size the request was served with.
    pub page_size: u32,
    /// Number of items in the whole collection.
    pub total_count: u64,
    /// Whether a page precedes this one.
    pub has_previous: bool,
    /// Whether a page follows this one.
    pub has_next: bool,
}

impl PageMetadata {
    /// Derive metadata for `request` over a collection of `total_count` items.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageMetadata, PageRequest};
    ///
    /// let request = PageRequest::new(2, 10).expect("valid request");
    /// let metadata = PageMetadata::new(request, 25);
    /// assert_eq!(metadata.total_pages, 3);
    /// assert!(metadata.has_previous);
    /// assert!(metadata.has_next);
    /// ```
    #[must_use]
    pub fn new(request: PageRequest, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(u64::from(request.page_size()));
        let current_page = request.page_number();
        Self {
            current_page,
            total_pages,
            page_size: request.page_size(),
            total_count,
            has_previous: current_page > 1,
            has_next: u64::from(current_page) < total_pages,
        }
    }

    /// Serialise the metadata for the `X-Pagination` response header.
    pub fn to_header_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A page of items together with its navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    metadata: PageMetadata,
}

impl<T> Page<T> {
    /// Wrap `items` served for `request` out of `total_count` items.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        Self {
            items,
            metadata: PageMetadata::new(request, total_count),
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Navigation metadata for this page.
    #[must_use]
    pub const fn metadata(&self) -> &PageMetadata {
        &self.metadata
    }

    /// Split the page into its items and metadata.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, PageMetadata) {
        (self.items, self.metadata)
    }

    /// Convert every item while keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            metadata: self.metadata,
        }
    }
}
