//! Listing domain model and paginated API payloads.
//!
//! A [`Listing`] is one directory entry (a business or place) with location
//! and contact metadata. The listings endpoint answers every query with a
//! [`PaginatedResult`], including single-item lookups by id.

use crate::domain::error::{ListingsError, Result};
use serde::{Deserialize, Serialize};

/// A single directory entry.
///
/// Immutable once fetched. Optional contact fields arrive as empty strings or
/// are missing entirely; both deserialize to an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub catname: String,
    #[serde(default)]
    pub subcatname: String,
    #[serde(default)]
    pub address1: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub weburl: String,
}

impl Listing {
    /// Returns the "City, ST" line shown under a search result title.
    ///
    /// # Examples
    ///
    /// ```
    /// use zlistings::domain::Listing;
    ///
    /// let listing: Listing = serde_json::from_str(
    ///     r#"{"id": 1, "title": "Cafe", "city": "Austin", "state": "TX"}"#,
    /// ).unwrap();
    /// assert_eq!(listing.locality(), "Austin, TX");
    /// ```
    #[must_use]
    pub fn locality(&self) -> String {
        match (self.city.is_empty(), self.state.is_empty()) {
            (false, false) => format!("{}, {}", self.city, self.state),
            (false, true) => self.city.clone(),
            (true, false) => self.state.clone(),
            (true, true) => String::new(),
        }
    }

    /// Returns the "Category - Subcategory" line of the detail view.
    #[must_use]
    pub fn category_line(&self) -> String {
        if self.subcatname.is_empty() {
            self.catname.clone()
        } else {
            format!("{} - {}", self.catname, self.subcatname)
        }
    }
}

/// Pagination metadata returned alongside every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub total: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub per_page: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// Navigation links for the page. `next` and `prev` are `null` at the edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub first: String,
    pub last: String,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// One page of listings as returned by `GET /api/listings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResult {
    pub success: bool,
    pub metadata: PageMetadata,
    pub links: PageLinks,
    pub data: Vec<Listing>,
}

impl PaginatedResult {
    /// Decodes and validates a response body.
    ///
    /// # Errors
    ///
    /// Returns [`ListingsError::Malformed`] if the body is not valid JSON of
    /// the expected shape, if the server reports `success: false`, or if the
    /// page holds more items than `perPage`.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let page: Self = serde_json::from_slice(body)
            .map_err(|e| ListingsError::Malformed(format!("failed to parse listings page: {e}")))?;
        page.validate()?;
        Ok(page)
    }

    /// Checks the page invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ListingsError::Malformed`] when an invariant is violated.
    pub fn validate(&self) -> Result<()> {
        if !self.success {
            return Err(ListingsError::Malformed("server reported success: false".to_string()));
        }

        let len = self.data.len();
        if u64::try_from(len).unwrap_or(u64::MAX) > u64::from(self.metadata.per_page) {
            return Err(ListingsError::Malformed(format!(
                "page holds {len} listings but perPage is {}",
                self.metadata.per_page
            )));
        }

        let expected_next = self.metadata.current_page < self.metadata.total_pages;
        if self.metadata.has_next_page != expected_next {
            tracing::warn!(
                current_page = self.metadata.current_page,
                total_pages = self.metadata.total_pages,
                has_next_page = self.metadata.has_next_page,
                "inconsistent hasNextPage in listings page"
            );
        }

        Ok(())
    }

    /// Number of listings on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the page holds no listings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Reduces a by-id page to a single listing.
///
/// The server is not trusted to enforce uniqueness: the first element wins.
///
/// # Errors
///
/// Returns [`ListingsError::NotFound`] if the page is empty.
pub fn single_listing(page: &PaginatedResult, id: i64) -> Result<Listing> {
    page.data.first().cloned().ok_or(ListingsError::NotFound(id))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn listing(id: i64, title: &str) -> Listing {
        Listing {
            id,
            title: title.to_string(),
            catname: "Food".to_string(),
            subcatname: "Cafe".to_string(),
            address1: "1 Main St".to_string(),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            zip: "78701".to_string(),
            latitude: 30.27,
            longitude: -97.74,
            phone: "555-0100".to_string(),
            weburl: "https://example.com".to_string(),
        }
    }

    pub fn page(listings: Vec<Listing>) -> PaginatedResult {
        let count = u32::try_from(listings.len()).unwrap();
        PaginatedResult {
            success: true,
            metadata: PageMetadata {
                total: u64::from(count),
                total_pages: 1,
                current_page: 1,
                per_page: count.max(10),
                has_next_page: false,
                has_prev_page: false,
            },
            links: PageLinks {
                self_link: "/api/listings?page=1".to_string(),
                first: "/api/listings?page=1".to_string(),
                last: "/api/listings?page=1".to_string(),
                next: None,
                prev: None,
            },
            data: listings,
        }
    }

    pub fn body(listings: Vec<Listing>) -> Vec<u8> {
        serde_json::to_vec(&page(listings)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{body, listing, page};
    use super::*;

    const SAMPLE: &str = r#"{
        "success": true,
        "metadata": {"total": 2, "totalPages": 1, "currentPage": 1, "perPage": 10,
                     "hasNextPage": false, "hasPrevPage": false},
        "links": {"self": "/api/listings?page=1&limit=10", "first": "/api/listings?page=1&limit=10",
                  "last": "/api/listings?page=1&limit=10", "next": null, "prev": null},
        "data": [
            {"id": 7, "title": "Cat Cafe", "catname": "Food", "subcatname": "Cafe",
             "address1": "1 Main", "city": "Austin", "state": "TX", "zip": "78701",
             "latitude": 30.1, "longitude": -97.7, "phone": "", "weburl": ""},
            {"id": 9, "title": "Catering Co", "city": "Dallas", "state": "TX"}
        ]
    }"#;

    #[test]
    fn decodes_camel_case_page() {
        let page = PaginatedResult::from_slice(SAMPLE.as_bytes()).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page.metadata.per_page, 10);
        assert_eq!(page.links.self_link, "/api/listings?page=1&limit=10");
        assert!(page.links.next.is_none());
        assert_eq!(page.data[1].zip, "");
        assert_eq!(page.data[1].locality(), "Dallas, TX");
    }

    #[test]
    fn rejects_garbage_as_malformed() {
        let err = PaginatedResult::from_slice(b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, ListingsError::Malformed(_)));
    }

    #[test]
    fn rejects_unsuccessful_and_oversized_pages() {
        let mut failed = page(vec![listing(1, "a")]);
        failed.success = false;
        assert!(matches!(failed.validate(), Err(ListingsError::Malformed(_))));

        let mut oversized = page(vec![listing(1, "a"), listing(2, "b")]);
        oversized.metadata.per_page = 1;
        assert!(matches!(oversized.validate(), Err(ListingsError::Malformed(_))));
    }

    #[test]
    fn single_listing_takes_first_element() {
        let page = PaginatedResult::from_slice(&body(vec![listing(42, "first"), listing(42, "dup")])).unwrap();
        assert_eq!(single_listing(&page, 42).unwrap().title, "first");
    }

    #[test]
    fn single_listing_on_empty_page_is_not_found() {
        let empty = page(vec![]);
        assert!(matches!(single_listing(&empty, 42), Err(ListingsError::NotFound(42))));
    }

    #[test]
    fn category_line_skips_missing_subcategory() {
        let mut item = listing(1, "x");
        assert_eq!(item.category_line(), "Food - Cafe");
        item.subcatname.clear();
        assert_eq!(item.category_line(), "Food");
    }
}
