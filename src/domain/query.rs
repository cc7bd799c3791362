//! Query parameters for the listings endpoint.
//!
//! [`QueryParams`] addresses exactly one result page. It doubles as the cache
//! key of the data store: two parameter sets share a cache entry iff every
//! field is equal, which [`QueryParams::cache_key`] encodes as a canonical
//! string.

use crate::domain::error::{ListingsError, Result};
use url::Url;

/// Path of the listings endpoint relative to the API base URL.
pub const LISTINGS_PATH: &str = "/api/listings";

/// Default page number.
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size.
pub const DEFAULT_LIMIT: u32 = 10;

/// Filter and pagination tuple for `GET /api/listings`.
///
/// # Examples
///
/// ```
/// use zlistings::domain::QueryParams;
///
/// let params = QueryParams::title_search("ca");
/// assert_eq!(params.page, 1);
/// assert_eq!(params.limit, 10);
/// assert_eq!(params.title.as_deref(), Some("ca"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryParams {
    pub page: u32,
    pub limit: u32,
    pub title: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub catname: Option<String>,
    pub subcatname: Option<String>,
    pub id: Option<i64>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            title: None,
            city: None,
            state: None,
            catname: None,
            subcatname: None,
            id: None,
        }
    }
}

impl QueryParams {
    /// Parameters issued by the search box: first page, default limit, title filter.
    #[must_use]
    pub fn title_search(text: impl Into<String>) -> Self {
        Self {
            title: Some(text.into()),
            ..Self::default()
        }
    }

    /// Parameters for a single-listing lookup.
    #[must_use]
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Overrides the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Rejects parameter sets the server could never answer.
    ///
    /// # Errors
    ///
    /// Returns [`ListingsError::Malformed`] if `page` or `limit` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(ListingsError::Malformed("page must be at least 1".to_string()));
        }
        if self.limit == 0 {
            return Err(ListingsError::Malformed("limit must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Returns the `(name, value)` pairs sent on the wire, absent filters omitted.
    ///
    /// An id lookup sends `id` alone: the server treats it as exclusive, so
    /// pagination and the other filters are left off.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        if let Some(id) = self.id {
            return vec![("id", id.to_string())];
        }

        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];

        let filters = [
            ("title", &self.title),
            ("city", &self.city),
            ("state", &self.state),
            ("catname", &self.catname),
            ("subcatname", &self.subcatname),
        ];
        pairs.extend(
            filters
                .into_iter()
                .filter_map(|(name, value)| value.as_ref().map(|v| (name, v.clone()))),
        );
        pairs
    }

    /// Canonical cache key. Equal parameter sets always produce equal keys.
    ///
    /// Every field is written in fixed order, with absent filters spelled
    /// out, so that a filter set to an empty string never collides with a
    /// missing one.
    ///
    /// # Examples
    ///
    /// ```
    /// use zlistings::domain::QueryParams;
    ///
    /// let a = QueryParams::title_search("cat");
    /// let b = QueryParams::title_search("cat");
    /// assert_eq!(a.cache_key(), b.cache_key());
    /// assert_ne!(a.cache_key(), QueryParams::title_search("ca").cache_key());
    /// ```
    #[must_use]
    pub fn cache_key(&self) -> String {
        fn field(value: Option<&str>) -> String {
            value.map_or_else(|| "~".to_string(), |v| format!("{v:?}"))
        }

        format!(
            "page={};limit={};title={};city={};state={};catname={};subcatname={};id={}",
            self.page,
            self.limit,
            field(self.title.as_deref()),
            field(self.city.as_deref()),
            field(self.state.as_deref()),
            field(self.catname.as_deref()),
            field(self.subcatname.as_deref()),
            self.id.map_or_else(|| "~".to_string(), |id| id.to_string()),
        )
    }

    /// Builds the full request URL against `base`.
    ///
    /// # Errors
    ///
    /// Returns [`ListingsError::Config`] if `base` cannot carry a path.
    pub fn to_url(&self, base: &Url) -> Result<Url> {
        if base.cannot_be_a_base() {
            return Err(ListingsError::Config(format!("invalid api_url {base}: not a base URL")));
        }

        let mut url = base.clone();
        let path = format!("{}{LISTINGS_PATH}", base.path().trim_end_matches('/'));
        url.set_path(&path);

        {
            let mut query = url.query_pairs_mut();
            query.clear();
            for (name, value) in self.pairs() {
                query.append_pair(name, &value);
            }
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:3000").unwrap()
    }

    #[test]
    fn url_omits_absent_filters() {
        let url = QueryParams::title_search("ca").to_url(&base()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/listings?page=1&limit=10&title=ca");
    }

    #[test]
    fn url_encodes_filter_values() {
        let params = QueryParams {
            city: Some("San José".to_string()),
            title: Some("a&b".to_string()),
            ..QueryParams::default()
        };
        let url = params.to_url(&base()).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("title".to_string(), "a&b".to_string())));
        assert!(pairs.contains(&("city".to_string(), "San José".to_string())));
        assert!(!url.as_str().contains("state="));
    }

    #[test]
    fn url_keeps_base_path_prefix() {
        let base = Url::parse("https://directory.example/v1/").unwrap();
        let url = QueryParams::default().to_url(&base).unwrap();
        assert_eq!(url.path(), "/v1/api/listings");
    }

    #[test]
    fn by_id_sends_only_the_id() {
        let url = QueryParams::by_id(42).to_url(&base()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/listings?id=42");

        let mixed = QueryParams { title: Some("cat".into()), ..QueryParams::by_id(7) };
        assert_eq!(mixed.pairs(), vec![("id", "7".to_string())]);
    }

    #[test]
    fn cache_key_distinguishes_empty_from_absent() {
        let absent = QueryParams::default();
        let empty = QueryParams {
            title: Some(String::new()),
            ..QueryParams::default()
        };
        assert_ne!(absent.cache_key(), empty.cache_key());
    }

    #[test]
    fn cache_key_tracks_every_field() {
        let base = QueryParams::title_search("cat");
        let variants = [
            QueryParams { page: 2, ..base.clone() },
            base.clone().with_limit(20),
            QueryParams { city: Some("Austin".into()), ..base.clone() },
            QueryParams { state: Some("TX".into()), ..base.clone() },
            QueryParams { catname: Some("Food".into()), ..base.clone() },
            QueryParams { subcatname: Some("Cafe".into()), ..base.clone() },
            QueryParams { id: Some(1), ..base.clone() },
        ];
        for variant in &variants {
            assert_ne!(variant.cache_key(), base.cache_key(), "{variant:?}");
        }
    }

    #[test]
    fn zero_page_or_limit_is_malformed() {
        let zero_page = QueryParams { page: 0, ..QueryParams::default() };
        assert!(matches!(zero_page.validate(), Err(ListingsError::Malformed(_))));
        assert!(QueryParams::default().with_limit(0).validate().is_err());
        assert!(QueryParams::default().validate().is_ok());
    }
}
