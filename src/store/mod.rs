//! Listing data store: cache, retry policy and the sans-IO fetch engine.
//!
//! - [`cache`]: bounded result cache with freshness window
//! - [`retry`]: response classification and backoff
//! - [`listing_store`]: [`ListingStore`], which ties both together

pub mod cache;
pub mod listing_store;
pub mod retry;

pub use cache::{CacheEntry, CacheLookup, QueryCache};
pub use listing_store::{ListingStore, Lookup, QueryHandle, Settlement, StoreEffect, StoreEvent, Ticket};
pub use retry::{classify_response, RetryPolicy};
