//! Domain layer for the zlistings plugin.
//!
//! Core types for the listing directory, independent of Zellij APIs and of
//! the network transport.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`listing`]: Listing model and paginated API payloads
//! - [`query`]: Query parameters, cache keys and request URLs

pub mod error;
pub mod listing;
pub mod query;

pub use error::{ListingsError, Result};
pub use listing::{single_listing, Listing, PageLinks, PageMetadata, PaginatedResult};
pub use query::QueryParams;
