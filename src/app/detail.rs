//! Routes and the listing detail page.
//!
//! Committing a search result navigates to [`Route::Detail`]. The detail page
//! fetches its listing through the same store as the search box and guards
//! its settlement with its own ticket.

use crate::domain::{single_listing, Listing, ListingsError};
use crate::store::{ListingStore, Lookup, Settlement, StoreEffect, Ticket};

/// Navigation target carried by [`crate::app::Action::Navigate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Search,
    /// Detail page of the listing with this id.
    Detail(i64),
}

/// Load state of the detail page.
#[derive(Debug, Clone)]
pub enum DetailStatus {
    Loading,
    Loaded(Box<Listing>),
    Failed(ListingsError),
}

/// Detail page for one listing.
#[derive(Debug, Clone)]
pub struct DetailView {
    id: i64,
    ticket: Ticket,
    status: DetailStatus,
}

impl DetailView {
    /// Opens the page for `id` and starts the by-id lookup.
    pub fn open(id: i64, store: &mut ListingStore, now_ms: i64) -> (Self, Vec<StoreEffect>) {
        let handle = store.fetch_by_id(id, now_ms);
        tracing::debug!(id, ticket = %handle.ticket, "opening detail page");

        let status = match handle.lookup {
            Lookup::Ready(page) => Self::reduce(&single_listing(&page, id)),
            Lookup::Pending => DetailStatus::Loading,
            Lookup::Rejected(err) => DetailStatus::Failed(err),
        };

        (Self { id, ticket: handle.ticket, status }, handle.effects)
    }

    /// Applies a settlement addressed to this page's ticket.
    ///
    /// Returns `true` if the status changed.
    pub fn on_settlement(&mut self, settlement: &Settlement) -> bool {
        if !settlement.answers(self.ticket) || !matches!(self.status, DetailStatus::Loading) {
            return false;
        }

        self.status = match &settlement.outcome {
            Ok(page) => Self::reduce(&single_listing(page, self.id)),
            Err(err) => DetailStatus::Failed(err.clone()),
        };
        true
    }

    fn reduce(found: &Result<Listing, ListingsError>) -> DetailStatus {
        match found {
            Ok(listing) => DetailStatus::Loaded(Box::new(listing.clone())),
            Err(err) => {
                tracing::debug!(error = %err, "detail lookup failed");
                DetailStatus::Failed(err.clone())
            }
        }
    }

    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    #[must_use]
    pub const fn status(&self) -> &DetailStatus {
        &self.status
    }
}
