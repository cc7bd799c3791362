//! Sans-IO listing data store.
//!
//! [`ListingStore`] answers [`QueryParams`] from its [`QueryCache`] or by
//! asking the runtime to perform HTTP requests. It never performs I/O
//! itself: every operation returns [`StoreEffect`]s (fetch this URL, wake me
//! up later) and the outcome arrives through [`ListingStore::on_response`]
//! and [`ListingStore::on_timer`].
//!
//! # Lifecycle of a fetch
//!
//! ```text
//! query ──miss──▶ Fetch + RequestTimeout ──200──▶ Settled(Ok)
//!                      │        │
//!                      │        └──408/429/5xx/timeout──▶ Retry timer ──▶ Fetch ...
//!                      └──4xx/bad body/retries spent──▶ Settled(Err)
//! ```
//!
//! Each attempt gets a fresh [`RequestId`]; completions for attempts that
//! already timed out or were superseded are ignored.

use super::cache::{CacheLookup, QueryCache};
use super::retry::{classify_response, RetryPolicy};
use crate::domain::{ListingsError, PaginatedResult, QueryParams, Result};
use crate::runtime::{RequestId, TimerToken};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Sequence number of one issued query.
///
/// Tickets are strictly increasing, so comparing two tickets tells which
/// query was issued last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub(crate) u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Side effect requested by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEffect {
    /// Perform `GET url` and report the completion under `request`.
    Fetch { request: RequestId, url: String },
    /// Call [`ListingStore::on_timer`] with `token` after `delay_ms`.
    Schedule { token: TimerToken, delay_ms: u64 },
}

/// Immediate answer to a query.
#[derive(Debug, Clone)]
pub enum Lookup {
    /// Served from cache. May be stale, in which case a refresh is running.
    Ready(Arc<PaginatedResult>),
    /// The ticket will be listed in a future [`Settlement`].
    Pending,
    /// The query was rejected before any request was made.
    Rejected(ListingsError),
}

/// Result of [`ListingStore::query`].
#[derive(Debug, Clone)]
pub struct QueryHandle {
    pub ticket: Ticket,
    pub lookup: Lookup,
    pub effects: Vec<StoreEffect>,
}

/// Final outcome of the fetch for one cache key.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub key: String,
    pub params: QueryParams,
    /// Every ticket that was waiting on this fetch, in issue order.
    pub waiters: Vec<Ticket>,
    pub outcome: Result<Arc<PaginatedResult>>,
}

impl Settlement {
    /// Returns `true` if `ticket` was waiting on this fetch.
    #[must_use]
    pub fn answers(&self, ticket: Ticket) -> bool {
        self.waiters.contains(&ticket)
    }
}

/// What happened in response to a completion or timer.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// A fetch finished for good, successfully or not.
    Settled(Settlement),
    /// An attempt failed or timed out and another step was scheduled.
    Retrying { effects: Vec<StoreEffect> },
    /// The completion or timer belonged to nothing the store still tracks.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    InFlight,
    AwaitingRetry,
}

#[derive(Debug, Clone)]
struct Attempt {
    key: String,
    params: QueryParams,
    retries_used: u32,
    phase: Phase,
}

/// Cached, retrying access to the listings endpoint.
#[derive(Debug)]
pub struct ListingStore {
    base_url: Url,
    policy: RetryPolicy,
    cache: QueryCache,
    attempts: HashMap<RequestId, Attempt>,
    next_request: RequestId,
    next_ticket: u64,
}

impl ListingStore {
    #[must_use]
    pub fn new(base_url: Url, policy: RetryPolicy, cache: QueryCache) -> Self {
        Self {
            base_url,
            policy,
            cache,
            attempts: HashMap::new(),
            next_request: 1,
            next_ticket: 1,
        }
    }

    /// Looks up `params`, issuing a fetch when the cache cannot answer.
    ///
    /// - fresh hit: [`Lookup::Ready`], no effects
    /// - stale hit: [`Lookup::Ready`] plus one background refresh unless one
    ///   is already running for the key
    /// - miss: [`Lookup::Pending`]; the ticket waits on the key and a fetch
    ///   starts unless one is already running
    pub fn query(&mut self, params: &QueryParams, now_ms: i64) -> QueryHandle {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;

        let key = params.cache_key();
        let _span = tracing::debug_span!("store_query", ticket = %ticket, key = %key).entered();

        if let Err(err) = params.validate() {
            tracing::debug!(error = %err, "query rejected");
            return QueryHandle { ticket, lookup: Lookup::Rejected(err), effects: Vec::new() };
        }

        let in_flight = self.cache.get(&key).and_then(|e| e.in_flight).is_some();

        match self.cache.lookup(&key, now_ms) {
            CacheLookup::Fresh(result) => {
                tracing::debug!("cache hit");
                QueryHandle { ticket, lookup: Lookup::Ready(result), effects: Vec::new() }
            }
            CacheLookup::Stale(result) => {
                let effects = if in_flight {
                    Vec::new()
                } else {
                    tracing::debug!("serving stale page, refreshing in background");
                    // Cannot fail: the same params already produced the stored page.
                    self.start(&key, params, 0).unwrap_or_default()
                };
                QueryHandle { ticket, lookup: Lookup::Ready(result), effects }
            }
            CacheLookup::Missing => {
                self.cache.entry_mut(&key).waiters.push(ticket);
                if in_flight {
                    tracing::debug!("joining in-flight fetch");
                    return QueryHandle { ticket, lookup: Lookup::Pending, effects: Vec::new() };
                }

                match self.start(&key, params, 0) {
                    Ok(effects) => QueryHandle { ticket, lookup: Lookup::Pending, effects },
                    Err(err) => {
                        self.cache.forget_waiter(&key, ticket);
                        QueryHandle { ticket, lookup: Lookup::Rejected(err), effects: Vec::new() }
                    }
                }
            }
        }
    }

    /// Queries the single-listing page for `id`.
    ///
    /// Reduce the settled page with [`crate::domain::single_listing`].
    pub fn fetch_by_id(&mut self, id: i64, now_ms: i64) -> QueryHandle {
        self.query(&QueryParams::by_id(id), now_ms)
    }

    /// Feeds an HTTP completion back into the store.
    pub fn on_response(&mut self, request: RequestId, status: u16, body: &[u8], now_ms: i64) -> StoreEvent {
        let _span = tracing::debug_span!("store_response", request, status).entered();

        let live = self.attempts.get(&request).is_some_and(|a| a.phase == Phase::InFlight);
        if !live {
            tracing::debug!("ignoring response for untracked attempt");
            return StoreEvent::Ignored;
        }
        let Some(attempt) = self.attempts.remove(&request) else {
            return StoreEvent::Ignored;
        };

        match classify_response(status, body) {
            Ok(page) => {
                let result = Arc::new(page);
                let waiters = self.cache.store(&attempt.key, Arc::clone(&result), now_ms);
                tracing::debug!(items = result.len(), waiters = waiters.len(), "fetch settled");
                StoreEvent::Settled(Settlement {
                    key: attempt.key,
                    params: attempt.params,
                    waiters,
                    outcome: Ok(result),
                })
            }
            Err(err) => self.attempt_failed(request, attempt, err),
        }
    }

    /// Feeds a fired timer back into the store. Tokens the store does not
    /// own are ignored.
    pub fn on_timer(&mut self, token: TimerToken, _now_ms: i64) -> StoreEvent {
        match token {
            TimerToken::RequestTimeout(request) => {
                let live = self.attempts.get(&request).is_some_and(|a| a.phase == Phase::InFlight);
                if !live {
                    return StoreEvent::Ignored;
                }
                let Some(attempt) = self.attempts.remove(&request) else {
                    return StoreEvent::Ignored;
                };

                tracing::debug!(request, "request timed out");
                let err = ListingsError::NetworkTransient(format!(
                    "request timed out after {}ms",
                    self.policy.request_timeout_ms
                ));
                self.attempt_failed(request, attempt, err)
            }
            TimerToken::Retry(request) => {
                let waiting = self.attempts.get(&request).is_some_and(|a| a.phase == Phase::AwaitingRetry);
                if !waiting {
                    return StoreEvent::Ignored;
                }
                let Some(attempt) = self.attempts.remove(&request) else {
                    return StoreEvent::Ignored;
                };

                let retry = attempt.retries_used + 1;
                tracing::debug!(request, retry, key = %attempt.key, "retrying fetch");
                match self.start(&attempt.key, &attempt.params, retry) {
                    Ok(effects) => StoreEvent::Retrying { effects },
                    Err(err) => self.settle_failure(attempt, err),
                }
            }
            TimerToken::BlurReset(_) => StoreEvent::Ignored,
        }
    }

    fn attempt_failed(&mut self, request: RequestId, mut attempt: Attempt, err: ListingsError) -> StoreEvent {
        if !self.policy.should_retry(&err, attempt.retries_used) {
            tracing::warn!(key = %attempt.key, error = %err, "fetch failed");
            return self.settle_failure(attempt, err);
        }

        let delay_ms = self.policy.backoff_ms(attempt.retries_used + 1);
        tracing::debug!(request, delay_ms, error = %err, "scheduling retry");
        attempt.phase = Phase::AwaitingRetry;
        self.attempts.insert(request, attempt);
        StoreEvent::Retrying {
            effects: vec![StoreEffect::Schedule { token: TimerToken::Retry(request), delay_ms }],
        }
    }

    fn settle_failure(&mut self, attempt: Attempt, err: ListingsError) -> StoreEvent {
        let waiters = self.cache.fail(&attempt.key);
        StoreEvent::Settled(Settlement {
            key: attempt.key,
            params: attempt.params,
            waiters,
            outcome: Err(err),
        })
    }

    /// Starts attempt number `retries_used + 1` for `key`.
    fn start(&mut self, key: &str, params: &QueryParams, retries_used: u32) -> Result<Vec<StoreEffect>> {
        let url = params.to_url(&self.base_url)?;

        let request = self.next_request;
        self.next_request += 1;

        self.attempts.insert(
            request,
            Attempt {
                key: key.to_string(),
                params: params.clone(),
                retries_used,
                phase: Phase::InFlight,
            },
        );
        self.cache.entry_mut(key).in_flight = Some(request);

        tracing::debug!(request, url = %url, "issuing fetch");
        Ok(vec![
            StoreEffect::Fetch { request, url: url.into() },
            StoreEffect::Schedule {
                token: TimerToken::RequestTimeout(request),
                delay_ms: self.policy.request_timeout_ms,
            },
        ])
    }

    #[must_use]
    pub const fn cache(&self) -> &QueryCache {
        &self.cache
    }

    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Number of attempts running or waiting for a retry.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.attempts.len()
    }
}
