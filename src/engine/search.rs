//! Search planning, supersession tickets and the loading floor.

use tokio::time::{Duration, Instant};

use crate::{
    core::filter::{Filter, Query},
    types::{ResolveMode, SearchSeq},
};

/// Token identifying one issued search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchTicket(SearchSeq);

impl SearchTicket {
    /// Raw sequence number.
    pub fn seq(self) -> SearchSeq {
        self.0
    }
}

/// Issues tickets; only the latest one may update the view.
#[derive(Debug, Default)]
pub struct SearchSequence {
    latest: SearchSeq,
}

impl SearchSequence {
    /// Sequence with no ticket issued yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket that supersedes every earlier one.
    pub fn issue(&mut self) -> SearchTicket {
        self.latest += 1;
        SearchTicket(self.latest)
    }

    /// True only for the most recently issued ticket.
    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Makes every outstanding ticket stale without issuing a new one.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

/// How an applied filter resolves into the visible collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPlan {
    /// Blank filter: show the cache, no fetch.
    ShowAll,
    /// Filter the cache locally.
    Local(Query),
    /// Issue one remote query.
    Remote(Query),
}

/// Decides how `applied` resolves under `mode`.
pub fn plan(applied: &Filter, mode: ResolveMode) -> SearchPlan {
    if applied.is_blank() {
        return SearchPlan::ShowAll;
    }
    let query = applied.to_query();
    match mode {
        ResolveMode::Remote => SearchPlan::Remote(query),
        ResolveMode::Local => SearchPlan::Local(query),
    }
}

/// Sleeps until `floor` has elapsed since `started`; returns immediately
/// for a zero floor or when the floor already passed.
pub async fn hold_until_floor(started: Instant, floor: Duration) {
    if floor.is_zero() {
        return;
    }
    tokio::time::sleep_until(started + floor).await;
}
