//! Commitment rollup state for the activity being edited.
//!
//! Every lookup is tagged with a sequence number when it starts. Only the
//! response to the newest lookup is applied, so a slow answer for a previous
//! area or year can never overwrite the current one. The applied rollup is
//! held as an `Arc` snapshot that is swapped whole on every change.

use std::sync::Arc;

use metas_shared::types::{ActivityId, AreaId};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::error::LedgerFetchError;
use super::source::LedgerSource;
use super::types::CommitmentRollup;
use super::wire::{LedgerQuery, LedgerResponse};

/// What the resolver currently knows about the area's availability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RollupState {
    /// No rollup: nothing fetched yet, the area was cleared, or the last fetch failed.
    #[default]
    Unknown,
    /// The rollup from the newest successful lookup.
    Ready(Arc<CommitmentRollup>),
}

impl RollupState {
    /// Returns the rollup, if one is loaded.
    #[must_use]
    pub fn rollup(&self) -> Option<&CommitmentRollup> {
        match self {
            Self::Unknown => None,
            Self::Ready(rollup) => Some(rollup.as_ref()),
        }
    }
}

/// A started lookup. Hand it back to [`LedgerResolver::complete`] with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerTicket {
    seq: u64,
    query: LedgerQuery,
}

impl LedgerTicket {
    /// Sequence number assigned when the lookup started.
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    /// The query to send.
    #[must_use]
    pub const fn query(&self) -> &LedgerQuery {
        &self.query
    }
}

/// Outcome of handing a lookup result back to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The result was the newest and is now the current rollup.
    Applied(Arc<CommitmentRollup>),
    /// The result was the newest and was a failure; the rollup is now unknown.
    Failed(LedgerFetchError),
    /// A newer lookup was started since; the result was discarded.
    Stale,
}

/// Tracks the commitment rollup for one activity form.
pub struct LedgerResolver<S> {
    source: S,
    next_seq: u64,
    latest: Option<u64>,
    state: RollupState,
    last_error: Option<LedgerFetchError>,
}

impl<S: LedgerSource> LedgerResolver<S> {
    /// Creates a resolver with no rollup loaded.
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self {
            source,
            next_seq: 1,
            latest: None,
            state: RollupState::Unknown,
            last_error: None,
        }
    }

    /// The backing source, for callers that run fetches themselves.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Starts a lookup, superseding any lookup still in flight.
    pub fn begin(
        &mut self,
        area_id: AreaId,
        year: i32,
        draft_budget: Decimal,
        activity_id: Option<ActivityId>,
    ) -> LedgerTicket {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest = Some(seq);

        debug!(seq, %area_id, year, "Starting ledger lookup");

        LedgerTicket {
            seq,
            query: LedgerQuery {
                area_id,
                year,
                draft_budget,
                activity_id,
            },
        }
    }

    /// Applies the result of a lookup if it is still the newest one.
    pub fn complete(
        &mut self,
        ticket: LedgerTicket,
        result: Result<LedgerResponse, LedgerFetchError>,
    ) -> Completion {
        if self.latest != Some(ticket.seq) {
            debug!(
                seq = ticket.seq,
                latest = ?self.latest,
                area_id = %ticket.query.area_id,
                "Discarding stale ledger response"
            );
            return Completion::Stale;
        }
        self.latest = None;

        match result {
            Ok(response) => {
                let rollup = Arc::new(response.into_rollup(&ticket.query));
                info!(
                    area_id = %rollup.ceiling.area_id,
                    year = rollup.ceiling.fiscal_year,
                    total_ceiling = %rollup.total_ceiling,
                    committed = %rollup.committed,
                    available = %rollup.available,
                    committed_percent = %rollup.committed_percent(),
                    "Ledger rollup updated"
                );
                self.state = RollupState::Ready(Arc::clone(&rollup));
                self.last_error = None;
                Completion::Applied(rollup)
            }
            Err(err) => {
                warn!(
                    area_id = %ticket.query.area_id,
                    year = ticket.query.year,
                    error = %err,
                    "Ledger lookup failed; area availability unknown"
                );
                self.state = RollupState::Unknown;
                self.last_error = Some(err.clone());
                Completion::Failed(err)
            }
        }
    }

    /// Starts a lookup, fetches it from the source and applies the result.
    pub async fn resolve(
        &mut self,
        area_id: AreaId,
        year: i32,
        draft_budget: Decimal,
        activity_id: Option<ActivityId>,
    ) -> Completion {
        let ticket = self.begin(area_id, year, draft_budget, activity_id);
        let result = self.source.fetch(ticket.query()).await;
        self.complete(ticket, result)
    }

    /// Re-estimates the loaded rollup for a new draft budget without refetching.
    ///
    /// Returns the new snapshot, or `None` when no rollup is loaded.
    pub fn update_draft_budget(&mut self, draft_budget: Decimal) -> Option<Arc<CommitmentRollup>> {
        let RollupState::Ready(current) = &self.state else {
            return None;
        };
        let updated = Arc::new(current.with_draft_budget(draft_budget));
        self.state = RollupState::Ready(Arc::clone(&updated));
        Some(updated)
    }

    /// Returns true when the loaded rollup does not belong to this area and year.
    ///
    /// Draft budget edits never require a refetch.
    #[must_use]
    pub fn needs_refetch(&self, area_id: AreaId, year: i32) -> bool {
        self.state
            .rollup()
            .is_none_or(|rollup| !rollup.matches(area_id, year))
    }

    /// Forgets the rollup and any pending lookup, e.g. when the area selection is cleared.
    pub fn clear(&mut self) {
        if self.latest.is_some() {
            debug!("Clearing ledger state with a lookup in flight");
        }
        self.latest = None;
        self.state = RollupState::Unknown;
        self.last_error = None;
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &RollupState {
        &self.state
    }

    /// Current rollup snapshot, if any.
    #[must_use]
    pub fn rollup(&self) -> Option<Arc<CommitmentRollup>> {
        match &self.state {
            RollupState::Unknown => None,
            RollupState::Ready(rollup) => Some(Arc::clone(rollup)),
        }
    }

    /// The failure of the newest lookup, if it failed.
    #[must_use]
    pub const fn last_error(&self) -> Option<&LedgerFetchError> {
        self.last_error.as_ref()
    }

    /// Returns true while the newest lookup has not completed.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.latest.is_some()
    }
}
