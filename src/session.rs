//! The currently displayed trip plan.
//!
//! Each destination selection takes a ticket before its route fetch starts.
//! Only the holder of the newest ticket may publish; results from superseded
//! requests are discarded, never merged.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::trip::TripPlan;

/// Proof of which request a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanTicket(u64);

#[derive(Debug, Default)]
struct SessionState {
    generation: u64,
    plan: Option<TripPlan>,
}

#[derive(Debug, Default)]
pub struct TripSession {
    state: Mutex<SessionState>,
}

impl TripSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a new request, superseding any outstanding one.
    pub fn begin(&self) -> PlanTicket {
        let mut state = self.state();
        state.generation += 1;
        PlanTicket(state.generation)
    }

    pub fn is_current(&self, ticket: PlanTicket) -> bool {
        self.state().generation == ticket.0
    }

    /// Stores `plan` if `ticket` is still the newest request.
    ///
    /// Returns false when the result was stale and dropped.
    pub fn publish(&self, ticket: PlanTicket, plan: TripPlan) -> bool {
        let mut state = self.state();
        if state.generation != ticket.0 {
            tracing::debug!(
                ticket = ticket.0,
                current = state.generation,
                "discarding superseded trip plan"
            );
            return false;
        }
        state.plan = Some(plan);
        true
    }

    /// Drops the displayed plan and invalidates outstanding requests.
    pub fn clear(&self) {
        let mut state = self.state();
        state.generation += 1;
        state.plan = None;
    }

    pub fn current(&self) -> Option<TripPlan> {
        self.state().plan.clone()
    }
}
