//! Two-phase delete.
//!
//! Requesting a delete only issues a ticket. The store is touched when the
//! ticket is confirmed; cancelling or letting it expire changes nothing.
//! Each ticket can be redeemed once, so a double-clicked confirm deletes at
//! most once.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use folio_core::types::DocId;

/// How long an unanswered confirmation stays redeemable.
pub const TICKET_TTL: Duration = Duration::from_secs(10 * 60);

pub type Ticket = String;

struct Pending {
    project_id: DocId,
    issued_at: Instant,
}

/// Outstanding delete confirmations.
#[derive(Default)]
pub struct PendingDeletes {
    pending: Mutex<HashMap<Ticket, Pending>>,
}

impl PendingDeletes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for deleting `project_id`.
    pub fn request(&self, project_id: &str) -> Ticket {
        let ticket = uuid::Uuid::new_v4().to_string();
        let mut pending = self.lock();
        prune(&mut pending);
        pending.insert(
            ticket.clone(),
            Pending {
                project_id: project_id.to_string(),
                issued_at: Instant::now(),
            },
        );
        ticket
    }

    /// Redeem a ticket, returning the project to delete. `None` when the
    /// ticket is unknown, already used, cancelled or expired.
    pub fn take(&self, ticket: &str) -> Option<DocId> {
        let mut pending = self.lock();
        prune(&mut pending);
        pending.remove(ticket).map(|p| p.project_id)
    }

    /// Drop a ticket. Returns whether it was outstanding.
    pub fn cancel(&self, ticket: &str) -> bool {
        self.lock().remove(ticket).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Ticket, Pending>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn prune(pending: &mut HashMap<Ticket, Pending>) {
    pending.retain(|_, p| p.issued_at.elapsed() < TICKET_TTL);
}
