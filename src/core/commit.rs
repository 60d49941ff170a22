use crate::domain::model::{EntityId, ReorderPayload};
use crate::domain::ports::OrderBackend;
use crate::utils::error::{ReorderError, Result};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::Instrument;

// 跨所有清單唯一，別的清單發出的 ticket 不會被誤認
static NEXT_TICKET_ID: AtomicU64 = AtomicU64::new(1);

/// Snapshot of one in-flight commit. Not `Clone`: a ticket settles once.
#[derive(Debug)]
pub struct CommitTicket {
    id: u64,
    payload: ReorderPayload,
    started_at: DateTime<Utc>,
}

impl CommitTicket {
    pub fn payload(&self) -> &ReorderPayload {
        &self.payload
    }

    /// The order the server will hold once this commit succeeds.
    pub fn committed_order(&self) -> Vec<EntityId> {
        self.payload.ids()
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// 只發送一次完整的排序請求，不做自動重試
    pub async fn send<B: OrderBackend + ?Sized>(&self, backend: &B) -> Result<()> {
        tracing::debug!(
            "Sending reorder commit #{} ({} items)",
            self.id,
            self.payload.len()
        );
        let span = tracing::info_span!(
            "reorder_commit",
            ticket = self.id,
            items = self.payload.len()
        );
        backend.commit(&self.payload).instrument(span).await
    }
}

/// Guards against two order payloads racing each other.
#[derive(Debug, Default)]
pub struct CommitService {
    in_flight: Option<u64>,
}

impl CommitService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn begin(&mut self, order: &[EntityId]) -> Result<CommitTicket> {
        if self.in_flight.is_some() {
            return Err(ReorderError::CommitInProgress);
        }

        let id = NEXT_TICKET_ID.fetch_add(1, Ordering::Relaxed);
        self.in_flight = Some(id);
        Ok(CommitTicket {
            id,
            payload: ReorderPayload::from_order(order),
            started_at: Utc::now(),
        })
    }

    /// Releases the guard. Returns false for a ticket that is not the one in
    /// flight.
    pub fn finish(&mut self, ticket: &CommitTicket) -> bool {
        if self.in_flight == Some(ticket.id) {
            self.in_flight = None;
            let elapsed = Utc::now() - ticket.started_at;
            tracing::debug!(
                "Commit #{} settled after {}ms",
                ticket.id,
                elapsed.num_milliseconds()
            );
            true
        } else {
            tracing::warn!("Ignoring stale commit ticket #{}", ticket.id);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::RankedItem;

    fn ids(names: &[&str]) -> Vec<EntityId> {
        names.iter().map(|n| EntityId::from(*n)).collect()
    }

    #[test]
    fn test_payload_ranks_are_one_based_positions() {
        let mut service = CommitService::new();
        let ticket = service.begin(&ids(&["B", "C", "A", "D"])).unwrap();

        let expected: Vec<RankedItem> = [("B", 1), ("C", 2), ("A", 3), ("D", 4)]
            .iter()
            .map(|(id, rank)| RankedItem {
                id: EntityId::from(*id),
                rank: *rank,
            })
            .collect();
        assert_eq!(ticket.payload().items, expected);
    }

    #[test]
    fn test_second_begin_is_rejected_until_finish() {
        let mut service = CommitService::new();
        let first = service.begin(&ids(&["A", "B"])).unwrap();

        let err = service.begin(&ids(&["A", "B"])).unwrap_err();
        assert!(matches!(err, ReorderError::CommitInProgress));

        assert!(service.finish(&first));
        assert!(!service.is_in_flight());
        assert!(!service.finish(&first));

        let second = service.begin(&ids(&["B", "A"])).unwrap();
        assert!(service.is_in_flight());
        assert!(service.finish(&second));
    }

    #[test]
    fn test_ticket_from_another_service_is_stale() {
        let mut left = CommitService::new();
        let mut right = CommitService::new();
        let left_ticket = left.begin(&ids(&["A"])).unwrap();
        let right_ticket = right.begin(&ids(&["A"])).unwrap();
        assert_ne!(left_ticket.id(), right_ticket.id());

        assert!(!right.finish(&left_ticket));
        assert!(right.is_in_flight());
        assert!(right.finish(&right_ticket));
        assert!(left.finish(&left_ticket));
    }
}
