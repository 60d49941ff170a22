use crate::core::commit::{CommitService, CommitTicket};
use crate::core::dirty::DirtyTracker;
use crate::core::drag::{DragEngine, DropTarget, KeyCommand, MoveIntent};
use crate::core::list_store::EntityListStore;
use crate::domain::model::{Entity, EntityId, ListState, Notification};
use crate::domain::ports::{Notifier, OrderBackend};
use crate::utils::error::{ReorderError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed { items: usize },
    NothingToCommit,
}

/// Drag-to-reorder list with dirty tracking and an atomic "save order".
///
/// States are derived, never stored: `Committing` while a ticket is out,
/// otherwise `Dirty` or `Clean` from the baseline comparison. Drags stay
/// accepted while committing and land in the next commit.
pub struct ReorderableList<N: Notifier> {
    store: EntityListStore,
    drag: DragEngine,
    tracker: DirtyTracker,
    commits: CommitService,
    notifier: N,
}

impl<N: Notifier> ReorderableList<N> {
    pub fn new(notifier: N) -> Self {
        Self {
            store: EntityListStore::new(),
            drag: DragEngine::new(),
            tracker: DirtyTracker::default(),
            commits: CommitService::new(),
            notifier,
        }
    }

    pub fn load(&mut self, entities: Vec<Entity>) -> Result<()> {
        if self.commits.is_in_flight() {
            return Err(ReorderError::CommitInProgress);
        }
        self.store.load(entities)?;
        self.drag.cancel();
        self.tracker.rebase(self.store.current_order());
        tracing::debug!("Loaded {} entities", self.store.len());
        Ok(())
    }

    pub fn entities(&self) -> &[Entity] {
        self.store.entities()
    }

    pub fn current_order(&self) -> Vec<EntityId> {
        self.store.current_order()
    }

    pub fn baseline(&self) -> &[EntityId] {
        self.tracker.baseline()
    }

    pub fn position_badges(&self) -> impl Iterator<Item = (usize, &Entity)> {
        self.store.position_badges()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn is_dirty(&self) -> bool {
        self.tracker.is_dirty(&self.store.current_order())
    }

    pub fn state(&self) -> ListState {
        if self.commits.is_in_flight() {
            ListState::Committing
        } else if self.is_dirty() {
            ListState::Dirty
        } else {
            ListState::Clean
        }
    }

    /// "Save Order" is enabled only when dirty and idle.
    pub fn can_save(&self) -> bool {
        self.state() == ListState::Dirty
    }

    pub fn can_reset(&self) -> bool {
        self.state() == ListState::Dirty
    }

    pub fn move_item(&mut self, from: usize, to: usize) -> Result<bool> {
        self.store.move_item(from, to)
    }

    pub fn apply_intent(&mut self, intent: MoveIntent) -> Result<bool> {
        self.store.move_item(intent.from, intent.to)
    }

    // 拖曳手勢：只有放下或確認時才會真正移動

    pub fn begin_drag(&mut self, id: &EntityId) -> Result<()> {
        self.drag.begin(&self.store.current_order(), id)
    }

    pub fn hover(&mut self, target: DropTarget) -> Option<usize> {
        self.drag.hover(&self.store.current_order(), target)
    }

    pub fn pointer_moved(&mut self, centers: &[f64], y: f64) -> Option<usize> {
        self.drag.pointer_moved(centers, y)
    }

    pub fn key(&mut self, command: KeyCommand) -> Result<bool> {
        match self.drag.key(command, &self.store.current_order()) {
            Some(intent) => self.apply_intent(intent),
            None => Ok(false),
        }
    }

    pub fn drop_drag(&mut self) -> Result<bool> {
        match self.drag.drop(&self.store.current_order()) {
            Some(intent) => self.apply_intent(intent),
            None => Ok(false),
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    pub fn preview(&self) -> Vec<EntityId> {
        self.drag.preview(&self.store.current_order())
    }

    /// Replays the sync baseline locally.
    pub fn reset(&mut self) -> Result<()> {
        if self.commits.is_in_flight() {
            return Err(ReorderError::CommitInProgress);
        }
        self.drag.cancel();
        let baseline = self.tracker.baseline().to_vec();
        self.store.restore_order(&baseline)
    }

    /// Discards local state and fetches the collection again.
    pub async fn reload<B: OrderBackend + ?Sized>(&mut self, backend: &B) -> Result<()> {
        if self.commits.is_in_flight() {
            return Err(ReorderError::CommitInProgress);
        }
        let entities = backend.fetch().await?;
        self.load(entities)
    }

    /// Starts a commit of the current order. `None` when there is nothing to
    /// save.
    pub fn begin_commit(&mut self) -> Result<Option<CommitTicket>> {
        if self.commits.is_in_flight() {
            return Err(ReorderError::CommitInProgress);
        }
        if !self.is_dirty() {
            return Ok(None);
        }
        self.commits.begin(&self.store.current_order()).map(Some)
    }

    /// Settles `ticket` with the result of its request. A ticket this list
    /// is not waiting on leaves the baseline alone, but its failure is still
    /// surfaced.
    pub fn finish_commit(&mut self, ticket: CommitTicket, outcome: Result<()>) -> Result<()> {
        if !self.commits.finish(&ticket) {
            return match outcome {
                Ok(()) => Err(ReorderError::StaleCommitTicket { ticket: ticket.id() }),
                Err(e) => {
                    tracing::warn!("❌ Stale commit #{} failed: {}", ticket.id(), e);
                    self.notifier
                        .notify(Notification::failure(e.user_friendly_message()));
                    Err(e)
                }
            };
        }

        match outcome {
            Ok(()) => {
                self.tracker.rebase(ticket.committed_order());
                tracing::info!("✅ Saved order of {} items", ticket.payload().len());
                self.notifier
                    .notify(Notification::success("Order saved successfully"));
                Ok(())
            }
            Err(e) => {
                tracing::warn!("❌ Saving order failed: {}", e);
                self.notifier
                    .notify(Notification::failure(e.user_friendly_message()));
                Err(e)
            }
        }
    }

    pub async fn commit<B: OrderBackend + ?Sized>(&mut self, backend: &B) -> Result<CommitOutcome> {
        let Some(ticket) = self.begin_commit()? else {
            tracing::debug!("Order unchanged, nothing to commit");
            return Ok(CommitOutcome::NothingToCommit);
        };
        let items = ticket.payload().len();
        let outcome = ticket.send(backend).await;
        self.finish_commit(ticket, outcome)?;
        Ok(CommitOutcome::Committed { items })
    }
}
