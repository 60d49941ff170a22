use crate::domain::model::EntityId;

/// Compares the displayed order with the last server-confirmed order.
#[derive(Debug, Default, Clone)]
pub struct DirtyTracker {
    baseline: Vec<EntityId>,
}

impl DirtyTracker {
    pub fn new(baseline: Vec<EntityId>) -> Self {
        Self { baseline }
    }

    pub fn rebase(&mut self, order: Vec<EntityId>) {
        self.baseline = order;
    }

    pub fn baseline(&self) -> &[EntityId] {
        &self.baseline
    }

    /// Positional comparison. Reordering never changes the length, so a
    /// mismatch is a caller bug.
    pub fn is_dirty(&self, current: &[EntityId]) -> bool {
        assert_eq!(
            current.len(),
            self.baseline.len(),
            "current order length differs from sync baseline"
        );
        current.iter().zip(&self.baseline).any(|(a, b)| a != b)
    }
}
