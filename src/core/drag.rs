use crate::domain::model::EntityId;
use crate::utils::error::{ReorderError, Result};

const TIE_EPSILON: f64 = 1e-9;

/// Where the dragged row is currently hovering.
#[derive(Debug, Clone, PartialEq)]
pub enum DropTarget {
    /// The row currently occupying the drop slot.
    Entity(EntityId),
    /// Explicit position, used by keyboard navigation.
    Index(usize),
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Up,
    Down,
    Home,
    End,
    Confirm,
    Cancel,
}

/// A completed gesture: move the row at `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveIntent {
    pub from: usize,
    pub to: usize,
}

/// Pointer direction since the previous move event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Travel {
    Up,
    Down,
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    id: EntityId,
    target: Option<usize>,
    last_pointer: Option<f64>,
    travel: Option<Travel>,
}

/// Turns pointer and keyboard gestures into at most one `MoveIntent`.
///
/// The engine never touches the list: previews are computed on a copy and
/// the caller applies the intent returned by `drop` / `KeyCommand::Confirm`.
/// Only the dragged id is held; its source index is resolved against the
/// order passed in, so moves applied mid-gesture cannot redirect the drop.
#[derive(Debug, Default)]
pub struct DragEngine {
    active: Option<ActiveDrag>,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn dragged_id(&self) -> Option<&EntityId> {
        self.active.as_ref().map(|a| &a.id)
    }

    /// Picks up `id`. A gesture already in progress is abandoned.
    pub fn begin(&mut self, order: &[EntityId], id: &EntityId) -> Result<()> {
        let from = order
            .iter()
            .position(|candidate| candidate == id)
            .ok_or_else(|| ReorderError::UnknownEntity { id: id.to_string() })?;

        if let Some(previous) = self.active.take() {
            tracing::debug!("Abandoning drag of {} for new gesture", previous.id);
        }

        self.active = Some(ActiveDrag {
            id: id.clone(),
            target: Some(from),
            last_pointer: None,
            travel: None,
        });
        Ok(())
    }

    pub fn hover(&mut self, order: &[EntityId], target: DropTarget) -> Option<usize> {
        let active = self.active.as_mut()?;
        active.target = match target {
            DropTarget::Entity(id) => order.iter().position(|candidate| *candidate == id),
            DropTarget::Index(index) if index < order.len() => Some(index),
            DropTarget::Index(_) | DropTarget::Outside => None,
        };
        active.target
    }

    /// Pointer variant of `hover`: `centers[i]` is the vertical center of row
    /// `i` and `y` the pointer position. No rows means outside any drop zone.
    pub fn pointer_moved(&mut self, centers: &[f64], y: f64) -> Option<usize> {
        let active = self.active.as_mut()?;

        if let Some(last) = active.last_pointer {
            if y > last {
                active.travel = Some(Travel::Down);
            } else if y < last {
                active.travel = Some(Travel::Up);
            }
        }
        active.last_pointer = Some(y);

        active.target = closest_center(centers, y, active.travel);
        active.target
    }

    pub fn key(&mut self, command: KeyCommand, order: &[EntityId]) -> Option<MoveIntent> {
        match command {
            KeyCommand::Confirm => return self.drop(order),
            KeyCommand::Cancel => {
                self.cancel();
                return None;
            }
            _ => {}
        }

        let len = order.len();
        let from = self.source_index(order)?;
        let active = self.active.as_mut()?;
        let current = active.target.unwrap_or(from).min(len - 1);
        active.target = Some(match command {
            KeyCommand::Up => current.saturating_sub(1),
            KeyCommand::Down => (current + 1).min(len - 1),
            KeyCommand::Home => 0,
            KeyCommand::End => len - 1,
            KeyCommand::Confirm | KeyCommand::Cancel => current,
        });
        None
    }

    fn source_index(&self, order: &[EntityId]) -> Option<usize> {
        let active = self.active.as_ref()?;
        order.iter().position(|candidate| *candidate == active.id)
    }

    /// Order as it should be drawn mid-gesture.
    pub fn preview(&self, order: &[EntityId]) -> Vec<EntityId> {
        let mut preview = order.to_vec();
        let target = self.active.as_ref().and_then(|a| a.target);
        if let (Some(from), Some(to)) = (self.source_index(order), target) {
            if to < preview.len() {
                let id = preview.remove(from);
                preview.insert(to, id);
            }
        }
        preview
    }

    pub fn drop(&mut self, order: &[EntityId]) -> Option<MoveIntent> {
        let from = self.source_index(order);
        let active = self.active.take()?;
        match (from, active.target) {
            (Some(from), Some(to)) if to < order.len() => Some(MoveIntent { from, to }),
            (None, _) => {
                tracing::debug!("Dragged {} is no longer in the list", active.id);
                None
            }
            _ => {
                tracing::debug!("Drag of {} dropped outside a drop zone", active.id);
                None
            }
        }
    }

    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            tracing::debug!("Drag of {} cancelled", active.id);
        }
    }
}

/// Closest-center collision. Equidistant rows resolve to the one whose
/// center the pointer crossed last; without travel history, the lower index.
pub fn closest_center(centers: &[f64], y: f64, travel: Option<Travel>) -> Option<usize> {
    if y.is_nan() {
        return None;
    }

    let best = centers
        .iter()
        .map(|c| (c - y).abs())
        .fold(f64::INFINITY, f64::min);
    if !best.is_finite() {
        return None;
    }

    let tied: Vec<usize> = centers
        .iter()
        .enumerate()
        .filter(|(_, c)| ((*c - y).abs() - best).abs() <= TIE_EPSILON)
        .map(|(i, _)| i)
        .collect();

    let crossed = |i: &usize| match travel {
        Some(Travel::Down) => centers[*i] <= y,
        Some(Travel::Up) => centers[*i] >= y,
        None => true,
    };

    tied.iter()
        .copied()
        .find(|i| crossed(i))
        .or_else(|| tied.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<EntityId> {
        names.iter().map(|n| EntityId::from(*n)).collect()
    }

    #[test]
    fn test_drop_on_entity_yields_single_intent() {
        let order = ids(&["A", "B", "C", "D"]);
        let mut engine = DragEngine::new();
        engine.begin(&order, &EntityId::from("A")).unwrap();

        assert_eq!(engine.hover(&order, DropTarget::Entity("C".into())), Some(2));
        assert_eq!(engine.preview(&order), ids(&["B", "C", "A", "D"]));
        assert_eq!(engine.drop(&order), Some(MoveIntent { from: 0, to: 2 }));

        assert!(!engine.is_active());
        assert_eq!(engine.drop(&order), None);
    }

    #[test]
    fn test_cancel_discards_preview() {
        let order = ids(&["A", "B", "C"]);
        let mut engine = DragEngine::new();
        engine.begin(&order, &EntityId::from("C")).unwrap();
        engine.hover(&order, DropTarget::Index(0));
        assert_eq!(engine.preview(&order), ids(&["C", "A", "B"]));

        engine.cancel();
        assert_eq!(engine.preview(&order), order);
        assert_eq!(engine.drop(&order), None);
    }

    #[test]
    fn test_drop_outside_yields_nothing() {
        let order = ids(&["A", "B", "C"]);
        let mut engine = DragEngine::new();
        engine.begin(&order, &EntityId::from("B")).unwrap();
        engine.hover(&order, DropTarget::Index(0));
        engine.hover(&order, DropTarget::Outside);
        assert_eq!(engine.preview(&order), order);
        assert_eq!(engine.drop(&order), None);
    }

    #[test]
    fn test_begin_with_unknown_id_fails() {
        let mut engine = DragEngine::new();
        let err = engine
            .begin(&ids(&["A"]), &EntityId::from("Z"))
            .unwrap_err();
        assert!(matches!(err, ReorderError::UnknownEntity { .. }));
        assert!(!engine.is_active());
    }

    #[test]
    fn test_keyboard_navigation() {
        let order = ids(&["A", "B", "C", "D"]);
        let mut engine = DragEngine::new();
        engine.begin(&order, &EntityId::from("B")).unwrap();

        assert_eq!(engine.key(KeyCommand::Down, &order), None);
        assert_eq!(engine.key(KeyCommand::Down, &order), None);
        assert_eq!(engine.key(KeyCommand::Down, &order), None);
        assert_eq!(engine.preview(&order), ids(&["A", "C", "D", "B"]));
        assert_eq!(
            engine.key(KeyCommand::Confirm, &order),
            Some(MoveIntent { from: 1, to: 3 })
        );

        engine.begin(&order, &EntityId::from("C")).unwrap();
        engine.key(KeyCommand::Home, &order);
        assert_eq!(engine.key(KeyCommand::Cancel, &order), None);
        assert!(!engine.is_active());
    }

    #[test]
    fn test_closest_center_picks_nearest() {
        let centers = [10.0, 30.0, 50.0, 70.0];
        assert_eq!(closest_center(&centers, 33.0, None), Some(1));
        assert_eq!(closest_center(&centers, 100.0, None), Some(3));
        assert_eq!(closest_center(&[], 10.0, None), None);
    }

    #[test]
    fn test_closest_center_tie_break_follows_travel() {
        let centers = [10.0, 30.0, 50.0, 70.0];
        // 40.0 is exactly between rows 1 and 2.
        assert_eq!(closest_center(&centers, 40.0, None), Some(1));
        assert_eq!(closest_center(&centers, 40.0, Some(Travel::Down)), Some(1));
        assert_eq!(closest_center(&centers, 40.0, Some(Travel::Up)), Some(2));
    }

    #[test]
    fn test_pointer_gesture_tracks_direction() {
        let order = ids(&["A", "B", "C", "D"]);
        let centers = [10.0, 30.0, 50.0, 70.0];
        let mut engine = DragEngine::new();
        engine.begin(&order, &EntityId::from("D")).unwrap();

        assert_eq!(engine.pointer_moved(&centers, 70.0), Some(3));
        assert_eq!(engine.pointer_moved(&centers, 40.0), Some(2));
        assert_eq!(engine.drop(&order), Some(MoveIntent { from: 3, to: 2 }));

        engine.begin(&order, &EntityId::from("A")).unwrap();
        engine.pointer_moved(&centers, 10.0);
        assert_eq!(engine.pointer_moved(&centers, 40.0), Some(1));
        assert_eq!(engine.pointer_moved(&[], 40.0), None);
        assert_eq!(engine.drop(&order), None);
    }
}
