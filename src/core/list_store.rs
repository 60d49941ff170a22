use crate::domain::model::{Entity, EntityId};
use crate::utils::error::{ReorderError, Result};
use std::collections::HashMap;

/// Current displayed order of the collection.
#[derive(Debug, Default, Clone)]
pub struct EntityListStore {
    entities: Vec<Entity>,
}

impl EntityListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以伺服器資料完整取代目前的序列
    pub fn load(&mut self, entities: Vec<Entity>) -> Result<()> {
        let mut seen = HashMap::with_capacity(entities.len());
        for (index, entity) in entities.iter().enumerate() {
            if let Some(first) = seen.insert(entity.id.clone(), index) {
                return Err(ReorderError::DecodeError {
                    message: format!(
                        "duplicate entity id '{}' at positions {} and {}",
                        entity.id, first, index
                    ),
                });
            }
        }
        self.entities = entities;
        Ok(())
    }

    pub fn current_order(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id.clone()).collect()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Array-move: remove at `from`, reinsert at `to`.
    /// Returns whether the order actually changed.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<bool> {
        let len = self.entities.len();
        for index in [from, to] {
            if index >= len {
                return Err(ReorderError::IndexOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(false);
        }

        let entity = self.entities.remove(from);
        self.entities.insert(to, entity);
        Ok(true)
    }

    /// Reorders the held entities to `order`, which must be a permutation of
    /// the current ids.
    pub fn restore_order(&mut self, order: &[EntityId]) -> Result<()> {
        assert_eq!(
            order.len(),
            self.entities.len(),
            "restore_order called with an order of different length"
        );

        let mut by_id: HashMap<EntityId, Entity> = self
            .entities
            .iter()
            .map(|e| (e.id.clone(), e.clone()))
            .collect();

        let mut restored = Vec::with_capacity(order.len());
        for id in order {
            let entity = by_id.remove(id).ok_or_else(|| ReorderError::UnknownEntity {
                id: id.to_string(),
            })?;
            restored.push(entity);
        }

        self.entities = restored;
        Ok(())
    }

    /// (1-based position, entity) pairs for the per-row badge.
    pub fn position_badges(&self) -> impl Iterator<Item = (usize, &Entity)> {
        self.entities.iter().enumerate().map(|(i, e)| (i + 1, e))
    }
}
