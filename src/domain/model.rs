use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use crate::utils::error::{ReorderError, Result};

/// Opaque, stable identifier of a reorderable entity.
///
/// Remembers whether the backend served it as a JSON integer so the commit
/// body sends it back in the same form. `1` and `"1"` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    text: String,
    numeric: bool,
}

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            text: id.into(),
            numeric: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric
    }

    /// 後端可能以字串或整數回傳 id
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Self::new(s.clone())),
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Self {
                text: n.to_string(),
                numeric: true,
            }),
            other => Err(ReorderError::DecodeError {
                message: format!("entity id must be a string or integer, got {}", other),
            }),
        }
    }

    pub fn to_json(&self) -> Value {
        if self.numeric {
            let number = self
                .text
                .parse::<i64>()
                .map(Value::from)
                .or_else(|_| self.text.parse::<u64>().map(Value::from));
            if let Ok(number) = number {
                return number;
            }
        }
        Value::String(self.text.clone())
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A reorderable item (offer, product). The payload is display data only.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub payload: Map<String, Value>,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            payload: Map::new(),
        }
    }

    /// 從 API 回傳的 JSON 物件建立，`id_field` 之外的欄位保留為 payload
    pub fn from_json(value: Value, id_field: &str) -> Result<Self> {
        let Value::Object(mut obj) = value else {
            return Err(ReorderError::DecodeError {
                message: "list item is not a JSON object".to_string(),
            });
        };

        let raw_id = obj.remove(id_field).ok_or_else(|| ReorderError::DecodeError {
            message: format!("list item is missing the '{}' field", id_field),
        })?;

        Ok(Self {
            id: EntityId::from_json(&raw_id)?,
            payload: obj,
        })
    }

    pub fn title(&self) -> Option<&str> {
        ["title", "name"]
            .iter()
            .find_map(|key| self.payload.get(*key).and_then(Value::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedItem {
    pub id: EntityId,
    pub rank: usize,
}

/// Full ordered id/rank list sent in one commit request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReorderPayload {
    pub items: Vec<RankedItem>,
}

impl ReorderPayload {
    /// Ranks are 1-based positions in `order`.
    pub fn from_order(order: &[EntityId]) -> Self {
        let items = order
            .iter()
            .enumerate()
            .map(|(index, id)| RankedItem {
                id: id.clone(),
                rank: index + 1,
            })
            .collect();
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    pub fn to_json(&self, shape: &PayloadShape) -> Value {
        let items = self
            .items
            .iter()
            .map(|item| {
                let mut entry = Map::new();
                entry.insert(shape.id_field.clone(), item.id.to_json());
                entry.insert(shape.rank_field.clone(), Value::from(item.rank));
                Value::Object(entry)
            })
            .collect();

        let mut body = Map::new();
        body.insert(shape.items_field.clone(), Value::Array(items));
        Value::Object(body)
    }
}

/// Field names of the reorder body for one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadShape {
    pub items_field: String,
    pub id_field: String,
    pub rank_field: String,
}

impl PayloadShape {
    pub fn offers() -> Self {
        Self {
            rank_field: "sort_order".to_string(),
            ..Self::default()
        }
    }

    pub fn products() -> Self {
        Self {
            rank_field: "order".to_string(),
            ..Self::default()
        }
    }
}

impl Default for PayloadShape {
    fn default() -> Self {
        Self {
            items_field: "items".to_string(),
            id_field: "id".to_string(),
            rank_field: "rank".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Clean,
    Dirty,
    Committing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Failure,
            message: message.into(),
            at: Utc::now(),
        }
    }
}
