pub mod commit;
pub mod dirty;
pub mod drag;
pub mod list_store;
pub mod manager;

pub use crate::domain::model::{Entity, EntityId, ListState, ReorderPayload};
pub use crate::domain::ports::{ConfigProvider, Notifier, OrderBackend, SessionStore};
pub use crate::utils::error::Result;
