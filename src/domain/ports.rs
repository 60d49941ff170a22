use crate::domain::model::{Entity, Notification, PayloadShape, ReorderPayload};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Remote collection that owns the persisted order.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Entity>>;
    async fn commit(&self, payload: &ReorderPayload) -> Result<()>;
}

/// Sink for user-facing save/failure messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

pub trait SessionStore: Send + Sync {
    fn read(&self) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn write(&self, token: &str) -> impl std::future::Future<Output = Result<()>> + Send;
    fn clear(&self) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn collection_endpoint(&self) -> &str;
    fn reorder_path(&self) -> &str;
    fn list_field(&self) -> Option<&str>;
    fn entity_id_field(&self) -> &str;
    fn payload_shape(&self) -> PayloadShape;
    fn request_timeout(&self) -> Duration;
}
