use crate::domain::ports::SessionStore;
use crate::utils::error::Result;
use std::sync::{Arc, PoisonError, RwLock};

/// Read side of a session, shared with HTTP clients. Always reflects the
/// latest sign-in or sign-out on the owning `SessionContext`.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    token: Arc<RwLock<Option<String>>>,
}

impl SessionHandle {
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }
}

/// Auth token holder handed to the components that need it.
///
/// Lifecycle: `restore` once at startup, `sign_in` / `sign_out` on explicit
/// user action. Reads go through `token()` or a `SessionHandle` and never
/// touch the store.
pub struct SessionContext<S: SessionStore> {
    store: S,
    handle: SessionHandle,
}

impl<S: SessionStore> SessionContext<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            handle: SessionHandle::default(),
        }
    }

    pub async fn restore(&mut self) -> Result<Option<String>> {
        let token = self
            .store
            .read()
            .await?
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        tracing::debug!("Session restored (token present: {})", token.is_some());
        self.handle.set(token.clone());
        Ok(token)
    }

    pub async fn sign_in(&mut self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        self.store.write(&token).await?;
        self.handle.set(Some(token));
        Ok(())
    }

    pub async fn sign_out(&mut self) -> Result<()> {
        self.store.clear().await?;
        self.handle.set(None);
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.handle.token()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }
}
