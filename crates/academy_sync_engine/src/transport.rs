//! Remote document service abstraction.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// A remote store of whole documents.
///
/// The service is a dumb blob target: documents are created, overwritten
/// and fetched wholesale, authorized by a bearer token sent with each call.
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Stores a new document and returns its id.
    async fn create_document(&self, token: &str, content: &str) -> SyncResult<String>;

    /// Overwrites an existing document.
    async fn update_document(&self, token: &str, id: &str, content: &str) -> SyncResult<()>;

    /// Fetches a document's content.
    async fn fetch_document(&self, token: &str, id: &str) -> SyncResult<String>;
}

#[derive(Debug, Default)]
struct MemoryState {
    documents: HashMap<String, String>,
    next_id: u64,
    accepted_token: Option<String>,
    failure: Option<String>,
    creates: usize,
    updates: usize,
}

impl MemoryState {
    fn check(&self, token: &str) -> SyncResult<()> {
        if let Some(reason) = &self.failure {
            return Err(SyncError::failed(reason.clone()));
        }
        match &self.accepted_token {
            Some(accepted) if accepted != token => {
                Err(SyncError::failed("authorization failed: Bad credentials"))
            }
            _ => Ok(()),
        }
    }
}

/// An in-process document service.
///
/// Clones share documents, so several sync clients can exchange snapshots
/// through one instance.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentService {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDocumentService {
    /// Creates an empty service accepting any token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts only `token`; other tokens fail authorization.
    pub fn require_token(&self, token: impl Into<String>) {
        self.state.lock().accepted_token = Some(token.into());
    }

    /// Makes every call fail with `reason` until cleared with `None`.
    pub fn set_failure(&self, reason: Option<String>) {
        self.state.lock().failure = reason;
    }

    /// Stores a document under a chosen id.
    pub fn insert(&self, id: impl Into<String>, content: impl Into<String>) {
        self.state.lock().documents.insert(id.into(), content.into());
    }

    /// Deletes a document, returning its content.
    pub fn remove(&self, id: &str) -> Option<String> {
        self.state.lock().documents.remove(id)
    }

    /// Returns a document's content.
    pub fn document(&self, id: &str) -> Option<String> {
        self.state.lock().documents.get(id).cloned()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.state.lock().documents.len()
    }

    /// Returns true if no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.state.lock().documents.is_empty()
    }

    /// Number of successful creates.
    pub fn create_count(&self) -> usize {
        self.state.lock().creates
    }

    /// Number of successful updates.
    pub fn update_count(&self) -> usize {
        self.state.lock().updates
    }
}

#[async_trait]
impl DocumentService for MemoryDocumentService {
    async fn create_document(&self, token: &str, content: &str) -> SyncResult<String> {
        let mut state = self.state.lock();
        state.check(token)?;
        state.next_id += 1;
        let id = format!("doc-{}", state.next_id);
        state.documents.insert(id.clone(), content.to_string());
        state.creates += 1;
        Ok(id)
    }

    async fn update_document(&self, token: &str, id: &str, content: &str) -> SyncResult<()> {
        let mut state = self.state.lock();
        state.check(token)?;
        let document = state
            .documents
            .get_mut(id)
            .ok_or_else(|| SyncError::RemoteNotFound { id: id.to_string() })?;
        *document = content.to_string();
        state.updates += 1;
        Ok(())
    }

    async fn fetch_document(&self, token: &str, id: &str) -> SyncResult<String> {
        let state = self.state.lock();
        state.check(token)?;
        state
            .documents
            .get(id)
            .cloned()
            .ok_or_else(|| SyncError::RemoteNotFound { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_update_fetch() {
        let service = MemoryDocumentService::new();
        let id = service.create_document("t", "one").await.unwrap();
        service.update_document("t", &id, "two").await.unwrap();

        assert_eq!(service.fetch_document("t", &id).await.unwrap(), "two");
        assert_eq!(service.create_count(), 1);
        assert_eq!(service.update_count(), 1);
        assert_eq!(service.len(), 1);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let service = MemoryDocumentService::new();
        assert_eq!(
            service.fetch_document("t", "nope").await.unwrap_err(),
            SyncError::RemoteNotFound { id: "nope".into() }
        );
        assert!(matches!(
            service.update_document("t", "nope", "x").await,
            Err(SyncError::RemoteNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn rejects_tokens_and_injected_failures() {
        let service = MemoryDocumentService::new();
        service.require_token("good");
        assert!(matches!(
            service.create_document("bad", "x").await,
            Err(SyncError::SyncFailed(_))
        ));

        service.set_failure(Some("network unreachable".into()));
        assert_eq!(
            service.create_document("good", "x").await.unwrap_err(),
            SyncError::failed("network unreachable")
        );

        service.set_failure(None);
        assert!(service.create_document("good", "x").await.is_ok());
    }
}
