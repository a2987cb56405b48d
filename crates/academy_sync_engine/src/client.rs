//! Push and pull of whole snapshots.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::state::{SyncStateMachine, SyncStatus};
use crate::transport::DocumentService;
use academy_core::{RecordStore, SnapshotCodec, SyncCredential};
use parking_lot::RwLock;
use std::time::SystemTime;
use tracing::{info, warn};

/// Statistics about push and pull.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Successful pushes.
    pub pushes: u64,
    /// Successful pulls.
    pub pulls: u64,
    /// Failed attempts, precondition failures included.
    pub failures: u64,
    /// Last error message.
    pub last_error: Option<String>,
    /// Remote id used by the last successful push or pull.
    pub last_remote_id: Option<String>,
    /// Completion time of the last successful push or pull.
    pub last_sync_time: Option<SystemTime>,
}

/// What a successful push did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// A new remote document was created and its id stored locally.
    Created {
        /// The new remote id.
        remote_id: String,
    },
    /// The known remote document was overwritten.
    Updated {
        /// The remote id.
        remote_id: String,
    },
}

impl PushOutcome {
    /// The remote id that now holds the snapshot.
    pub fn remote_id(&self) -> &str {
        match self {
            PushOutcome::Created { remote_id } | PushOutcome::Updated { remote_id } => remote_id,
        }
    }
}

/// Backs a [`RecordStore`] up to a [`DocumentService`] and restores it.
///
/// Every push and pull is a single user-initiated shot: there is no retry,
/// merge or background scheduling. The local store is only written after a
/// remote call has fully succeeded, so a failure never leaves it partially
/// modified.
pub struct SyncClient<S: DocumentService> {
    service: S,
    codec: SnapshotCodec,
    state: SyncStateMachine,
    stats: RwLock<SyncStats>,
}

impl<S: DocumentService> SyncClient<S> {
    /// Creates a client.
    pub fn new(service: S, config: &SyncConfig) -> Self {
        Self {
            service,
            codec: SnapshotCodec::default(),
            state: SyncStateMachine::new(config.display_interval),
            stats: RwLock::new(SyncStats::default()),
        }
    }

    /// The document service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// The status state machine; clones observe the same status.
    pub fn state_machine(&self) -> &SyncStateMachine {
        &self.state
    }

    /// Current status.
    pub fn status(&self) -> SyncStatus {
        self.state.status()
    }

    /// Current statistics.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Uploads the store's snapshot.
    ///
    /// Without a remote id a new document is created and its id stored in
    /// the credential; otherwise the known document is overwritten.
    ///
    /// # Errors
    ///
    /// - `AlreadySyncing` if another push or pull is running
    /// - `MissingCredential` if no token is configured
    /// - `RemoteNotFound` if the known remote id is stale
    /// - `SyncFailed` on network or authorization failure
    pub async fn push(&self, store: &mut RecordStore) -> SyncResult<PushOutcome> {
        let ticket = self.state.begin()?;
        let result = self.push_inner(store).await;
        match &result {
            Ok(outcome) => {
                self.record_success(outcome.remote_id(), |stats| stats.pushes += 1);
                ticket.succeed();
            }
            Err(e) => {
                self.record_failure(e);
                ticket.fail(e.to_string());
            }
        }
        result
    }

    async fn push_inner(&self, store: &mut RecordStore) -> SyncResult<PushOutcome> {
        let credential = store
            .credential()
            .cloned()
            .ok_or(SyncError::MissingCredential)?;
        let document = self.codec.encode(store.state())?;
        let records = store.snapshot().record_count();

        match credential.remote_id() {
            Some(remote_id) => {
                info!(remote_id, records, "pushing snapshot");
                self.service
                    .update_document(credential.token(), remote_id, &document)
                    .await?;
                info!(remote_id, "push complete");
                Ok(PushOutcome::Updated {
                    remote_id: remote_id.to_string(),
                })
            }
            None => {
                info!(records, "pushing snapshot to a new remote document");
                let remote_id = self
                    .service
                    .create_document(credential.token(), &document)
                    .await?;
                store.set_remote_id(&remote_id);
                info!(remote_id = %remote_id, "push complete, remote id stored");
                Ok(PushOutcome::Created { remote_id })
            }
        }
    }

    /// Replaces the store with the remote snapshot, keeping the local
    /// credential. Local changes since the last push are lost; callers
    /// confirm with the user first.
    ///
    /// # Errors
    ///
    /// - `AlreadySyncing` if another push or pull is running
    /// - `MissingCredential` / `MissingRemoteId` if either is absent
    /// - `RemoteNotFound` if the remote id is stale
    /// - `MalformedSnapshot` if the fetched document does not decode
    /// - `SyncFailed` on network or authorization failure
    pub async fn pull(&self, store: &mut RecordStore) -> SyncResult<usize> {
        let ticket = self.state.begin()?;
        let result = self.pull_inner(store).await;
        match &result {
            Ok(_) => {
                let remote_id = store
                    .credential()
                    .and_then(SyncCredential::remote_id)
                    .unwrap_or_default()
                    .to_string();
                self.record_success(&remote_id, |stats| stats.pulls += 1);
                ticket.succeed();
            }
            Err(e) => {
                self.record_failure(e);
                ticket.fail(e.to_string());
            }
        }
        result
    }

    async fn pull_inner(&self, store: &mut RecordStore) -> SyncResult<usize> {
        let credential = store
            .credential()
            .cloned()
            .ok_or(SyncError::MissingCredential)?;
        let remote_id = credential.remote_id().ok_or(SyncError::MissingRemoteId)?;

        info!(remote_id, "pulling snapshot");
        let document = self
            .service
            .fetch_document(credential.token(), remote_id)
            .await?;
        let restored = self.codec.decode(&document, Some(credential.clone()))?;
        let records = restored.snapshot.record_count();

        store.replace_state(restored);
        info!(remote_id, records, "pull complete, local store replaced");
        Ok(records)
    }

    fn record_success(&self, remote_id: &str, bump: impl FnOnce(&mut SyncStats)) {
        let mut stats = self.stats.write();
        bump(&mut stats);
        stats.last_remote_id = Some(remote_id.to_string());
        stats.last_sync_time = Some(SystemTime::now());
    }

    fn record_failure(&self, err: &SyncError) {
        warn!(error = %err, "sync failed");
        let mut stats = self.stats.write();
        stats.failures += 1;
        stats.last_error = Some(err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryDocumentService;
    use academy_core::{Gender, NewStaff};

    fn client(service: &MemoryDocumentService) -> SyncClient<MemoryDocumentService> {
        SyncClient::new(service.clone(), &SyncConfig::default())
    }

    fn store_with_staff() -> RecordStore {
        let mut store = RecordStore::in_memory();
        store.add_staff(NewStaff {
            name: "Amina".into(),
            gender: Gender::Female,
            phone: "1".into(),
            email: None,
            specialization: None,
            year_started: 2019,
        });
        store
    }

    #[tokio::test]
    async fn push_without_credential_fails_before_network() {
        let service = MemoryDocumentService::new();
        let client = client(&service);
        let mut store = store_with_staff();

        let err = client.push(&mut store).await.unwrap_err();
        assert_eq!(err, SyncError::MissingCredential);
        assert!(service.is_empty());
        assert_eq!(client.stats().failures, 1);
        assert!(matches!(client.status(), SyncStatus::Error(_)));
    }

    #[tokio::test]
    async fn push_creates_then_updates() {
        let service = MemoryDocumentService::new();
        let client = client(&service);
        let mut store = store_with_staff();
        store.set_credential("tok", None);

        let first = client.push(&mut store).await.unwrap();
        let PushOutcome::Created { remote_id } = &first else {
            panic!("expected a create, got {first:?}");
        };
        assert_eq!(store.credential().unwrap().remote_id(), Some(remote_id.as_str()));

        let second = client.push(&mut store).await.unwrap();
        assert_eq!(second, PushOutcome::Updated { remote_id: remote_id.clone() });
        assert_eq!(service.create_count(), 1);
        assert_eq!(service.update_count(), 1);
        assert_eq!(client.stats().pushes, 2);
        assert_eq!(client.status(), SyncStatus::Success);

        let stored = service.document(remote_id).unwrap();
        assert!(!stored.contains("tok"));
    }

    #[tokio::test]
    async fn failed_push_leaves_store_untouched() {
        let service = MemoryDocumentService::new();
        service.set_failure(Some("network unreachable".into()));
        let client = client(&service);
        let mut store = store_with_staff();
        store.set_credential("tok", None);
        let before = store.state().clone();

        let err = client.push(&mut store).await.unwrap_err();
        assert_eq!(err, SyncError::failed("network unreachable"));
        assert_eq!(store.state(), &before);
        assert_eq!(
            client.status(),
            SyncStatus::Error("sync failed: network unreachable".into())
        );
    }

    #[tokio::test]
    async fn pull_requires_remote_id() {
        let service = MemoryDocumentService::new();
        let client = client(&service);
        let mut store = store_with_staff();
        store.set_credential("tok", None);
        let before = store.state().clone();

        assert_eq!(
            client.pull(&mut store).await.unwrap_err(),
            SyncError::MissingRemoteId
        );
        assert_eq!(store.state(), &before);
    }

    #[tokio::test]
    async fn malformed_remote_document_is_rejected() {
        let service = MemoryDocumentService::new();
        service.insert("g1", r#"{"staff": []}"#);
        let client = client(&service);
        let mut store = store_with_staff();
        store.set_credential("tok", Some("g1".into()));
        let before = store.state().clone();

        let err = client.pull(&mut store).await.unwrap_err();
        assert!(matches!(err, SyncError::MalformedSnapshot(_)));
        assert_eq!(store.state(), &before);
    }

    #[tokio::test]
    async fn busy_client_rejects_second_sync() {
        let service = MemoryDocumentService::new();
        let client = client(&service);
        let mut store = store_with_staff();
        store.set_credential("tok", None);

        let _ticket = client.state_machine().begin().unwrap();
        assert_eq!(
            client.push(&mut store).await.unwrap_err(),
            SyncError::AlreadySyncing
        );
        assert!(service.is_empty());
        assert_eq!(client.status(), SyncStatus::Syncing);
    }
}
