use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use shared::{
    domain::{PolicyRecord, PolicyRow},
    error::TransportError,
    protocol::PolicyCoreEvent,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

mod http_client;
pub use http_client::HttpPolicyClient;

/// Access to the replication management API. One implementation per
/// transport; the controller only sees this seam.
#[async_trait]
pub trait PolicyClient: Send + Sync {
    /// Fetches the unfiltered, all-scopes view of sync policy groups,
    /// bucket-level policies included.
    async fn list_policies(&self) -> Result<Vec<PolicyRecord>, TransportError>;

    /// Deletes one policy group, optionally qualified by bucket. Not
    /// retried by the core; a not-found response is terminal for the item.
    async fn delete_policy(
        &self,
        group_name: &str,
        bucket: Option<&str>,
    ) -> Result<(), TransportError>;
}

/// Stand-in used while no management endpoint is configured.
pub struct MissingPolicyClient;

#[async_trait]
impl PolicyClient for MissingPolicyClient {
    async fn list_policies(&self) -> Result<Vec<PolicyRecord>, TransportError> {
        Err(TransportError::new("policy endpoint is unavailable"))
    }

    async fn delete_policy(
        &self,
        group_name: &str,
        _bucket: Option<&str>,
    ) -> Result<(), TransportError> {
        Err(TransportError::new(format!(
            "policy endpoint is unavailable; cannot delete group {group_name}"
        )))
    }
}

/// Builds display rows from raw records, one per record, in input order.
/// Fields are copied verbatim; placeholder substitution for absent scopes
/// happens at display time, never here.
pub fn project(records: &[PolicyRecord]) -> Vec<PolicyRow> {
    records
        .iter()
        .map(|record| {
            let bucket_scope = record.bucket_name.as_deref().unwrap_or("");
            PolicyRow {
                unique_id: format!("{}{}", record.id, bucket_scope),
                group_name: record.id.clone(),
                status: record.status.clone(),
                bucket: record.bucket_name.clone(),
                zonegroup: record.zonegroup.clone(),
            }
        })
        .collect()
}

/// Holds the ids of the rows the operator currently has selected. Ids
/// rather than rows, so a wholesale row rebuild can never leave the
/// selection pointing at stale data; resolution happens against whatever
/// row sequence is current.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    unique_ids: Vec<String>,
}

impl SelectionTracker {
    /// Replaces the selection wholesale.
    pub fn set(&mut self, unique_ids: Vec<String>) {
        self.unique_ids = unique_ids;
    }

    pub fn clear(&mut self) {
        self.unique_ids.clear();
    }

    pub fn current(&self) -> &[String] {
        &self.unique_ids
    }

    /// Re-derives selected rows against the latest sequence, preserving
    /// selection order. Ids that no longer resolve are dropped.
    pub fn resolve(&self, rows: &[PolicyRow]) -> Vec<PolicyRow> {
        self.unique_ids
            .iter()
            .filter_map(|id| rows.iter().find(|row| &row.unique_id == id).cloned())
            .collect()
    }
}

/// One delete that did not land, identified for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFailure {
    pub group_name: String,
    pub error: TransportError,
}

/// Aggregate result of one bulk-delete invocation. `attempted` is the
/// audit label: group names in selection order, duplicates kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub attempted: Vec<String>,
    pub failed: Vec<DeleteFailure>,
}

impl DeleteOutcome {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Owns the listing/projection flow and the bulk-delete coordinator.
/// State is transient; every refresh reconstructs it from the server.
pub struct SyncPolicyController {
    client: Arc<dyn PolicyClient>,
    rows: Mutex<Vec<PolicyRow>>,
    selection: Mutex<SelectionTracker>,
    events: broadcast::Sender<PolicyCoreEvent>,
}

impl SyncPolicyController {
    pub fn new(client: Arc<dyn PolicyClient>) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            client,
            rows: Mutex::new(Vec::new()),
            selection: Mutex::new(SelectionTracker::default()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<PolicyCoreEvent> {
        self.events.subscribe()
    }

    pub async fn rows(&self) -> Vec<PolicyRow> {
        self.rows.lock().await.clone()
    }

    /// Replaces the tracked selection wholesale with row ids reported by
    /// the presentation adapter.
    pub async fn set_selection(&self, unique_ids: Vec<String>) {
        self.selection.lock().await.set(unique_ids);
    }

    /// The selection resolved against the current row sequence.
    pub async fn selected_rows(&self) -> Vec<PolicyRow> {
        let rows = { self.rows.lock().await.clone() };
        self.selection.lock().await.resolve(&rows)
    }

    /// Rebuilds the row sequence wholesale from the authoritative listing.
    /// On transport failure the previously delivered rows stay untouched;
    /// stale rows are preferred over a blanked table.
    pub async fn refresh(&self) -> Result<Vec<PolicyRow>, TransportError> {
        let records = match self.client.list_policies().await {
            Ok(records) => records,
            Err(err) => {
                warn!("sync-policy: listing failed: {err}");
                let _ = self.events.send(PolicyCoreEvent::FetchFailed {
                    message: err.to_string(),
                });
                return Err(err);
            }
        };

        let rows = project(&records);
        {
            let mut guard = self.rows.lock().await;
            *guard = rows.clone();
        }
        let _ = self
            .events
            .send(PolicyCoreEvent::RowsUpdated { rows: rows.clone() });
        Ok(rows)
    }

    /// Fans out one delete per selected row, waits for every call to
    /// settle independently, then reconciles the display with exactly one
    /// refresh regardless of the aggregate outcome. An empty selection is
    /// a no-op: zero client calls and no refresh.
    pub async fn delete_selected(&self) -> DeleteOutcome {
        let selected = self.selected_rows().await;
        if selected.is_empty() {
            return DeleteOutcome::default();
        }

        let group_names: Vec<String> = selected
            .iter()
            .map(|row| row.group_name.clone())
            .collect();
        info!(
            count = selected.len(),
            groups = ?group_names,
            "sync-policy: bulk delete dispatched"
        );

        let results = join_all(selected.iter().map(|row| {
            let client = Arc::clone(&self.client);
            async move {
                client
                    .delete_policy(&row.group_name, row.bucket.as_deref())
                    .await
            }
        }))
        .await;

        let failed: Vec<DeleteFailure> = selected
            .iter()
            .zip(results)
            .filter_map(|(row, result)| {
                result.err().map(|error| {
                    warn!(group_name = %row.group_name, "sync-policy: delete failed: {error}");
                    DeleteFailure {
                        group_name: row.group_name.clone(),
                        error,
                    }
                })
            })
            .collect();

        let outcome = DeleteOutcome {
            attempted: group_names.clone(),
            failed,
        };

        if outcome.is_success() {
            info!(
                count = outcome.attempted.len(),
                "sync-policy: bulk delete completed"
            );
            self.selection.lock().await.clear();
            let _ = self
                .events
                .send(PolicyCoreEvent::DeleteCompleted { group_names });
        } else {
            warn!(
                failed = outcome.failed.len(),
                attempted = outcome.attempted.len(),
                "sync-policy: bulk delete finished with failures"
            );
            let failed_group_names = outcome
                .failed
                .iter()
                .map(|failure| failure.group_name.clone())
                .collect();
            let _ = self
                .events
                .send(PolicyCoreEvent::DeleteFailed { failed_group_names });
        }

        // Some deletions may have landed even when the aggregate failed;
        // the display must follow the server state.
        if let Err(err) = self.refresh().await {
            warn!("sync-policy: post-delete refresh failed: {err}");
        }

        outcome
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
