use serde::{Deserialize, Serialize};

use crate::domain::PolicyRow;

/// Events the core emits toward the presentation adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum PolicyCoreEvent {
    /// The row sequence was rebuilt wholesale from a successful listing.
    RowsUpdated { rows: Vec<PolicyRow> },
    /// A listing attempt failed; previously delivered rows remain valid.
    FetchFailed { message: String },
    /// Every delete in the bulk operation succeeded.
    DeleteCompleted { group_names: Vec<String> },
    /// At least one delete failed; successful deletions were not rolled
    /// back and a reconciling refresh follows.
    DeleteFailed { failed_group_names: Vec<String> },
}
