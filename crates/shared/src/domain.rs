use serde::{Deserialize, Serialize};

/// Rendered in place of an absent or empty bucket/zonegroup scope.
pub const SCOPE_PLACEHOLDER: &str = "-";

/// Status values the replication service is known to emit. Anything else
/// is passed through to the presentation layer unmodified.
const KNOWN_STATUSES: [&str; 3] = ["enabled", "allowed", "forbidden"];

/// One sync-policy group as returned by the management API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRecord {
    pub id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zonegroup: Option<String>,
}

/// One sync-policy group shaped for display. Immutable once projected;
/// the whole sequence is rebuilt on every refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRow {
    /// `group_name` concatenated with the bucket scope (empty when the
    /// group is zonegroup-wide). A group without a bucket and the same
    /// group with an empty-string bucket therefore collide; that quirk
    /// matches the upstream dashboard and is kept as-is.
    pub unique_id: String,
    pub group_name: String,
    pub status: String,
    pub bucket: Option<String>,
    pub zonegroup: Option<String>,
}

impl PolicyRow {
    /// Title-cased status for known vocabulary, raw value otherwise.
    pub fn display_status(&self) -> String {
        display_status(&self.status)
    }

    pub fn display_bucket(&self) -> &str {
        display_scope(self.bucket.as_deref())
    }

    pub fn display_zonegroup(&self) -> &str {
        display_scope(self.zonegroup.as_deref())
    }
}

pub fn display_status(status: &str) -> String {
    if !KNOWN_STATUSES
        .iter()
        .any(|known| status.eq_ignore_ascii_case(known))
    {
        return status.to_string();
    }
    let mut chars = status.chars();
    match chars.next() {
        Some(first) => {
            first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
        }
        None => String::new(),
    }
}

fn display_scope(value: Option<&str>) -> &str {
    match value {
        Some(scope) if !scope.is_empty() => scope,
        _ => SCOPE_PLACEHOLDER,
    }
}
