//! Optimistic-sync bookkeeping.
//!
//! Every edit applies locally first; background requests are fire-and-forget
//! and owned by the transport layer. The reconciler only remembers which
//! client-generated temporary ids still await an authoritative response, so
//! a late server patch can be matched up or dismissed as stale. Failures
//! keep local state: logged, never rolled back, never retried.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What a pending background request will deliver when it lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingKind {
    /// Reverse-geocoded display name for a freshly spawned cluster.
    ClusterName { city: String },
}

/// How an authoritative patch landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied,
    /// The temp id is unknown or its target is gone; the patch is a no-op.
    Stale,
}

/// Registry of in-flight requests keyed by client temp id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncReconciler {
    pending: HashMap<String, PendingKind>,
}

impl SyncReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, temp_id: impl Into<String>, kind: PendingKind) {
        let temp_id = temp_id.into();
        debug!("Tracking background request {}", temp_id);
        self.pending.insert(temp_id, kind);
    }

    /// Claim a pending request. Returns `None` when the id was never tracked
    /// or already settled, which makes the caller's patch stale.
    pub fn resolve(&mut self, temp_id: &str) -> Option<PendingKind> {
        self.pending.remove(temp_id)
    }

    /// A background request failed. Local state stands; nothing is retried.
    pub fn fail(&mut self, temp_id: &str, reason: &str) {
        if self.pending.remove(temp_id).is_some() {
            warn!(
                "Background request {} failed ({}); keeping local state",
                temp_id, reason
            );
        } else {
            debug!("Failure report for unknown request {} ignored", temp_id);
        }
    }

    pub fn is_pending(&self, temp_id: &str) -> bool {
        self.pending.contains_key(temp_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Pending temp ids in sorted order.
    pub fn pending_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.pending.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
