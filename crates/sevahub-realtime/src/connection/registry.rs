//! Connection registry — user identity → set of live connection handles.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use super::handle::{ConnectionHandle, ConnectionId};

/// Thread-safe, process-local registry of live connections.
///
/// Caches "who is currently reachable"; never the source of truth for
/// delivery history, and rebuilt from zero on restart. A handle appears
/// under at most one user at a time, and a user entry is removed the moment
/// its handle set becomes empty. All operations are synchronous and keep
/// their lock scope to a single map entry, so registering, unregistering,
/// and enumerating may race freely across users without dropping or
/// duplicating a handle.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    /// User ID → live connection handles (a user may hold many: tabs, devices).
    by_user: DashMap<Uuid, Vec<Arc<ConnectionHandle>>>,
    /// Connection ID → handle, for owner-agnostic removal.
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection under its user.
    pub fn register(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, Arc::clone(&handle));
        self.by_user.entry(handle.user_id).or_default().push(handle);
    }

    /// Removes a connection without the caller knowing which user owns it.
    ///
    /// Drops the user entry if this was the user's last connection.
    pub fn unregister(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.by_id.remove(conn_id)?;
        if let Some(mut handles) = self.by_user.get_mut(&handle.user_id) {
            handles.retain(|h| h.id != *conn_id);
            if handles.is_empty() {
                drop(handles);
                self.by_user.remove(&handle.user_id);
            }
        }
        Some(handle)
    }

    /// All live handles for a user (possibly empty).
    pub fn handles_for(&self, user_id: Uuid) -> Vec<Arc<ConnectionHandle>> {
        self.by_user
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Whether the user has at least one registered connection.
    pub fn is_connected(&self, user_id: Uuid) -> bool {
        self.by_user.contains_key(&user_id)
    }

    /// Total number of live connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Number of distinct connected users.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }
}
