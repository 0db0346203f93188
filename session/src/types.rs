//! Session and auth state types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rbac::{PermissionGrant, PermissionMatrix, Role};

/// A back-office account. Identity data only; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// An authenticated admin session.
///
/// Created only by a successful login and owned exclusively by the store.
/// The grant list is snapshotted at login time and immutable afterwards; a
/// role change requires a fresh session. Impersonation toggles the two
/// impersonation fields and nothing else.
///
/// The serialized form is the persisted storage record, so field names are
/// part of the external interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: AdminUser,
    pub role: Role,
    pub permissions: Vec<PermissionGrant>,
    #[serde(default)]
    pub is_impersonating: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_admin_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Begin a fresh, non-impersonating session for `user` with the given
    /// grant snapshot.
    pub fn start(user: AdminUser, permissions: Vec<PermissionGrant>) -> Self {
        let role = user.role;
        Self {
            user,
            role,
            permissions,
            is_impersonating: false,
            original_admin_id: None,
            started_at: Utc::now(),
        }
    }
}

/// The one piece of process-wide state the engine owns.
///
/// Initialized empty, populated by `init()` or `login()`, cleared by
/// `logout()`. Every store mutation commits exactly one new snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthState {
    pub session: Option<Session>,
    pub is_loading: bool,
    pub is_authenticated: bool,
    pub permissions: PermissionMatrix,
}

impl AuthState {
    /// The initial, signed-out state: no session, nothing allowed.
    pub fn empty() -> Self {
        Self {
            session: None,
            is_loading: false,
            is_authenticated: false,
            permissions: PermissionMatrix::denied(),
        }
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::empty()
    }
}
