//! Session store for the admin back office.
//!
//! This crate owns the authenticated session lifecycle: login against the
//! credential directory, permission matrix resolution, persistence of the
//! session record, restore at startup, and admin impersonation.
//!
//! The store is an explicit service object, constructed once and shared by
//! reference; there is no module-level global. Every mutation commits
//! exactly one new [`AuthState`] snapshot and publishes it on a watch
//! channel, so consumers observe whole states, never partial transitions.

pub mod directory;
pub mod error;
mod impersonation;
pub mod types;

use std::sync::Arc;

use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, error, info, warn};

use rbac::{grants_allow, Action, Resource, Role, RoleTable};
use storage::{MemoryStore, SessionStorage};

pub use directory::{CredentialDirectory, DirectoryEntry, StaticDirectory};
pub use error::{AuthError, Result};
pub use types::{AdminUser, AuthState, Session};

/// Storage key for the persisted session record.
pub const SESSION_KEY: &str = "admin_session";

/// The admin session store.
///
/// Holds the current [`AuthState`], resolves permissions through the role
/// table, and reads/writes the session record through the injected
/// persistence port. All collaborators are injected so tests and multiple
/// tenants can each wire their own instance.
pub struct SessionStore {
    state: RwLock<AuthState>,
    publisher: watch::Sender<AuthState>,
    storage: Arc<dyn SessionStorage>,
    directory: Arc<dyn CredentialDirectory>,
    roles: RoleTable,
    // Serializes concurrent login attempts; without it two interleaved
    // logins would race on is_loading and last-write-wins the session.
    login_gate: Mutex<()>,
}

impl SessionStore {
    pub fn new(
        storage: Arc<dyn SessionStorage>,
        directory: Arc<dyn CredentialDirectory>,
        roles: RoleTable,
    ) -> Self {
        let initial = AuthState::empty();
        let (publisher, _) = watch::channel(initial.clone());
        Self {
            state: RwLock::new(initial),
            publisher,
            storage,
            directory,
            roles,
            login_gate: Mutex::new(()),
        }
    }

    /// A store over in-memory storage, the mock directory, and the built-in
    /// role table.
    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(StaticDirectory::seeded()),
            RoleTable::builtin(),
        )
    }

    /// Restore a previously persisted session, if one exists.
    ///
    /// A corrupt record is deleted and the state left empty; nothing is
    /// surfaced to the caller. A storage read failure likewise leaves the
    /// state empty.
    pub async fn init(&self) {
        let bytes = match self.storage.get(SESSION_KEY).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("No persisted session found");
                return;
            }
            Err(err) => {
                warn!("Could not read persisted session: {}", err);
                return;
            }
        };

        match serde_json::from_slice::<Session>(&bytes) {
            Ok(session) => {
                let matrix = self.roles.resolve(session.role);
                info!(user = %session.user.id, role = %session.role, "Restored session");
                self.commit(AuthState {
                    session: Some(session),
                    is_loading: false,
                    is_authenticated: true,
                    permissions: matrix,
                })
                .await;
            }
            Err(err) => {
                warn!("Discarding corrupt persisted session: {}", err);
                if let Err(del_err) = self.storage.delete(SESSION_KEY).await {
                    error!("Could not delete corrupt session record: {}", del_err);
                }
                self.commit(AuthState::empty()).await;
            }
        }
    }

    /// Authenticate against the credential directory and open a session.
    ///
    /// On a credential mismatch the previous session (if any) is left
    /// untouched. `is_loading` is reset on every exit path. Concurrent
    /// calls are serialized by an internal gate.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let _gate = self.login_gate.lock().await;

        self.set_loading(true).await;

        let entry = match self.directory.lookup(email).await {
            Ok(entry) => entry,
            Err(err) => {
                error!("Credential lookup failed: {}", err);
                self.set_loading(false).await;
                return Err(err);
            }
        };

        let entry = match entry {
            Some(entry) if entry.password == password => entry,
            _ => {
                warn!(email, "Login rejected: invalid credentials");
                self.set_loading(false).await;
                return Err(AuthError::InvalidCredentials);
            }
        };

        let grants = self.roles.grants(entry.user.role).to_vec();
        let session = Session::start(entry.user, grants);
        let matrix = self.roles.resolve(session.role);

        info!(user = %session.user.id, role = %session.role, "Login succeeded");
        self.commit(AuthState {
            session: Some(session.clone()),
            is_loading: false,
            is_authenticated: true,
            permissions: matrix,
        })
        .await;

        // The in-memory session is already committed; a persistence failure
        // is surfaced but does not roll it back.
        self.persist(&session).await?;

        Ok(session)
    }

    /// Clear the session and remove the persisted record. Idempotent.
    pub async fn logout(&self) {
        self.commit(AuthState::empty()).await;
        if let Err(err) = self.storage.delete(SESSION_KEY).await {
            error!("Could not delete persisted session: {}", err);
        }
        info!("Logged out");
    }

    /// Whether the current session may perform `action` on `resource`.
    ///
    /// Superadmin bypasses the grant check entirely; this is a deliberate
    /// escape hatch distinct from a wildcard grant. Everyone else is
    /// checked against the raw grant list snapshotted at login, which
    /// agrees with the resolved matrix by construction.
    pub async fn has_permission(&self, resource: Resource, action: Action) -> bool {
        let state = self.state.read().await;
        let Some(session) = &state.session else {
            return false;
        };
        if session.role == Role::Superadmin {
            return true;
        }
        grants_allow(&session.permissions, resource, action)
    }

    /// A snapshot of the current state.
    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    /// Subscribe to state snapshots. The receiver immediately holds the
    /// latest committed state.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.publisher.subscribe()
    }

    pub(crate) async fn commit(&self, next: AuthState) {
        *self.state.write().await = next.clone();
        // Send only fails when no receiver is subscribed, which is fine
        let _ = self.publisher.send(next);
    }

    async fn set_loading(&self, is_loading: bool) {
        let mut state = self.state.write().await;
        state.is_loading = is_loading;
        let snapshot = state.clone();
        drop(state);
        let _ = self.publisher.send(snapshot);
    }

    pub(crate) async fn persist(&self, session: &Session) -> Result<()> {
        let record = serde_json::to_vec(session)?;
        self.storage.put(SESSION_KEY, &record).await?;
        debug!(user = %session.user.id, "Session record persisted");
        Ok(())
    }
}
