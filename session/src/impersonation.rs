//! Admin impersonation: acting in another account's context while keeping
//! the admin's own privileges.
//!
//! A two-state machine over the active session's `is_impersonating` flag.
//! Single-level only: impersonating while already impersonating is a no-op,
//! so the original admin id can never be overwritten by a second hop. The
//! permission matrix is deliberately not recomputed on either transition;
//! the acting admin's own role stays in force throughout, which is what
//! prevents privilege escalation through the impersonated identity.

use tracing::{debug, error, info, warn};

use crate::SessionStore;

impl SessionStore {
    /// Enter impersonation of the account `target_id`/`target_name`.
    ///
    /// Legal only from the normal state with an active session. Returns
    /// whether the transition happened.
    pub async fn impersonate(&self, target_id: &str, target_name: &str) -> bool {
        let snapshot = {
            let mut state = self.state.write().await;
            let Some(session) = state.session.as_mut() else {
                warn!("Impersonation requested without an active session");
                return false;
            };
            if session.is_impersonating {
                debug!("Already impersonating; request ignored");
                return false;
            }
            session.original_admin_id = Some(session.user.id.clone());
            session.is_impersonating = true;
            info!(admin = %session.user.id, target_id, target_name, "Impersonation started");
            state.clone()
        };
        self.after_impersonation_change(snapshot).await;
        true
    }

    /// Return to the normal state. No-op when not impersonating.
    pub async fn stop_impersonation(&self) -> bool {
        let snapshot = {
            let mut state = self.state.write().await;
            let Some(session) = state.session.as_mut() else {
                return false;
            };
            if !session.is_impersonating {
                return false;
            }
            session.is_impersonating = false;
            session.original_admin_id = None;
            info!(admin = %session.user.id, "Impersonation stopped");
            state.clone()
        };
        self.after_impersonation_change(snapshot).await;
        true
    }

    /// Publish the mutated state and refresh the persisted record so a
    /// restart restores the same impersonation state. Persistence failures
    /// here are logged, not surfaced; the in-memory transition stands.
    async fn after_impersonation_change(&self, snapshot: crate::AuthState) {
        let session = snapshot.session.clone();
        self.commit(snapshot).await;
        if let Some(session) = session {
            if let Err(err) = self.persist(&session).await {
                error!("Could not persist impersonation change: {}", err);
            }
        }
    }
}
