//! Credential directory: the account lookup used to validate logins.
//!
//! This is an external collaborator, not owned logic. The engine only ever
//! performs a single lookup-and-compare; hashing, rotation, and rate
//! limiting belong to a real identity provider. The bundled
//! [`StaticDirectory`] is the mock back-office roster.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::AdminUser;
use rbac::Role;

/// A known account with its (mock, plaintext) password.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    pub user: AdminUser,
    pub password: String,
}

/// Lookup of known accounts by email.
#[async_trait]
pub trait CredentialDirectory: Send + Sync {
    /// Find the directory entry for `email`, if one exists.
    ///
    /// `Ok(None)` means "no such account" and is indistinguishable from a
    /// bad password at the login boundary.
    async fn lookup(&self, email: &str) -> Result<Option<DirectoryEntry>>;
}

/// In-memory directory seeded at construction. Never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    entries: HashMap<String, DirectoryEntry>,
}

impl StaticDirectory {
    pub fn new(entries: impl IntoIterator<Item = DirectoryEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.user.email.clone(), entry))
                .collect(),
        }
    }

    /// The mock roster: one account per role.
    pub fn seeded() -> Self {
        fn entry(id: &str, email: &str, name: &str, role: Role, password: &str) -> DirectoryEntry {
            DirectoryEntry {
                user: AdminUser {
                    id: id.to_string(),
                    email: email.to_string(),
                    name: name.to_string(),
                    role,
                },
                password: password.to_string(),
            }
        }

        Self::new([
            entry(
                "adm-001",
                "super@dream11.com",
                "Super Admin",
                Role::Superadmin,
                "super123",
            ),
            entry(
                "adm-002",
                "admin@dream11.com",
                "Operations Admin",
                Role::Admin,
                "admin123",
            ),
            entry(
                "adm-003",
                "mod@dream11.com",
                "Match Moderator",
                Role::Moderator,
                "mod123",
            ),
            entry(
                "adm-004",
                "viewer@dream11.com",
                "Reports Viewer",
                Role::Viewer,
                "view123",
            ),
        ])
    }
}

#[async_trait]
impl CredentialDirectory for StaticDirectory {
    async fn lookup(&self, email: &str) -> Result<Option<DirectoryEntry>> {
        Ok(self.entries.get(email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_roster_covers_every_role() {
        let directory = StaticDirectory::seeded();
        for (email, role) in [
            ("super@dream11.com", Role::Superadmin),
            ("admin@dream11.com", Role::Admin),
            ("mod@dream11.com", Role::Moderator),
            ("viewer@dream11.com", Role::Viewer),
        ] {
            let entry = directory.lookup(email).await.unwrap().unwrap();
            assert_eq!(entry.user.role, role);
            assert_eq!(entry.user.email, email);
        }
    }

    #[tokio::test]
    async fn test_unknown_email_is_none() {
        let directory = StaticDirectory::seeded();
        assert!(directory
            .lookup("nobody@dream11.com")
            .await
            .unwrap()
            .is_none());
    }
}
