//! Role-based access control for the fantasy-sports admin back office.
//!
//! This crate is the pure half of the admin auth engine: it defines the
//! closed role/resource/action sets, the role→grant table, and the resolver
//! that expands a role into a dense [`PermissionMatrix`].
//!
//! The resolution model is deliberately simple:
//!
//! 1. Every matrix starts all-`false`.
//! 2. Each grant in the role's list unions its actions in, with the `*`
//!    wildcard fanning out over every known resource.
//! 3. There are no deny grants, so resolution is order-independent,
//!    idempotent, and monotonic.
//! 4. Anything unrecognised fails closed: a role with no table entry gets
//!    the all-`false` matrix, and unknown names in a config file are
//!    rejected at load time.
//!
//! The table itself is static configuration. It is loaded once at process
//! start, either from the built-in defaults or from a YAML file, and never
//! mutated at runtime.

pub mod error;
pub mod matrix;
pub mod types;

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

pub use error::{RbacError, Result};
pub use matrix::PermissionMatrix;
pub use types::{grants_allow, Action, GrantTarget, PermissionGrant, Resource, Role};

/// The static role→grant table.
///
/// Configuration, not state: build it once (from [`RoleTable::builtin`] or
/// a YAML file) and share it for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTable {
    grants: HashMap<Role, Vec<PermissionGrant>>,
}

impl RoleTable {
    /// Build a table from explicit role→grant entries.
    ///
    /// Fails fast on structurally invalid entries (currently: a grant with
    /// an empty action list, which is always a config mistake) rather than
    /// silently dropping them.
    pub fn new(grants: HashMap<Role, Vec<PermissionGrant>>) -> Result<Self> {
        for (role, list) in &grants {
            for grant in list {
                if grant.actions.is_empty() {
                    return Err(RbacError::Config(format!(
                        "role '{role}' has a grant on '{}' with no actions",
                        grant.resource
                    )));
                }
            }
        }
        let table = Self { grants };
        debug!(roles = table.grants.len(), "Role table constructed");
        Ok(table)
    }

    /// The default back-office table.
    ///
    /// Superadmin keeps a full wildcard grant even though `has_permission`
    /// bypasses the matrix for it, so the resolved matrix stays honest for
    /// display purposes.
    pub fn builtin() -> Self {
        use Action::*;

        let mut grants = HashMap::new();
        grants.insert(
            Role::Superadmin,
            vec![PermissionGrant::on_all(Action::ALL)],
        );
        grants.insert(
            Role::Admin,
            vec![
                PermissionGrant::on_all([Read]),
                PermissionGrant::on(Resource::Users, [Create, Update, Delete]),
                PermissionGrant::on(Resource::Players, [Create, Update, Delete]),
                PermissionGrant::on(Resource::Contests, Action::ALL),
                PermissionGrant::on(Resource::Matches, Action::ALL),
                PermissionGrant::on(Resource::Wallet, [Update]),
            ],
        );
        grants.insert(
            Role::Moderator,
            vec![
                PermissionGrant::on(Resource::Contests, [Read, Update, Publish, Lock]),
                PermissionGrant::on(Resource::Matches, [Read, Update, Publish, Lock]),
                PermissionGrant::on(Resource::Players, [Read]),
                PermissionGrant::on(Resource::Reports, [Read]),
            ],
        );
        grants.insert(Role::Viewer, vec![PermissionGrant::on_all([Read])]);

        // Built-in entries are well-formed by construction
        Self { grants }
    }

    /// Load a table from a YAML config file.
    ///
    /// Format: a mapping from role name to a list of grants, e.g.
    ///
    /// ```yaml
    /// moderator:
    ///   - resource: contests
    ///     actions: [read, update, publish, lock]
    ///   - resource: "*"
    ///     actions: [read]
    /// ```
    ///
    /// Unknown role, resource, or action names fail the load; there is no
    /// silent dropping of misspelled entries.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let table = Self::from_yaml(&raw)?;
        debug!(path = %path.as_ref().display(), "Role table loaded from file");
        Ok(table)
    }

    /// Parse a table from YAML text. See [`RoleTable::from_yaml_file`].
    pub fn from_yaml(raw: &str) -> Result<Self> {
        let grants: HashMap<Role, Vec<PermissionGrant>> = serde_yaml::from_str(raw)?;
        Self::new(grants)
    }

    /// The raw grant list for a role. Empty when the role has no entry.
    pub fn grants(&self, role: Role) -> &[PermissionGrant] {
        self.grants.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve a role into its dense permission matrix.
    ///
    /// Pure: two calls with the same role yield structurally equal
    /// matrices. A role absent from the table resolves to all-`false`.
    pub fn resolve(&self, role: Role) -> PermissionMatrix {
        let matrix = PermissionMatrix::from_grants(self.grants(role));
        debug!(%role, allowed = matrix.allowed_count(), "Resolved permission matrix");
        matrix
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// The grant table from the back-office admin scenario: full control of
    /// contests, read/create on wallet, nothing else.
    fn scenario_table() -> RoleTable {
        let mut grants = HashMap::new();
        grants.insert(
            Role::Admin,
            vec![
                PermissionGrant::on(Resource::Contests, Action::ALL),
                PermissionGrant::on(Resource::Wallet, [Action::Read, Action::Create]),
            ],
        );
        RoleTable::new(grants).unwrap()
    }

    #[test]
    fn test_scenario_admin_matrix() {
        let matrix = scenario_table().resolve(Role::Admin);
        assert!(matrix.allows(Resource::Contests, Action::Publish));
        assert!(!matrix.allows(Resource::Wallet, Action::Delete));
        assert!(!matrix.allows(Resource::Users, Action::Read));
    }

    #[test]
    fn test_resolve_is_total_for_every_builtin_role() {
        let table = RoleTable::builtin();
        for role in Role::ALL {
            let matrix = table.resolve(role);
            // Totality: every pair is queryable; spot-check both polarities
            for resource in Resource::ALL {
                for action in Action::ALL {
                    let _ = matrix.allows(resource, action);
                }
            }
            assert!(!matrix.is_all_denied(), "builtin role {role} has no grants");
        }
    }

    #[test]
    fn test_role_without_table_entry_fails_closed() {
        let matrix = scenario_table().resolve(Role::Viewer);
        assert!(matrix.is_all_denied());
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let table = RoleTable::builtin();
        for role in Role::ALL {
            assert_eq!(table.resolve(role), table.resolve(role));
        }
    }

    #[test]
    fn test_matrix_agrees_with_grants_for_builtin_roles() {
        let table = RoleTable::builtin();
        for role in Role::ALL {
            let matrix = table.resolve(role);
            for resource in Resource::ALL {
                for action in Action::ALL {
                    assert_eq!(
                        matrix.allows(resource, action),
                        grants_allow(table.grants(role), resource, action),
                    );
                }
            }
        }
    }

    #[test]
    fn test_from_yaml() {
        let raw = r#"
moderator:
  - resource: contests
    actions: [read, update, publish, lock]
  - resource: "*"
    actions: [read]
viewer:
  - resource: reports
    actions: [read]
"#;
        let table = RoleTable::from_yaml(raw).unwrap();
        let matrix = table.resolve(Role::Moderator);
        assert!(matrix.allows(Resource::Contests, Action::Lock));
        assert!(matrix.allows(Resource::Wallet, Action::Read));
        assert!(!matrix.allows(Resource::Wallet, Action::Update));

        assert!(table.resolve(Role::Admin).is_all_denied());
    }

    #[test]
    fn test_yaml_with_unknown_resource_fails_fast() {
        let raw = r#"
admin:
  - resource: payouts
    actions: [read]
"#;
        assert!(RoleTable::from_yaml(raw).is_err());
    }

    #[test]
    fn test_yaml_with_unknown_role_fails_fast() {
        let raw = r#"
overlord:
  - resource: users
    actions: [read]
"#;
        assert!(RoleTable::from_yaml(raw).is_err());
    }

    #[test]
    fn test_empty_action_list_rejected() {
        let raw = r#"
admin:
  - resource: users
    actions: []
"#;
        let err = RoleTable::from_yaml(raw).unwrap_err();
        assert!(matches!(err, RbacError::Config(_)));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "viewer:\n  - resource: \"*\"\n    actions: [read]\n"
        )
        .unwrap();

        let table = RoleTable::from_yaml_file(file.path()).unwrap();
        assert!(table.resolve(Role::Viewer).allows(Resource::Users, Action::Read));
    }

    #[test]
    fn test_missing_file_errors() {
        assert!(RoleTable::from_yaml_file("/nonexistent/roles.yaml").is_err());
    }
}
