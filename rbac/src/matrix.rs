//! The dense permission matrix derived from a role's grant list.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::types::{Action, PermissionGrant, Resource};

/// A total (resource, action) → bool table.
///
/// Every pair in the closed sets is always present; the matrix is never
/// partial. Cells default to `false` and resolution only ever flips them to
/// `true` (monotonic union, no deny grants), so building a matrix is
/// order-independent and idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionMatrix {
    cells: [[bool; Action::COUNT]; Resource::COUNT],
}

impl PermissionMatrix {
    /// The all-`false` matrix. This is also what an unknown or unconfigured
    /// role resolves to (fail-closed).
    pub fn denied() -> Self {
        Self {
            cells: [[false; Action::COUNT]; Resource::COUNT],
        }
    }

    /// Expand a grant list into a dense matrix.
    ///
    /// A wildcard grant fans its actions out over every known resource.
    pub fn from_grants(grants: &[PermissionGrant]) -> Self {
        let mut matrix = Self::denied();
        for grant in grants {
            for &action in &grant.actions {
                match grant.resource {
                    crate::types::GrantTarget::Wildcard => {
                        for resource in Resource::ALL {
                            matrix.allow(resource, action);
                        }
                    }
                    crate::types::GrantTarget::One(resource) => {
                        matrix.allow(resource, action);
                    }
                }
            }
        }
        matrix
    }

    pub fn allows(&self, resource: Resource, action: Action) -> bool {
        self.cells[resource.index()][action.index()]
    }

    fn allow(&mut self, resource: Resource, action: Action) {
        self.cells[resource.index()][action.index()] = true;
    }

    /// Number of allowed (resource, action) pairs.
    pub fn allowed_count(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&allowed| allowed)
            .count()
    }

    pub fn is_all_denied(&self) -> bool {
        self.allowed_count() == 0
    }
}

impl Default for PermissionMatrix {
    fn default() -> Self {
        Self::denied()
    }
}

// Serialized as nested resource → action → bool maps, the shape UI layers
// consume. Deserialization is intentionally absent: matrices are always
// re-derived from grants, never trusted from storage.
impl Serialize for PermissionMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut outer = serializer.serialize_map(Some(Resource::COUNT))?;
        for resource in Resource::ALL {
            let mut row = std::collections::BTreeMap::new();
            for action in Action::ALL {
                row.insert(action.as_str(), self.allows(resource, action));
            }
            outer.serialize_entry(resource.as_str(), &row)?;
        }
        outer.end()
    }
}
