//! Core types for the admin permission model.
//!
//! Roles, resources, and actions are closed sets. Anything outside them is
//! rejected at the parse boundary rather than carried around as a string,
//! so an unrecognised name in a config file or a persisted record surfaces
//! as a load error instead of silently granting or dropping access.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RbacError;

/// The closed set of back-office roles. Immutable once assigned to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Admin,
    Moderator,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Superadmin, Role::Admin, Role::Moderator, Role::Viewer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(Role::Superadmin),
            "admin" => Ok(Role::Admin),
            "moderator" => Ok(Role::Moderator),
            "viewer" => Ok(Role::Viewer),
            other => Err(RbacError::UnknownRole(other.to_string())),
        }
    }
}

/// The closed set of protected back-office domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Users,
    Players,
    Contests,
    Matches,
    Wallet,
    Reports,
    Settings,
}

impl Resource {
    pub const COUNT: usize = 7;

    pub const ALL: [Resource; Resource::COUNT] = [
        Resource::Users,
        Resource::Players,
        Resource::Contests,
        Resource::Matches,
        Resource::Wallet,
        Resource::Reports,
        Resource::Settings,
    ];

    /// Dense index into a permission matrix row.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Players => "players",
            Resource::Contests => "contests",
            Resource::Matches => "matches",
            Resource::Wallet => "wallet",
            Resource::Reports => "reports",
            Resource::Settings => "settings",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "users" => Ok(Resource::Users),
            "players" => Ok(Resource::Players),
            "contests" => Ok(Resource::Contests),
            "matches" => Ok(Resource::Matches),
            "wallet" => Ok(Resource::Wallet),
            "reports" => Ok(Resource::Reports),
            "settings" => Ok(Resource::Settings),
            other => Err(RbacError::UnknownResource(other.to_string())),
        }
    }
}

/// The closed set of operations a role may be granted on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Publish,
    Lock,
}

impl Action {
    pub const COUNT: usize = 6;

    pub const ALL: [Action; Action::COUNT] = [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::Publish,
        Action::Lock,
    ];

    /// Dense index into a permission matrix column.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Publish => "publish",
            Action::Lock => "lock",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Action::Create),
            "read" => Ok(Action::Read),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            "publish" => Ok(Action::Publish),
            "lock" => Ok(Action::Lock),
            other => Err(RbacError::UnknownAction(other.to_string())),
        }
    }
}

/// The resource side of a grant: either one known resource or the `*`
/// wildcard. The wildcard exists only inside grants, never inside a
/// resolved matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantTarget {
    Wildcard,
    One(Resource),
}

impl fmt::Display for GrantTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrantTarget::Wildcard => f.write_str("*"),
            GrantTarget::One(resource) => f.write_str(resource.as_str()),
        }
    }
}

impl FromStr for GrantTarget {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            Ok(GrantTarget::Wildcard)
        } else {
            s.parse::<Resource>().map(GrantTarget::One)
        }
    }
}

// Serialized as the plain string form ("*" or the resource name) so the
// persisted session record matches the grant table config format.
impl Serialize for GrantTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for GrantTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A single grant: what a role may do to one resource (or all of them).
///
/// Grants are purely additive. There is no deny grant, so a list of grants
/// is an order-independent union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub resource: GrantTarget,
    pub actions: Vec<Action>,
}

impl PermissionGrant {
    pub fn new(resource: GrantTarget, actions: impl Into<Vec<Action>>) -> Self {
        Self {
            resource,
            actions: actions.into(),
        }
    }

    /// Grant the given actions on one resource.
    pub fn on(resource: Resource, actions: impl Into<Vec<Action>>) -> Self {
        Self::new(GrantTarget::One(resource), actions)
    }

    /// Grant the given actions on every known resource.
    pub fn on_all(actions: impl Into<Vec<Action>>) -> Self {
        Self::new(GrantTarget::Wildcard, actions)
    }

    /// Whether this grant permits `action` on `resource`.
    pub fn covers(&self, resource: Resource, action: Action) -> bool {
        let resource_matches = match self.resource {
            GrantTarget::Wildcard => true,
            GrantTarget::One(granted) => granted == resource,
        };
        resource_matches && self.actions.contains(&action)
    }
}

/// Query a raw grant list directly, without building a matrix.
///
/// This is the path `has_permission` takes at runtime; it must agree with
/// [`crate::PermissionMatrix::from_grants`] for every (resource, action)
/// pair.
pub fn grants_allow(grants: &[PermissionGrant], resource: Resource, action: Action) -> bool {
    grants.iter().any(|grant| grant.covers(resource, action))
}
