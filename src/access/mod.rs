//! Authorization gate for lifecycle mutations.
//!
//! Every mutating operation in the task, bid, payment, and review contexts
//! resolves its actor to an [`Actor`] and calls [`authorize`] before it
//! touches a repository. The check is synchronous and side-effect free; a
//! denial is terminal for the request.

use crate::error::{Classify, FailureKind};
use crate::identity::domain::{Role, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Authenticated identity performing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    id: UserId,
    role: Role,
}

impl Actor {
    /// Creates an actor from a resolved identity and role.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Returns the actor's user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the actor's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

/// Reason the authorization gate rejected an actor.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AccessDenied {
    /// The operation is restricted to a role the actor does not hold.
    #[error("only {required} accounts may perform this operation")]
    RoleRequired {
        /// Role the operation requires.
        required: Role,
        /// Role the actor holds.
        actual: Role,
    },

    /// The actor does not own the resource.
    #[error("user {actor} does not own this resource")]
    NotOwner {
        /// Actor that attempted the operation.
        actor: UserId,
    },
}

impl Classify for AccessDenied {
    fn kind(&self) -> FailureKind {
        FailureKind::Forbidden
    }
}

/// Checks an actor against an optional role and an optional resource owner.
///
/// # Errors
///
/// Returns [`AccessDenied::RoleRequired`] when `required_role` is set and
/// differs from the actor's role, or [`AccessDenied::NotOwner`] when
/// `resource_owner` is set and differs from the actor's identity. The role
/// check runs first.
pub fn authorize(
    actor: &Actor,
    required_role: Option<Role>,
    resource_owner: Option<UserId>,
) -> Result<(), AccessDenied> {
    if let Some(required) = required_role
        && actor.role != required
    {
        return Err(AccessDenied::RoleRequired {
            required,
            actual: actor.role,
        });
    }

    if let Some(owner) = resource_owner
        && actor.id != owner
    {
        return Err(AccessDenied::NotOwner { actor: actor.id });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{AccessDenied, Actor, authorize};
    use crate::identity::domain::{Role, UserId};
    use rstest::{fixture, rstest};

    #[fixture]
    fn client() -> Actor {
        Actor::new(UserId::new(), Role::Client)
    }

    #[rstest]
    fn unrestricted_check_passes(client: Actor) {
        assert_eq!(authorize(&client, None, None), Ok(()));
    }

    #[rstest]
    fn matching_role_and_owner_passes(client: Actor) {
        assert_eq!(
            authorize(&client, Some(Role::Client), Some(client.id())),
            Ok(())
        );
    }

    #[rstest]
    fn wrong_role_is_denied(client: Actor) {
        assert_eq!(
            authorize(&client, Some(Role::Freelancer), None),
            Err(AccessDenied::RoleRequired {
                required: Role::Freelancer,
                actual: Role::Client,
            })
        );
    }

    #[rstest]
    fn foreign_owner_is_denied(client: Actor) {
        assert_eq!(
            authorize(&client, None, Some(UserId::new())),
            Err(AccessDenied::NotOwner { actor: client.id() })
        );
    }

    #[rstest]
    fn role_check_precedes_owner_check(client: Actor) {
        let result = authorize(&client, Some(Role::Freelancer), Some(UserId::new()));
        assert!(matches!(result, Err(AccessDenied::RoleRequired { .. })));
    }
}
