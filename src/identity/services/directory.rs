//! Service layer for account registration, lookup, and profile updates.

use crate::access::Actor;
use crate::error::{Classify, FailureKind};
use crate::identity::{
    domain::{IdentityDomainError, ProfileUpdate, Role, User, UserId, UserRegistration},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for registering a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    email: String,
    first_name: String,
    last_name: String,
    role: Role,
}

impl RegisterUserRequest {
    /// Creates a registration request.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            role,
        }
    }
}

/// Service-level errors for identity operations.
#[derive(Debug, Error)]
pub enum IdentityServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
    /// No account exists with the given identifier.
    #[error("user {0} not found")]
    NotFound(UserId),
}

impl Classify for IdentityServiceError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(_) => FailureKind::Validation,
            Self::NotFound(_) | Self::Repository(UserRepositoryError::NotFound(_)) => {
                FailureKind::NotFound
            }
            Self::Repository(
                UserRepositoryError::DuplicateUser(_) | UserRepositoryError::DuplicateEmail(_),
            ) => FailureKind::Conflict,
            Self::Repository(UserRepositoryError::Persistence(_)) => FailureKind::Internal,
        }
    }
}

/// Result type for identity service operations.
pub type IdentityServiceResult<T> = Result<T, IdentityServiceError>;

/// Account registration and profile orchestration service.
#[derive(Clone)]
pub struct IdentityService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> IdentityService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new identity service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Registers a new, unverified account with rating 0.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::Domain`] for malformed input or
    /// [`IdentityServiceError::Repository`] when the email is taken or
    /// persistence fails.
    pub async fn register(&self, request: RegisterUserRequest) -> IdentityServiceResult<User> {
        let RegisterUserRequest {
            email,
            first_name,
            last_name,
            role,
        } = request;
        let registration = UserRegistration::new(email, first_name, last_name, role)?;
        let user = User::register(registration, &*self.clock);
        self.repository.store(&user).await?;
        info!(user_id = %user.id(), role = %user.role(), "registered user");
        Ok(user)
    }

    /// Finds a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::NotFound`] when no such user exists or
    /// [`IdentityServiceError::Repository`] when lookup fails.
    pub async fn find_user(&self, id: UserId) -> IdentityServiceResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(IdentityServiceError::NotFound(id))
    }

    /// Returns the account of the requesting actor.
    ///
    /// # Errors
    ///
    /// See [`IdentityService::find_user`].
    pub async fn current_user(&self, actor: &Actor) -> IdentityServiceResult<User> {
        self.find_user(actor.id()).await
    }

    /// Applies a partial profile update to the actor's own account.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::NotFound`] when the actor has no
    /// account or [`IdentityServiceError::Repository`] when persistence
    /// fails.
    pub async fn update_profile(
        &self,
        actor: &Actor,
        update: ProfileUpdate,
    ) -> IdentityServiceResult<User> {
        let mut user = self.find_user(actor.id()).await?;
        user.apply_profile_update(update, &*self.clock);
        self.repository.update_profile(&user).await?;
        Ok(user)
    }
}
