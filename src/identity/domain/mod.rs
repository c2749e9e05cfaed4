//! Domain model for marketplace accounts.

mod error;
mod ids;
mod role;
mod user;

pub use error::{IdentityDomainError, ParseRoleError};
pub use ids::UserId;
pub use role::Role;
pub use user::{EmailAddress, PersistedUserData, ProfileUpdate, User, UserRating, UserRegistration};
