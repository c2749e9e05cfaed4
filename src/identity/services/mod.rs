//! Application services for account registration and profiles.

mod directory;

pub use directory::{
    IdentityService, IdentityServiceError, IdentityServiceResult, RegisterUserRequest,
};
