//! HTTP/JSON surface over the lifecycle services.
//!
//! Every route except `/health` needs a bearer credential, resolved to an
//! [`Actor`](crate::access::Actor) by an [`Authenticator`]. Successful
//! responses wrap the entity under its name; failures are
//! `{"error": "..."}` with the status derived from
//! [`FailureKind`](crate::error::FailureKind).

mod auth;
mod error;
mod extract;
mod handlers;
mod router;
mod stack;
mod state;

pub use auth::{AuthenticatedActor, Authenticator, StaticTokenAuthenticator};
pub use error::ApiError;
pub use router::router;
pub use stack::{MemoryStack, PostgresStack};
pub use state::{AppState, Repositories, Stack};

#[cfg(test)]
mod tests;
