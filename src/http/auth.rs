//! Bearer-credential resolution.

use super::{ApiError, AppState, Stack};
use crate::access::Actor;
use crate::config::TokenGrant;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::collections::HashMap;

/// Resolves a bearer token to the acting identity.
///
/// Token issuance belongs to an external identity provider; the router only
/// needs this lookup.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns the actor for `token`, or `None` when it is unknown.
    async fn authenticate(&self, token: &str) -> Option<Actor>;
}

/// Authenticator backed by a fixed table of configured grants.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuthenticator {
    grants: HashMap<String, Actor>,
}

impl StaticTokenAuthenticator {
    /// Builds the table from configured grants. Later grants for the same
    /// token replace earlier ones.
    #[must_use]
    pub fn new(grants: impl IntoIterator<Item = TokenGrant>) -> Self {
        let table = grants
            .into_iter()
            .map(|grant| (grant.token, Actor::new(grant.user_id, grant.role)))
            .collect();
        Self { grants: table }
    }

    /// Adds a single grant.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>, actor: Actor) -> Self {
        self.grants.insert(token.into(), actor);
        self
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, token: &str) -> Option<Actor> {
        self.grants.get(token).copied()
    }
}

/// Extractor yielding the actor behind the request's bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedActor(pub Actor);

#[async_trait]
impl<S: Stack> FromRequestParts<AppState<S>> for AuthenticatedActor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ApiError::Unauthenticated)?;

        state
            .authenticator
            .authenticate(token)
            .await
            .map(Self)
            .ok_or(ApiError::Unauthenticated)
    }
}
