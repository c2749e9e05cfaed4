//! User aggregate root and account value types.

use super::{IdentityDomainError, Role, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalised, lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::InvalidEmail`] when the value lacks a
    /// non-empty local part and domain separated by a single `@`, or contains
    /// whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();
        let is_valid = normalized
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            })
            && !normalized.chars().any(char::is_whitespace);

        if !is_valid {
            return Err(IdentityDomainError::InvalidEmail(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns the address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Running review rating in the `0..=5` range.
///
/// A user without reviews has rating `0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct UserRating(f64);

impl UserRating {
    const MAX: f64 = 5.0;

    /// Rating of a user who has never been reviewed.
    #[must_use]
    pub const fn unrated() -> Self {
        Self(0.0)
    }

    /// Creates a validated rating.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::RatingOutOfRange`] when the value is
    /// not finite or lies outside `0..=5`.
    pub fn new(value: f64) -> Result<Self, IdentityDomainError> {
        if !value.is_finite() || !(0.0..=Self::MAX).contains(&value) {
            return Err(IdentityDomainError::RatingOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Computes the unweighted arithmetic mean of review scores.
    ///
    /// Returns [`UserRating::unrated`] for an empty sequence. Scores above 5
    /// are clamped so the result always stays in range.
    #[must_use]
    pub fn mean(scores: impl IntoIterator<Item = u8>) -> Self {
        let (sum, count) = scores
            .into_iter()
            .fold((0_u32, 0_u32), |(sum, count), score| {
                (
                    sum.saturating_add(u32::from(score.min(5))),
                    count.saturating_add(1),
                )
            });
        if count == 0 {
            return Self::unrated();
        }
        Self(mean_of(sum, count))
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "rating aggregation is defined as a floating-point mean"
)]
fn mean_of(sum: u32, count: u32) -> f64 {
    f64::from(sum) / f64::from(count)
}

impl TryFrom<f64> for UserRating {
    type Error = IdentityDomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserRating> for f64 {
    fn from(rating: UserRating) -> Self {
        rating.0
    }
}

/// Validated registration payload for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegistration {
    email: EmailAddress,
    first_name: String,
    last_name: String,
    role: Role,
}

impl UserRegistration {
    /// Validates registration fields.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError`] when the email is malformed or a name
    /// is blank.
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: Role,
    ) -> Result<Self, IdentityDomainError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            first_name: required_name(first_name.into(), "first_name")?,
            last_name: required_name(last_name.into(), "last_name")?,
            role,
        })
    }

    /// Returns the normalised email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }
}

fn required_name(value: String, field: &'static str) -> Result<String, IdentityDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IdentityDomainError::EmptyName(field));
    }
    Ok(trimmed.to_owned())
}

/// Partial profile update. Absent or blank fields leave stored values as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileUpdate {
    /// Replacement first name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Replacement last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Replacement biography.
    #[serde(default)]
    pub bio: Option<String>,
    /// Replacement skill list. An explicit empty list clears skills.
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    /// Replacement profile image reference.
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    first_name: String,
    last_name: String,
    role: Role,
    bio: Option<String>,
    profile_image: Option<String>,
    skills: Vec<String>,
    rating: UserRating,
    is_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedUserData {
    /// Persisted identifier.
    pub id: UserId,
    /// Persisted email address.
    pub email: EmailAddress,
    /// Persisted first name.
    pub first_name: String,
    /// Persisted last name.
    pub last_name: String,
    /// Persisted role.
    pub role: Role,
    /// Persisted biography, if any.
    pub bio: Option<String>,
    /// Persisted profile image reference, if any.
    pub profile_image: Option<String>,
    /// Persisted skills.
    pub skills: Vec<String>,
    /// Persisted running rating.
    pub rating: UserRating,
    /// Persisted verification flag.
    pub is_verified: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates an unverified, unrated account from a registration.
    #[must_use]
    pub fn register(registration: UserRegistration, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let UserRegistration {
            email,
            first_name,
            last_name,
            role,
        } = registration;

        Self {
            id: UserId::new(),
            email,
            first_name,
            last_name,
            role,
            bio: None,
            profile_image: None,
            skills: Vec::new(),
            rating: UserRating::unrated(),
            is_verified: false,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            email: data.email,
            first_name: data.first_name,
            last_name: data.last_name,
            role: data.role,
            bio: data.bio,
            profile_image: data.profile_image,
            skills: data.skills,
            rating: data.rating,
            is_verified: data.is_verified,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns the account role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the biography, if any.
    #[must_use]
    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    /// Returns the profile image reference, if any.
    #[must_use]
    pub fn profile_image(&self) -> Option<&str> {
        self.profile_image.as_deref()
    }

    /// Returns the declared skills.
    #[must_use]
    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    /// Returns the running review rating.
    #[must_use]
    pub const fn rating(&self) -> UserRating {
        self.rating
    }

    /// Returns whether the account has been verified.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.is_verified
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a partial profile update. Blank text fields are ignored.
    pub fn apply_profile_update(&mut self, update: ProfileUpdate, clock: &impl Clock) {
        let ProfileUpdate {
            first_name,
            last_name,
            bio,
            skills,
            profile_image,
        } = update;

        if let Some(name) = non_blank(first_name) {
            self.first_name = name;
        }
        if let Some(name) = non_blank(last_name) {
            self.last_name = name;
        }
        if let Some(text) = non_blank(bio) {
            self.bio = Some(text);
        }
        if let Some(image) = non_blank(profile_image) {
            self.profile_image = Some(image);
        }
        if let Some(list) = skills {
            self.skills = list;
        }
        self.updated_at = clock.utc();
    }

    /// Stores a freshly aggregated rating.
    ///
    /// Only the review aggregator's atomic recompute calls this.
    pub(crate) fn record_rating(&mut self, rating: UserRating, at: DateTime<Utc>) {
        self.rating = rating;
        self.updated_at = at;
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
