//! `PostgreSQL` repository implementation for user accounts.

use super::{
    models::{NewUserRow, UserProfileChangeset, UserRow},
    schema::users,
};
use crate::db::{PgPool, run_blocking};
use crate::identity::{
    domain::{EmailAddress, PersistedUserData, Role, User, UserId, UserRating},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(
            &self.pool,
            f,
            UserRepositoryError::persistence,
            UserRepositoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let user_id = user.id();
        let email = user.email().clone();
        let new_row = to_new_row(user);

        self.run(move |connection| {
            diesel::insert_into(users::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if info.constraint_name() == Some("users_email_key") =>
                    {
                        UserRepositoryError::DuplicateEmail(email.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        UserRepositoryError::DuplicateUser(user_id)
                    }
                    _ => UserRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_profile(&self, user: &User) -> UserRepositoryResult<()> {
        let user_id = user.id();
        let changeset = UserProfileChangeset {
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
            bio: user.bio().map(str::to_owned),
            profile_image: user.profile_image().map(str::to_owned),
            skills: user.skills().to_vec(),
            updated_at: user.updated_at(),
        };

        self.run(move |connection| {
            let updated = diesel::update(users::table.filter(users::id.eq(user_id.into_inner())))
                .set(&changeset)
                .execute(connection)
                .map_err(UserRepositoryError::persistence)?;
            if updated == 0 {
                return Err(UserRepositoryError::NotFound(user_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.run(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>> {
        let lookup = email.as_str().to_owned();
        self.run(move |connection| {
            let row = users::table
                .filter(users::email.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }
}

fn to_new_row(user: &User) -> NewUserRow {
    NewUserRow {
        id: user.id().into_inner(),
        email: user.email().as_str().to_owned(),
        first_name: user.first_name().to_owned(),
        last_name: user.last_name().to_owned(),
        role: user.role().as_str().to_owned(),
        bio: user.bio().map(str::to_owned),
        profile_image: user.profile_image().map(str::to_owned),
        skills: user.skills().to_vec(),
        rating: user.rating().value(),
        is_verified: user.is_verified(),
        created_at: user.created_at(),
        updated_at: user.updated_at(),
    }
}

/// Converts a stored row into the aggregate, validating enumerations.
fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        email: persisted_email,
        first_name,
        last_name,
        role: persisted_role,
        bio,
        profile_image,
        skills,
        rating: persisted_rating,
        is_verified,
        created_at,
        updated_at,
    } = row;

    let email = EmailAddress::new(persisted_email).map_err(UserRepositoryError::persistence)?;
    let role = Role::try_from(persisted_role.as_str()).map_err(UserRepositoryError::persistence)?;
    let rating = UserRating::new(persisted_rating).map_err(UserRepositoryError::persistence)?;

    Ok(User::from_persisted(PersistedUserData {
        id: UserId::from_uuid(id),
        email,
        first_name,
        last_name,
        role,
        bio,
        profile_image,
        skills,
        rating,
        is_verified,
        created_at,
        updated_at,
    }))
}
