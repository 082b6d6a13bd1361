//! PostgreSQL-backed write repository implementation.

use async_trait::async_trait;
use common::UserId;
use domain::{DomainError, User, UserWriteRepository};
use sqlx::PgPool;

use crate::publish_committed_events;
use crate::record::UserRecord;

/// PostgreSQL user repository.
///
/// Every call commits inside a single transaction; the relational
/// engine's isolation is the only concurrency guard on the write path.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgreSQL user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn map_unique_violation(err: sqlx::Error, user: &User) -> DomainError {
        if let sqlx::Error::Database(ref db_err) = err {
            match db_err.constraint() {
                Some("users_email_unique") => {
                    return DomainError::conflict("email", user.email().as_str());
                }
                Some("users_phone_number_unique") => {
                    return DomainError::conflict("phone_number", user.phone_number().as_str());
                }
                _ => {}
            }
        }
        DomainError::Storage(err.to_string())
    }
}

fn storage_error(err: sqlx::Error) -> DomainError {
    DomainError::Storage(err.to_string())
}

#[async_trait]
impl UserWriteRepository for PostgresUserRepository {
    async fn create(&self, user: &mut User) -> Result<UserId, DomainError> {
        let record = UserRecord::from_user(user);
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, password_salt, password_hash,
                first_name, last_name, birthdate, phone_number,
                latitude, longitude, about_me, profile_image,
                created_at, updated_at, last_login, deleted_at, is_deleted
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(record.id)
        .bind(&record.email)
        .bind(&record.password_salt)
        .bind(&record.password_hash)
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(record.birthdate)
        .bind(&record.phone_number)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(&record.about_me)
        .bind(&record.profile_image)
        .bind(record.created_at)
        .bind(record.updated_at)
        .bind(record.last_login)
        .bind(record.deleted_at)
        .bind(record.is_deleted)
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::map_unique_violation(e, user))?;

        tx.commit().await.map_err(storage_error)?;

        publish_committed_events(user);
        Ok(user.id())
    }

    async fn update(&self, user: &mut User) -> Result<(), DomainError> {
        let record = UserRecord::from_user(user);
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let result = sqlx::query(
            r#"
            UPDATE users SET
                email = $2, password_salt = $3, password_hash = $4,
                first_name = $5, last_name = $6, birthdate = $7, phone_number = $8,
                latitude = $9, longitude = $10, about_me = $11, profile_image = $12,
                updated_at = $13, last_login = $14, deleted_at = $15, is_deleted = $16
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(&record.email)
        .bind(&record.password_salt)
        .bind(&record.password_hash)
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(record.birthdate)
        .bind(&record.phone_number)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(&record.about_me)
        .bind(&record.profile_image)
        .bind(record.updated_at)
        .bind(record.last_login)
        .bind(record.deleted_at)
        .bind(record.is_deleted)
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::map_unique_violation(e, user))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(user.id()));
        }

        tx.commit().await.map_err(storage_error)?;

        publish_committed_events(user);
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(id));
        }
        Ok(())
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT * FROM users WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        record.map(UserRecord::into_user).transpose()
    }

    async fn get_by_id_unfiltered(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let record = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        record.map(UserRecord::into_user).transpose()
    }
}
