//! User service providing a simplified API for account operations.

use common::UserId;

use crate::error::DomainError;
use crate::repository::UserWriteRepository;

use super::{
    ChangePassword, DeleteUser, RecordLogin, RegisterUser, SetProfileImage, UpdateLocation,
    UpdatePhoneNumber, UpdateProfile, User, UserError,
};

/// Service for managing user accounts.
///
/// A single stateless implementation over the write-repository port; all
/// mutation rules live in the aggregate, all persistence in the
/// repository.
pub struct UserService<R: UserWriteRepository> {
    repository: R,
}

impl<R: UserWriteRepository> UserService<R> {
    /// Creates a new user service over the given write repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Registers a new account.
    ///
    /// Validation failures surface as [`DomainError::User`]; uniqueness
    /// violations on email or phone as [`DomainError::Conflict`].
    #[tracing::instrument(skip(self, cmd))]
    pub async fn register(&self, cmd: RegisterUser) -> Result<User, DomainError> {
        let mut user = User::create(cmd)?;
        let id = self.repository.create(&mut user).await?;
        metrics::counter!("users_registered").increment(1);
        tracing::info!(user_id = %id, "user registered");
        Ok(user)
    }

    /// Updates name, birthdate and description.
    #[tracing::instrument(skip(self, cmd), fields(user_id = %cmd.user_id))]
    pub async fn update_profile(&self, cmd: UpdateProfile) -> Result<User, DomainError> {
        self.mutate(cmd.user_id, |user| {
            user.update_profile(
                &cmd.first_name,
                &cmd.last_name,
                cmd.birthdate,
                cmd.about_me.clone(),
            )
        })
        .await
    }

    /// Replaces the phone number.
    #[tracing::instrument(skip(self, cmd), fields(user_id = %cmd.user_id))]
    pub async fn update_phone_number(&self, cmd: UpdatePhoneNumber) -> Result<User, DomainError> {
        self.mutate(cmd.user_id, |user| {
            user.update_phone_number(&cmd.phone_number)
        })
        .await
    }

    /// Replaces the geographic location.
    #[tracing::instrument(skip(self, cmd), fields(user_id = %cmd.user_id))]
    pub async fn update_location(&self, cmd: UpdateLocation) -> Result<User, DomainError> {
        self.mutate(cmd.user_id, |user| {
            user.update_location(cmd.latitude, cmd.longitude)
        })
        .await
    }

    /// Replaces the credential material.
    #[tracing::instrument(skip(self, cmd), fields(user_id = %cmd.user_id))]
    pub async fn change_password(&self, cmd: ChangePassword) -> Result<User, DomainError> {
        self.mutate(cmd.user_id, |user| {
            user.change_password(cmd.password_salt.clone(), cmd.password_hash.clone())
        })
        .await
    }

    /// Sets the profile image.
    #[tracing::instrument(skip(self, cmd), fields(user_id = %cmd.user_id))]
    pub async fn set_profile_image(&self, cmd: SetProfileImage) -> Result<User, DomainError> {
        self.mutate(cmd.user_id, |user| {
            user.set_profile_image(cmd.image_name.clone())
        })
        .await
    }

    /// Removes the profile image.
    #[tracing::instrument(skip(self))]
    pub async fn remove_profile_image(&self, user_id: UserId) -> Result<User, DomainError> {
        self.mutate(user_id, User::remove_profile_image).await
    }

    /// Records a successful login.
    #[tracing::instrument(skip(self, cmd), fields(user_id = %cmd.user_id))]
    pub async fn record_login(&self, cmd: RecordLogin) -> Result<User, DomainError> {
        self.mutate(cmd.user_id, User::record_login).await
    }

    /// Soft-deletes an account.
    ///
    /// Idempotent: deleting an already-deleted account refreshes its
    /// deletion timestamp and succeeds.
    #[tracing::instrument(skip(self, cmd), fields(user_id = %cmd.user_id))]
    pub async fn delete(&self, cmd: DeleteUser) -> Result<User, DomainError> {
        let user = self
            .mutate(cmd.user_id, |user| {
                user.delete();
                Ok(())
            })
            .await?;
        metrics::counter!("users_soft_deleted").increment(1);
        Ok(user)
    }

    /// Permanently removes an account (admin path).
    #[tracing::instrument(skip(self))]
    pub async fn hard_delete(&self, user_id: UserId) -> Result<(), DomainError> {
        self.repository.delete(user_id).await
    }

    /// Loads an account by id, excluding soft-deleted ones.
    #[tracing::instrument(skip(self))]
    pub async fn get_user(&self, user_id: UserId) -> Result<Option<User>, DomainError> {
        self.repository.get_by_id(user_id).await
    }

    /// Loads an account by id, including soft-deleted ones (admin path).
    #[tracing::instrument(skip(self))]
    pub async fn get_user_unfiltered(&self, user_id: UserId) -> Result<Option<User>, DomainError> {
        self.repository.get_by_id_unfiltered(user_id).await
    }

    /// Loads, mutates and persists an aggregate in one step.
    async fn mutate<F>(&self, user_id: UserId, mutation: F) -> Result<User, DomainError>
    where
        F: FnOnce(&mut User) -> Result<(), UserError>,
    {
        let mut user = self
            .repository
            .get_by_id_unfiltered(user_id)
            .await?
            .ok_or(DomainError::NotFound(user_id))?;

        mutation(&mut user)?;
        self.repository.update(&mut user).await?;
        Ok(user)
    }
}
