use anyhow::Result;
use chrono::Utc;
use contracts::system::auth::UserRole;
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User};

use super::repository;
use crate::shared::error::{not_found_error, validation_error};
use crate::system::auth::password;

fn validate_email(email: &Option<String>) -> Result<()> {
    if let Some(ref email) = email {
        if !email.trim().is_empty() && !email.contains('@') {
            return Err(validation_error("Invalid email format"));
        }
    }
    Ok(())
}

/// Create a new user (admin provisioning)
pub async fn create(dto: CreateUserDto, created_by: Option<String>) -> Result<String> {
    let username = dto.username.trim().to_string();
    if username.is_empty() {
        return Err(validation_error("Username cannot be empty"));
    }

    if repository::get_by_username(&username).await?.is_some() {
        return Err(validation_error("Username already exists"));
    }

    validate_email(&dto.email)?;
    password::validate_password_strength(&dto.password).map_err(validation_error)?;

    let password_hash = password::hash_password(&dto.password)?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let user = User {
        id: user_id.clone(),
        username,
        email: dto.email,
        full_name: dto.full_name,
        is_active: true,
        role: dto.role,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
        created_by,
    };

    repository::create_with_password(&user, &password_hash).await?;
    tracing::info!("User {} created with role {}", user.username, user.role.as_str());

    Ok(user_id)
}

/// Update user profile, activity flag and role
pub async fn update(dto: UpdateUserDto) -> Result<()> {
    let mut user = repository::get_by_id(&dto.id)
        .await?
        .ok_or_else(|| not_found_error("User"))?;

    validate_email(&dto.email)?;

    let loses_admin = user.role == UserRole::Admin
        && user.is_active
        && (dto.role != UserRole::Admin || !dto.is_active);
    if loses_admin && repository::count_active_admins().await? <= 1 {
        return Err(validation_error("Cannot demote or deactivate the last admin"));
    }

    user.email = dto.email;
    user.full_name = dto.full_name;
    user.is_active = dto.is_active;
    user.role = dto.role;
    user.updated_at = Utc::now().to_rfc3339();

    repository::update(&user).await
}

/// Delete user; the last active admin cannot be removed
pub async fn delete(id: &str) -> Result<bool> {
    if let Some(user) = repository::get_by_id(id).await? {
        if user.role == UserRole::Admin
            && user.is_active
            && repository::count_active_admins().await? <= 1
        {
            return Err(validation_error("Cannot delete the last admin"));
        }
    }
    repository::delete(id).await
}

pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> Result<Vec<User>> {
    repository::list_all().await
}

/// Change user password
pub async fn change_password(dto: ChangePasswordDto, requester_id: &str) -> Result<()> {
    repository::get_by_id(&dto.user_id)
        .await?
        .ok_or_else(|| not_found_error("User"))?;

    let requester = repository::get_by_id(requester_id)
        .await?
        .ok_or_else(|| validation_error("Requester not found"))?;

    if dto.user_id != requester_id {
        // Someone else's password: admin only, no old password needed
        if requester.role != UserRole::Admin {
            return Err(validation_error("Permission denied"));
        }
    } else {
        let old_password = dto
            .old_password
            .as_deref()
            .ok_or_else(|| validation_error("Old password is required"))?;
        let current_hash = repository::get_password_hash(&dto.user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Password hash not found"))?;

        if !password::verify_password(old_password, &current_hash)? {
            return Err(validation_error("Invalid old password"));
        }
    }

    password::validate_password_strength(&dto.new_password).map_err(validation_error)?;
    let new_hash = password::hash_password(&dto.new_password)?;
    repository::update_password(&dto.user_id, &new_hash).await
}

/// Verify user credentials (for login). Inactive users can't log in.
pub async fn verify_credentials(username: &str, password: &str) -> Result<Option<User>> {
    let user = match repository::get_by_username(username.trim()).await? {
        Some(u) => u,
        None => return Ok(None),
    };

    if !user.is_active {
        tracing::warn!("Login attempt for inactive user {}", user.username);
        return Ok(None);
    }

    let password_hash = repository::get_password_hash(&user.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Password hash not found"))?;

    if !password::verify_password(password, &password_hash)? {
        return Ok(None);
    }

    if let Err(e) = repository::update_last_login(&user.id).await {
        tracing::warn!("Failed to update last login for {}: {}", user.username, e);
    }

    Ok(Some(user))
}
