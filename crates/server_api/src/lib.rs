use shared::{
    domain::{User, UserId},
    error::{ApiError, ErrorCode},
};
use storage::{Storage, UserWrite};
use tracing::error;

pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_EMAIL_BYTES: usize = 254;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_users(ctx: &ApiContext) -> Result<Vec<User>, ApiError> {
    ctx.storage.list_users().await.map_err(internal)
}

pub async fn create_user(ctx: &ApiContext, name: &str, email: &str) -> Result<User, ApiError> {
    let (name, email) = validate_user_fields(name, email)?;
    if ctx
        .storage
        .email_in_use(email, None)
        .await
        .map_err(internal)?
    {
        return Err(email_conflict());
    }
    match ctx.storage.create_user(name, email).await.map_err(internal)? {
        UserWrite::Saved(user) => Ok(user),
        // Lost a race with a concurrent write of the same email.
        UserWrite::EmailTaken => Err(email_conflict()),
    }
}

pub async fn update_user(
    ctx: &ApiContext,
    user_id: UserId,
    name: &str,
    email: &str,
) -> Result<User, ApiError> {
    let (name, email) = validate_user_fields(name, email)?;
    if ctx
        .storage
        .email_in_use(email, Some(user_id))
        .await
        .map_err(internal)?
    {
        return Err(email_conflict());
    }
    match ctx
        .storage
        .update_user(user_id, name, email)
        .await
        .map_err(internal)?
    {
        Some(UserWrite::Saved(user)) => Ok(user),
        Some(UserWrite::EmailTaken) => Err(email_conflict()),
        None => Err(ApiError::new(ErrorCode::NotFound, "user not found")),
    }
}

pub async fn delete_user(ctx: &ApiContext, user_id: UserId) -> Result<(), ApiError> {
    let removed = ctx
        .storage
        .delete_user(user_id)
        .await
        .map_err(internal)?;
    if !removed {
        return Err(ApiError::new(ErrorCode::NotFound, "user not found"));
    }
    Ok(())
}

/// Trims both fields and checks them; returns the trimmed values.
pub fn validate_user_fields<'a>(
    name: &'a str,
    email: &'a str,
) -> Result<(&'a str, &'a str), ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::new(ErrorCode::Validation, "name is required"));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(ApiError::new(
            ErrorCode::Validation,
            format!("name exceeds {MAX_NAME_CHARS} characters"),
        ));
    }

    let email = email.trim();
    if email.is_empty() {
        return Err(ApiError::new(ErrorCode::Validation, "email is required"));
    }
    if email.len() > MAX_EMAIL_BYTES {
        return Err(ApiError::new(
            ErrorCode::Validation,
            format!("email exceeds {MAX_EMAIL_BYTES} bytes"),
        ));
    }
    if !is_plausible_email(email) {
        return Err(ApiError::new(ErrorCode::Validation, "email is malformed"));
    }

    Ok((name, email))
}

fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => !local.is_empty() && !domain.is_empty(),
        _ => false,
    }
}

fn email_conflict() -> ApiError {
    ApiError::new(ErrorCode::Conflict, "email is already in use")
}

fn internal(err: anyhow::Error) -> ApiError {
    error!(error = %format!("{err:#}"), "storage operation failed");
    ApiError::new(ErrorCode::Internal, "storage operation failed")
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
