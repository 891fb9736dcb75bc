use sqlx::PgPool;
use tracing::info;

use crate::auth::password::hash_password;
use crate::error::ApiError;
use crate::users::dto::{CreateUserRequest, UserView};
use crate::users::repo::User;

/// Create a user account. Admin-only at the policy layer; here we only
/// enforce email uniqueness and hashing.
pub async fn create_user(db: &PgPool, req: CreateUserRequest) -> Result<UserView, ApiError> {
    let new = req.validate()?;

    if User::exists_by_email(db, &new.email).await? {
        return Err(ApiError::DuplicateEmail);
    }

    let hash = hash_password(&new.password)?;
    // The uniqueness check above is advisory; a racing create loses at the
    // UNIQUE constraint and is folded into the same conflict by from_db.
    let user = User::create(db, &new.name, &new.email, &hash, new.role)
        .await
        .map_err(ApiError::from_db)?;
    info!(user_id = user.id, email = %user.email, role = ?user.role, "user created");
    Ok(user.into())
}

pub async fn list_users(db: &PgPool) -> Result<Vec<UserView>, ApiError> {
    let users = User::list(db).await?;
    Ok(users.into_iter().map(UserView::from).collect())
}

pub async fn get_user(db: &PgPool, id: i64) -> Result<UserView, ApiError> {
    let user = User::find_by_id(db, id)
        .await?
        .ok_or(ApiError::UserNotFound(id))?;
    Ok(user.into())
}
