use sqlx::PgPool;
use tracing::{info, warn};

use crate::auth::dto::{LoginRequest, LoginResponse};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::verify_password;
use crate::error::ApiError;
use crate::users::repo::User;

/// Exchange credentials for a bearer token. Unknown email and wrong
/// password collapse into the same 401 so accounts cannot be enumerated.
pub async fn login(db: &PgPool, keys: &JwtKeys, req: LoginRequest) -> Result<LoginResponse, ApiError> {
    let email = req.email.trim().to_lowercase();

    let user = match User::find_by_email(db, &email).await? {
        Some(u) => u,
        None => {
            warn!(email = %email, "login with unknown email");
            return Err(ApiError::Unauthorized("invalid credentials".into()));
        }
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = user.id, "login with invalid password");
        return Err(ApiError::Unauthorized("invalid credentials".into()));
    }

    let token = keys.sign(&user.email)?;
    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(LoginResponse {
        token,
        user: user.into(),
    })
}
