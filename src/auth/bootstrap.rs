// Startup provisioning of the first administrator account

use tracing::info;

use crate::auth::{
    error::AuthError,
    models::{ROLE_ADMIN, ROLE_MANAGER},
    password::PasswordService,
    repository::UserRepository,
};
use crate::config::BootstrapAdmin;

/// Create the configured admin account unless the username already exists
///
/// Returns `true` when an account was created.
pub async fn ensure_bootstrap_admin(
    users: &UserRepository,
    admin: &BootstrapAdmin,
) -> Result<bool, AuthError> {
    if users.username_exists(&admin.username).await? {
        info!(username = %admin.username, "Bootstrap admin already present");
        return Ok(false);
    }

    PasswordService::validate_password_strength(&admin.password)?;
    let hash = PasswordService::hash_password_blocking(admin.password.clone()).await?;

    users
        .create_user(
            &admin.username,
            &admin.username,
            &hash,
            &[ROLE_ADMIN, ROLE_MANAGER],
        )
        .await?;

    info!(username = %admin.username, "Bootstrap admin created");
    Ok(true)
}
