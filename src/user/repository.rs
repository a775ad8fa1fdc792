//! Handle identity and refresh-token requests.

use std::sync::Arc;

use sqlx::PgPool;

use crate::error::Result;
use crate::gateway::{
    AppUser, GatewayResult, IdentityGateway, Role, SignInStatus,
};
use crate::token::{RefreshToken, RefreshTokenStore};

/// Data-access facade for Compass identity operations.
///
/// Identity concerns are one-line forwards to the [`IdentityGateway`];
/// refresh tokens go through [`RefreshTokenStore`]. Errors from either
/// collaborator are returned untouched.
#[derive(Clone)]
pub struct UserRepository {
    gateway: Arc<dyn IdentityGateway>,
    tokens: RefreshTokenStore,
}

impl UserRepository {
    /// Create a new [`UserRepository`].
    pub fn new(gateway: Arc<dyn IdentityGateway>, pool: PgPool) -> Self {
        Self {
            gateway,
            tokens: RefreshTokenStore::new(pool),
        }
    }

    /// Sign `user` in with a password.
    pub async fn login_user(
        &self,
        user: &AppUser,
        password: &str,
        remember_me: bool,
    ) -> GatewayResult<SignInStatus> {
        self.gateway.password_sign_in(user, password, remember_me).await
    }

    /// Register a new user.
    pub async fn register_user(
        &self,
        user: &AppUser,
        password: &str,
    ) -> GatewayResult<()> {
        self.gateway.create_user(user, password).await
    }

    /// Check a password without signing in.
    pub async fn validate_password(
        &self,
        user: &AppUser,
        password: &str,
    ) -> GatewayResult<bool> {
        self.gateway.check_password(user, password).await
    }

    /// Generate an email-confirmation token.
    pub async fn generate_email_confirmation_token(
        &self,
        user: &AppUser,
    ) -> GatewayResult<String> {
        self.gateway.generate_email_confirmation_token(user).await
    }

    /// Find a user using `id` field.
    pub async fn get_user_by_id(
        &self,
        id: &str,
    ) -> GatewayResult<Option<AppUser>> {
        self.gateway.find_by_id(id).await
    }

    /// Confirm the user's email.
    pub async fn confirm_email(
        &self,
        user: &AppUser,
        token: &str,
    ) -> GatewayResult<()> {
        self.gateway.confirm_email(user, token).await
    }

    /// Find a user using `email` field.
    pub async fn get_user_by_email(
        &self,
        email: &str,
    ) -> GatewayResult<Option<AppUser>> {
        self.gateway.find_by_email(email).await
    }

    /// Generate a password-reset token.
    pub async fn generate_password_reset_token(
        &self,
        user: &AppUser,
    ) -> GatewayResult<String> {
        self.gateway.generate_password_reset_token(user).await
    }

    /// Reset the user's password.
    pub async fn reset_password(
        &self,
        user: &AppUser,
        token: &str,
        password: &str,
    ) -> GatewayResult<()> {
        self.gateway.reset_password(user, token, password).await
    }

    /// Persist a refresh token issued on login.
    pub async fn save_refresh_token(
        &self,
        token: &RefreshToken,
    ) -> Result<()> {
        self.tokens.save(token).await
    }

    /// Look a refresh token up by its value on renewal.
    pub async fn check_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshToken>> {
        self.tokens.find_by_token(token).await
    }

    /// Rewrite a rotated refresh token in place.
    pub async fn update_refresh_token(
        &self,
        token: &RefreshToken,
    ) -> Result<()> {
        self.tokens.update(token).await
    }

    /// Names of the roles `user` belongs to.
    pub async fn get_roles(&self, user: &AppUser) -> GatewayResult<Vec<String>> {
        self.gateway.roles_of(user).await
    }

    /// Every registered user.
    pub async fn get_all_users(&self) -> GatewayResult<Vec<AppUser>> {
        self.gateway.all_users().await
    }

    /// Every role known to the gateway.
    pub async fn get_all_roles(&self) -> GatewayResult<Vec<Role>> {
        self.gateway.all_roles().await
    }

    /// Add `user` to `role`.
    pub async fn add_user_to_role(
        &self,
        user: &AppUser,
        role: &str,
    ) -> GatewayResult<()> {
        self.gateway.add_to_role(user, role).await
    }

    /// Persist changes to the user handle.
    pub async fn update_user(&self, user: &AppUser) -> GatewayResult<()> {
        self.gateway.update_user(user).await
    }

    /// Replace the password, checking the current one first.
    pub async fn change_password(
        &self,
        user: &AppUser,
        current_password: &str,
        new_password: &str,
    ) -> GatewayResult<()> {
        self.gateway
            .change_password(user, current_password, new_password)
            .await
    }

    /// Replace the email.
    pub async fn change_email(
        &self,
        user: &AppUser,
        new_email: &str,
        token: &str,
    ) -> GatewayResult<()> {
        self.gateway.change_email(user, new_email, token).await
    }

    /// Make `role` the user's only role.
    ///
    /// Already a member: nothing to do. Otherwise the user is removed from
    /// every listed role before the target one is added.
    pub async fn change_role(
        &self,
        user: &AppUser,
        role: &str,
    ) -> GatewayResult<()> {
        if self.gateway.is_in_role(user, role).await? {
            tracing::debug!(user_id = %user.id, role, "user already in role");
            return Ok(());
        }

        let roles: Vec<String> = self
            .gateway
            .all_roles()
            .await?
            .into_iter()
            .map(|r| r.name)
            .collect();
        self.gateway.remove_from_roles(user, &roles).await?;

        self.gateway.add_to_role(user, role).await
    }

    /// Enable lockout for `user`.
    pub async fn lock_user(&self, user: &AppUser) -> GatewayResult<()> {
        self.gateway.set_lockout_enabled(user, true).await
    }

    /// Disable lockout for `user`.
    pub async fn unlock_user(&self, user: &AppUser) -> GatewayResult<()> {
        self.gateway.set_lockout_enabled(user, false).await
    }

    /// Delete `user` from the gateway.
    pub async fn delete_user(&self, user: &AppUser) -> GatewayResult<()> {
        self.gateway.delete_user(user).await
    }
}
