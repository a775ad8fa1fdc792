//! Seam to the external identity framework.
//!
//! Credential checks, confirmation tokens, role membership and lockout all
//! live behind [`IdentityGateway`]; this crate forwards to it and never
//! re-implements its behavior. Implementations are supplied by the
//! embedding application.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Failure reported by the identity gateway.
///
/// Forwarded to callers verbatim: a `code` the gateway defines and a
/// human-readable `description`.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{code}: {description}")]
pub struct GatewayError {
    pub code: String,
    pub description: String,
}

impl GatewayError {
    /// Create a new [`GatewayError`].
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// User handle owned by the identity gateway.
///
/// The data layer passes it to and from the gateway without looking inside.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppUser {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// Role descriptor owned by the identity gateway.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
}

/// Outcome of a password sign-in attempt.
///
/// A failed attempt is a status, not an error: the gateway reports how the
/// attempt ended and the caller decides what to do with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignInStatus {
    Succeeded,
    LockedOut,
    RequiresTwoFactor,
    NotAllowed,
    Failed,
}

impl SignInStatus {
    /// Whether the attempt produced a session.
    pub fn succeeded(&self) -> bool {
        matches!(self, SignInStatus::Succeeded)
    }
}

/// External identity framework.
///
/// Every method maps to one framework operation; errors come back as
/// [`GatewayError`] with the gateway's own codes.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Sign `user` in with a password. Failed attempts count toward
    /// lockout.
    async fn password_sign_in(
        &self,
        user: &AppUser,
        password: &str,
        persistent: bool,
    ) -> GatewayResult<SignInStatus>;

    /// Register a new user with the given password.
    async fn create_user(
        &self,
        user: &AppUser,
        password: &str,
    ) -> GatewayResult<()>;

    /// Check a password without signing in.
    async fn check_password(
        &self,
        user: &AppUser,
        password: &str,
    ) -> GatewayResult<bool>;

    /// Generate an email-confirmation token for `user`.
    async fn generate_email_confirmation_token(
        &self,
        user: &AppUser,
    ) -> GatewayResult<String>;

    /// Mark the user's email confirmed if `token` checks out.
    async fn confirm_email(
        &self,
        user: &AppUser,
        token: &str,
    ) -> GatewayResult<()>;

    /// Find a user by id.
    async fn find_by_id(&self, id: &str) -> GatewayResult<Option<AppUser>>;

    /// Find a user by email.
    async fn find_by_email(
        &self,
        email: &str,
    ) -> GatewayResult<Option<AppUser>>;

    /// Generate a password-reset token for `user`.
    async fn generate_password_reset_token(
        &self,
        user: &AppUser,
    ) -> GatewayResult<String>;

    /// Replace the user's password if `token` checks out.
    async fn reset_password(
        &self,
        user: &AppUser,
        token: &str,
        password: &str,
    ) -> GatewayResult<()>;

    /// Names of the roles `user` belongs to.
    async fn roles_of(&self, user: &AppUser) -> GatewayResult<Vec<String>>;

    /// Every registered user.
    async fn all_users(&self) -> GatewayResult<Vec<AppUser>>;

    /// Every role known to the gateway.
    async fn all_roles(&self) -> GatewayResult<Vec<Role>>;

    /// Whether `user` belongs to `role`.
    async fn is_in_role(
        &self,
        user: &AppUser,
        role: &str,
    ) -> GatewayResult<bool>;

    /// Add `user` to `role`.
    async fn add_to_role(
        &self,
        user: &AppUser,
        role: &str,
    ) -> GatewayResult<()>;

    /// Remove `user` from each role in `roles`.
    async fn remove_from_roles(
        &self,
        user: &AppUser,
        roles: &[String],
    ) -> GatewayResult<()>;

    /// Persist changes to the user handle.
    async fn update_user(&self, user: &AppUser) -> GatewayResult<()>;

    /// Replace the password, checking the current one first.
    async fn change_password(
        &self,
        user: &AppUser,
        current_password: &str,
        new_password: &str,
    ) -> GatewayResult<()>;

    /// Replace the email if `token` checks out.
    async fn change_email(
        &self,
        user: &AppUser,
        new_email: &str,
        token: &str,
    ) -> GatewayResult<()>;

    /// Enable or disable lockout for `user`.
    async fn set_lockout_enabled(
        &self,
        user: &AppUser,
        enabled: bool,
    ) -> GatewayResult<()>;

    /// Delete `user` from the gateway.
    async fn delete_user(&self, user: &AppUser) -> GatewayResult<()>;
}
