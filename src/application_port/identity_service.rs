use crate::domain_model::{Session, UserProfile};
use crate::domain_port::{SessionError, SessionProvider};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("not authorized: {0}")]
    NotAuthorized(String),
    #[error("user is not confirmed")]
    UserNotConfirmed,
    #[error("user already exists")]
    UsernameExists,
    #[error("user not found")]
    UserNotFound,
    #[error("invalid or expired code: {0}")]
    InvalidCode(String),
    #[error("additional sign-in step required: {0}")]
    ChallengeRequired(String),
    #[error("no user signed in")]
    NotSignedIn,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("identity provider error {code}: {message}")]
    Provider { code: String, message: String },
    #[error("identity provider unreachable: {0}")]
    Transport(String),
}

impl From<IdentityError> for SessionError {
    fn from(error: IdentityError) -> Self {
        match error {
            IdentityError::NotSignedIn => SessionError::NoUser,
            other => SessionError::Provider(other.to_string()),
        }
    }
}

impl From<SessionError> for IdentityError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::NoUser => IdentityError::NotSignedIn,
            other => IdentityError::NotAuthorized(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpResult {
    pub user_sub: String,
    pub user_confirmed: bool,
}

#[derive(Debug, Clone)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Account lifecycle against the hosted identity provider. Every identity
/// service also owns the session it signs in, hence the supertrait.
#[async_trait::async_trait]
pub trait IdentityService: SessionProvider {
    async fn sign_up(&self, input: SignUpInput) -> Result<SignUpResult, IdentityError>;
    async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<(), IdentityError>;
    async fn resend_confirmation_code(&self, username: &str) -> Result<(), IdentityError>;
    async fn sign_in(&self, input: SignInInput) -> Result<Session, IdentityError>;
    async fn sign_out(&self);
    async fn is_authenticated(&self) -> bool;
    async fn current_user(&self) -> Result<UserProfile, IdentityError>;
    async fn forgot_password(&self, username: &str) -> Result<(), IdentityError>;
    async fn confirm_forgot_password(
        &self,
        username: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), IdentityError>;
}
