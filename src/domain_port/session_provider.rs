use crate::domain_model::Session;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no user signed in")]
    NoUser,
    #[error("no refresh token available")]
    NoRefreshToken,
    #[error("identity provider error: {0}")]
    Provider(String),
}

/// Owner of the current session. Clients read from it and ask it to
/// refresh; they never write the session themselves.
#[async_trait::async_trait]
pub trait SessionProvider: Send + Sync {
    /// The session as it stands now, or `None` when nobody is signed in.
    async fn current_session(&self) -> Result<Option<Session>, SessionError>;
    /// Exchanges the refresh token for fresh access and identity tokens.
    async fn refresh_session(&self) -> Result<Session, SessionError>;
}
