use crate::application_port::*;
use crate::domain_model::{AccessToken, IdToken, RefreshToken, Session, UserProfile};
use crate::domain_port::{SessionError, SessionProvider};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

const FAKE_SIGNING_KEY: &[u8] = b"library-catalog-fake-identity";
const FAKE_CONFIRMATION_CODE: &str = "123456";

#[derive(Serialize)]
struct FakeClaims<'a> {
    sub: &'a str,
    token_use: &'a str,
    jti: String,
    iat: i64,
    exp: i64,
}

struct SignedInUser {
    username: String,
    session: Session,
}

/// In-process identity provider for local development.
///
/// Any non-empty credentials sign in. Tokens are HS256 JWTs with a fresh
/// `jti`, so every refresh hands out a different access token.
pub struct FakeIdentityService {
    access_ttl: Duration,
    user: RwLock<Option<SignedInUser>>,
}

impl FakeIdentityService {
    pub fn new() -> Self {
        Self::with_access_ttl(Duration::hours(1))
    }

    pub fn with_access_ttl(access_ttl: Duration) -> Self {
        Self {
            access_ttl,
            user: RwLock::new(None),
        }
    }

    fn mint(&self, username: &str, token_use: &str, ttl: Duration) -> Result<String, IdentityError> {
        let now = Utc::now();
        let claims = FakeClaims {
            sub: username,
            token_use,
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(FAKE_SIGNING_KEY),
        )
        .map_err(|e| IdentityError::Provider {
            code: "TokenEncoding".into(),
            message: e.to_string(),
        })
    }

    fn issue_session(&self, username: &str, refresh: Option<RefreshToken>) -> Result<Session, IdentityError> {
        let refresh_token = match refresh {
            Some(token) => token,
            None => RefreshToken(self.mint(username, "refresh", Duration::days(30))?),
        };
        Ok(Session {
            access_token: Some(AccessToken(self.mint(username, "access", self.access_ttl)?)),
            id_token: Some(IdToken(self.mint(username, "id", self.access_ttl)?)),
            refresh_token: Some(refresh_token),
        })
    }
}

impl Default for FakeIdentityService {
    fn default() -> Self {
        Self::new()
    }
}

fn require(value: &str, what: &str) -> Result<(), IdentityError> {
    if value.trim().is_empty() {
        Err(IdentityError::InvalidInput(format!("{what} is required")))
    } else {
        Ok(())
    }
}

fn check_code(code: &str) -> Result<(), IdentityError> {
    if code == FAKE_CONFIRMATION_CODE {
        Ok(())
    } else {
        Err(IdentityError::InvalidCode(format!(
            "the fake provider only accepts {FAKE_CONFIRMATION_CODE}"
        )))
    }
}

#[async_trait::async_trait]
impl SessionProvider for FakeIdentityService {
    async fn current_session(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.user.read().await.as_ref().map(|u| u.session.clone()))
    }

    async fn refresh_session(&self) -> Result<Session, SessionError> {
        let mut user = self.user.write().await;
        let user = user.as_mut().ok_or(SessionError::NoUser)?;
        let refresh = user
            .session
            .refresh_token
            .clone()
            .ok_or(SessionError::NoRefreshToken)?;
        user.session = self.issue_session(&user.username, Some(refresh))?;
        Ok(user.session.clone())
    }
}

#[async_trait::async_trait]
impl IdentityService for FakeIdentityService {
    async fn sign_up(&self, input: SignUpInput) -> Result<SignUpResult, IdentityError> {
        require(&input.email, "email")?;
        require(&input.password, "password")?;
        Ok(SignUpResult {
            user_sub: uuid::Uuid::new_v4().to_string(),
            user_confirmed: false,
        })
    }

    async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<(), IdentityError> {
        require(username, "username")?;
        check_code(code)
    }

    async fn resend_confirmation_code(&self, username: &str) -> Result<(), IdentityError> {
        require(username, "username")
    }

    async fn sign_in(&self, input: SignInInput) -> Result<Session, IdentityError> {
        require(&input.email, "email")?;
        if input.password.is_empty() {
            return Err(IdentityError::NotAuthorized(
                "Incorrect username or password.".into(),
            ));
        }
        let session = self.issue_session(&input.email, None)?;
        *self.user.write().await = Some(SignedInUser {
            username: input.email,
            session: session.clone(),
        });
        Ok(session)
    }

    async fn sign_out(&self) {
        self.user.write().await.take();
    }

    async fn is_authenticated(&self) -> bool {
        match self.user.read().await.as_ref() {
            Some(user) => user.session.is_valid_at(Utc::now()),
            None => false,
        }
    }

    async fn current_user(&self) -> Result<UserProfile, IdentityError> {
        let user = self.user.read().await;
        let user = user.as_ref().ok_or(IdentityError::NotSignedIn)?;
        let attributes = BTreeMap::from([
            ("email".to_string(), user.username.clone()),
            ("email_verified".to_string(), "true".to_string()),
        ]);
        Ok(UserProfile {
            username: user.username.clone(),
            attributes,
        })
    }

    async fn forgot_password(&self, username: &str) -> Result<(), IdentityError> {
        require(username, "username")
    }

    async fn confirm_forgot_password(
        &self,
        username: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        require(username, "username")?;
        require(new_password, "new password")?;
        check_code(code)
    }
}
