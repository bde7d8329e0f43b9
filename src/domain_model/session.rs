use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! secret_token {
    ($name:ident) => {
        #[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "(<redacted>)"))
            }
        }
    };
}

secret_token!(AccessToken);
secret_token!(IdToken);
secret_token!(RefreshToken);

/// Credentials for the signed-in user, as handed out by a session provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<AccessToken>,
    pub id_token: Option<IdToken>,
    pub refresh_token: Option<RefreshToken>,
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

impl Session {
    /// Expiry of the access token, read from its `exp` claim.
    ///
    /// The signature is not checked: the token was issued to us and the
    /// server remains the one to verify it.
    pub fn access_token_expires_at(&self) -> Option<DateTime<Utc>> {
        let token = self.access_token.as_ref()?;
        let mut validation = Validation::new(Algorithm::RS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data =
            decode::<ExpiryClaims>(token.as_str(), &DecodingKey::from_secret(&[]), &validation)
                .ok()?;
        DateTime::from_timestamp(data.claims.exp?, 0)
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.access_token_expires_at() {
            Some(expires_at) => expires_at > now,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn jwt_expiring_at(exp: DateTime<Utc>) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "sub": "reader", "exp": exp.timestamp() }),
            &EncodingKey::from_secret(b"anything"),
        )
        .unwrap()
    }

    fn session_with(access: Option<String>) -> Session {
        Session {
            access_token: access.map(AccessToken),
            id_token: None,
            refresh_token: Some(RefreshToken("refresh".into())),
        }
    }

    #[test]
    fn reads_expiry_without_the_signing_key() {
        let exp = DateTime::from_timestamp(Utc::now().timestamp() + 600, 0).unwrap();
        let session = session_with(Some(jwt_expiring_at(exp)));
        assert_eq!(session.access_token_expires_at(), Some(exp));
        assert!(session.is_valid_at(Utc::now()));
        assert!(!session.is_valid_at(exp + Duration::seconds(1)));
    }

    #[test]
    fn opaque_or_missing_tokens_are_not_valid() {
        assert!(!session_with(Some("not-a-jwt".into())).is_valid_at(Utc::now()));
        assert!(!session_with(None).is_valid_at(Utc::now()));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let session = session_with(Some("top-secret".into()));
        let printed = format!("{session:?}");
        assert!(!printed.contains("top-secret"));
        assert!(printed.contains("AccessToken(<redacted>)"));
    }
}
