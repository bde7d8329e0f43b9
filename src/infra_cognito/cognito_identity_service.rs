use crate::application_port::*;
use crate::domain_model::{AccessToken, IdToken, RefreshToken, Session, UserProfile};
use crate::domain_port::{
    HttpMethod, HttpTransport, SessionError, SessionProvider, TransportRequest,
};
use chrono::Utc;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

const AMZ_JSON: &str = "application/x-amz-json-1.1";
const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";

#[derive(Debug, Clone)]
pub struct CognitoConfig {
    pub user_pool_id: String,
    pub client_id: String,
    /// Overrides the regional endpoint derived from the pool id.
    pub endpoint: Option<String>,
}

impl CognitoConfig {
    pub fn endpoint_url(&self) -> Result<String, IdentityError> {
        if let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
            return Ok(endpoint.to_string());
        }
        match self.user_pool_id.split_once('_') {
            Some((region, _)) if !region.is_empty() => {
                Ok(format!("https://cognito-idp.{region}.amazonaws.com/"))
            }
            _ => Err(IdentityError::InvalidInput(format!(
                "user pool id {:?} does not start with a region",
                self.user_pool_id
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    access_token: Option<String>,
    id_token: Option<String>,
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    authentication_result: Option<AuthenticationResult>,
    challenge_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SignUpResponse {
    #[serde(default)]
    user_confirmed: bool,
    #[serde(default)]
    user_sub: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AttributeType {
    name: String,
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetUserResponse {
    username: String,
    #[serde(default)]
    user_attributes: Vec<AttributeType>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type", default)]
    kind: String,
    #[serde(alias = "Message", default)]
    message: String,
}

/// Identity provider backed by an Amazon Cognito user pool.
///
/// The session lives in memory only. `current_session` refreshes an expired
/// access token before handing the session out, the way the hosted SDK's
/// session lookup does.
pub struct CognitoIdentityService {
    config: CognitoConfig,
    endpoint: String,
    transport: Arc<dyn HttpTransport>,
    session: RwLock<Option<Session>>,
}

impl CognitoIdentityService {
    pub fn try_new(
        config: CognitoConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, IdentityError> {
        let endpoint = config.endpoint_url()?;
        Ok(Self {
            config,
            endpoint,
            transport,
            session: RwLock::new(None),
        })
    }

    async fn call<T: DeserializeOwned>(&self, action: &str, body: Value) -> Result<T, IdentityError> {
        let request = TransportRequest {
            method: HttpMethod::Post,
            url: self.endpoint.clone(),
            query: Vec::new(),
            headers: vec![
                ("Content-Type".to_string(), AMZ_JSON.to_string()),
                ("X-Amz-Target".to_string(), format!("{TARGET_PREFIX}.{action}")),
            ],
            body: Some(body),
        };
        debug!(action, "calling identity provider");
        let response = self
            .transport
            .send(&request)
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;
        if !response.is_success() {
            return Err(provider_error(response.status, &response.body));
        }
        let body = if response.body.trim().is_empty() {
            "{}"
        } else {
            response.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| IdentityError::Provider {
            code: "InvalidResponse".into(),
            message: e.to_string(),
        })
    }

    async fn refresh_with(&self, refresh_token: RefreshToken) -> Result<Session, IdentityError> {
        let response: InitiateAuthResponse = self
            .call(
                "InitiateAuth",
                json!({
                    "AuthFlow": "REFRESH_TOKEN_AUTH",
                    "ClientId": self.config.client_id,
                    "AuthParameters": { "REFRESH_TOKEN": refresh_token.as_str() },
                }),
            )
            .await?;
        session_from(response, Some(refresh_token))
    }

    async fn refresh_held_session(&self) -> Result<Session, SessionError> {
        let refresh_token = {
            let held = self.session.read().await;
            let held = held.as_ref().ok_or(SessionError::NoUser)?;
            held.refresh_token.clone().ok_or(SessionError::NoRefreshToken)?
        };
        let session = self.refresh_with(refresh_token.clone()).await?;
        let mut held = self.session.write().await;
        // Sign-out or a new sign-in may have replaced the session mid-call.
        match held.as_ref() {
            Some(current) if current.refresh_token.as_ref() == Some(&refresh_token) => {
                *held = Some(session.clone());
                Ok(session)
            }
            _ => Err(SessionError::NoUser),
        }
    }
}

fn session_from(
    response: InitiateAuthResponse,
    previous_refresh: Option<RefreshToken>,
) -> Result<Session, IdentityError> {
    let Some(result) = response.authentication_result else {
        return Err(IdentityError::ChallengeRequired(
            response.challenge_name.unwrap_or_else(|| "unknown".to_string()),
        ));
    };
    Ok(Session {
        access_token: result.access_token.map(AccessToken),
        id_token: result.id_token.map(IdToken),
        refresh_token: result.refresh_token.map(RefreshToken).or(previous_refresh),
    })
}

fn provider_error(status: u16, body: &str) -> IdentityError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or(ErrorBody {
        kind: String::new(),
        message: String::new(),
    });
    // Types may arrive qualified, e.g. "com.amazonaws...#NotAuthorizedException".
    let kind = parsed.kind.rsplit('#').next().unwrap_or_default().to_string();
    let message = if parsed.message.is_empty() {
        format!("status {status}")
    } else {
        parsed.message
    };
    match kind.as_str() {
        "NotAuthorizedException" => IdentityError::NotAuthorized(message),
        "UserNotConfirmedException" => IdentityError::UserNotConfirmed,
        "UsernameExistsException" => IdentityError::UsernameExists,
        "UserNotFoundException" => IdentityError::UserNotFound,
        "CodeMismatchException" | "ExpiredCodeException" => IdentityError::InvalidCode(message),
        "" => IdentityError::Provider {
            code: status.to_string(),
            message,
        },
        _ => IdentityError::Provider {
            code: kind,
            message,
        },
    }
}

#[async_trait::async_trait]
impl SessionProvider for CognitoIdentityService {
    async fn current_session(&self) -> Result<Option<Session>, SessionError> {
        let held = self.session.read().await.clone();
        match held {
            None => Ok(None),
            Some(session) if session.is_valid_at(Utc::now()) => Ok(Some(session)),
            Some(_) => {
                debug!("access token expired, refreshing before use");
                self.refresh_held_session().await.map(Some)
            }
        }
    }

    async fn refresh_session(&self) -> Result<Session, SessionError> {
        self.refresh_held_session().await
    }
}

#[async_trait::async_trait]
impl IdentityService for CognitoIdentityService {
    async fn sign_up(&self, input: SignUpInput) -> Result<SignUpResult, IdentityError> {
        let response: SignUpResponse = self
            .call(
                "SignUp",
                json!({
                    "ClientId": self.config.client_id,
                    "Username": input.email,
                    "Password": input.password,
                    "UserAttributes": [
                        { "Name": "email", "Value": input.email },
                        { "Name": "name", "Value": input.name },
                        { "Name": "phone_number", "Value": input.phone_number },
                    ],
                }),
            )
            .await?;
        Ok(SignUpResult {
            user_sub: response.user_sub,
            user_confirmed: response.user_confirmed,
        })
    }

    async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<(), IdentityError> {
        let _: Value = self
            .call(
                "ConfirmSignUp",
                json!({
                    "ClientId": self.config.client_id,
                    "Username": username,
                    "ConfirmationCode": code,
                    "ForceAliasCreation": true,
                }),
            )
            .await?;
        Ok(())
    }

    async fn resend_confirmation_code(&self, username: &str) -> Result<(), IdentityError> {
        let _: Value = self
            .call(
                "ResendConfirmationCode",
                json!({ "ClientId": self.config.client_id, "Username": username }),
            )
            .await?;
        Ok(())
    }

    async fn sign_in(&self, input: SignInInput) -> Result<Session, IdentityError> {
        let response: InitiateAuthResponse = self
            .call(
                "InitiateAuth",
                json!({
                    "AuthFlow": "USER_PASSWORD_AUTH",
                    "ClientId": self.config.client_id,
                    "AuthParameters": {
                        "USERNAME": input.email,
                        "PASSWORD": input.password,
                    },
                }),
            )
            .await?;
        let session = session_from(response, None)?;
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) {
        self.session.write().await.take();
    }

    async fn is_authenticated(&self) -> bool {
        matches!(self.current_session().await, Ok(Some(s)) if s.is_valid_at(Utc::now()))
    }

    async fn current_user(&self) -> Result<UserProfile, IdentityError> {
        let session = self.current_session().await?.ok_or(IdentityError::NotSignedIn)?;
        let access_token = session.access_token.ok_or(IdentityError::NotSignedIn)?;
        let response: GetUserResponse = self
            .call("GetUser", json!({ "AccessToken": access_token.as_str() }))
            .await?;
        let attributes: BTreeMap<String, String> = response
            .user_attributes
            .into_iter()
            .map(|a| (a.name, a.value))
            .collect();
        Ok(UserProfile {
            username: response.username,
            attributes,
        })
    }

    async fn forgot_password(&self, username: &str) -> Result<(), IdentityError> {
        let _: Value = self
            .call(
                "ForgotPassword",
                json!({ "ClientId": self.config.client_id, "Username": username }),
            )
            .await?;
        Ok(())
    }

    async fn confirm_forgot_password(
        &self,
        username: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        let _: Value = self
            .call(
                "ConfirmForgotPassword",
                json!({
                    "ClientId": self.config.client_id,
                    "Username": username,
                    "ConfirmationCode": code,
                    "Password": new_password,
                }),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pool: &str) -> CognitoConfig {
        CognitoConfig {
            user_pool_id: pool.into(),
            client_id: "client".into(),
            endpoint: None,
        }
    }

    #[test]
    fn endpoint_comes_from_the_pool_region() {
        assert_eq!(
            config("eu-west-1_AbC123").endpoint_url().unwrap(),
            "https://cognito-idp.eu-west-1.amazonaws.com/"
        );
        assert!(config("nopool").endpoint_url().is_err());
        let overridden = CognitoConfig {
            endpoint: Some("http://127.0.0.1:9229".into()),
            ..config("nopool")
        };
        assert_eq!(overridden.endpoint_url().unwrap(), "http://127.0.0.1:9229");
    }

    #[test]
    fn maps_provider_error_types() {
        let body = r#"{"__type":"com.amazonaws.cognito#NotAuthorizedException","message":"Incorrect username or password."}"#;
        assert_eq!(
            provider_error(400, body),
            IdentityError::NotAuthorized("Incorrect username or password.".into())
        );
        assert_eq!(
            provider_error(400, r#"{"__type":"UserNotConfirmedException"}"#),
            IdentityError::UserNotConfirmed
        );
        assert_eq!(
            provider_error(503, "<html>"),
            IdentityError::Provider {
                code: "503".into(),
                message: "status 503".into()
            }
        );
    }

    #[test]
    fn refresh_keeps_the_previous_refresh_token() {
        let response = InitiateAuthResponse {
            authentication_result: Some(AuthenticationResult {
                access_token: Some("access".into()),
                id_token: Some("id".into()),
                refresh_token: None,
            }),
            challenge_name: None,
        };
        let session = session_from(response, Some(RefreshToken("kept".into()))).unwrap();
        assert_eq!(session.refresh_token, Some(RefreshToken("kept".into())));
    }

    #[test]
    fn challenges_are_reported() {
        let response = InitiateAuthResponse {
            authentication_result: None,
            challenge_name: Some("NEW_PASSWORD_REQUIRED".into()),
        };
        assert_eq!(
            session_from(response, None).unwrap_err(),
            IdentityError::ChallengeRequired("NEW_PASSWORD_REQUIRED".into())
        );
    }
}
