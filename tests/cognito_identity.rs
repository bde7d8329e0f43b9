//! Cognito identity flows against a wiremock stand-in for the provider.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use library_catalog::application_port::{IdentityError, IdentityService, SignInInput, SignUpInput};
use library_catalog::domain_model::RefreshToken;
use library_catalog::domain_port::{SessionError, SessionProvider};
use library_catalog::infra_cognito::{CognitoConfig, CognitoIdentityService};
use library_catalog::infra_http::ReqwestTransport;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TARGET: &str = "x-amz-target";

fn jwt(subject: &str, ttl: Duration) -> String {
    let exp = (Utc::now() + ttl).timestamp();
    encode(
        &Header::default(),
        &json!({ "sub": subject, "exp": exp, "jti": uuid::Uuid::new_v4().to_string() }),
        &EncodingKey::from_secret(b"cognito-test"),
    )
    .unwrap()
}

fn service(server: &MockServer) -> CognitoIdentityService {
    CognitoIdentityService::try_new(
        CognitoConfig {
            user_pool_id: "us-east-1_TestPool".into(),
            client_id: "test-client".into(),
            endpoint: Some(server.uri()),
        },
        Arc::new(ReqwestTransport::new().unwrap()),
    )
    .unwrap()
}

fn credentials() -> SignInInput {
    SignInInput {
        email: "reader@example.com".into(),
        password: "Secret123!".into(),
    }
}

async fn mount_sign_in(server: &MockServer, access: &str) {
    Mock::given(method("POST"))
        .and(header(TARGET, "AWSCognitoIdentityProviderService.InitiateAuth"))
        .and(header("content-type", "application/x-amz-json-1.1"))
        .and(body_partial_json(json!({
            "AuthFlow": "USER_PASSWORD_AUTH",
            "ClientId": "test-client",
            "AuthParameters": { "USERNAME": "reader@example.com" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "AuthenticationResult": {
                "AccessToken": access,
                "IdToken": "id-token",
                "RefreshToken": "refresh-token",
                "ExpiresIn": 3600,
                "TokenType": "Bearer"
            },
            "ChallengeParameters": {}
        })))
        .mount(server)
        .await;
}

async fn mount_refresh(server: &MockServer, access: &str) {
    Mock::given(method("POST"))
        .and(header(TARGET, "AWSCognitoIdentityProviderService.InitiateAuth"))
        .and(body_partial_json(json!({
            "AuthFlow": "REFRESH_TOKEN_AUTH",
            "AuthParameters": { "REFRESH_TOKEN": "refresh-token" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "AuthenticationResult": {
                "AccessToken": access,
                "IdToken": "id-token-2",
                "ExpiresIn": 3600,
                "TokenType": "Bearer"
            }
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn sign_in_then_refresh_keeps_the_refresh_token() {
    let server = MockServer::start().await;
    let first = jwt("reader", Duration::hours(1));
    let second = jwt("reader", Duration::hours(1));
    mount_sign_in(&server, &first).await;
    mount_refresh(&server, &second).await;
    let identity = service(&server);

    let session = identity.sign_in(credentials()).await.unwrap();
    assert_eq!(session.access_token.unwrap().0, first);
    assert!(identity.is_authenticated().await);

    let refreshed = identity.refresh_session().await.unwrap();
    assert_eq!(refreshed.access_token.clone().unwrap().0, second);
    assert_eq!(refreshed.refresh_token, Some(RefreshToken("refresh-token".into())));
    assert_eq!(identity.current_session().await.unwrap(), Some(refreshed));
}

#[tokio::test]
async fn expired_session_is_refreshed_on_lookup() {
    let server = MockServer::start().await;
    let fresh = jwt("reader", Duration::hours(1));
    mount_sign_in(&server, &jwt("reader", Duration::minutes(-5))).await;
    mount_refresh(&server, &fresh).await;
    let identity = service(&server);

    identity.sign_in(credentials()).await.unwrap();
    let session = identity.current_session().await.unwrap().unwrap();

    assert_eq!(session.access_token.unwrap().0, fresh);
}

#[tokio::test]
async fn wrong_password_maps_to_not_authorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "__type": "NotAuthorizedException",
            "message": "Incorrect username or password."
        })))
        .mount(&server)
        .await;
    let identity = service(&server);

    let err = identity.sign_in(credentials()).await.unwrap_err();

    assert_eq!(
        err,
        IdentityError::NotAuthorized("Incorrect username or password.".into())
    );
    assert!(identity.current_session().await.unwrap().is_none());
}

#[tokio::test]
async fn refresh_without_sign_in_fails_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = service(&server).refresh_session().await.unwrap_err();

    assert_eq!(err, SessionError::NoUser);
}

#[tokio::test]
async fn current_user_reads_attributes() {
    let server = MockServer::start().await;
    let access = jwt("reader", Duration::hours(1));
    mount_sign_in(&server, &access).await;
    Mock::given(method("POST"))
        .and(header(TARGET, "AWSCognitoIdentityProviderService.GetUser"))
        .and(body_partial_json(json!({ "AccessToken": access })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Username": "reader",
            "UserAttributes": [
                { "Name": "email", "Value": "reader@example.com" },
                { "Name": "email_verified", "Value": "true" },
                { "Name": "name", "Value": "Avid Reader" }
            ]
        })))
        .mount(&server)
        .await;
    let identity = service(&server);
    identity.sign_in(credentials()).await.unwrap();

    let user = identity.current_user().await.unwrap();

    assert_eq!(user.username, "reader");
    assert_eq!(user.attribute("name"), Some("Avid Reader"));
    assert!(user.email_verified());
}

#[tokio::test]
async fn sign_up_sends_profile_attributes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header(TARGET, "AWSCognitoIdentityProviderService.SignUp"))
        .and(body_partial_json(json!({
            "ClientId": "test-client",
            "Username": "new@example.com",
            "UserAttributes": [
                { "Name": "email", "Value": "new@example.com" },
                { "Name": "name", "Value": "New Reader" },
                { "Name": "phone_number", "Value": "+15555550100" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "UserConfirmed": false,
            "UserSub": "5f1c-sub"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = service(&server)
        .sign_up(SignUpInput {
            email: "new@example.com".into(),
            password: "Secret123!".into(),
            name: "New Reader".into(),
            phone_number: "+15555550100".into(),
        })
        .await
        .unwrap();

    assert_eq!(result.user_sub, "5f1c-sub");
    assert!(!result.user_confirmed);
}

#[tokio::test]
async fn bad_confirmation_code_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header(TARGET, "AWSCognitoIdentityProviderService.ConfirmForgotPassword"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "__type": "CodeMismatchException",
            "message": "Invalid verification code provided, please try again."
        })))
        .mount(&server)
        .await;

    let err = service(&server)
        .confirm_forgot_password("reader", "000000", "NewSecret123!")
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityError::InvalidCode(_)));
}

#[tokio::test]
async fn sign_out_during_refresh_does_not_restore_the_session() {
    let server = MockServer::start().await;
    mount_sign_in(&server, &jwt("reader", Duration::hours(1))).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "AuthFlow": "REFRESH_TOKEN_AUTH" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "AuthenticationResult": {
                        "AccessToken": jwt("reader", Duration::hours(1)),
                        "IdToken": "id-token-2",
                        "ExpiresIn": 3600,
                        "TokenType": "Bearer"
                    }
                }))
                .set_delay(std::time::Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let identity = Arc::new(service(&server));
    identity.sign_in(credentials()).await.unwrap();

    let refreshing = {
        let identity = identity.clone();
        tokio::spawn(async move { identity.refresh_session().await })
    };
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    identity.sign_out().await;

    assert_eq!(refreshing.await.unwrap().unwrap_err(), SessionError::NoUser);
    assert!(identity.current_session().await.unwrap().is_none());
    assert!(!identity.is_authenticated().await);
    assert_eq!(identity.refresh_session().await.unwrap_err(), SessionError::NoUser);
}
