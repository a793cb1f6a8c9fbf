//! Integration tests for GoTrue auth flows against a mock Supabase server.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jconnect_supabase::{Session, SignUpOutcome, SupabaseClient, SupabaseConfig, SupabaseError};

fn client_for(server: &MockServer) -> SupabaseClient {
    SupabaseClient::new(SupabaseConfig::new(server.uri(), "anon-key")).unwrap()
}

fn grant_json(access_token: &str, refresh_token: &str) -> serde_json::Value {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": refresh_token,
        "user": {
            "id": "u-1",
            "email": "asha@example.com",
            "user_metadata": {"full_name": "Asha Rao"}
        }
    })
}

#[tokio::test]
async fn sign_in_installs_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(body_json(json!({
            "email": "asha@example.com",
            "password": "hunter2!"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant_json("at-1", "rt-1")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let session = client
        .sign_in_with_password("asha@example.com", "hunter2!")
        .await
        .unwrap();
    assert_eq!(session.user_id(), "u-1");
    assert_eq!(session.user.full_name(), Some("Asha Rao"));

    let stored = client.session().snapshot().await.unwrap();
    assert_eq!(stored.access_token, "at-1");
    assert!(stored.is_valid());
}

#[tokio::test]
async fn bad_credentials_surface_the_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .sign_in_with_password("asha@example.com", "wrong")
        .await
        .unwrap_err();
    match err {
        SupabaseError::AuthError(message) => {
            assert_eq!(message, "Invalid login credentials");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!client.session().has_session().await);
}

#[tokio::test]
async fn sign_up_with_confirmation_pending_returns_the_user_without_a_session() {
    let server = MockServer::start().await;
    // No access_token in the body: confirmation email flow
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(body_json(json!({
            "email": "ravi@example.com",
            "password": "hunter2!",
            "data": {"full_name": "Ravi Kumar"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-2",
            "email": "ravi@example.com",
            "user_metadata": {"full_name": "Ravi Kumar"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let outcome = client
        .sign_up("ravi@example.com", "hunter2!", "Ravi Kumar")
        .await
        .unwrap();
    match outcome {
        SignUpOutcome::ConfirmationRequired(user) => {
            assert_eq!(user.id, "u-2");
            assert_eq!(user.full_name(), Some("Ravi Kumar"));
        }
        SignUpOutcome::SignedIn(_) => panic!("expected confirmation-required outcome"),
    }
    assert!(!client.session().has_session().await);
}

#[tokio::test]
async fn sign_up_with_autoconfirm_signs_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant_json("at-1", "rt-1")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let outcome = client
        .sign_up("asha@example.com", "hunter2!", "Asha Rao")
        .await
        .unwrap();
    assert!(matches!(outcome, SignUpOutcome::SignedIn(_)));
    assert!(client.session().has_session().await);
}

#[tokio::test]
async fn sign_out_revokes_server_side_and_clears_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("Authorization", "Bearer at-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .session()
        .set(Session::new(
            "at-1",
            "rt-1",
            3600,
            jconnect_supabase::AuthUser {
                id: "u-1".to_string(),
                email: None,
                user_metadata: serde_json::Value::Null,
            },
        ))
        .await;

    client.sign_out().await.unwrap();
    assert!(!client.session().has_session().await);
}

#[tokio::test]
async fn sign_out_clears_locally_even_when_revocation_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"msg": "try later"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .session()
        .set(Session::new(
            "at-1",
            "rt-1",
            3600,
            jconnect_supabase::AuthUser {
                id: "u-1".to_string(),
                email: None,
                user_metadata: serde_json::Value::Null,
            },
        ))
        .await;

    client.sign_out().await.unwrap();
    assert!(!client.session().has_session().await);
}

#[tokio::test]
async fn restore_session_exchanges_the_refresh_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_json(json!({"refresh_token": "persisted-rt"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant_json("at-2", "rt-2")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let session = client.restore_session("persisted-rt").await.unwrap();
    assert_eq!(session.access_token, "at-2");

    let stored = client.session().snapshot().await.unwrap();
    assert_eq!(stored.refresh_token, "rt-2");
}

#[tokio::test]
async fn revoked_refresh_token_fails_the_restore() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error_description": "Invalid Refresh Token: Already Used"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.restore_session("burned-rt").await.unwrap_err();
    assert!(matches!(err, SupabaseError::AuthError(_)));
    assert!(!client.session().has_session().await);
}

#[tokio::test]
async fn password_recovery_posts_the_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/recover"))
        .and(body_json(json!({"email": "asha@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .reset_password_for_email("asha@example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn sign_up_rate_limit_carries_the_retry_delay() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "30")
                .set_body_json(json!({"msg": "over email rate limit"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .sign_up("asha@example.com", "hunter2!", "Asha Rao")
        .await
        .unwrap_err();
    assert!(matches!(err, SupabaseError::RateLimited(30)));
}
