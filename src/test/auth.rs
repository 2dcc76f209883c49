use axum::http::StatusCode;

use crate::{
    auth::SESSION_COOKIE,
    test::{LEADER_TOKEN, OUTSIDER_TOKEN, sign_in, test_config, test_server},
};

#[tokio::test]
async fn landing_page_offers_sign_in() {
    let (server, _pool) = test_server(test_config());

    let response = server.get("/").await;
    response.assert_status_ok();
    let text = response.text();
    assert!(text.contains("IDEATHON 2026"));
    assert!(text.contains("What to Expect"));
    assert!(text.contains("Event Timeline"));
    assert!(text.contains("Sign in with Google"));
    assert!(text.contains("href=\"/auth/sign-in\""));
}

#[tokio::test]
async fn sign_in_redirects_to_provider() {
    let mut config = test_config();
    config.auth.sign_in_url = "https://accounts.example.com/o/oauth".to_string();
    let (server, _pool) = test_server(config);

    let response = server.get("/auth/sign-in").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        response.header("location"),
        "https://accounts.example.com/o/oauth"
    );
}

#[tokio::test]
async fn university_email_gets_a_session() {
    let (server, _pool) = test_server(test_config());

    let response = server
        .get("/auth/callback")
        .add_query_param("token", LEADER_TOKEN)
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/register");
    let cookie = response.cookie(SESSION_COOKIE);
    assert!(cookie.http_only().unwrap_or(false));
    // encrypted, so the email is not readable from the cookie
    assert!(!cookie.value().contains("ada@adypu.edu.in"));

    let landing = server.get("/").add_cookie(cookie).await;
    landing.assert_status_ok();
    assert!(landing.text().contains("ada@adypu.edu.in"));
    assert!(landing.text().contains("Continue to registration"));
}

#[tokio::test]
async fn other_domains_are_denied() {
    let (server, _pool) = test_server(test_config());

    let response = server
        .get("/auth/callback")
        .add_query_param("token", OUTSIDER_TOKEN)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert!(response.text().contains(
        "Access denied. Please sign in with your @adypu.edu.in email address."
    ));
    assert!(!response.text().contains("eve@gmail.com"));
}

#[tokio::test]
async fn unknown_tokens_are_unauthorized() {
    let (server, _pool) = test_server(test_config());

    let response = server
        .get("/auth/callback")
        .add_query_param("token", "forged")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(response.text().contains("Sign-in failed"));

    server
        .get("/auth/callback")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_is_rechecked_against_the_allowed_domain() {
    let mut config = test_config();
    let (server, _pool) = test_server(config.clone());
    let cookie = sign_in(&server, LEADER_TOKEN).await;

    // same key, but the domain has since been narrowed
    config.auth.allowed_domain = "@staff.adypu.edu.in".to_string();
    let (narrowed, _pool) = test_server(config);

    let response = narrowed.get("/register").add_cookie(cookie).await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert!(response.text().contains("@staff.adypu.edu.in"));
    assert_eq!(response.cookie(SESSION_COOKIE).value(), "");
}

#[tokio::test]
async fn sign_out_clears_the_session() {
    let (server, _pool) = test_server(test_config());
    let cookie = sign_in(&server, LEADER_TOKEN).await;

    let response = server.post("/auth/sign-out").add_cookie(cookie).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");
    let cleared = response.cookie(SESSION_COOKIE);
    assert_eq!(cleared.value(), "");

    let response = server.get("/register").add_cookie(cleared).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");
}
