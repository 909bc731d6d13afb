mod common;

use anyhow::Result;
use common::{assert_failure, read, TestServer, PASSWORD};
use reqwest::{Method, StatusCode};
use roadmap_api::auth::{JwtKeys, Role};
use serde_json::json;

#[tokio::test]
async fn protected_routes_answer_empty_401() -> Result<()> {
    let server = TestServer::spawn().await?;

    for token in [None, Some("not-a-jwt")] {
        let res = server.get("/api/me", token).await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.bytes().await?.is_empty());
    }

    // Signed with another secret
    let foreign = JwtKeys::new("some-other-secret", 1).issue("alice", Role::Member)?;
    let res = server.get("/api/me", Some(&foreign)).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.bytes().await?.is_empty());

    let res = server.get("/api/admin/users", None).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn identity_is_the_token_subject() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register("alice").await?;

    let token = server.state.keys.issue("alice", Role::Member)?;
    let (status, body) = read(server.get("/api/me", Some(&token)).await?).await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["username"], json!("alice"));
    assert!(body["data"].get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn optional_auth_never_blocks_public_routes() -> Result<()> {
    let server = TestServer::spawn().await?;

    for token in [None, Some("garbage")] {
        let (status, body) = read(server.get("/api/public/topics", token).await?).await?;
        assert_eq!(status, 200);
        assert_eq!(body, json!({ "success": true, "data": [] }));
    }
    Ok(())
}

#[tokio::test]
async fn register_then_login() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .send_json(
            Method::POST,
            "/api/public/auth/register",
            None,
            json!({ "username": "ada_l", "password": PASSWORD, "display_name": "Ada" }),
        )
        .await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, 201);
    assert_eq!(body["data"]["user"]["display_name"], json!("Ada"));
    assert_eq!(body["data"]["user"]["visibility"], json!("public"));

    let claims = server
        .state
        .keys
        .verify(body["data"]["token"].as_str().unwrap())?;
    assert_eq!(claims.sub, "ada_l");
    assert_eq!(claims.role, Role::Member);

    let res = server
        .send_json(
            Method::POST,
            "/api/public/auth/login",
            None,
            json!({ "username": "ada_l", "password": PASSWORD }),
        )
        .await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["user"]["username"], json!("ada_l"));
    Ok(())
}

#[tokio::test]
async fn bad_credentials_use_the_envelope() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register("alice").await?;

    for (username, password) in [("alice", "wrong-password"), ("nobody", PASSWORD)] {
        let res = server
            .send_json(
                Method::POST,
                "/api/public/auth/login",
                None,
                json!({ "username": username, "password": password }),
            )
            .await?;
        let (status, body) = read(res).await?;
        assert_eq!(status, 401);
        assert_failure(&body, "The username or password is incorrect.");
    }
    Ok(())
}

#[tokio::test]
async fn registration_validation() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register("alice").await?;

    let cases = [
        (json!({ "username": "al", "password": PASSWORD }), 400, "Usernames must be 3 to 30 characters of letters, digits or underscores."),
        (json!({ "username": "bob", "password": "short" }), 400, "Passwords must be at least 8 characters long."),
        (json!({ "username": "alice", "password": PASSWORD }), 409, "That username is already taken."),
        (json!({ "username": "bob" }), 400, "The request could not be understood."),
    ];

    for (payload, expected_status, message) in cases {
        let res = server
            .send_json(Method::POST, "/api/public/auth/register", None, payload)
            .await?;
        let (status, body) = read(res).await?;
        assert_eq!(status, expected_status);
        assert_failure(&body, message);
    }
    Ok(())
}

#[tokio::test]
async fn roles_do_not_cross_tiers() -> Result<()> {
    let server = TestServer::spawn().await?;
    let member = server.register("alice").await?;
    let admin = server.admin_token().await?;

    let (status, body) = read(server.get("/api/admin/users", Some(&member)).await?).await?;
    assert_eq!(status, 403);
    assert_failure(&body, "This area is for administrators only.");

    let (status, body) = read(server.get("/api/me", Some(&admin)).await?).await?;
    assert_eq!(status, 403);
    assert_failure(&body, "This area is for members only.");
    Ok(())
}

#[tokio::test]
async fn admin_token_for_missing_admin_is_refused() -> Result<()> {
    let server = TestServer::spawn().await?;

    let token = server.state.keys.issue("ghost", Role::Admin)?;
    let (status, body) = read(server.get("/api/admin/session", Some(&token)).await?).await?;
    assert_eq!(status, 403);
    assert_failure(&body, "This area is for administrators only.");
    Ok(())
}
