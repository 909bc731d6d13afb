mod common;

use anyhow::Result;
use common::{assert_failure, read, TestServer};
use reqwest::Method;
use serde_json::json;

#[tokio::test]
async fn profile_updates() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.register("alice").await?;

    let res = server
        .send_json(
            Method::PATCH,
            "/api/me",
            Some(&token),
            json!({ "display_name": "Alice L.", "bio": "Learning Rust" }),
        )
        .await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["display_name"], json!("Alice L."));
    assert_eq!(body["data"]["bio"], json!("Learning Rust"));

    let res = server
        .send_json(Method::PATCH, "/api/me", Some(&token), json!({ "display_name": "  " }))
        .await?;
    assert_eq!(read(res).await?.0, 400);

    let res = server
        .send_json(Method::PUT, "/api/me/avatar", Some(&token), json!({ "avatar": "fox" }))
        .await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["avatar"], json!("fox"));

    let res = server
        .send_json(Method::PUT, "/api/me/avatar", Some(&token), json!({ "avatar": "dragon" }))
        .await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, 400);
    assert_failure(&body, "Please choose one of the available avatars.");
    Ok(())
}

#[tokio::test]
async fn private_profiles_are_hidden_from_others() -> Result<()> {
    let server = TestServer::spawn().await?;
    let alice = server.register("alice").await?;
    let bob = server.register("bob_b").await?;

    let (status, _) = read(server.get("/api/public/users/alice", None).await?).await?;
    assert_eq!(status, 200);

    let res = server
        .send_json(
            Method::PUT,
            "/api/me/visibility",
            Some(&alice),
            json!({ "visibility": "private" }),
        )
        .await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["visibility"], json!("private"));

    for token in [None, Some(bob.as_str())] {
        let (status, body) = read(server.get("/api/public/users/alice", token).await?).await?;
        assert_eq!(status, 404);
        assert_failure(&body, "No such user.");
    }

    let (status, body) = read(server.get("/api/public/users/alice", Some(&alice)).await?).await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["username"], json!("alice"));
    Ok(())
}

#[tokio::test]
async fn group_membership_rules() -> Result<()> {
    let server = TestServer::spawn().await?;
    let alice = server.register("alice").await?;
    let bob = server.register("bob_b").await?;

    let res = server
        .send_json(Method::POST, "/api/me/groups", Some(&alice), json!({ "name": "  " }))
        .await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, 400);
    assert_failure(&body, "Groups need a name.");

    let res = server
        .send_json(
            Method::POST,
            "/api/me/groups",
            Some(&alice),
            json!({ "name": "Rustaceans", "description": "Weekly study" }),
        )
        .await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, 201);
    assert_eq!(body["data"]["owner"], json!("alice"));
    assert_eq!(body["data"]["member_count"], json!(1));
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let join = format!("/api/me/groups/{id}/join");
    let (status, body) = read(server.send_json(Method::POST, &join, Some(&bob), json!({})).await?).await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["member_count"], json!(2));

    let (status, body) = read(server.send_json(Method::POST, &join, Some(&bob), json!({})).await?).await?;
    assert_eq!(status, 409);
    assert_failure(&body, "You are already a member of this group.");

    let (_, body) = read(server.get("/api/me/groups", Some(&bob)).await?).await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let leave = format!("/api/me/groups/{id}/membership");
    let (status, body) = read(server.request(Method::DELETE, &leave, Some(&alice)).send().await?).await?;
    assert_eq!(status, 400);
    assert_failure(&body, "Group owners cannot leave their own group.");

    let (status, body) = read(server.request(Method::DELETE, &leave, Some(&bob)).send().await?).await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["member_count"], json!(1));

    let (status, body) = read(server.request(Method::DELETE, &leave, Some(&bob)).send().await?).await?;
    assert_eq!(status, 404);
    assert_failure(&body, "You are not a member of this group.");

    let missing = format!("/api/me/groups/{}/join", uuid::Uuid::new_v4());
    let (status, body) = read(server.send_json(Method::POST, &missing, Some(&bob), json!({})).await?).await?;
    assert_eq!(status, 404);
    assert_failure(&body, "No such group.");
    Ok(())
}

#[tokio::test]
async fn posts_belong_to_their_author() -> Result<()> {
    let server = TestServer::spawn().await?;
    let alice = server.register("alice").await?;
    let bob = server.register("bob_b").await?;

    let res = server
        .send_json(Method::POST, "/api/me/posts", Some(&alice), json!({ "title": "Hi", "body": "" }))
        .await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, 400);
    assert_failure(&body, "Posts need both a title and a body.");

    let res = server
        .send_json(
            Method::POST,
            "/api/me/posts",
            Some(&alice),
            json!({ "title": "Week 1", "body": "Finished chapter 4" }),
        )
        .await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, 201);
    assert_eq!(body["data"]["author"], json!("alice"));
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = read(server.get("/api/public/posts", None).await?).await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (_, body) = read(server.get("/api/me/posts", Some(&bob)).await?).await?;
    assert_eq!(body["data"], json!([]));

    let path = format!("/api/me/posts/{id}");
    let (status, body) = read(server.request(Method::DELETE, &path, Some(&bob)).send().await?).await?;
    assert_eq!(status, 403);
    assert_failure(&body, "You can only delete your own posts.");

    let (status, body) = read(server.request(Method::DELETE, &path, Some(&alice)).send().await?).await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["id"], json!(id));

    let (status, body) = read(server.get(&format!("/api/public/posts/{id}"), None).await?).await?;
    assert_eq!(status, 404);
    assert_failure(&body, "No such post.");
    Ok(())
}
