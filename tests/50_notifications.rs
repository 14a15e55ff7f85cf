mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::TestApp;

/// Two strangers like one author's post, giving the author two notifications.
async fn seed(app: &TestApp) -> Result<(String, Uuid)> {
    let (_, author_token) = app.user();
    let post = app
        .post("/api/slate", &author_token, json!({ "content": "Day 12, wrapped early" }))
        .await?
        .id();

    for _ in 0..2 {
        let (_, fan_token) = app.user();
        let res = app
            .request(
                axum::http::Method::POST,
                &format!("/api/slate/{}/like", post),
                Some(&fan_token),
                None,
            )
            .await?;
        assert_eq!(res.status, StatusCode::CREATED);
    }
    Ok((author_token, post))
}

#[tokio::test]
async fn read_flow() -> Result<()> {
    let app = TestApp::new();
    let (token, _) = seed(&app).await?;

    let res = app.get("/api/notifications/unread-count", Some(&token)).await?;
    assert_eq!(res.data()["count"], 2);

    let res = app.get("/api/notifications?limit=1", Some(&token)).await?;
    assert_eq!(res.data()["total"], 2);
    assert_eq!(res.data()["has_more"], true);
    let first = res.data()["items"][0]["id"].as_str().unwrap().to_string();

    let res = app
        .request(
            axum::http::Method::PATCH,
            &format!("/api/notifications/{}/read", first),
            Some(&token),
            None,
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.data()["read_at"].is_string());

    let res = app.get("/api/notifications?unread=true", Some(&token)).await?;
    assert_eq!(res.data()["total"], 1);

    let res = app
        .request(axum::http::Method::POST, "/api/notifications/read-all", Some(&token), None)
        .await?;
    assert_eq!(res.data()["updated"], 1);

    let res = app.get("/api/notifications/unread-count", Some(&token)).await?;
    assert_eq!(res.data()["count"], 0);

    let res = app.delete(&format!("/api/notifications/{}", first), &token).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Notification deleted");

    let res = app.get("/api/notifications", Some(&token)).await?;
    assert_eq!(res.data()["total"], 1);
    Ok(())
}

#[tokio::test]
async fn other_users_notifications_are_invisible() -> Result<()> {
    let app = TestApp::new();
    let (token, _) = seed(&app).await?;
    let (_, stranger) = app.user();

    let res = app.get("/api/notifications", Some(&token)).await?;
    let id = res.data()["items"][0]["id"].as_str().unwrap().to_string();

    let res = app
        .request(
            axum::http::Method::PATCH,
            &format!("/api/notifications/{}/read", id),
            Some(&stranger),
            None,
        )
        .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.error(), "Notification not found");

    let res = app.delete(&format!("/api/notifications/{}", id), &stranger).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.get("/api/notifications", Some(&stranger)).await?;
    assert_eq!(res.data()["total"], 0);

    let res = app.get("/api/notifications", None).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}
