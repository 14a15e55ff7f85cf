mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::TestApp;

#[tokio::test]
async fn availability_crud_and_window() -> Result<()> {
    let app = TestApp::new();
    let (user_id, token) = app.user();

    let res = app
        .post(
            "/api/availability",
            &token,
            json!({ "start_date": "2026-11-01", "end_date": "2026-11-05", "note": "Prep week" }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.data()["status"], "available");
    assert_eq!(res.data()["user_id"], user_id.to_string());
    let first = res.id();

    app.post(
        "/api/availability",
        &token,
        json!({ "start_date": "2026-12-10", "end_date": "2026-12-12", "status": "busy" }),
    )
    .await?;

    let res = app.get("/api/availability", Some(&token)).await?;
    assert_eq!(res.data().as_array().unwrap().len(), 2);
    assert_eq!(res.data()[0]["start_date"], "2026-11-01");

    let res = app
        .get("/api/availability?from=2026-11-04&to=2026-11-30", Some(&token))
        .await?;
    assert_eq!(res.data().as_array().unwrap().len(), 1);
    assert_eq!(res.data()[0]["id"], first.to_string());

    let res = app
        .get("/api/availability?from=2026-12-01&to=2026-11-01", Some(&token))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .patch(
            &format!("/api/availability/{}", first),
            &token,
            json!({ "status": "tentative", "note": "" }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["status"], "tentative");
    assert!(res.data()["note"].is_null());
    assert_eq!(res.data()["end_date"], "2026-11-05");

    // Patch that would leave the range inverted
    let res = app
        .patch(
            &format!("/api/availability/{}", first),
            &token,
            json!({ "start_date": "2026-11-09" }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "Invalid field 'end_date': must not be before start_date");

    let res = app.delete(&format!("/api/availability/{}", first), &token).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Availability deleted");
    Ok(())
}

#[tokio::test]
async fn availability_rejects_inverted_range() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = app.user();

    let res = app
        .post(
            "/api/availability",
            &token,
            json!({ "start_date": "2026-11-05", "end_date": "2026-11-01" }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["details"]["end_date"], "must not be before start_date");

    let res = app
        .post("/api/availability", &token, json!({ "start_date": "next tuesday", "end_date": "2026-11-01" }))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn availability_of_others_is_not_found() -> Result<()> {
    let app = TestApp::new();
    let (_, owner) = app.user();
    let (_, stranger) = app.user();

    let id = app
        .post(
            "/api/availability",
            &owner,
            json!({ "start_date": "2026-11-01", "end_date": "2026-11-01" }),
        )
        .await?
        .id();

    let res = app
        .patch(&format!("/api/availability/{}", id), &stranger, json!({ "status": "busy" }))
        .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.error(), "Availability entry not found");

    let res = app.delete(&format!("/api/availability/{}", id), &stranger).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.get("/api/availability", Some(&stranger)).await?;
    assert_eq!(res.data(), &json!([]));
    Ok(())
}

#[tokio::test]
async fn contacts_crud_search_and_scope() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = app.user();
    let (linked, linked_token) = app.user();

    // The linked user must exist; resolving their token creates the row
    app.get("/api/auth/whoami", Some(&linked_token)).await?;

    let res = app
        .post(
            "/api/contacts",
            &token,
            json!({ "name": "Rita Moreno", "role": "Script supervisor", "email": "rita@crew.test", "contact_user_id": linked }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.data()["contact_user_id"], linked.to_string());
    let rita = res.id();

    app.post("/api/contacts", &token, json!({ "name": "Abe", "role": "Grip" })).await?;
    app.post("/api/contacts", &token, json!({ "name": "Zoe", "role": "Gaffer" })).await?;

    let res = app.get("/api/contacts", Some(&token)).await?;
    assert_eq!(res.data()["total"], 3);
    assert_eq!(res.data()["items"][0]["name"], "Abe");

    let res = app.get("/api/contacts?search=script", Some(&token)).await?;
    assert_eq!(res.data()["total"], 1);
    assert_eq!(res.data()["items"][0]["id"], rita.to_string());

    let res = app.get("/api/contacts?limit=2", Some(&token)).await?;
    assert_eq!(res.data()["items"].as_array().unwrap().len(), 2);
    assert_eq!(res.data()["has_more"], true);

    let res = app
        .patch(&format!("/api/contacts/{}", rita), &token, json!({ "phone": "555-0100", "email": "" }))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["phone"], "555-0100");
    assert!(res.data()["email"].is_null());

    let res = app
        .patch(&format!("/api/contacts/{}", rita), &token, json!({ "email": "not-an-email" }))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["details"]["email"], "must be a valid email address");

    // Someone else's contact reads as missing
    let res = app
        .patch(&format!("/api/contacts/{}", rita), &linked_token, json!({ "name": "Mine" }))
        .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.error(), "Contact not found");

    let res = app.delete(&format!("/api/contacts/{}", rita), &linked_token).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.delete(&format!("/api/contacts/{}", rita), &token).await?;
    assert_eq!(res.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn contact_link_to_unknown_user_is_404() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = app.user();

    let res = app
        .post(
            "/api/contacts",
            &token,
            json!({ "name": "Ghost", "contact_user_id": Uuid::new_v4() }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.error(), "Linked user not found");
    Ok(())
}
