mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn profile_lifecycle() -> Result<()> {
    let app = TestApp::new();
    let (user_id, token) = app.user();

    let res = app.get("/api/profile", Some(&token)).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.error(), "Profile not found");

    let res = app
        .put(
            "/api/profile",
            &token,
            json!({
                "display_name": "  Sam Reyes ",
                "bio": "Gaffer, 10 years on features",
                "website": "https://samreyes.example",
                "skills": ["Lighting", "lighting", "Rigging"]
            }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["display_name"], "Sam Reyes");
    assert_eq!(res.data()["skills"], json!(["Lighting", "Rigging"]));

    let res = app.get(&format!("/api/profiles/{}", user_id), None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["display_name"], "Sam Reyes");
    assert_eq!(res.data()["roles"], json!([]));
    Ok(())
}

#[tokio::test]
async fn profile_validation_reports_field() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = app.user();

    let res = app
        .put("/api/profile", &token, json!({ "display_name": "   " }))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert_eq!(res.error(), "Invalid field 'display_name': must not be empty");
    assert_eq!(res.body["details"]["display_name"], "must not be empty");

    let res = app
        .put(
            "/api/profile",
            &token,
            json!({ "display_name": "Sam", "avatar_url": "ftp://nope" }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["details"]["avatar_url"].is_string());
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_invalid_json() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = app.user();

    let request = axum::http::Request::builder()
        .method("PUT")
        .uri("/api/profile")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"display_name\": "))?;
    let res = app.send(request).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn unknown_public_profile_is_404() -> Result<()> {
    let app = TestApp::new();

    let res = app.get(&format!("/api/profiles/{}", uuid::Uuid::new_v4()), None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.get("/api/profiles/not-a-uuid", None).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "Invalid field 'id': must be a valid UUID");
    Ok(())
}

#[tokio::test]
async fn roles_add_replace_remove() -> Result<()> {
    let app = TestApp::new();
    let (user_id, token) = app.user();

    let res = app.post("/api/profile/roles", &token, json!({ "role": "Gaffer" })).await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.data()["role"], "Gaffer");

    let res = app.post("/api/profile/roles", &token, json!({ "role": "gaffer" })).await?;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.error(), "Role already added");

    let res = app
        .put("/api/profile/roles", &token, json!({ "roles": ["Grip", "Best Boy", "grip"] }))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    let roles: Vec<&str> = res
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["Grip", "Best Boy"]);

    let res = app.delete("/api/profile/roles/Grip", &token).await?;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.delete("/api/profile/roles/Grip", &token).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    app.put("/api/profile", &token, json!({ "display_name": "Jo" })).await?;
    let res = app.get(&format!("/api/profiles/{}", user_id), None).await?;
    assert_eq!(res.data()["roles"], json!(["Best Boy"]));
    Ok(())
}

#[tokio::test]
async fn roles_fold_non_ascii_case() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = app.user();

    let res = app
        .put("/api/profile/roles", &token, json!({ "roles": ["Éclairagiste", "éclairagiste"] }))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data().as_array().unwrap().len(), 1);
    assert_eq!(res.data()[0]["role"], "Éclairagiste");

    let res = app.post("/api/profile/roles", &token, json!({ "role": "ÉCLAIRAGISTE" })).await?;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.error(), "Role already added");

    // ÉCLAIRAGISTE, percent-encoded
    let res = app.delete("/api/profile/roles/%C3%89CLAIRAGISTE", &token).await?;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.get("/api/profile/roles", Some(&token)).await?;
    assert_eq!(res.data(), &json!([]));
    Ok(())
}

#[tokio::test]
async fn remove_role_bad_segment_is_enveloped() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = app.user();

    let res = app.delete("/api/profile/roles/%FF", &token).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.body["code"], "BAD_REQUEST");
    Ok(())
}
