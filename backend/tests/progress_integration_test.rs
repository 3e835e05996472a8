//! Integration tests for body measurements and progress images

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_measurement_stats_and_progress() {
    let app = common::TestApp::new().await;
    let user = app.create_user().await;

    let (status, latest) = app.get_auth("/api/v1/body-measurements/latest", &user.token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(latest.is_null());

    let (_, stats) = app.get_auth("/api/v1/body-measurements/stats", &user.token).await;
    assert!(stats.is_null());

    for (date, weight, body_fat) in [
        ("2024-01-01T08:00:00Z", json!(90.0), json!(25.0)),
        ("2024-01-15T08:00:00Z", json!(null), json!(24.0)),
        ("2024-01-31T08:00:00Z", json!(87.5), json!(null)),
    ] {
        let (status, _) = app
            .post_auth(
                "/api/v1/body-measurements",
                json!({ "date": date, "weight": weight, "body_fat": body_fat }),
                &user.token,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, stats) = app.get_auth("/api/v1/body-measurements/stats", &user.token).await;
    assert_eq!(stats["period_days"], 30);
    assert_eq!(stats["changes"]["weight"], -2.5);
    // Latest has no body fat, so there is no change to report
    assert!(stats["changes"]["body_fat"].is_null());

    let (status, points) = app
        .get_auth("/api/v1/body-measurements/progress/weight", &user.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let values: Vec<f64> = points
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["value"].as_f64().unwrap())
        .collect();
    assert_eq!(values, vec![90.0, 87.5]);

    let (status, response) = app
        .get_auth("/api/v1/body-measurements/progress/shoe_size", &user.token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["field"], "field");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_upload_list_and_delete_image() {
    let app = common::TestApp::new().await;
    let user = app.create_user().await;

    let png = b"\x89PNG\r\n\x1a\nfake-image-data";
    let body = common::multipart(
        Some(("front.png", "image/png", &png[..])),
        &[("date", "2024-02-10"), ("category", "front"), ("description", "Week 6")],
    );

    let (status, image) = app.upload_image(&user.token, body).await;
    assert_eq!(status, StatusCode::CREATED, "upload failed: {image}");
    assert_eq!(image["category"], "front");

    let url = image["image_url"].as_str().unwrap();
    assert!(url.starts_with("uploads/") && url.ends_with(".png"));
    assert_eq!(app.stored_files(), 1);

    // The stored file is served back
    let (status, _, bytes) = app
        .raw(Request::builder().uri(format!("/{url}")).body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, png.to_vec());

    let (_, categories) = app.get_auth("/api/v1/progress-images/categories", &user.token).await;
    assert_eq!(categories, json!(["front"]));

    let (_, timeline) = app.get_auth("/api/v1/progress-images/timeline", &user.token).await;
    assert_eq!(timeline[0]["month"], "2024-02");

    let id = image["id"].as_str().unwrap();
    let (status, _) = app
        .delete_auth(&format!("/api/v1/progress-images/{id}"), &user.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.stored_files(), 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_non_image_upload_creates_nothing() {
    let app = common::TestApp::new().await;
    let user = app.create_user().await;

    let body = common::multipart(Some(("notes.txt", "text/plain", &b"not an image"[..])), &[]);
    let (status, _) = app.upload_image(&user.token, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, images) = app.get_auth("/api/v1/progress-images", &user.token).await;
    assert!(images.as_array().unwrap().is_empty());
    assert_eq!(app.stored_files(), 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_oversized_upload_rejected() {
    let app = common::TestApp::new().await;
    let user = app.create_user().await;

    // The test app allows 1 MiB per file
    let big = vec![0u8; 1024 * 1024 + 1];
    let body = common::multipart(Some(("big.jpg", "image/jpeg", big.as_slice())), &[]);
    let (status, _) = app.upload_image(&user.token, body).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.stored_files(), 0);
}
