use std::collections::HashMap;

use crate::helpers::{json_body, TestApp};

#[tokio::test]
async fn admin_lists_local_subscribers() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .post_subscribe_form(HashMap::from([("email", "first@example.com")]))
        .await;
    test_app
        .post_game_subscribe_form(HashMap::from([("email", "second@example.com")]))
        .await;

    let response = test_app.get("admin/subscribers").await;

    assert_eq!(200, response.status().as_u16());
    let body = json_body(response).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["subscribers"][0]["email"], "first@example.com");
    assert_eq!(body["subscribers"][1]["source"], "arcade");
}

#[tokio::test]
async fn admin_listing_is_not_routed_unless_enabled() {
    let test_app =
        TestApp::spawn_app_with(|config| config.application.admin_listing = false).await;

    let response = test_app.get("admin/subscribers").await;

    assert_eq!(404, response.status().as_u16());
}
