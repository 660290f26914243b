use crate::helpers::{json_body, TestApp};

#[tokio::test]
async fn trusted_by_lists_image_files_in_order() {
    let test_app = TestApp::spawn_app().await;
    std::fs::create_dir_all(&test_app.trustedby_dir).unwrap();
    for name in ["zurich.svg", "acme.png", "brand.JPG", "notes.txt"] {
        std::fs::write(test_app.trustedby_dir.join(name), "").unwrap();
    }

    let response = test_app.get("trustedby").await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        json_body(response).await,
        serde_json::json!({
            "logos": ["/trustedby/acme.png", "/trustedby/brand.JPG", "/trustedby/zurich.svg"]
        })
    );
}

#[tokio::test]
async fn trusted_by_is_empty_when_directory_is_missing() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.get("trustedby").await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(json_body(response).await, serde_json::json!({ "logos": [] }));
}
