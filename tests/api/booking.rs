use crate::helpers::TestApp;

#[tokio::test]
async fn booking_redirects_to_contact_without_booking_url() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.get("booking").await;

    assert_eq!(303, response.status().as_u16());
    assert_eq!(response.headers()["location"], "/contact");
}

#[tokio::test]
async fn booking_redirects_to_the_configured_page() {
    let test_app = TestApp::spawn_app_with(|config| {
        config.application.booking_url = Some(String::from("https://cal.example.com/intro"))
    })
    .await;

    let response = test_app.get("booking").await;

    assert_eq!(303, response.status().as_u16());
    assert_eq!(
        response.headers()["location"],
        "https://cal.example.com/intro"
    );
}
