use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{json_body, TestApp};

fn valid_contact() -> serde_json::Value {
    serde_json::json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "company": "Analytical Engines",
        "message": "We would like a RAG chatbot."
    })
}

#[tokio::test]
async fn contact_forwards_the_request_to_the_inbox() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(path("/emails"))
        .and(method("POST"))
        .and(header("Authorization", "Bearer re_test_key"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    let response = test_app.post_contact(valid_contact()).await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(json_body(response).await["success"], true);

    let received_requests = test_app.email_server.received_requests().await.unwrap();
    let email: serde_json::Value = serde_json::from_slice(&received_requests[0].body).unwrap();

    assert_eq!(email["to"], serde_json::json!(["inbox@example.com"]));
    assert_eq!(email["reply_to"], "ada@example.com");
    assert_eq!(
        email["subject"],
        "New contact form submission from Ada Lovelace"
    );
    assert!(email["html"]
        .as_str()
        .unwrap()
        .contains("<strong>Company:</strong> Analytical Engines"));
}

#[tokio::test]
async fn contact_returns_400_listing_every_missing_field() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .post_contact(serde_json::json!({
            "name": "",
            "email": "ada@example.com",
            "message": ""
        }))
        .await;

    assert_eq!(400, response.status().as_u16());
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid input");

    let fields: Vec<&str> = body["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "message"]);
}

#[tokio::test]
async fn contact_returns_400_when_body_is_not_json() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .api_client
        .post(&format!("{}/contact", test_app.address))
        .header("Content-Type", "application/json")
        .body("{ not json")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
    assert_eq!(json_body(response).await["message"], "Invalid input");
}

#[tokio::test]
async fn contact_returns_502_when_provider_rejects_the_email() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(422).set_body_string("invalid from address"))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    let response = test_app.post_contact(valid_contact()).await;

    assert_eq!(502, response.status().as_u16());
    let body = json_body(response).await;
    assert_eq!(body["message"], "Failed to send email");
    assert_eq!(body["details"], "invalid from address");
}

#[tokio::test]
async fn contact_returns_500_when_email_service_is_not_configured() {
    let test_app = TestApp::spawn_app_with(|config| config.email_client.api_key = None).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    let response = test_app.post_contact(valid_contact()).await;

    assert_eq!(500, response.status().as_u16());
    let body = json_body(response).await;
    assert_eq!(
        body["message"],
        "Email service not configured (missing RESEND_API_KEY)."
    );
    assert!(!body.to_string().contains("re_test_key"));
}
