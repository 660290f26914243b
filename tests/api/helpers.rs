use reqwest::Response;
use secrecy::Secret;
use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::MockServer;

use lead_intake::{
    config::{get_configuration, Settings},
    domain::subscriber::Subscriber,
    startup::Application,
};

pub struct TestApp {
    pub address: String,
    pub data_dir: PathBuf,
    pub subscribers_path: PathBuf,
    pub trustedby_dir: PathBuf,
    pub email_server: MockServer,
    pub mailing_list_server: MockServer,
    pub api_client: reqwest::Client,
    // Removed with everything the test wrote once the TestApp is dropped.
    _test_dir: TempDir,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        Self::spawn_app_with(|_| {}).await
    }

    /// Spawns the application on a random port with its own data directory. `customize` runs
    /// after the test defaults are applied.
    pub async fn spawn_app_with(customize: impl FnOnce(&mut Settings)) -> TestApp {
        let mut config = get_configuration().expect("Missing configuration file.");
        let test_dir = tempfile::tempdir().expect("Failed to create the test directory.");
        let email_server = MockServer::start().await;
        let mailing_list_server = MockServer::start().await;

        // We are using port 0 as way to define a different port per each test. Port 0 is a special case that operating systems
        // take into account: when port is 0, the OS will search for the first available port
        config.set_app_port(0);
        config.application.host = String::from("127.0.0.1");
        config.application.booking_url = None;
        config.application.admin_listing = true;
        config.set_data_dir(test_dir.path().join("data"));
        config.set_trustedby_dir(test_dir.path().join("trustedby"));
        config.set_email_client_base_url(email_server.uri());
        config.email_client.api_key = Some(Secret::new(String::from("re_test_key")));
        config.email_client.recipient_email = String::from("inbox@example.com");
        config.mailing_list.api_key = None;
        config.mailing_list.server_prefix = None;
        config.mailing_list.list_id = None;
        config.mailing_list.base_url = Some(mailing_list_server.uri());

        customize(&mut config);

        let application = Application::build(config.clone())
            .await
            .expect("Failed to build application.");

        let address = format!("http://127.0.0.1:{}", application.get_port());

        tokio::spawn(application.run_until_stop());

        TestApp {
            address,
            data_dir: config.storage.data_dir.clone(),
            subscribers_path: config.get_subscribers_path(),
            trustedby_dir: config.get_trustedby_dir(),
            email_server,
            mailing_list_server,
            api_client: reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("Failed to build the API client."),
            _test_dir: test_dir,
        }
    }

    pub async fn post_subscribe_form(&self, body: HashMap<&str, &str>) -> Response {
        self.post_form("subscribe", body).await
    }

    pub async fn post_game_subscribe_form(&self, body: HashMap<&str, &str>) -> Response {
        self.post_form("game-subscribe", body).await
    }

    pub async fn post_subscribe_multipart(&self, body: HashMap<&str, &str>) -> Response {
        self.post_multipart("subscribe", body).await
    }

    pub async fn post_game_subscribe_multipart(&self, body: HashMap<&str, &str>) -> Response {
        self.post_multipart("game-subscribe", body).await
    }

    pub async fn post_subscribe_json(&self, body: serde_json::Value) -> Response {
        self.api_client
            .post(&format!("{}/subscribe", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_contact(&self, body: serde_json::Value) -> Response {
        self.api_client
            .post(&format!("{}/contact", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, route: &str) -> Response {
        self.api_client
            .get(&format!("{}/{}", self.address, route))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    async fn post_form(&self, route: &str, body: HashMap<&str, &str>) -> Response {
        self.api_client
            .post(&format!("{}/{}", self.address, route))
            .form(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Sends the fields the way a browser `FormData` does.
    async fn post_multipart(&self, route: &str, body: HashMap<&str, &str>) -> Response {
        let form = body
            .into_iter()
            .fold(reqwest::multipart::Form::new(), |form, (name, value)| {
                form.text(name.to_string(), value.to_string())
            });

        self.api_client
            .post(&format!("{}/{}", self.address, route))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Reads the subscribers document straight from disk.
    pub fn stored_subscribers(&self) -> Vec<Subscriber> {
        match std::fs::read_to_string(&self.subscribers_path) {
            Ok(content) => {
                serde_json::from_str(&content).expect("Subscribers document is not valid JSON.")
            }
            Err(_) => Vec::new(),
        }
    }
}

pub fn enable_mailing_list(config: &mut Settings) {
    config.mailing_list.api_key = Some(Secret::new(String::from("testkey-us1")));
    config.mailing_list.server_prefix = Some(String::from("us1"));
    config.mailing_list.list_id = Some(String::from("audience42"));
}

pub async fn json_body(response: Response) -> serde_json::Value {
    response
        .json()
        .await
        .expect("Response body is not valid JSON.")
}
