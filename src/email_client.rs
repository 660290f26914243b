use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use std::time;

use crate::domain::subscriber_email::SubscriberEmail;

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);

/// Transactional email client for the Resend API.
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: String,
    api_key: Secret<String>,
}

#[derive(serde::Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    subject: &'a str,
    html: &'a str,
}

#[derive(thiserror::Error, Debug)]
pub enum EmailClientError {
    #[error("Failed to reach the email provider.")]
    Request(#[from] reqwest::Error),
    #[error("The email provider rejected the message with status {status}.")]
    Rejected { status: StatusCode, details: String },
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: String,
        api_key: Secret<String>,
        timeout: Option<time::Duration>,
    ) -> Result<EmailClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()?;

        Ok(EmailClient {
            http_client,
            base_url,
            sender,
            api_key,
        })
    }

    #[tracing::instrument(
        name = "Sending an email",
        skip(self, html_content),
        fields(recipient = %recipient, subject = %subject)
    )]
    pub async fn send_email(
        &self,
        recipient: &SubscriberEmail,
        reply_to: Option<&SubscriberEmail>,
        subject: &str,
        html_content: &str,
    ) -> Result<(), EmailClientError> {
        let url = format!("{}/emails", self.base_url);
        let body = SendEmailBody {
            from: &self.sender,
            to: vec![recipient.as_ref()],
            reply_to: reply_to.map(AsRef::as_ref),
            subject,
            html: html_content,
        };

        let response = self
            .http_client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            return Err(EmailClientError::Rejected { status, details });
        }

        Ok(())
    }
}
