use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use std::time;

use crate::config::MailingListCredentials;
use crate::domain::subscriber_email::SubscriberEmail;

const MEMBER_EXISTS_TITLE: &str = "Member Exists";

/// Adds subscribers to a Mailchimp audience.
pub struct MailingListClient {
    http_client: Client,
    base_url: String,
    list_id: String,
    api_key: Secret<String>,
}

#[derive(serde::Serialize)]
struct AddListMemberBody<'a> {
    email_address: &'a str,
    status: &'a str,
    tags: Vec<&'a str>,
}

#[derive(serde::Deserialize, Default)]
struct ErrorBody {
    title: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum ListMemberOutcome {
    Added,
    AlreadyMember,
}

#[derive(thiserror::Error, Debug)]
pub enum MailingListError {
    #[error("Failed to reach the mailing list provider.")]
    Request(#[from] reqwest::Error),
    #[error("The mailing list provider refused the credentials (status {0}).")]
    Unauthorized(StatusCode),
    #[error("The mailing list provider rejected the member with status {status}: {title}.")]
    Rejected { status: StatusCode, title: String },
}

impl MailingListClient {
    pub fn new(
        credentials: MailingListCredentials,
        timeout: time::Duration,
    ) -> Result<MailingListClient, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(MailingListClient {
            http_client,
            base_url: credentials.base_url,
            list_id: credentials.list_id,
            api_key: credentials.api_key,
        })
    }

    #[tracing::instrument(
        name = "Adding a member to the mailing list",
        skip(self),
        fields(list_id = %self.list_id)
    )]
    pub async fn add_list_member(
        &self,
        email: &SubscriberEmail,
        source: &str,
    ) -> Result<ListMemberOutcome, MailingListError> {
        let url = format!("{}/lists/{}/members", self.base_url, self.list_id);
        let body = AddListMemberBody {
            email_address: email.as_ref(),
            status: "subscribed",
            tags: vec![source],
        };

        let response = self
            .http_client
            .post(&url)
            .basic_auth("anystring", Some(self.api_key.expose_secret()))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(ListMemberOutcome::Added);
        }

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(MailingListError::Unauthorized(status));
        }

        let error_body: ErrorBody = response.json().await.unwrap_or_default();
        let title = error_body.title.unwrap_or_else(|| String::from("unknown error"));

        if status == StatusCode::BAD_REQUEST && title == MEMBER_EXISTS_TITLE {
            return Ok(ListMemberOutcome::AlreadyMember);
        }

        Err(MailingListError::Rejected { status, title })
    }
}
