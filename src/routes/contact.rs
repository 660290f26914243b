use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;

use crate::{
    domain::contact_request::{ContactForm, ContactRequest, ValidationIssue},
    email_client::{EmailClient, EmailClientError},
    startup::ContactInbox,
};

const SENT_MESSAGE: &str = "Thank you for reaching out! We'll get back to you soon.";

#[derive(Serialize, Debug)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<ValidationIssue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[tracing::instrument(
    name = "Forwarding a contact request",
    skip(body, email_client, inbox),
    fields(contact_email = ?body.email)
)]
pub async fn handle_contact(
    body: web::Json<ContactForm>,
    email_client: Option<web::Data<EmailClient>>,
    inbox: web::Data<ContactInbox>,
) -> Result<HttpResponse, ContactError> {
    let request = ContactRequest::try_from(body.into_inner()).map_err(ContactError::Validation)?;
    let email_client = email_client.ok_or(ContactError::NotConfigured)?;

    email_client
        .send_email(
            &inbox.0,
            Some(&request.email),
            &request.notification_subject(),
            &request.notification_html(),
        )
        .await
        .map_err(|err| {
            tracing::error!("Failed to deliver the contact request: {:?}", err);
            ContactError::Delivery(err)
        })?;

    Ok(HttpResponse::Ok().json(ContactResponse {
        success: true,
        message: SENT_MESSAGE.to_string(),
        issues: None,
        details: None,
    }))
}

pub fn contact_json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(reject_contact_payload)
}

fn reject_contact_payload(err: JsonPayloadError, _: &HttpRequest) -> actix_web::Error {
    let issue = ValidationIssue {
        field: "body",
        message: err.to_string(),
    };
    let response = ContactError::Validation(vec![issue]).error_response();

    InternalError::from_response(err, response).into()
}

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("Invalid input")]
    Validation(Vec<ValidationIssue>),
    #[error("Email service not configured (missing RESEND_API_KEY).")]
    NotConfigured,
    #[error("Failed to send email")]
    Delivery(#[source] EmailClientError),
}

impl std::fmt::Debug for ContactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactError::Validation(issues) => write!(f, "{}: {:?}", self, issues),
            ContactError::NotConfigured => write!(f, "{}", self),
            ContactError::Delivery(err) => write!(f, "{}\nCaused by:\n\t({:?})", self, err),
        }
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::Validation(_) => StatusCode::BAD_REQUEST,
            ContactError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            ContactError::Delivery(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (issues, details) = match self {
            ContactError::Validation(issues) => (Some(issues.clone()), None),
            ContactError::NotConfigured => (None, None),
            ContactError::Delivery(EmailClientError::Rejected { details, .. }) => {
                (None, Some(details.clone()))
            }
            ContactError::Delivery(EmailClientError::Request(_)) => (None, None),
        };

        HttpResponse::build(self.status_code()).json(ContactResponse {
            success: false,
            message: self.to_string(),
            issues,
            details,
        })
    }
}
