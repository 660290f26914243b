use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::domain::contact_name::ContactName;
use crate::domain::subscriber_email::SubscriberEmail;

const MAX_MESSAGE_LENGHT: usize = 5000;

/// Body of the contact form. Every field is optional on the wire so that a missing field is
/// reported as a validation issue instead of a deserialization failure.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub interest: Option<String>,
    pub message: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ContactRequest {
    pub name: ContactName,
    pub email: SubscriberEmail,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub interest: Option<String>,
    pub message: String,
}

impl TryFrom<ContactForm> for ContactRequest {
    type Error = Vec<ValidationIssue>;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        let mut issues = Vec::new();

        let name = ContactName::parse(form.name.unwrap_or_default())
            .map_err(|message| issues.push(ValidationIssue { field: "name", message }))
            .ok();
        let email = SubscriberEmail::parse(form.email.unwrap_or_default())
            .map_err(|_| {
                issues.push(ValidationIssue {
                    field: "email",
                    message: String::from("A valid email address is required."),
                })
            })
            .ok();
        let message = parse_message(form.message.unwrap_or_default())
            .map_err(|message| issues.push(ValidationIssue { field: "message", message }))
            .ok();

        match (name, email, message) {
            (Some(name), Some(email), Some(message)) => Ok(ContactRequest {
                name,
                email,
                company: optional_field(form.company),
                phone: optional_field(form.phone),
                interest: optional_field(form.interest),
                message,
            }),
            _ => Err(issues),
        }
    }
}

impl ContactRequest {
    pub fn notification_subject(&self) -> String {
        format!("New contact form submission from {}", self.name.as_ref())
    }

    pub fn notification_html(&self) -> String {
        let optional_rows: String = [
            ("Company", &self.company),
            ("Phone", &self.phone),
            ("Interest", &self.interest),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .map(|value| format!("<p><strong>{}:</strong> {}</p>", label, escape_html(value)))
        })
        .collect();

        format!(
            r#"
            <div style="font-family: Arial, sans-serif; line-height: 1.6;">
                <h2 style="margin: 0 0 12px;">New Contact Submission</h2>
                <p><strong>Name:</strong> {}</p>
                <p><strong>Email:</strong> {}</p>
                {}
                <p><strong>Message:</strong></p>
                <p>{}</p>
            </div>
        "#,
            escape_html(self.name.as_ref()),
            escape_html(self.email.as_ref()),
            optional_rows,
            escape_html(&self.message).replace('\n', "<br/>")
        )
    }
}

fn parse_message(message: String) -> Result<String, String> {
    if message.trim().is_empty() {
        return Err(String::from("Message is required."));
    }

    if message.graphemes(true).count() > MAX_MESSAGE_LENGHT {
        return Err(format!(
            "Message must be at most {} characters long.",
            MAX_MESSAGE_LENGHT
        ));
    }

    Ok(message)
}

fn optional_field(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for char in value.chars() {
        match char {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }

    escaped
}
