use serde::Deserialize;

use crate::domain::intake_channel::IntakeChannel;
use crate::domain::subscriber_email::SubscriberEmail;

#[derive(Debug)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub source: String,
    pub note: Option<String>,
}

/// Raw payload of the subscription forms, either url encoded or JSON.
#[derive(Deserialize, Debug, Default)]
pub struct SubscriptionForm {
    pub email: Option<String>,
    pub source: Option<String>,
}

impl SubscriptionForm {
    pub fn into_new_subscriber(self, channel: &IntakeChannel) -> Result<NewSubscriber, String> {
        let email = self
            .email
            .ok_or_else(|| String::from("email is missing"))
            .and_then(SubscriberEmail::parse)?;
        let source = self
            .source
            .map(|source| source.trim().to_string())
            .filter(|source| !source.is_empty())
            .unwrap_or_else(|| channel.default_source.to_string());

        Ok(NewSubscriber {
            email,
            source,
            note: channel.note.map(String::from),
        })
    }
}
