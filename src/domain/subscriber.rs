use chrono::{DateTime, Utc};

use crate::domain::new_subscriber::NewSubscriber;

/// One entry of the subscribers document.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub subscribed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Subscriber {
    pub fn new(new_subscriber: NewSubscriber, subscribed_at: DateTime<Utc>) -> Self {
        Subscriber {
            email: new_subscriber.email.as_ref().to_string(),
            source: Some(new_subscriber.source),
            subscribed_at,
            note: new_subscriber.note,
        }
    }
}
