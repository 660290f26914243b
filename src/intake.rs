use chrono::Utc;

use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::subscriber::Subscriber;
use crate::mailing_list_client::{ListMemberOutcome, MailingListClient, MailingListError};
use crate::subscriber_store::{StoreError, StoreInsert, SubscriberStore};

#[derive(Debug, PartialEq)]
pub enum IntakeOutcome {
    Subscribed,
    AlreadySubscribed,
}

/// Turns a validated subscription into a mailing list member or a local record.
///
/// The mailing list, when configured, is tried first and owns duplicate detection. Any failure
/// there falls back to the local store. The two are never reconciled.
pub struct IntakePipeline {
    store: SubscriberStore,
    mailing_list: Option<MailingListClient>,
}

impl IntakePipeline {
    pub fn new(store: SubscriberStore, mailing_list: Option<MailingListClient>) -> Self {
        IntakePipeline {
            store,
            mailing_list,
        }
    }

    pub fn store(&self) -> &SubscriberStore {
        &self.store
    }

    #[tracing::instrument(
        name = "Running the subscription intake",
        skip(self, new_subscriber),
        fields(
            subscriber_email = %new_subscriber.email,
            source = %new_subscriber.source
        )
    )]
    pub async fn submit(&self, new_subscriber: NewSubscriber) -> Result<IntakeOutcome, StoreError> {
        if let Some(mailing_list) = &self.mailing_list {
            match mailing_list
                .add_list_member(&new_subscriber.email, &new_subscriber.source)
                .await
            {
                Ok(ListMemberOutcome::Added) => return Ok(IntakeOutcome::Subscribed),
                Ok(ListMemberOutcome::AlreadyMember) => return Ok(IntakeOutcome::AlreadySubscribed),
                Err(err @ MailingListError::Unauthorized(_)) => {
                    tracing::error!(
                        "Mailing list credentials were refused, storing the subscriber locally: {:?}",
                        err
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        "Mailing list is unavailable, storing the subscriber locally: {:?}",
                        err
                    );
                }
            }
        }

        let subscriber = Subscriber::new(new_subscriber, Utc::now());

        match self.store.insert_if_absent(subscriber).await? {
            StoreInsert::Inserted => Ok(IntakeOutcome::Subscribed),
            StoreInsert::AlreadyPresent => Ok(IntakeOutcome::AlreadySubscribed),
        }
    }
}
