pub mod contact_name;
pub mod contact_request;
pub mod intake_channel;
pub mod new_subscriber;
pub mod subscriber;
pub mod subscriber_email;
