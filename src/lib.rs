pub mod config;
pub mod domain;
pub mod email_client;
pub mod intake;
pub mod mailing_list_client;
pub mod routes;
pub mod startup;
pub mod subscriber_store;
pub mod telemetry;
