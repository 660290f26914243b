use claim::assert_err;
use secrecy::Secret;

use lead_intake::config::{get_configuration, ConfigurationError};
use lead_intake::startup::{Application, StartupError};

#[tokio::test]
async fn partial_mailing_list_configuration_stops_the_startup() {
    let mut config = get_configuration().expect("Missing configuration file.");
    config.set_app_port(0);
    config.mailing_list.api_key = Some(Secret::new(String::from("testkey-us1")));
    config.mailing_list.server_prefix = None;
    config.mailing_list.list_id = None;

    let error = assert_err!(Application::build(config).await.map(|_| ()));

    assert!(matches!(
        error,
        StartupError::Configuration(ConfigurationError::IncompleteMailingList { .. })
    ));
}

#[tokio::test]
async fn invalid_contact_recipient_stops_the_startup() {
    let mut config = get_configuration().expect("Missing configuration file.");
    config.set_app_port(0);
    config.mailing_list.api_key = None;
    config.mailing_list.server_prefix = None;
    config.mailing_list.list_id = None;
    config.email_client.recipient_email = String::from("not-an-inbox");

    let error = assert_err!(Application::build(config).await.map(|_| ()));

    assert!(matches!(
        error,
        StartupError::Configuration(ConfigurationError::InvalidContactRecipient(_))
    ));
}
