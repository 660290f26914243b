use std::path::PathBuf;
use std::time;

use config::{Config, ConfigError, File};
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::domain::subscriber_email::SubscriberEmail;

const MAILCHIMP_API_HOST: &str = "api.mailchimp.com/3.0";

// Variables already used by the deployment. They win over the layered files.
const WELL_KNOWN_VARIABLES: [(&str, &str); 7] = [
    ("MAILCHIMP_API_KEY", "mailing_list.api_key"),
    ("MAILCHIMP_SERVER_PREFIX", "mailing_list.server_prefix"),
    ("MAILCHIMP_LIST_ID", "mailing_list.list_id"),
    ("RESEND_API_KEY", "email_client.api_key"),
    ("RESEND_FROM", "email_client.sender_email"),
    ("NEXT_PUBLIC_BOOKING_URL", "application.booking_url"),
    ("BOOKING_URL", "application.booking_url"),
];

#[derive(Debug)]
pub enum Environment {
    Development,
    Production,
}

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub storage: StorageSettings,
    pub mailing_list: MailingListSettings,
    pub email_client: EmailClientSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub booking_url: Option<String>,
    #[serde(default)]
    pub admin_listing: bool,
}

#[derive(serde::Deserialize, Clone)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    pub subscribers_file: String,
    pub trustedby_dir: PathBuf,
}

#[derive(serde::Deserialize, Clone)]
pub struct MailingListSettings {
    pub api_key: Option<Secret<String>>,
    pub server_prefix: Option<String>,
    pub list_id: Option<String>,
    // Only set when talking to something other than the real Mailchimp API (eg: tests)
    pub base_url: Option<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub api_key: Option<Secret<String>>,
    pub sender_email: String,
    pub recipient_email: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

/// Everything needed to talk to the mailing list provider, already validated.
#[derive(Debug)]
pub struct MailingListCredentials {
    pub api_key: Secret<String>,
    pub list_id: String,
    pub base_url: String,
}

/// Settings that make a code path impossible to run. These stop the application at startup
/// instead of silently degrading at request time.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigurationError {
    #[error("Mailing list is partially configured, missing: {}.", .missing.join(", "))]
    IncompleteMailingList { missing: Vec<&'static str> },
    #[error("Mailing list API key must look like '<key>-<datacenter>'.")]
    InvalidMailingListApiKey,
    #[error("Mailing list server prefix ({server_prefix}) does not match the API key datacenter ({key_datacenter}).")]
    DatacenterMismatch {
        key_datacenter: String,
        server_prefix: String,
    },
    #[error("Contact recipient is not valid: {0}")]
    InvalidContactRecipient(String),
}

impl Settings {
    pub fn get_address(&self) -> String {
        format!(
            "{}:{}",
            self.application.get_host(),
            self.application.get_port()
        )
    }

    pub fn get_subscribers_path(&self) -> PathBuf {
        self.storage.get_subscribers_path()
    }

    pub fn get_trustedby_dir(&self) -> PathBuf {
        self.storage.trustedby_dir.clone()
    }

    pub fn get_booking_url(&self) -> Option<String> {
        non_blank(&self.application.booking_url)
    }

    pub fn set_app_port(&mut self, port: u16) {
        self.application.port = port;
    }

    pub fn set_data_dir(&mut self, data_dir: PathBuf) {
        self.storage.data_dir = data_dir;
    }

    pub fn set_trustedby_dir(&mut self, trustedby_dir: PathBuf) {
        self.storage.trustedby_dir = trustedby_dir;
    }

    pub fn set_email_client_base_url(&mut self, new_base_url: String) {
        self.email_client.set_base_url(new_base_url)
    }
}

impl ApplicationSettings {
    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn get_host(&self) -> String {
        self.host.clone()
    }
}

impl StorageSettings {
    pub fn get_subscribers_path(&self) -> PathBuf {
        self.data_dir.join(&self.subscribers_file)
    }
}

impl MailingListSettings {
    pub fn get_timeout(&self) -> time::Duration {
        time::Duration::from_millis(self.timeout_milliseconds)
    }

    /// Returns `None` when the mailing list is not configured at all, which disables the
    /// integration. A partial or inconsistent configuration is an error.
    pub fn get_credentials(&self) -> Result<Option<MailingListCredentials>, ConfigurationError> {
        let api_key = self
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty());
        let server_prefix = non_blank(&self.server_prefix);
        let list_id = non_blank(&self.list_id);

        let (api_key, server_prefix, list_id) = match (api_key, server_prefix, list_id) {
            (None, None, None) => return Ok(None),
            (Some(api_key), Some(server_prefix), Some(list_id)) => {
                (api_key, server_prefix, list_id)
            }
            (api_key, server_prefix, list_id) => {
                let missing = [
                    ("api_key", api_key.is_none()),
                    ("server_prefix", server_prefix.is_none()),
                    ("list_id", list_id.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, is_missing)| is_missing.then_some(name))
                .collect();

                return Err(ConfigurationError::IncompleteMailingList { missing });
            }
        };

        let key_datacenter = match api_key.expose_secret().trim().rsplit_once('-') {
            Some((key, datacenter)) if !key.is_empty() && !datacenter.is_empty() => {
                datacenter.to_string()
            }
            _ => return Err(ConfigurationError::InvalidMailingListApiKey),
        };

        if key_datacenter != server_prefix {
            return Err(ConfigurationError::DatacenterMismatch {
                key_datacenter,
                server_prefix,
            });
        }

        let base_url = non_blank(&self.base_url)
            .unwrap_or_else(|| format!("https://{}.{}", server_prefix, MAILCHIMP_API_HOST));

        Ok(Some(MailingListCredentials {
            api_key: Secret::new(api_key.expose_secret().trim().to_string()),
            list_id,
            base_url,
        }))
    }
}

impl EmailClientSettings {
    pub fn get_sender_email(&self) -> String {
        self.sender_email.clone()
    }

    pub fn get_recipient_email(&self) -> Result<SubscriberEmail, ConfigurationError> {
        SubscriberEmail::parse(self.recipient_email.clone())
            .map_err(ConfigurationError::InvalidContactRecipient)
    }

    pub fn get_base_url(&self) -> String {
        self.base_url.clone()
    }

    /// `None` when no API key is configured, so contact messages cannot be delivered.
    pub fn get_api_key(&self) -> Option<Secret<String>> {
        self.api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .cloned()
    }

    pub fn get_timeout(&self) -> time::Duration {
        time::Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn set_base_url(&mut self, new_base_url: String) {
        self.base_url = new_base_url
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            unknown_env => Err(format!(
                "{} is not supported environment. Use either 'development' or 'production'.",
                unknown_env
            )),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let root_path = std::env::current_dir()
        .map_err(|err| ConfigError::Message(format!("Failed to determine the current directory: {}", err)))?;
    let config_directory = root_path.join("config");
    // Uses development environment by default
    let enviroment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "development".into())
        .try_into()
        .map_err(ConfigError::Message)?;
    let config_base_filepath = config_directory.join("base");
    let config_env_filepath = config_directory.join(enviroment.as_str());

    // It merges the base configuration file with the one from the specific environment (development or production)
    let mut builder = Config::builder()
        .add_source(File::from(config_base_filepath).required(true))
        .add_source(File::from(config_env_filepath).required(true))
        // Merge settings from environment variables with a prefix of APP and "__" separator
        // E.g APP_APPLICATION__PORT would set Settings.application.port
        .add_source(config::Environment::with_prefix("app").separator("__"));

    for (variable, key) in WELL_KNOWN_VARIABLES {
        builder = builder.set_override_option(key, std::env::var(variable).ok())?;
    }

    let settings = builder.build()?;

    tracing::info!("Application environment = {:?}", enviroment);

    // Try to convert the value from the configuration file into a Settings type
    settings.try_deserialize()
}
