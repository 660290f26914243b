use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;
use std::path::PathBuf;
use tracing_actix_web::TracingLogger;

use crate::config::{ConfigurationError, Settings};
use crate::domain::subscriber_email::SubscriberEmail;
use crate::email_client::EmailClient;
use crate::intake::IntakePipeline;
use crate::mailing_list_client::MailingListClient;
use crate::routes::{
    contact_json_config, handle_booking, handle_contact, handle_game_subscribe,
    handle_list_subscribers, handle_subscribe, handle_trusted_by, health_check,
    subscription_form_config, subscription_json_config, subscription_multipart_config,
};
use crate::subscriber_store::SubscriberStore;

/// Inbox receiving the contact form submissions.
pub struct ContactInbox(pub SubscriberEmail);

pub struct TrustedByDirectory(pub PathBuf);

pub struct BookingUrl(pub Option<String>);

pub struct Application {
    pub port: u16,
    pub server: Server,
}

#[derive(thiserror::Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("Failed to build an HTTP client.")]
    HttpClient(#[from] reqwest::Error),
    #[error("Failed to start the server.")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
struct AppState {
    pipeline: web::Data<IntakePipeline>,
    email_client: Option<web::Data<EmailClient>>,
    inbox: web::Data<ContactInbox>,
    trustedby_dir: web::Data<TrustedByDirectory>,
    booking_url: web::Data<BookingUrl>,
    admin_listing: bool,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, StartupError> {
        let mailing_list = match config.mailing_list.get_credentials()? {
            Some(credentials) => Some(MailingListClient::new(
                credentials,
                config.mailing_list.get_timeout(),
            )?),
            None => {
                tracing::info!("Mailing list is not configured, subscribers are stored locally");
                None
            }
        };

        let inbox = config.email_client.get_recipient_email()?;
        let email_client = match config.email_client.get_api_key() {
            Some(api_key) => Some(EmailClient::new(
                config.email_client.get_base_url(),
                config.email_client.get_sender_email(),
                api_key,
                Some(config.email_client.get_timeout()),
            )?),
            None => {
                tracing::warn!("Email API key is missing, contact requests cannot be delivered");
                None
            }
        };

        let store = SubscriberStore::new(config.get_subscribers_path());
        let state = AppState {
            pipeline: web::Data::new(IntakePipeline::new(store, mailing_list)),
            email_client: email_client.map(web::Data::new),
            inbox: web::Data::new(ContactInbox(inbox)),
            trustedby_dir: web::Data::new(TrustedByDirectory(config.get_trustedby_dir())),
            booking_url: web::Data::new(BookingUrl(config.get_booking_url())),
            admin_listing: config.application.admin_listing,
        };

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();
        let server = run(listener, state)?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

fn run(listener: TcpListener, state: AppState) -> Result<Server, std::io::Error> {
    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        let mut app = App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .service(
                web::resource("/subscribe")
                    .app_data(subscription_form_config())
                    .app_data(subscription_json_config())
                    .app_data(subscription_multipart_config())
                    .route(web::post().to(handle_subscribe)),
            )
            .service(
                web::resource("/game-subscribe")
                    .app_data(subscription_form_config())
                    .app_data(subscription_json_config())
                    .app_data(subscription_multipart_config())
                    .route(web::post().to(handle_game_subscribe)),
            )
            .service(
                web::resource("/contact")
                    .app_data(contact_json_config())
                    .route(web::post().to(handle_contact)),
            )
            .route("/trustedby", web::get().to(handle_trusted_by))
            .route("/booking", web::get().to(handle_booking))
            .app_data(state.pipeline.clone())
            .app_data(state.inbox.clone())
            .app_data(state.trustedby_dir.clone())
            .app_data(state.booking_url.clone());

        if let Some(email_client) = &state.email_client {
            app = app.app_data(email_client.clone());
        }

        // Nothing protects this listing, it is only routed when explicitly enabled.
        if state.admin_listing {
            app = app.route("/admin/subscribers", web::get().to(handle_list_subscribers));
        }

        app
    })
    .listen(listener)?
    .run();

    Ok(server)
}
