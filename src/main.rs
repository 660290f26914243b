use lead_intake::config::get_configuration;
use lead_intake::startup::Application;
use lead_intake::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber(
        String::from("lead_intake"),
        String::from("info"),
        std::io::stdout,
    );

    init_subscriber(subscriber);

    let config = get_configuration().expect("Failed to read configuration.");
    let application = Application::build(config)
        .await
        .expect("Failed to build application.");

    tracing::info!("Server listening on port {}", application.get_port());

    application.run_until_stop().await
}
