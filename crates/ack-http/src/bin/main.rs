use ack_http::config::HTTPConfig;
use ack_http::server;
use log::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Get config from ACK_CONFIG, or the defaults
    let config = HTTPConfig::from_env()?;

    // Print config
    info!("{}", config);

    // Init server
    server::http_server(config).await?;

    Ok(())
}
