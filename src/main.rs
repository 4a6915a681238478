use fireopt::{logging, start_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let address = std::env::var("FIREOPT_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:50051".to_string())
        .parse()?;

    let config = ServerConfig::new(address);
    start_server(config).await?;

    Ok(())
}
