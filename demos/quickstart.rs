//! Check connectivity, validate the API key, and list sending domains.
//!
//! ```sh
//! LETTR_API_KEY=... RUST_LOG=lettr=debug cargo run --example quickstart
//! ```

use lettr::Client;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let api_key = std::env::var("LETTR_API_KEY")?;
    let client = Client::new(api_key)?;

    let health = client.health_check().await?;
    println!("API status: {}", health.data.status);

    match client.validate_api_key().await {
        Ok(auth) => println!("Authenticated for team {}", auth.data.team_id),
        Err(err) if err.is_unauthorized() => {
            eprintln!("API key rejected: {err}");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }

    let domains = client.domains().list().await?;
    for domain in domains.data.domains {
        println!(
            "{} [{}] can_send={}",
            domain.domain, domain.status_label, domain.can_send
        );
    }

    Ok(())
}
