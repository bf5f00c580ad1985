//! List the institutions Teller supports, and the enrollment's accounts when
//! an access token is configured.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use teller::{ApiClient, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    let config = Config::from_env();
    tracing::info!(
        api_url = %config.api_url,
        has_access_token = config.access_token.is_some(),
        has_certificate = config.cert_path.is_some() && config.key_path.is_some(),
        "config_loaded"
    );

    let client = ApiClient::new(config.client_config()).context("Failed to create Teller client")?;

    let institutions = client
        .institutions()
        .list()
        .await
        .context("Failed to list institutions")?;

    for institution in &institutions {
        println!("Institution: {} (ID: {})", institution.name, institution.id);
        println!("Products: {}", institution.products.join(", "));
    }

    if config.access_token.is_some() {
        let accounts = client
            .accounts()
            .list(None)
            .await
            .context("Failed to list accounts")?;

        for account in &accounts {
            println!(
                "Account: {} {} ({}, {}) ending {}",
                account.institution.name,
                account.name,
                account.account_type,
                account.subtype,
                account.last_four
            );
        }
    }

    Ok(())
}
