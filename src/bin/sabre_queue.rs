// Opens a session, prints the queue counts of the configured PCC as JSON and
// closes the session again.
//
// Credentials come from SABRE_USERNAME, SABRE_PASSWORD and SABRE_ORGANIZATION.
use anyhow::{Context, Result};
use legacy_sabre::{SabreClient, SabreOptions};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let pcc = std::env::args().nth(1);
    let mut client = SabreClient::new(SabreOptions::default()).context("creating client")?;

    client
        .authentication()
        .session_create()
        .await
        .context("opening session")?;

    let counts = client.queue().count(pcc.as_deref()).await;

    // always release the host session, even when the count failed
    if let Err(e) = client.authentication().session_close().await {
        error!(error = %e, "closing session failed");
    }

    match counts {
        Ok(counts) => {
            info!(total = counts.total, "queue count received");
            println!("{}", serde_json::to_string_pretty(&counts)?);
            Ok(())
        }
        Err(e) => {
            println!("{}", serde_json::to_string_pretty(&e.to_response())?);
            Err(e).context("counting queues")
        }
    }
}
