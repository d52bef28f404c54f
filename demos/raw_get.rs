// # Raw GET
//
// Looks up a zone ID with a direct `Client::call`, without the updater.
//
// ```bash
// CFDNS_API_TOKEN=your_token CFDNS_ZONE=example.com cargo run -p cfdns-demos --bin raw_get
// ```

use cfdns_core::{CancellationToken, Client, Method};
use cfdns_http::HttpTransport;
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let token = env::var("CFDNS_API_TOKEN")?;
    let zone = env::var("CFDNS_ZONE").unwrap_or_else(|_| "example.com".to_string());

    let client = Client::new(token, Arc::new(HttpTransport::with_default_timeout()?));
    let cancel = CancellationToken::new();

    let resp = client
        .call::<()>(&cancel, Method::Get, &format!("zones?match=any&name={zone}"), None)
        .await?;
    if !resp.success {
        return Err(format!("lookup failed: {resp}").into());
    }

    let zone_id = resp
        .first_result()?
        .get("id")
        .and_then(|id| id.as_str())
        .ok_or("zone has no id")?;
    println!("{zone_id}");

    if let Some(info) = resp.result_info {
        tracing::info!(%info, "pagination");
    }
    Ok(())
}
