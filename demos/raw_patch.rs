// # Raw PATCH
//
// Sets a record's content by IDs with a direct `Client::call`.
//
// ```bash
// CFDNS_API_TOKEN=your_token \
// CFDNS_ZONE_ID=zoneID \
// CFDNS_RECORD_ID=recordID \
// CFDNS_CONTENT=1.2.3.4 \
// cargo run -p cfdns-demos --bin raw_patch
// ```

use cfdns_core::{CancellationToken, Client, Method};
use cfdns_http::HttpTransport;
use serde_json::json;
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let token = env::var("CFDNS_API_TOKEN")?;
    let zone_id = env::var("CFDNS_ZONE_ID")?;
    let record_id = env::var("CFDNS_RECORD_ID")?;
    let content = env::var("CFDNS_CONTENT").unwrap_or_else(|_| "1.2.3.4".to_string());

    let client = Client::new(token, Arc::new(HttpTransport::with_default_timeout()?));
    let cancel = CancellationToken::new();

    let resp = client
        .call(
            &cancel,
            Method::Patch,
            &format!("zones/{zone_id}/dns_records/{record_id}"),
            Some(&json!({ "content": content })),
        )
        .await?;
    if !resp.success {
        for err in &resp.errors {
            tracing::error!(%err, "API error");
        }
        return Err("patch failed".into());
    }

    println!("updated {record_id}");
    Ok(())
}
