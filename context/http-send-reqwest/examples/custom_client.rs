use anyhow::Result;
use bytes::Bytes;
use cosmos_rest_core::Context;
use cosmos_rest_http_send_reqwest::ReqwestHttpSend;
use reqwest::Client;
use std::time::Duration;

/// Send one unsigned request through a tuned reqwest client.
///
/// Cosmos DB answers `401 Unauthorized` for unsigned requests, which is enough
/// to show the status making it back to the caller instead of becoming an error.
#[tokio::main]
async fn main() -> Result<()> {
    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://localhost:8081/".to_string());

    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .user_agent("cosmos-rest-example/0.1")
        .build()?;

    let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));

    let req = http::Request::builder()
        .method("GET")
        .uri(format!("{}/dbs", endpoint.trim_end_matches('/')))
        .header("x-ms-version", "2020-11-05")
        .body(Bytes::new())?;

    match ctx.http_send(req).await {
        Ok(resp) => {
            println!("Response status: {}", resp.status());
            for (name, value) in resp.headers() {
                println!("  {name}: {value:?}");
            }
            println!("{}", String::from_utf8_lossy(resp.body()));
        }
        Err(e) => {
            eprintln!("Request failed: {e}");
        }
    }

    Ok(())
}
