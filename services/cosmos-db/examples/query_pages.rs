//! Page through a query three documents at a time.
//!
//! Needs `COSMOS_ENDPOINT_URI`, `COSMOS_MASTER_KEY` and `COSMOS_DATABASE`, for example:
//!
//! ```shell
//! cargo run --example query_pages -- dictionary Zwerg
//! ```

use cosmos_rest_core::{Context, OsEnv};
use cosmos_rest_db::{Client, Config, Phase, Query};
use cosmos_rest_http_send_reqwest::ReqwestHttpSend;
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = env::args().skip(1);
    let container = args.next().unwrap_or_else(|| "dictionary".to_string());
    let word = args.next().unwrap_or_else(|| "Zwerg".to_string());

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let client = Client::new(ctx.clone(), Config::new().from_env(&ctx))?;

    let mut container = client.container(container, None);
    container.open_query(
        Some(3),
        Query::new("SELECT * FROM c WHERE c.word = @word").with_parameter("@word", word),
    );

    while container.phase() != Phase::Exhausted {
        let page = container.fetch().await?;
        println!("page {}: {}", container.state().steps(), page.status_line());
        if !page.is_success() {
            println!("{}", page.text());
            break;
        }
        for doc in page.envelope()?.documents {
            println!("  {doc}");
        }
    }

    Ok(())
}
