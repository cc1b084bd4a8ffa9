//! Cosmos DB REST client
//!
//! This crate signs and sends document requests to the Cosmos DB SQL REST API:
//! - Master key authorization tokens ([`sign`], [`RequestSigner`])
//! - Query, read, create/upsert and delete of documents ([`Client`])
//! - Continuation token paging over query results ([`Container`])
//!
//! Documents travel as opaque JSON; decoding them into your own types is left to you.
//!
//! # Example
//!
//! ```rust,no_run
//! use anyhow::Result;
//! use cosmos_rest_core::{Context, OsEnv};
//! use cosmos_rest_db::{Client, Config, Query};
//! use cosmos_rest_http_send_reqwest::ReqwestHttpSend;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     // Reads COSMOS_ENDPOINT_URI, COSMOS_MASTER_KEY and COSMOS_DATABASE.
//!     let config = Config::new().from_env(&ctx);
//!     let client = Client::new(ctx, config)?;
//!
//!     let query = Query::new("SELECT * FROM c WHERE c.word = @word").with_parameter("@word", "Zwerg");
//!     let resp = client
//!         .execute_query("dictionary", None, Some(3), None, &query)
//!         .await?;
//!     println!("{}: {:?}", resp.status_line(), resp.envelope()?.documents);
//!
//!     let resp = client
//!         .create_document("user", Some("X"), true, r#"{"id":"X","name":"X"}"#)
//!         .await?;
//!     println!("{}", resp.status_line());
//!
//!     Ok(())
//! }
//! ```

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod sign_request;
pub use sign_request::{sign, RequestSigner};

mod query;
pub use query::{Parameter, Query};

mod response;
pub use response::{Response, ResponseEnvelope};

mod client;
pub use client::Client;

mod container;
pub use container::{Container, PaginationState, Phase};
