use crate::constants::*;
use cosmos_rest_core::utils::Redact;
use cosmos_rest_core::Context;
use serde::Deserialize;
use std::fmt::{Debug, Formatter};

/// Config carries all the configuration needed to reach a Cosmos DB database.
///
/// All fields are optional so a config can be assembled from several sources;
/// [`Client::new`](crate::Client::new) checks that the required ones are present.
#[derive(Clone, Default, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Config {
    /// `endpoint` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `COSMOS_ENDPOINT_URI`, then `ENDPOINT_URI`
    ///
    /// For example `https://myaccount.documents.azure.com:443/`.
    pub endpoint: Option<String>,
    /// `master_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `COSMOS_MASTER_KEY`, then `MASTER_KEY`
    pub master_key: Option<String>,
    /// `database` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `COSMOS_DATABASE`, then `DATABASE`
    pub database: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("master_key", &Redact::from(&self.master_key))
            .field("database", &self.database)
            .finish()
    }
}

impl Config {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the account endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the base64 encoded master key.
    pub fn with_master_key(mut self, master_key: impl Into<String>) -> Self {
        self.master_key = Some(master_key.into());
        self
    }

    /// Set the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Load config from env.
    ///
    /// Values that are already set are kept.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();
        let lookup = |primary: &str, fallback: &str| {
            envs.get(primary)
                .or_else(|| envs.get(fallback))
                .filter(|v| !v.is_empty())
                .cloned()
        };

        if self.endpoint.is_none() {
            self.endpoint = lookup(COSMOS_ENDPOINT_URI, ENDPOINT_URI);
        }
        if self.master_key.is_none() {
            self.master_key = lookup(COSMOS_MASTER_KEY, MASTER_KEY);
        }
        if self.database.is_none() {
            self.database = lookup(COSMOS_DATABASE, DATABASE);
        }

        self
    }
}
