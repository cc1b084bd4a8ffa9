use async_trait::async_trait;
use cosmos_rest_core::{Context, ProvideCredential, Result};

use crate::constants::{COSMOS_MASTER_KEY, MASTER_KEY};
use crate::credential::Credential;

/// EnvCredentialProvider loads the master key from the environment.
///
/// `COSMOS_MASTER_KEY` is checked first, then `MASTER_KEY`. The lookup happens
/// every time the signer needs a credential, so a rotated key is picked up once
/// the cached one is dropped.
#[derive(Clone, Debug, Default)]
pub struct EnvCredentialProvider {}

impl EnvCredentialProvider {
    /// Create a new env credential provider.
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let master_key = ctx
            .env_var(COSMOS_MASTER_KEY)
            .or_else(|| ctx.env_var(MASTER_KEY))
            .filter(|v| !v.is_empty());

        Ok(master_key.map(Credential::with_master_key))
    }
}
