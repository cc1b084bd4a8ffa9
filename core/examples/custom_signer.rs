//! Plug a custom credential into [`Signer`].
//!
//! Cosmos DB hands out resource tokens scoped to a single container. They are
//! already signed by the service, so signing a request only means attaching
//! the token next to a fresh `x-ms-date`.

use async_trait::async_trait;
use cosmos_rest_core::time::{format_http_date, now};
use cosmos_rest_core::utils::Redact;
use cosmos_rest_core::{
    Context, Error, OsEnv, ProvideCredential, Result, SignRequest, Signer, SigningCredential,
};
use http::request::Parts;
use std::fmt::{Debug, Formatter};

#[derive(Clone)]
struct ResourceToken {
    token: String,
}

impl Debug for ResourceToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceToken")
            .field("token", &Redact::from(&self.token))
            .finish()
    }
}

impl SigningCredential for ResourceToken {
    fn is_valid(&self) -> bool {
        !self.token.is_empty()
    }
}

#[derive(Debug)]
struct EnvResourceTokenProvider;

#[async_trait]
impl ProvideCredential for EnvResourceTokenProvider {
    type Credential = ResourceToken;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        Ok(ctx
            .env_var("COSMOS_RESOURCE_TOKEN")
            .filter(|v| !v.is_empty())
            .map(|token| ResourceToken { token }))
    }
}

#[derive(Debug)]
struct ResourceTokenSigner;

#[async_trait]
impl SignRequest for ResourceTokenSigner {
    type Credential = ResourceToken;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let cred = credential
            .ok_or_else(|| Error::credential_invalid("COSMOS_RESOURCE_TOKEN is not set"))?;

        req.headers
            .insert("x-ms-date", format_http_date(now()).parse()?);
        req.headers
            .insert(http::header::AUTHORIZATION, cred.token.parse()?);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let ctx = Context::new().with_env(OsEnv);
    let signer = Signer::new(ctx, EnvResourceTokenProvider, ResourceTokenSigner);

    let mut parts = http::Request::builder()
        .method("GET")
        .uri("https://myaccount.documents.azure.com/dbs/db/colls/coll/docs/doc1")
        .body(())?
        .into_parts()
        .0;

    match signer.sign(&mut parts).await {
        Ok(()) => println!("signed headers: {:?}", parts.headers),
        Err(e) => eprintln!("failed to sign request: {e}"),
    }

    Ok(())
}
