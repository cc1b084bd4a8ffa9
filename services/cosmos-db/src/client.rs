use crate::constants::*;
use crate::provide_credential::StaticCredentialProvider;
use crate::{Config, Container, Credential, Query, RequestSigner, Response};
use bytes::Bytes;
use cosmos_rest_core::{Context, Error, ProvideCredential, Result, Signer};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{Method, Uri};
use log::debug;
use percent_encoding::utf8_percent_encode;

/// Client issues signed document operations against one database.
///
/// Every operation is a single request/response exchange and takes all of its
/// inputs as parameters, so a `Client` can be cloned and shared freely.
///
/// Operations only fail for problems on our side of the wire: a malformed
/// master key, a request that can't be built, or a service that can't be
/// reached. Whatever status the service answers with is returned as a
/// [`Response`] for the caller to inspect.
#[derive(Clone, Debug)]
pub struct Client {
    ctx: Context,
    signer: Signer<Credential>,
    endpoint: String,
    database: String,
}

impl Client {
    /// Create a client from a config carrying endpoint, master key and database.
    pub fn new(ctx: Context, config: Config) -> Result<Self> {
        let master_key = config
            .master_key
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("master_key is required"))?;

        Self::with_credential_provider(ctx, config, StaticCredentialProvider::new(&master_key))
    }

    /// Create a client that loads its master key from `provider`.
    ///
    /// `config.master_key` is ignored.
    pub fn with_credential_provider(
        ctx: Context,
        config: Config,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Result<Self> {
        let endpoint = config
            .endpoint
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("endpoint is required"))?;
        let endpoint = endpoint.trim_end_matches('/').to_string();

        let uri: Uri = endpoint.parse().map_err(|e| {
            Error::config_invalid(format!("endpoint {endpoint} is not a valid uri")).with_source(e)
        })?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(Error::config_invalid(format!(
                "endpoint {endpoint} must contain scheme and host"
            )));
        }
        // The request path is signed as the resource link, so it can't carry a prefix.
        if !matches!(uri.path(), "" | "/") || uri.query().is_some() {
            return Err(Error::config_invalid(format!(
                "endpoint {endpoint} must not contain a path or query"
            )));
        }

        let database = config
            .database
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("database is required"))?;

        Ok(Self {
            signer: Signer::new(ctx.clone(), provider, RequestSigner::new()),
            ctx,
            endpoint,
            database,
        })
    }

    /// Name of the database this client talks to.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Open a pagination handle on `container`.
    pub fn container(&self, name: impl Into<String>, partition_key: Option<&str>) -> Container {
        Container::new(self.clone(), name.into(), partition_key.map(str::to_string))
    }

    /// Run a query and return one page of results.
    ///
    /// - `partition_key`: scope the query to one partition; without it, or when
    ///   it's empty, the query is allowed to fan out across partitions.
    /// - `max_item_count`: page size, ignored when `None` or `0`.
    /// - `continuation`: token returned with the previous page, passed back verbatim.
    ///
    /// The continuation of the response is set whenever the service returned one,
    /// regardless of status.
    pub async fn execute_query(
        &self,
        container: &str,
        partition_key: Option<&str>,
        max_item_count: Option<u32>,
        continuation: Option<&str>,
        query: &Query,
    ) -> Result<Response> {
        let link = format!("{}/{RESOURCE_DOCS}", self.collection_link(container));

        let mut builder = self
            .request_builder(Method::POST, &link)
            .header(CONTENT_TYPE, CONTENT_TYPE_QUERY_JSON)
            .header(X_MS_DOCUMENTDB_ISQUERY, HEADER_TRUE);
        builder = match partition_key.filter(|v| !v.is_empty()) {
            Some(pk) => builder.header(X_MS_DOCUMENTDB_PARTITIONKEY, partition_key_header(pk)?),
            None => builder.header(X_MS_DOCUMENTDB_QUERY_ENABLECROSSPARTITION, HEADER_TRUE),
        };
        if let Some(n) = max_item_count.filter(|n| *n > 0) {
            builder = builder.header(X_MS_MAX_ITEM_COUNT, n.to_string());
        }
        if let Some(token) = continuation.filter(|v| !v.is_empty()) {
            builder = builder.header(X_MS_CONTINUATION, token);
        }

        let body = serde_json::to_vec(query)?;
        self.send(builder.body(Bytes::from(body))?).await
    }

    /// Read a document by id.
    ///
    /// `partition_key` is required when the container is partitioned. An empty
    /// `id` is rejected before anything is sent.
    pub async fn get_document(
        &self,
        container: &str,
        partition_key: Option<&str>,
        id: &str,
    ) -> Result<Response> {
        let link = self.document_link(container, id)?;

        let mut builder = self
            .request_builder(Method::GET, &link)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON);
        if let Some(pk) = partition_key.filter(|v| !v.is_empty()) {
            builder = builder.header(X_MS_DOCUMENTDB_PARTITIONKEY, partition_key_header(pk)?);
        }

        self.send(builder.body(Bytes::new())?).await
    }

    /// Create a document, or replace it when `upsert` is set.
    ///
    /// Without `upsert` the service answers `409 Conflict` if a document with
    /// the same id exists. `document` is sent untouched.
    pub async fn create_document(
        &self,
        container: &str,
        partition_key: Option<&str>,
        upsert: bool,
        document: impl Into<Bytes>,
    ) -> Result<Response> {
        let link = format!("{}/{RESOURCE_DOCS}", self.collection_link(container));

        let mut builder = self
            .request_builder(Method::POST, &link)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON);
        if upsert {
            builder = builder.header(X_MS_DOCUMENTDB_IS_UPSERT, HEADER_TRUE);
        }
        if let Some(pk) = partition_key.filter(|v| !v.is_empty()) {
            builder = builder.header(X_MS_DOCUMENTDB_PARTITIONKEY, partition_key_header(pk)?);
        }

        self.send(builder.body(document.into())?).await
    }

    /// Delete a document by id.
    ///
    /// `partition_key` is required when the container is partitioned. The body
    /// of a successful delete is empty. An empty `id` is rejected before
    /// anything is sent.
    pub async fn delete_document(
        &self,
        container: &str,
        partition_key: Option<&str>,
        id: &str,
    ) -> Result<Response> {
        let link = self.document_link(container, id)?;

        let mut builder = self
            .request_builder(Method::DELETE, &link)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON);
        if let Some(pk) = partition_key.filter(|v| !v.is_empty()) {
            builder = builder.header(X_MS_DOCUMENTDB_PARTITIONKEY, partition_key_header(pk)?);
        }

        self.send(builder.body(Bytes::new())?).await
    }

    /// `dbs/{db}/colls/{container}`, lowercased.
    fn collection_link(&self, container: &str) -> String {
        format!("dbs/{}/colls/{}", self.database, container).to_lowercase()
    }

    /// `dbs/{db}/colls/{container}/docs/{id}`; the id keeps its case and is
    /// encoded as a path segment.
    fn document_link(&self, container: &str, id: &str) -> Result<String> {
        if id.is_empty() {
            return Err(Error::request_invalid("document id is required"));
        }

        Ok(format!(
            "{}/{RESOURCE_DOCS}/{}",
            self.collection_link(container),
            utf8_percent_encode(id, &COSMOS_ENCODE_SET)
        ))
    }

    fn request_builder(&self, method: Method, link: &str) -> http::request::Builder {
        http::Request::builder()
            .method(method)
            .uri(format!("{}/{}", self.endpoint, link))
            .header(ACCEPT, "*/*")
            .header(X_MS_VERSION, API_VERSION)
    }

    async fn send(&self, req: http::Request<Bytes>) -> Result<Response> {
        let (mut parts, body) = req.into_parts();
        self.signer.sign(&mut parts).await?;
        let req = http::Request::from_parts(parts, body);

        debug!("sending request: {} {}", req.method(), req.uri());
        let resp = Response::from_http(self.ctx.http_send(req).await?);
        debug!(
            "got response: {}, continuation: {:?}",
            resp.status_line(),
            resp.continuation()
        );

        Ok(resp)
    }
}

/// Partition key header value: a single element json array, e.g. `["Zwerg"]`.
fn partition_key_header(partition_key: &str) -> Result<String> {
    Ok(serde_json::to_string(&[partition_key])?)
}
