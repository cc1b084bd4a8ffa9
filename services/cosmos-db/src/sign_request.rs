use crate::constants::*;
use crate::Credential;
use async_trait::async_trait;
use cosmos_rest_core::hash::{base64_decode, base64_hmac_sha256};
use cosmos_rest_core::time::{format_http_date, now, DateTime};
use cosmos_rest_core::{Context, Error, Result, SignRequest};
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;
use percent_encoding::{percent_decode_str, utf8_percent_encode};

/// Compute the master key authorization token for one request.
///
/// - `verb`: the http method, e.g. `GET`.
/// - `resource_type`: the kind of resource addressed, e.g. `docs`.
/// - `resource_link`: the path of the resource, e.g. `dbs/db/colls/coll`.
/// - `date`: the value sent in `x-ms-date`.
/// - `master_key`: the base64 encoded account key.
///
/// Verb, resource type and date are lowercased before hashing. The resource
/// link is hashed exactly as given: callers build it in lowercase except for
/// document ids, and the service checks it case sensitively.
///
/// The returned token is already url encoded and can be used as the
/// `authorization` header value directly.
///
/// ## Reference
///
/// - [Access control in the Azure Cosmos DB SQL API](https://learn.microsoft.com/en-us/rest/api/cosmos-db/access-control-on-cosmosdb-resources)
pub fn sign(
    verb: &str,
    resource_type: &str,
    resource_link: &str,
    date: &str,
    master_key: &str,
) -> Result<String> {
    let key = base64_decode(master_key).map_err(|e| {
        Error::credential_invalid("master key is not valid base64").with_source(e)
    })?;

    let string_to_sign = string_to_sign(verb, resource_type, resource_link, date);
    debug!("string to sign: {:?}", &string_to_sign);

    let signature = base64_hmac_sha256(&key, string_to_sign.as_bytes());
    let token = format!("type={MASTER_TOKEN_TYPE}&ver={MASTER_TOKEN_VERSION}&sig={signature}");

    Ok(utf8_percent_encode(&token, &COSMOS_ENCODE_SET).to_string())
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// lowercase(Verb) + "\n" +
/// lowercase(ResourceType) + "\n" +
/// ResourceLink + "\n" +
/// lowercase(Date) + "\n" +
/// "" + "\n"
/// ```
///
/// The trailing empty line is the unused `Date` header slot; `x-ms-date` is
/// always sent instead.
fn string_to_sign(verb: &str, resource_type: &str, resource_link: &str, date: &str) -> String {
    let mut s = String::with_capacity(
        verb.len() + resource_type.len() + resource_link.len() + date.len() + 5,
    );

    s.push_str(&verb.to_lowercase());
    s.push('\n');
    s.push_str(&resource_type.to_lowercase());
    s.push('\n');
    s.push_str(resource_link);
    s.push('\n');
    s.push_str(&date.to_lowercase());
    s.push('\n');
    s.push('\n');

    s
}

/// Split a request path into its resource type and resource link.
///
/// Paths alternate between a resource type and a resource id:
///
/// - an odd number of segments addresses a feed (`dbs/db/colls/coll/docs`);
///   the last segment is the resource type and the link is its parent.
/// - an even number of segments addresses one item (`dbs/db/colls/coll/docs/id`);
///   the type is the second to last segment and the link is the whole path.
fn resource_type_and_link(path: &str) -> Result<(&str, &str)> {
    let path = path.trim_matches('/');
    if path.is_empty() {
        return Err(Error::request_invalid(
            "request path doesn't address a cosmos db resource",
        ));
    }

    if path.split('/').count() % 2 == 1 {
        Ok(match path.rsplit_once('/') {
            Some((link, resource_type)) => (resource_type, link),
            None => (path, ""),
        })
    } else {
        let resource_type = path.rsplit('/').nth(1).unwrap_or_default();
        Ok((resource_type, path))
    }
}

/// RequestSigner that implements Cosmos DB master key authorization.
///
/// It stamps `x-ms-date` on the request and inserts the matching
/// `authorization` token. Resource type and link are derived from the request
/// path, so the path must be the resource link itself.
#[derive(Debug)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new request signer.
    pub fn new() -> Self {
        Self { time: None }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::credential_invalid("master key is required"));
        };

        let path = percent_decode_str(req.uri.path()).decode_utf8_lossy();
        let (resource_type, resource_link) = resource_type_and_link(&path)?;

        let date = format_http_date(self.time.unwrap_or_else(now));
        let token = sign(
            req.method.as_str(),
            resource_type,
            resource_link,
            &date,
            &cred.master_key,
        )?;

        req.headers.insert(X_MS_DATE, date.parse()?);
        req.headers.insert(header::AUTHORIZATION, {
            let mut value: HeaderValue = token.parse()?;
            value.set_sensitive(true);
            value
        });

        Ok(())
    }
}
