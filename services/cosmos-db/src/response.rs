use crate::constants::X_MS_CONTINUATION;
use bytes::Bytes;
use cosmos_rest_core::{Error, Result};
use http::{HeaderMap, StatusCode};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw outcome of one request.
///
/// Any status the service answers with is a `Response`, including 404, 409
/// and 429; only transport and credential failures are errors. Use
/// [`Response::error_for_status`] to turn a non-success status into an
/// [`Error`].
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    continuation: Option<String>,
}

impl Response {
    /// Take over a response from the transport.
    ///
    /// A continuation header that isn't visible ascii can't be sent back, so
    /// it's dropped with a warning; status and body are always kept.
    pub(crate) fn from_http(resp: http::Response<Bytes>) -> Self {
        let (parts, body) = resp.into_parts();
        let continuation = parts
            .headers
            .get(X_MS_CONTINUATION)
            .and_then(|v| match v.to_str() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("dropping continuation token of {}: {e}", parts.status);
                    None
                }
            })
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string());

        Self {
            status: parts.status,
            headers: parts.headers,
            body,
            continuation,
        }
    }

    /// The answer for a fetch on an exhausted query: `204 No Content` with no
    /// body, produced without touching the network.
    pub(crate) fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            continuation: None,
        }
    }

    /// Status returned by the service.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Status rendered as a status line, for example `200 OK` or `409 Conflict`.
    pub fn status_line(&self) -> String {
        match self.status.canonical_reason() {
            Some(reason) => format!("{} {}", self.status.as_str(), reason),
            None => self.status.as_str().to_string(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw response body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Response body as text, invalid utf-8 is replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Consume the response and return the body.
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Continuation token returned by the service, `None` when no more pages remain.
    pub fn continuation(&self) -> Option<&str> {
        self.continuation.as_deref()
    }

    /// Parse the body as a query envelope.
    pub fn envelope(&self) -> Result<ResponseEnvelope> {
        serde_json::from_slice(&self.body).map_err(|e| {
            Error::unexpected(format!(
                "response body of {} is not a cosmos db envelope",
                self.status_line()
            ))
            .with_source(e)
        })
    }

    /// Return `self` for 2xx statuses, otherwise a service error.
    ///
    /// The error kind follows the status: [`NotFound`](cosmos_rest_core::ErrorKind::NotFound)
    /// for 404, [`Conflict`](cosmos_rest_core::ErrorKind::Conflict) for 409,
    /// [`Throttled`](cosmos_rest_core::ErrorKind::Throttled) for 429 and
    /// [`Service`](cosmos_rest_core::ErrorKind::Service) for everything else.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let mut message = self.status_line();
        if let Ok(envelope) = self.envelope() {
            if let Some(code) = envelope.code {
                message.push_str(": ");
                message.push_str(&code);
            }
            if let Some(msg) = envelope.message {
                message.push_str(": ");
                message.push_str(&msg);
            }
        }

        Err(Error::service(self.status, message))
    }
}

/// Body of a query response.
///
/// On success `_rid`, `Documents` and `_count` are filled; on failure only
/// `code` and `message` are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Error code from the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Error message from the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Resource id of the queried container.
    #[serde(rename = "_rid", default)]
    pub rid: String,
    /// Documents of this page, untouched.
    #[serde(rename = "Documents", default)]
    pub documents: Vec<Value>,
    /// Number of documents in this page.
    #[serde(rename = "_count", default)]
    pub count: u64,
}

impl ResponseEnvelope {
    /// Decode every document into `T`.
    pub fn documents_as<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.documents
            .iter()
            .map(|doc| T::deserialize(doc).map_err(Error::from))
            .collect()
    }
}
