use crate::{Client, Query, Response};
use bytes::Bytes;
use cosmos_rest_core::{Error, Result};
use http::StatusCode;
use log::debug;

/// Where a query opened on a [`Container`] stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// A query is open and no page has been fetched yet.
    Idle,
    /// At least one page was fetched and the service handed out a continuation token.
    Fetching,
    /// The last fetched page came without a continuation token.
    Exhausted,
}

/// Pagination state of the query currently open on a [`Container`].
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    continuation: Option<String>,
    steps: usize,
    status: Option<StatusCode>,
    body: Bytes,
}

impl PaginationState {
    /// Continuation token to present on the next fetch.
    pub fn continuation(&self) -> Option<&str> {
        self.continuation.as_deref()
    }

    /// Number of pages fetched from the service since the query was opened.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Status of the last fetched page.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Body of the last fetched page.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Current phase derived from the step counter and the held token.
    pub fn phase(&self) -> Phase {
        match (self.steps, &self.continuation) {
            (0, _) => Phase::Idle,
            (_, Some(_)) => Phase::Fetching,
            (_, None) => Phase::Exhausted,
        }
    }
}

/// Container pages through the results of one query at a time.
///
/// Open a query with [`Container::open_query`], then call [`Container::fetch`]
/// until the held continuation token is gone:
///
/// ```no_run
/// # use cosmos_rest_db::{Client, Query};
/// # async fn example(client: Client) -> cosmos_rest_core::Result<()> {
/// let mut container = client.container("dictionary", None);
/// container.open_query(Some(3), Query::new("SELECT * FROM c"));
///
/// loop {
///     let page = container.fetch().await?;
///     if !page.is_success() {
///         break;
///     }
///     for doc in page.envelope()?.documents {
///         println!("{doc}");
///     }
///     if container.state().continuation().is_none() {
///         break;
///     }
/// }
/// # Ok(())
/// # }
/// ```
///
/// Fetching takes `&mut self`: one pagination sequence has exactly one driver.
#[derive(Debug, Clone)]
pub struct Container {
    client: Client,
    name: String,
    partition_key: Option<String>,
    query: Option<Query>,
    max_item_count: Option<u32>,
    state: PaginationState,
}

impl Container {
    pub(crate) fn new(client: Client, name: String, partition_key: Option<String>) -> Self {
        Self {
            client,
            name,
            partition_key,
            query: None,
            max_item_count: None,
            state: PaginationState::default(),
        }
    }

    /// Name of the container.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Partition key applied to every query of this container.
    pub fn partition_key(&self) -> Option<&str> {
        self.partition_key.as_deref()
    }

    /// Pagination state of the open query.
    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Shortcut for `self.state().phase()`.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Open `query` for fetching, `max_item_count` pages at a time.
    ///
    /// Any previous query and its continuation token are dropped.
    pub fn open_query(&mut self, max_item_count: Option<u32>, query: Query) {
        self.query = Some(query);
        self.max_item_count = max_item_count;
        self.state = PaginationState::default();
    }

    /// Fetch the next page of the open query.
    ///
    /// The first call after [`Container::open_query`] always reaches the service;
    /// later calls only do while a continuation token is held. Once the token is
    /// gone, whatever the last status was, `fetch` answers `204 No Content` with
    /// an empty body without a network call and leaves the state untouched.
    ///
    /// An error leaves the state untouched as well, so the same page is
    /// requested again on the next call.
    pub async fn fetch(&mut self) -> Result<Response> {
        let Some(query) = &self.query else {
            return Err(Error::request_invalid(
                "no query is open on this container",
            ));
        };

        if self.state.phase() == Phase::Exhausted {
            debug!(
                "query on {} is exhausted after {} pages",
                self.name, self.state.steps
            );
            return Ok(Response::no_content());
        }

        let resp = self
            .client
            .execute_query(
                &self.name,
                self.partition_key.as_deref(),
                self.max_item_count,
                self.state.continuation.as_deref(),
                query,
            )
            .await?;

        self.state.steps += 1;
        self.state.status = Some(resp.status());
        self.state.body = resp.body().clone();
        self.state.continuation = resp.continuation().map(str::to_string);

        Ok(resp)
    }
}
