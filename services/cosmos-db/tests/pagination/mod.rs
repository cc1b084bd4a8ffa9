use crate::fake::{FakeCosmos, Fault};
use anyhow::Result;
use cosmos_rest_core::ErrorKind;
use cosmos_rest_db::{Phase, Query};
use http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

/// Seven entries for "Zwerg" mixed with a few others.
fn dictionary() -> Vec<Value> {
    let mut docs = Vec::new();
    for i in 1..=7 {
        docs.push(json!({"id": format!("zwerg-{i}"), "word": "Zwerg"}));
        if i % 3 == 0 {
            docs.push(json!({"id": format!("riese-{i}"), "word": "Riese"}));
        }
    }
    docs
}

fn zwerg_query() -> Query {
    Query::new("SELECT * FROM c WHERE c.word = @word").with_parameter("@word", "Zwerg")
}

fn ids(page: &cosmos_rest_db::Response) -> Vec<String> {
    page.envelope()
        .unwrap()
        .documents
        .iter()
        .map(|d| d["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_fetch_pages_until_exhausted() -> Result<()> {
    let fake = FakeCosmos::new().with_collection("dictionary", dictionary());
    let mut container = fake.client().container("dictionary", None);

    container.open_query(Some(3), zwerg_query());
    assert_eq!(container.phase(), Phase::Idle);

    let page = container.fetch().await?;
    assert_eq!(page.status(), StatusCode::OK);
    assert_eq!(ids(&page), vec!["zwerg-1", "zwerg-2", "zwerg-3"]);
    assert!(page.continuation().is_some());
    assert_eq!(container.phase(), Phase::Fetching);
    assert_eq!(container.state().continuation(), page.continuation());
    assert_eq!(container.state().status(), Some(StatusCode::OK));
    assert_eq!(container.state().body(), page.body());

    let page = container.fetch().await?;
    assert_eq!(ids(&page), vec!["zwerg-4", "zwerg-5", "zwerg-6"]);
    assert!(page.continuation().is_some());
    assert_eq!(container.phase(), Phase::Fetching);

    let page = container.fetch().await?;
    assert_eq!(ids(&page), vec!["zwerg-7"]);
    assert_eq!(page.continuation(), None);
    assert_eq!(container.phase(), Phase::Exhausted);
    assert_eq!(container.state().steps(), 3);

    let requests = fake.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].header("x-ms-continuation"), None);
    for req in &requests {
        assert_eq!(req.header("x-ms-max-item-count"), Some("3"));
    }
    Ok(())
}

#[tokio::test]
async fn test_exhausted_fetch_stays_off_the_network() -> Result<()> {
    let fake = FakeCosmos::new().with_collection("dictionary", dictionary());
    let mut container = fake.client().container("dictionary", None);
    container.open_query(Some(3), zwerg_query());

    while container.phase() != Phase::Exhausted {
        container.fetch().await?;
    }
    let last_body = container.state().body().clone();

    for _ in 0..2 {
        let page = container.fetch().await?;
        assert_eq!(page.status(), StatusCode::NO_CONTENT);
        assert_eq!(page.status_line(), "204 No Content");
        assert!(page.body().is_empty());
        assert_eq!(page.continuation(), None);
    }

    assert_eq!(fake.requests().len(), 3);
    assert_eq!(container.state().steps(), 3);
    assert_eq!(container.state().status(), Some(StatusCode::OK));
    assert_eq!(container.state().body(), &last_body);
    Ok(())
}

#[tokio::test]
async fn test_continuation_is_passed_back_verbatim() -> Result<()> {
    let fake = FakeCosmos::new().with_collection("dictionary", dictionary());
    let mut container = fake.client().container("dictionary", None);
    container.open_query(Some(3), zwerg_query());

    let mut tokens = Vec::new();
    while container.phase() != Phase::Exhausted {
        let page = container.fetch().await?;
        tokens.push(page.continuation().map(str::to_string));
    }

    let sent: Vec<Option<String>> = fake
        .requests()
        .iter()
        .map(|r| r.header("x-ms-continuation").map(str::to_string))
        .collect();
    assert_eq!(sent[0], None);
    assert_eq!(&sent[1..], &tokens[..tokens.len() - 1]);
    Ok(())
}

#[tokio::test]
async fn test_single_page_without_page_size() -> Result<()> {
    let fake = FakeCosmos::new().with_collection("dictionary", dictionary());
    let mut container = fake.client().container("dictionary", None);
    container.open_query(None, zwerg_query());

    let page = container.fetch().await?;
    assert_eq!(page.envelope()?.count, 7);
    assert_eq!(container.phase(), Phase::Exhausted);
    assert_eq!(fake.requests()[0].header("x-ms-max-item-count"), None);

    let page = container.fetch().await?;
    assert_eq!(page.status(), StatusCode::NO_CONTENT);
    assert_eq!(fake.requests().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_open_query_resets_state() -> Result<()> {
    let fake = FakeCosmos::new().with_collection("dictionary", dictionary());
    let mut container = fake.client().container("dictionary", None);

    container.open_query(Some(3), zwerg_query());
    container.fetch().await?;
    assert_eq!(container.phase(), Phase::Fetching);

    container.open_query(Some(5), Query::new("SELECT * FROM c"));
    assert_eq!(container.phase(), Phase::Idle);
    assert_eq!(container.state().steps(), 0);
    assert_eq!(container.state().continuation(), None);
    assert_eq!(container.state().status(), None);

    let page = container.fetch().await?;
    assert_eq!(page.envelope()?.count, 5);

    let req = fake.requests().pop().unwrap();
    assert_eq!(req.header("x-ms-continuation"), None);
    assert_eq!(req.header("x-ms-max-item-count"), Some("5"));
    Ok(())
}

#[tokio::test]
async fn test_fetch_without_open_query() {
    let fake = FakeCosmos::new().with_collection("dictionary", dictionary());
    let mut container = fake.client().container("dictionary", None);

    let err = container.fetch().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn test_failed_fetch_keeps_state() -> Result<()> {
    let fake = FakeCosmos::new().with_collection("dictionary", dictionary());
    let mut container = fake.client().container("dictionary", None);
    container.open_query(Some(3), zwerg_query());

    container.fetch().await?;
    let before = container.state().clone();

    fake.inject(Fault::Transport);
    let err = container.fetch().await.unwrap_err();
    assert!(err.is_transport_error());
    assert_eq!(container.state().steps(), before.steps());
    assert_eq!(container.state().continuation(), before.continuation());
    assert_eq!(container.state().body(), before.body());

    // The same page is requested again.
    let page = container.fetch().await?;
    assert_eq!(ids(&page), vec!["zwerg-4", "zwerg-5", "zwerg-6"]);
    assert_eq!(container.state().steps(), 2);
    Ok(())
}

#[tokio::test]
async fn test_service_error_ends_pagination() -> Result<()> {
    let fake = FakeCosmos::new();
    let mut container = fake.client().container("nowhere", None);
    container.open_query(Some(3), zwerg_query());

    let page = container.fetch().await?;
    assert_eq!(page.status(), StatusCode::NOT_FOUND);
    assert_eq!(container.state().status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(container.phase(), Phase::Exhausted);

    let page = container.fetch().await?;
    assert_eq!(page.status(), StatusCode::NO_CONTENT);
    assert_eq!(fake.requests().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_throttled_page_ends_pagination() -> Result<()> {
    let fake = FakeCosmos::new().with_collection("dictionary", dictionary());
    let mut container = fake.client().container("dictionary", None);
    container.open_query(Some(3), zwerg_query());

    container.fetch().await?;

    // A throttled answer carries no token, so the query ends there.
    fake.inject(Fault::Throttle);
    let page = container.fetch().await?;
    assert_eq!(page.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(container.phase(), Phase::Exhausted);

    container.open_query(Some(3), zwerg_query());
    let mut total = 0;
    while container.phase() != Phase::Exhausted {
        total += container.fetch().await?.envelope()?.documents.len();
    }
    assert_eq!(total, 7);
    Ok(())
}

#[tokio::test]
async fn test_partitioned_container() -> Result<()> {
    let fake =
        FakeCosmos::new().with_partitioned_collection("dictionary", "word", dictionary());
    let mut container = fake.client().container("Dictionary", Some("Riese"));
    assert_eq!(container.name(), "Dictionary");
    assert_eq!(container.partition_key(), Some("Riese"));

    container.open_query(Some(1), Query::new("SELECT * FROM c"));
    let mut seen = Vec::new();
    while container.phase() != Phase::Exhausted {
        seen.extend(ids(&container.fetch().await?));
    }
    assert_eq!(seen, vec!["riese-3", "riese-6"]);

    for req in fake.requests() {
        assert_eq!(
            req.header("x-ms-documentdb-partitionkey"),
            Some(r#"["Riese"]"#)
        );
        assert_eq!(req.header("x-ms-documentdb-query-enablecrosspartition"), None);
    }
    Ok(())
}

#[tokio::test]
async fn test_container_with_empty_partition_key() -> Result<()> {
    let fake =
        FakeCosmos::new().with_partitioned_collection("dictionary", "word", dictionary());
    let mut container = fake.client().container("dictionary", Some(""));

    container.open_query(Some(5), Query::new("SELECT * FROM c"));
    let mut total = 0;
    while container.phase() != Phase::Exhausted {
        total += container.fetch().await?.envelope()?.documents.len();
    }
    assert_eq!(total, 9);

    for req in fake.requests() {
        assert_eq!(req.header("x-ms-documentdb-partitionkey"), None);
        assert_eq!(
            req.header("x-ms-documentdb-query-enablecrosspartition"),
            Some("True")
        );
    }
    Ok(())
}
