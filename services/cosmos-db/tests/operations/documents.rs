use crate::fake::{FakeCosmos, Fault};
use anyhow::Result;
use cosmos_rest_core::ErrorKind;
use http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: String,
    name: String,
}

#[tokio::test]
async fn test_create_conflict_upsert_delete() -> Result<()> {
    let fake = FakeCosmos::new().with_collection("user", vec![]);
    let client = fake.client();

    let resp = client
        .create_document("user", None, false, r#"{"id":"X","name":"X"}"#)
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.status_line(), "201 Created");

    // Creating the same id again is answered, not raised.
    let resp = client
        .create_document("user", None, false, r#"{"id":"X","name":"Y"}"#)
        .await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(resp.envelope()?.code.as_deref(), Some("Conflict"));
    let err = resp.error_for_status().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let resp = client
        .create_document("user", None, true, r#"{"id":"X","name":"Y"}"#)
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client.get_document("user", None, "X").await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let user: User = serde_json::from_slice(resp.body())?;
    assert_eq!(
        user,
        User {
            id: "X".to_string(),
            name: "Y".to_string()
        }
    );

    let resp = client.delete_document("user", None, "X").await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(resp.body().is_empty());

    let resp = client.get_document("user", None, "X").await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.error_for_status().unwrap_err().kind(),
        ErrorKind::NotFound
    );

    let resp = client.delete_document("user", None, "X").await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert!(fake.documents("user").is_empty());
    Ok(())
}

#[tokio::test]
async fn test_upsert_creates_missing_document() -> Result<()> {
    let fake = FakeCosmos::new().with_collection("user", vec![]);
    let client = fake.client();

    let resp = client
        .create_document("user", None, true, r#"{"id":"X","name":"X"}"#)
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = fake.requests().pop().unwrap();
    assert_eq!(req.method, Method::POST);
    assert_eq!(req.path, "dbs/lerneria-express/colls/user/docs");
    assert_eq!(req.header("x-ms-documentdb-is-upsert"), Some("True"));
    assert_eq!(req.header("content-type"), Some("application/json"));
    assert_eq!(req.body, r#"{"id":"X","name":"X"}"#);
    Ok(())
}

#[tokio::test]
async fn test_document_is_sent_untouched() -> Result<()> {
    let fake = FakeCosmos::new().with_collection("user", vec![]);
    let client = fake.client();

    let doc = "{ \"id\" : \"spaced\",\n  \"nested\": {\"a\": [1, 2]} }";
    client.create_document("user", None, false, doc).await?;

    assert_eq!(fake.requests()[0].body, doc);
    assert_eq!(
        fake.documents("user"),
        vec![json!({"id": "spaced", "nested": {"a": [1, 2]}})]
    );
    Ok(())
}

#[tokio::test]
async fn test_document_id_needs_encoding() -> Result<()> {
    let fake = FakeCosmos::new().with_collection("dictionary", vec![]);
    let client = fake.client();

    let resp = client
        .create_document("Dictionary", None, false, r#"{"id":"Zwerg Nase"}"#)
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // The token is computed over the decoded id, so the fake accepts it.
    let resp = client.get_document("Dictionary", None, "Zwerg Nase").await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        fake.requests().pop().unwrap().path,
        "dbs/lerneria-express/colls/dictionary/docs/Zwerg Nase"
    );
    Ok(())
}

#[tokio::test]
async fn test_partitioned_point_operations() -> Result<()> {
    let fake = FakeCosmos::new().with_partitioned_collection(
        "user",
        "tenant",
        vec![json!({"id": "X", "tenant": "acme"})],
    );
    let client = fake.client();

    let resp = client.get_document("user", None, "X").await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client.get_document("user", Some("other"), "X").await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client.get_document("user", Some("acme"), "X").await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        fake.requests().pop().unwrap().header("x-ms-documentdb-partitionkey"),
        Some(r#"["acme"]"#)
    );

    let resp = client
        .create_document("user", Some("acme"), false, r#"{"id":"Y","tenant":"other"}"#)
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client.delete_document("user", Some("acme"), "X").await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn test_signed_headers() -> Result<()> {
    let fake = FakeCosmos::new().with_collection("user", vec![json!({"id": "X"})]);
    let client = fake.client();

    client.get_document("user", None, "X").await?;

    let req = fake.requests().pop().unwrap();
    assert_eq!(req.header("x-ms-version"), Some("2020-11-05"));
    assert_eq!(req.header("accept"), Some("*/*"));
    assert!(req.header("x-ms-date").unwrap().ends_with(" GMT"));
    assert!(req
        .header("authorization")
        .unwrap()
        .starts_with("type%3Dmaster%26ver%3D1.0%26sig%3D"));
    assert!(req.headers["authorization"].is_sensitive());
    Ok(())
}

#[tokio::test]
async fn test_wrong_master_key_is_unauthorized() -> Result<()> {
    let fake = FakeCosmos::new().with_collection("user", vec![json!({"id": "X"})]);
    // base64 of "another-master-key"
    let client = fake.client_with_key("YW5vdGhlci1tYXN0ZXIta2V5");

    let resp = client.get_document("user", None, "X").await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(!resp.is_success());

    let err = resp.error_for_status().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Service);
    assert!(err.to_string().contains("401 Unauthorized"));
    Ok(())
}

#[tokio::test]
async fn test_invalid_master_key_never_reaches_the_service() {
    let fake = FakeCosmos::new().with_collection("user", vec![]);
    let client = fake.client_with_key("not base64!");

    let err = client.get_document("user", None, "X").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn test_transport_failure_is_an_error() {
    let fake = FakeCosmos::new().with_collection("user", vec![]);
    let client = fake.client();

    fake.inject(Fault::Transport);
    let err = client
        .create_document("user", None, false, r#"{"id":"X"}"#)
        .await
        .unwrap_err();
    assert!(err.is_transport_error());
    assert!(fake.documents("user").is_empty());
}

#[tokio::test]
async fn test_throttled_is_a_response() -> Result<()> {
    let fake = FakeCosmos::new().with_collection("user", vec![json!({"id": "X"})]);
    let client = fake.client();

    fake.inject(Fault::Throttle);
    let resp = client.get_document("user", None, "X").await?;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        resp.error_for_status().unwrap_err().kind(),
        ErrorKind::Throttled
    );

    // The next attempt goes through.
    let resp = client.get_document("user", None, "X").await?;
    let doc: Value = serde_json::from_slice(resp.body())?;
    assert_eq!(doc["id"], "X");
    Ok(())
}

#[tokio::test]
async fn test_empty_partition_key_is_not_sent() -> Result<()> {
    let fake = FakeCosmos::new().with_collection("user", vec![json!({"id": "X"})]);
    let client = fake.client();

    let resp = client.get_document("user", Some(""), "X").await?;
    assert_eq!(resp.status(), StatusCode::OK);
    client
        .create_document("user", Some(""), false, r#"{"id":"Y"}"#)
        .await?;
    client.delete_document("user", Some(""), "Y").await?;

    for req in fake.requests() {
        assert_eq!(req.header("x-ms-documentdb-partitionkey"), None);
    }
    Ok(())
}

#[tokio::test]
async fn test_empty_id_is_rejected() {
    let fake = FakeCosmos::new().with_collection("user", vec![json!({"id": "X"})]);
    let client = fake.client();

    let err = client.get_document("user", None, "").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);

    let err = client.delete_document("user", None, "").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);

    assert!(fake.requests().is_empty());
    assert_eq!(fake.documents("user").len(), 1);
}
