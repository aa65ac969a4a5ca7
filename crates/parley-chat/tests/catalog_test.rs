use mockito::Server;
use parley_chat::{CompletionGateway, ModelCatalog, QueryState};
use parley_persist::{MemorySettingsStore, Settings, OPENROUTER_KEY};
use std::sync::Arc;

fn catalog(store: MemorySettingsStore, base_url: String) -> ModelCatalog {
    ModelCatalog::new(CompletionGateway::new(Settings::new(Arc::new(store))).with_base_url(base_url))
}

#[tokio::test]
async fn test_missing_credential_is_error_without_request() {
    let mut server = Server::new_async().await;
    let mock = server.mock("GET", "/models").expect(0).create_async().await;

    let query = catalog(MemorySettingsStore::new(), server.url()).query();
    let state = query.wait().await;

    assert!(matches!(state, QueryState::Error(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_success_lists_models() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/models")
        .match_header("authorization", "Bearer sk-or-1")
        .with_status(200)
        .with_body(
            r#"{"data":[
                {"id":"openai/gpt-4o","name":"GPT-4o","context_length":128000},
                {"id":"anthropic/claude-3-haiku","name":"Claude 3 Haiku","context_length":200000}
            ]}"#,
        )
        .create_async()
        .await;

    let query = catalog(
        MemorySettingsStore::new().with_entry(OPENROUTER_KEY, "sk-or-1"),
        server.url(),
    )
    .query();

    let state = query.wait().await;
    mock.assert_async().await;

    let models = state.models().unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].id, "openai/gpt-4o");
    assert_eq!(models[1].context_length, Some(200000));
    assert_eq!(query.state(), state);
}

#[tokio::test]
async fn test_missing_data_is_empty_success() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/models")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let query = catalog(MemorySettingsStore::new().with_entry(OPENROUTER_KEY, "k"), server.url()).query();
    assert_eq!(query.wait().await, QueryState::Success(Vec::new()));
}

#[tokio::test]
async fn test_non_success_is_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/models")
        .with_status(401)
        .with_body(r#"{"error":{"message":"No auth credentials found"}}"#)
        .create_async()
        .await;

    let query = catalog(MemorySettingsStore::new().with_entry(OPENROUTER_KEY, "bad"), server.url()).query();
    assert!(matches!(query.wait().await, QueryState::Error(_)));
}

#[tokio::test]
async fn test_result_cached_until_refetch() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/models")
        .with_status(200)
        .with_body(r#"{"data":[{"id":"m","name":"M"}]}"#)
        .expect(2)
        .create_async()
        .await;

    let mut query = catalog(MemorySettingsStore::new().with_entry(OPENROUTER_KEY, "k"), server.url()).query();
    query.wait().await;
    query.wait().await;
    assert!(query.state().models().is_some());

    query.refetch();
    assert!(query.state().is_loading());
    assert_eq!(query.wait().await.models().map(|m| m.len()), Some(1));

    mock.assert_async().await;
}
