use mockito::Matcher;
use parley_llm::{ChatClient, ChatRequest, Message, ModelCatalogClient, OpenRouterClient};
use serde_json::json;

fn client_for(server: &mockito::ServerGuard) -> OpenRouterClient {
    OpenRouterClient::with_endpoint("sk-test", server.url(), "http://localhost:3000").unwrap()
}

#[tokio::test]
async fn test_chat_sends_bearer_referer_and_messages() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_header("http-referer", "http://localhost:3000")
        .match_body(Matcher::Json(json!({
            "model": "gpt-3.5-turbo",
            "messages": [
                {"role": "system", "content": "Be brief"},
                {"role": "user", "content": "Hi"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "gen-1",
                "choices": [{"message": {"role": "assistant", "content": "Hello!"}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let request = ChatRequest::new(
        "gpt-3.5-turbo",
        vec![Message::system("Be brief"), Message::human("Hi")],
    );
    let response = client.chat(request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.content.as_deref(), Some("Hello!"));
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    assert_eq!(response.usage.unwrap().total_tokens, 7);
}

#[tokio::test]
async fn test_chat_non_success_status_is_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"No auth credentials found"}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let result = client
        .chat(ChatRequest::new("m", vec![Message::human("Hi")]))
        .await;

    let err = result.unwrap_err().to_string();
    assert!(err.contains("401"));
}

#[tokio::test]
async fn test_chat_without_choices_has_no_content() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let response = client_for(&server)
        .chat(ChatRequest::new("m", vec![]))
        .await
        .unwrap();

    assert!(response.content.is_none());
}

#[tokio::test]
async fn test_chat_undecodable_body_is_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let result = client_for(&server).chat(ChatRequest::new("m", vec![])).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_list_models() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/models")
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": [
                    {"id": "openai/gpt-4o", "name": "OpenAI: GPT-4o", "context_length": 128000},
                    {"id": "anthropic/claude-3.5-haiku", "name": "Claude 3.5 Haiku", "context_length": 200000}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let models = client_for(&server).list_models().await.unwrap();

    mock.assert_async().await;
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].id, "openai/gpt-4o");
    assert_eq!(models[1].context_length, Some(200000));
}

#[tokio::test]
async fn test_list_models_missing_data_is_empty() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/models")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let models = client_for(&server).list_models().await.unwrap();
    assert!(models.is_empty());
}

#[tokio::test]
async fn test_list_models_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/models")
        .with_status(500)
        .create_async()
        .await;

    assert!(client_for(&server).list_models().await.is_err());
}
