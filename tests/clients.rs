use ai_toolkit::api::{
    ApiError, ChatBackend, ClientOptions, GeminiClient, GenerationRequest, OllamaClient,
    OpenAiClient,
};
use ai_toolkit::portfolio::PortfolioContent;
use ai_toolkit::tools::web_search::WebSearchTool;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UNREACHABLE: &str = "http://127.0.0.1:1";

fn options() -> ClientOptions {
    ClientOptions {
        connect_timeout: Duration::from_secs(2),
        request_timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn test_ollama_generate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llama3.2:3b",
            "prompt": "hi",
            "stream": false,
            "options": {"num_predict": 64}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "  hello there \n",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri(), options()).unwrap();
    let request = GenerationRequest::new("llama3.2:3b", "hi").with_sampling(0.5, 64);
    assert_eq!(client.generate(&request).await.unwrap(), "hello there");
}

#[tokio::test]
async fn test_ollama_list_models_and_availability() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{"name": "llama3.2:3b"}, {"name": "calculator-helper:latest"}]
        })))
        .mount(&server)
        .await;

    let client = OllamaClient::new(format!("{}/", server.uri()), options()).unwrap();
    assert!(client.is_available().await);
    assert_eq!(
        client.list_models().await,
        vec!["llama3.2:3b", "calculator-helper:latest"]
    );
}

#[tokio::test]
async fn test_ollama_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri(), options()).unwrap();
    let err = client
        .generate(&GenerationRequest::new("missing", "hi"))
        .await
        .unwrap_err();
    match err {
        ApiError::Status { status, message, .. } => {
            assert_eq!(status, 404);
            assert_eq!(message, "model not found");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_unreachable_ollama_is_offline_not_a_hang() {
    let client = OllamaClient::new(UNREACHABLE, options()).unwrap();
    let started = Instant::now();

    assert!(!client.is_available().await);
    assert!(client.list_models().await.is_empty());

    let err = client
        .generate(&GenerationRequest::new("llama3.2:3b", "hi"))
        .await
        .unwrap_err();
    assert!(err.is_offline());
    assert_eq!(
        err.to_string(),
        "Cannot connect to Ollama. Is it running at http://127.0.0.1:1?"
    );
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_backend_reports_offline_as_message() {
    let backend = ChatBackend::Ollama(OllamaClient::new(UNREACHABLE, options()).unwrap());
    let text = backend
        .generate_or_message(&GenerationRequest::new("llama3.2:3b", "hi"))
        .await;
    assert_eq!(
        text,
        "Error: Cannot connect to Ollama. Is it running at http://127.0.0.1:1?"
    );
}

#[tokio::test]
async fn test_openai_chat_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "messages": [{"role": "user", "content": "ping"}],
            "max_tokens": 10
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "pong"}}]
        })))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(Some("sk-test"), server.uri(), options()).unwrap();
    let request = GenerationRequest::new("gpt-3.5-turbo", "ping").with_sampling(0.7, 10);
    assert_eq!(client.generate(&request).await.unwrap(), "pong");
}

#[test]
fn test_missing_keys() {
    let err = OpenAiClient::new(None, UNREACHABLE, options()).err().unwrap();
    assert_eq!(err.to_string(), "OpenAI API key not found. Set OPENAI_API_KEY");
    let err = GeminiClient::new(None, UNREACHABLE, options()).err().unwrap();
    assert!(matches!(err, ApiError::MissingKey { env_var: "GEMINI_API_KEY", .. }));
}

#[tokio::test]
async fn test_gemini_generate_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-pro:generateContent"))
        .and(query_param("key", "g-key"))
        .and(body_partial_json(json!({
            "contents": [{"parts": [{"text": "ping"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "pong"}]}}]
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::new(Some("g-key"), server.uri(), options()).unwrap();
    let request = GenerationRequest::new("gemini-pro", "ping");
    assert_eq!(client.generate(&request).await.unwrap(), "pong");
}

#[tokio::test]
async fn test_unreachable_openai_is_offline() {
    let client = OpenAiClient::new(Some("sk"), UNREACHABLE, options()).unwrap();
    let err = client
        .generate(&GenerationRequest::new("gpt-4", "hi"))
        .await
        .unwrap_err();
    assert!(err.is_offline());
}

#[tokio::test]
async fn test_web_search_against_mock() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("q", "rust language"))
        .and(query_param("format", "json"))
        .and(header("user-agent", "AI-Toolkit/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "RelatedTopics": [
                {"Text": "Rust - a systems language", "FirstURL": "https://duckduckgo.com/Rust"}
            ]
        })))
        .mount(&server)
        .await;

    let tool = WebSearchTool::new(
        format!("{}/", server.uri()),
        Arc::new(PortfolioContent::default()),
    )
    .unwrap();
    let output = tool.run("rust language").await;
    assert!(output.starts_with("Search Results:"));
    assert!(output.contains("1. Rust - a systems language"));
    assert!(output.contains("URL: https://duckduckgo.com/Rust"));
}

#[tokio::test]
async fn test_web_search_no_results_and_offline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"RelatedTopics": []})))
        .mount(&server)
        .await;

    let tool = WebSearchTool::new(server.uri(), Arc::new(PortfolioContent::default())).unwrap();
    assert_eq!(tool.run("zzzz").await, "No results found for: zzzz");

    let offline =
        WebSearchTool::new(UNREACHABLE, Arc::new(PortfolioContent::default())).unwrap();
    let output = offline.run("anything").await;
    assert!(output.starts_with("Error performing search:"));
    assert!(output.ends_with("Note: Web search requires internet connection."));
}
