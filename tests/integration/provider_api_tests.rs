/*!
 * Integration tests for the Ollama client against a local canned server
 */

use mdtranslate::errors::ProviderError;
use mdtranslate::providers::ollama::{ChatMessage, ChatRequest, Ollama};
use mdtranslate::providers::Provider;
use mdtranslate::translation::{DocumentPipeline, TranslationGate, TranslationService};
use mdtranslate::validation::RatioValidator;

use crate::common::http_server::{unused_local_url, CannedServer};

const CHAT_OK: &str = r#"{"model":"phi4","created_at":"2025-01-01T00:00:00Z","message":{"role":"assistant","content":"Hello world"},"done":true,"eval_count":3}"#;

fn request(text: &str) -> ChatRequest {
    ChatRequest::new(
        "phi4",
        vec![ChatMessage::system("Translate into English."), ChatMessage::user(text)],
    )
}

/// Test a successful chat round trip and the request wire format
#[tokio::test]
async fn test_ollama_complete_withOkResponse_shouldReturnContent() {
    let server = CannedServer::start(200, CHAT_OK).await.unwrap();
    let ollama = Ollama::new(server.chat_url(), 5);

    let response = ollama.complete(request("Hallo wereld")).await.unwrap();

    assert_eq!(Ollama::extract_text(&response), "Hello world");
    assert_eq!(response.eval_count, Some(3));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].request_line, "POST /api/chat HTTP/1.1");
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body["model"], "phi4");
    assert_eq!(body["stream"], false);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "Hallo wereld");
}

/// Test that a streamed JSONL body is tolerated
#[tokio::test]
async fn test_ollama_complete_withJsonlBody_shouldConcatenateContent() {
    let body = concat!(
        r#"{"model":"phi4","message":{"role":"assistant","content":"Hello"},"done":false}"#,
        "\n",
        r#"{"model":"phi4","message":{"role":"assistant","content":" world"},"done":true}"#,
        "\n"
    );
    let server = CannedServer::start(200, body).await.unwrap();
    let ollama = Ollama::new(server.chat_url(), 5);

    let response = ollama.complete(request("Hallo wereld")).await.unwrap();

    assert_eq!(response.message.content, "Hello world");
}

/// Test that a non-success status is an API error carrying the body
#[tokio::test]
async fn test_ollama_complete_withServerError_shouldReturnApiError() {
    let server = CannedServer::start(500, r#"{"error":"model crashed"}"#).await.unwrap();
    let ollama = Ollama::new(server.chat_url(), 5);

    match ollama.complete(request("Hallo")).await {
        Err(ProviderError::ApiError { status_code, message }) => {
            assert_eq!(status_code, 500);
            assert!(message.contains("model crashed"));
        }
        other => panic!("unexpected result {other:?}"),
    }
}

/// Test that a 2xx status other than 200 is still an API error
#[tokio::test]
async fn test_ollama_complete_withAcceptedStatus_shouldReturnApiError() {
    let server = CannedServer::start(202, CHAT_OK).await.unwrap();
    let ollama = Ollama::new(server.chat_url(), 5);

    let result = ollama.complete(request("Hallo")).await;

    assert!(matches!(result, Err(ProviderError::ApiError { status_code: 202, .. })));
}

/// Test that an undecodable body is a parse error
#[tokio::test]
async fn test_ollama_complete_withGarbageBody_shouldReturnParseError() {
    let server = CannedServer::start(200, "<html>not json</html>").await.unwrap();
    let ollama = Ollama::new(server.chat_url(), 5);

    let result = ollama.complete(request("Hallo")).await;

    assert!(matches!(result, Err(ProviderError::ParseError(_))));
}

/// Test that a refused connection is reported as such
#[tokio::test]
async fn test_ollama_complete_withNothingListening_shouldReturnConnectionError() {
    let ollama = Ollama::new(unused_local_url().await, 5);

    let result = ollama.complete(request("Hallo")).await;

    assert!(matches!(result, Err(ProviderError::ConnectionError(_))));
}

/// Test the version endpoint used by `check`
#[tokio::test]
async fn test_ollama_version_shouldQueryServerRoot() {
    let server = CannedServer::start(200, r#"{"version":"0.5.7"}"#).await.unwrap();
    let ollama = Ollama::new(server.chat_url(), 5);

    assert_eq!(ollama.version().await.unwrap(), "0.5.7");
    assert!(ollama.test_connection().await.is_ok());
    assert_eq!(server.requests()[0].request_line, "GET /api/version HTTP/1.1");
}

/// Test a whole document translated through the HTTP client
#[tokio::test]
async fn test_pipeline_withOllama_shouldEmitServerTranslation() {
    let server = CannedServer::start(200, CHAT_OK).await.unwrap();
    let service = TranslationService::new(Ollama::new(server.chat_url(), 5), "phi4", "Translate.");
    let pipeline = DocumentPipeline::new(TranslationGate::new(service, RatioValidator::new()));

    let output = pipeline
        .translate_text("## Hallo wereld\n\nhttps://example.com\n")
        .await
        .unwrap();

    assert_eq!(output, "## Hello world\n\nhttps://example.com\n\n");
    assert_eq!(server.requests().len(), 1);
}
