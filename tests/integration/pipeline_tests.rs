/*!
 * End-to-end tests of the document pipeline with scripted providers
 */

use async_trait::async_trait;
use std::io::{self, BufReader, Cursor, Read};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mdtranslate::errors::{AppError, ProviderError, TranslationError};
use mdtranslate::markdown::PartReader;
use mdtranslate::providers::mock::MockProvider;
use mdtranslate::providers::ollama::{ChatRequest, ChatResponse};
use mdtranslate::providers::Provider;
use mdtranslate::translation::{Disposition, DocumentPipeline, TranslationGate, TranslationService};
use mdtranslate::validation::RatioValidator;

use crate::common::{self, SAMPLE_MARKDOWN};

fn pipeline<P>(provider: P) -> DocumentPipeline<P>
where
    P: Provider<Request = ChatRequest, Response = ChatResponse>,
{
    DocumentPipeline::new(TranslationGate::new(
        TranslationService::new(provider, "test-model", "Translate into English."),
        RatioValidator::new(),
    ))
}

fn uppercase(text: &str) -> String {
    text.to_uppercase()
}

fn rambling(text: &str) -> String {
    format!("{} {} {} {}", text, text, text, text)
}

/// Answers later parts first: the delay shrinks with the trailing number
#[derive(Debug, Default)]
struct StaggeredProvider {
    completed: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Provider for StaggeredProvider {
    type Request = ChatRequest;
    type Response = ChatResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let text = request.user_content().unwrap_or_default().to_string();
        let number: u64 = text
            .rsplit(' ')
            .next()
            .and_then(|word| word.parse().ok())
            .unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(20 * (6u64.saturating_sub(number)))).await;
        self.completed.lock().unwrap().push(text.clone());
        Ok(ChatResponse::from_content(request.model(), text.to_uppercase()))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.message.content.clone()
    }
}

/// Test the full routing of a mixed document
#[tokio::test]
async fn test_pipeline_withMixedDocument_shouldTranslateOnlyText() {
    common::init_test_logging();
    let provider = MockProvider::working().with_custom_response(uppercase);
    let pipeline = pipeline(provider.clone());

    let output = pipeline.translate_text(SAMPLE_MARKDOWN).await.unwrap();

    assert_eq!(
        output,
        "# GETTING STARTED HERE\n\n\
         INSTALL THE TOOL, THEN RUN IT.\n\n\
         ---\n\n\
         https://example.com/docs\n\n\
         ./docs/../README.md\n\n\
         ## https://example.com/changelog\n\n\
         1. 2. 3.\n\n"
    );
    // header markers are never sent
    assert_eq!(
        provider.received(),
        vec!["Getting started here", "Install the tool, then run it."]
    );
}

/// Test the run statistics of a mixed document
#[tokio::test]
async fn test_pipeline_run_withMixedDocument_shouldCountDispositions() {
    let pipeline = pipeline(MockProvider::working().with_custom_response(uppercase));
    let mut output = Vec::new();

    let stats = pipeline
        .run(PartReader::new(Cursor::new(SAMPLE_MARKDOWN)), &mut output)
        .await
        .unwrap();

    assert_eq!(stats.parts, 7);
    assert_eq!(stats.translated, 2);
    assert_eq!(stats.rejected, 0);
    assert_eq!(stats.passed_through, 5);
    assert!(stats.summary().contains("7 parts"));
}

/// Test that rejected translations keep the original text
#[tokio::test]
async fn test_pipeline_withOversizedAnswers_shouldFallBackToOriginal() {
    let pipeline = pipeline(MockProvider::working().with_custom_response(rambling));
    let input = "# Short title here\n\nA plain sentence.\n";

    let output = pipeline.translate_text(input).await.unwrap();

    assert_eq!(output, "# Short title here\n\nA plain sentence.\n\n");
}

/// Test that each part's disposition reflects the gate decision
#[tokio::test]
async fn test_processPart_withRejectedAnswer_shouldReportRejection() {
    let pipeline = pipeline(MockProvider::working().with_custom_response(rambling));

    let processed = pipeline
        .process_part(3, "A plain sentence.".into())
        .await
        .unwrap();

    assert_eq!(processed.index, 3);
    assert_eq!(processed.output, "A plain sentence.");
    match processed.disposition {
        Disposition::Rejected(report) => assert_eq!(report.char_ratio.map(|r| r > 2.0), Some(true)),
        other => panic!("unexpected disposition {other:?}"),
    }
}

/// Test output order with several parts in flight
#[tokio::test]
async fn test_pipeline_withConcurrency_shouldKeepInputOrder() {
    let provider = StaggeredProvider::default();
    let completed = Arc::clone(&provider.completed);
    let pipeline = pipeline(provider).with_concurrency(5);

    let input = (1..=5)
        .map(|n| format!("Part number {}", n))
        .collect::<Vec<_>>()
        .join("\n\n");
    let output = pipeline.translate_text(&input).await.unwrap();

    assert_eq!(
        output,
        "PART NUMBER 1\n\nPART NUMBER 2\n\nPART NUMBER 3\n\nPART NUMBER 4\n\nPART NUMBER 5\n\n"
    );
    let completed = completed.lock().unwrap().clone();
    assert_eq!(completed.len(), 5);
    assert_eq!(completed.first().map(String::as_str), Some("Part number 5"));
}

/// Test that the first provider failure halts the run
#[tokio::test]
async fn test_pipeline_withProviderFailure_shouldAbortAfterWrittenParts() {
    let provider = MockProvider::intermittent(2).with_custom_response(uppercase);
    let pipeline = pipeline(provider.clone());
    let mut output = Vec::new();

    let input = "First words here.\n\nSecond words here.\n\nThird words here.\n";
    let result = pipeline
        .run(PartReader::new(Cursor::new(input)), &mut output)
        .await;

    match result {
        Err(AppError::Translation(TranslationError::Part { part, source })) => {
            assert_eq!(part, "Second words here.");
            assert!(matches!(source, ProviderError::ApiError { status_code: 503, .. }));
        }
        other => panic!("unexpected result {other:?}"),
    }
    assert_eq!(String::from_utf8(output).unwrap(), "FIRST WORDS HERE.\n\n");
    assert_eq!(provider.request_count(), 2);
}

/// Serves its data once, then fails every read
struct BrokenPipeReader {
    data: Option<&'static [u8]>,
}

impl Read for BrokenPipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.take() {
            Some(data) => {
                buf[..data.len()].copy_from_slice(data);
                Ok(data.len())
            }
            None => Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed")),
        }
    }
}

/// Test that a read failure halts the run after the parts already written
#[tokio::test]
async fn test_pipeline_withReadFailure_shouldAbortWithoutPartialPart() {
    let provider = MockProvider::working().with_custom_response(uppercase);
    let pipeline = pipeline(provider.clone());
    let mut output = Vec::new();

    let reader = BufReader::new(BrokenPipeReader {
        data: Some(b"First words here.\n\nHalf a part\nstill going\n"),
    });
    let result = pipeline.run(PartReader::new(reader), &mut output).await;

    match result {
        Err(AppError::Read(message)) => assert!(message.contains("pipe closed")),
        other => panic!("unexpected result {other:?}"),
    }
    assert_eq!(String::from_utf8(output).unwrap(), "FIRST WORDS HERE.\n\n");
    assert_eq!(provider.received(), vec!["First words here."]);
}

/// Test that a sequential run reads the next part only after the previous one is done
#[tokio::test]
async fn test_pipeline_sequential_shouldNotReadAheadOfFailedPart() {
    let pipeline = pipeline(MockProvider::failing());
    let mut output = Vec::new();

    let reader = BufReader::new(BrokenPipeReader {
        data: Some(b"First words here.\n\nNever reached\n"),
    });
    let result = pipeline.run(PartReader::new(reader), &mut output).await;

    assert!(matches!(result, Err(AppError::Translation(TranslationError::Part { .. }))));
    assert!(output.is_empty());
}

/// Test that pass-through parts never reach a failing provider
#[tokio::test]
async fn test_pipeline_withFailingProviderAndNoText_shouldSucceed() {
    let pipeline = pipeline(MockProvider::failing());

    let output = pipeline
        .translate_text("```\n\nhttps://example.com\n\n/etc/hosts\n")
        .await
        .unwrap();

    assert_eq!(output, "```\n\nhttps://example.com\n\n/etc/hosts\n\n");
}

/// Test that an empty stream terminates cleanly without output
#[tokio::test]
async fn test_pipeline_withEmptyStream_shouldEmitNothing() {
    let provider = MockProvider::working();
    let pipeline = pipeline(provider.clone());

    assert_eq!(pipeline.translate_text("").await.unwrap(), "");
    assert_eq!(pipeline.translate_text("\n\n\n").await.unwrap(), "");
    assert_eq!(provider.request_count(), 0);
}

/// Test driving the pipeline from synchronous code
#[test]
fn test_translateText_fromBlockingContext_shouldComplete() {
    let pipeline = pipeline(MockProvider::echo());

    let output = tokio_test::block_on(pipeline.translate_text("Hello there, world.\n"));

    assert_eq!(output.unwrap(), "Hello there, world.\n\n");
}
