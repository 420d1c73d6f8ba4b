/*!
 * Controller tests with real files on disk
 */

use std::fs;

use mdtranslate::app_config::Config;
use mdtranslate::app_controller::Controller;
use mdtranslate::errors::{AppError, ProviderError};
use mdtranslate::providers::mock::MockProvider;

use crate::common::http_server::{unused_local_url, CannedServer};
use crate::common::{self, test_config, SAMPLE_MARKDOWN};

fn uppercase(text: &str) -> String {
    text.to_uppercase()
}

/// Test translating a file into a new file
#[tokio::test]
async fn test_controller_run_withFiles_shouldWriteTranslation() -> anyhow::Result<()> {
    common::init_test_logging();
    let dir = common::create_temp_dir()?;
    let input = common::create_test_file(dir.path(), "README.md", SAMPLE_MARKDOWN)?;
    let output = dir.path().join("README.en.md");
    let controller = Controller::new_for_test()?;

    let stats = controller
        .run_with_provider(
            MockProvider::working().with_custom_response(uppercase),
            Some(&input),
            Some(&output),
            false,
        )
        .await?;

    let written = fs::read_to_string(&output)?;
    assert!(written.starts_with("# GETTING STARTED HERE\n\nINSTALL THE TOOL, THEN RUN IT.\n\n---\n\n"));
    assert!(written.ends_with("1. 2. 3.\n\n"));
    assert_eq!(stats.translated, 2);
    Ok(())
}

/// Test that existing output is protected unless forced
#[tokio::test]
async fn test_controller_run_withExistingOutput_shouldRequireForce() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let input = common::create_test_file(dir.path(), "in.md", "Some text here.\n")?;
    let output = common::create_test_file(dir.path(), "out.md", "keep me")?;
    let controller = Controller::new_for_test()?;
    let provider = MockProvider::working().with_custom_response(uppercase);

    let result = controller
        .run_with_provider(provider.clone(), Some(&input), Some(&output), false)
        .await;
    assert!(matches!(result, Err(AppError::File(ref m)) if m.contains("already exists")));
    assert_eq!(fs::read_to_string(&output)?, "keep me");
    assert_eq!(provider.request_count(), 0);

    controller
        .run_with_provider(provider, Some(&input), Some(&output), true)
        .await?;
    assert_eq!(fs::read_to_string(&output)?, "SOME TEXT HERE.\n\n");
    Ok(())
}

/// Test that configured thresholds reach the gate
#[tokio::test]
async fn test_controller_run_withStrictGate_shouldKeepOriginal() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let input = common::create_test_file(dir.path(), "in.md", "Hello world\n")?;
    let output = dir.path().join("out.md");

    let mut config = Config::default();
    config.gate.max_char_ratio = 1.0;
    let controller = Controller::with_config(config)?;

    fn longer(_: &str) -> String {
        "Bonjour monde".to_string()
    }
    let stats = controller
        .run_with_provider(
            MockProvider::working().with_custom_response(longer),
            Some(&input),
            Some(&output),
            false,
        )
        .await?;

    assert_eq!(fs::read_to_string(&output)?, "Hello world\n\n");
    assert_eq!(stats.rejected, 1);
    Ok(())
}

/// Test the real HTTP path from file to file
#[tokio::test]
async fn test_controller_run_withOllamaServer_shouldTranslateFile() -> anyhow::Result<()> {
    let server = CannedServer::start(
        200,
        r#"{"model":"phi4","message":{"role":"assistant","content":"Hello world\n(Note: translated from Dutch.)"},"done":true}"#,
    )
    .await?;
    let dir = common::create_temp_dir()?;
    let input = common::create_test_file(dir.path(), "in.md", "Hallo wereld\n\n/tmp/notes.md\n")?;
    let output = dir.path().join("out.md");

    let controller = Controller::with_config(test_config(&server.chat_url()))?;
    controller.run(Some(&input), Some(&output), false).await?;

    assert_eq!(fs::read_to_string(&output)?, "Hello world\n\n/tmp/notes.md\n\n");
    Ok(())
}

/// Test that a provider failure aborts the run with the part attached
#[tokio::test]
async fn test_controller_run_withUnreachableServer_shouldFail() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let input = common::create_test_file(dir.path(), "in.md", "Hallo wereld\n")?;
    let output = dir.path().join("out.md");

    let controller = Controller::with_config(test_config(&unused_local_url().await))?;
    let err = controller
        .run(Some(&input), Some(&output), false)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Hallo wereld"));
    Ok(())
}

/// Test the provider check
#[tokio::test]
async fn test_controller_check_shouldReportVersionOrConnectionError() -> anyhow::Result<()> {
    let server = CannedServer::start(200, r#"{"version":"0.6.0"}"#).await?;
    let controller = Controller::with_config(test_config(&server.chat_url()))?;
    assert_eq!(controller.check().await?, "0.6.0");

    let controller = Controller::with_config(test_config(&unused_local_url().await))?;
    assert!(matches!(
        controller.check().await,
        Err(AppError::Provider(ProviderError::ConnectionError(_)))
    ));
    Ok(())
}
