use log::{debug, info, warn};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use crate::app_config::Config;
use crate::errors::AppError;
use crate::markdown::PartReader;
use crate::providers::ollama::{ChatRequest, ChatResponse, Ollama};
use crate::providers::Provider;
use crate::translation::{DocumentPipeline, PipelineStats, TranslationGate, TranslationService};
use crate::validation::RatioValidator;

// @module: Application controller wiring streams, provider and pipeline

/// Main application controller for markdown translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self, AppError> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with a validated configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate().map_err(|e| AppError::Config(format!("{:#}", e)))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ollama client for the configured endpoint
    pub fn provider(&self) -> Ollama {
        Ollama::new(&self.config.provider.endpoint, self.config.provider.timeout_secs)
    }

    /// Build a document pipeline around `provider` using the configured prompt,
    /// thresholds and concurrency
    pub fn build_pipeline<P>(&self, provider: P) -> Result<DocumentPipeline<P>, AppError>
    where
        P: Provider<Request = ChatRequest, Response = ChatResponse>,
    {
        let service = TranslationService::from_config(provider, &self.config)
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;
        debug!("System prompt: {}", service.system_prompt());

        let validator = RatioValidator::with_thresholds(self.config.ratio_thresholds());
        Ok(DocumentPipeline::new(TranslationGate::new(service, validator))
            .with_concurrency(self.config.translation.concurrent_requests))
    }

    /// Translate `input` (stdin when `None` or `-`) into `output` (stdout when `None` or `-`)
    pub async fn run(&self, input: Option<&Path>, output: Option<&Path>, force_overwrite: bool) -> Result<PipelineStats, AppError> {
        self.run_with_provider(self.provider(), input, output, force_overwrite).await
    }

    /// Same as [`Controller::run`] with an explicit provider
    pub async fn run_with_provider<P>(
        &self,
        provider: P,
        input: Option<&Path>,
        output: Option<&Path>,
        force_overwrite: bool,
    ) -> Result<PipelineStats, AppError>
    where
        P: Provider<Request = ChatRequest, Response = ChatResponse>,
    {
        let input = input.filter(|path| !is_stdio(path));
        let output = output.filter(|path| !is_stdio(path));

        if let Some(path) = input {
            if !path.is_file() {
                return Err(AppError::File(format!("Input file does not exist: {}", path.display())));
            }
        }

        let pipeline = self.build_pipeline(provider)?;
        info!(
            "Translating {} to {} with {}",
            input.map_or_else(|| "stdin".to_string(), |p| p.display().to_string()),
            self.config.target_language,
            self.config.provider.model
        );

        let mut writer = open_output(output, force_overwrite)?;
        let stats = match input {
            Some(path) => {
                let file = File::open(path)
                    .map_err(|e| AppError::File(format!("Failed to open {}: {}", path.display(), e)))?;
                pipeline.run(PartReader::new(BufReader::new(file)), &mut writer).await?
            }
            None => pipeline.run(PartReader::from_stdin(), &mut writer).await?,
        };

        if let Some(path) = output {
            info!("Success: {}", path.display());
        }
        Ok(stats)
    }

    /// Check that the provider answers and return its version
    pub async fn check(&self) -> Result<String, AppError> {
        let provider = self.provider();
        info!("Checking Ollama at {}", provider.endpoint());
        let version = provider.version().await?;
        info!("Ollama version {} is reachable", version);
        Ok(version)
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn open_output(output: Option<&Path>, force_overwrite: bool) -> Result<Box<dyn Write>, AppError> {
    let Some(path) = output else {
        return Ok(Box::new(io::stdout().lock()));
    };

    if path.exists() {
        if !force_overwrite {
            return Err(AppError::File(format!(
                "Output file already exists: {} (use -f to force overwrite)",
                path.display()
            )));
        }
        warn!("Overwriting existing file: {}", path.display());
    }

    let file = File::create(path)
        .map_err(|e| AppError::File(format!("Failed to create {}: {}", path.display(), e)))?;
    Ok(Box::new(BufWriter::new(file)))
}
