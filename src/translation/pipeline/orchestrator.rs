/*!
 * Pipeline orchestrator for translating a markdown stream part by part.
 *
 * Each part flows through classification, optional header splitting and the
 * translation gate. Results are written in input order, one blank line after
 * each part. With a concurrency of one, a part is only read once the previous
 * one has been written.
 */

use futures::stream::{self, StreamExt};
use log::{info, warn};
use std::io::{BufRead, Write};
use std::pin::pin;
use std::time::Instant;

use crate::errors::{AppError, TranslationError};
use crate::markdown::{classify, classify_content, try_split_header, Classification, Part, PartReader, PART_SEPARATOR};
use crate::providers::ollama::{ChatRequest, ChatResponse};
use crate::providers::Provider;
use crate::translation::gate::TranslationGate;
use crate::validation::RatioReport;

use super::stats::PipelineStats;

/// What happened to a part
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    /// Emitted unchanged; carries the classification that caused the skip
    PassThrough(Classification),
    /// Translation accepted
    Translated(RatioReport),
    /// Translation rejected, original emitted
    Rejected(RatioReport),
}

/// A part after it went through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedPart {
    /// Position in the document, starting at 0
    pub index: usize,
    /// Trimmed input part
    pub original: Part,
    /// Text to emit
    pub output: String,
    /// Routing decision
    pub disposition: Disposition,
}

/// Orchestrates segmentation, classification and gated translation
#[derive(Debug)]
pub struct DocumentPipeline<P> {
    gate: TranslationGate<P>,
    concurrency: usize,
}

impl<P> DocumentPipeline<P>
where
    P: Provider<Request = ChatRequest, Response = ChatResponse>,
{
    /// Create a sequential pipeline
    pub fn new(gate: TranslationGate<P>) -> Self {
        Self { gate, concurrency: 1 }
    }

    /// Allow up to `concurrency` parts in flight; output order is unaffected
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Route a single part and produce its output text
    pub async fn process_part(&self, index: usize, part: Part) -> Result<ProcessedPart, TranslationError> {
        let part = part.trimmed();
        let text = part.as_str();

        let (prefix, body, classification) = match classify(text) {
            Classification::Header => match try_split_header(text) {
                Some((prefix, body)) => (prefix, body, classify_content(body)),
                None => {
                    warn!("Part {}: header markers found but not splittable, translating whole part", index);
                    ("", text, Classification::TextBearing)
                }
            },
            other => ("", text, other),
        };

        if !classification.is_translatable() {
            info!("Part {}: skipped ({}): {:?}", index, classification, text);
            return Ok(ProcessedPart {
                index,
                output: text.to_string(),
                disposition: Disposition::PassThrough(classification),
                original: part,
            });
        }

        let outcome = self.gate.gate(body).await?;
        let disposition = if outcome.accepted {
            info!("Part {}: translated ({})", index, outcome.report);
            Disposition::Translated(outcome.report.clone())
        } else {
            let reason = outcome
                .report
                .rejection
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            warn!("Part {}: translation rejected, keeping original ({}; {})", index, outcome.report, reason);
            Disposition::Rejected(outcome.report.clone())
        };

        let output = format!("{}{}", prefix, outcome.final_text());
        info!("Part {}: {:?} > {:?}", index, text, output);

        Ok(ProcessedPart {
            index,
            original: part,
            output,
            disposition,
        })
    }

    /// Translate every part from `reader` and write the results to `writer`.
    ///
    /// Stops at the first read, provider or write failure; parts written
    /// before the failure stay written.
    ///
    /// Parts are read synchronously on the calling task. With a concurrency
    /// above one, a read that blocks (an interactive stdin) also holds back
    /// the requests already in flight until it returns.
    pub async fn run<R, W>(&self, reader: PartReader<R>, writer: &mut W) -> Result<PipelineStats, AppError>
    where
        R: BufRead,
        W: Write,
    {
        let started = Instant::now();
        let mut stats = PipelineStats::new();

        let mut results = pin!(
            stream::iter(reader.enumerate())
                .map(|(index, item)| async move {
                    match item {
                        Ok(part) => self.process_part(index, part).await.map_err(AppError::from),
                        Err(e) => Err(AppError::Read(e.to_string())),
                    }
                })
                .buffered(self.concurrency)
        );

        while let Some(result) = results.next().await {
            let processed = result?;
            stats.record(&processed.disposition);
            write!(writer, "{}{}", processed.output, PART_SEPARATOR)
                .and_then(|_| writer.flush())
                .map_err(|e| AppError::Write(e.to_string()))?;
        }

        stats.elapsed = started.elapsed();
        if stats.parts == 0 {
            info!("Input contained no parts, nothing written");
        }
        info!("{}", stats.summary());
        Ok(stats)
    }

    /// Translate an in-memory markdown text
    pub async fn translate_text(&self, markdown: &str) -> Result<String, AppError> {
        let mut output = Vec::new();
        self.run(PartReader::new(markdown.as_bytes()), &mut output).await?;
        String::from_utf8(output).map_err(|e| AppError::Unknown(e.to_string()))
    }
}
