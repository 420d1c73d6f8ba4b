/*!
 * Per-run counters for the document pipeline.
 */

use std::time::Duration;

use super::orchestrator::Disposition;

/// Counters collected over one pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    /// Parts emitted
    pub parts: usize,

    /// Parts whose translation was accepted
    pub translated: usize,

    /// Parts whose translation was rejected by the ratio gate
    pub rejected: usize,

    /// Parts emitted unchanged because of their classification
    pub passed_through: usize,

    /// Wall time of the run
    pub elapsed: Duration,
}

impl PipelineStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one emitted part
    pub fn record(&mut self, disposition: &Disposition) {
        self.parts += 1;
        match disposition {
            Disposition::Translated(_) => self.translated += 1,
            Disposition::Rejected(_) => self.rejected += 1,
            Disposition::PassThrough(_) => self.passed_through += 1,
        }
    }

    /// Share of provider answers that were rejected, in percent
    pub fn rejection_rate(&self) -> f32 {
        let sent = self.translated + self.rejected;
        if sent == 0 {
            return 0.0;
        }
        (self.rejected as f32 / sent as f32) * 100.0
    }

    /// Get a summary of the run.
    pub fn summary(&self) -> String {
        format!(
            "Completed in {:.2}s: {} parts, {} translated, {} rejected ({:.1}%), {} passed through",
            self.elapsed.as_secs_f32(),
            self.parts,
            self.translated,
            self.rejected,
            self.rejection_rate(),
            self.passed_through
        )
    }
}
