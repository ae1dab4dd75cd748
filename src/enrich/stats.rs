/// Terminal state of one audio file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    /// Tags written and saved.
    TagsApplied,
    /// Already tagged and overwriting is disabled; the model was not asked.
    Skipped,
    /// The model gave nothing usable; only the title was written.
    Degraded(String),
    /// The provider failed, but the title was still written and saved.
    ProviderFallback(String),
    /// Copy, open, tag or save failed.
    Failed(String),
}

/// Counters for one run. Every asset is recorded exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub total_files: usize,
    pub processed_files: usize,
    pub success: usize,
    pub errors: usize,
    pub skipped: usize,
    pub degraded: usize,
}

impl RunStats {
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: &AssetOutcome) {
        self.processed_files += 1;
        match outcome {
            AssetOutcome::TagsApplied => self.success += 1,
            AssetOutcome::Skipped => self.skipped += 1,
            AssetOutcome::Degraded(_) => {
                self.errors += 1;
                self.degraded += 1;
            }
            AssetOutcome::ProviderFallback(_) => self.degraded += 1,
            AssetOutcome::Failed(_) => self.errors += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_outcomes() {
        let mut stats = RunStats::new(6);
        stats.record(&AssetOutcome::TagsApplied);
        stats.record(&AssetOutcome::TagsApplied);
        stats.record(&AssetOutcome::Skipped);
        stats.record(&AssetOutcome::Degraded("parse failure".to_string()));
        stats.record(&AssetOutcome::Failed("bad header".to_string()));
        stats.record(&AssetOutcome::ProviderFallback("status 503".to_string()));

        assert_eq!(
            stats,
            RunStats {
                total_files: 6,
                processed_files: 6,
                success: 2,
                errors: 2,
                skipped: 1,
                degraded: 2,
            }
        );
    }
}
