//! Observable ingest counters (§4.8, §8.4 of the distilled spec).

use std::fmt;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct IngestStats {
    pub lines_processed: u64,
    pub inserted_or_updated: u64,
    pub errors: u64,
    pub skipped: u64,
    start: Instant,
    total_lines_hint: Option<u64>,
}

impl IngestStats {
    pub fn new(start: Instant) -> Self {
        Self {
            lines_processed: 0,
            inserted_or_updated: 0,
            errors: 0,
            skipped: 0,
            start,
            total_lines_hint: None,
        }
    }

    pub fn with_total_lines_hint(mut self, total: u64) -> Self {
        self.total_lines_hint = Some(total);
        self
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Lines per second so far, `0.0` before any line has been processed.
    pub fn rate(&self) -> f64 {
        let elapsed = self.elapsed_secs();
        if elapsed <= 0.0 {
            0.0
        } else {
            self.lines_processed as f64 / elapsed
        }
    }

    /// Linear-extrapolation ETA in seconds, `None` without a total-lines
    /// hint or before any progress has been made.
    pub fn eta_secs(&self) -> Option<f64> {
        let total = self.total_lines_hint?;
        let rate = self.rate();
        if rate <= 0.0 || self.lines_processed >= total {
            return None;
        }
        Some((total - self.lines_processed) as f64 / rate)
    }
}

impl fmt::Display for IngestStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines processed, {} upserted, {} errors, {} skipped, {:.1} lines/s, elapsed {:.1}s",
            self.lines_processed,
            self.inserted_or_updated,
            self.errors,
            self.skipped,
            self.rate(),
            self.elapsed_secs(),
        )?;
        if let Some(eta) = self.eta_secs() {
            write!(f, ", ETA {:.0}s", eta)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn rate_is_zero_before_any_elapsed_time() {
        let stats = IngestStats::new(Instant::now());
        assert_eq!(stats.rate(), 0.0);
    }

    #[test]
    fn eta_is_none_without_a_total_hint() {
        let mut stats = IngestStats::new(Instant::now() - Duration::from_secs(1));
        stats.lines_processed = 100;
        assert!(stats.eta_secs().is_none());
    }

    #[test]
    fn eta_is_none_once_total_is_reached() {
        let mut stats =
            IngestStats::new(Instant::now() - Duration::from_secs(1)).with_total_lines_hint(100);
        stats.lines_processed = 100;
        assert!(stats.eta_secs().is_none());
    }
}
