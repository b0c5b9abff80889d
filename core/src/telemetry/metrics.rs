use std::sync::Mutex;

/// Counters for a tracking session.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub processed: u64,
    pub published: u64,
    pub publish_errors: u64,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_processed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.processed += 1;
        }
    }

    pub fn record_published(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.published += 1;
        }
    }

    pub fn record_publish_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.publish_errors += 1;
        }
    }

    pub fn snapshot(&self) -> Metrics {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            Metrics::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let metrics = MetricsRecorder::new();
        metrics.record_processed();
        metrics.record_processed();
        metrics.record_published();
        metrics.record_publish_error();
        assert_eq!(
            metrics.snapshot(),
            Metrics {
                processed: 2,
                published: 1,
                publish_errors: 1
            }
        );
    }
}
