//! Notification sink for user-facing conditions.
//!
//! The engine reports what happened; the presentation layer (toast, inline
//! message) decides how to format and surface it.

use crate::error::Shortage;

/// Sink the engine reports recoverable, user-visible conditions through.
pub trait AlertSink: Send + Sync {
    /// A commit or quantity change was rejected for lack of stock.
    fn insufficient_stock(&self, shortages: &[Shortage]);

    /// A checkout step was rejected for missing required fields.
    fn validation_failed(&self, missing: &[&'static str]);
}

/// Default sink: structured log records via `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AlertSink for TracingSink {
    fn insufficient_stock(&self, shortages: &[Shortage]) {
        for shortage in shortages {
            tracing::warn!(
                product_id = %shortage.product_id,
                requested = shortage.requested,
                available = shortage.available,
                "insufficient stock"
            );
        }
    }

    fn validation_failed(&self, missing: &[&'static str]) {
        tracing::warn!(fields = ?missing, "checkout validation failed");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use stockroom_core::ProductId;

    use super::*;

    /// Test sink that records everything it is told.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub shortages: Mutex<Vec<Shortage>>,
        pub validation_failures: Mutex<Vec<Vec<&'static str>>>,
    }

    impl AlertSink for RecordingSink {
        fn insufficient_stock(&self, shortages: &[Shortage]) {
            if let Ok(mut seen) = self.shortages.lock() {
                seen.extend_from_slice(shortages);
            }
        }

        fn validation_failed(&self, missing: &[&'static str]) {
            if let Ok(mut seen) = self.validation_failures.lock() {
                seen.push(missing.to_vec());
            }
        }
    }

    #[test]
    fn test_recording_sink_captures_reports() {
        let sink = RecordingSink::default();
        sink.insufficient_stock(&[Shortage {
            product_id: ProductId::new(1),
            requested: 5,
            available: 3,
        }]);
        sink.validation_failed(&["email"]);

        assert_eq!(sink.shortages.lock().map(|s| s.len()).unwrap_or(0), 1);
        assert_eq!(
            sink.validation_failures.lock().map(|v| v.len()).unwrap_or(0),
            1
        );
    }
}
