//! Operation metrics for the byte-level API
//!
//! Every call through [`crate::api`] is timed and recorded here. Counters are
//! kept in-process behind a lock; events are also emitted through `tracing`.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Crypto operation events
#[derive(Debug, Clone, PartialEq)]
pub enum CryptoEvent {
    /// Key pair generated
    KeyGenerated {
        /// Algorithm name
        algorithm: &'static str,
        /// Time taken
        duration: Duration,
    },
    /// Shared secret encapsulated
    Encapsulated {
        /// Algorithm name
        algorithm: &'static str,
        /// Time taken
        duration: Duration,
    },
    /// Ciphertext decapsulated
    Decapsulated {
        /// Algorithm name
        algorithm: &'static str,
        /// Time taken
        duration: Duration,
    },
    /// Message signed
    Signed {
        /// Algorithm name
        algorithm: &'static str,
        /// Message length in bytes
        message_len: usize,
        /// Time taken
        duration: Duration,
    },
    /// Signature checked
    Verified {
        /// Algorithm name
        algorithm: &'static str,
        /// Whether the signature was valid
        valid: bool,
        /// Time taken
        duration: Duration,
    },
    /// Operation returned an error
    Failed {
        /// Operation name
        operation: &'static str,
        /// Error message
        error: String,
    },
}

/// Counters over all recorded operations
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CryptoMetrics {
    /// Total operations recorded
    pub total_operations: u64,
    /// Errors plus signatures that failed to verify
    pub failed_operations: u64,
    /// Mean duration of timed operations
    pub avg_duration_ms: f64,
    /// Key pairs generated
    pub key_generations: u64,
    /// Encapsulations
    pub encapsulations: u64,
    /// Decapsulations
    pub decapsulations: u64,
    /// Signatures created
    pub signatures: u64,
    /// Verifications performed
    pub verifications: u64,
    timed_operations: u64,
}

/// Shared metrics sink
#[derive(Debug, Clone)]
pub struct CryptoObservability {
    component: &'static str,
    metrics: Arc<RwLock<CryptoMetrics>>,
}

impl CryptoObservability {
    /// Create a new, empty sink
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            metrics: Arc::new(RwLock::new(CryptoMetrics::default())),
        }
    }

    /// Record a crypto operation
    pub fn record_operation(&self, event: CryptoEvent) {
        {
            let mut metrics = self.metrics.write();
            metrics.total_operations += 1;

            let duration = match &event {
                CryptoEvent::KeyGenerated { duration, .. } => {
                    metrics.key_generations += 1;
                    Some(*duration)
                }
                CryptoEvent::Encapsulated { duration, .. } => {
                    metrics.encapsulations += 1;
                    Some(*duration)
                }
                CryptoEvent::Decapsulated { duration, .. } => {
                    metrics.decapsulations += 1;
                    Some(*duration)
                }
                CryptoEvent::Signed { duration, .. } => {
                    metrics.signatures += 1;
                    Some(*duration)
                }
                CryptoEvent::Verified {
                    duration, valid, ..
                } => {
                    metrics.verifications += 1;
                    if !valid {
                        metrics.failed_operations += 1;
                    }
                    Some(*duration)
                }
                CryptoEvent::Failed { .. } => {
                    metrics.failed_operations += 1;
                    None
                }
            };
            if let Some(duration) = duration {
                Self::update_avg_duration(&mut metrics, duration);
            }
        }

        match &event {
            CryptoEvent::Failed { operation, error } => {
                tracing::warn!(component = self.component, operation, %error, "crypto operation failed");
            }
            _ => {
                tracing::trace!(component = self.component, ?event, "crypto event");
            }
        }
    }

    /// Start timing an operation
    pub fn start_operation(&self, operation: &'static str) -> OperationTimer<'_> {
        OperationTimer {
            operation,
            start: Instant::now(),
            observability: self,
        }
    }

    /// Snapshot of the current metrics
    pub fn get_metrics(&self) -> CryptoMetrics {
        self.metrics.read().clone()
    }

    /// Clear all counters
    pub fn reset(&self) {
        *self.metrics.write() = CryptoMetrics::default();
    }

    fn update_avg_duration(metrics: &mut CryptoMetrics, duration: Duration) {
        let new_duration_ms = duration.as_secs_f64() * 1000.0;
        metrics.timed_operations += 1;
        let n = metrics.timed_operations as f64;
        metrics.avg_duration_ms += (new_duration_ms - metrics.avg_duration_ms) / n;
    }
}

/// Timer for measuring operation duration
#[derive(Debug)]
pub struct OperationTimer<'a> {
    operation: &'static str,
    start: Instant,
    observability: &'a CryptoObservability,
}

impl OperationTimer<'_> {
    /// Complete the operation successfully
    pub fn complete(self, event_type: impl FnOnce(Duration) -> CryptoEvent) {
        let duration = self.start.elapsed();
        self.observability.record_operation(event_type(duration));
    }

    /// Mark the operation as failed
    pub fn failed(self, error: impl ToString) {
        self.observability.record_operation(CryptoEvent::Failed {
            operation: self.operation,
            error: error.to_string(),
        });
    }
}

static GLOBAL: Lazy<CryptoObservability> = Lazy::new(|| CryptoObservability::new("global"));

/// Process-wide sink used by [`crate::api`]
pub fn global() -> &'static CryptoObservability {
    &GLOBAL
}
