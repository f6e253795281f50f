//! One-at-a-time access to an inference backend

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::trace;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_claims::{InferenceParams, InferenceService};

/// Holds an async lock for the duration of each completion
///
/// Local model servers run a single decode slot; the lock queues concurrent
/// requests here instead of at the server. Health checks bypass the lock.
#[derive(Debug)]
pub struct SerializedInference<T> {
    inner: T,
    lock: Mutex<()>,
}

impl<T: InferenceService> SerializedInference<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            lock: Mutex::new(()),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: InferenceService> DomainPort for SerializedInference<T> {}

#[async_trait]
impl<T: InferenceService> HealthCheckable for SerializedInference<T> {
    async fn health_check(&self) -> HealthCheckResult {
        self.inner.health_check().await
    }
}

#[async_trait]
impl<T: InferenceService> InferenceService for SerializedInference<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn complete(&self, prompt: &str, params: &InferenceParams) -> Result<String, PortError> {
        let _guard = self.lock.lock().await;
        trace!(backend = self.inner.name(), "Inference lock acquired");
        self.inner.complete(prompt, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::AdapterHealth;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Default)]
    struct SlowBackend {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl DomainPort for SlowBackend {}

    #[async_trait]
    impl HealthCheckable for SlowBackend {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::new("slow", AdapterHealth::Healthy, 0)
        }
    }

    #[async_trait]
    impl InferenceService for SlowBackend {
        fn name(&self) -> &str {
            "slow"
        }

        async fn complete(&self, _prompt: &str, _params: &InferenceParams) -> Result<String, PortError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok("NO".to_string())
        }
    }

    #[tokio::test]
    async fn test_calls_never_overlap() {
        let serialized = Arc::new(SerializedInference::new(SlowBackend::default()));
        let params = InferenceParams::deterministic(16, 4096);

        let calls = (0..4).map(|_| {
            let serialized = serialized.clone();
            let params = params.clone();
            tokio::spawn(async move { serialized.complete("prompt", &params).await })
        });
        for handle in calls.collect::<Vec<_>>() {
            assert_eq!(handle.await.unwrap().unwrap(), "NO");
        }

        assert_eq!(serialized.inner().peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delegates_name_and_health() {
        let serialized = SerializedInference::new(SlowBackend::default());
        assert_eq!(serialized.name(), "slow");
        assert!(serialized.health_check().await.is_operational());
    }
}
