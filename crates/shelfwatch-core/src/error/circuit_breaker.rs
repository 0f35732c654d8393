//! Circuit breaker pattern, reused as the health-state machine backing the
//! reconnect controller: a connector whose breaker trips is exactly a
//! connector that needs reconnect backoff.

use super::types::EngineError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CircuitState {
    /// Normal operation.
    Closed,
    /// Calls are blocked.
    Open,
    /// Testing whether the connector has recovered.
    HalfOpen,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub success_threshold: u32,
    pub timeout: Duration,
    pub window: Duration,
    #[serde(skip)]
    pub on_state_change: Option<Arc<dyn Fn(CircuitState) + Send + Sync>>,
}

impl std::fmt::Debug for CircuitBreakerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitBreakerConfig")
            .field("failure_threshold", &self.failure_threshold)
            .field("success_threshold", &self.success_threshold)
            .field("timeout", &self.timeout)
            .field("window", &self.window)
            .field("on_state_change", &self.on_state_change.is_some())
            .finish()
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 2,
            timeout: Duration::from_secs(60),
            window: Duration::from_secs(60),
            on_state_change: None,
        }
    }
}

/// Tracks a single connector's health across Closed/Open/HalfOpen states.
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    state: Arc<RwLock<CircuitState>>,
    failure_count: Arc<AtomicU32>,
    success_count: Arc<AtomicU32>,
    last_failure_time: Arc<Mutex<Option<Instant>>>,
    state_changed_at: Arc<Mutex<Instant>>,
    total_calls: Arc<AtomicU64>,
    total_failures: Arc<AtomicU64>,
    total_successes: Arc<AtomicU64>,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(CircuitState::Closed)),
            failure_count: Arc::new(AtomicU32::new(0)),
            success_count: Arc::new(AtomicU32::new(0)),
            last_failure_time: Arc::new(Mutex::new(None)),
            state_changed_at: Arc::new(Mutex::new(Instant::now())),
            total_calls: Arc::new(AtomicU64::new(0)),
            total_failures: Arc::new(AtomicU64::new(0)),
            total_successes: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }

    /// Current state, auto-transitioning Open -> HalfOpen once the timeout
    /// has elapsed.
    pub async fn state(&self) -> CircuitState {
        let state = *self.state.read().await;

        if state == CircuitState::Open {
            let state_changed_at = *self.state_changed_at.lock().unwrap();
            if state_changed_at.elapsed() >= self.config.timeout {
                self.transition_to(CircuitState::HalfOpen).await;
                return CircuitState::HalfOpen;
            }
        }

        state
    }

    pub async fn call<F, Fut, T>(&self, f: F) -> Result<T, EngineError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, EngineError>>,
    {
        self.total_calls.fetch_add(1, Ordering::Relaxed);

        match self.state().await {
            CircuitState::Open => Err(EngineError::Server {
                connector: "circuit_breaker".to_string(),
                status_code: 503,
            }),
            CircuitState::Closed | CircuitState::HalfOpen => match f().await {
                Ok(result) => {
                    self.on_success().await;
                    Ok(result)
                }
                Err(error) => {
                    self.on_failure().await;
                    Err(error)
                }
            },
        }
    }

    async fn on_success(&self) {
        self.total_successes.fetch_add(1, Ordering::Relaxed);

        let current_state = *self.state.read().await;

        match current_state {
            CircuitState::HalfOpen => {
                let count = self.success_count.fetch_add(1, Ordering::SeqCst) + 1;
                if count >= self.config.success_threshold {
                    self.transition_to(CircuitState::Closed).await;
                }
            }
            CircuitState::Closed => {
                self.failure_count.store(0, Ordering::SeqCst);
            }
            _ => {}
        }
    }

    async fn on_failure(&self) {
        self.total_failures.fetch_add(1, Ordering::Relaxed);

        let current_state = *self.state.read().await;

        match current_state {
            CircuitState::HalfOpen => {
                self.transition_to(CircuitState::Open).await;
            }
            CircuitState::Closed => {
                let now = Instant::now();
                let should_increment = {
                    let mut last_failure = self.last_failure_time.lock().unwrap();
                    if let Some(last_time) = *last_failure {
                        if now.duration_since(last_time) > self.config.window {
                            self.failure_count.store(1, Ordering::SeqCst);
                            *last_failure = Some(now);
                            false
                        } else {
                            true
                        }
                    } else {
                        *last_failure = Some(now);
                        true
                    }
                };

                if should_increment {
                    let count = self.failure_count.fetch_add(1, Ordering::SeqCst) + 1;
                    if count >= self.config.failure_threshold {
                        self.transition_to(CircuitState::Open).await;
                    }
                }
            }
            _ => {}
        }
    }

    async fn transition_to(&self, new_state: CircuitState) {
        let mut state = self.state.write().await;
        let old_state = *state;

        if old_state != new_state {
            *state = new_state;
            *self.state_changed_at.lock().unwrap() = Instant::now();

            match new_state {
                CircuitState::Closed => {
                    self.failure_count.store(0, Ordering::SeqCst);
                    self.success_count.store(0, Ordering::SeqCst);
                }
                CircuitState::HalfOpen => {
                    self.success_count.store(0, Ordering::SeqCst);
                }
                CircuitState::Open => {
                    self.failure_count.store(0, Ordering::SeqCst);
                }
            }

            if let Some(ref callback) = self.config.on_state_change {
                callback(new_state);
            }

            tracing::info!(old_state = ?old_state, new_state = ?new_state, "circuit breaker state changed");
        }
    }

    pub fn metrics(&self) -> CircuitBreakerMetrics {
        CircuitBreakerMetrics {
            total_calls: self.total_calls.load(Ordering::Relaxed),
            total_failures: self.total_failures.load(Ordering::Relaxed),
            total_successes: self.total_successes.load(Ordering::Relaxed),
            failure_count: self.failure_count.load(Ordering::Relaxed),
            success_count: self.success_count.load(Ordering::Relaxed),
        }
    }

    pub async fn reset(&self) {
        self.transition_to(CircuitState::Closed).await;
        self.failure_count.store(0, Ordering::SeqCst);
        self.success_count.store(0, Ordering::SeqCst);
        *self.last_failure_time.lock().unwrap() = None;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitBreakerMetrics {
    pub total_calls: u64,
    pub total_failures: u64,
    pub total_successes: u64,
    pub failure_count: u32,
    pub success_count: u32,
}

/// Keyed collection of breakers, one per connector id.
pub struct CircuitBreakerRegistry {
    breakers: Arc<RwLock<std::collections::HashMap<String, Arc<CircuitBreaker>>>>,
    default_config: CircuitBreakerConfig,
}

impl CircuitBreakerRegistry {
    pub fn new(default_config: CircuitBreakerConfig) -> Self {
        Self {
            breakers: Arc::new(RwLock::new(std::collections::HashMap::new())),
            default_config,
        }
    }

    pub async fn get(&self, connector_id: &str) -> Arc<CircuitBreaker> {
        let breakers = self.breakers.read().await;
        if let Some(breaker) = breakers.get(connector_id) {
            return breaker.clone();
        }
        drop(breakers);

        let mut breakers = self.breakers.write().await;
        breakers
            .entry(connector_id.to_string())
            .or_insert_with(|| Arc::new(CircuitBreaker::new(self.default_config.clone())))
            .clone()
    }

    pub async fn all(&self) -> Vec<(String, Arc<CircuitBreaker>)> {
        self.breakers.read().await.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err() -> EngineError {
        EngineError::Network { connector: "sonarr".into(), cause: "reset".into() }
    }

    #[tokio::test]
    async fn state_transitions_closed_open_halfopen_closed() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 2,
            success_threshold: 1,
            timeout: Duration::from_millis(100),
            window: Duration::from_secs(60),
            on_state_change: None,
        });

        assert_eq!(cb.state().await, CircuitState::Closed);

        let _ = cb.call(|| async { Err::<(), _>(err()) }).await;
        assert_eq!(cb.state().await, CircuitState::Closed);

        let _ = cb.call(|| async { Err::<(), _>(err()) }).await;
        assert_eq!(cb.state().await, CircuitState::Open);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(cb.state().await, CircuitState::HalfOpen);

        let _ = cb.call(|| async { Ok::<_, EngineError>(()) }).await;
        assert_eq!(cb.state().await, CircuitState::Closed);
    }

    #[tokio::test]
    async fn open_circuit_blocks_calls() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig { failure_threshold: 1, ..Default::default() });

        let _ = cb.call(|| async { Err::<(), _>(err()) }).await;

        let result = cb.call(|| async { Ok::<_, EngineError>(42) }).await;
        assert!(matches!(result, Err(EngineError::Server { status_code: 503, .. })));
    }

    #[tokio::test]
    async fn metrics_count_calls() {
        let cb = CircuitBreaker::default();

        for _ in 0..3 {
            let _ = cb.call(|| async { Ok::<_, EngineError>(()) }).await;
        }
        for _ in 0..2 {
            let _ = cb.call(|| async { Err::<(), _>(err()) }).await;
        }

        let metrics = cb.metrics();
        assert_eq!(metrics.total_calls, 5);
        assert_eq!(metrics.total_successes, 3);
        assert_eq!(metrics.total_failures, 2);
    }
}
