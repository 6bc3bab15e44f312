//! Per-source circuit breaker for degraded directory backends.
//!
//! A source that fails `failure_threshold` times in a row is skipped until
//! its cooldown has passed. The first request after the cooldown probes it:
//! success closes the circuit, failure opens it again for another cooldown.
//!
//! ```text
//! Closed --(N failures)--> Open --(cooldown)--> HalfOpen
//!   ^                       ^                      |
//!   |                       +------(failure)-------+
//!   +-----------------(success)--------------------+
//! ```

use std::time::Duration;

use tokio::time::Instant;

use crate::config::SearchConfig;
use crate::types::SearchSource;

/// Circuit state for a single source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Source is healthy and queried normally.
    Closed,
    /// Source failed too often and is skipped until the cooldown expires.
    Open,
    /// Cooldown elapsed; the next request probes the source.
    HalfOpen,
}

/// Thresholds for tripping and probing.
#[derive(Debug, Clone, Copy)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before the circuit opens.
    pub failure_threshold: u32,
    /// How long an open circuit skips its source.
    pub cooldown: Duration,
}

impl From<&SearchConfig> for CircuitBreakerConfig {
    fn from(config: &SearchConfig) -> Self {
        Self {
            failure_threshold: config.breaker_failure_threshold,
            cooldown: Duration::from_secs(config.breaker_cooldown_secs),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SourceCircuit {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
}

impl SourceCircuit {
    const CLOSED: Self = Self {
        state: CircuitState::Closed,
        consecutive_failures: 0,
        opened_at: None,
    };
}

/// Health of every search source, tracked independently.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    circuits: [SourceCircuit; 4],
}

impl CircuitBreaker {
    /// Create a breaker with all circuits closed.
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            circuits: [SourceCircuit::CLOSED; 4],
        }
    }

    fn circuit(&mut self, source: SearchSource) -> &mut SourceCircuit {
        &mut self.circuits[slot(source)]
    }

    /// Record a successful call: the circuit closes and the failure count resets.
    pub fn record_success(&mut self, source: SearchSource) {
        *self.circuit(source) = SourceCircuit::CLOSED;
    }

    /// Record a failed call.
    ///
    /// A failed probe re-opens the circuit immediately; otherwise it opens
    /// once the threshold is reached.
    pub fn record_failure(&mut self, source: SearchSource) {
        let threshold = self.config.failure_threshold;
        let circuit = self.circuit(source);
        circuit.consecutive_failures = circuit.consecutive_failures.saturating_add(1);

        let trips =
            circuit.state == CircuitState::HalfOpen || circuit.consecutive_failures >= threshold;
        if trips {
            if circuit.state != CircuitState::Open {
                tracing::warn!(
                    %source,
                    failures = circuit.consecutive_failures,
                    "source circuit opened"
                );
            }
            circuit.state = CircuitState::Open;
            circuit.opened_at = Some(Instant::now());
        }
    }

    /// Whether `source` should be queried now.
    ///
    /// An open circuit whose cooldown has passed turns half-open and lets
    /// the call through as a probe.
    pub fn should_attempt(&mut self, source: SearchSource) -> bool {
        let cooldown = self.config.cooldown;
        let circuit = self.circuit(source);
        if circuit.state != CircuitState::Open {
            return true;
        }
        let cooled = circuit.opened_at.is_none_or(|at| at.elapsed() >= cooldown);
        if cooled {
            tracing::debug!(%source, "probing source after cooldown");
            circuit.state = CircuitState::HalfOpen;
        }
        cooled
    }

    /// `(source, state, consecutive_failures)` for every source, in declaration order.
    pub fn health_report(&self) -> Vec<(SearchSource, CircuitState, u32)> {
        SearchSource::all()
            .iter()
            .map(|&source| {
                let circuit = &self.circuits[slot(source)];
                (source, circuit.state, circuit.consecutive_failures)
            })
            .collect()
    }
}

fn slot(source: SearchSource) -> usize {
    match source {
        SearchSource::Identity => 0,
        SearchSource::LocalDirectory => 1,
        SearchSource::ExternalDirectory => 2,
        SearchSource::Interests => 3,
    }
}
