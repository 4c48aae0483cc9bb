//! Prometheus metrics for the console.
//!
//! All metrics are aggregated in the [`Metrics`] struct.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use session::OperationKind;
use std::time::Duration;

/// Aggregated metrics for the console.
///
/// Metric descriptions are registered with the global registry on creation.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    fn register_descriptions() {
        describe_counter!(
            "console_operations_success_total",
            "Total successful operations by operation name"
        );
        describe_counter!(
            "console_operations_failure_total",
            "Total failed operations by operation name"
        );
        describe_counter!(
            "console_operations_refused_total",
            "Operations turned away before running, by operation name and reason"
        );
        describe_histogram!(
            "console_operation_duration_seconds",
            "Duration of each operation in seconds, including confirmation"
        );
        describe_counter!(
            "console_account_changes_total",
            "Sessions closed because the wallet switched accounts"
        );
        describe_gauge!(
            "console_balance_tokens",
            "Last displayed balance of the connected account, in tokens"
        );
    }

    /// Record a finished operation.
    pub fn record_operation(&self, kind: OperationKind, success: bool, duration: Duration) {
        let op = kind.as_str();
        histogram!("console_operation_duration_seconds", "op" => op).record(duration.as_secs_f64());

        if success {
            counter!("console_operations_success_total", "op" => op).increment(1);
        } else {
            counter!("console_operations_failure_total", "op" => op).increment(1);
        }
    }

    /// Record an operation refused by the console or by the busy guard.
    pub fn record_refused(&self, kind: OperationKind, reason: &'static str) {
        counter!("console_operations_refused_total", "op" => kind.as_str(), "reason" => reason)
            .increment(1);
    }

    pub fn record_account_change(&self) {
        counter!("console_account_changes_total").increment(1);
    }

    /// Set the displayed balance. Unparseable amounts are skipped.
    pub fn set_balance(&self, amount: &str) {
        if let Ok(tokens) = amount.parse::<f64>() {
            gauge!("console_balance_tokens").set(tokens);
        }
    }
}

/// Install the Prometheus metrics exporter and start the HTTP server.
///
/// Returns an error if the server fails to bind to the specified port.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus exporter: {}", e))?;

    Ok(())
}
