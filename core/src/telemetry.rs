//! Process-wide execution counters
//!
//! Two monotonic counters track transaction execution for the lifetime of
//! the process: `tx_execute` counts successful value settlements,
//! `tx_execute_err` counts transaction-level failures. The node wires them
//! into its Prometheus registry once at startup via [`register`].

use prometheus_client::metrics::counter::Counter;
use prometheus_client::registry::Registry;
use std::sync::LazyLock;

/// Transactions whose value settlement succeeded
pub static TX_EXECUTE: LazyLock<Counter> = LazyLock::new(Counter::default);

/// Transactions that failed at or after the payload-decode step
pub static TX_EXECUTE_ERR: LazyLock<Counter> = LazyLock::new(Counter::default);

/// Register the transaction-core counters with a metrics registry
pub fn register(registry: &mut Registry) {
    registry.register(
        "tx_execute",
        "Transactions executed and settled successfully",
        TX_EXECUTE.clone(),
    );
    registry.register(
        "tx_execute_err",
        "Transaction-level execution failures",
        TX_EXECUTE_ERR.clone(),
    );
}
