#![allow(dead_code)]
//! Shared integration test utilities.
//!
//! Import with:
//! ```ignore
//! mod common;
//! use common::*;
//! ```

use donorq::{Priority, Scheduler, SelectionPolicy, ThreadId};
use std::sync::Once;
use tracing_subscriber::fmt::format::FmtSpan;

static INIT_LOGGING: Once = Once::new();

/// Fixed seed for tests that exercise the lottery draw.
pub const TEST_SEED: u64 = 0xD0_0D_F0_0D;

/// Initializes tracing output once per test binary. Respects `RUST_LOG`;
/// silent by default.
pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
            )
            .with_span_events(FmtSpan::NONE)
            .with_test_writer()
            .try_init();
    });
}

/// Creates `n` threads at the policy default priority.
pub fn spawn_threads<P: SelectionPolicy>(sched: &mut Scheduler<P>, n: usize) -> Vec<ThreadId> {
    (0..n).map(|_| sched.create_thread()).collect()
}

/// Creates one thread per entry of `bases`, at that base priority.
pub fn spawn_with_bases<P: SelectionPolicy>(
    sched: &mut Scheduler<P>,
    bases: &[Priority],
) -> Vec<ThreadId> {
    bases
        .iter()
        .map(|&b| sched.create_thread_with_priority(b).expect("valid base"))
        .collect()
}
