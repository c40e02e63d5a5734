//! Logging facilities for Horizon L10n.
//!
//! Horizon L10n uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_l10n=debug")
//!     .init();
//! ```

use std::time::Instant;

/// Span names used throughout Horizon L10n for tracing.
pub mod span_names {
    /// Language switch (validate, load, commit).
    pub const SET_LANGUAGE: &str = "horizon_l10n::set_language";
    /// Translation load for one language.
    pub const LOAD: &str = "horizon_l10n::load";
    /// Service initialization.
    pub const INIT: &str = "horizon_l10n::init";
    /// Signal emission.
    pub const SIGNAL: &str = "horizon_l10n::signal";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core primitives target.
    pub const CORE: &str = "horizon_l10n_core";
    /// Signal system target.
    pub const SIGNAL: &str = "horizon_l10n_core::signal";
    /// Locale coordinator target.
    pub const SERVICE: &str = "horizon_l10n::service";
    /// Translation loader target.
    pub const LOADER: &str = "horizon_l10n::loader";
    /// Key resolution and interpolation target.
    pub const RESOLVER: &str = "horizon_l10n::resolver";
    /// Formatting adapter target.
    pub const INTL: &str = "horizon_l10n::intl";
    /// Locale storage target.
    pub const STORAGE: &str = "horizon_l10n::storage";
    /// Performance measurements target.
    pub const PERF: &str = "horizon_l10n::perf";
}

/// Elapsed-time guard for profiling.
///
/// Logs the operation name and its duration at `debug` when dropped. Unlike an
/// entered `tracing` span it is `Send`, so it can live across `.await` points.
///
/// ```
/// use horizon_l10n_core::PerfSpan;
///
/// let _perf = PerfSpan::new("load_translations");
/// // ... work ...
/// ```
pub struct PerfSpan {
    operation: &'static str,
    started: Instant,
}

impl PerfSpan {
    /// Start timing an operation.
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            started: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the span started.
    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }
}

impl Drop for PerfSpan {
    fn drop(&mut self) {
        tracing::debug!(
            target: targets::PERF,
            operation = self.operation,
            elapsed_ms = self.elapsed_ms() as u64,
            "operation finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span_measures() {
        let span = PerfSpan::new("test_operation");
        assert!(span.elapsed_ms() < 60_000);
    }

    #[test]
    fn test_targets_share_prefix() {
        for target in [
            targets::SERVICE,
            targets::LOADER,
            targets::RESOLVER,
            targets::INTL,
            targets::STORAGE,
        ] {
            assert!(target.starts_with("horizon_l10n::"));
        }
        assert!(targets::SIGNAL.starts_with(targets::CORE));
    }
}
