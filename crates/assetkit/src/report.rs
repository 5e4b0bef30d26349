//! Injected logging.

pub use tracing::Level;

/// Receives the human-readable log lines the materializer produces.
pub trait Reporter: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

impl<F> Reporter for F
where
    F: Fn(Level, &str) + Send + Sync,
{
    fn log(&self, level: Level, message: &str) {
        self(level, message)
    }
}

/// Forwards every line to `tracing` under the `assetkit` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn log(&self, level: Level, message: &str) {
        if level == Level::ERROR {
            tracing::error!(target: "assetkit", "{message}");
        } else if level == Level::WARN {
            tracing::warn!(target: "assetkit", "{message}");
        } else if level == Level::INFO {
            tracing::info!(target: "assetkit", "{message}");
        } else if level == Level::DEBUG {
            tracing::debug!(target: "assetkit", "{message}");
        } else {
            tracing::trace!(target: "assetkit", "{message}");
        }
    }
}
