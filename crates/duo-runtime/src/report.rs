//! Failure Reporting
//!
//! The default destination for callback failures and promise rejections that
//! no `error`/`unhandledrejection` listener claimed.

use duo_events::ScriptError;

/// Where unhandled failures end up.
pub trait ReportSink {
    fn uncaught_error(&mut self, err: &ScriptError);
    fn unhandled_rejection(&mut self, reason: &str);
}

/// Default sink: structured log output.
#[derive(Debug, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn uncaught_error(&mut self, err: &ScriptError) {
        match err.lineno {
            Some(lineno) => {
                tracing::error!(filename = %err.filename, lineno, "{}", err.message)
            }
            None => tracing::error!("{}", err.message),
        }
    }

    fn unhandled_rejection(&mut self, reason: &str) {
        tracing::error!("Uncaught (in promise) {reason}");
    }
}
