//! Script Errors
//!
//! The value form of a failure raised inside a script callback. The engine
//! behind the callbacks is opaque to this crate, so a failure is carried as
//! plain data: a message plus the source position the engine reported.

/// A failure raised by a script callback or timer handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ScriptError {
    /// Human-readable description, e.g. `Uncaught TypeError: x is not a function`.
    pub message: String,
    /// Resource name the failure originated from. Empty when unknown.
    pub filename: String,
    /// 1-based line number, when the engine could resolve one.
    pub lineno: Option<u32>,
}

impl ScriptError {
    /// Create an error with no source position.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            filename: String::new(),
            lineno: None,
        }
    }

    /// Attach the originating resource and line.
    pub fn at(mut self, filename: impl Into<String>, lineno: u32) -> Self {
        self.filename = filename.into();
        self.lineno = Some(lineno);
        self
    }
}
