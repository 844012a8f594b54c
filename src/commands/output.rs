//! Output sink for user-facing text.
//!
//! Help listings, version info and error tips all go through an [`Output`],
//! so the console can be swapped for an in-memory buffer in tests or when the
//! application is embedded.

use std::io::Write;
use std::sync::{Arc, Mutex};

/// Destination for rendered text.
#[derive(Debug, Clone, Default)]
pub enum Output {
    /// Regular text to stdout, errors to stderr.
    #[default]
    Console,

    /// Everything appended to a shared buffer.
    Buffer(Arc<Mutex<String>>),
}

impl Output {
    /// Creates a capturing output.
    pub fn buffer() -> Self {
        Self::Buffer(Arc::new(Mutex::new(String::new())))
    }

    /// Writes regular text.
    pub fn print(&self, text: &str) {
        match self {
            Self::Console => {
                let mut out = std::io::stdout().lock();
                let _ = out.write_all(text.as_bytes());
                let _ = out.flush();
            }
            Self::Buffer(buf) => Self::append(buf, text),
        }
    }

    /// Writes error text.
    pub fn eprint(&self, text: &str) {
        match self {
            Self::Console => {
                let mut err = std::io::stderr().lock();
                let _ = err.write_all(text.as_bytes());
            }
            Self::Buffer(buf) => Self::append(buf, text),
        }
    }

    /// Returns captured text; always empty for the console.
    pub fn contents(&self) -> String {
        match self {
            Self::Console => String::new(),
            Self::Buffer(buf) => buf.lock().unwrap_or_else(|e| e.into_inner()).clone(),
        }
    }

    /// Clears captured text.
    pub fn clear(&self) {
        if let Self::Buffer(buf) = self {
            buf.lock().unwrap_or_else(|e| e.into_inner()).clear();
        }
    }

    fn append(buf: &Mutex<String>, text: &str) {
        buf.lock().unwrap_or_else(|e| e.into_inner()).push_str(text);
    }
}
