use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::warn;

/// A collected diagnostic. Diagnostics are textual, carry the name of the
/// construct they concern, and never abort parsing or emission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

/// Shared diagnostic sink. Cloning yields another handle to the same sink,
/// so parse context and emission tasks can report into one collection.
#[derive(Clone, Default)]
pub struct Diagnostics {
    entries: Arc<Mutex<Vec<Diagnostic>>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, subject: impl Into<String>, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            subject: subject.into(),
            message: message.into(),
        };
        warn!(subject = %diagnostic.subject, "{}", diagnostic.message);
        self.entries.lock().unwrap().push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Snapshot of everything reported so far.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.lock().unwrap().clone()
    }
}
