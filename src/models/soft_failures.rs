//! Non-aborting anomalies collected during a pipeline run.

/// Ordered diagnostic messages, emitted once the pipeline result is assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoftFailureLog {
    messages: Vec<String>,
}

impl SoftFailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Emit every message as an info log line, in recording order.
    pub fn flush(&mut self) {
        for message in self.messages.drain(..) {
            log::info!("{}", message);
        }
    }
}
