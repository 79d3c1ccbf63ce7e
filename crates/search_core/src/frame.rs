/// One decoded line of the response stream, as seen by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Output(String),
    Log(LogContent),
    TokenUsage(TokenUsage),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogContent {
    /// Bare progress text.
    Text(String),
    /// A sub-query the server ran, with a human-readable explanation.
    Step { query: String, explanation: String },
}

/// Running token counters. Each report is a snapshot that replaces the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub prompt: u64,
    pub completion: u64,
}

/// How a request's stream ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Completed,
    Failed(String),
    Cancelled,
}
