use crate::{RequestId, SearchTypeSelection, TokenUsage};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultsBody {
    #[default]
    Empty,
    /// Answer fragment as sent by the server.
    Html(String),
    /// Message shown in the error style, without the `Error: ` prefix.
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultsView {
    pub visible: bool,
    pub body: ResultsBody,
}

impl ResultsView {
    /// Text of the error box, if the panel currently shows one.
    pub fn error_message(&self) -> Option<String> {
        match &self.body {
            ResultsBody::Error(content) => Some(format!("Error: {content}")),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepsView {
    pub items: Vec<String>,
    pub panel_visible: bool,
    pub show_button_visible: bool,
    pub hide_button_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub query: String,
    pub search_type: SearchTypeSelection,
    pub active_request: Option<RequestId>,
    pub trigger_enabled: bool,
    pub validation_message: Option<String>,
    pub results: ResultsView,
    /// Loading-style explanation text; `None` means the panel is hidden.
    pub explanation: Option<String>,
    pub steps: StepsView,
    pub tokens: TokenUsage,
    pub token_text: String,
}

pub fn format_token_usage(tokens: &TokenUsage) -> String {
    format!(
        "Input Tokens: {} | Output Tokens: {}",
        tokens.prompt, tokens.completion
    )
}
