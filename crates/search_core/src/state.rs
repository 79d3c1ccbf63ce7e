use crate::view_model::{format_token_usage, AppViewModel, ResultsBody, ResultsView, StepsView};
use crate::{Frame, LogContent, SearchOutcome, SearchTypeSelection, TokenUsage, ValidationError};

pub type RequestId = u64;

/// Explanation text shown while waiting for the first log frame.
pub const LOADING_TEXT: &str = "Loading...";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    query: String,
    search_type: SearchTypeSelection,
    last_request_id: RequestId,
    active_request: Option<RequestId>,
    settled_request: Option<RequestId>,
    validation: Option<ValidationError>,
    results_visible: bool,
    results: ResultsBody,
    explanation: Option<String>,
    steps: Vec<String>,
    steps_visible: bool,
    tokens: TokenUsage,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_type(search_type: SearchTypeSelection) -> Self {
        Self {
            search_type,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            query: self.query.clone(),
            search_type: self.search_type.clone(),
            active_request: self.active_request,
            trigger_enabled: self.active_request.is_none(),
            validation_message: self.validation.as_ref().map(ToString::to_string),
            results: ResultsView {
                visible: self.results_visible,
                body: self.results.clone(),
            },
            explanation: self.explanation.clone(),
            steps: StepsView {
                items: self.steps.clone(),
                panel_visible: self.steps_visible,
                show_button_visible: !self.steps_visible,
                hide_button_visible: self.steps_visible,
            },
            tokens: self.tokens,
            token_text: format_token_usage(&self.tokens),
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_type(&self) -> &SearchTypeSelection {
        &self.search_type
    }

    pub fn active_request(&self) -> Option<RequestId> {
        self.active_request
    }

    pub(crate) fn set_query(&mut self, query: String) {
        if self.query != query {
            self.query = query;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_search_type(&mut self, selection: SearchTypeSelection) {
        if self.search_type != selection {
            self.search_type = selection;
            self.mark_dirty();
        }
    }

    pub(crate) fn reject(&mut self, error: ValidationError) {
        self.validation = Some(error);
        self.mark_dirty();
    }

    /// Makes a fresh request active and resets the panels for it.
    pub(crate) fn begin_request(&mut self) -> RequestId {
        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.active_request = Some(request_id);
        self.settled_request = None;
        self.validation = None;
        self.results_visible = false;
        self.results = ResultsBody::Empty;
        self.explanation = Some(LOADING_TEXT.to_string());
        self.steps.clear();
        self.tokens = TokenUsage::default();
        self.mark_dirty();
        request_id
    }

    /// Applies a frame of the active request. Frames of any other request are dropped.
    pub(crate) fn apply_frame(&mut self, request_id: RequestId, frame: Frame) {
        if self.active_request != Some(request_id) {
            return;
        }
        match frame {
            Frame::Output(html) => {
                self.results = ResultsBody::Html(html);
                self.results_visible = true;
                self.explanation = None;
            }
            Frame::Log(LogContent::Step { query, explanation }) => {
                self.explanation = Some(explanation);
                self.steps.push(format!("Searched \"{query}\""));
            }
            Frame::Log(LogContent::Text(text)) => {
                self.explanation = Some(text);
            }
            Frame::TokenUsage(tokens) => {
                self.tokens = tokens;
            }
            Frame::Error(content) => {
                self.show_error(content);
            }
        }
        self.mark_dirty();
    }

    /// Runs the cleanup of the active request.
    ///
    /// Returns the answer HTML when it needs its links finalized.
    pub(crate) fn settle(
        &mut self,
        request_id: RequestId,
        outcome: SearchOutcome,
    ) -> Option<String> {
        if self.active_request != Some(request_id) {
            return None;
        }
        self.active_request = None;
        self.settled_request = Some(request_id);
        self.steps_visible = false;
        match outcome {
            SearchOutcome::Completed => {}
            SearchOutcome::Cancelled => self.explanation = None,
            SearchOutcome::Failed(message) => self.show_error(message),
        }
        self.mark_dirty();
        match &self.results {
            ResultsBody::Html(html) => Some(html.clone()),
            _ => None,
        }
    }

    pub(crate) fn apply_finalized_results(&mut self, request_id: RequestId, html: String) {
        if self.settled_request != Some(request_id) || self.active_request.is_some() {
            return;
        }
        if let ResultsBody::Html(current) = &mut self.results {
            if *current != html {
                *current = html;
                self.mark_dirty();
            }
        }
    }

    pub(crate) fn show_steps(&mut self) {
        if !self.steps_visible {
            self.steps_visible = true;
            self.mark_dirty();
        }
    }

    pub(crate) fn hide_steps(&mut self) {
        if self.steps_visible {
            self.steps_visible = false;
            self.mark_dirty();
        }
    }

    fn show_error(&mut self, content: String) {
        self.results = ResultsBody::Error(content);
        self.results_visible = true;
        self.explanation = None;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
