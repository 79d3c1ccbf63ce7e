use crate::{validate_request, AppState, Effect, Msg, SearchTypeSelection};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::QueryChanged(query) => {
            state.set_query(query);
            Vec::new()
        }
        Msg::SearchTypeSelected(raw) => {
            state.set_search_type(SearchTypeSelection::from_input(&raw));
            Vec::new()
        }
        Msg::SearchRequested => {
            let (query, search_type) = match validate_request(state.query(), state.search_type())
            {
                Ok(valid) => valid,
                Err(err) => {
                    state.reject(err);
                    return (state, Vec::new());
                }
            };

            // The superseded request must be cancelled before the new one opens.
            let superseded = state.active_request();
            let request_id = state.begin_request();
            let mut effects = Vec::with_capacity(1 + usize::from(superseded.is_some()));
            if let Some(previous) = superseded {
                effects.push(Effect::CancelSearch {
                    request_id: previous,
                });
            }
            effects.push(Effect::StartSearch {
                request_id,
                search_type,
                query,
            });
            effects
        }
        Msg::CancelRequested => match state.active_request() {
            Some(request_id) => vec![Effect::CancelSearch { request_id }],
            None => Vec::new(),
        },
        Msg::FrameReceived { request_id, frame } => {
            state.apply_frame(request_id, frame);
            Vec::new()
        }
        Msg::SearchSettled {
            request_id,
            outcome,
        } => match state.settle(request_id, outcome) {
            Some(html) => vec![Effect::FinalizeResults { request_id, html }],
            None => Vec::new(),
        },
        Msg::ResultsFinalized { request_id, html } => {
            state.apply_finalized_results(request_id, html);
            Vec::new()
        }
        Msg::ShowStepsClicked => {
            state.show_steps();
            Vec::new()
        }
        Msg::HideStepsClicked => {
            state.hide_steps();
            Vec::new()
        }
    };

    (state, effects)
}
