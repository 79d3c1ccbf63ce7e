use search_core::{update, AppState, Msg};

#[test]
fn show_steps_reveals_panel_and_swaps_affordances() {
    let (mut state, effects) = update(AppState::new(), Msg::ShowStepsClicked);
    let steps = state.view().steps;

    assert!(effects.is_empty());
    assert!(steps.panel_visible);
    assert!(!steps.show_button_visible);
    assert!(steps.hide_button_visible);
    assert!(state.consume_dirty());
}

#[test]
fn toggles_are_idempotent() {
    let (state, _) = update(AppState::new(), Msg::ShowStepsClicked);
    let (mut state, _) = update(state, Msg::ShowStepsClicked);
    assert!(state.consume_dirty());

    let (mut again, _) = update(state.clone(), Msg::ShowStepsClicked);
    assert!(!again.consume_dirty());
    assert_eq!(again, state);

    let (state, _) = update(state, Msg::HideStepsClicked);
    let (mut state, _) = update(state, Msg::HideStepsClicked);
    let steps = state.view().steps;
    assert!(!steps.panel_visible);
    assert!(steps.show_button_visible);
    assert!(!steps.hide_button_visible);
    assert!(state.consume_dirty());

    let (mut hidden, _) = update(state, Msg::HideStepsClicked);
    assert!(!hidden.consume_dirty());
}
