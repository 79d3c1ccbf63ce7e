use search_core::Msg;

use crate::app::AppEvent;

pub(crate) const HELP: &str = "\
Type a query and press Enter to search. Commands:
  :type <name>   select the search type (:type none to unset)
  :cancel        abort the running search
  :steps         show the steps list
  :hide          hide the steps list
  :help          show this help
  :quit          exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Search(String),
    SelectType(String),
    Cancel,
    ShowSteps,
    HideSteps,
    Help,
    Quit,
    Unknown(String),
}

pub(crate) fn parse_line(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.trim_start().strip_prefix(':') else {
        return Command::Search(line.to_string());
    };
    let (name, rest) = command
        .split_once(char::is_whitespace)
        .unwrap_or((command, ""));
    match name {
        "type" => Command::SelectType(rest.trim().to_string()),
        "cancel" => Command::Cancel,
        "steps" => Command::ShowSteps,
        "hide" => Command::HideSteps,
        "help" => Command::Help,
        "quit" | "q" => Command::Quit,
        _ => Command::Unknown(name.to_string()),
    }
}

pub(crate) fn into_events(command: Command) -> Vec<AppEvent> {
    match command {
        Command::Search(query) => vec![
            AppEvent::Msg(Msg::QueryChanged(query)),
            AppEvent::Msg(Msg::SearchRequested),
        ],
        Command::SelectType(name) => vec![AppEvent::Msg(Msg::SearchTypeSelected(name))],
        Command::Cancel => vec![AppEvent::Msg(Msg::CancelRequested)],
        Command::ShowSteps => vec![AppEvent::Msg(Msg::ShowStepsClicked)],
        Command::HideSteps => vec![AppEvent::Msg(Msg::HideStepsClicked)],
        Command::Help => vec![AppEvent::Notice(HELP.to_string())],
        Command::Quit => vec![AppEvent::Quit],
        Command::Unknown(name) => vec![AppEvent::Notice(format!(
            "Unknown command :{name}. Type :help for the list."
        ))],
    }
}
