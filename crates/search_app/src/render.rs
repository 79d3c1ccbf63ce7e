use std::fmt::Write;

use chrono::{DateTime, Local};
use search_core::{AppViewModel, ResultsBody};
use search_engine::{collect_result_links, fragment_text};

/// Renders the whole view as a block of terminal text.
pub(crate) fn render(view: &AppViewModel, finished_at: Option<DateTime<Local>>) -> String {
    let mut out = String::new();

    let status = if !view.trigger_enabled {
        match view.active_request {
            Some(request_id) => format!("searching (request {request_id})"),
            None => "searching".to_string(),
        }
    } else if let Some(at) = finished_at {
        format!("idle, last search finished {}", at.format("%H:%M:%S"))
    } else {
        "idle".to_string()
    };
    let _ = writeln!(out, "== search [{}] {}", view.search_type.label(), status);
    let _ = writeln!(out, "{}", view.token_text);
    if !view.trigger_enabled {
        let _ = writeln!(out, "[:cancel to stop]");
    }

    if let Some(message) = &view.validation_message {
        let _ = writeln!(out, "! {message}");
    }

    if let Some(explanation) = &view.explanation {
        let _ = writeln!(out, "... {explanation}");
    }

    if view.results.visible {
        match &view.results.body {
            ResultsBody::Empty => {}
            ResultsBody::Html(html) => render_answer(html, &mut out),
            ResultsBody::Error(_) => {
                if let Some(message) = view.results.error_message() {
                    let _ = writeln!(out, "{message}");
                }
            }
        }
    }

    let steps = &view.steps;
    if steps.panel_visible {
        let _ = writeln!(out, "Steps ({}):", steps.items.len());
        for (index, item) in steps.items.iter().enumerate() {
            let _ = writeln!(out, "  {}. {item}", index + 1);
        }
        let _ = writeln!(out, "[:hide to collapse steps]");
    } else if steps.show_button_visible && !steps.items.is_empty() {
        let _ = writeln!(out, "[:steps to show {} steps]", steps.items.len());
    }

    out
}

fn render_answer(html: &str, out: &mut String) {
    let _ = writeln!(out, "Results:");
    for line in fragment_text(html).lines() {
        let _ = writeln!(out, "  {line}");
    }
    let links = collect_result_links(html);
    if links.is_empty() {
        return;
    }
    let _ = writeln!(out, "  Links:");
    for (index, link) in links.iter().enumerate() {
        match &link.text {
            Some(text) => {
                let _ = writeln!(out, "    [{}] {text} <{}>", index + 1, link.href);
            }
            None => {
                let _ = writeln!(out, "    [{}] <{}>", index + 1, link.href);
            }
        }
    }
}
