//! Output formatting for one-shot searches.
//!
//! Supports human-readable terminal output and JSON for scripting.

use serde::Serialize;

use cubelytics_protocol::PlayerIdentity;
use cubelytics_render::Surface;

use crate::layout::card_lines;
use crate::oneshot::SearchOutcome;

#[derive(Serialize)]
struct JsonOutput<'a> {
    query: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    player: Option<&'a PlayerIdentity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<&'a Surface>,
}

pub fn format_json(query: &str, outcome: &SearchOutcome) -> String {
    let output = match outcome {
        SearchOutcome::Completed { player, surface } => JsonOutput {
            query,
            status: "done",
            player: player.as_ref(),
            error: None,
            results: Some(surface),
        },
        SearchOutcome::Failed { player, message } => JsonOutput {
            query,
            status: "error",
            player: player.as_ref(),
            error: Some(message),
            results: None,
        },
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_human(query: &str, outcome: &SearchOutcome) -> String {
    let mut out = String::new();
    match outcome {
        SearchOutcome::Completed { player, surface } => {
            if let Some(player) = player {
                out.push_str(&player_header(player));
            }
            if surface.is_empty() {
                out.push_str(&format!("No sources returned for \"{}\".\n", query));
                return out;
            }
            out.push_str(&format!("{} source(s) for \"{}\":\n\n", surface.cards.len(), query));
            for card in &surface.cards {
                for line in card_lines(card) {
                    out.push_str(&line.plain());
                    out.push('\n');
                }
                out.push('\n');
            }
            out.push_str(&nav_summary(surface));
        }
        SearchOutcome::Failed { message, .. } => {
            out.push_str(&format!("Search for \"{}\" failed: {}\n", query, message));
        }
    }
    out
}

fn player_header(player: &PlayerIdentity) -> String {
    format!(
        "{}  {}\n{}\nSkin: {}\n\n",
        player.display_name,
        player.platform.badge_label(),
        player.id.display_line(),
        player.avatar.display_url(),
    )
}

fn nav_summary(surface: &Surface) -> String {
    let entries: Vec<String> = surface
        .nav
        .iter()
        .map(|entry| format!("{} {}", entry.status.marker(), entry.label))
        .collect();
    format!("{}\n", entries.join("  "))
}
