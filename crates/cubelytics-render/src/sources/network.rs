//! Minigame-network source: player info, status and socials sections plus
//! a `games` map whose entries carry a flat stat map and pre-shaped tables.

use serde_json::{Map, Value};

use crate::classify::{is_record_array, residual};
use crate::dispatch::Normalizer;
use crate::generic::{object_sections, records_table, titled_section};
use crate::tree::{Field, PresentationTree, Section, TableBlock};
use crate::value::{cell_value, is_truthy};

const PLAYER_INFO: &str = "player_info";
const STATUS: &str = "status";
const SOCIALS: &str = "socials";
const GAMES: &str = "games";

#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkNormalizer;

impl Normalizer for NetworkNormalizer {
    fn normalize(&self, payload: &Value) -> PresentationTree {
        let Some(map) = payload.as_object() else {
            return crate::generic::normalize_value(payload);
        };

        let mut sections = Vec::new();

        if let Some(info) = map.get(PLAYER_INFO).filter(|v| is_truthy(Some(*v))) {
            sections.push(titled_section("Player Info", info));
        }
        match map.get(STATUS).filter(|v| is_truthy(Some(*v))) {
            Some(Value::String(status)) => {
                sections.push(Section::fields(Some("Status"), vec![Field::new("Status", status.as_str())]));
            }
            Some(status) => sections.push(titled_section("Status", status)),
            None => {}
        }
        if let Some(socials) = map.get(SOCIALS).filter(|v| is_truthy(Some(*v))) {
            sections.push(titled_section("Socials", socials));
        }
        match map.get(GAMES).filter(|v| is_truthy(Some(*v))) {
            Some(Value::Object(games)) => {
                let blocks = games.iter().map(|(name, game)| game_block(name, game)).collect();
                sections.push(Section::group("Games", blocks));
            }
            Some(other) => sections.push(titled_section("Games", other)),
            None => {}
        }

        let rest = residual(map, &[PLAYER_INFO, STATUS, SOCIALS, GAMES]);
        sections.extend(object_sections(&rest));

        PresentationTree::new(sections).or_placeholder()
    }
}

/// Expandable block for one game: its stat map, then each of its tables.
fn game_block(name: &str, game: &Value) -> Section {
    let Some(game) = game.as_object() else {
        return titled_section(name, game);
    };

    let mut children = Vec::new();
    if let Some(stats) = game.get("stats").filter(|v| is_truthy(Some(*v))) {
        match stats {
            Value::Object(stats) => {
                let fields = stats.iter().map(|(k, v)| Field::from_value(k.as_str(), v)).collect();
                children.push(Section::fields(None, fields));
            }
            other => children.push(titled_section("stats", other)),
        }
    }
    let mut handled = vec!["stats"];
    if let Some(Value::Array(tables)) = game.get("tables") {
        for (i, table) in tables.iter().enumerate() {
            match shaped_table(table) {
                Some(shaped) => children.push(Section::Table(shaped)),
                None if has_empty_rows(table) => {}
                None => children.push(titled_section(&format!("table {}", i + 1), table)),
            }
        }
        handled.push("tables");
    }

    let rest = residual(game, &handled);
    children.extend(object_sections(&rest));

    Section::collapsible(name, children)
}

/// A pre-shaped table: optional `headers` plus `rows`, where each row is
/// either positional cells or a record keyed by header. Tables without rows
/// are skipped.
pub fn shaped_table(table: &Value) -> Option<TableBlock> {
    let table: &Map<String, Value> = table.as_object()?;
    let rows = table.get("rows").and_then(Value::as_array).filter(|r| !r.is_empty())?;

    let headers: Option<Vec<String>> = table.get("headers").and_then(Value::as_array).map(|hs| {
        hs.iter()
            .map(|h| h.as_str().map(str::to_string).unwrap_or_else(|| cell_value(Some(h))))
            .collect()
    });

    let Some(headers) = headers else {
        if is_record_array(rows) {
            return Some(records_table(None, rows));
        }
        return Some(TableBlock {
            title: None,
            headers: Vec::new(),
            rows: rows.iter().map(positional_cells).collect(),
        });
    };

    let rows = rows
        .iter()
        .map(|row| match row {
            Value::Object(record) => headers.iter().map(|h| cell_value(record.get(h))).collect(),
            other => positional_cells(other),
        })
        .collect();

    Some(TableBlock {
        title: None,
        headers,
        rows,
    })
}

fn has_empty_rows(table: &Value) -> bool {
    table
        .get("rows")
        .and_then(Value::as_array)
        .is_some_and(Vec::is_empty)
}

fn positional_cells(row: &Value) -> Vec<String> {
    match row {
        Value::Array(cells) => cells.iter().map(|c| cell_value(Some(c))).collect(),
        other => vec![cell_value(Some(other))],
    }
}
