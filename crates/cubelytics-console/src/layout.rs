//! Line layout of result cards, shared by the TUI and plain-text output.

use cubelytics_render::{Card, CardBody, PresentationTree, Section, TableBlock};

const COLUMN_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Card title row: icon, label, badge and expansion arrow.
    CardHeader,
    Heading,
    Field { key: String, value: String },
    TableHeader,
    TableRow,
    Placeholder,
    Warning,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyLine {
    pub depth: usize,
    pub kind: LineKind,
    pub text: String,
}

impl BodyLine {
    fn new(depth: usize, kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            depth,
            kind,
            text: text.into(),
        }
    }

    /// Indented plain-text rendering.
    pub fn plain(&self) -> String {
        format!("{}{}", "  ".repeat(self.depth), self.text)
    }
}

pub fn card_header(card: &Card) -> String {
    let arrow = if card.expanded { "▼" } else { "▶" };
    format!("{} {} {} [{}]", arrow, card.icon, card.label, card.status.badge())
}

/// Header plus, when expanded, the body of one card.
pub fn card_lines(card: &Card) -> Vec<BodyLine> {
    let mut lines = vec![BodyLine::new(0, LineKind::CardHeader, card_header(card))];
    if card.expanded {
        lines.extend(body_lines(&card.body, 1));
    }
    lines
}

/// Every card in order, separated by blank lines, together with the line
/// extent each card occupies.
pub fn surface_lines(cards: &[Card]) -> (Vec<BodyLine>, Vec<std::ops::Range<usize>>) {
    let mut lines = Vec::new();
    let mut extents = Vec::with_capacity(cards.len());
    for card in cards {
        let start = lines.len();
        lines.extend(card_lines(card));
        extents.push(start..lines.len());
        lines.push(BodyLine::new(0, LineKind::Blank, ""));
    }
    (lines, extents)
}

pub fn body_lines(body: &CardBody, depth: usize) -> Vec<BodyLine> {
    match body {
        CardBody::Warning(_) => {
            let text = body.warning_line().unwrap_or_default();
            vec![BodyLine::new(depth, LineKind::Warning, text)]
        }
        CardBody::Tree(tree) => tree_lines(tree, depth),
    }
}

pub fn tree_lines(tree: &PresentationTree, depth: usize) -> Vec<BodyLine> {
    let mut lines = Vec::new();
    for section in &tree.sections {
        section_lines(section, depth, &mut lines);
    }
    lines
}

fn section_lines(section: &Section, depth: usize, out: &mut Vec<BodyLine>) {
    match section {
        Section::Fields(block) => {
            let depth = match &block.title {
                Some(title) => {
                    out.push(BodyLine::new(depth, LineKind::Heading, title.clone()));
                    depth + 1
                }
                None => depth,
            };
            for field in &block.fields {
                out.push(BodyLine::new(
                    depth,
                    LineKind::Field {
                        key: field.key.clone(),
                        value: field.value.clone(),
                    },
                    format!("{}: {}", field.key, field.value),
                ));
            }
        }
        Section::Group(group) => {
            let title = if group.collapsible {
                format!("▸ {}", group.title)
            } else {
                group.title.clone()
            };
            out.push(BodyLine::new(depth, LineKind::Heading, title));
            for child in &group.children {
                section_lines(child, depth + 1, out);
            }
        }
        Section::Table(table) => {
            let depth = match &table.title {
                Some(title) => {
                    out.push(BodyLine::new(depth, LineKind::Heading, title.clone()));
                    depth + 1
                }
                None => depth,
            };
            table_lines(table, depth, out);
        }
        Section::Placeholder { text } => out.push(BodyLine::new(depth, LineKind::Placeholder, text.clone())),
    }
}

fn table_lines(table: &TableBlock, depth: usize, out: &mut Vec<BodyLine>) {
    let columns = table
        .rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(table.headers.len()))
        .max()
        .unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in std::iter::once(&table.headers).chain(&table.rows) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    if !table.headers.is_empty() {
        out.push(BodyLine::new(depth, LineKind::TableHeader, aligned(&table.headers, &widths)));
    }
    for row in &table.rows {
        out.push(BodyLine::new(depth, LineKind::TableRow, aligned(row, &widths)));
    }
}

fn aligned(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    padded.join(COLUMN_SEPARATOR).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubelytics_protocol::SourceResult;
    use cubelytics_render::assemble;
    use serde_json::json;

    #[test]
    fn faction_table_aligns_columns() {
        let surface = assemble(&[SourceResult::success(
            "6b6t.org",
            json!({"player_stats": {"Kills": {"7d": 5, "30d": 20, "total": 100}}}),
        )]);
        let text: Vec<String> = card_lines(&surface.cards[0]).iter().map(BodyLine::plain).collect();
        assert_eq!(
            text,
            vec![
                "▼ 💀 6b6t.org [OK]",
                "  Stats",
                "    Stat  | 7 days | 30 days | Total",
                "    Kills | 5      | 20      | 100",
            ]
        );
    }

    #[test]
    fn collapsed_card_is_header_only() {
        let mut surface = assemble(&[SourceResult::failure("playhive.com", "timeout")]);
        assert_eq!(card_lines(&surface.cards[0])[1].text, "⚠ timeout");
        surface.cards[0].toggle();
        let lines = card_lines(&surface.cards[0]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "▶ 🐝 playhive.com [Error]");
    }

    #[test]
    fn extents_cover_each_card() {
        let surface = assemble(&[
            SourceResult::success("a", json!({"x": 1, "y": 2})),
            SourceResult::failure("b", "HTTP 500"),
        ]);
        let (lines, extents) = surface_lines(&surface.cards);
        assert_eq!(extents, vec![0..3, 4..6]);
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[3].kind, LineKind::Blank);
    }
}
