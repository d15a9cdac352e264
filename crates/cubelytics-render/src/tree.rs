//! The source-agnostic presentation model every normalizer produces.

use serde::Serialize;
use serde_json::Value;

use cubelytics_protocol::NO_DATA_PLACEHOLDER;

use crate::value::display_value;

/// Ordered sections rendered inside one card.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PresentationTree {
    pub sections: Vec<Section>,
}

/// One block of a presentation tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    /// Flat key/value block.
    Fields(FieldBlock),
    /// Titled block holding further sections.
    Group(Group),
    /// Column headers plus rows of cells.
    Table(TableBlock),
    /// Explicit marker for absent data.
    Placeholder { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub key: String,
    pub value: String,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn from_value(key: impl Into<String>, value: &Value) -> Self {
        Self::new(key, display_value(value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldBlock {
    pub title: Option<String>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub title: String,
    /// Rendered as an expandable block (per-game stats).
    pub collapsible: bool,
    pub children: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableBlock {
    pub title: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Section {
    pub fn fields(title: Option<&str>, fields: Vec<Field>) -> Self {
        Self::Fields(FieldBlock {
            title: title.map(str::to_string),
            fields,
        })
    }

    pub fn group(title: impl Into<String>, children: Vec<Section>) -> Self {
        Self::Group(Group {
            title: title.into(),
            collapsible: false,
            children,
        })
    }

    pub fn collapsible(title: impl Into<String>, children: Vec<Section>) -> Self {
        Self::Group(Group {
            title: title.into(),
            collapsible: true,
            children,
        })
    }

    pub fn placeholder() -> Self {
        Self::Placeholder {
            text: NO_DATA_PLACEHOLDER.to_string(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Fields(block) => block.title.as_deref(),
            Self::Group(group) => Some(&group.title),
            Self::Table(table) => table.title.as_deref(),
            Self::Placeholder { .. } => None,
        }
    }
}

impl PresentationTree {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn placeholder() -> Self {
        Self::new(vec![Section::placeholder()])
    }

    /// Substitute the "No data" placeholder for an empty tree.
    pub fn or_placeholder(self) -> Self {
        if self.sections.is_empty() {
            Self::placeholder()
        } else {
            self
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.sections.as_slice(), [Section::Placeholder { .. }])
    }

    /// Depth-first lookup of the first section with the given title.
    pub fn find(&self, title: &str) -> Option<&Section> {
        find_in(&self.sections, title)
    }

    /// Depth-first lookup of the first field with the given key.
    pub fn field(&self, key: &str) -> Option<&str> {
        field_in(&self.sections, key)
    }
}

fn find_in<'a>(sections: &'a [Section], title: &str) -> Option<&'a Section> {
    for section in sections {
        if section.title() == Some(title) {
            return Some(section);
        }
        if let Section::Group(group) = section {
            if let Some(found) = find_in(&group.children, title) {
                return Some(found);
            }
        }
    }
    None
}

fn field_in<'a>(sections: &'a [Section], key: &str) -> Option<&'a str> {
    for section in sections {
        match section {
            Section::Fields(block) => {
                if let Some(field) = block.fields.iter().find(|f| f.key == key) {
                    return Some(&field.value);
                }
            }
            Section::Group(group) => {
                if let Some(value) = field_in(&group.children, key) {
                    return Some(value);
                }
            }
            Section::Table(_) | Section::Placeholder { .. } => {}
        }
    }
    None
}
