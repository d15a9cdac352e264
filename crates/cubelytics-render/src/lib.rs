//! Cubelytics Render - turns arbitrarily shaped source payloads into one
//! uniform presentation model.
//!
//! The pipeline is leaf-first: the [`classify`] module partitions a JSON
//! object, [`generic`] builds sections from any object, the [`sources`]
//! normalizers apply per-source knowledge, [`dispatch`] picks the normalizer
//! for a source label, and [`assemble`] produces the cards and navigation
//! entries for a finished search.

pub mod assemble;
pub mod classify;
pub mod dispatch;
pub mod generic;
pub mod scroll_spy;
pub mod sources;
pub mod tree;
pub mod value;

pub use assemble::{assemble, card_id, icon_for, Card, CardBody, CardStatus, NavEntry, Surface};
pub use dispatch::{dispatch, Normalizer, SourceKind, KNOWN_SOURCES};
pub use generic::GenericNormalizer;
pub use scroll_spy::{ScrollSpy, Viewport};
pub use tree::{Field, FieldBlock, Group, PresentationTree, Section, TableBlock};
