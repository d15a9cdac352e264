//! Normalizers with per-source schema knowledge.

pub mod faction;
pub mod hub;
pub mod network;
pub mod tiers;

pub use faction::FactionNormalizer;
pub use hub::HubNormalizer;
pub use network::NetworkNormalizer;
pub use tiers::TiersNormalizer;
