//! Data loading and built-in datasets for the railviz engine.
//!
//! [`loader`] reads network configuration from RON, JSON, or TOML data
//! files and resolves every cross-reference before the engine sees it.
//! [`singapore`] is the built-in Singapore MRT/LRT dataset, usable without
//! any data files at all.

pub mod loader;
pub mod schema;
pub mod singapore;

pub use loader::{DataLoadError, NetworkData, load_network_data};
