//! Core types and normalization for PulseLens.
//!
//! Converts loosely-typed rows from the hosted mention tables into canonical
//! [`Post`] values: resolves column-name synonyms, truncates datetime strings
//! to calendar dates, coerces engagement counts, and repairs narrative text
//! that lost its whitespace upstream.

pub mod config;
pub mod model;
pub mod normalize;

pub use config::{load_app_config, AppConfig, ConfigError};
pub use model::Post;
pub use normalize::{normalize_date, normalize_row, restore_spaces};
