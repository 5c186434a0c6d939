//! Derived views over canonical posts.
//!
//! Everything here is a pure transformation: slices of [`pulselens_core::Post`]
//! in, freshly allocated groups, filtered sets, stats, or CSV text out. No
//! shared state, no I/O.

pub mod export;
pub mod filter;
pub mod groups;
pub mod keywords;
pub mod stats;

pub use filter::{filter_by_date_range, filter_by_text};
pub use groups::{
    group_by_account, group_by_date, group_by_recency, utc_today, AccountGroup, DateGroup,
    TableGroup,
};
pub use stats::Stats;
