#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTML table extraction engine for Vitibrasil report pages.
//!
//! Turns an already-fetched report page into typed records:
//!
//! - [`normalize`]: pt-BR number parsing and label case transforms
//! - [`html_table`]: locating the data table and reading its rows
//! - [`classify`]: the group/detail row state machine
//! - [`extract`]: the per-category extractors built on the three above
//!
//! Everything here is synchronous and free of I/O. Each call parses its
//! own document and keeps its own state, so extractors can be called from
//! any number of request handlers at once.

pub mod classify;
pub mod extract;
pub mod html_table;
pub mod normalize;

pub use extract::{
    extract, extract_commercialization, extract_processing, extract_production, extract_trade,
};

/// Errors that can occur while extracting records from a report page.
///
/// A missing table or a table without usable rows is not an error; the
/// extractors return an empty list for those.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// A quantity that must be numeric was not.
    #[error("Parse error in row '{row}': {source}")]
    Quantity {
        /// First cell of the offending row.
        row: String,
        /// The underlying number error.
        source: normalize::ParseQuantityError,
    },
}
