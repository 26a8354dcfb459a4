#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Upstream client for the Vitibrasil statistics portal.
//!
//! Maps a [`vitibrasil_report_models::ReportRequest`] onto the portal's
//! numeric query codes ([`url`]), downloads the page and runs the matching
//! extractor ([`client`]).

pub mod client;
pub mod url;

pub use client::VitibrasilClient;

/// Errors that can occur while fetching a report from the portal.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The portal answered with a non-success status.
    #[error("Upstream returned HTTP {status} for {url}")]
    Status {
        /// Response status.
        status: reqwest::StatusCode,
        /// Requested URL.
        url: String,
    },

    /// The configured portal URL is not a valid URL.
    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        message: String,
    },

    /// The page was fetched but its table could not be extracted.
    #[error("Extraction failed: {0}")]
    Extract(#[from] vitibrasil_scraper::ScrapeError),
}

impl SourceError {
    /// Whether the portal itself could not be reached or refused the
    /// request, as opposed to the page being unreadable.
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }
}
