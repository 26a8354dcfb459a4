#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the Vitibrasil statistics server.
//!
//! These types are serialized to JSON for the REST API. Path parameters
//! keep the portal's Portuguese names (`ano`, `sub_aba`) since they are
//! part of the public URL scheme.

use serde::{Deserialize, Serialize};

/// Path parameters of the reports without sub-tabs.
#[derive(Debug, Clone, Deserialize)]
pub struct YearPath {
    /// Report year, validated against the category's range by the handler.
    pub ano: String,
}

/// Path parameters of the reports split into sub-tabs.
#[derive(Debug, Clone, Deserialize)]
pub struct SubTabYearPath {
    /// Sub-tab slug (e.g. `viniferas`).
    pub sub_aba: String,
    /// Report year.
    pub ano: String,
}

/// Envelope of every report response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiReport<T> {
    /// Extracted (or snapshot) records, in table order.
    pub data: T,
}

/// Welcome message served at the API root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiWelcome {
    /// Greeting text.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error body returned with 4xx and 5xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable description.
    pub error: String,
}
