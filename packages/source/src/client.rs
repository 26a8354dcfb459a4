//! HTTP client for the portal.
//!
//! One attempt per request: a failed fetch is reported straight back to the
//! caller, which decides whether to serve a fallback snapshot instead.

use std::time::Duration;

use reqwest::Url;
use vitibrasil_report_models::{Report, ReportRequest};

use crate::SourceError;
use crate::url::report_url;

/// Timeout applied to every upstream request unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 200;

/// Client for the Vitibrasil report pages.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct VitibrasilClient {
    http: reqwest::Client,
    base_url: Url,
}

impl VitibrasilClient {
    /// Creates a client for the portal entry point at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let base_url = Url::parse(base_url).map_err(|e| SourceError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vitibrasil/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// The portal entry point this client talks to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The URL of the page addressed by `request`.
    #[must_use]
    pub fn report_url(&self, request: &ReportRequest) -> Url {
        report_url(&self.base_url, request)
    }

    /// Downloads the HTML of the page addressed by `request`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] on connection, timeout or body errors
    /// and [`SourceError::Status`] on a non-2xx response.
    pub async fn fetch_page(&self, request: &ReportRequest) -> Result<String, SourceError> {
        let url = self.report_url(request);
        log::debug!("[{request}] GET {url}");

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(BODY_PREVIEW_LEN).collect();
            log::debug!("[{request}] HTTP {status}, body preview: {preview}");
            return Err(SourceError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }

    /// Downloads and extracts the report addressed by `request`.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::fetch_page`], or
    /// [`SourceError::Extract`] if the page holds malformed quantities.
    pub async fn fetch_report(&self, request: &ReportRequest) -> Result<Report, SourceError> {
        let html = self.fetch_page(request).await?;
        let report = vitibrasil_scraper::extract(request.category(), &html)?;
        log::info!("[{request}] extracted {} records", report.len());
        Ok(report)
    }
}
