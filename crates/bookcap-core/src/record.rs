//! The wire-format capture record accepted by the ingestion endpoint.
//!
//! Field names are part of the API contract with the dashboard backend and
//! are serialized in camelCase exactly as the endpoint expects
//! (`coverUrl`, `bsrCategory`, `pageCount`, `publicationDate`, `capturedAt`).
//! The string sentinels are Spanish because the dashboard renders them
//! verbatim when a field could not be extracted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fully-defaulted product capture, ready for transmission.
///
/// Every field has a defined default so downstream consumers never need
/// null-checks: `0` for numerics, a field-specific sentinel for strings,
/// `[]` for sequences. Construction happens once per capture in the
/// normalizer; the record is never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRecord {
    /// 10-character product identifier, or [`CaptureRecord::DEFAULT_ASIN`]
    /// when none could be derived from the page URL.
    pub asin: String,
    pub title: String,
    pub author: String,
    /// Main cover image URL; empty string when no image was found.
    pub cover_url: String,
    /// Best-sellers rank; `0` when the rank pattern did not match.
    pub bsr: u32,
    /// Category the rank applies to, e.g. `"Books > Self-Help"`.
    pub bsr_category: String,
    pub price: f64,
    /// Currency symbol, e.g. `"$"` or `"€"`.
    pub currency: String,
    pub reviews: u32,
    /// Average star rating on a 0–5 scale; `0.0` when not found.
    pub rating: f64,
    pub page_count: u32,
    /// Free-form date string as printed on the page, e.g. `"June 1, 2021"`.
    pub publication_date: String,
    pub publisher: String,
    pub language: String,
    pub isbn: String,
    /// Binding format, e.g. `"Paperback"` or `"Kindle Edition"`.
    pub format: String,
    /// Breadcrumb categories in page order.
    pub categories: Vec<String>,
    pub description: String,
    /// Feature bullets in page order, boilerplate filtered out.
    pub bullets: Vec<String>,
    /// Set at normalization time, not extraction time.
    pub captured_at: DateTime<Utc>,
    /// Absolute URL of the captured page.
    pub url: String,
}

impl CaptureRecord {
    /// Sentinel for a record whose page URL yielded no product identifier.
    pub const DEFAULT_ASIN: &'static str = "N/A";
    /// Sentinel title shown by the dashboard for untitled captures.
    pub const DEFAULT_TITLE: &'static str = "Sin título";
    /// Sentinel author shown by the dashboard for unknown authors.
    pub const DEFAULT_AUTHOR: &'static str = "Desconocido";
    /// Currency symbol assumed when the page shows none.
    pub const DEFAULT_CURRENCY: &'static str = "$";

    /// Returns `true` if the record carries a usable product identifier.
    ///
    /// A record without one is the single abort-worthy outcome of a capture:
    /// callers should refuse to persist or transmit it and surface a
    /// "no product detected" result instead.
    #[must_use]
    pub fn has_identifier(&self) -> bool {
        !self.asin.is_empty() && self.asin != Self::DEFAULT_ASIN
    }
}
