//! Raw extraction types for Amazon book product pages.
//!
//! ## Observed page shape (amazon.com / amazon.es book listings)
//!
//! Product pages are loosely structured and drift over time, so nothing here
//! is guaranteed to be present. Every field of [`RawProduct`] is
//! independently optional: a record must always be constructible even when
//! the page matches none of the known selectors or patterns.
//!
//! ### Detail bullets
//! Bibliographic details (publisher, ISBN, page count, dimensions, language,
//! publication date) appear as free text in the "Product details" section,
//! not as addressable elements. They are matched by regex over the page's
//! visible text, e.g. `"Publisher : Rodale Books (June 1, 2021)"`.
//!
//! ### Best-sellers rank
//! Printed as `"#12,345 in Books (See Top 100 in Books)"`. Rank and category
//! come from a single pattern match and are populated together or not at all.
//!
//! ### Series strip
//! Kindle series pages show `"Book 2 of 7: The Dark Tower"`. All three parts
//! come from one pattern; a partial fill never occurs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Unnormalized, best-effort extraction result for one product page.
///
/// Produced fresh on each capture by [`crate::extract::extract`]; handed to
/// [`crate::normalize::to_capture`] for defaulting and wire formatting.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    /// Absolute URL of the page the capture ran against.
    pub url: String,
    /// Extraction time. The wire record's `capturedAt` is set later, at
    /// normalization time.
    pub timestamp: DateTime<Utc>,
    /// 10-character identifier parsed from the `/dp/` URL segment.
    pub asin: Option<String>,
    pub page_type: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    /// Price with currency symbol and thousands separators stripped.
    pub price: Option<f64>,
    /// Pre-discount strike-through price, when a deal is shown.
    pub price_strike: Option<f64>,
    /// Currency symbol next to the price; `"$"` when the page shows none.
    pub currency: Option<String>,
    /// Average star rating on a 0–5 scale.
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    /// Histogram percentages keyed `"1_star"` .. `"5_star"`, when the
    /// review histogram is present.
    pub ratings_breakdown: Option<BTreeMap<String, String>>,
    pub bsr: Option<BestSellerRank>,
    /// First breadcrumb-ish category link.
    pub category: Option<String>,
    /// Full breadcrumb trail in page order.
    pub categories: Option<Vec<String>>,
    pub publication_date: Option<String>,
    pub page_count: Option<u32>,
    pub language: Option<String>,
    /// Physical dimensions as printed, e.g. `"6 x 0.5 x 9 inches"`.
    pub dimensions: Option<String>,
    pub isbn: Option<String>,
    /// Selected binding format; the page defaults to `"Paperback"` when no
    /// format button is selected.
    pub format: Option<String>,
    pub kindle: Option<KindleInfo>,
    pub availability: Option<String>,
    /// Gallery image URLs in DOM order. `data:` URIs are filtered out.
    /// Duplicates are NOT removed: a hero image matched by two image-role
    /// selectors appears twice.
    pub images: Vec<String>,
    pub cover_image: Option<String>,
    pub description: Option<String>,
    /// Feature bullets in page order, boilerplate filtered out. `None` when
    /// no bullet survives the filter.
    pub bullets: Option<Vec<String>>,
    pub series: Option<SeriesInfo>,
    pub edition: Option<String>,
}

impl RawProduct {
    /// A raw product with no extracted fields, timestamped now.
    #[must_use]
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timestamp: Utc::now(),
            asin: None,
            page_type: "product".to_owned(),
            title: None,
            subtitle: None,
            author: None,
            publisher: None,
            price: None,
            price_strike: None,
            currency: None,
            rating: None,
            review_count: None,
            ratings_breakdown: None,
            bsr: None,
            category: None,
            categories: None,
            publication_date: None,
            page_count: None,
            language: None,
            dimensions: None,
            isbn: None,
            format: None,
            kindle: None,
            availability: None,
            images: Vec::new(),
            cover_image: None,
            description: None,
            bullets: None,
            series: None,
            edition: None,
        }
    }
}

/// Category-scoped best-sellers rank, parsed atomically from
/// `"#<digits> in <category>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BestSellerRank {
    pub rank: u32,
    pub category: String,
}

/// Series membership, parsed atomically from `"Book <n> of <m>: <name>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesInfo {
    pub book_number: u32,
    pub total_books: u32,
    pub series_name: String,
}

/// Kindle edition details, when the page offers one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindleInfo {
    /// `true` when a Kindle price element exists on the page.
    pub available: bool,
    /// Kindle price text as shown, e.g. `"$9.99"`.
    pub price: Option<String>,
    /// Download size as printed, e.g. `"2.5 MB"`.
    pub file_size: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_product_serializes_with_camel_case_wire_names() {
        let mut raw = RawProduct::empty("https://www.amazon.com/dp/1609618955");
        raw.price_strike = Some(15.99);
        raw.review_count = Some(12);
        raw.cover_image = Some("https://img.example.com/cover.jpg".to_owned());
        raw.kindle = Some(KindleInfo {
            available: true,
            price: Some("$9.99".to_owned()),
            file_size: Some("2.5 MB".to_owned()),
        });

        let json = serde_json::to_value(&raw).unwrap();
        assert_eq!(json["pageType"], "product");
        assert_eq!(json["priceStrike"], 15.99);
        assert_eq!(json["reviewCount"], 12);
        assert_eq!(json["coverImage"], "https://img.example.com/cover.jpg");
        assert_eq!(json["kindle"]["fileSize"], "2.5 MB");
    }
}
