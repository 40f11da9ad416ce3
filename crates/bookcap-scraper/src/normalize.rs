//! Normalization from a raw extraction to the wire-format [`CaptureRecord`].
//!
//! Field extraction is delegated to [`crate::extract`]; this module focuses
//! on defaulting and flattening so that downstream consumers never need
//! null-checks. It is pure and deterministic except for the `capturedAt`
//! timestamp, which is taken at normalization time — extraction first, then
//! normalization, then timestamp.

use bookcap_core::CaptureRecord;
use chrono::Utc;

use crate::types::RawProduct;

/// Shapes a raw (possibly entirely empty) extraction into a fully-defaulted
/// [`CaptureRecord`].
///
/// Never fails: a missing field resolves to its documented default — `0`
/// for numerics, the field's sentinel for strings, `[]` for sequences.
/// The cover URL prefers the dedicated hero image, then the first gallery
/// image, then empty. The rank pair is flattened to `bsr`/`bsrCategory`;
/// when the pair is absent both land at their defaults together.
#[must_use]
pub fn to_capture(raw: RawProduct) -> CaptureRecord {
    let cover_url = raw
        .cover_image
        .or_else(|| raw.images.first().cloned())
        .unwrap_or_default();

    let (bsr, bsr_category) = match raw.bsr {
        Some(pair) => (pair.rank, pair.category),
        None => (0, String::new()),
    };

    CaptureRecord {
        asin: raw
            .asin
            .unwrap_or_else(|| CaptureRecord::DEFAULT_ASIN.to_owned()),
        title: raw
            .title
            .unwrap_or_else(|| CaptureRecord::DEFAULT_TITLE.to_owned()),
        author: raw
            .author
            .unwrap_or_else(|| CaptureRecord::DEFAULT_AUTHOR.to_owned()),
        cover_url,
        bsr,
        bsr_category,
        price: raw.price.unwrap_or(0.0),
        currency: raw
            .currency
            .filter(|symbol| !symbol.is_empty())
            .unwrap_or_else(|| CaptureRecord::DEFAULT_CURRENCY.to_owned()),
        reviews: raw.review_count.unwrap_or(0),
        rating: raw.rating.unwrap_or(0.0),
        page_count: raw.page_count.unwrap_or(0),
        publication_date: raw.publication_date.unwrap_or_default(),
        publisher: raw.publisher.unwrap_or_default(),
        language: raw.language.unwrap_or_default(),
        isbn: raw.isbn.unwrap_or_default(),
        format: raw.format.unwrap_or_default(),
        categories: raw.categories.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        bullets: raw.bullets.unwrap_or_default(),
        captured_at: Utc::now(),
        url: raw.url,
    }
}
