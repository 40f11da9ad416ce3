//! Best-effort field extraction from a loaded product page.
//!
//! Two lookup families cover the ~25 output fields:
//!
//! - **Selector tables**: CSS selectors tried strictly in listed order; the
//!   first element whose trimmed text is non-empty wins. No merging across
//!   selectors. The tables encode observed page variants (desktop, mobile
//!   `data-automation-id`, legacy class names) and must be kept in order.
//! - **Regex over visible text**: bibliographic details live in free text,
//!   not addressable elements, so they are matched against the page's
//!   visible body text (script/style content excluded) with patterns tried
//!   in order.
//!
//! Every field is extracted inside its own failure boundary: a strategy
//! that cannot run (e.g. a selector that fails to compile) is logged with
//! `tracing::warn!` and treated as a miss for that field only. No field
//! failure can abort the record or affect a sibling field.
//!
//! Extraction is a stateless, synchronous, single pass over already-loaded
//! page content; each call allocates a fresh [`RawProduct`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::parse::{first_capture, parse_bsr, parse_price, parse_rating, parse_review_count, parse_series};
use crate::types::{KindleInfo, RawProduct};

// ---------------------------------------------------------------------------
// Selector tables (ordered; first non-empty match wins)
// ---------------------------------------------------------------------------

const TITLE_SELECTORS: &[&str] = &[
    "#productTitle",
    r#"[data-automation-id="title"]"#,
    ".product-title",
    r#"h1 span[id="productTitle"]"#,
];

const SUBTITLE_SELECTORS: &[&str] = &["#productSubtitle", ".a-size-large.a-color-secondary"];

const AUTHOR_SELECTORS: &[&str] = &[
    ".author .a-link-normal",
    r#"[data-automation-id="author"]"#,
    ".contributorNameID",
    "span.author a",
    ".a-section .a-spacing-none span.a-size-medium",
];

const PRICE_SELECTORS: &[&str] = &[
    ".a-price-whole",
    ".a-price .a-offscreen",
    ".kindle-price",
    r#"[data-automation-id="price"]"#,
    ".a-color-price",
    ".a-price.a-text-price.a-size-medium.a-color-base .a-offscreen",
];

const STRIKE_PRICE_SELECTORS: &[&str] = &[
    ".a-price.a-text-price .a-offscreen",
    ".a-price-was-string + .a-price .a-offscreen",
];

const RATING_SELECTORS: &[&str] = &[
    ".a-icon-alt",
    r#"[data-hook="average-star-rating"]"#,
    ".reviewCountTextLinkedHistogram .a-link-normal",
];

const REVIEW_COUNT_SELECTORS: &[&str] = &[
    "#acrCustomerReviewText",
    r#"[data-hook="total-review-count"]"#,
    ".reviewCountTextLinkedHistogram .a-link-normal",
    r#"span[data-hook="total-review-count"]"#,
];

const CATEGORY_SELECTORS: &[&str] = &[
    ".a-color-secondary .a-link-normal",
    r#"[data-automation-id="breadcrumb"]"#,
    ".nav-breadcrumb",
];

const AVAILABILITY_SELECTORS: &[&str] = &[
    "#availability span",
    r#"[data-automation-id="availability"]"#,
    ".a-color-success",
    ".a-color-price",
];

const DESCRIPTION_SELECTORS: &[&str] = &[
    r#"[data-feature-name="bookDescription"]"#,
    "#feature-bullets ul",
    ".a-spacing-small .a-size-base",
];

const CURRENCY_SELECTOR: &str = ".a-price .a-price-symbol";
const FORMAT_SELECTOR: &str = ".a-button-selected .a-button-text";
const BREADCRUMB_SELECTOR: &str = ".a-breadcrumb .a-link-normal";
const KINDLE_PRICE_SELECTOR: &str = ".kindle-price";

/// Image-role elements, in one selector list so results come back in DOM
/// order. Elements are not deduplicated by `src`: a gallery that repeats
/// the hero URL yields it twice.
const IMAGE_SELECTOR: &str =
    r#"#landingImage, .a-dynamic-image, [data-automation-id="hero-image"]"#;
const MAIN_IMAGE_SELECTOR: &str = "#landingImage, .a-dynamic-image";

const BULLET_SELECTOR: &str = r#"[data-feature-name="featurebullets"] ul li, .a-unordered-list li"#;

/// Feature-bullet items at or below this many characters are list cruft
/// (separators, "›"), not product copy.
const MIN_BULLET_CHARS: usize = 10;

/// Boilerplate phrase from the "fits your model" widget that shares the
/// bullet list markup.
const BULLET_BOILERPLATE: &str = "Make sure";

// ---------------------------------------------------------------------------
// Text patterns (ordered; first match wins; capture group trimmed)
// ---------------------------------------------------------------------------

static ASIN_IN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/dp/([A-Z0-9]{10})").expect("valid asin regex"));

static PUBLISHER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Publisher[:\s]+([^;(]+)").expect("valid publisher regex"));

static PUBLICATION_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Publication date[:\s]+([^;(]+)").expect("valid publication-date regex")
});

static PUBLISHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Published[:\s]+([^;(]+)").expect("valid published regex"));

static PAGES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+) pages").expect("valid pages regex"));

static PRINT_LENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Print length[:\s]+(\d+) pages").expect("valid print-length regex")
});

static LANGUAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Language[:\s]+([^;(]+)").expect("valid language regex"));

static DIMENSIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Dimensions[:\s]+([^;(]+)").expect("valid dimensions regex"));

static ISBN_13: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ISBN-13[:\s]+([\d-]+)").expect("valid isbn-13 regex"));

static ISBN_10: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ISBN-10[:\s]+([\d-]+)").expect("valid isbn-10 regex"));

static LANGUAGE_EDITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(Spanish|English|French|German|Italian) Edition").expect("valid edition regex")
});

static NUMBERED_EDITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)(?:st|nd|rd|th) Edition").expect("valid numbered-edition regex")
});

static KINDLE_FILE_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)File size[:\s]+([\d.]+ [A-Z]+)").expect("valid file-size regex")
});

/// A parsed page plus its pre-computed visible text, shared by all field
/// extractors during one capture.
pub struct ProductPage {
    html: Html,
    text: String,
    url: String,
}

impl ProductPage {
    #[must_use]
    pub fn parse(html: &str, url: &str) -> Self {
        let html = Html::parse_document(html);
        let text = visible_text(&html);
        Self {
            html,
            text,
            url: url.to_owned(),
        }
    }
}

/// Returns `true` for URLs that point at a capturable product page.
///
/// Matches the desktop (`/dp/`), legacy (`/gp/product/`) and Kindle store
/// (`/kindle-dbs/`) path shapes.
#[must_use]
pub fn is_product_url(url: &str) -> bool {
    url.contains("/dp/") || url.contains("/gp/product/") || url.contains("/kindle-dbs/")
}

/// Runs every field extractor once against the page and returns the raw
/// (all-optional) result.
///
/// Never fails: a page matching none of the known selectors or patterns
/// yields a record with every field at its miss value.
#[must_use]
pub fn extract(html: &str, url: &str) -> RawProduct {
    let page = ProductPage::parse(html, url);
    let mut raw = RawProduct::empty(&page.url);
    raw.timestamp = Utc::now();
    raw.asin = asin_from_url(&page.url);
    raw.title = first_selector_text(&page.html, "title", TITLE_SELECTORS);
    raw.subtitle = first_selector_text(&page.html, "subtitle", SUBTITLE_SELECTORS);
    raw.author = first_selector_text(&page.html, "author", AUTHOR_SELECTORS);
    raw.publisher = first_capture(&page.text, &[&PUBLISHER]);
    raw.price = first_selector_text(&page.html, "price", PRICE_SELECTORS)
        .as_deref()
        .and_then(parse_price);
    raw.price_strike = first_selector_text(&page.html, "price_strike", STRIKE_PRICE_SELECTORS)
        .as_deref()
        .and_then(parse_price);
    raw.currency = Some(currency(&page.html));
    raw.rating = first_selector_text(&page.html, "rating", RATING_SELECTORS)
        .as_deref()
        .and_then(parse_rating);
    raw.review_count = first_selector_text(&page.html, "review_count", REVIEW_COUNT_SELECTORS)
        .as_deref()
        .and_then(parse_review_count);
    raw.ratings_breakdown = ratings_breakdown(&page.html);
    raw.bsr = parse_bsr(&page.text);
    raw.category = first_selector_text(&page.html, "category", CATEGORY_SELECTORS);
    raw.categories = breadcrumb_categories(&page.html);
    raw.publication_date = first_capture(&page.text, &[&PUBLICATION_DATE, &PUBLISHED]);
    raw.page_count =
        first_capture(&page.text, &[&PAGES, &PRINT_LENGTH]).and_then(|n| n.parse::<u32>().ok());
    raw.language = first_capture(&page.text, &[&LANGUAGE]);
    raw.dimensions = first_capture(&page.text, &[&DIMENSIONS]);
    raw.isbn = first_capture(&page.text, &[&ISBN_13, &ISBN_10]);
    raw.format = Some(format(&page.html));
    raw.kindle = Some(kindle_info(&page));
    raw.availability = first_selector_text(&page.html, "availability", AVAILABILITY_SELECTORS);
    raw.images = gallery_images(&page.html);
    raw.cover_image = main_image(&page.html);
    raw.description = first_selector_text(&page.html, "description", DESCRIPTION_SELECTORS);
    raw.bullets = feature_bullets(&page.html);
    raw.series = parse_series(&page.text);
    raw.edition = first_capture(&page.text, &[&LANGUAGE_EDITION, &NUMBERED_EDITION]);

    raw
}

/// Parses the 10-character identifier out of a `/dp/` URL segment.
#[must_use]
pub fn asin_from_url(url: &str) -> Option<String> {
    ASIN_IN_URL
        .captures(url)
        .map(|caps| caps[1].to_owned())
}

// ---------------------------------------------------------------------------
// Lookup helpers
// ---------------------------------------------------------------------------

/// Tries `selectors` strictly in order; the first selector whose FIRST
/// matching element has non-empty trimmed text wins.
///
/// A selector that fails to compile is a per-field anomaly, not an error:
/// it is logged and skipped so the remaining strategies (and every other
/// field) still run.
pub(crate) fn first_selector_text(
    html: &Html,
    field: &str,
    selectors: &[&str],
) -> Option<String> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            tracing::warn!(field, selector = %raw, "unparseable selector; skipping");
            continue;
        };
        if let Some(element) = html.select(&selector).next() {
            let text = element_text(&element);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Full descendant text of an element, trimmed. Mirrors `textContent`.
fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

/// Currency symbol next to the price, defaulting to `"$"` when the page
/// shows none.
fn currency(html: &Html) -> String {
    first_selector_text(html, "currency", &[CURRENCY_SELECTOR])
        .unwrap_or_else(|| "$".to_owned())
}

/// Selected binding format. Pages open with no format button selected for
/// single-format listings, where `"Paperback"` is the storefront default.
fn format(html: &Html) -> String {
    first_selector_text(html, "format", &[FORMAT_SELECTOR])
        .unwrap_or_else(|| "Paperback".to_owned())
}

/// Review histogram percentages, keyed `"1_star"` .. `"5_star"`.
fn ratings_breakdown(html: &Html) -> Option<BTreeMap<String, String>> {
    let mut breakdown = BTreeMap::new();
    for star in (1..=5).rev() {
        let raw = format!(r#"[data-hook="reviews-histogram-{star}-star-count-percent"]"#);
        let Ok(selector) = Selector::parse(&raw) else {
            tracing::warn!(field = "ratings_breakdown", selector = %raw, "unparseable selector; skipping");
            continue;
        };
        if let Some(element) = html.select(&selector).next() {
            breakdown.insert(format!("{star}_star"), element_text(&element));
        }
    }
    (!breakdown.is_empty()).then_some(breakdown)
}

/// Breadcrumb trail in page order, minus the "Back to results" link.
fn breadcrumb_categories(html: &Html) -> Option<Vec<String>> {
    let Ok(selector) = Selector::parse(BREADCRUMB_SELECTOR) else {
        return None;
    };
    let categories: Vec<String> = html
        .select(&selector)
        .map(|link| element_text(&link))
        .filter(|text| !text.is_empty() && !text.contains("Back to results"))
        .collect();
    (!categories.is_empty()).then_some(categories)
}

/// Gallery image URLs in DOM order.
///
/// Inline `data:` sources (lazy-load placeholders) are dropped. No
/// deduplication: repeated `src` values stay repeated.
fn gallery_images(html: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse(IMAGE_SELECTOR) else {
        return Vec::new();
    };
    html.select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .filter(|src| !src.is_empty() && !src.contains("data:"))
        .map(str::to_owned)
        .collect()
}

/// The hero/cover image `src`, when present.
fn main_image(html: &Html) -> Option<String> {
    let Ok(selector) = Selector::parse(MAIN_IMAGE_SELECTOR) else {
        return None;
    };
    html.select(&selector)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_owned)
}

/// Feature bullets in page order.
///
/// Items of [`MIN_BULLET_CHARS`] characters or fewer, and items containing
/// the [`BULLET_BOILERPLATE`] phrase, are dropped. `None` when nothing
/// survives the filter.
fn feature_bullets(html: &Html) -> Option<Vec<String>> {
    let Ok(selector) = Selector::parse(BULLET_SELECTOR) else {
        return None;
    };
    let bullets: Vec<String> = html
        .select(&selector)
        .map(|li| element_text(&li))
        .filter(|text| text.chars().count() > MIN_BULLET_CHARS && !text.contains(BULLET_BOILERPLATE))
        .collect();
    (!bullets.is_empty()).then_some(bullets)
}

/// Kindle edition details. Always constructed; `available` is simply
/// whether a Kindle price element exists.
fn kindle_info(page: &ProductPage) -> KindleInfo {
    let price = first_selector_text(&page.html, "kindle", &[KINDLE_PRICE_SELECTOR]);
    KindleInfo {
        available: price.is_some(),
        price,
        file_size: first_capture(&page.text, &[&KINDLE_FILE_SIZE]),
    }
}

// ---------------------------------------------------------------------------
// Visible text
// ---------------------------------------------------------------------------

/// Collects the page's visible body text, the haystack for all text
/// patterns. Script, style and template contents are excluded so that
/// embedded JSON cannot satisfy a pattern the rendered page does not show.
fn visible_text(html: &Html) -> String {
    let Ok(body) = Selector::parse("body") else {
        return String::new();
    };
    let mut out = String::new();
    if let Some(body) = html.select(&body).next() {
        push_visible_text(body, &mut out);
    }
    out
}

fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    if !out.is_empty() {
                        out.push(' ');
                    }
                    out.push_str(trimmed);
                }
            }
            Node::Element(el) => {
                if matches!(el.name(), "script" | "style" | "noscript" | "template") {
                    continue;
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    push_visible_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
