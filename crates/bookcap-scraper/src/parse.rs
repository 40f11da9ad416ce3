//! Numeric and pattern coercion for text pulled off a product page.
//!
//! Price-like strings arrive with currency symbols and thousands separators
//! (`"$1,234.50"`), ratings as sentences (`"4.5 out of 5 stars"`), and rank
//! and series data as free text. Each function reduces one of those shapes
//! to a typed value, returning `None` when the governing pattern does not
//! match. See [`crate::extract`] for how these compose per field.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{BestSellerRank, SeriesInfo};

static PRICE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d,]+\.?\d*").expect("valid price regex"));

static RATING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d\.?\d*) out of").expect("valid rating regex"));

static REVIEW_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d,]+) rating").expect("valid review-count regex"));

static BSR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([\d,]+) in ([^(]+)").expect("valid rank regex"));

static SERIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Book (\d+) of (\d+)[:\s]*([^(]+)").expect("valid series regex"));

/// Reduces a price-like string to its first embedded numeric token.
///
/// Thousands separators are stripped before parsing, so `"$1,234.50"`
/// becomes `1234.50`. Idempotent on already-clean numeric strings:
/// `"19.99"` stays `19.99`.
#[must_use]
pub(crate) fn parse_price(text: &str) -> Option<f64> {
    let token = PRICE_TOKEN.find(text)?;
    token.as_str().replace(',', "").parse::<f64>().ok()
}

/// Parses an average star rating from text like `"4.5 out of 5 stars"`.
#[must_use]
pub(crate) fn parse_rating(text: &str) -> Option<f64> {
    let caps = RATING.captures(text)?;
    caps[1].parse::<f64>().ok()
}

/// Parses a review count from text like `"2,300 ratings"`.
///
/// The pattern matches the singular prefix, so both `"1 rating"` and
/// `"2,300 ratings"` are accepted.
#[must_use]
pub(crate) fn parse_review_count(text: &str) -> Option<u32> {
    let caps = REVIEW_COUNT.captures(text)?;
    caps[1].replace(',', "").parse::<u32>().ok()
}

/// Parses a best-sellers rank pair from text like
/// `"#12,345 in Books (See Top 100 in Books)"`.
///
/// Rank and category come from a single match: if the pattern fails, both
/// are absent — never a partial fill.
#[must_use]
pub(crate) fn parse_bsr(text: &str) -> Option<BestSellerRank> {
    let caps = BSR.captures(text)?;
    let rank = caps[1].replace(',', "").parse::<u32>().ok()?;
    Some(BestSellerRank {
        rank,
        category: caps[2].trim().to_owned(),
    })
}

/// Parses a series triple from text like `"Book 2 of 7: The Dark Tower"`.
///
/// All three fields come from a single match; a partial fill never occurs.
#[must_use]
pub(crate) fn parse_series(text: &str) -> Option<SeriesInfo> {
    let caps = SERIES.captures(text)?;
    let book_number = caps[1].parse::<u32>().ok()?;
    let total_books = caps[2].parse::<u32>().ok()?;
    Some(SeriesInfo {
        book_number,
        total_books,
        series_name: caps[3].trim().to_owned(),
    })
}

/// Returns the first trimmed capture of the first pattern in `patterns`
/// that matches `text`. Patterns are tried strictly in listed order.
#[must_use]
pub(crate) fn first_capture(text: &str, patterns: &[&LazyLock<Regex>]) -> Option<String> {
    for pattern in patterns {
        if let Some(caps) = pattern.captures(text) {
            if let Some(group) = caps.get(1) {
                let trimmed = group.as_str().trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_owned());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // parse_price
    // -----------------------------------------------------------------------

    #[test]
    fn price_clean_numeric_is_idempotent() {
        assert_eq!(parse_price("19.99"), Some(19.99));
    }

    #[test]
    fn price_strips_currency_symbol() {
        assert_eq!(parse_price("$9.00"), Some(9.0));
    }

    #[test]
    fn price_strips_thousands_separators() {
        assert_eq!(parse_price("1,234.50"), Some(1234.50));
    }

    #[test]
    fn price_takes_first_token_when_range_shown() {
        assert_eq!(parse_price("$12.99 - $15.99"), Some(12.99));
    }

    #[test]
    fn price_whole_number_without_decimals() {
        assert_eq!(parse_price("$25"), Some(25.0));
    }

    #[test]
    fn price_no_digits_returns_none() {
        assert_eq!(parse_price("Currently unavailable"), None);
    }

    // -----------------------------------------------------------------------
    // parse_rating
    // -----------------------------------------------------------------------

    #[test]
    fn rating_standard_sentence() {
        assert_eq!(parse_rating("4.5 out of 5 stars"), Some(4.5));
    }

    #[test]
    fn rating_integer_value() {
        assert_eq!(parse_rating("5 out of 5 stars"), Some(5.0));
    }

    #[test]
    fn rating_non_matching_text_returns_none() {
        assert_eq!(parse_rating("five stars"), None);
    }

    // -----------------------------------------------------------------------
    // parse_review_count
    // -----------------------------------------------------------------------

    #[test]
    fn review_count_with_thousands_separator() {
        assert_eq!(parse_review_count("2,300 ratings"), Some(2300));
    }

    #[test]
    fn review_count_singular() {
        assert_eq!(parse_review_count("1 rating"), Some(1));
    }

    #[test]
    fn review_count_no_match_returns_none() {
        assert_eq!(parse_review_count("No customer reviews"), None);
    }

    // -----------------------------------------------------------------------
    // parse_bsr
    // -----------------------------------------------------------------------

    #[test]
    fn bsr_rank_and_category_from_one_match() {
        let bsr = parse_bsr("#12,345 in Books (See Top 100 in Books)").unwrap();
        assert_eq!(bsr.rank, 12_345);
        assert_eq!(bsr.category, "Books");
    }

    #[test]
    fn bsr_category_is_trimmed() {
        let bsr = parse_bsr("#9 in Self-Help ").unwrap();
        assert_eq!(bsr.rank, 9);
        assert_eq!(bsr.category, "Self-Help");
    }

    #[test]
    fn bsr_all_or_nothing_on_miss() {
        assert_eq!(parse_bsr("Best Sellers Rank: none listed"), None);
    }

    // -----------------------------------------------------------------------
    // parse_series
    // -----------------------------------------------------------------------

    #[test]
    fn series_triple_from_one_match() {
        let series = parse_series("Book 2 of 7: The Dark Tower").unwrap();
        assert_eq!(series.book_number, 2);
        assert_eq!(series.total_books, 7);
        assert_eq!(series.series_name, "The Dark Tower");
    }

    #[test]
    fn series_name_stops_at_parenthesis() {
        let series = parse_series("Book 1 of 3: Mistborn (The Mistborn Saga)").unwrap();
        assert_eq!(series.series_name, "Mistborn");
    }

    #[test]
    fn series_case_insensitive() {
        assert!(parse_series("book 1 of 2: Dune").is_some());
    }

    #[test]
    fn series_all_or_nothing_on_miss() {
        assert_eq!(parse_series("Part of a great series"), None);
    }
}
