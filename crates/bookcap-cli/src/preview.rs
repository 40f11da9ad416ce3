//! Human-readable capture summary printed after a successful capture.
//!
//! Labels are Spanish to match the dashboard the records feed. Zero-valued
//! numerics render as `N/A` so a thin capture reads as "not found" rather
//! than as a real zero.

use bookcap_core::CaptureRecord;

/// Characters of the title shown before truncation.
const TITLE_PREVIEW_CHARS: usize = 40;

#[must_use]
pub fn render(record: &CaptureRecord) -> String {
    let title = truncate(&record.title, TITLE_PREVIEW_CHARS);
    let price = if record.price > 0.0 {
        format!("{}{}", record.currency, record.price)
    } else {
        "N/A".to_owned()
    };
    let rating = if record.rating > 0.0 {
        format!("{} ({} reviews)", record.rating, record.reviews)
    } else {
        "N/A".to_owned()
    };
    let bsr = if record.bsr > 0 {
        format!("#{}", record.bsr)
    } else {
        "N/A".to_owned()
    };
    let pages = if record.page_count > 0 {
        record.page_count.to_string()
    } else {
        "N/A".to_owned()
    };
    let published = if record.publication_date.is_empty() {
        "N/A"
    } else {
        &record.publication_date
    };

    format!(
        "Título: {title}\n\
         Autor: {author}\n\
         Precio: {price}\n\
         Rating: {rating}\n\
         BSR: {bsr}\n\
         Páginas: {pages}\n\
         Publicado: {published}\n\
         ASIN: {asin}",
        author = record.author,
        asin = record.asin,
    )
}

/// Truncates to `max_chars` characters with a `...` marker, leaving short
/// strings untouched.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    } else {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn record() -> CaptureRecord {
        CaptureRecord {
            asin: "1609618955".to_owned(),
            title: "Mindfulness".to_owned(),
            author: "Jon Kabat-Zinn".to_owned(),
            cover_url: String::new(),
            bsr: 12_345,
            bsr_category: "Books".to_owned(),
            price: 9.0,
            currency: "$".to_owned(),
            reviews: 2300,
            rating: 4.6,
            page_count: 320,
            publication_date: "June 1, 2021".to_owned(),
            publisher: String::new(),
            language: String::new(),
            isbn: String::new(),
            format: String::new(),
            categories: vec![],
            description: String::new(),
            bullets: vec![],
            captured_at: Utc::now(),
            url: "https://www.amazon.com/dp/1609618955".to_owned(),
        }
    }

    #[test]
    fn renders_populated_fields() {
        let text = render(&record());
        assert!(text.contains("Título: Mindfulness"));
        assert!(text.contains("Precio: $9"));
        assert!(text.contains("Rating: 4.6 (2300 reviews)"));
        assert!(text.contains("BSR: #12345"));
        assert!(text.contains("Páginas: 320"));
        assert!(text.contains("ASIN: 1609618955"));
    }

    #[test]
    fn zero_numerics_render_as_not_available() {
        let mut r = record();
        r.price = 0.0;
        r.rating = 0.0;
        r.bsr = 0;
        r.page_count = 0;
        r.publication_date = String::new();
        let text = render(&r);
        assert!(text.contains("Precio: N/A"));
        assert!(text.contains("Rating: N/A"));
        assert!(text.contains("BSR: N/A"));
        assert!(text.contains("Páginas: N/A"));
        assert!(text.contains("Publicado: N/A"));
    }

    #[test]
    fn long_titles_are_truncated_with_marker() {
        let mut r = record();
        r.title = "A".repeat(60);
        let text = render(&r);
        assert!(text.contains(&format!("Título: {}...", "A".repeat(40))));
    }

    #[test]
    fn short_titles_are_untouched() {
        let text = render(&record());
        assert!(!text.contains("Mindfulness..."));
    }
}
