//! Integration tests for `CaptureClient`.
//!
//! Uses `wiremock` to stand up a local HTTP server per test so no real
//! network traffic is made. Covers both directions of a capture — page
//! fetch and record submission — plus the retry policy around them.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bookcap_scraper::{extract, to_capture, CaptureClient, RawProduct, ScrapeError};

/// Builds a `CaptureClient` suitable for tests: short timeout, descriptive
/// UA, no retries.
fn test_client() -> CaptureClient {
    CaptureClient::new(5, "bookcap-test/0.1", 0, 0).expect("failed to build test CaptureClient")
}

/// Builds a `CaptureClient` with retries enabled and zero backoff.
fn test_client_with_retries(max_retries: u32) -> CaptureClient {
    CaptureClient::new(5, "bookcap-test/0.1", max_retries, 0)
        .expect("failed to build test CaptureClient")
}

fn sample_record() -> bookcap_core::CaptureRecord {
    let mut raw = RawProduct::empty("https://www.amazon.com/dp/1609618955");
    raw.asin = Some("1609618955".to_owned());
    raw.title = Some("Mindfulness".to_owned());
    raw.price = Some(9.0);
    to_capture(raw)
}

// ---------------------------------------------------------------------------
// submit_capture
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_posts_record_as_json_and_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/capture"))
        .and(body_partial_json(json!({
            "asin": "1609618955",
            "title": "Mindfulness",
            "price": 9.0,
            "currency": "$",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/v1/capture", server.uri());
    test_client()
        .submit_capture(&url, &sample_record())
        .await
        .unwrap();
}

#[tokio::test]
async fn submit_not_found_is_typed_and_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/capture"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/v1/capture", server.uri());
    let err = test_client_with_retries(3)
        .submit_capture(&url, &sample_record())
        .await
        .unwrap_err();
    assert!(matches!(err, ScrapeError::NotFound { .. }));
}

#[tokio::test]
async fn submit_retries_rate_limit_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/capture"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/capture"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/v1/capture", server.uri());
    test_client_with_retries(1)
        .submit_capture(&url, &sample_record())
        .await
        .unwrap();
}

#[tokio::test]
async fn submit_rate_limit_without_retries_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/capture"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "17"))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/v1/capture", server.uri());
    let err = test_client()
        .submit_capture(&url, &sample_record())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ScrapeError::RateLimited {
            retry_after_secs: 17,
            ..
        }
    ));
}

#[tokio::test]
async fn submit_server_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/capture"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/v1/capture", server.uri());
    let err = test_client_with_retries(3)
        .submit_capture(&url, &sample_record())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ScrapeError::UnexpectedStatus { status: 500, .. }
    ));
}

// ---------------------------------------------------------------------------
// fetch_page
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_page_returns_html_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/1609618955"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><span id=\"productTitle\">Hi</span></body></html>"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/dp/1609618955", server.uri());
    let body = test_client().fetch_page(&url).await.unwrap();
    assert!(body.contains("productTitle"));
}

#[tokio::test]
async fn fetch_page_not_found_is_typed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B000000000"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/dp/B000000000", server.uri());
    let err = test_client().fetch_page(&url).await.unwrap_err();
    assert!(matches!(err, ScrapeError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// Fetch → extract → normalize, end to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetched_page_flows_through_extraction_and_normalization() {
    let server = MockServer::start().await;

    let html = r#"<html><body>
        <span id="productTitle">Mindfulness</span>
        <span class="a-price"><span class="a-offscreen">$9.00</span></span>
        <span>Best Sellers Rank: #12,345 in Books (See Top 100)</span>
    </body></html>"#;

    Mock::given(method("GET"))
        .and(path("/dp/1609618955"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&server)
        .await;

    let url = format!("{}/dp/1609618955", server.uri());
    let body = test_client().fetch_page(&url).await.unwrap();
    let record = to_capture(extract(&body, &url));

    assert_eq!(record.asin, "1609618955");
    assert!(record.has_identifier());
    assert_eq!(record.title, "Mindfulness");
    assert_eq!(record.price, 9.0);
    assert_eq!(record.bsr, 12_345);
    assert_eq!(record.bsr_category, "Books");
}
