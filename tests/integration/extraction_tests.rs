//! End-to-end extraction tests against mock storefronts

use shopscope::config::Config;
use shopscope::{extract_brand, extract_many, ShopscopeError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> Config {
    let mut config = Config::default();
    config.fetch.retries = 0;
    config.fetch.timeout_secs = 5;
    config
}

fn html_response(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.into())
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn json_response(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.into())
        .insert_header("content-type", "application/json")
}

fn feed_page(products: &[(&str, &str)]) -> String {
    let items: Vec<String> = products
        .iter()
        .map(|(handle, price)| {
            format!(
                r#"{{"id": 1, "title": "{handle}", "handle": "{handle}",
                     "variants": [{{"price": "{price}"}}]}}"#
            )
        })
        .collect();
    format!(r#"{{"products": [{}]}}"#, items.join(","))
}

#[tokio::test]
async fn test_acme_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><head><title>Acme Co | Home</title></head>
            <body>
            <a href="/policies/privacy-policy">Privacy</a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("page", "1"))
        .respond_with(json_response(feed_page(&[
            ("widget", "19.99"),
            ("gadget", "19.99"),
            ("doodad", "19.99"),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/policies/privacy-policy"))
        .respond_with(html_response(
            "<html><body><main>We respect your privacy.</main></body></html>",
        ))
        .mount(&server)
        .await;

    let record = extract_brand(&server.uri(), &test_config()).await.unwrap();

    assert_eq!(record.website_url, server.uri());
    assert_eq!(record.brand_name.as_deref(), Some("Acme Co"));

    let privacy = record.privacy_policy.expect("privacy policy resolved");
    assert_eq!(
        privacy.url.as_deref(),
        Some(format!("{}/policies/privacy-policy", server.uri()).as_str())
    );
    assert_eq!(privacy.content_text.as_deref(), Some("We respect your privacy."));

    assert_eq!(record.product_catalog.len(), 3);
    for product in &record.product_catalog {
        assert_eq!(product.price_range.as_deref(), Some("19.99"));
    }
    assert_eq!(
        record.product_catalog[0].url.as_deref(),
        Some("/products/widget")
    );

    assert_eq!(
        record.important_links.privacy.as_deref(),
        Some(format!("{}/policies/privacy-policy", server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_unreachable_root_aborts_before_any_subfetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = extract_brand(&server.uri(), &test_config()).await.unwrap_err();
    assert!(matches!(err, ShopscopeError::UnreachableSite { .. }));

    // The gate fails before any extraction work: exactly one request
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_pagination_stops_after_short_first_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response("<html><body></body></html>"))
        .mount(&server)
        .await;

    let mut config = test_config();
    config.feed.page_limit = 5;

    // Three products with a page limit of five: the feed's last page
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("page", "1"))
        .respond_with(json_response(feed_page(&[
            ("a", "1.00"),
            ("b", "2.00"),
            ("c", "3.00"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("page", "2"))
        .respond_with(json_response(feed_page(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let record = extract_brand(&server.uri(), &config).await.unwrap();
    assert_eq!(record.product_catalog.len(), 3);
}

#[tokio::test]
async fn test_pagination_continues_through_full_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response("<html><body></body></html>"))
        .mount(&server)
        .await;

    let mut config = test_config();
    config.feed.page_limit = 2;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("page", "1"))
        .respond_with(json_response(feed_page(&[("a", "1.00"), ("b", "2.00")])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("page", "2"))
        .respond_with(json_response(feed_page(&[("c", "3.00")])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("page", "3"))
        .respond_with(json_response(feed_page(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let record = extract_brand(&server.uri(), &config).await.unwrap();
    assert_eq!(record.product_catalog.len(), 3);
}

#[tokio::test]
async fn test_malformed_feed_page_keeps_gathered_products() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response("<html><body></body></html>"))
        .mount(&server)
        .await;

    let mut config = test_config();
    config.feed.page_limit = 1;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("page", "1"))
        .respond_with(json_response(feed_page(&[("a", "1.00")])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("page", "2"))
        .respond_with(json_response(r#"{"products": [oops"#))
        .mount(&server)
        .await;

    let record = extract_brand(&server.uri(), &config).await.unwrap();
    assert_eq!(record.product_catalog.len(), 1);
}

#[tokio::test]
async fn test_homepage_jsonld_faqs_short_circuit_the_chain() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><head>
            <script type="application/ld+json">
            {"@type": "FAQPage", "mainEntity": [
              {"name": "Do you ship?", "acceptedAnswer": {"text": "Yes."}}
            ]}
            </script></head>
            <body>
            <a href="/pages/faq">FAQ</a>
            <h2>Heading that must not become a FAQ</h2>
            <p>Sibling text.</p>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    // Structured data on the homepage wins; the FAQ page is never fetched
    Mock::given(method("GET"))
        .and(path("/pages/faq"))
        .respond_with(html_response("<html></html>"))
        .expect(0)
        .mount(&server)
        .await;

    let record = extract_brand(&server.uri(), &test_config()).await.unwrap();
    assert_eq!(record.faqs.len(), 1);
    assert_eq!(record.faqs[0].question, "Do you ship?");
    assert_eq!(record.faqs[0].answer, "Yes.");
}

#[tokio::test]
async fn test_faq_page_jsonld_used_when_homepage_has_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body><a href="/pages/faq">FAQ</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    let long_answer = "All orders ship within two business days. ".repeat(30);
    Mock::given(method("GET"))
        .and(path("/pages/faq"))
        .respond_with(html_response(format!(
            r#"<html><head>
            <script type="application/ld+json">
            {{"@type": "FAQPage", "mainEntity": [
              {{"name": "Shipping?", "acceptedAnswer": {{"text": "{long_answer}"}}}}
            ]}}
            </script></head><body></body></html>"#
        )))
        .mount(&server)
        .await;

    let record = extract_brand(&server.uri(), &test_config()).await.unwrap();
    assert_eq!(record.faqs.len(), 1);
    // Structured answers are not capped at 600 characters
    assert!(record.faqs[0].answer.chars().count() > 600);
}

#[tokio::test]
async fn test_heading_fallback_when_no_structured_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body><a href="/pages/faq">FAQ</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pages/faq"))
        .respond_with(html_response(
            r#"<html><body>
            <h2>Do you ship internationally?</h2>
            <p>Yes, to over 40 countries.</p>
            <h3>Returns?</h3>
            <div>Within 30 days.</div>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let record = extract_brand(&server.uri(), &test_config()).await.unwrap();
    assert_eq!(record.faqs.len(), 2);
    assert_eq!(record.faqs[0].question, "Do you ship internationally?");
    assert_eq!(record.faqs[0].answer, "Yes, to over 40 countries.");
}

#[tokio::test]
async fn test_contact_social_hero_and_about_signals() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><head><title>Acme Co</title></head>
            <body>
            <a href="/pages/about-us">Our Story</a>
            <a href="/products/widget">Widget</a>
            <a href="/products/widget">Widget duplicate</a>
            <a href="/products/gadget">Gadget</a>
            <a href="https://instagram.com/acmeco">Instagram</a>
            <footer>
              support@acme.example — call +91 98765 43210 or 555-123-4567
            </footer>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let long_story = "We started in a garage. ".repeat(200);
    Mock::given(method("GET"))
        .and(path("/pages/about-us"))
        .respond_with(html_response(format!(
            "<html><body><nav>menu</nav><main>{long_story}</main></body></html>"
        )))
        .mount(&server)
        .await;

    let record = extract_brand(&server.uri(), &test_config()).await.unwrap();

    assert_eq!(record.contact_info.emails, vec!["support@acme.example".to_string()]);
    // Country-coded number canonicalized; the bare 10-digit run is dropped
    assert_eq!(record.contact_info.phones, vec!["+91-9876543210".to_string()]);

    assert_eq!(record.social_handles.instagram.as_deref(), Some("instagram.com/acmeco"));
    assert!(record.social_handles.facebook.is_none());

    assert_eq!(record.hero_products.len(), 2);
    assert_eq!(record.hero_products[0].url.as_deref(), Some("/products/widget"));

    let about = record.about_text.expect("about text extracted");
    assert_eq!(about.chars().count(), 2000);
    assert!(about.starts_with("We started in a garage."));
    assert!(!about.contains("menu"));

    assert_eq!(
        record.important_links.about.as_deref(),
        Some(format!("{}/pages/about-us", server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_subpage_failures_degrade_without_aborting() {
    let server = MockServer::start().await;

    // Homepage reachable but every sub-resource 404s
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><head><title>Sparse Store</title></head>
            <body><a href="/pages/about">About</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    let record = extract_brand(&server.uri(), &test_config()).await.unwrap();

    assert_eq!(record.brand_name.as_deref(), Some("Sparse Store"));
    assert!(record.about_text.is_none());
    assert!(record.privacy_policy.is_none());
    assert!(record.return_refund_policy.is_none());
    assert!(record.product_catalog.is_empty());
    assert!(record.faqs.is_empty());
}

#[tokio::test]
async fn test_policy_guess_used_when_no_link_discovered() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response("<html><body>No links here</body></html>"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/policies/refund-policy"))
        .respond_with(html_response(
            "<html><body><main>Refunds within 30 days.</main></body></html>",
        ))
        .mount(&server)
        .await;

    let record = extract_brand(&server.uri(), &test_config()).await.unwrap();

    let returns = record.return_refund_policy.expect("guessed refund policy");
    assert_eq!(
        returns.url.as_deref(),
        Some(format!("{}/policies/refund-policy", server.uri()).as_str())
    );
    assert_eq!(returns.content_text.as_deref(), Some("Refunds within 30 days."));

    // Privacy guess 404s: absent policy, not a failure
    assert!(record.privacy_policy.is_none());
    // Guessed routes never populate the discovered-link slots
    assert!(record.important_links.privacy.is_none());
    assert!(record.important_links.returns.is_none());
}

#[tokio::test]
async fn test_extract_many_isolates_failures_and_keeps_order() {
    let good = MockServer::start().await;
    let bad = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            "<html><head><title>Good Store</title></head><body></body></html>",
        ))
        .mount(&good)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&bad)
        .await;

    let urls = vec![bad.uri(), good.uri()];
    let results = extract_many(&urls, &test_config()).await;

    assert_eq!(results.len(), 2);
    assert!(matches!(
        results[0].as_ref().unwrap_err(),
        ShopscopeError::UnreachableSite { .. }
    ));
    let record = results[1].as_ref().unwrap();
    assert_eq!(record.brand_name.as_deref(), Some("Good Store"));
    assert_eq!(record.website_url, good.uri());
}
