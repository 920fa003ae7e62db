use super::*;

fn client_with_credentials() -> WooClient {
    WooClient::new(
        "https://shop.example.com",
        Some(WooCredentials {
            consumer_key: "ck_abc".into(),
            consumer_secret: "cs_def".into(),
        }),
        5,
        "glowcart-test/0.1",
    )
    .unwrap()
}

#[test]
fn products_url_includes_paging_and_credentials() {
    let client = client_with_credentials();
    let url = client.products_url(&CategoryQuery::default(), 1).unwrap();
    assert_eq!(
        url.as_str(),
        "https://shop.example.com/wp-json/wc/v3/products?per_page=100&page=1&consumer_key=ck_abc&consumer_secret=cs_def"
    );
}

#[test]
fn products_url_encodes_category_filters() {
    let client = client_with_credentials().with_paging(20, 1);
    let query = CategoryQuery {
        orderby: Some("date".into()),
        order: Some("desc".into()),
        category: Some(17),
        tag: None,
        search: Some("sun screen".into()),
        per_page: None,
    };
    let url = client.products_url(&query, 2).unwrap();
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("per_page".into(), "20".into())));
    assert!(pairs.contains(&("page".into(), "2".into())));
    assert!(pairs.contains(&("orderby".into(), "date".into())));
    assert!(pairs.contains(&("order".into(), "desc".into())));
    assert!(pairs.contains(&("category".into(), "17".into())));
    assert!(pairs.contains(&("search".into(), "sun screen".into())));
    assert!(!pairs.iter().any(|(k, _)| k == "tag"));
}

#[test]
fn query_per_page_overrides_client_default() {
    let client = client_with_credentials();
    let query = CategoryQuery {
        per_page: Some(6),
        ..CategoryQuery::default()
    };
    let url = client.products_url(&query, 1).unwrap();
    assert!(url.as_str().contains("per_page=6"));
}

#[test]
fn products_url_without_credentials_has_no_auth_params() {
    let client = WooClient::new("https://shop.example.com", None, 5, "ua").unwrap();
    let url = client.products_url(&CategoryQuery::default(), 1).unwrap();
    assert!(!url.as_str().contains("consumer_key"));
}

#[test]
fn strip_query_hides_credentials() {
    let client = client_with_credentials();
    let url = client.products_url(&CategoryQuery::default(), 1).unwrap();
    let shown = strip_query(&url);
    assert_eq!(shown, "https://shop.example.com/wp-json/wc/v3/products");
}

#[test]
fn with_paging_clamps_to_upstream_limits() {
    let client = client_with_credentials().with_paging(1_000, 0);
    assert_eq!(client.per_page, 100);
    assert_eq!(client.max_pages, 1);

    let client = client_with_credentials().with_paging(0, 500);
    assert_eq!(client.per_page, 1);
    assert_eq!(client.max_pages, MAX_PAGES);
}

#[test]
fn credentials_debug_is_redacted() {
    let creds = WooCredentials {
        consumer_key: "ck_live".into(),
        consumer_secret: "cs_live".into(),
    };
    let debug = format!("{creds:?}");
    assert!(!debug.contains("ck_live"));
    assert!(!debug.contains("cs_live"));
}

#[test]
fn new_rejects_relative_base() {
    let result = WooClient::new("/wp-json", None, 5, "ua");
    assert!(matches!(result, Err(WooError::InvalidBaseUrl { .. })));
}
