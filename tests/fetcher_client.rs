use pagesense::fetcher::{Charset, FetchError, fetch};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header_regex, method, path},
};

#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(
                    "<html><head><title>Test</title></head><body>Hello World</body></html>"
                        .as_bytes(),
                )
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/test", mock_server.uri());
    let result = fetch(&url).await.unwrap();

    assert!(result.status.is_success());
    assert!(result.body_html.contains("Hello World"));
    assert_eq!(result.charset, Charset::Utf8);
    assert_eq!(result.url_final.as_str(), url);
}

#[tokio::test]
async fn test_fetch_sends_browser_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header_regex("user-agent", "Mozilla/5.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>ok</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/ua", mock_server.uri());
    assert!(fetch(&url).await.is_ok());
}

#[tokio::test]
async fn test_fetch_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notfound"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = format!("{}/notfound", mock_server.uri());
    let err = fetch(&url).await.unwrap_err();

    assert!(matches!(err, FetchError::HttpStatus(status) if status.as_u16() == 404));
    assert_eq!(err.to_string(), "URL returned status code 404");
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_fetch_500() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/error", mock_server.uri());
    let err = fetch(&url).await.unwrap_err();

    assert_eq!(err.to_string(), "URL returned status code 500");
}

#[tokio::test]
async fn test_fetch_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/redirect"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/final"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes("<html><body>Final page</body></html>".as_bytes())
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/redirect", mock_server.uri());
    let result = fetch(&url).await.unwrap();

    assert!(result.status.is_success());
    assert!(result.body_html.contains("Final page"));
    assert!(result.url_final.as_str().ends_with("/final"));
}

#[tokio::test]
async fn test_fetch_gzip_compression() {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let original_content =
        "<html><head><title>Compressed</title></head><body>This content is gzipped!</body></html>";

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(original_content.as_bytes()).unwrap();
    let compressed_data = encoder.finish().unwrap();

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gzipped"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(compressed_data)
                .insert_header("Content-Type", "text/html; charset=utf-8")
                .insert_header("Content-Encoding", "gzip"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/gzipped", mock_server.uri());
    let result = fetch(&url).await.unwrap();

    assert!(result.body_html.contains("This content is gzipped!"));
}

#[tokio::test]
async fn test_fetch_decodes_legacy_charset() {
    let mock_server = MockServer::start().await;

    // "café" in windows-1252
    let body = b"<html><body><p>caf\xe9</p></body></html>".to_vec();

    Mock::given(method("GET"))
        .and(path("/latin"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body)
                .insert_header("Content-Type", "text/html; charset=windows-1252"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/latin", mock_server.uri());
    let result = fetch(&url).await.unwrap();

    assert_eq!(result.charset, Charset::Windows1252);
    assert!(result.body_html.contains("café"));
}

#[tokio::test]
async fn test_fetch_body_too_large() {
    let mock_server = MockServer::start().await;

    let large_body = "x".repeat(6 * 1024 * 1024);

    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(large_body.as_bytes())
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/large", mock_server.uri());
    let result = fetch(&url).await;

    match result {
        Err(FetchError::BodyTooLarge(size)) => assert_eq!(size, 6 * 1024 * 1024),
        other => panic!("Expected BodyTooLarge error, got {:?}", other.map(|r| r.status)),
    }
}

#[tokio::test]
async fn test_fetch_connection_refused_is_transport_error() {
    // Bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = fetch(&format!("http://127.0.0.1:{}/", port)).await.unwrap_err();

    assert!(err.is_transport());
    assert!(err.to_string().starts_with("Request error: "));
}
