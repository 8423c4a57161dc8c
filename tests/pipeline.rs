//! End-to-end behaviour of the request pipeline against mock HTTP origins.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gemini_web_gateway::convert::{ConversionError, ConversionOptions, MarkupConverter};
use gemini_web_gateway::gemini::Status;
use gemini_web_gateway::proxy::transform::footer;
use gemini_web_gateway::RequestHandler;
use url::Url;

mod common;
use common::{request, test_config, MockResponse};

fn body_text(response: &gemini_web_gateway::GeminiResponse) -> String {
    String::from_utf8(response.body().expect("body").as_bytes().to_vec()).unwrap()
}

#[tokio::test]
async fn html_is_converted_with_footer() {
    let addr = common::start_routed_backend(|_| MockResponse::html("<p>Hi</p>")).await;
    let url = format!("http://{addr}/");

    let handler = RequestHandler::new(&test_config());
    let response = handler.handle(&request(&url)).await;

    assert_eq!(response.status(), Status::Success);
    assert_eq!(response.meta(), "text/gemini");
    let text = body_text(&response);
    let expected_footer = footer(&Url::parse(&url).unwrap());
    assert_eq!(text, format!("Hi{expected_footer}"));
    assert_eq!(text.matches(&format!("=> {url} Source page")).count(), 1);
}

#[tokio::test]
async fn non_html_is_byte_identical() {
    let payload: Vec<u8> = (0u8..=255).collect();
    let body = payload.clone();
    let addr = common::start_routed_backend(move |_| {
        MockResponse::new(200, body.clone()).header("Content-Type", "application/octet-stream")
    })
    .await;

    let handler = RequestHandler::new(&test_config());
    let response = handler.handle(&request(&format!("http://{addr}/blob"))).await;

    assert_eq!(response.status(), Status::Success);
    assert_eq!(response.meta(), "application/octet-stream");
    assert_eq!(response.body().unwrap().as_bytes(), &payload[..]);
}

#[tokio::test]
async fn unfiltered_passes_html_through() {
    let addr = common::start_routed_backend(|_| MockResponse::html("<p>Hi</p>")).await;

    let mut config = test_config();
    config.conversion.unfiltered = true;
    let handler = RequestHandler::new(&config);
    let response = handler.handle(&request(&format!("http://{addr}/"))).await;

    assert_eq!(response.status(), Status::Success);
    assert_eq!(response.meta(), "text/html; charset=utf-8");
    assert_eq!(body_text(&response), "<p>Hi</p>");
}

#[tokio::test]
async fn redirect_is_reported_not_followed() {
    let addr = common::start_routed_backend(|path| match path {
        "/start" => MockResponse::new(302, "").header("Location", "/final"),
        _ => MockResponse::html("<p>final</p>"),
    })
    .await;

    let handler = RequestHandler::new(&test_config());
    let response = handler.handle(&request(&format!("http://{addr}/start"))).await;

    assert_eq!(response.status().code(), 30);
    assert_eq!(response.meta(), format!("http://{addr}/final"));
    assert!(response.body().is_none());
}

#[tokio::test]
async fn not_found_maps_to_51() {
    let addr = common::start_routed_backend(|_| MockResponse::new(404, "gone")).await;

    let handler = RequestHandler::new(&test_config());
    let response = handler.handle(&request(&format!("http://{addr}/missing"))).await;

    assert_eq!(response.status().code(), 51);
    assert_eq!(response.meta(), "Not found");
    assert!(response.body().is_none());
}

#[tokio::test]
async fn other_statuses_map_to_50_with_status_text() {
    let addr = common::start_routed_backend(|path| match path {
        "/teapot" => MockResponse::new(418, ""),
        _ => MockResponse::new(500, "boom"),
    })
    .await;
    let handler = RequestHandler::new(&test_config());

    let response = handler.handle(&request(&format!("http://{addr}/"))).await;
    assert_eq!(response.status().code(), 50);
    assert_eq!(response.meta(), "Failure: HTTP status: 500 Internal Server Error");

    let response = handler.handle(&request(&format!("http://{addr}/teapot"))).await;
    assert_eq!(response.status().code(), 50);
    assert!(response.meta().contains("418"));
}

#[tokio::test]
async fn failure_meta_keeps_upstream_reason_phrase() {
    let addr = common::start_routed_backend(|_| {
        MockResponse::new(503, "").reason("Down for maintenance")
    })
    .await;

    let handler = RequestHandler::new(&test_config());
    let response = handler.handle(&request(&format!("http://{addr}/"))).await;

    assert_eq!(response.status().code(), 50);
    assert_eq!(response.meta(), "Failure: HTTP status: 503 Down for maintenance");
}

#[tokio::test]
async fn overlong_redirect_target_is_refused() {
    let long_path = format!("/{}", "a".repeat(1100));
    let target = long_path.clone();
    let addr = common::start_routed_backend(move |path| match path {
        "/start" => MockResponse::new(302, "").header("Location", &target),
        _ => MockResponse::html("<p>final</p>"),
    })
    .await;

    let handler = RequestHandler::new(&test_config());
    let response = handler.handle(&request(&format!("http://{addr}/start"))).await;

    assert_eq!(response.status().code(), 43);
    assert!(response.meta().starts_with("Redirect target too long"));
    assert!(!response.meta().contains(&long_path));
}

#[tokio::test]
async fn refused_connection_is_43() {
    let addr = common::refused_addr().await;

    let handler = RequestHandler::new(&test_config());
    let response = handler.handle(&request(&format!("http://{addr}/"))).await;

    assert_eq!(response.status().code(), 43);
    assert_eq!(response.meta(), "Remote host did not respond with valid HTTP");
    assert!(response.body().is_none());
}

#[tokio::test]
async fn stalled_download_is_abandoned() {
    let addr = common::start_stalling_backend(Duration::from_secs(5)).await;
    let url = format!("http://{addr}/");

    let handler = RequestHandler::new(&test_config());
    let started = std::time::Instant::now();
    let response = handler.handle(&request(&url)).await;

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(response.status().code(), 43);
    assert_eq!(response.meta(), format!("Download abandoned after 1 seconds: {url}"));
}

#[tokio::test]
async fn deeply_nested_html_is_42() {
    let html = format!("{}x{}", "<div>".repeat(2000), "</div>".repeat(2000));
    let addr = common::start_routed_backend(move |_| MockResponse::html(&html)).await;

    let handler = RequestHandler::new(&test_config());
    let response = handler.handle(&request(&format!("http://{addr}/"))).await;

    assert_eq!(response.status().code(), 42);
    assert_eq!(response.meta(), "HTML to GMI conversion failure");
}

struct Rejecting;

impl MarkupConverter for Rejecting {
    fn convert(&self, _: &str, _: &ConversionOptions) -> Result<String, ConversionError> {
        Err(ConversionError::NestingTooDeep { limit: 0 })
    }
}

#[tokio::test]
async fn converter_failure_is_42_but_non_html_unaffected() {
    let addr = common::start_routed_backend(|path| match path {
        "/page" => MockResponse::html("<p>ok</p>"),
        _ => MockResponse::new(200, "plain").header("Content-Type", "text/plain"),
    })
    .await;

    let handler = RequestHandler::with_converter(&test_config(), Arc::new(Rejecting));

    let response = handler.handle(&request(&format!("http://{addr}/page"))).await;
    assert_eq!(response.status().code(), 42);

    let response = handler.handle(&request(&format!("http://{addr}/text"))).await;
    assert_eq!(response.status().code(), 20);
    assert_eq!(body_text(&response), "plain");
}

#[tokio::test]
async fn user_agent_sent_only_when_configured() {
    let seen = Arc::new(AtomicU32::new(0));
    let counter = seen.clone();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => head.extend_from_slice(&buf[..n]),
                }
            }
            let head = String::from_utf8_lossy(&head).to_ascii_lowercase();
            if head.contains("user-agent: gateway-test/1") {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .await;
            let _ = socket.shutdown().await;
        }
    });

    let url = format!("http://{addr}/");
    RequestHandler::new(&test_config()).handle(&request(&url)).await;
    assert_eq!(seen.load(Ordering::SeqCst), 0);

    let mut config = test_config();
    config.http.user_agent = "gateway-test/1".into();
    let response = RequestHandler::new(&config).handle(&request(&url)).await;
    assert_eq!(response.status().code(), 20);
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unsupported_scheme_never_fetches() {
    let handler = RequestHandler::new(&test_config());
    let response = handler.handle(&request("gemini://example.com/")).await;
    assert_eq!(response.status().code(), 53);
    assert_eq!(response.meta(), "Scheme not supported: gemini");
}
