//! End-to-end request flow tests against a local canned-response server

use std::net::SocketAddr;
use std::sync::Arc;

use assert_json_diff::assert_json_eq;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use google_translator::{
    RequestStyle, TranslateError, TranslationCache, Translator, TranslatorConfig,
};

/// Requests seen by the canned server, one entry per connection
type RequestLog = Arc<Mutex<Vec<String>>>;

/// Serve one canned JSON body per expected connection, recording each request
async fn serve_canned(listener: TcpListener, bodies: Vec<String>, log: RequestLog) {
    for body in bodies {
        let (mut stream, _) = listener.accept().await.expect("accept connection");
        let request = read_request(&mut stream).await;
        log.lock().await.push(request);

        let reply = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(reply.as_bytes()).await.expect("write reply");
        stream.shutdown().await.ok();
    }
}

/// Read a full HTTP request (head plus Content-Length body) as text
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    // Read until the end of the header block
    let header_end = loop {
        let n = stream.read(&mut chunk).await.expect("read request");
        assert!(n > 0, "connection closed before headers were complete");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    // Drain the body so the client never blocks on a half-read request
    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await.expect("read body");
        assert!(n > 0, "connection closed before body was complete");
        body.extend_from_slice(&chunk[..n]);
    }

    format!("{}{}", head, String::from_utf8_lossy(&body))
}

/// Spawn the canned server; returns its address, request log and join handle
async fn spawn_canned(bodies: Vec<serde_json::Value>) -> (SocketAddr, RequestLog, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let bodies: Vec<String> = bodies.into_iter().map(|b| b.to_string()).collect();
    let handle = tokio::spawn(serve_canned(listener, bodies, log.clone()));
    (addr, log, handle)
}

/// Configuration pointing both endpoints at the canned server
fn config_for(addr: SocketAddr) -> TranslatorConfig {
    TranslatorConfig {
        api_key: "test_key".to_string(),
        translate_url: format!("http://{}/translate", addr),
        detect_url: format!("http://{}/detect", addr),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_auto_detect_runs_once_and_feeds_translate() {
    let (addr, log, server) = spawn_canned(vec![
        json!({"data": {"detections": [[{"language": "en", "confidence": 0.96, "isReliable": false}]]}}),
        json!({"data": {"translations": [{"translatedText": "bonjour"}]}}),
    ])
    .await;

    let dir = tempfile::tempdir().unwrap();
    let cache = TranslationCache::at_storage_root(dir.path());
    let config = TranslatorConfig {
        target_lang: Some("fr".to_string()),
        ..config_for(addr)
    };
    let translator = Translator::new(config).unwrap().with_cache(cache.clone());

    let out = translator.translate("hello").await.unwrap();
    assert_eq!(out.as_deref(), Some("bonjour"));

    server.await.unwrap();
    let log = log.lock().await;
    assert_eq!(log.len(), 2, "one detect call and one translate call");
    assert!(log[0].starts_with("GET /detect?"));
    assert!(log[0].contains("key=test_key"));
    assert!(log[0].contains("q=hello"));
    assert!(log[1].starts_with("GET /translate?"));
    assert!(
        log[1].contains("source=en"),
        "detected language feeds the translate call"
    );
    assert!(log[1].contains("target=fr"));

    // The response was cached under the detected source language
    let stored = cache.lookup("en", "fr", "hello").await.unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn test_configured_source_skips_detection_and_posts_json() {
    let (addr, log, server) = spawn_canned(vec![
        json!({"data": {"translations": [{"translatedText": "hola"}]}}),
    ])
    .await;

    let config = TranslatorConfig {
        source_lang: Some("en".to_string()),
        target_lang: Some("es".to_string()),
        request_style: RequestStyle::JsonBody,
        ..config_for(addr)
    };
    let translator = Translator::new(config).unwrap();

    let out = translator.translate("hello").await.unwrap();
    assert_eq!(out.as_deref(), Some("hola"));

    server.await.unwrap();
    let log = log.lock().await;
    assert_eq!(
        log.len(),
        1,
        "no detect call when the source language is configured"
    );
    assert!(log[0].starts_with("POST /translate?key=test_key"));
    // The parameters travel in the JSON body, not in the query string
    assert!(log[0].contains(r#""q":"hello""#));
    assert!(log[0].contains(r#""source":"en""#));
    assert!(log[0].contains(r#""target":"es""#));
}

#[tokio::test]
async fn test_unrecognizable_detection_is_detection_error() {
    let (addr, _log, server) = spawn_canned(vec![json!({"data": {}})]).await;

    let translator = Translator::new(config_for(addr)).unwrap();
    let err = translator.detect("hello").await.unwrap_err();
    assert!(matches!(err, TranslateError::DetectionError { .. }));

    server.await.unwrap();
}

#[tokio::test]
async fn test_http_error_status_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _ = read_request(&mut stream).await;
        let reply = "HTTP/1.1 403 Forbidden\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
        stream.write_all(reply.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
    });

    let translator = Translator::new(config_for(addr)).unwrap();
    let err = translator.detect("hello").await.unwrap_err();
    assert!(matches!(err, TranslateError::HttpError(_)));
}

#[tokio::test]
async fn test_cache_hit_answers_without_network() {
    let dir = tempfile::tempdir().unwrap();
    let cache = TranslationCache::at_storage_root(dir.path());
    cache
        .store(
            "en",
            "fr",
            "hello",
            json!({"data": {"translations": [{"translatedText": "bonjour"}]}}),
        )
        .await
        .unwrap();
    cache
        .store("en", "fr", "void", json!({"data": {"translations": []}}))
        .await
        .unwrap();

    // Endpoints that refuse connections prove nothing goes on the wire
    let config = TranslatorConfig {
        api_key: "test_key".to_string(),
        translate_url: "http://127.0.0.1:1/translate".to_string(),
        detect_url: "http://127.0.0.1:1/detect".to_string(),
        source_lang: Some("en".to_string()),
        target_lang: Some("fr".to_string()),
        ..Default::default()
    };
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(2))
        .build()
        .unwrap();
    let translator = Translator::with_http_client(config, http)
        .unwrap()
        .with_cache(cache);

    let out = translator.translate("hello").await.unwrap();
    assert_eq!(out.as_deref(), Some("bonjour"));

    // A cached empty response is a hit that yields no translation
    assert_eq!(translator.translate("void").await.unwrap(), None);
}

#[tokio::test]
async fn test_misses_are_stored_including_empty_responses() {
    let (addr, _log, server) =
        spawn_canned(vec![json!({"data": {"translations": []}})]).await;

    let dir = tempfile::tempdir().unwrap();
    let cache = TranslationCache::at_storage_root(dir.path());
    let config = TranslatorConfig {
        source_lang: Some("en".to_string()),
        target_lang: Some("fr".to_string()),
        ..config_for(addr)
    };
    let translator = Translator::new(config).unwrap().with_cache(cache.clone());

    assert_eq!(translator.translate("odd").await.unwrap(), None);
    server.await.unwrap();

    // The raw empty response was stored under the resolved key
    let stored = cache.lookup("en", "fr", "odd").await.unwrap().unwrap();
    assert_json_eq!(stored, json!({"data": {"translations": []}}));
}
