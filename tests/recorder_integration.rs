//! End-to-end recording over the default transport.

use bytes::Bytes;
use http::Request;
use http_body_util::{BodyExt, Empty};
use tower::ServiceExt;

use har_recorder::config::{OutputFormat, RecorderConfig};
use har_recorder::{HarError, HarRecorder, Options, WriteError};

mod common;
use common::{MockResponse, SharedBuffer};

fn get(url: String) -> Request<Empty<Bytes>> {
    Request::get(url).body(Empty::new()).unwrap()
}

#[tokio::test]
async fn test_get_records_one_entry() {
    let addr = common::start_mock_backend(
        MockResponse::text("hello").header("Set-Cookie", "sid=abc; Path=/; HttpOnly"),
    )
    .await;

    let sink = SharedBuffer::default();
    let recorder = HarRecorder::new(sink.clone(), Options::default()).await.unwrap();

    let req = Request::get(format!("http://{}/greet?name=har", addr))
        .header("cookie", "pref=1")
        .header("x-trace", "t1")
        .body(Empty::<Bytes>::new())
        .unwrap();
    let res = recorder.clone().oneshot(req).await.expect("exchange succeeds");

    assert_eq!(res.status(), 200);
    let body = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"hello");

    recorder.close().await.unwrap();

    let archive = sink.json();
    assert_eq!(archive["log"]["version"], "1.2");
    assert_eq!(archive["log"]["creator"]["name"], "har-recorder");

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];

    let request = &entry["request"];
    assert_eq!(request["method"], "GET");
    assert_eq!(request["url"], format!("http://{}/greet?name=har", addr));
    assert_eq!(request["queryString"][0]["name"], "name");
    assert_eq!(request["cookies"][0]["name"], "pref");
    assert_eq!(request["headersSize"], -1);
    assert!(request.get("postData").is_none());
    assert!(request["headers"]
        .as_array()
        .unwrap()
        .iter()
        .any(|h| h["name"] == "x-trace" && h["value"] == "t1"));

    let response = &entry["response"];
    assert_eq!(response["status"], 200);
    assert_eq!(response["statusText"], "OK");
    assert_eq!(response["httpVersion"], "HTTP/1.1");
    assert_eq!(response["content"]["text"], "hello");
    assert!(response["content"].get("encoding").is_none());
    assert_eq!(response["content"]["size"], 5);
    assert_eq!(response["cookies"][0]["name"], "sid");
    assert_eq!(response["cookies"][0]["httpOnly"], true);
    assert_eq!(response["redirectURL"], "");

    let timings = &entry["timings"];
    // IP literal: no lookup; plain http: no handshake
    assert_eq!(timings["dns"], -1.0);
    assert_eq!(timings["ssl"], -1.0);
    for phase in ["blocked", "connect", "send", "wait", "receive"] {
        assert!(timings[phase].as_f64().unwrap() >= 0.0, "{} measured", phase);
    }
    assert!(entry["time"].as_f64().unwrap() >= 0.0);
    assert!(entry["startedDateTime"].as_str().is_some());
}

#[tokio::test]
async fn test_binary_response_is_base64() {
    let addr = common::start_mock_backend(MockResponse::new("application/octet-stream", vec![0u8, 1, 2, 255])).await;

    let sink = SharedBuffer::default();
    let recorder = HarRecorder::new(sink.clone(), Options::default()).await.unwrap();

    let res = recorder.clone().oneshot(get(format!("http://{}/blob", addr))).await.unwrap();
    let body = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], &[0u8, 1, 2, 255]);
    recorder.close().await.unwrap();

    let content = &sink.entries()[0]["response"]["content"];
    assert_eq!(content["encoding"], "base64");
    assert_eq!(content["text"], "AAEC/w==");
    assert_eq!(content["mimeType"], "application/octet-stream");
}

#[tokio::test]
async fn test_concurrent_exchanges_each_produce_one_entry() {
    let addr = common::start_mock_backend(MockResponse::text("ok")).await;

    let sink = SharedBuffer::default();
    let recorder = HarRecorder::new(sink.clone(), Options::default()).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..50 {
        let recorder = recorder.clone();
        let url = format!("http://{}/item/{}", addr, i);
        handles.push(tokio::spawn(async move { recorder.oneshot(get(url)).await }));
    }
    for handle in handles {
        let res = handle.await.unwrap().expect("exchange succeeds");
        assert_eq!(res.status(), 200);
    }
    recorder.close().await.unwrap();

    let entries = sink.entries();
    assert_eq!(entries.len(), 50);

    let mut urls: Vec<String> = entries
        .iter()
        .map(|e| e["request"]["url"].as_str().unwrap().to_string())
        .collect();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 50);
}

#[tokio::test]
async fn test_transport_failure_writes_nothing() {
    let addr = common::closed_port().await;

    let sink = SharedBuffer::default();
    let recorder = HarRecorder::new(sink.clone(), Options::default()).await.unwrap();

    let err = recorder
        .clone()
        .oneshot(get(format!("http://{}/", addr)))
        .await
        .unwrap_err();
    assert!(err.downcast_ref::<hyper_util::client::legacy::Error>().is_some());

    recorder.close().await.unwrap();
    assert!(sink.entries().is_empty());
}

#[tokio::test]
async fn test_close_twice_and_record_after_close_fail() {
    let addr = common::start_mock_backend(MockResponse::text("late")).await;

    let sink = SharedBuffer::default();
    let recorder = HarRecorder::new(sink.clone(), Options::default()).await.unwrap();
    recorder.close().await.unwrap();

    let err = recorder.close().await.unwrap_err();
    assert!(matches!(err, HarError::Write(WriteError::Closed)));

    let err = recorder
        .clone()
        .oneshot(get(format!("http://{}/", addr)))
        .await
        .unwrap_err();
    let err = err.downcast_ref::<HarError>().expect("capture error");
    assert!(matches!(err, HarError::Write(WriteError::Closed)));

    // archive left exactly as closed
    assert!(sink.entries().is_empty());
}

#[tokio::test]
async fn test_empty_creator_fails_construction() {
    let sink = SharedBuffer::default();
    let err = HarRecorder::new(sink.clone(), Options::default().with_creator("", "1"))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, HarError::EmptyCreatorName));
    assert!(sink.contents().is_empty());
}

#[tokio::test]
async fn test_from_config_writes_har_file() {
    let addr = common::start_mock_backend(MockResponse::text("from config")).await;
    let dir = tempfile::tempdir().unwrap();

    let mut config = RecorderConfig::default();
    config.creator.name = "config-test".into();
    config.output.path = dir.path().join("out.har");

    let recorder = HarRecorder::from_config(&config).await.unwrap();
    recorder.clone().oneshot(get(format!("http://{}/", addr))).await.unwrap();
    recorder.close().await.unwrap();

    let written = std::fs::read(&config.output.path).unwrap();
    let archive: serde_json::Value = serde_json::from_slice(&written).unwrap();
    assert_eq!(archive["log"]["creator"]["name"], "config-test");
    assert_eq!(archive["log"]["entries"][0]["response"]["content"]["text"], "from config");
}

#[tokio::test]
async fn test_from_config_ndjson_appends_lines() {
    let addr = common::start_mock_backend(MockResponse::text("line")).await;
    let dir = tempfile::tempdir().unwrap();

    let mut config = RecorderConfig::default();
    config.output.format = OutputFormat::Ndjson;
    config.output.path = dir.path().join("out.ndjson");

    for _ in 0..2 {
        let recorder = HarRecorder::from_config(&config).await.unwrap();
        recorder.clone().oneshot(get(format!("http://{}/", addr))).await.unwrap();
        recorder.close().await.unwrap();
    }

    let written = std::fs::read_to_string(&config.output.path).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let entry: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(entry["response"]["content"]["text"], "line");
    }
}
