//! Tests for dispatcher log events written through a log port

use http::Method;
use lux::dispatcher::Dispatcher;
use lux::gateway::{Request, ResponseSink};
use lux::logging::LogFormat;

mod common;
use common::handlers::text;
use common::log_capture::LogCapture;

fn logged_dispatcher(capture: &LogCapture) -> Dispatcher {
    let mut dispatcher = Dispatcher::new();
    dispatcher.logging(capture.clone(), LogFormat::Json);
    dispatcher
}

#[test]
fn test_request_lifecycle_events() {
    let capture = LogCapture::new();
    let mut dispatcher = logged_dispatcher(&capture);
    dispatcher.handler(Method::GET, text(201, "created"));

    let req = Request::new("GET")
        .with_query("page", "2")
        .with_request_id("req-123");
    dispatcher.handle(&req).unwrap();

    let incoming = capture.events_with_message("handling incoming request");
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0]["level"], "INFO");
    assert_eq!(incoming[0]["fields"]["method"], "GET");
    assert_eq!(incoming[0]["fields"]["request_id"], "req-123");
    let params = incoming[0]["fields"]["params"].as_str().unwrap();
    assert!(params.contains("page"));

    let finished = capture.events_with_message("finished handling request");
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0]["fields"]["status"], 201);
    assert_eq!(finished[0]["fields"]["request_id"], "req-123");
    assert!(finished[0]["fields"]["duration"].is_string());
}

#[test]
fn test_panic_event() {
    let capture = LogCapture::new();
    let mut dispatcher = logged_dispatcher(&capture);
    dispatcher.handler(Method::POST, |_w: &mut ResponseSink, _req: &Request| {
        panic!("disk on fire");
    });

    dispatcher
        .handle(&Request::new("POST").with_request_id("req-9"))
        .unwrap();

    let recovered = capture.events_with_message("recovered from panic");
    assert_eq!(recovered.len(), 1);
    assert_eq!(recovered[0]["level"], "ERROR");
    assert_eq!(recovered[0]["fields"]["error"], "disk on fire");
    assert_eq!(recovered[0]["fields"]["request_id"], "req-9");

    let finished = capture.events_with_message("finished handling request");
    assert_eq!(finished[0]["fields"]["status"], 500);
}

#[test]
fn test_routing_failure_logs_only_incoming() {
    let capture = LogCapture::new();
    let dispatcher = logged_dispatcher(&capture);

    let resp = dispatcher.handle(&Request::new("DELETE")).unwrap();
    assert_eq!(resp.status_code, 405);

    assert_eq!(capture.events_with_message("handling incoming request").len(), 1);
    assert!(capture.events_with_message("finished handling request").is_empty());
}

#[test]
fn test_generated_request_id_when_missing() {
    let capture = LogCapture::new();
    let mut dispatcher = logged_dispatcher(&capture);
    dispatcher.handler(Method::GET, text(200, "ok"));

    dispatcher.handle(&Request::new("GET")).unwrap();

    let incoming = capture.events_with_message("handling incoming request");
    let finished = capture.events_with_message("finished handling request");
    let generated = incoming[0]["fields"]["request_id"].as_str().unwrap();
    assert_eq!(generated.len(), 26);
    assert_eq!(finished[0]["fields"]["request_id"], generated);
}

#[test]
fn test_panic_event_shares_generated_request_id() {
    let capture = LogCapture::new();
    let mut dispatcher = logged_dispatcher(&capture);
    dispatcher.handler(Method::GET, |_w: &mut ResponseSink, _req: &Request| {
        panic!("no gateway id");
    });

    dispatcher.handle(&Request::new("GET")).unwrap();

    let incoming = capture.events_with_message("handling incoming request");
    let recovered = capture.events_with_message("recovered from panic");
    let finished = capture.events_with_message("finished handling request");
    let generated = incoming[0]["fields"]["request_id"].as_str().unwrap();
    assert_eq!(generated.len(), 26);
    assert_eq!(recovered[0]["fields"]["request_id"], generated);
    assert_eq!(finished[0]["fields"]["request_id"], generated);
}

#[test]
fn test_log_ports_are_per_dispatcher() {
    let first = LogCapture::new();
    let second = LogCapture::new();

    let mut a = logged_dispatcher(&first);
    a.handler(Method::GET, text(200, "a"));
    let mut b = logged_dispatcher(&second);
    b.handler(Method::GET, text(200, "b"));

    a.handle(&Request::new("GET").with_request_id("only-a")).unwrap();

    assert_eq!(first.events_with_message("handling incoming request").len(), 1);
    assert!(second.contents().is_empty());
}

#[test]
fn test_text_formats_write_messages() {
    for format in [LogFormat::Pretty, LogFormat::Compact] {
        let capture = LogCapture::new();
        let mut dispatcher = Dispatcher::new();
        dispatcher.logging(capture.clone(), format);
        dispatcher.handler(Method::GET, text(200, "ok"));

        dispatcher.handle(&Request::new("GET")).unwrap();

        let out = capture.contents();
        assert!(out.contains("handling incoming request"), "{format:?}");
        assert!(out.contains("finished handling request"), "{format:?}");
    }
}
