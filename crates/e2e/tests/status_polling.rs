//! HEAD-request status polling against a scripted local server
//!
//! The server answers each request with the next code from its script and
//! repeats the last code once the script runs out.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use publishing_e2e::{
    HttpClient, ManualClock, PollConfig, PollError, PollOptions, Poller, StatusCodeCheck,
};

struct Script {
    codes: Vec<u16>,
    hits: AtomicUsize,
}

impl Script {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn scripted_status(State(script): State<Arc<Script>>) -> StatusCode {
    let i = script.hits.fetch_add(1, Ordering::SeqCst);
    let code = script.codes[i.min(script.codes.len() - 1)];
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serve `codes` on a background runtime, returning the document URL
fn spawn_server(codes: &[u16]) -> (String, Arc<Script>) {
    let script = Arc::new(Script {
        codes: codes.to_vec(),
        hits: AtomicUsize::new(0),
    });
    let state = script.clone();
    let (tx, rx) = std::sync::mpsc::channel();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime");
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind test server");
            tx.send(listener.local_addr().expect("Failed to get local addr"))
                .expect("Test dropped before server started");
            let app = Router::new()
                .route("/doc", get(scripted_status))
                .with_state(state);
            axum::serve(listener, app).await.expect("Test server failed");
        });
    });

    let addr = rx.recv().expect("Test server did not report its address");
    (format!("http://{}/doc", addr), script)
}

fn manual_poller(wait_seconds: f64, interval_seconds: f64) -> Poller<ManualClock> {
    let config = PollConfig {
        default_wait_seconds: wait_seconds,
        interval_seconds,
    };
    Poller::with_clock(&config, ManualClock::new()).unwrap()
}

#[test]
fn test_not_found_until_published() {
    common::init_tracing();
    let (url, script) = spawn_server(&[404, 404, 404, 200]);
    let poller = manual_poller(10.0, 0.5);
    let client = HttpClient::new().unwrap();

    let summary = poller
        .reload_url_until_status_code(&client, &url, &StatusCodeCheck::new([200]), &PollOptions::default())
        .unwrap();

    assert_eq!(summary.attempts, 4);
    assert_eq!(script.hits(), 4);
    assert_eq!(poller.clock().sleeps(), 3);
    assert_eq!(summary.elapsed, Duration::from_millis(1500));
}

#[test]
fn test_server_error_aborts_immediately() {
    common::init_tracing();
    let (url, script) = spawn_server(&[500, 200]);
    let poller = manual_poller(10.0, 0.5);
    let client = HttpClient::new().unwrap();

    let err = poller
        .reload_url_until_status_code(&client, &url, &StatusCodeCheck::new([200]), &PollOptions::default())
        .unwrap_err();

    assert!(err.is_unrecoverable());
    assert_eq!(err.to_string(), format!("Aborting reloading {} as a 500 was returned", url));
    assert_eq!(script.hits(), 1);
    assert_eq!(poller.clock().sleeps(), 0);
}

#[test]
fn test_custom_tolerable_codes() {
    common::init_tracing();
    let (url, script) = spawn_server(&[503, 404, 204]);
    let poller = manual_poller(10.0, 0.5);
    let client = HttpClient::new().unwrap();
    let check = StatusCodeCheck::new([200, 204]).keep_retrying_while([404, 503]);

    let summary = poller
        .reload_url_until_status_code(&client, &url, &check, &PollOptions::default())
        .unwrap();

    assert_eq!(summary.attempts, 3);
    assert_eq!(script.hits(), 3);
}

#[test]
fn test_connection_error_propagates_unchanged() {
    common::init_tracing();
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .unwrap()
        .port();
    let poller = manual_poller(10.0, 0.5);
    let client = HttpClient::with_timeout(Duration::from_secs(2)).unwrap();

    let err = poller
        .reload_url_until_status_code(
            &client,
            &format!("http://127.0.0.1:{}/doc", port),
            &StatusCodeCheck::new([200]),
            &PollOptions::default(),
        )
        .unwrap_err();

    assert!(matches!(err, PollError::Http(_)));
    assert_eq!(poller.clock().sleeps(), 0);
}

#[test]
fn test_times_out_on_wall_clock() {
    common::init_tracing();
    let (url, script) = spawn_server(&[404]);
    let poller = Poller::new(&PollConfig {
        default_wait_seconds: 0.3,
        interval_seconds: 0.1,
    })
    .unwrap();
    let client = HttpClient::new().unwrap();

    let start = Instant::now();
    let err = poller
        .reload_url_until_status_code(
            &client,
            &url,
            &StatusCodeCheck::new([200]),
            &PollOptions::new().fail_reason("the report was never published"),
        )
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(err.is_timeout());
    assert!(err.to_string().ends_with("seconds, the report was never published"));
    assert!(elapsed >= Duration::from_millis(300), "gave up too early: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(2), "overshot the budget: {:?}", elapsed);
    assert!(script.hits() >= 3);
}
