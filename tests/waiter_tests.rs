// tests/waiter_tests.rs
use hyper::{
    service::{make_service_fn, service_fn},
    Body, Request, Response, Server, StatusCode,
};
use rust_service_waiter::{
    config::{ServiceTarget, WaitConfig},
    wait::{DeadlineRace, WaitOutcome},
};
use std::{
    convert::Infallible,
    net::{SocketAddr, TcpListener},
    process::Command,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

const WAITER: &str = env!("CARGO_BIN_EXE_waiter");

/// A port nothing is listening on (best effort: bound, then released).
fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Serves 503 for the first `failures` requests, then 200.
fn flaky_server(failures: u32) -> (SocketAddr, Arc<AtomicU32>) {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();

    let make_service = make_service_fn(move |_| {
        let hits = counter.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |_req: Request<Body>| {
                let n = hits.fetch_add(1, Ordering::SeqCst);
                async move {
                    let status = if n < failures {
                        StatusCode::SERVICE_UNAVAILABLE
                    } else {
                        StatusCode::OK
                    };
                    Ok::<_, Infallible>(
                        Response::builder()
                            .status(status)
                            .body(Body::from("flaky"))
                            .unwrap(),
                    )
                }
            }))
        }
    });

    let server = Server::bind(&([127, 0, 0, 1], 0).into()).serve(make_service);
    let addr = server.local_addr();
    tokio::spawn(server);
    (addr, hits)
}

fn wait_config(timeout_secs: u64, targets: &[String]) -> WaitConfig {
    let config = WaitConfig {
        timeout_secs,
        interval_secs: 1,
        targets: targets
            .iter()
            .map(|t| ServiceTarget::parse(t).unwrap())
            .collect(),
    };
    config.validate().unwrap();
    config
}

#[tokio::test]
async fn test_tcp_target_that_comes_up_late() {
    let port = free_port();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await.unwrap();
        loop {
            let _ = listener.accept().await;
        }
    });

    let config = wait_config(5, &[format!("tcp://127.0.0.1:{}", port)]);
    let started = tokio::time::Instant::now();
    let outcome = DeadlineRace::new(&config, started).unwrap().run().await;

    assert_eq!(outcome, WaitOutcome::Ready);
    assert!(started.elapsed() >= Duration::from_millis(1500));
}

#[tokio::test]
async fn test_http_targets_with_one_flaky() {
    let mut steady = mockito::Server::new_async().await;
    let _mock = steady
        .mock("GET", "/health")
        .with_status(200)
        .create_async()
        .await;
    let (flaky_addr, hits) = flaky_server(3);

    let config = wait_config(
        10,
        &[
            format!("{}/health", steady.url()),
            format!("http://{}/ready", flaky_addr),
        ],
    );
    let outcome = DeadlineRace::new(&config, tokio::time::Instant::now())
        .unwrap()
        .run()
        .await;

    assert_eq!(outcome, WaitOutcome::Ready);
    assert_eq!(hits.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_http_target_stuck_on_503_times_out() {
    let (addr, hits) = flaky_server(u32::MAX);

    let config = wait_config(2, &[format!("http://{}/", addr)]);
    let outcome = DeadlineRace::new(&config, tokio::time::Instant::now())
        .unwrap()
        .run()
        .await;

    assert_eq!(outcome, WaitOutcome::TimedOut);
    assert!(hits.load(Ordering::SeqCst) >= 2);
}

#[test]
fn test_binary_exits_zero_when_ready() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let target = format!("tcp://{}", listener.local_addr().unwrap());

    let status = Command::new(WAITER)
        .args(["--timeout", "5", "--interval", "1", &target])
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(0));
}

#[test]
fn test_binary_accepts_maximum_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let target = format!("tcp://{}", listener.local_addr().unwrap());

    let status = Command::new(WAITER)
        .args(["--timeout", &u64::MAX.to_string(), "--interval", "1", &target])
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(0));
}

#[test]
fn test_binary_exits_one_on_timeout() {
    let target = format!("tcp://127.0.0.1:{}", free_port());

    let started = Instant::now();
    let status = Command::new(WAITER)
        .args(["--timeout", "2", "--interval", "1", &target])
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(1));
    assert!(started.elapsed() >= Duration::from_secs(2));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_binary_rejects_interval_above_timeout_without_probing() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let target = format!("tcp://{}", listener.local_addr().unwrap());

    let started = Instant::now();
    let status = Command::new(WAITER)
        .args(["--timeout", "5", "--interval", "10", &target])
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(1));
    assert!(started.elapsed() < Duration::from_secs(5));
    let accepted = listener.accept();
    assert!(matches!(accepted, Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock));
}

#[test]
fn test_binary_rejects_missing_targets() {
    let status = Command::new(WAITER).status().unwrap();
    assert_eq!(status.code(), Some(1));
}

#[test]
fn test_binary_rejects_bad_scheme() {
    let status = Command::new(WAITER).arg("ftp://files:21").status().unwrap();
    assert_eq!(status.code(), Some(1));
}

#[test]
fn test_binary_rejects_malformed_number() {
    let status = Command::new(WAITER)
        .args(["--timeout", "soon", "tcp://127.0.0.1:1"])
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));
}

#[test]
fn test_binary_help_exits_zero() {
    let output = Command::new(WAITER).arg("--help").output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--interval"));
}

#[test]
fn test_binary_hosts_surface() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port().to_string();

    let status = Command::new(WAITER)
        .args(["hosts", "--timeout", "5", "--delay", "1", "127.0.0.1", &port])
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(0));
}
