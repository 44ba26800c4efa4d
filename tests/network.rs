use hermes::errors::ClientError;
use hermes::network::NetworkClient;
use hermes::types::{Endpoint, Region};
use std::collections::HashSet;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

#[derive(Debug)]
struct RecordedRequest {
    method: String,
    path: String,
    body: String,
}

fn find_headers_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|position| position + 4)
}

fn parse_content_length(headers: &str) -> usize {
    headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
        .unwrap_or(0)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Minimal canned HTTP responder. Answers `GET …/all` with
/// (`snapshot_status`, `snapshot_body`) and everything else with
/// 200 + `position_body`, recording each request it sees.
async fn spawn_api_server(
    snapshot_status: u16,
    snapshot_body: &str,
    position_body: &str,
) -> (Endpoint, mpsc::UnboundedReceiver<RecordedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let snapshot_body = snapshot_body.to_string();
    let position_body = position_body.to_string();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let tx = tx.clone();
            let snapshot_body = snapshot_body.clone();
            let position_body = position_body.clone();

            tokio::spawn(async move {
                let mut raw = Vec::new();
                let mut buf = [0u8; 1024];
                let headers_end = loop {
                    let Ok(n) = stream.read(&mut buf).await else {
                        return;
                    };
                    if n == 0 {
                        return;
                    }
                    raw.extend_from_slice(&buf[..n]);
                    if let Some(end) = find_headers_end(&raw) {
                        let headers = String::from_utf8_lossy(&raw[..end]).to_string();
                        let content_length = parse_content_length(&headers);
                        if raw.len() >= end + content_length {
                            break end;
                        }
                    }
                };

                let headers = String::from_utf8_lossy(&raw[..headers_end]).to_string();
                let mut request_line = headers.lines().next().unwrap_or("").split_whitespace();
                let method = request_line.next().unwrap_or("").to_string();
                let path = request_line.next().unwrap_or("").to_string();
                let body = String::from_utf8_lossy(&raw[headers_end..]).to_string();

                let (status, response_body) = if path.ends_with("/all") {
                    (snapshot_status, snapshot_body)
                } else {
                    (200, position_body)
                };

                let _ = tx.send(RecordedRequest { method, path, body });

                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason(status),
                    response_body.len(),
                    response_body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    let endpoint = Endpoint::parse(&format!("http://{}", addr)).unwrap();
    (endpoint, rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<RecordedRequest>) -> Vec<RecordedRequest> {
    let mut recorded = Vec::new();
    while let Ok(request) = rx.try_recv() {
        recorded.push(request);
    }
    recorded
}

const SNAPSHOT_BODY: &str = r#"{"network":{"7":{"101":{"line":7,"run_number":101,"delayed":0}},"12":{"205":{"line":12,"run_number":205,"delayed":2}}},"time_stamp":1700000000}"#;

#[tokio::test]
async fn test_fetch_snapshot_parses_network() {
    let (endpoint, _rx) = spawn_api_server(200, SNAPSHOT_BODY, "").await;
    let client = NetworkClient::new(endpoint, Region::from_id(0)).unwrap();

    let snapshot = client.fetch_snapshot().await.unwrap();
    assert_eq!(snapshot.time_stamp, 1_700_000_000);
    assert_eq!(snapshot.vehicle_count(), 2);
    assert!(snapshot.network[&7].contains_key(&101));
    assert!(snapshot.network[&12].contains_key(&205));
}

#[tokio::test]
async fn test_poll_dispatches_once_per_vehicle() {
    let (endpoint, mut rx) = spawn_api_server(200, SNAPSHOT_BODY, "").await;
    let client = NetworkClient::new(endpoint, Region::from_id(0)).unwrap();

    let dispatched = client.poll_and_dispatch().await.unwrap();
    assert_eq!(dispatched, 2, "One dispatch per (line, run) pair");

    let recorded = drain(&mut rx);
    let snapshot_requests: Vec<_> = recorded
        .iter()
        .filter(|request| request.path.ends_with("/all"))
        .collect();
    assert_eq!(snapshot_requests.len(), 1);
    assert_eq!(snapshot_requests[0].method, "GET");
    assert_eq!(snapshot_requests[0].path, "/vehicles/0/all");

    let mut pairs = HashSet::new();
    for request in recorded.iter().filter(|request| request.path.ends_with("/position")) {
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/vehicles/0/position");
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        let pair = (body["line"].as_u64().unwrap(), body["run"].as_u64().unwrap());
        assert!(pairs.insert(pair), "pair {:?} dispatched more than once", pair);
    }
    assert_eq!(
        pairs,
        HashSet::from([(7, 101), (12, 205)]),
        "Each pair dispatched exactly once, in any order"
    );
}

#[tokio::test]
async fn test_failed_snapshot_aborts_all_dispatches() {
    let (endpoint, mut rx) = spawn_api_server(500, "", "").await;
    let client = NetworkClient::new(endpoint, Region::from_id(0)).unwrap();

    let result = client.poll_and_dispatch().await;
    match result {
        Err(ClientError::Request { message, .. }) => {
            assert!(message.contains("HTTP 500"), "got message: {}", message);
        }
        other => panic!("expected a request error, got {:?}", other),
    }

    let recorded = drain(&mut rx);
    assert!(
        recorded.iter().all(|request| !request.path.ends_with("/position")),
        "No dispatch may be issued when the snapshot fetch fails"
    );
}

#[tokio::test]
async fn test_malformed_snapshot_body_fails() {
    let (endpoint, _rx) = spawn_api_server(200, "not json", "").await;
    let client = NetworkClient::new(endpoint, Region::from_id(0)).unwrap();

    let result = client.fetch_snapshot().await;
    match result {
        Err(ClientError::Request { message, .. }) => {
            assert!(message.contains("parse"), "got message: {}", message);
        }
        other => panic!("expected a request error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_dispatch_returns_response_body() {
    let (endpoint, _rx) = spawn_api_server(200, SNAPSHOT_BODY, r#"{"status":1}"#).await;
    let client = NetworkClient::new(endpoint, Region::from_id(0)).unwrap();

    let body = client.dispatch_position(7, 101).await.unwrap();
    assert_eq!(body, r#"{"status":1}"#);
}

#[tokio::test]
async fn test_stream_endpoint_rejected_for_api() {
    let result = NetworkClient::new(
        Endpoint::parse("ws://127.0.0.1:9001").unwrap(),
        Region::from_id(0),
    );
    match result {
        Err(ClientError::InvalidConfiguration { message }) => {
            assert!(message.contains("http://"));
        }
        other => panic!("expected a configuration error, got {:?}", other.map(|_| ())),
    }
}
