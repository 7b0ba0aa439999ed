// Rust guideline compliant 2026-02-06

//! Integration tests for release discovery against a local HTTP server.

use baseutils_core::{discover_github_latest_patch_release, Error};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

/// Serves `pages` (page 1 first) and an empty list afterwards; returns the request lines.
fn serve_pages(pages: Vec<&'static str>, status: &'static str) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let url = format!("http://{}/repos/acme/widget/releases", listener.local_addr().expect("addr"));
    let handle = thread::spawn(move || {
        let mut requests = Vec::new();
        for stream in listener.incoming() {
            let mut stream = stream.expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone"));
            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("request line");
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).expect("header") == 0 || header == "\r\n" {
                    break;
                }
            }
            let page: usize = request_line
                .split(|c| c == '?' || c == '&' || c == ' ')
                .find_map(|part| part.strip_prefix("page="))
                .and_then(|p| p.parse().ok())
                .unwrap_or(1);
            requests.push(request_line.trim_end().to_string());

            let body = pages.get(page - 1).copied().unwrap_or("[]");
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).expect("write");
            if body == "[]" || !status.starts_with("200") {
                break;
            }
        }
        requests
    });
    (url, handle)
}

#[test]
fn test_discovers_latest_patch_across_pages() {
    let (url, server) = serve_pages(
        vec![
            r#"[{"tag_name": "v1.17.0", "draft": false, "prerelease": false},
                {"tag_name": "v1.16.4", "draft": false, "prerelease": false}]"#,
            r#"[{"tag_name": "v1.16.9", "draft": false, "prerelease": false},
                {"tag_name": "v1.16.10", "draft": false, "prerelease": true}]"#,
        ],
        "200 OK",
    );

    let tag = discover_github_latest_patch_release("1.16.1", &url).expect("discover release");
    assert_eq!(tag, "v1.16.9");

    let requests = server.join().expect("server thread");
    assert_eq!(requests.len(), 3, "expected two pages plus the empty one: {:?}", requests);
    assert!(requests[0].contains("per_page=100"));
}

#[test]
fn test_http_error_status_is_reported() {
    let (url, server) = serve_pages(vec![r#"{"message": "rate limited"}"#], "403 Forbidden");
    let err = discover_github_latest_patch_release("1.16", &url).expect_err("should fail");
    assert!(matches!(err, Error::Http(_)), "unexpected error: {}", err);
    server.join().expect("server thread");
}

#[test]
fn test_invalid_version_fails_before_any_request() {
    let err = discover_github_latest_patch_release("latest", "http://127.0.0.1:9/unused")
        .expect_err("should fail");
    assert!(matches!(err, Error::InvalidVersion(_)));
}
