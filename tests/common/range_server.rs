//! Minimal HTTP/1.1 server serving one static body, with HEAD and Range GET
//! support and failure injection for the integration tests.
//!
//! Every connection carries a single request and is closed afterwards.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct RangeServerOptions {
    /// If true, HEAD returns 405.
    pub head_blocked: bool,
    /// If true, GET ignores Range and always returns 200 with the full body,
    /// while still advertising `Accept-Ranges: bytes`.
    pub ignore_ranges: bool,
    /// If true, `Accept-Ranges: bytes` is not sent.
    pub hide_accept_ranges: bool,
    /// If true, no `Content-Length` is sent and the body ends with the
    /// connection.
    pub hide_length: bool,
    /// Range start -> how many times a request starting there answers 500.
    pub fail_range: HashMap<u64, usize>,
    /// How many whole-file GETs answer 500.
    pub fail_whole: usize,
    /// Range start -> how many times the body is cut in half.
    pub truncate_range: HashMap<u64, usize>,
    /// Send bodies in chunks of this many bytes, pausing between chunks.
    pub throttle: Option<(usize, Duration)>,
}

/// One request as seen by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub range: Option<(u64, u64)>,
}

struct State {
    body: Vec<u8>,
    opts: RangeServerOptions,
    fail_range: Mutex<HashMap<u64, usize>>,
    fail_whole: AtomicUsize,
    truncate_range: Mutex<HashMap<u64, usize>>,
    requests: Mutex<Vec<Recorded>>,
}

pub struct RangeServer {
    base: String,
    state: Arc<State>,
}

impl RangeServer {
    /// URL of `path` on this server, e.g. `url("file.bin")`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Ranged GETs, sorted by range start.
    pub fn range_requests(&self) -> Vec<(u64, u64)> {
        let mut ranges: Vec<_> = self
            .requests()
            .into_iter()
            .filter(|r| r.method == "GET")
            .filter_map(|r| r.range)
            .collect();
        ranges.sort();
        ranges
    }

    pub fn count(&self, method: &str) -> usize {
        self.requests().iter().filter(|r| r.method == method).count()
    }
}

/// Starts a server in a background thread serving `body`.
pub fn start(body: Vec<u8>) -> RangeServer {
    start_with_options(body, RangeServerOptions::default())
}

/// Like `start` but with custom behavior.
pub fn start_with_options(body: Vec<u8>, opts: RangeServerOptions) -> RangeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let state = Arc::new(State {
        body,
        fail_range: Mutex::new(opts.fail_range.clone()),
        fail_whole: AtomicUsize::new(opts.fail_whole),
        truncate_range: Mutex::new(opts.truncate_range.clone()),
        opts,
        requests: Mutex::new(Vec::new()),
    });
    let server_state = Arc::clone(&state);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&server_state);
            thread::spawn(move || handle(stream, &state));
        }
    });
    RangeServer {
        base: format!("http://127.0.0.1:{}/", port),
        state,
    }
}

fn take(map: &Mutex<HashMap<u64, usize>>, key: u64) -> bool {
    let mut map = map.lock().unwrap();
    match map.get_mut(&key) {
        Some(n) if *n > 0 => {
            *n -= 1;
            true
        }
        _ => false,
    }
}

fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return None,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8(data).ok()
}

fn handle(mut stream: TcpStream, state: &State) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let Some(head) = read_head(&mut stream) else {
        return;
    };
    let request = parse_request(&head);
    state.requests.lock().unwrap().push(request.clone());

    let opts = &state.opts;
    let body = &state.body[..];
    let total = body.len() as u64;
    let accept_ranges = if opts.hide_accept_ranges {
        ""
    } else {
        "Accept-Ranges: bytes\r\n"
    };

    if let Some(rest) = request.path.strip_prefix("/old/") {
        let response = format!(
            "HTTP/1.1 302 Found\r\nLocation: /new/{}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            rest
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    match request.method.as_str() {
        "HEAD" => {
            if opts.head_blocked {
                let _ = stream.write_all(
                    b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                );
                return;
            }
            let length = if opts.hide_length {
                String::new()
            } else {
                format!("Content-Length: {}\r\n", total)
            };
            let response = format!(
                "HTTP/1.1 200 OK\r\n{}{}Connection: close\r\n\r\n",
                length, accept_ranges
            );
            let _ = stream.write_all(response.as_bytes());
        }
        "GET" => {
            let ranged = request.range.filter(|_| !opts.ignore_ranges);
            let failing = match ranged {
                Some((start, _)) => take(&state.fail_range, start),
                None => state
                    .fail_whole
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                    .is_ok(),
            };
            if failing {
                let _ = stream.write_all(
                    b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                );
                return;
            }

            let (status, content_range, slice) = match ranged {
                Some((start, end_incl)) => {
                    let end_incl = end_incl.min(total.saturating_sub(1));
                    if start >= total || start > end_incl {
                        let response = format!(
                            "HTTP/1.1 416 Range Not Satisfiable\r\nContent-Range: bytes */{}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                            total
                        );
                        let _ = stream.write_all(response.as_bytes());
                        return;
                    }
                    (
                        "206 Partial Content",
                        format!("Content-Range: bytes {}-{}/{}\r\n", start, end_incl, total),
                        &body[start as usize..=end_incl as usize],
                    )
                }
                None => ("200 OK", String::new(), body),
            };
            let truncate = ranged.is_some_and(|(start, _)| take(&state.truncate_range, start));
            let length = if opts.hide_length && ranged.is_none() {
                String::new()
            } else {
                format!("Content-Length: {}\r\n", slice.len())
            };
            let response = format!(
                "HTTP/1.1 {}\r\n{}{}{}Connection: close\r\n\r\n",
                status, length, content_range, accept_ranges
            );
            let _ = stream.write_all(response.as_bytes());
            let sent = if truncate { &slice[..slice.len() / 2] } else { slice };
            match opts.throttle {
                Some((chunk, pause)) => {
                    for part in sent.chunks(chunk.max(1)) {
                        if stream.write_all(part).and_then(|_| stream.flush()).is_err() {
                            return;
                        }
                        thread::sleep(pause);
                    }
                }
                None => {
                    let _ = stream.write_all(sent);
                    let _ = stream.flush();
                }
            }
        }
        _ => {
            let _ = stream.write_all(
                b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        }
    }
}

fn parse_request(head: &str) -> Recorded {
    let mut lines = head.lines();
    let mut first = lines.next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("").to_ascii_uppercase();
    let path = first.next().unwrap_or("/").to_string();
    let mut range = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("range") {
                let value = value.trim();
                if let Some(spec) = value.strip_prefix("bytes=") {
                    if let Some((a, b)) = spec.split_once('-') {
                        let start = a.trim().parse::<u64>().unwrap_or(0);
                        let end = b.trim();
                        let end_incl = if end.is_empty() {
                            u64::MAX
                        } else {
                            end.parse::<u64>().unwrap_or(0)
                        };
                        range = Some((start, end_incl));
                    }
                }
            }
        }
    }
    Recorded {
        method,
        path,
        range,
    }
}
