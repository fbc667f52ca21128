use crate::config::Config;
use crate::prefs::init_db;
use crate::state::AppState;
use astra::{Body, Request, Response};
use http::Method;
use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

/// One canned response, matched on method + path (query ignored).
#[derive(Clone)]
pub struct StubRoute {
    pub method: &'static str,
    pub path: &'static str,
    pub status: u16,
    pub body: String,
}

pub fn route(method: &'static str, path: &'static str, status: u16, body: &str) -> StubRoute {
    StubRoute {
        method,
        path,
        status,
        body: body.to_string(),
    }
}

/// Minimal canned-JSON backend on an ephemeral port, so the real
/// BackendClient code path runs over real HTTP. Unmatched requests get a
/// 404 JSON body.
pub fn stub_backend(routes: Vec<StubRoute>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub backend");
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            if let Some((method, path)) = read_request(&mut stream) {
                let matched = routes
                    .iter()
                    .find(|r| r.method == method && r.path == path);
                match matched {
                    Some(r) => write_response(&mut stream, r.status, &r.body),
                    None => write_response(&mut stream, 404, r#"{"error":"not found"}"#),
                }
            }
        }
    });

    format!("http://{addr}")
}

/// Stub that answers with a fixed sequence regardless of path, used to
/// simulate "first fetch succeeds, second fails". The last response
/// repeats once the sequence is exhausted.
pub fn stub_backend_seq(responses: Vec<(u16, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub backend");
    let addr = listener.local_addr().unwrap();
    let queue = Arc::new(Mutex::new(VecDeque::from(responses)));

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            if read_request(&mut stream).is_some() {
                let (status, body) = {
                    let mut q = queue.lock().unwrap();
                    if q.len() > 1 {
                        q.pop_front().unwrap()
                    } else {
                        q.front().cloned().unwrap_or((500, String::new()))
                    }
                };
                write_response(&mut stream, status, &body);
            }
        }
    });

    format!("http://{addr}")
}

/// Read the request head (and drain the body) from a stub connection.
/// Returns (method, path-without-query).
fn read_request(stream: &mut TcpStream) -> Option<(String, String)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let request_line = lines.next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();
    let path = target.split('?').next().unwrap_or("").to_string();

    // Drain any body so the client finishes writing before we respond.
    let content_length: usize = lines
        .filter_map(|l| {
            let (k, v) = l.split_once(':')?;
            k.eq_ignore_ascii_case("content-length")
                .then(|| v.trim().parse().ok())?
        })
        .next()
        .unwrap_or(0);
    let mut already = buf.len() - (header_end + 4);
    while already < content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        already += n;
    }

    Some((method, path))
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn write_response(stream: &mut TcpStream, status: u16, body: &str) {
    let reason = match status {
        200 => "OK",
        201 => "Created",
        401 => "Unauthorized",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "OK",
    };
    let resp = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(resp.as_bytes());
    let _ = stream.flush();
}

/// Fresh AppState wired to the given stub backend, with its own
/// throwaway preferences database (production schema).
pub fn test_state(backend_url: &str) -> Arc<AppState> {
    let prefs_path = std::env::temp_dir().join(format!(
        "portal_test_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));

    let config = Config {
        backend_base_url: Url::parse(backend_url).expect("stub url"),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        prefs_db_path: prefs_path.to_string_lossy().to_string(),
    };

    let state = AppState::new(config).expect("AppState::new");
    init_db(&state.prefs, "sql/schema.sql").expect("init prefs schema");
    Arc::new(state)
}

pub fn get(path: &str) -> Request {
    get_with_cookie(path, "session=test-session")
}

pub fn get_anon(path: &str) -> Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::from(String::new()))
        .unwrap()
}

pub fn get_with_cookie(path: &str, cookie: &str) -> Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(path)
        .header("Cookie", cookie)
        .body(Body::from(String::new()))
        .unwrap()
}

pub fn post_form(path: &str, form_body: &str) -> Request {
    http::Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Cookie", "session=test-session")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(form_body.to_string()))
        .unwrap()
}

pub fn body_string(resp: &mut Response) -> String {
    let mut bytes = Vec::new();
    resp.body_mut()
        .reader()
        .read_to_end(&mut bytes)
        .expect("read response body");
    String::from_utf8_lossy(&bytes).to_string()
}

/// Five records, two Completed and three Pending, with the names the
/// search tests look for.
pub fn sample_blotters_json() -> String {
    serde_json::json!([
        {
            "id": 1,
            "case_number": "BLT-2025-0001",
            "complainant_name": "Maria Santos",
            "respondent_name": "Pedro Ramos",
            "complaint_type": "Theft",
            "incident_date": "2025-03-14",
            "status": "Completed",
            "created_at": "2025-03-14T08:30:00"
        },
        {
            "id": 2,
            "case_number": "BLT-2025-0002",
            "complainant_name": "John Reyes",
            "respondent_name": "Carlos Tan",
            "complaint_type": "Noise Complaint",
            "incident_date": "2025-04-02",
            "status": "Pending",
            "created_at": "2025-04-02T10:00:00"
        },
        {
            "id": 3,
            "case_number": "BLT-2025-0003",
            "complainant_name": "Ana dela Cruz",
            "respondent_name": "Liza Uy",
            "complaint_type": "Theft",
            "incident_date": "2025-04-20",
            "status": "Pending",
            "created_at": "2025-04-20T09:15:00"
        },
        {
            "id": 4,
            "case_number": "BLT-2025-0004",
            "complainant_name": "Ramon Garcia",
            "respondent_name": "Nilo Cruz",
            "complaint_type": "Boundary Dispute",
            "incident_date": "2025-05-05",
            "status": "Completed",
            "created_at": "2025-05-05T14:45:00"
        },
        {
            "id": 5,
            "case_number": "BLT-2025-0005",
            "complainant_name": "Grace Lim",
            "respondent_name": "Tomas Silva",
            "complaint_type": "Curfew Violation",
            "incident_date": "2025-05-30",
            "status": "Pending",
            "created_at": "2025-05-30T19:05:00"
        }
    ])
    .to_string()
}

/// 23 records for the pagination scenarios.
pub fn many_blotters_json(count: usize) -> String {
    let records: Vec<serde_json::Value> = (1..=count)
        .map(|i| {
            serde_json::json!({
                "id": i,
                "case_number": format!("BLT-2025-{i:04}"),
                "complainant_name": format!("Resident {i:02}"),
                "complaint_type": "Theft",
                "incident_date": "2025-06-01",
                "status": "Pending",
                "created_at": format!("2025-06-01T00:{:02}:00", i % 60)
            })
        })
        .collect();
    serde_json::to_string(&records).unwrap()
}
