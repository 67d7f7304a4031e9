//! Minimal HTTP/1.1 server for integration tests: serves a manifest and its
//! segments from memory and can be told to fail specific paths.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone, Default)]
struct Route {
    body: Vec<u8>,
    /// Respond 500 to this many requests before serving the body.
    fail_first: usize,
    /// Respond 500 forever.
    always_fail: bool,
}

#[derive(Debug, Default)]
struct State {
    routes: HashMap<String, Route>,
    hits: HashMap<String, usize>,
    headers: HashMap<String, Vec<HashMap<String, String>>>,
}

/// Handle to a running server. The server lives until the process exits.
#[derive(Clone)]
pub struct SegmentServer {
    base: String,
    state: Arc<Mutex<State>>,
}

impl SegmentServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State::default()));
        let server_state = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&server_state);
                thread::spawn(move || handle(stream, &state));
            }
        });
        Self {
            base: format!("http://127.0.0.1:{}", port),
            state,
        }
    }

    /// `http://127.0.0.1:PORT` (no trailing slash).
    pub fn origin(&self) -> &str {
        &self.base
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn serve(&self, path: &str, body: &[u8]) {
        self.route(path, Route {
            body: body.to_vec(),
            ..Route::default()
        });
    }

    pub fn serve_after_failures(&self, path: &str, body: &[u8], failures: usize) {
        self.route(path, Route {
            body: body.to_vec(),
            fail_first: failures,
            always_fail: false,
        });
    }

    pub fn always_fail(&self, path: &str) {
        self.route(path, Route {
            always_fail: true,
            ..Route::default()
        });
    }

    pub fn hits(&self, path: &str) -> usize {
        self.state.lock().unwrap().hits.get(path).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.state.lock().unwrap().hits.values().sum()
    }

    /// Request headers (lowercased names) of every request to `path`.
    pub fn request_headers(&self, path: &str) -> Vec<HashMap<String, String>> {
        self.state
            .lock()
            .unwrap()
            .headers
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    fn route(&self, path: &str, route: Route) {
        self.state.lock().unwrap().routes.insert(path.to_string(), route);
    }
}

fn handle(mut stream: std::net::TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let (method, path, headers) = parse_request(request);

    let response: Result<Vec<u8>, &str> = {
        let mut st = state.lock().unwrap();
        let hit = {
            let h = st.hits.entry(path.clone()).or_insert(0);
            *h += 1;
            *h
        };
        st.headers.entry(path.clone()).or_default().push(headers);
        match st.routes.get(&path) {
            None => Err("404 Not Found"),
            Some(_) if !method.eq_ignore_ascii_case("GET") => Err("405 Method Not Allowed"),
            Some(r) if r.always_fail || hit <= r.fail_first => Err("500 Internal Server Error"),
            Some(r) => Ok(r.body.clone()),
        }
    };

    match response {
        Ok(body) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&body);
        }
        Err(status) => {
            let head = format!(
                "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                status
            );
            let _ = stream.write_all(head.as_bytes());
        }
    }
}

/// Returns (method, path, headers with lowercased names).
fn parse_request(request: &str) -> (String, String, HashMap<String, String>) {
    let mut lines = request.lines();
    let mut first = lines.next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("").to_string();
    let path = first.next().unwrap_or("/").to_string();
    let mut headers = HashMap::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }
    (method, path, headers)
}
