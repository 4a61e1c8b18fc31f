//! Local HTTP server shared by the integration tests
//!
//! Stands in for the ping ingestion endpoint and the BigQuery REST API. Each
//! request is answered by a handler closure and recorded for assertions.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use flate2::read::GzDecoder;
use serde_json::Value;

/// A request received by the [`MockServer`]
#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    /// Path without the query string
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Body as text, decompressed when sent gzip-encoded
    pub fn text(&self) -> String {
        if self.header("content-encoding") == Some("gzip") {
            let mut text = String::new();
            GzDecoder::new(self.body.as_slice())
                .read_to_string(&mut text)
                .expect("Invalid gzip body");
            text
        } else {
            String::from_utf8_lossy(&self.body).to_string()
        }
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text()).expect("Body is not JSON")
    }

    /// Ping name of a `/submit/<app>/<ping>/<version>/<id>` request
    pub fn ping_name(&self) -> Option<&str> {
        let mut segments = self.path.split('/').skip(1);
        match (segments.next(), segments.next(), segments.next()) {
            (Some("submit"), Some(_), Some(ping)) => Some(ping),
            _ => None,
        }
    }
}

type Handler = dyn Fn(&Request) -> (u16, String) + Send + Sync;

/// HTTP server on a free local port, serving one request per connection
pub struct MockServer {
    pub url: String,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl MockServer {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&Request) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let handler = Arc::clone(&handler);
                let recorded = Arc::clone(&recorded);
                thread::spawn(move || serve(stream, handler.as_ref(), &recorded));
            }
        });

        Self { url, requests }
    }

    /// Answer every request with `200 {}`
    pub fn accepting() -> Self {
        Self::start(|_| (200, "{}".to_string()))
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    /// Names of the submitted pings, in arrival order
    pub fn ping_names(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|request| request.ping_name().map(str::to_string))
            .collect()
    }

    pub fn pings(&self, name: &str) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|request| request.ping_name() == Some(name))
            .collect()
    }
}

fn serve(stream: TcpStream, handler: &Handler, recorded: &Mutex<Vec<Request>>) {
    let Some(request) = read_request(&stream) else {
        return;
    };
    let (status, body) = handler(&request);
    recorded.lock().unwrap().push(request);

    let response = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let mut stream = stream;
    let _ = stream.write_all(response.as_bytes());
}

fn read_request(stream: &TcpStream) -> Option<Request> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?;
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    let query = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key.to_string(), value.to_string())
        })
        .collect();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    let content_length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(0);
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).ok()?;

    Some(Request {
        method,
        path: path.to_string(),
        query,
        headers,
        body,
    })
}
