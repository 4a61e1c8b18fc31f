//! Ping uploader for the Glean SDK
//!
//! Glean hands finished pings to a [`PingUploader`] on its own upload thread
//! and takes care of retries and pending-ping storage itself. The HTTP
//! uploader sends each request with the runtime's async client.

use std::time::Duration;

use glean::net::{PingUploadRequest, PingUploader, UploadResult};
use tokio::runtime::Handle;

use crate::common::{Error, Result};

/// POSTs ping documents to the data platform
#[derive(Debug)]
pub struct HttpUploader {
    client: reqwest::Client,
    runtime: Handle,
}

impl HttpUploader {
    /// Create an uploader bound to the current tokio runtime
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| Error::TelemetryInit(format!("No async runtime for uploads: {}", e)))?;
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| Error::TelemetryInit(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, runtime })
    }

    async fn send<'h>(
        &self,
        url: &str,
        body: Vec<u8>,
        headers: impl IntoIterator<Item = (&'h str, &'h str)>,
    ) -> UploadResult {
        let mut request = self.client.post(url).body(body);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                tracing::debug!(%url, %status, "Ping upload finished");
                UploadResult::http_status(i32::from(status.as_u16()))
            }
            Err(e) => {
                tracing::warn!("Ping upload to {} failed: {}", url, e);
                UploadResult::recoverable_failure()
            }
        }
    }
}

impl PingUploader for HttpUploader {
    fn upload(&self, upload_request: PingUploadRequest) -> UploadResult {
        let PingUploadRequest {
            url, body, headers, ..
        } = upload_request;
        let headers = headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()));
        self.runtime.block_on(self.send(&url, body, headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// Accept one request, answer with `status` and return the raw request head
    fn serve_once(status: u16) -> (String, std::thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/submit/burnham/discovery/1/abc", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = vec![0u8; 8192];
            let n = stream.read(&mut buf).unwrap();
            let response = format!(
                "HTTP/1.1 {} Status\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                status
            );
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&buf[..n]).to_string()
        });
        (url, handle)
    }

    #[tokio::test]
    async fn test_reports_http_status_and_forwards_headers() {
        let uploader = HttpUploader::new(Duration::from_secs(5)).unwrap();
        let (url, server) = serve_once(200);

        let result = uploader
            .send(&url, b"{}".to_vec(), [("X-Debug-ID", "burnham-tag")])
            .await;

        assert!(matches!(result, UploadResult::HttpStatus { code: 200 }));
        let head = server.join().unwrap().to_lowercase();
        assert!(head.starts_with("post /submit/burnham/discovery/1/abc"));
        assert!(head.contains("x-debug-id: burnham-tag"));
    }

    #[tokio::test]
    async fn test_server_errors_are_passed_to_glean() {
        let uploader = HttpUploader::new(Duration::from_secs(5)).unwrap();
        let (url, server) = serve_once(503);

        let result = uploader
            .send(&url, Vec::new(), [("Content-Type", "application/json")])
            .await;

        assert!(matches!(result, UploadResult::HttpStatus { code: 503 }));
        server.join().unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_server_is_recoverable() {
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let uploader = HttpUploader::new(Duration::from_secs(5)).unwrap();

        let result = uploader
            .send(
                &format!("http://127.0.0.1:{}/submit", port),
                Vec::new(),
                [("Content-Type", "application/json")],
            )
            .await;

        assert!(matches!(result, UploadResult::RecoverableFailure { .. }));
    }

    #[test]
    fn test_requires_runtime() {
        let err = HttpUploader::new(Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, Error::TelemetryInit(_)));
    }
}
