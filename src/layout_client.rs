use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use thiserror::Error;
use tracing::info;

use crate::model::SegmentBox;

#[derive(Debug, Error)]
pub enum LayoutServiceError {
    #[error("failed to build layout backend client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("layout backend request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("layout backend at {url} returned {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("layout backend at {url} returned an undecodable response: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Clone)]
pub struct LayoutClient {
    base_url: String,
    client: Client,
}

impl LayoutClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, LayoutServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LayoutServiceError::Client)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn endpoint(&self, fast: bool) -> String {
        if fast {
            format!("{}/fast", self.base_url)
        } else {
            format!("{}/", self.base_url)
        }
    }

    /// Uploads the PDF once and returns the backend's candidate boxes. Failures are not retried.
    pub fn segment_boxes(
        &self,
        pdf_path: &Path,
        pdf_bytes: Vec<u8>,
        fast: bool,
    ) -> Result<Vec<SegmentBox>, LayoutServiceError> {
        let url = self.endpoint(fast);
        let file_name = pdf_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document.pdf")
            .to_string();

        info!(url = %url, file = %file_name, bytes = pdf_bytes.len(), "requesting layout analysis");

        let part = Part::bytes(pdf_bytes)
            .file_name(file_name)
            .mime_str("application/pdf")
            .map_err(|source| LayoutServiceError::Request {
                url: url.clone(),
                source,
            })?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|source| LayoutServiceError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LayoutServiceError::Status {
                url,
                status,
                body: body.trim().to_string(),
            });
        }

        let boxes = response
            .json::<Vec<SegmentBox>>()
            .map_err(|source| LayoutServiceError::Decode {
                url: url.clone(),
                source,
            })?;

        info!(url = %url, candidates = boxes.len(), "layout analysis received");
        Ok(boxes)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    use super::*;

    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            drain_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}")
    }

    fn drain_request(stream: &mut TcpStream) {
        let mut received = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let read = stream.read(&mut buf).unwrap();
            if read == 0 {
                return;
            }
            received.extend_from_slice(&buf[..read]);

            let Some(header_end) = received.windows(4).position(|window| window == b"\r\n\r\n")
            else {
                continue;
            };
            let headers = String::from_utf8_lossy(&received[..header_end]).to_ascii_lowercase();
            let body = &received[header_end + 4..];
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok());

            match content_length {
                Some(length) if body.len() >= length => return,
                None if body.ends_with(b"0\r\n\r\n") => return,
                _ => {}
            }
        }
    }

    #[test]
    fn endpoint_selects_fast_route_and_trims_trailing_slash() {
        let client = LayoutClient::new("http://layout:5060/", None).unwrap();
        assert_eq!(client.endpoint(false), "http://layout:5060/");
        assert_eq!(client.endpoint(true), "http://layout:5060/fast");
    }

    #[test]
    fn unreachable_backend_is_a_request_error() {
        let client =
            LayoutClient::new("http://127.0.0.1:9", Some(Duration::from_secs(2))).unwrap();
        let err = client
            .segment_boxes(Path::new("doc.pdf"), b"%PDF-1.4".to_vec(), false)
            .unwrap_err();
        assert!(matches!(err, LayoutServiceError::Request { .. }));
    }

    #[test]
    fn error_status_is_reported_with_its_body() {
        let base_url = serve_once("500 Internal Server Error", "layout model crashed");
        let client = LayoutClient::new(&base_url, Some(Duration::from_secs(5))).unwrap();
        let err = client
            .segment_boxes(Path::new("doc.pdf"), b"%PDF-1.4".to_vec(), true)
            .unwrap_err();

        match err {
            LayoutServiceError::Status { url, status, body } => {
                assert_eq!(url, format!("{base_url}/fast"));
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "layout model crashed");
            }
            other => panic!("expected a status error, got {other:?}"),
        }
    }

    #[test]
    fn non_json_body_is_a_decode_error() {
        let base_url = serve_once("200 OK", "not json");
        let client = LayoutClient::new(&base_url, Some(Duration::from_secs(5))).unwrap();
        let err = client
            .segment_boxes(Path::new("doc.pdf"), b"%PDF-1.4".to_vec(), false)
            .unwrap_err();

        assert!(matches!(err, LayoutServiceError::Decode { .. }));
    }
}
