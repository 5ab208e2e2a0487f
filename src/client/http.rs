use std::time::Duration;

use super::{parse_response, PredictError, PredictRequest, PredictionService, DEFAULT_TIMEOUT};

/// JSON-over-HTTP prediction service.
///
/// Sends `POST <endpoint>` with `{"text": ...}` and expects
/// `{"predictions": [...]}` back. A request that takes longer than the
/// timeout fails as a transport error.
pub struct HttpPredictionService {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpPredictionService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            endpoint: endpoint.into(),
            agent,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PredictionService for HttpPredictionService {
    fn predict(&self, text: &str) -> Result<Vec<String>, PredictError> {
        let payload = serde_json::to_string(&PredictRequest { text })
            .map_err(|e| PredictError::Decode(e.to_string()))?;

        let url = self.endpoint.as_str();
        let body = self
            .agent
            .post(url)
            .header("Content-Type", "application/json")
            .send(payload.as_str())
            .map_err(|e| match e {
                ureq::Error::StatusCode(code) => PredictError::Status(code),
                other => PredictError::Transport(format!("{url}: {other}")),
            })?
            .into_body()
            .read_to_string()
            .map_err(|e| PredictError::Transport(format!("{url}: {e}")))?;

        parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    use super::*;

    /// Serve exactly one HTTP request with a canned response.
    /// Returns the endpoint URL and a receiver for the raw request body.
    fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            let header_end = loop {
                let n = stream.read(&mut chunk).unwrap();
                assert!(n > 0, "connection closed before headers");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let head = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
            let content_length: usize = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .map(|v| v.trim().parse().unwrap())
                .unwrap_or(0);
            while buf.len() < header_end + content_length {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let request_body = String::from_utf8_lossy(&buf[header_end..]).into_owned();
            let _ = tx.send(request_body);

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        (format!("http://{addr}/predict"), rx)
    }

    #[test]
    fn test_posts_text_and_reads_predictions() {
        let (url, rx) = serve_once("200 OK", r#"{"predictions": ["love", "look"]}"#);
        let svc = HttpPredictionService::new(url);
        assert_eq!(svc.predict("I lo").unwrap(), vec!["love", "look"]);
        assert_eq!(rx.recv().unwrap(), r#"{"text":"I lo"}"#);
    }

    #[test]
    fn test_non_success_status() {
        let (url, _rx) = serve_once("500 Internal Server Error", r#"{"error": "boom"}"#);
        let svc = HttpPredictionService::new(url);
        assert!(matches!(svc.predict("I lo"), Err(PredictError::Status(500))));
    }

    #[test]
    fn test_malformed_body() {
        let (url, _rx) = serve_once("200 OK", r#"{"suggestions": ["love"]}"#);
        let svc = HttpPredictionService::new(url);
        assert!(matches!(svc.predict("I lo"), Err(PredictError::Decode(_))));
    }

    #[test]
    fn test_hung_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and then never answer
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_secs(5));
            drop(stream);
        });

        let url = format!("http://{addr}/predict");
        let svc = HttpPredictionService::with_timeout(url, Duration::from_millis(200));
        let started = std::time::Instant::now();
        assert!(matches!(svc.predict("I lo"), Err(PredictError::Transport(_))));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_connection_refused() {
        // Bind then drop to get a port with nothing listening
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let svc = HttpPredictionService::new(format!("http://127.0.0.1:{port}/predict"));
        assert!(matches!(svc.predict("I lo"), Err(PredictError::Transport(_))));
    }
}
