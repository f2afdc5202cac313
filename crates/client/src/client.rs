use crate::source::HistorySource;
use carbon_config::ApiConfig;
use carbon_core::{History, ReportError, Result};
use std::future::Future;
use std::io::Read;
use std::time::Duration;
use tracing::debug;

/// Path of the history endpoint below `endpoint_base`.
const HISTORY_PATH: &str = "/carbon-intensity/history";

/// Header carrying the zone-scoped API token.
const AUTH_HEADER: &str = "auth-token";

/// Upper bound for a history body.  A day of hourly samples is a few KiB.
const MAX_HISTORY_BYTES: usize = 1024 * 1024;

/// Blocking `ureq` client for the Electricity Maps v3 API.
///
/// Requests run on Tokio's blocking pool so the caller's task only
/// suspends while the response is in flight.
#[derive(Debug, Clone)]
pub struct ElectricityMapsClient {
    agent: ureq::Agent,
}

impl ElectricityMapsClient {
    /// Build a client using the timeout from `api`.  `timeout_secs = 0`
    /// keeps the transport's own defaults.
    pub fn from_config(api: &ApiConfig) -> Self {
        let mut builder = ureq::AgentBuilder::new()
            .user_agent(concat!("carbon/", env!("CARGO_PKG_VERSION")));
        if api.timeout_secs > 0 {
            let timeout = Duration::from_secs(api.timeout_secs);
            builder = builder.timeout_connect(timeout).timeout_read(timeout);
        }
        Self {
            agent: builder.build(),
        }
    }

    /// Perform the request on the current thread.
    pub fn fetch_blocking(&self, api: &ApiConfig) -> Result<History> {
        let url = history_url(api);
        debug!(zone = %api.zone_code, "GET {url}");

        let mut request = self.agent.get(&url).query("zone", &api.zone_code);
        if !api.auth_token.is_empty() {
            request = request.set(AUTH_HEADER, &api.auth_token);
        }

        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = read_body_limited(response).unwrap_or_else(|err| err.to_string());
                return Err(ReportError::Status { code, body });
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(ReportError::Network(err.to_string()));
            }
        };

        let body = read_body_limited(response)?;
        parse_history(&body)
    }
}

impl Default for ElectricityMapsClient {
    fn default() -> Self {
        Self::from_config(&ApiConfig::default())
    }
}

impl HistorySource for ElectricityMapsClient {
    fn fetch_history(&self, api: &ApiConfig) -> impl Future<Output = Result<History>> + Send {
        let client = self.clone();
        let api = api.clone();
        async move {
            tokio::task::spawn_blocking(move || client.fetch_blocking(&api))
                .await
                .map_err(|e| ReportError::Network(format!("fetch task failed: {e}")))?
        }
    }
}

/// Endpoint URL for the history call, without the query string.
pub fn history_url(api: &ApiConfig) -> String {
    format!("{}{HISTORY_PATH}", api.endpoint_base.trim_end_matches('/'))
}

/// Decode a history body.
pub fn parse_history(body: &str) -> Result<History> {
    serde_json::from_str(body).map_err(|e| ReportError::Parse(e.to_string()))
}

fn read_body_limited(response: ureq::Response) -> Result<String> {
    let mut limited = response.into_reader().take(MAX_HISTORY_BYTES as u64 + 1);
    let mut bytes = Vec::new();
    limited
        .read_to_end(&mut bytes)
        .map_err(|e| ReportError::Network(format!("reading body: {e}")))?;
    if bytes.len() > MAX_HISTORY_BYTES {
        return Err(ReportError::Parse(format!(
            "response exceeded {MAX_HISTORY_BYTES} bytes"
        )));
    }
    String::from_utf8(bytes).map_err(|e| ReportError::Parse(format!("body is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Answer one request with `response` and hand back the raw request head.
    fn serve_once(response: String) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                let _ = tx.send(String::from_utf8_lossy(&head).into_owned());
                let _ = stream.write_all(response.as_bytes());
            }
        });
        (format!("http://{addr}"), rx)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn api_for(base: String) -> ApiConfig {
        ApiConfig {
            zone_code: "FR".into(),
            auth_token: "secret-token".into(),
            endpoint_base: base,
            timeout_secs: 5,
        }
    }

    const BODY: &str = r#"{"zone":"FR","history":[
        {"carbonIntensity":42,"datetime":"2024-01-01T00:00Z","isEstimated":false},
        {"carbonIntensity":55,"datetime":"2024-01-01T01:00Z","isEstimated":true}
    ]}"#;

    #[test]
    fn history_url_trims_trailing_slash() {
        let mut api = ApiConfig::default();
        api.endpoint_base = "https://example.invalid/v3/".into();
        assert_eq!(
            history_url(&api),
            "https://example.invalid/v3/carbon-intensity/history"
        );
    }

    #[test]
    fn parse_history_rejects_garbage() {
        assert!(matches!(
            parse_history("<html>"),
            Err(ReportError::Parse(_))
        ));
        assert!(matches!(
            parse_history(r#"{"data":[]}"#),
            Err(ReportError::Parse(_))
        ));
    }

    #[test]
    fn parse_history_tolerates_null_intensity() {
        let history = parse_history(
            r#"{"history":[{"carbonIntensity":42,"datetime":"t0","isEstimated":false},{"carbonIntensity":null,"datetime":"t1","isEstimated":true}]}"#,
        )
        .unwrap();
        let latest = history.latest_measured().unwrap();
        assert_eq!((latest.measured_value(), latest.datetime.as_str()), (Some(42.0), "t0"));
    }

    #[test]
    fn sends_zone_query_and_auth_header() {
        let (base, requests) = serve_once(http_response("200 OK", BODY));
        let api = api_for(base);
        let history = ElectricityMapsClient::from_config(&api)
            .fetch_blocking(&api)
            .unwrap();

        assert_eq!(history.history.len(), 2);
        let head = requests.recv().unwrap();
        assert!(head.starts_with("GET /carbon-intensity/history?zone=FR "));
        assert!(head.to_ascii_lowercase().contains("auth-token: secret-token"));
    }

    #[test]
    fn empty_token_sends_no_auth_header() {
        let (base, requests) = serve_once(http_response("200 OK", r#"{"history":[]}"#));
        let mut api = api_for(base);
        api.auth_token.clear();
        ElectricityMapsClient::from_config(&api)
            .fetch_blocking(&api)
            .unwrap();
        let head = requests.recv().unwrap();
        assert!(!head.to_ascii_lowercase().contains("auth-token"));
    }

    #[test]
    fn server_error_maps_to_status() {
        let (base, _requests) = serve_once(http_response("500 Internal Server Error", "oops"));
        let api = api_for(base);
        let err = ElectricityMapsClient::from_config(&api)
            .fetch_blocking(&api)
            .unwrap_err();
        match err {
            ReportError::Status { code, body } => {
                assert_eq!(code, 500);
                assert_eq!(body, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_body_maps_to_parse() {
        let (base, _requests) = serve_once(http_response("200 OK", "{\"history\": [1, 2"));
        let api = api_for(base);
        let err = ElectricityMapsClient::from_config(&api)
            .fetch_blocking(&api)
            .unwrap_err();
        assert!(matches!(err, ReportError::Parse(_)));
    }

    #[test]
    fn refused_connection_maps_to_network() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let api = api_for(format!("http://{addr}"));
        let err = ElectricityMapsClient::from_config(&api)
            .fetch_blocking(&api)
            .unwrap_err();
        assert!(matches!(err, ReportError::Network(_)));
    }

    #[tokio::test]
    async fn async_fetch_runs_on_blocking_pool() {
        let (base, _requests) = serve_once(http_response("200 OK", BODY));
        let api = api_for(base);
        let history = ElectricityMapsClient::from_config(&api)
            .fetch_history(&api)
            .await
            .unwrap();
        assert_eq!(history.latest_measured().unwrap().measured_value(), Some(42.0));
    }
}
