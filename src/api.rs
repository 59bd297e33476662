use crate::error::TransportError;
use std::io::Read;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

// Stop prediction payloads are a few tens of KB; anything past this is cut off
// and will fail to decode.
const MAX_BODY_BYTES: u64 = 2 * 1024 * 1024;

/// Status and raw body of a completed HTTP exchange (any status code).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network side of the poll loop.
///
/// One blocking request at a time. `fetch` only returns `Err` when no HTTP
/// status was obtained at all; 4xx/5xx replies come back as `Ok`.
pub trait Transport {
    fn is_connected(&mut self) -> bool;

    fn fetch(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError>;
}

pub struct UreqTransport {
    agent: ureq::Agent,
    probe: Option<(String, u16)>,
    probe_timeout: Duration,
}

impl UreqTransport {
    pub fn new(endpoint_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        let probe = endpoint_host_port(endpoint_url);
        if probe.is_none() {
            warn!(
                url = endpoint_url,
                "Cannot derive host from endpoint, connectivity probe disabled"
            );
        }
        Self {
            agent,
            probe,
            probe_timeout: Duration::from_secs(3),
        }
    }
}

impl Transport for UreqTransport {
    // Resolve the endpoint and open (then drop) a TCP connection to it
    fn is_connected(&mut self) -> bool {
        let Some((host, port)) = &self.probe else {
            return true;
        };

        let addrs = match (host.as_str(), *port).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!(host = %host, "DNS lookup failed: {}", e);
                return false;
            }
        };

        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.probe_timeout) {
                Ok(_) => return true,
                Err(e) => debug!(%addr, "Connect probe failed: {}", e),
            }
        }
        false
    }

    #[instrument(skip(self, headers))]
    fn fetch(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError> {
        info!("Fetching predictions from API: {}", url);
        let start_time = Instant::now();

        let mut request = self.agent.get(url);
        for (name, value) in headers {
            request = request.set(name, value);
        }

        let response = match request.call() {
            Ok(r) => r,
            Err(ureq::Error::Status(code, r)) => {
                let elapsed_ms = start_time.elapsed().as_millis();
                warn!(elapsed_ms, status = code, "HTTP status error");
                r
            }
            Err(ureq::Error::Transport(e)) => {
                let elapsed_ms = start_time.elapsed().as_millis();
                error!(elapsed_ms, "HTTP error: {}", e);
                return Err(TransportError::Request {
                    message: e.to_string(),
                    elapsed_ms,
                });
            }
        };

        let status = response.status();
        let mut body = Vec::new();
        if let Err(source) = response.into_reader().take(MAX_BODY_BYTES).read_to_end(&mut body) {
            let elapsed_ms = start_time.elapsed().as_millis();
            error!(elapsed_ms, "HTTP read error: {}", source);
            return Err(TransportError::Read { source, elapsed_ms });
        }

        info!(
            elapsed_ms = start_time.elapsed().as_millis(),
            status,
            bytes = body.len(),
            "API request finished"
        );

        Ok(HttpResponse { status, body })
    }
}

// "https://host:port/path?query" -> (host, port), scheme default port if absent
fn endpoint_host_port(url: &str) -> Option<(String, u16)> {
    let (scheme, rest) = url.split_once("://")?;
    let default_port = match scheme {
        "https" => 443,
        "http" => 80,
        _ => return None,
    };

    let authority = rest.split(['/', '?', '#']).next()?;
    let authority = authority.rsplit('@').next()?;

    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => {
            (host, port.parse().ok()?)
        }
        _ => (authority, default_port),
    };

    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return None;
    }
    Some((host.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_port_default_https() {
        assert_eq!(
            endpoint_host_port(
                "https://api.opendata.metlink.org.nz/v1/stop-predictions?stop_id=3234"
            ),
            Some(("api.opendata.metlink.org.nz".to_string(), 443))
        );
    }

    #[test]
    fn test_host_port_explicit() {
        assert_eq!(
            endpoint_host_port("http://localhost:8080/predictions"),
            Some(("localhost".to_string(), 8080))
        );
        assert_eq!(
            endpoint_host_port("http://[::1]:9000"),
            Some(("::1".to_string(), 9000))
        );
    }

    #[test]
    fn test_host_port_query_without_path() {
        assert_eq!(
            endpoint_host_port("http://example.com?x=1"),
            Some(("example.com".to_string(), 80))
        );
    }

    #[test]
    fn test_host_port_rejects_unknown() {
        assert_eq!(endpoint_host_port("ftp://example.com"), None);
        assert_eq!(endpoint_host_port("not a url"), None);
        assert_eq!(endpoint_host_port("https:///path"), None);
    }

    #[test]
    fn test_success_range() {
        let ok = HttpResponse { status: 200, body: Vec::new() };
        let not_found = HttpResponse { status: 404, body: Vec::new() };
        assert!(ok.is_success());
        assert!(!not_found.is_success());
    }

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        // Port 1 on localhost is closed on any sane test host
        let mut transport = UreqTransport::new("http://127.0.0.1:1/", Duration::from_secs(2));
        assert!(!transport.is_connected());
        let result = transport.fetch("http://127.0.0.1:1/", &[("accept", "application/json")]);
        assert!(matches!(result, Err(TransportError::Request { .. })));
    }
}
