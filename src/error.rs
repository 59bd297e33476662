use thiserror::Error;

// Request never produced an HTTP status (DNS, connect, TLS, read)
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error after {elapsed_ms} ms: {message}")]
    Request { message: String, elapsed_ms: u128 },

    #[error("HTTP read error after {elapsed_ms} ms: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        elapsed_ms: u128,
    },
}

// Response body is not well-formed JSON
#[derive(Error, Debug)]
#[error("JSON parse error: {0}")]
pub struct DecodeError(#[from] pub serde_json::Error);
