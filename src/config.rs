use clap::Parser;

pub const DEFAULT_ENDPOINT_URL: &str =
    "https://api.opendata.metlink.org.nz/v1/stop-predictions?stop_id=3234";

/// Static settings for the poll loop, read once at startup.
#[derive(Debug, Clone, Parser)]
#[command(name = "rusty-metlink", about = "Metlink stop prediction display")]
pub struct PollConfig {
    /// Stop predictions endpoint
    #[arg(long, env = "METLINK_ENDPOINT_URL", default_value = DEFAULT_ENDPOINT_URL)]
    pub endpoint_url: String,

    /// Value sent in the x-api-key header
    #[arg(long, env = "METLINK_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Service id to show (e.g. "1")
    #[arg(long = "route", env = "METLINK_ROUTE", default_value = "1")]
    pub route_filter: String,

    /// Destination name to show (exact, case-sensitive)
    #[arg(long = "destination", env = "METLINK_DESTINATION", default_value = "Island Bay")]
    pub destination_filter: String,

    /// Maximum number of arrivals kept per cycle
    #[arg(long, env = "METLINK_CAPACITY", default_value_t = 4)]
    pub capacity: usize,

    /// Delay between the end of one cycle and the start of the next
    #[arg(long, env = "METLINK_POLL_INTERVAL_MS", default_value_t = 120_000)]
    pub poll_interval_ms: u64,
}

impl PollConfig {
    pub fn request_headers(&self) -> [(&'static str, &str); 2] {
        [("accept", "application/json"), ("x-api-key", self.api_key.as_str())]
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            api_key: String::new(),
            route_filter: "1".to_string(),
            destination_filter: "Island Bay".to_string(),
            capacity: 4,
            poll_interval_ms: 120_000,
        }
    }
}
