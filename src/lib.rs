pub mod api;
pub mod arrival;
pub mod config;
pub mod display;
pub mod error;
pub mod filter;
pub mod poll;
pub mod processor;
pub mod time;

pub use api::{HttpResponse, Transport, UreqTransport};
pub use arrival::{ArrivalRecord, ArrivalStore};
pub use config::PollConfig;
pub use display::{
    render_arrivals, render_disconnected, render_starting, Color, ConsoleRenderer, Layout, Renderer,
};
pub use error::{DecodeError, TransportError};
pub use filter::matches;
pub use poll::{CycleOutcome, PollCycle, PollState};
pub use processor::process;
pub use time::normalize_time;

#[cfg(feature = "display")]
pub use display::LedMatrixRenderer;
