use crate::api::Transport;
use crate::arrival::ArrivalStore;
use crate::config::PollConfig;
use crate::display::{render_arrivals, render_disconnected, Layout, Renderer};
use crate::processor::process;
use std::thread;
use tracing::{debug, info, warn};

/// Stage of a poll cycle. Cycles run strictly one after another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    CheckingConnectivity,
    Fetching,
    Processing,
    Rendering,
    Sleeping,
}

/// What one cycle ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No network; nothing fetched, disconnected indicator shown
    Disconnected,
    /// Request produced no HTTP status; screen blanked
    TransportFailed,
    /// Non-2xx reply; screen blanked
    HttpStatus(u16),
    /// Body processed and drawn
    Rendered { accepted: usize },
}

pub struct PollCycle<T, R> {
    config: PollConfig,
    transport: T,
    renderer: R,
    layout: Layout,
    store: ArrivalStore,
    state: PollState,
}

impl<T: Transport, R: Renderer> PollCycle<T, R> {
    pub fn new(config: PollConfig, transport: T, renderer: R, layout: Layout) -> Self {
        let store = ArrivalStore::new(config.capacity);
        Self {
            config,
            transport,
            renderer,
            layout,
            store,
            state: PollState::CheckingConnectivity,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn store(&self) -> &ArrivalStore {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn enter(&mut self, state: PollState) {
        debug!(from = ?self.state, to = ?state, "Poll state transition");
        self.state = state;
    }

    /// Run one cycle up to (not including) the sleep.
    ///
    /// Every failure is handled here; the cycle always ends in `Sleeping`.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        self.enter(PollState::CheckingConnectivity);
        if !self.transport.is_connected() {
            warn!("Network unreachable, skipping fetch");
            render_disconnected(&mut self.renderer, &self.layout);
            self.enter(PollState::Sleeping);
            return CycleOutcome::Disconnected;
        }

        self.enter(PollState::Fetching);
        let headers = self.config.request_headers();
        let fetched = self.transport.fetch(&self.config.endpoint_url, &headers);

        self.enter(PollState::Processing);
        let outcome = match fetched {
            Ok(response) if response.is_success() => {
                let accepted = process(&response.body, &self.config, &mut self.store);
                CycleOutcome::Rendered { accepted }
            }
            Ok(response) => {
                warn!(status = response.status, "Non-success status, showing no arrivals");
                self.store.clear();
                CycleOutcome::HttpStatus(response.status)
            }
            Err(e) => {
                warn!("Fetch failed, showing no arrivals: {}", e);
                self.store.clear();
                CycleOutcome::TransportFailed
            }
        };

        self.enter(PollState::Rendering);
        render_arrivals(&mut self.renderer, &self.layout, &self.store);
        for record in self.store.iter() {
            info!("  - {}", record.format());
        }

        self.enter(PollState::Sleeping);
        outcome
    }

    /// Poll forever, blocking for the configured interval between cycles.
    pub fn run(&mut self) -> ! {
        let interval = self.config.poll_interval();
        info!(interval_ms = self.config.poll_interval_ms, "Starting poll loop");
        loop {
            let outcome = self.run_cycle();
            debug!(?outcome, "Cycle finished");
            thread::sleep(interval);
        }
    }
}
