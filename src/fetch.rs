use log::{debug, error};
use tokio::task::AbortHandle;

use crate::RacePaceError;

/// Lifecycle of the most recent request of one kind.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Generation handed out when a request begins. A completion carrying an older
/// ticket than the slot's current one is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Fetch state for one request kind plus the bookkeeping that keeps only the
/// newest request's response.
#[derive(Debug)]
pub struct FetchSlot<T> {
    state: FetchState<T>,
    generation: u64,
    in_flight: Option<AbortHandle>,
}

impl<T> Default for FetchSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FetchSlot<T> {
    pub fn new() -> Self {
        Self {
            state: FetchState::Idle,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Starts a new request. Any request still in flight for this slot is aborted
    /// and its result will be ignored if it arrives anyway.
    pub fn begin(&mut self) -> Ticket {
        if let Some(previous) = self.in_flight.take() {
            debug!("Aborting request generation {}", self.generation);
            previous.abort();
        }
        self.generation += 1;
        self.state = FetchState::Loading;
        Ticket(self.generation)
    }

    pub fn attach(&mut self, ticket: Ticket, handle: AbortHandle) {
        if self.is_current(ticket) {
            self.in_flight = Some(handle);
        } else {
            handle.abort();
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    /// Commits a result if it belongs to the newest request. Returns whether it was committed.
    pub fn complete(&mut self, ticket: Ticket, result: Result<T, RacePaceError>) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "Discarding stale response generation {} (current {})",
                ticket.0, self.generation
            );
            return false;
        }
        self.in_flight = None;
        self.state = match result {
            Ok(value) => FetchState::Success(value),
            Err(e) => {
                error!("Request failed ({}): {:?}", e.kind(), e);
                FetchState::Failed(e.display_message().to_string())
            }
        };
        true
    }
}
