use std::{
    sync::{
        Arc,
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    time::Duration,
};

use log::debug;
use serde_json::Value;
use tokio::{runtime::Runtime, task::AbortHandle};

use crate::{
    RacePaceError,
    fetch::Ticket,
    prediction::{ApiRequest, PredictionBackend},
};

const HTTP_WORKER_THREADS: usize = 2;

/// Which fetch slot a completion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    LapTime,
    RacePace,
    Probe,
    SampleLapTime,
    SampleRacePace,
}

#[derive(Debug)]
pub struct Completion {
    pub target: Target,
    pub ticket: Ticket,
    pub result: Result<Value, RacePaceError>,
}

/// Runs requests in the background and hands their raw results back over a channel.
///
/// The dispatcher does not order or filter completions. Callers match each
/// completion against their own fetch slot before using it.
pub struct Dispatcher<B> {
    runtime: Runtime,
    backend: Arc<B>,
    completion_tx: Sender<Completion>,
    completion_rx: Receiver<Completion>,
    waker: Option<Waker>,
}

/// Called from the runtime after each completion is queued, typically to request a UI repaint.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

impl<B: PredictionBackend> Dispatcher<B> {
    pub fn new(backend: B) -> Result<Self, RacePaceError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(HTTP_WORKER_THREADS)
            .thread_name("racepace-http")
            .enable_all()
            .build()
            .map_err(|e| RacePaceError::Runtime { source: e })?;
        let (completion_tx, completion_rx) = mpsc::channel::<Completion>();

        Ok(Self {
            runtime,
            backend: Arc::new(backend),
            completion_tx,
            completion_rx,
            waker: None,
        })
    }

    pub fn set_waker(&mut self, waker: Waker) {
        self.waker = Some(waker);
    }

    pub fn dispatch(&self, target: Target, ticket: Ticket, request: ApiRequest) -> AbortHandle {
        let backend = Arc::clone(&self.backend);
        let completion_tx = self.completion_tx.clone();
        let waker = self.waker.clone();
        debug!(
            "Dispatching {} for {:?} (generation {})",
            request.name(),
            target,
            ticket.generation()
        );

        let handle = self.runtime.spawn(async move {
            let result = backend.fetch(&request).await;
            if completion_tx
                .send(Completion {
                    target,
                    ticket,
                    result,
                })
                .is_err()
            {
                debug!("Completion receiver dropped, discarding {:?} result", target);
            } else if let Some(waker) = waker {
                waker();
            }
        });
        handle.abort_handle()
    }

    pub fn try_next(&self) -> Option<Completion> {
        self.completion_rx.try_recv().ok()
    }

    /// Blocks until a completion arrives or the timeout expires.
    pub fn next_timeout(&self, timeout: Duration) -> Option<Completion> {
        match self.completion_rx.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
