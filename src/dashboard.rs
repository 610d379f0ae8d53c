use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use log::{debug, info, warn};
use serde_json::Value;

use crate::{
    RacePaceError,
    dispatcher::{Completion, Dispatcher, Target},
    fetch::{FetchSlot, FetchState},
    form::PredictionForm,
    mapper::{self, LapPredictionView, RacePaceView},
    prediction::{ApiRequest, PredictionBackend, RequestParameters},
    shell::View,
};

const SAMPLE_RACE_LAPS: u32 = 5;

/// Form, last submitted parameters and fetch state of the lap time panel.
#[derive(Debug)]
pub struct LapTimePanel {
    pub form: PredictionForm,
    pub fetch: FetchSlot<LapPredictionView>,
    /// Parameters of the newest dispatched request
    pub requested: Option<RequestParameters>,
    /// Reason the last submit was blocked, if it was
    pub notice: Option<String>,
}

impl Default for LapTimePanel {
    fn default() -> Self {
        Self {
            form: PredictionForm::lap_time(),
            fetch: FetchSlot::new(),
            requested: None,
            notice: None,
        }
    }
}

#[derive(Debug)]
pub struct RacePacePanel {
    pub form: PredictionForm,
    pub fetch: FetchSlot<RacePaceView>,
    pub requested: Option<RequestParameters>,
    pub notice: Option<String>,
}

impl Default for RacePacePanel {
    fn default() -> Self {
        Self {
            form: PredictionForm::race_pace(),
            fetch: FetchSlot::new(),
            requested: None,
            notice: None,
        }
    }
}

/// Compact body of the liveness probe.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub body: String,
}

#[derive(Debug, Default)]
pub struct ConnectionPanel {
    pub probe: FetchSlot<ProbeReport>,
    pub sample_lap_time: FetchSlot<LapPredictionView>,
    pub sample_race_pace: FetchSlot<RacePaceView>,
}

impl ConnectionPanel {
    pub fn is_loading(&self) -> bool {
        self.probe.is_loading()
            || self.sample_lap_time.is_loading()
            || self.sample_race_pace.is_loading()
    }

    pub fn has_run(&self) -> bool {
        !matches!(self.probe.state(), FetchState::Idle)
    }

    /// `(name, passed)` for every check that has finished.
    pub fn results(&self) -> Vec<(&'static str, Option<bool>)> {
        fn outcome<T>(state: &FetchState<T>) -> Option<bool> {
            match state {
                FetchState::Success(_) => Some(true),
                FetchState::Failed(_) => Some(false),
                FetchState::Idle | FetchState::Loading => None,
            }
        }
        vec![
            ("Backend Connection", outcome(self.probe.state())),
            ("Lap Time Prediction", outcome(self.sample_lap_time.state())),
            (
                "Race Pace Simulation",
                outcome(self.sample_race_pace.state()),
            ),
        ]
    }
}

/// State behind the dashboard window: the selected view and every panel.
///
/// Panels live as long as the dashboard, so switching views never cancels a
/// request or clears a result.
pub struct Dashboard<B> {
    dispatcher: Dispatcher<B>,
    view: View,
    pub lap_time: LapTimePanel,
    pub race_pace: RacePacePanel,
    pub connection: ConnectionPanel,
}

impl<B: PredictionBackend> Dashboard<B> {
    pub fn new(backend: B) -> Result<Self, RacePaceError> {
        Ok(Self {
            dispatcher: Dispatcher::new(backend)?,
            view: View::default(),
            lap_time: LapTimePanel::default(),
            race_pace: RacePacePanel::default(),
            connection: ConnectionPanel::default(),
        })
    }

    /// Registers a callback run whenever a response is ready to be polled.
    pub fn on_completion(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.dispatcher.set_waker(Arc::new(waker));
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn select_view(&mut self, view: View) {
        self.view = view;
    }

    /// Validates the lap time form and dispatches a request. Returns false when blocked.
    pub fn submit_lap_time(&mut self) -> bool {
        let panel = &mut self.lap_time;
        let params = match panel.form.to_parameters() {
            Ok(params) => params,
            Err(violation) => {
                warn!("Lap time request blocked: {}", violation);
                panel.notice = Some(violation.message());
                return false;
            }
        };
        panel.notice = None;
        panel.requested = Some(params.clone());

        let ticket = panel.fetch.begin();
        let handle =
            self.dispatcher
                .dispatch(Target::LapTime, ticket, ApiRequest::LapTime(params));
        panel.fetch.attach(ticket, handle);
        true
    }

    pub fn submit_race_pace(&mut self) -> bool {
        let panel = &mut self.race_pace;
        let params = match panel.form.to_parameters() {
            Ok(params) => params,
            Err(violation) => {
                warn!("Race pace request blocked: {}", violation);
                panel.notice = Some(violation.message());
                return false;
            }
        };
        panel.notice = None;
        panel.requested = Some(params.clone());

        let ticket = panel.fetch.begin();
        let handle =
            self.dispatcher
                .dispatch(Target::RacePace, ticket, ApiRequest::RacePace(params));
        panel.fetch.attach(ticket, handle);
        true
    }

    /// Probes the service and runs one sample prediction of each kind.
    pub fn run_connection_tests(&mut self) {
        let panel = &mut self.connection;

        let ticket = panel.probe.begin();
        let handle = self
            .dispatcher
            .dispatch(Target::Probe, ticket, ApiRequest::Probe);
        panel.probe.attach(ticket, handle);

        let ticket = panel.sample_lap_time.begin();
        let handle = self.dispatcher.dispatch(
            Target::SampleLapTime,
            ticket,
            ApiRequest::LapTime(RequestParameters::sample(None)),
        );
        panel.sample_lap_time.attach(ticket, handle);

        let ticket = panel.sample_race_pace.begin();
        let handle = self.dispatcher.dispatch(
            Target::SampleRacePace,
            ticket,
            ApiRequest::RacePace(RequestParameters::sample(Some(SAMPLE_RACE_LAPS))),
        );
        panel.sample_race_pace.attach(ticket, handle);
    }

    pub fn is_busy(&self) -> bool {
        self.lap_time.fetch.is_loading()
            || self.race_pace.fetch.is_loading()
            || self.connection.is_loading()
    }

    /// Applies every completion that is ready without blocking. Returns how many were committed.
    pub fn poll_completions(&mut self) -> usize {
        let mut committed = 0;
        while let Some(completion) = self.dispatcher.try_next() {
            if self.apply(completion) {
                committed += 1;
            }
        }
        committed
    }

    /// Blocks until no request is loading or the timeout expires. Returns whether everything settled.
    pub fn wait_until_settled(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_busy() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            match self.dispatcher.next_timeout(deadline - now) {
                Some(completion) => {
                    self.apply(completion);
                }
                None => return !self.is_busy(),
            }
        }
        true
    }

    fn apply(&mut self, completion: Completion) -> bool {
        let Completion {
            target,
            ticket,
            result,
        } = completion;

        match target {
            Target::LapTime => {
                let panel = &mut self.lap_time;
                if !panel.fetch.is_current(ticket) {
                    debug!("Discarding stale lap time response");
                    return false;
                }
                let mapped = result.and_then(|body| mapper::map_lap_prediction(&body));
                if let Ok(view) = &mapped {
                    info!(
                        "Lap time prediction for {} at {}: {}",
                        view.driver, view.circuit, view.predicted_lap_time_formatted
                    );
                }
                panel.fetch.complete(ticket, mapped)
            }
            Target::RacePace => {
                let panel = &mut self.race_pace;
                if !panel.fetch.is_current(ticket) {
                    debug!("Discarding stale race pace response");
                    return false;
                }
                let expected_laps = panel.requested.as_ref().and_then(|p| p.laps);
                let mapped =
                    result.and_then(|body| mapper::map_race_pace(&body, expected_laps));
                if let Ok(view) = &mapped {
                    info!(
                        "Race pace for {}: {} laps, {} unparsed",
                        view.driver,
                        view.lap_count(),
                        view.gap_count()
                    );
                }
                panel.fetch.complete(ticket, mapped)
            }
            Target::Probe => {
                let mapped = result.map(|body| ProbeReport {
                    body: compact_body(&body),
                });
                self.connection.probe.complete(ticket, mapped)
            }
            Target::SampleLapTime => {
                let mapped = result.and_then(|body| mapper::map_lap_prediction(&body));
                self.connection.sample_lap_time.complete(ticket, mapped)
            }
            Target::SampleRacePace => {
                let mapped = result
                    .and_then(|body| mapper::map_race_pace(&body, Some(SAMPLE_RACE_LAPS)));
                self.connection.sample_race_pace.complete(ticket, mapped)
            }
        }
    }
}

fn compact_body(body: &Value) -> String {
    const MAX_PROBE_CHARS: usize = 200;
    let text = body.to_string();
    if text.chars().count() > MAX_PROBE_CHARS {
        let truncated: String = text.chars().take(MAX_PROBE_CHARS).collect();
        format!("{truncated}…")
    } else {
        text
    }
}
