// Integration tests for the dashboard controller
//
// A scripted backend stands in for the prediction service so these tests can
// control response order, latency and failures:
// - lap time responses echo the requested driver and circuit
// - driver "hamilton" responds slowly, everyone else quickly
// - circuit "nowhere" fails with HTTP 500
// - circuit "glitch" returns one unreadable lap time

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::Duration,
};

use racepace::{
    ApiRequest, DISPLAY_FAILURE_MESSAGE, Dashboard, FetchState, FormField, PredictionBackend,
    RacePaceError, View,
};
use serde_json::{Value, json};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Default)]
struct ScriptedBackend {
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    probe_status: Option<u16>,
}

impl ScriptedBackend {
    fn failing_probe(status: u16) -> Self {
        Self {
            probe_status: Some(status),
            ..Default::default()
        }
    }
}

impl PredictionBackend for ScriptedBackend {
    async fn fetch(&self, request: &ApiRequest) -> Result<Value, RacePaceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
        }

        match request {
            ApiRequest::Probe => match self.probe_status {
                Some(status) => Err(RacePaceError::HttpStatus {
                    url: "http://scripted/".to_string(),
                    status,
                }),
                None => Ok(json!({ "message": "F1 prediction API is running" })),
            },
            ApiRequest::LapTime(params) => {
                let delay = if params.driver == "hamilton" { 400 } else { 10 };
                tokio::time::sleep(Duration::from_millis(delay)).await;
                if params.circuit == "nowhere" {
                    return Err(RacePaceError::HttpStatus {
                        url: "http://scripted/predict/lap_time".to_string(),
                        status: 500,
                    });
                }
                Ok(json!({
                    "driver": params.driver,
                    "circuit": params.circuit,
                    "year": params.year,
                    "predicted_lap_time_formatted": "1:21.046",
                }))
            }
            ApiRequest::RacePace(params) => {
                tokio::time::sleep(Duration::from_millis(10)).await;
                if params.circuit == "nowhere" {
                    return Err(RacePaceError::HttpStatus {
                        url: "http://scripted/predict/race_pace".to_string(),
                        status: 500,
                    });
                }
                let laps = params.laps.unwrap_or(0) as usize;
                let mut lap_times = (0..laps)
                    .map(|lap| format!("1:{:02}.500", 20 + lap % 10))
                    .collect::<Vec<_>>();
                if params.circuit == "glitch" && laps > 2 {
                    lap_times[2] = "abc".to_string();
                }
                Ok(json!({
                    "driver": params.driver,
                    "lap_times": lap_times,
                    "fastest_lap": "1:20.500",
                    "average_lap_time": "1:22.000",
                    "total_race_time": "6:50.000",
                }))
            }
        }
    }
}

fn dashboard(backend: ScriptedBackend) -> Dashboard<ScriptedBackend> {
    Dashboard::new(backend).expect("Could not create dashboard")
}

#[test]
fn test_lap_time_prediction_success() {
    let mut dashboard = dashboard(ScriptedBackend::default());

    assert!(dashboard.submit_lap_time());
    assert!(dashboard.lap_time.fetch.is_loading());
    assert!(dashboard.wait_until_settled(SETTLE_TIMEOUT));

    let prediction = dashboard
        .lap_time
        .fetch
        .state()
        .success()
        .expect("Expected a lap time prediction");
    assert_eq!(prediction.driver, "verstappen");
    assert_eq!(prediction.circuit, "monza");
    assert_eq!(prediction.predicted_lap_time_formatted, "1:21.046");
}

#[test]
fn test_invalid_year_never_dispatches() {
    let backend = ScriptedBackend::default();
    let calls = Arc::clone(&backend.calls);
    let mut dashboard = dashboard(backend);

    dashboard.lap_time.form.set_field(FormField::Year, "1900");
    assert!(!dashboard.submit_lap_time());

    dashboard.race_pace.form.set_field(FormField::Laps, "101");
    assert!(!dashboard.submit_race_pace());

    thread::sleep(Duration::from_millis(50));
    dashboard.poll_completions();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(dashboard.lap_time.fetch.state(), &FetchState::Idle);
    assert_eq!(dashboard.race_pace.fetch.state(), &FetchState::Idle);
    assert!(
        dashboard
            .lap_time
            .notice
            .as_deref()
            .is_some_and(|notice| notice.contains("1950"))
    );
    assert!(
        dashboard
            .race_pace
            .notice
            .as_deref()
            .is_some_and(|notice| notice.contains("laps"))
    );
}

#[test]
fn test_notice_reports_first_failing_rule() {
    let mut dashboard = dashboard(ScriptedBackend::default());
    dashboard.race_pace.form.set_field(FormField::Circuit, "");
    dashboard.race_pace.form.set_field(FormField::Laps, "0");
    dashboard.race_pace.form.set_field(FormField::Year, "3000");

    assert!(!dashboard.submit_race_pace());
    let notice = dashboard.race_pace.notice.clone().unwrap();
    assert!(notice.contains("year"), "unexpected notice: {notice}");

    // fixing the form clears the notice on the next submit
    dashboard.race_pace.form.set_field(FormField::Year, "2023");
    dashboard.race_pace.form.set_field(FormField::Circuit, "spa");
    dashboard.race_pace.form.set_field(FormField::Laps, "3");
    assert!(dashboard.submit_race_pace());
    assert!(dashboard.race_pace.notice.is_none());
    assert!(dashboard.wait_until_settled(SETTLE_TIMEOUT));
}

#[test]
fn test_last_lap_time_request_wins() {
    let mut dashboard = dashboard(ScriptedBackend::default());

    // slow request first, fast request second
    dashboard.lap_time.form.set_field(FormField::Driver, "hamilton");
    assert!(dashboard.submit_lap_time());
    dashboard.lap_time.form.set_field(FormField::Driver, "leclerc");
    assert!(dashboard.submit_lap_time());

    assert!(dashboard.wait_until_settled(SETTLE_TIMEOUT));
    assert_eq!(
        dashboard.lap_time.fetch.state().success().map(|p| p.driver.as_str()),
        Some("leclerc")
    );

    // give the first request time to finish if it was not aborted
    thread::sleep(Duration::from_millis(600));
    dashboard.poll_completions();
    assert_eq!(
        dashboard.lap_time.fetch.state().success().map(|p| p.driver.as_str()),
        Some("leclerc")
    );
    assert_eq!(
        dashboard.lap_time.requested.as_ref().map(|p| p.driver.as_str()),
        Some("leclerc")
    );
}

#[test]
fn test_race_pace_five_laps() {
    let mut dashboard = dashboard(ScriptedBackend::default());
    dashboard.race_pace.form.set_field(FormField::Laps, "5");

    assert!(dashboard.submit_race_pace());
    assert!(dashboard.wait_until_settled(SETTLE_TIMEOUT));

    let race = dashboard.race_pace.fetch.state().success().unwrap();
    assert_eq!(race.lap_times.len(), 5);
    assert_eq!(race.chart_points().len(), 5);
    assert_eq!(race.fastest_lap, "1:20.500");
}

#[test]
fn test_race_pace_unreadable_lap_leaves_gap() {
    let mut dashboard = dashboard(ScriptedBackend::default());
    dashboard.race_pace.form.set_field(FormField::Circuit, "glitch");
    dashboard.race_pace.form.set_field(FormField::Laps, "5");

    assert!(dashboard.submit_race_pace());
    assert!(dashboard.wait_until_settled(SETTLE_TIMEOUT));

    let race = dashboard.race_pace.fetch.state().success().unwrap();
    assert_eq!(race.lap_times.len(), 5);
    assert_eq!(race.lap_times[2], "abc");
    assert_eq!(race.chart_points().len(), 4);
    assert_eq!(race.chart_segments().len(), 2);
}

#[test]
fn test_failures_stay_in_their_panel() {
    let mut dashboard = dashboard(ScriptedBackend::default());
    dashboard.race_pace.form.set_field(FormField::Circuit, "nowhere");

    assert!(dashboard.submit_lap_time());
    assert!(dashboard.submit_race_pace());
    assert!(dashboard.wait_until_settled(SETTLE_TIMEOUT));

    assert!(dashboard.lap_time.fetch.state().success().is_some());
    assert_eq!(
        dashboard.race_pace.fetch.state().failure(),
        Some(DISPLAY_FAILURE_MESSAGE)
    );
}

#[test]
fn test_switching_views_keeps_requests_and_results() {
    let mut dashboard = dashboard(ScriptedBackend::default());
    dashboard.select_view(View::LapPrediction);
    dashboard.lap_time.form.set_field(FormField::Driver, "hamilton");
    assert!(dashboard.submit_lap_time());

    dashboard.select_view(View::About);
    assert!(dashboard.lap_time.fetch.is_loading());
    assert!(dashboard.wait_until_settled(SETTLE_TIMEOUT));

    dashboard.select_view(View::RacePace);
    dashboard.select_view(View::LapPrediction);
    assert_eq!(dashboard.view(), View::LapPrediction);
    assert_eq!(
        dashboard.lap_time.fetch.state().success().map(|p| p.driver.as_str()),
        Some("hamilton")
    );
    assert_eq!(dashboard.race_pace.fetch.state(), &FetchState::Idle);
}

#[test]
fn test_connection_checks_pass() {
    let backend = ScriptedBackend::default();
    let requests = Arc::clone(&backend.requests);
    let mut dashboard = dashboard(backend);

    dashboard.run_connection_tests();
    assert!(dashboard.connection.has_run());
    assert!(dashboard.wait_until_settled(SETTLE_TIMEOUT));

    let results = dashboard.connection.results();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|(_, outcome)| *outcome == Some(true)));
    assert!(
        dashboard
            .connection
            .probe
            .state()
            .success()
            .is_some_and(|probe| probe.body.contains("running"))
    );

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 3);
    assert!(requests.contains(&ApiRequest::Probe));
    assert!(requests.iter().any(|r| matches!(
        r,
        ApiRequest::RacePace(params) if params.laps == Some(5)
    )));
}

#[test]
fn test_failing_probe_reports_failure() {
    let mut dashboard = dashboard(ScriptedBackend::failing_probe(503));

    dashboard.run_connection_tests();
    assert!(dashboard.wait_until_settled(SETTLE_TIMEOUT));

    let message = dashboard
        .connection
        .probe
        .state()
        .failure()
        .expect("Expected the probe to fail");
    assert!(!message.is_empty());
    assert_eq!(dashboard.connection.results()[0], ("Backend Connection", Some(false)));
    // the sample predictions are independent of the probe
    assert!(dashboard.connection.sample_lap_time.state().success().is_some());
}

#[test]
fn test_completion_callback_runs() {
    let wakes = Arc::new(AtomicUsize::new(0));
    let mut dashboard = dashboard(ScriptedBackend::default());
    let counter = Arc::clone(&wakes);
    dashboard.on_completion(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(dashboard.submit_lap_time());
    assert!(dashboard.wait_until_settled(SETTLE_TIMEOUT));
    assert_eq!(wakes.load(Ordering::SeqCst), 1);
}
