use itertools::Itertools;
use log::warn;
use serde_json::{Map, Value};

use crate::RacePaceError;

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq)]
pub struct LapPredictionView {
    pub driver: String,
    pub circuit: String,
    pub predicted_lap_time_formatted: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RacePaceView {
    pub driver: String,
    /// Lap times exactly as returned by the service, used for the textual list
    pub lap_times: Vec<String>,
    /// Parsed seconds for each lap, `None` where the raw string could not be parsed
    pub lap_seconds: Vec<Option<f64>>,
    pub fastest_lap: String,
    pub average_lap_time: String,
    pub total_race_time: String,
}

impl RacePaceView {
    pub fn lap_count(&self) -> usize {
        self.lap_times.len()
    }

    pub fn gap_count(&self) -> usize {
        self.lap_seconds.iter().filter(|s| s.is_none()).count()
    }

    /// `[lap number, seconds]` pairs for every lap that parsed, laps numbered from 1.
    pub fn chart_points(&self) -> Vec<[f64; 2]> {
        self.lap_seconds
            .iter()
            .enumerate()
            .filter_map(|(i, seconds)| seconds.map(|s| [(i + 1) as f64, s]))
            .collect()
    }

    /// Chart points split into contiguous runs so unparsed laps show up as gaps in the line.
    pub fn chart_segments(&self) -> Vec<Vec<[f64; 2]>> {
        let runs = self
            .lap_seconds
            .iter()
            .enumerate()
            .chunk_by(|(_, seconds)| seconds.is_some());
        runs.into_iter()
            .filter(|(present, _)| *present)
            .map(|(_, run)| {
                run.filter_map(|(i, seconds)| seconds.map(|s| [(i + 1) as f64, s]))
                    .collect_vec()
            })
            .collect()
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, RacePaceError> {
    body.as_object()
        .ok_or_else(|| RacePaceError::UnexpectedResponse {
            reason: format!("expected a JSON object, got {body}"),
        })
}

fn text_field(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::String(text)) if text.is_empty() => NOT_AVAILABLE.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn map_lap_prediction(body: &Value) -> Result<LapPredictionView, RacePaceError> {
    let object = as_object(body)?;

    let mut predicted = text_field(object, "predicted_lap_time_formatted");
    if predicted == NOT_AVAILABLE
        && let Some(seconds) = object.get("predicted_lap_time").and_then(Value::as_f64)
    {
        predicted = format_lap_time_millis(seconds);
    }

    Ok(LapPredictionView {
        driver: text_field(object, "driver"),
        circuit: text_field(object, "circuit"),
        predicted_lap_time_formatted: predicted,
    })
}

pub fn map_race_pace(
    body: &Value,
    expected_laps: Option<u32>,
) -> Result<RacePaceView, RacePaceError> {
    let object = as_object(body)?;
    let entries = object
        .get("lap_times")
        .and_then(Value::as_array)
        .ok_or_else(|| RacePaceError::UnexpectedResponse {
            reason: "race pace response has no lap_times list".to_string(),
        })?;

    if let Some(expected) = expected_laps
        && entries.len() != expected as usize
    {
        return Err(RacePaceError::UnexpectedResponse {
            reason: format!(
                "requested {} laps but received {} lap times",
                expected,
                entries.len()
            ),
        });
    }

    let mut lap_times = Vec::with_capacity(entries.len());
    let mut lap_seconds = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let raw = match entry {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        let seconds = parse_lap_time(&raw);
        if seconds.is_none() {
            warn!("Could not parse lap {} time '{}', leaving a gap", i + 1, raw);
        }
        lap_times.push(raw);
        lap_seconds.push(seconds);
    }

    Ok(RacePaceView {
        driver: text_field(object, "driver"),
        lap_times,
        lap_seconds,
        fastest_lap: text_field(object, "fastest_lap"),
        average_lap_time: text_field(object, "average_lap_time"),
        total_race_time: text_field(object, "total_race_time"),
    })
}

fn all_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Parses `M:SS` or `M:SS.mmm` into seconds.
pub fn parse_lap_time(raw: &str) -> Option<f64> {
    let (minutes, seconds) = raw.trim().split_once(':')?;
    let (whole, fraction) = match seconds.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (seconds, None),
    };
    if !all_digits(minutes) || !all_digits(whole) || whole.len() > 2 {
        return None;
    }
    if let Some(fraction) = fraction
        && !all_digits(fraction)
    {
        return None;
    }

    let minutes = minutes.parse::<f64>().ok()?;
    let seconds = seconds.parse::<f64>().ok()?;
    if seconds >= 60. {
        return None;
    }
    Some(minutes * 60. + seconds)
}

/// Formats seconds as `M:SS`, dropping the sub-second part.
pub fn format_lap_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0. {
        return NOT_AVAILABLE.to_string();
    }
    let whole = seconds.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Formats seconds as `M:SS.mmm`.
pub fn format_lap_time_millis(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0. {
        return NOT_AVAILABLE.to_string();
    }
    let millis = (seconds * 1000.).round() as u64;
    format!(
        "{}:{:02}.{:03}",
        millis / 60_000,
        (millis % 60_000) / 1000,
        millis % 1000
    )
}
