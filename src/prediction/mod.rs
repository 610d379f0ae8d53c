pub mod client;

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_S, HttpPredictionClient, PredictionBackend};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Compound {
    #[default]
    Soft,
    Medium,
    Hard,
}

impl Compound {
    pub const ALL: [Compound; 3] = [Compound::Soft, Compound::Medium, Compound::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Soft => "soft",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Soft => "Soft Compound",
            Self::Medium => "Medium Compound",
            Self::Hard => "Hard Compound",
        }
    }
}

impl Display for Compound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "soft" => Ok(Self::Soft),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown tire compound '{other}'")),
        }
    }
}

/// Typed parameters for one prediction request. Only built from a form that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParameters {
    pub driver: String,
    pub year: i32,
    pub circuit: String,
    pub compound: Compound,
    /// Only set for race pace requests
    pub laps: Option<u32>,
}

impl RequestParameters {
    /// Known-good parameters used by the connection checks.
    pub fn sample(laps: Option<u32>) -> Self {
        Self {
            driver: "verstappen".to_string(),
            year: 2023,
            circuit: "monza".to_string(),
            compound: Compound::Soft,
            laps,
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("driver", self.driver.clone()),
            ("year", self.year.to_string()),
            ("circuit", self.circuit.clone()),
            ("compound", self.compound.to_string()),
        ];
        if let Some(laps) = self.laps {
            pairs.push(("laps", laps.to_string()));
        }
        pairs
    }
}

/// One outbound call against the prediction service.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    Probe,
    LapTime(RequestParameters),
    RacePace(RequestParameters),
}

impl ApiRequest {
    /// Path relative to the service base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Probe => "",
            Self::LapTime(_) => "predict/lap_time",
            Self::RacePace(_) => "predict/race_pace",
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Probe => Vec::new(),
            Self::LapTime(params) => {
                // lap time predictions never carry a race distance
                let mut pairs = params.query();
                pairs.retain(|(key, _)| *key != "laps");
                pairs
            }
            Self::RacePace(params) => params.query(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Probe => "connectivity probe",
            Self::LapTime(_) => "lap time prediction",
            Self::RacePace(_) => "race pace simulation",
        }
    }
}
