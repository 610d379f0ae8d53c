use std::{fmt::Display, str::FromStr};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// The section currently shown in the dashboard window.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Dashboard,
    LapPrediction,
    RacePace,
    ConnectionTest,
    About,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::LapPrediction,
        View::RacePace,
        View::ConnectionTest,
        View::About,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::LapPrediction => "lap",
            Self::RacePace => "race",
            Self::ConnectionTest => "test",
            Self::About => "about",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::LapPrediction => "Lap Prediction",
            Self::RacePace => "Race Pace",
            Self::ConnectionTest => "Connection Test",
            Self::About => "About",
        }
    }
}

impl Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|view| view.id() == s)
            .ok_or_else(|| {
                format!(
                    "unknown view '{}', expected one of: {}",
                    s,
                    View::ALL.iter().map(View::id).join(", ")
                )
            })
    }
}
