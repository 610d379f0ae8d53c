use std::{fmt::Display, str::FromStr};

use chrono::Datelike;
use log::warn;

use crate::{
    RacePaceError,
    prediction::{Compound, RequestParameters},
};

pub const MIN_YEAR: i32 = 1950;
pub const MIN_LAPS: u32 = 1;
pub const MAX_LAPS: u32 = 100;
pub const DEFAULT_LAPS: u32 = 50;

pub const DRIVER_CODES: &[&str] = &[
    "verstappen",
    "hamilton",
    "leclerc",
    "sainz",
    "norris",
    "russell",
    "perez",
    "alonso",
    "ocon",
    "gasly",
    "bottas",
    "zhou",
    "magnussen",
    "schumacher",
    "vettel",
    "albon",
    "latifi",
    "tsunoda",
    "stroll",
    "ricciardo",
];

pub const CIRCUIT_CODES: &[&str] = &[
    "monza",
    "silverstone",
    "monaco",
    "spa",
    "suzuka",
    "bahrain",
    "melbourne",
    "imola",
    "barcelona",
    "interlagos",
    "austin",
    "mexico",
    "abu_dhabi",
    "singapore",
    "zandvoort",
    "hungary",
    "paul_ricard",
    "azerbaijan",
    "canada",
    "austria",
    "miami",
    "saudi_arabia",
];

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Driver,
    Year,
    Circuit,
    Compound,
    Laps,
}

impl FormField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Year => "year",
            Self::Circuit => "circuit",
            Self::Compound => "compound",
            Self::Laps => "laps",
        }
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "driver" => Ok(Self::Driver),
            "year" => Ok(Self::Year),
            "circuit" => Ok(Self::Circuit),
            "compound" => Ok(Self::Compound),
            "laps" => Ok(Self::Laps),
            other => Err(format!("unknown form field '{other}'")),
        }
    }
}

/// A broken form constraint. Variants are declared in the order rules are checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MissingDriver,
    MissingYear,
    YearOutOfRange { current_year: i32 },
    MissingCircuit,
    UnknownCompound,
    LapsOutOfRange,
}

impl Violation {
    pub fn field(&self) -> FormField {
        match self {
            Self::MissingDriver => FormField::Driver,
            Self::MissingYear | Self::YearOutOfRange { .. } => FormField::Year,
            Self::MissingCircuit => FormField::Circuit,
            Self::UnknownCompound => FormField::Compound,
            Self::LapsOutOfRange => FormField::Laps,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::MissingDriver => "Please enter a driver code.".to_string(),
            Self::MissingYear => "Please enter a season year.".to_string(),
            Self::YearOutOfRange { current_year } => format!(
                "Please enter a valid year between {MIN_YEAR} and {current_year}."
            ),
            Self::MissingCircuit => "Please enter a circuit.".to_string(),
            Self::UnknownCompound => "Please pick a soft, medium or hard compound.".to_string(),
            Self::LapsOutOfRange => format!(
                "Please enter a valid number of laps between {MIN_LAPS} and {MAX_LAPS}."
            ),
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl From<Violation> for RacePaceError {
    fn from(value: Violation) -> Self {
        RacePaceError::InvalidUserInput {
            field: value.field().name().to_string(),
            reason: value.message(),
        }
    }
}

/// Raw, unvalidated input for one prediction panel.
///
/// Values are kept exactly as typed; they are only trimmed and parsed by
/// [`PredictionForm::to_parameters`] when the user submits.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionForm {
    driver: String,
    year: String,
    circuit: String,
    compound: String,
    laps: Option<String>,
    is_valid: bool,
}

impl PredictionForm {
    fn with_laps(laps: Option<String>) -> Self {
        let mut form = Self {
            driver: "verstappen".to_string(),
            year: "2023".to_string(),
            circuit: "monza".to_string(),
            compound: Compound::Soft.to_string(),
            laps,
            is_valid: false,
        };
        form.is_valid = form.validate().is_empty();
        form
    }

    pub fn lap_time() -> Self {
        Self::with_laps(None)
    }

    pub fn race_pace() -> Self {
        Self::with_laps(Some(DEFAULT_LAPS.to_string()))
    }

    pub fn has_laps(&self) -> bool {
        self.laps.is_some()
    }

    pub fn driver(&self) -> &str {
        &self.driver
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn circuit(&self) -> &str {
        &self.circuit
    }

    pub fn compound(&self) -> &str {
        &self.compound
    }

    pub fn laps(&self) -> Option<&str> {
        self.laps.as_deref()
    }

    pub fn field(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::Driver => Some(&self.driver),
            FormField::Year => Some(&self.year),
            FormField::Circuit => Some(&self.circuit),
            FormField::Compound => Some(&self.compound),
            FormField::Laps => self.laps(),
        }
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Driver => self.driver = value,
            FormField::Year => self.year = value,
            FormField::Circuit => self.circuit = value,
            FormField::Compound => self.compound = value,
            FormField::Laps => match self.laps.as_mut() {
                Some(laps) => *laps = value,
                None => warn!("Ignoring laps value '{}' on a lap time form", value),
            },
        }
        self.is_valid = self.validate().is_empty();
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn validate(&self) -> Vec<Violation> {
        self.validate_for_year(current_year())
    }

    /// Checks every rule against an explicit calendar year, in driver, year,
    /// circuit, compound, laps order.
    pub fn validate_for_year(&self, current_year: i32) -> Vec<Violation> {
        let mut violations = Vec::new();

        if self.driver.trim().is_empty() {
            violations.push(Violation::MissingDriver);
        }

        let year = self.year.trim();
        if year.is_empty() {
            violations.push(Violation::MissingYear);
        } else if !year
            .parse::<i32>()
            .is_ok_and(|y| (MIN_YEAR..=current_year).contains(&y))
        {
            violations.push(Violation::YearOutOfRange { current_year });
        }

        if self.circuit.trim().is_empty() {
            violations.push(Violation::MissingCircuit);
        }

        if self.compound.parse::<Compound>().is_err() {
            violations.push(Violation::UnknownCompound);
        }

        if let Some(laps) = &self.laps
            && !laps
                .trim()
                .parse::<u32>()
                .is_ok_and(|l| (MIN_LAPS..=MAX_LAPS).contains(&l))
        {
            violations.push(Violation::LapsOutOfRange);
        }

        violations
    }

    pub fn first_violation(&self) -> Option<Violation> {
        self.validate().into_iter().next()
    }

    pub fn to_parameters(&self) -> Result<RequestParameters, Violation> {
        self.to_parameters_for_year(current_year())
    }

    pub fn to_parameters_for_year(
        &self,
        current_year: i32,
    ) -> Result<RequestParameters, Violation> {
        if let Some(violation) = self.validate_for_year(current_year).into_iter().next() {
            return Err(violation);
        }
        // all parses below were already checked by validate_for_year
        let year = self
            .year
            .trim()
            .parse::<i32>()
            .map_err(|_| Violation::YearOutOfRange { current_year })?;
        let compound = self
            .compound
            .parse::<Compound>()
            .map_err(|_| Violation::UnknownCompound)?;
        let laps = match &self.laps {
            Some(laps) => Some(
                laps.trim()
                    .parse::<u32>()
                    .map_err(|_| Violation::LapsOutOfRange)?,
            ),
            None => None,
        };

        Ok(RequestParameters {
            driver: self.driver.trim().to_string(),
            year,
            circuit: self.circuit.trim().to_string(),
            compound,
            laps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const YEAR: i32 = 2025;

    #[test]
    fn test_defaults_are_valid() {
        let lap = PredictionForm::lap_time();
        let race = PredictionForm::race_pace();
        assert!(lap.validate_for_year(YEAR).is_empty());
        assert!(race.validate_for_year(YEAR).is_empty());
        assert!(!lap.has_laps());
        assert_eq!(race.laps(), Some("50"));
    }

    #[test]
    fn test_set_field_stores_raw_text() {
        let mut form = PredictionForm::race_pace();
        form.set_field(FormField::Driver, "  hamilton ");
        form.set_field(FormField::Laps, "abc");
        assert_eq!(form.driver(), "  hamilton ");
        assert_eq!(form.laps(), Some("abc"));
        assert!(!form.is_valid());

        form.set_field(FormField::Laps, "12");
        assert!(form.is_valid());
    }

    #[test]
    fn test_laps_ignored_on_lap_time_form() {
        let mut form = PredictionForm::lap_time();
        form.set_field(FormField::Laps, "10");
        assert_eq!(form.laps(), None);
        assert!(form.is_valid());
    }

    #[test]
    fn test_violations_follow_rule_order() {
        let mut form = PredictionForm::race_pace();
        form.set_field(FormField::Laps, "0");
        form.set_field(FormField::Circuit, "   ");
        form.set_field(FormField::Year, "1949");
        form.set_field(FormField::Driver, "");

        let violations = form.validate_for_year(YEAR);
        assert_eq!(
            violations,
            vec![
                Violation::MissingDriver,
                Violation::YearOutOfRange { current_year: YEAR },
                Violation::MissingCircuit,
                Violation::LapsOutOfRange,
            ]
        );
        assert_eq!(
            form.to_parameters_for_year(YEAR),
            Err(Violation::MissingDriver)
        );
    }

    #[test]
    fn test_missing_and_non_numeric_year() {
        let mut form = PredictionForm::lap_time();
        form.set_field(FormField::Year, "");
        assert_eq!(form.validate_for_year(YEAR), vec![Violation::MissingYear]);

        form.set_field(FormField::Year, "twenty");
        assert_eq!(
            form.validate_for_year(YEAR),
            vec![Violation::YearOutOfRange { current_year: YEAR }]
        );
    }

    #[test]
    fn test_unknown_compound() {
        let mut form = PredictionForm::lap_time();
        form.set_field(FormField::Compound, "wet");
        assert_eq!(form.validate_for_year(YEAR), vec![Violation::UnknownCompound]);
    }

    #[test]
    fn test_to_parameters_trims_and_parses() {
        let mut form = PredictionForm::race_pace();
        form.set_field(FormField::Driver, " leclerc ");
        form.set_field(FormField::Year, " 2024");
        form.set_field(FormField::Compound, "Hard");
        form.set_field(FormField::Laps, "5 ");

        let params = form.to_parameters_for_year(YEAR).unwrap();
        assert_eq!(params.driver, "leclerc");
        assert_eq!(params.year, 2024);
        assert_eq!(params.circuit, "monza");
        assert_eq!(params.compound, Compound::Hard);
        assert_eq!(params.laps, Some(5));
    }

    #[test]
    fn test_violation_maps_to_input_error() {
        let error: RacePaceError = Violation::LapsOutOfRange.into();
        match error {
            RacePaceError::InvalidUserInput { field, reason } => {
                assert_eq!(field, "laps");
                assert!(reason.contains("between 1 and 100"));
            }
            _ => panic!("Expected InvalidUserInput error"),
        }
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in [
            FormField::Driver,
            FormField::Year,
            FormField::Circuit,
            FormField::Compound,
            FormField::Laps,
        ] {
            assert_eq!(field.name().parse::<FormField>(), Ok(field));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_out_of_range_year_is_flagged(
            year in prop_oneof![-5000i32..MIN_YEAR, (YEAR + 1)..10000i32],
        ) {
            let mut form = PredictionForm::lap_time();
            form.set_field(FormField::Year, year.to_string());
            let violations = form.validate_for_year(YEAR);
            let expected = Violation::YearOutOfRange { current_year: YEAR };
            prop_assert!(violations.contains(&expected));
            prop_assert!(form.to_parameters_for_year(YEAR).is_err());
        }

        #[test]
        fn prop_in_range_year_is_accepted(year in MIN_YEAR..=YEAR) {
            let mut form = PredictionForm::lap_time();
            form.set_field(FormField::Year, year.to_string());
            prop_assert!(form.validate_for_year(YEAR).is_empty());
            prop_assert_eq!(form.to_parameters_for_year(YEAR).unwrap().year, year);
        }

        #[test]
        fn prop_laps_range(laps in 0u32..300) {
            let mut form = PredictionForm::race_pace();
            form.set_field(FormField::Laps, laps.to_string());
            let in_range = (MIN_LAPS..=MAX_LAPS).contains(&laps);
            prop_assert_eq!(form.validate_for_year(YEAR).is_empty(), in_range);
        }
    }
}
