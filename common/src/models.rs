use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::fmt;
use thiserror::Error;

/// One row of the source table: a state's population in a given year.

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct PopulationRecord {
    pub year: i32,
    #[serde(rename = "states", alias = "state_name")]
    pub state_name: String,
    #[serde(rename = "states_code", alias = "state_code")]
    pub state_code: String,
    #[serde(default)]
    pub id: Option<String>,
    pub population: i64,
}

/// A state's population in the target year and its change from the year before.

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct PopulationChangeRecord {
    pub state_name: String,
    pub state_code: String,
    pub population: i64,
    pub population_change: i64,
}

/// A state's population in a single year, as shown in the rankings table and
/// the choropleth.

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct StatePopulation {
    pub state_name: String,
    pub state_code: String,
    pub population: i64,
}

impl From<&PopulationRecord> for StatePopulation {
    fn from(record: &PopulationRecord) -> StatePopulation {
        StatePopulation {
            state_name: record.state_name.clone(),
            state_code: record.state_code.clone(),
            population: record.population,
        }
    }
}

/// One (year, state) cell of the heat map.

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct HeatCell {
    pub year: i32,
    pub state_name: String,
    pub population: i64,
}

/// Counts of states growing or declining past the migration threshold, and
/// the rounded percentages shown in the donut charts.

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Default)]
pub struct MigrationSummary {
    pub growth_count: usize,
    pub decline_count: usize,
    pub total_states: usize,
    pub growth_percentage: u32,
    pub decline_percentage: u32,
}

/// The display strings for a single metric card.

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct StateMetric {
    pub label: String,
    pub value: String,
    pub delta: String,
}

impl StateMetric {

    /// The card shown when there is no previous year to compare against.

    pub fn placeholder() -> Self {
        StateMetric {
            label: "-".to_string(),
            value: "-".to_string(),
            delta: String::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct MetricsResponse {
    pub year: i32,
    pub top: StateMetric,
    pub bottom: StateMetric,
    pub migration: MigrationSummary,
}

/// A colour palette the choropleth and heat map can be drawn with.

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    Blues,
    Greens,
    Reds,
    Purples,
    Oranges,
    Greys,
}

impl Palette {
    pub const ALL: [Palette; 6] = [
        Palette::Blues,
        Palette::Greens,
        Palette::Reds,
        Palette::Purples,
        Palette::Oranges,
        Palette::Greys,
    ];
}

#[derive(Error, Debug, PartialEq)]
#[error("unknown colour palette")]
pub struct PaletteParseError;

impl FromStr for Palette {
    type Err = PaletteParseError;
    fn from_str(input: &str) -> Result<Palette, Self::Err> {
        match input.to_lowercase().as_str() {
            "blues" => Ok(Palette::Blues),
            "greens" => Ok(Palette::Greens),
            "reds" => Ok(Palette::Reds),
            "purples" => Ok(Palette::Purples),
            "oranges" => Ok(Palette::Oranges),
            "greys" => Ok(Palette::Greys),
            _ => Err(PaletteParseError)
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Palette::Blues => write!(f, "blues"),
            Palette::Greens => write!(f, "greens"),
            Palette::Reds => write!(f, "reds"),
            Palette::Purples => write!(f, "purples"),
            Palette::Oranges => write!(f, "oranges"),
            Palette::Greys => write!(f, "greys"),
        }
    }
}

/// The user's current choices on the dashboard. Every panel redraws from this.

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct DashboardSelection {
    pub year: i32,
    pub palette: Palette,
}
