use crate::format::{format_population, round_percentage};
use crate::models::*;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use thiserror::Error;

/// States whose population moved by more than this many people in a year count
/// as growing or declining.

pub const MIGRATION_THRESHOLD: i64 = 50_000;

/// Reasons a set of records can't form a population table.

#[derive(Error, Debug, PartialEq)]
pub enum TableError {
    #[error("row {row}: population {population} for {state_code} in {year} is negative")]
    NegativePopulation { row: usize, year: i32, state_code: String, population: i64 },

    #[error("row {row}: state code {state_code:?} is not a two letter abbreviation")]
    InvalidStateCode { row: usize, state_code: String },

    #[error("row {row}: {state_code} appears more than once for {year}")]
    DuplicateEntry { row: usize, year: i32, state_code: String },
}

/// The full population-by-state-by-year table.
///
/// Built once at startup and never mutated afterwards. Rows keep their original
/// order, which is what breaks ties in every sorted view.

#[derive(Clone, Debug, Default)]
pub struct PopulationTable {
    records: Vec<PopulationRecord>,
}

impl PopulationTable {

    /// Validates the records and builds a table from them. Row numbers in
    /// errors are 1-based and count data rows only.

    pub fn new(records: Vec<PopulationRecord>) -> Result<Self, TableError> {
        let mut seen: HashSet<(i32, String)> = HashSet::new();
        for (i, r) in records.iter().enumerate() {
            let row = i + 1;
            if r.population < 0 {
                return Err(TableError::NegativePopulation {
                    row,
                    year: r.year,
                    state_code: r.state_code.clone(),
                    population: r.population,
                });
            }
            if r.state_code.len() != 2 || !r.state_code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(TableError::InvalidStateCode { row, state_code: r.state_code.clone() });
            }
            if !seen.insert((r.year, r.state_code.clone())) {
                return Err(TableError::DuplicateEntry { row, year: r.year, state_code: r.state_code.clone() });
            }
        }
        Ok(PopulationTable { records })
    }

    pub fn records(&self) -> &[PopulationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years in the table, most recent first.

    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.records.iter().map(|r| r.year).collect();
        years.into_iter().rev().collect()
    }

    pub fn contains_year(&self, year: i32) -> bool {
        self.records.iter().any(|r| r.year == year)
    }

    fn year_records(&self, year: i32) -> impl Iterator<Item = &PopulationRecord> {
        self.records.iter().filter(move |r| r.year == year)
    }

    /// Computes every state's population in `year` and its change since the
    /// year before, largest increase first.
    ///
    /// States missing from the previous year (or every state, when that year
    /// isn't in the table at all) are compared against zero, so their change is
    /// their whole population. An unknown `year` gives an empty result.

    pub fn compute_change(&self, year: i32) -> Vec<PopulationChangeRecord> {
        let previous: HashMap<&str, i64> = match year.checked_sub(1) {
            Some(previous_year) => self
                .year_records(previous_year)
                .map(|r| (r.state_code.as_str(), r.population))
                .collect(),
            None => HashMap::new(),
        };

        let mut changes = self
            .year_records(year)
            .map(|r| PopulationChangeRecord {
                state_name: r.state_name.clone(),
                state_code: r.state_code.clone(),
                population: r.population,
                population_change: r.population - previous.get(r.state_code.as_str()).copied().unwrap_or(0),
            })
            .collect::<Vec<PopulationChangeRecord>>();

        // stable, so equal changes stay in table order
        changes.sort_by(|a, b| b.population_change.cmp(&a.population_change));
        changes
    }

    /// Every state in `year`, most populous first.

    pub fn rank_states(&self, year: i32) -> Vec<StatePopulation> {
        let mut ranked = self.year_records(year).map(StatePopulation::from).collect::<Vec<StatePopulation>>();
        ranked.sort_by(|a, b| b.population.cmp(&a.population));
        ranked
    }

    /// One cell per (year, state name) holding the largest population recorded
    /// for it, ordered by year and then state name.

    pub fn heat_map(&self) -> Vec<HeatCell> {
        let mut cells: BTreeMap<(i32, &str), i64> = BTreeMap::new();
        for r in &self.records {
            let cell = cells.entry((r.year, r.state_name.as_str())).or_insert(r.population);
            *cell = (*cell).max(r.population);
        }
        cells
            .into_iter()
            .map(|((year, state_name), population)| HeatCell {
                year,
                state_name: state_name.to_string(),
                population,
            })
            .collect()
    }

    /// Builds the metric cards and migration summary for `year`.
    ///
    /// Without a previous year to compare against, the cards show placeholders
    /// and both percentages are zero.

    pub fn summarize(&self, year: i32) -> MetricsResponse {
        if !year.checked_sub(1).is_some_and(|previous_year| self.contains_year(previous_year)) {
            return MetricsResponse {
                year,
                top: StateMetric::placeholder(),
                bottom: StateMetric::placeholder(),
                migration: MigrationSummary::default(),
            };
        }

        let changes = self.compute_change(year);
        let metric = |c: Option<&PopulationChangeRecord>| match c {
            Some(c) => StateMetric {
                label: c.state_name.clone(),
                value: format_population(c.population),
                delta: format_population(c.population_change),
            },
            None => StateMetric::placeholder(),
        };

        MetricsResponse {
            year,
            top: metric(changes.first()),
            bottom: metric(changes.last()),
            migration: classify_growth_decline(&changes, MIGRATION_THRESHOLD),
        }
    }
}

/// Counts the states whose change is strictly beyond `threshold` in either
/// direction, along with the share of all distinct states each count makes up.

pub fn classify_growth_decline(changes: &[PopulationChangeRecord], threshold: i64) -> MigrationSummary {
    let growth_count = changes.iter().filter(|c| c.population_change > threshold).count();
    let decline_count = changes.iter().filter(|c| c.population_change < -threshold).count();
    let total_states = changes.iter().map(|c| c.state_name.as_str()).collect::<HashSet<&str>>().len();

    MigrationSummary {
        growth_count,
        decline_count,
        total_states,
        growth_percentage: round_percentage(growth_count, total_states),
        decline_percentage: round_percentage(decline_count, total_states),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(year: i32, name: &str, code: &str, population: i64) -> PopulationRecord {
        PopulationRecord {
            year,
            state_name: name.to_string(),
            state_code: code.to_string(),
            id: None,
            population,
        }
    }

    fn two_state_table() -> PopulationTable {
        PopulationTable::new(vec![
            record(2010, "Alpha", "AA", 100_000),
            record(2010, "Beta", "BB", 50_000),
            record(2011, "Alpha", "AA", 160_000),
            record(2011, "Beta", "BB", 40_000),
        ])
        .unwrap()
    }

    fn census_table() -> PopulationTable {
        PopulationTable::new(vec![
            record(2017, "California", "CA", 39_358_497),
            record(2017, "Texas", "TX", 28_295_273),
            record(2017, "Ohio", "OH", 11_659_650),
            record(2017, "Vermont", "VT", 624_344),
            record(2017, "Wyoming", "WY", 579_994),
            record(2018, "California", "CA", 39_461_588),
            record(2018, "Texas", "TX", 28_628_666),
            record(2018, "Ohio", "OH", 11_676_341),
            record(2018, "Vermont", "VT", 624_358),
            record(2018, "Wyoming", "WY", 579_054),
            record(2019, "California", "CA", 39_512_223),
            record(2019, "Texas", "TX", 28_995_881),
            record(2019, "Ohio", "OH", 11_689_100),
            record(2019, "Vermont", "VT", 623_989),
            record(2019, "Wyoming", "WY", 578_759),
        ])
        .unwrap()
    }

    #[test]
    fn change_against_previous_year() {
        let changes = two_state_table().compute_change(2011);
        assert_eq!(changes, vec![
            PopulationChangeRecord {
                state_name: "Alpha".to_string(),
                state_code: "AA".to_string(),
                population: 160_000,
                population_change: 60_000,
            },
            PopulationChangeRecord {
                state_name: "Beta".to_string(),
                state_code: "BB".to_string(),
                population: 40_000,
                population_change: -10_000,
            },
        ]);

        let migration = classify_growth_decline(&changes, MIGRATION_THRESHOLD);
        assert_eq!(migration.growth_count, 1);
        assert_eq!(migration.decline_count, 0);
        assert_eq!(migration.total_states, 2);
        assert_eq!(migration.growth_percentage, 50);
        assert_eq!(migration.decline_percentage, 0);
    }

    #[test]
    fn first_year_changes_equal_population() {
        let table = census_table();
        let first = *table.years().last().unwrap();
        let changes = table.compute_change(first);
        assert_eq!(changes.len(), 5);
        for c in changes {
            assert_eq!(c.population_change, c.population);
        }
    }

    #[test]
    fn unknown_year_is_empty() {
        let table = census_table();
        assert!(table.compute_change(1990).is_empty());
        assert!(table.rank_states(1990).is_empty());
    }

    #[test]
    fn one_change_per_state_summing_to_national_delta() {
        let table = census_table();
        for year in [2018, 2019] {
            let changes = table.compute_change(year);
            assert_eq!(changes.len(), 5);

            let total = |y: i32| table.rank_states(y).iter().map(|s| s.population).sum::<i64>();
            let delta: i64 = changes.iter().map(|c| c.population_change).sum();
            assert_eq!(delta, total(year) - total(year - 1));
        }
    }

    #[test]
    fn changes_sorted_descending() {
        let changes = census_table().compute_change(2019);
        let codes = changes.iter().map(|c| c.state_code.as_str()).collect::<Vec<&str>>();
        assert_eq!(codes, vec!["TX", "CA", "OH", "WY", "VT"]);
    }

    #[test]
    fn state_missing_last_year_is_compared_to_zero() {
        let table = PopulationTable::new(vec![
            record(2010, "Alpha", "AA", 100_000),
            record(2011, "Alpha", "AA", 90_000),
            record(2011, "Gamma", "GG", 20_000),
        ])
        .unwrap();
        let changes = table.compute_change(2011);
        assert_eq!(changes[0].state_code, "GG");
        assert_eq!(changes[0].population_change, 20_000);
        assert_eq!(changes[1].population_change, -10_000);
    }

    #[test]
    fn rankings_are_non_increasing_and_stable() {
        let table = PopulationTable::new(vec![
            record(2015, "Alpha", "AA", 10),
            record(2015, "Beta", "BB", 30),
            record(2015, "Gamma", "GG", 10),
            record(2015, "Delta", "DD", 20),
        ])
        .unwrap();
        let ranked = table.rank_states(2015);
        assert!(ranked.windows(2).all(|w| w[0].population >= w[1].population));
        let codes = ranked.iter().map(|s| s.state_code.as_str()).collect::<Vec<&str>>();
        assert_eq!(codes, vec!["BB", "DD", "AA", "GG"]);
    }

    #[test]
    fn years_are_descending() {
        assert_eq!(census_table().years(), vec![2019, 2018, 2017]);
        assert!(PopulationTable::default().years().is_empty());
    }

    #[test]
    fn percentages_stay_in_range() {
        let table = census_table();
        for year in table.years() {
            for threshold in [0, 1_000, 50_000, 500_000] {
                let m = classify_growth_decline(&table.compute_change(year), threshold);
                assert!(m.growth_percentage <= 100);
                assert!(m.decline_percentage <= 100);
                assert!(m.growth_percentage + m.decline_percentage <= 100);
            }
        }
    }

    #[test]
    fn migration_of_nothing_is_zero() {
        assert_eq!(classify_growth_decline(&[], MIGRATION_THRESHOLD), MigrationSummary::default());
    }

    #[test]
    fn heat_map_is_ordered_by_year_then_state() {
        let cells = census_table().heat_map();
        assert_eq!(cells.len(), 15);
        assert_eq!(cells[0], HeatCell { year: 2017, state_name: "California".to_string(), population: 39_358_497 });
        assert_eq!(cells[14], HeatCell { year: 2019, state_name: "Wyoming".to_string(), population: 578_759 });
    }

    #[test]
    fn summary_uses_largest_and_smallest_change() {
        let summary = census_table().summarize(2019);
        assert_eq!(summary.top, StateMetric {
            label: "Texas".to_string(),
            value: "29.0 M".to_string(),
            delta: "367 K".to_string(),
        });
        assert_eq!(summary.bottom, StateMetric {
            label: "Vermont".to_string(),
            value: "623 K".to_string(),
            delta: "-1 K".to_string(),
        });
        assert_eq!(summary.migration.growth_count, 2);
        assert_eq!(summary.migration.growth_percentage, 40);
    }

    #[test]
    fn summary_without_previous_year_is_placeholder() {
        let summary = census_table().summarize(2017);
        assert_eq!(summary.top, StateMetric::placeholder());
        assert_eq!(summary.bottom, StateMetric::placeholder());
        assert_eq!(summary.migration, MigrationSummary::default());
    }

    #[test]
    fn rejects_duplicate_state_year() {
        let err = PopulationTable::new(vec![
            record(2010, "Alpha", "AA", 1),
            record(2010, "Alpha again", "AA", 2),
        ])
        .unwrap_err();
        assert_eq!(err, TableError::DuplicateEntry { row: 2, year: 2010, state_code: "AA".to_string() });
    }

    #[test]
    fn rejects_bad_rows() {
        assert!(matches!(
            PopulationTable::new(vec![record(2010, "Alpha", "AA", -5)]),
            Err(TableError::NegativePopulation { row: 1, .. })
        ));
        assert!(matches!(
            PopulationTable::new(vec![record(2010, "Alpha", "A1", 5)]),
            Err(TableError::InvalidStateCode { row: 1, .. })
        ));
    }

    #[test]
    fn earliest_possible_year_has_no_previous_year() {
        let table = two_state_table();
        assert!(table.compute_change(i32::MIN).is_empty());
        let summary = table.summarize(i32::MIN);
        assert_eq!(summary.top, StateMetric::placeholder());
        assert_eq!(summary.migration, MigrationSummary::default());

        let table = PopulationTable::new(vec![record(i32::MIN, "Alpha", "AA", 7)]).unwrap();
        assert_eq!(table.compute_change(i32::MIN)[0].population_change, 7);
        assert_eq!(table.summarize(i32::MIN).bottom, StateMetric::placeholder());
    }
}
