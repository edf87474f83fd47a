use anyhow::{bail, Context, Result};
use common::aggregate::PopulationTable;
use common::models::PopulationRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Loads the population table from the csv file at `path`.
///
/// Any problem with the file is fatal: the dashboard has nothing to show
/// without it, so the error names the file and, where it can, the bad row.

pub fn load_table(path: &Path) -> Result<PopulationTable> {
    let file = File::open(path)
        .with_context(|| format!("couldn't open population data at {}", path.display()))?;
    let table = read_table(file)
        .with_context(|| format!("couldn't load population data from {}", path.display()))?;

    info!(
        rows = table.len(),
        years = table.years().len(),
        "loaded population data from {}",
        path.display()
    );
    Ok(table)
}

/// Reads population records from csv with a header row. Columns are matched by
/// name and anything unrecognised, like a leading index column, is skipped.

pub fn read_table<R: Read>(reader: R) -> Result<PopulationTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let records = reader
        .deserialize::<PopulationRecord>()
        .collect::<Result<Vec<PopulationRecord>, csv::Error>>()?;

    if records.is_empty() {
        bail!("no population rows found");
    }

    Ok(PopulationTable::new(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const CENSUS: &str = "\
,states,states_code,id,year,population
0,Alabama,AL,1,2010,4785437
1,Alaska,AK,2,2010,713910
2,Alabama,AL,1,2011,4799069
3,Alaska,AK,2,2011,722128
";

    #[test]
    fn reads_census_layout() {
        let table = read_table(CENSUS.as_bytes()).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.years(), vec![2011, 2010]);
        let first = &table.records()[0];
        assert_eq!(first.state_name, "Alabama");
        assert_eq!(first.state_code, "AL");
        assert_eq!(first.id.as_deref(), Some("1"));
        assert_eq!(first.population, 4_785_437);
    }

    #[test]
    fn id_column_is_optional() {
        let csv = "year,states,states_code,population\n2010,Ohio,OH,11539327\n";
        let table = read_table(csv.as_bytes()).unwrap();
        assert_eq!(table.records()[0].id, None);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CENSUS.as_bytes()).unwrap();
        let table = load_table(file.path()).unwrap();
        assert_eq!(table.compute_change(2011)[0].population_change, 13_632);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nowhere.csv");
        let err = load_table(&path).unwrap_err();
        assert!(format!("{}", err).contains("nowhere.csv"));
    }

    #[test]
    fn rejects_malformed_rows() {
        let missing_column = "year,states,population\n2010,Ohio,11539327\n";
        assert!(read_table(missing_column.as_bytes()).is_err());

        let bad_number = "year,states,states_code,population\n2010,Ohio,OH,lots\n";
        assert!(read_table(bad_number.as_bytes()).is_err());

        let duplicate = "year,states,states_code,population\n2010,Ohio,OH,1\n2010,Ohio,OH,2\n";
        let err = read_table(duplicate.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("more than once"));

        assert!(read_table("year,states,states_code,population\n".as_bytes()).is_err());
    }
}
