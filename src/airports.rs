//! Airport reference dataset
//!
//! Loads the OpenFlights `airports.dat` CSV (no header; columns
//! `id,name,city,country,iata,...`) once per process. A missing file is not
//! an error: the dataset is simply empty and callers fall back to remote
//! lookups only.

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use csv::ReaderBuilder;
use tracing::{debug, info, warn};

use crate::models::{IataCode, LocationRecord};
use crate::similarity;

/// Lazily loaded, read-only airport table
#[derive(Debug)]
pub struct AirportDataset {
    path: Option<PathBuf>,
    index: OnceLock<AirportIndex>,
}

#[derive(Debug, Default)]
struct AirportIndex {
    records: Vec<LocationRecord>,
    /// Distinct lowercase city names that have at least one code
    cities: Vec<String>,
}

impl AirportIndex {
    fn build(records: Vec<LocationRecord>) -> Self {
        let mut seen = HashSet::new();
        let cities = records
            .iter()
            .filter(|record| record.code.is_some())
            .map(|record| record.city.to_lowercase())
            .filter(|city| !city.is_empty() && seen.insert(city.clone()))
            .collect();
        Self { records, cities }
    }
}

impl AirportDataset {
    /// Dataset backed by a file, read on first use
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            index: OnceLock::new(),
        }
    }

    /// Dataset from records already in memory
    #[must_use]
    pub fn from_records(records: Vec<LocationRecord>) -> Self {
        let index = OnceLock::new();
        let _ = index.set(AirportIndex::build(records));
        Self { path: None, index }
    }

    /// Dataset with no records at all
    #[must_use]
    pub fn empty() -> Self {
        Self::from_records(Vec::new())
    }

    pub fn records(&self) -> &[LocationRecord] {
        &self.index().records
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// Code of the first record whose city equals `query`, ignoring case
    pub fn exact_city_code(&self, query: &str) -> Option<IataCode> {
        let wanted = query.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.code_for_city(&wanted)
    }

    /// Code of the closest known city scoring at least `cutoff`
    pub fn fuzzy_city_code(&self, query: &str, cutoff: f64) -> Option<IataCode> {
        let wanted = query.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }

        let index = self.index();
        let (best, score) =
            similarity::closest_match(&wanted, index.cities.iter().map(String::as_str), cutoff)?;
        debug!("Fuzzy matched '{}' to city '{}' (score {:.3})", query, best, score);
        self.code_for_city(best)
    }

    fn code_for_city(&self, city_lower: &str) -> Option<IataCode> {
        self.records()
            .iter()
            .filter(|record| record.city.to_lowercase() == city_lower)
            .find_map(|record| record.code.clone())
    }

    fn index(&self) -> &AirportIndex {
        self.index.get_or_init(|| match &self.path {
            Some(path) => AirportIndex::build(load_or_empty(path)),
            None => AirportIndex::default(),
        })
    }
}

fn load_or_empty(path: &Path) -> Vec<LocationRecord> {
    if !path.exists() {
        warn!(
            "Airport dataset not found at {}, resolving locations remotely only",
            path.display()
        );
        return Vec::new();
    }

    match std::fs::File::open(path) {
        Ok(file) => {
            let records = parse_records(file);
            info!("Loaded {} airports from {}", records.len(), path.display());
            records
        }
        Err(e) => {
            warn!("Failed to open airport dataset {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Parse OpenFlights rows, skipping short or malformed lines
pub fn parse_records<R: Read>(reader: R) -> Vec<LocationRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                debug!("Skipping malformed airport row: {}", e);
                continue;
            }
        };
        if row.len() < 5 {
            continue;
        }
        records.push(LocationRecord::new(
            &row[1],
            &row[2],
            &row[3],
            Some(&row[4]),
        ));
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"1,"Charles de Gaulle International Airport","Paris","France","CDG","LFPG",49.0127,2.55,392,1,"E","Europe/Paris","airport","OurAirports"
2,"Paris-Orly Airport","Paris","France","ORY","LFPO",48.7233,2.3794,291,1,"E","Europe/Paris","airport","OurAirports"
3,"Some Strip","Nowhere","Chad",\N,"FTXX",0,0,0,1,"U","\N","airport","OurAirports"
4,"Heathrow","London","United Kingdom","LHR","EGLL",51.47,-0.46,83,0,"E","Europe/London","airport","OurAirports"
5,"short row""#;

    #[test]
    fn test_parse_records() {
        let records = parse_records(SAMPLE.as_bytes());
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].city, "Paris");
        assert_eq!(records[0].code.as_ref().unwrap().as_str(), "CDG");
        assert!(records[2].code.is_none());
    }

    #[test]
    fn test_exact_city_prefers_first_code() {
        let dataset = AirportDataset::from_records(parse_records(SAMPLE.as_bytes()));
        assert_eq!(dataset.exact_city_code("PARIS").unwrap().as_str(), "CDG");
        assert_eq!(dataset.exact_city_code(" london ").unwrap().as_str(), "LHR");
        assert!(dataset.exact_city_code("Nowhere").is_none());
    }

    #[test]
    fn test_fuzzy_city_code() {
        let dataset = AirportDataset::from_records(parse_records(SAMPLE.as_bytes()));
        assert_eq!(dataset.fuzzy_city_code("Londn", 0.8).unwrap().as_str(), "LHR");
        assert!(dataset.fuzzy_city_code("Lima", 0.8).is_none());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dataset = AirportDataset::new("/definitely/not/here/airports.dat");
        assert!(dataset.is_empty());
        assert!(dataset.exact_city_code("Paris").is_none());
    }

    #[test]
    fn test_loads_from_file_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dataset = AirportDataset::new(file.path());
        assert_eq!(dataset.len(), 4);

        // Later edits are not observed; the table is loaded once
        file.write_all(b"\n9,\"Extra\",\"Rome\",\"Italy\",\"FCO\"").unwrap();
        assert_eq!(dataset.len(), 4);
    }
}
