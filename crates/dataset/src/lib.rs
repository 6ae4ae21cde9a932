use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use shared::domain::{
    ControlState, KnownSites, LaunchRecord, LaunchSite, OutcomeClass, PayloadRange, SiteSelection,
    ALL_SITES,
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open dataset '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed dataset row {row}")]
    Parse {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("dataset contains no launch records")]
    Empty,
    #[error("row {row}: launch site '{site}' is not a known site")]
    UnknownSite { row: usize, site: String },
    #[error("launch site name '{site}' is reserved for the all-sites selection")]
    ReservedSite { site: String },
    #[error("row {row}: payload mass {value} must be finite and non-negative")]
    InvalidPayload { row: usize, value: f64 },
    #[error("row {row}: outcome class {value} must be 0 or 1")]
    InvalidOutcomeClass { row: usize, value: i64 },
}

/// One row of the launch table as it appears in the CSV file.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Flight Number")]
    flight_number: u32,
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "class")]
    class: i64,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version")]
    booster_version: String,
    #[serde(rename = "Booster Version Category")]
    booster_version_category: String,
}

/// Immutable, validated launch table. Never empty; every record's site is known.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<LaunchRecord>,
    sites: KnownSites,
    payload_bounds: PayloadRange,
}

impl Dataset {
    /// Validates `records`, deriving the known site set from first appearance.
    pub fn new(records: Vec<LaunchRecord>) -> Result<Self, DatasetError> {
        let sites = KnownSites::new(records.iter().map(|record| record.site.clone()));
        Self::with_known_sites(records, sites)
    }

    /// Validates `records` against an explicit site set.
    pub fn with_known_sites(
        records: Vec<LaunchRecord>,
        sites: KnownSites,
    ) -> Result<Self, DatasetError> {
        if records.is_empty() {
            return Err(DatasetError::Empty);
        }
        if let Some(site) = sites.iter().find(|site| site.as_str().trim() == ALL_SITES) {
            return Err(DatasetError::ReservedSite {
                site: site.as_str().to_string(),
            });
        }

        let mut min_payload = f64::INFINITY;
        let mut max_payload = f64::NEG_INFINITY;
        for (index, record) in records.iter().enumerate() {
            let row = index + 1;
            if !sites.contains(&record.site) {
                return Err(DatasetError::UnknownSite {
                    row,
                    site: record.site.0.clone(),
                });
            }
            if !record.has_valid_payload() {
                return Err(DatasetError::InvalidPayload {
                    row,
                    value: record.payload_mass_kg,
                });
            }
            min_payload = min_payload.min(record.payload_mass_kg);
            max_payload = max_payload.max(record.payload_mass_kg);
        }

        let payload_bounds = PayloadRange::new(min_payload, max_payload).map_err(|_| {
            DatasetError::InvalidPayload {
                row: 0,
                value: min_payload,
            }
        })?;

        Ok(Self {
            records,
            sites,
            payload_bounds,
        })
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sites(&self) -> &KnownSites {
        &self.sites
    }

    /// Dataset-wide `[min, max]` payload mass.
    pub fn payload_bounds(&self) -> PayloadRange {
        self.payload_bounds
    }

    /// Control state a fresh UI session starts from: all sites, full payload range.
    pub fn initial_control_state(&self) -> ControlState {
        ControlState::new(SiteSelection::All, self.payload_bounds)
    }
}

pub fn load_csv(path: &Path, known_sites: Option<KnownSites>) -> Result<Dataset, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = from_reader(file, known_sites)?;
    info!(
        path = %path.display(),
        records = dataset.len(),
        sites = dataset.sites().len(),
        payload_min = dataset.payload_bounds().low(),
        payload_max = dataset.payload_bounds().high(),
        "launch dataset loaded"
    );
    Ok(dataset)
}

pub fn from_reader<R: Read>(
    reader: R,
    known_sites: Option<KnownSites>,
) -> Result<Dataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = index + 1;
        let raw = result.map_err(|source| DatasetError::Parse { row, source })?;
        let outcome_class = OutcomeClass::try_from(raw.class)
            .map_err(|_| DatasetError::InvalidOutcomeClass {
                row,
                value: raw.class,
            })?;
        records.push(LaunchRecord {
            flight_number: raw.flight_number,
            site: LaunchSite::new(raw.launch_site),
            outcome_class,
            payload_mass_kg: raw.payload_mass_kg,
            booster_version: raw.booster_version,
            booster_version_category: raw.booster_version_category,
        });
    }

    match known_sites {
        Some(sites) => Dataset::with_known_sites(records, sites),
        None => Dataset::new(records),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
