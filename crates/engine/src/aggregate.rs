use shared::{
    domain::{KnownSites, LaunchRecord, OutcomeClass, SiteSelection},
    protocol::{CategoryBreakdown, ScatterPoint},
};

use crate::EngineError;

/// Count-per-category projection for the proportional chart.
///
/// With [`SiteSelection::All`] every known site is a key (in known-site order)
/// and the count is the raw number of launches from that site. With a single
/// site the keys are the two outcome classes, `0` then `1`. Empty groups are
/// kept with a count of zero.
pub fn proportional_breakdown(
    sites: &KnownSites,
    records: &[&LaunchRecord],
    selection: &SiteSelection,
) -> Result<CategoryBreakdown, EngineError> {
    sites.validate(selection)?;

    match selection {
        SiteSelection::All => {
            let mut counts = vec![0usize; sites.len()];
            for record in records {
                check_record(sites, record)?;
                let Some(slot) = sites.position(&record.site) else {
                    continue;
                };
                counts[slot] += 1;
            }
            Ok(CategoryBreakdown::from_counts(
                sites.iter().map(|site| site.to_string()).zip(counts),
            ))
        }
        SiteSelection::Site(site) => {
            let mut counts = [0usize; OutcomeClass::ALL.len()];
            for record in records {
                check_record(sites, record)?;
                if &record.site == site {
                    counts[record.outcome_class.index()] += 1;
                }
            }
            Ok(CategoryBreakdown::from_counts(
                OutcomeClass::ALL
                    .iter()
                    .map(|class| (class.label(), counts[class.index()])),
            ))
        }
    }
}

/// One scatter point per record, input order preserved.
pub fn scatter_projection(
    sites: &KnownSites,
    records: &[&LaunchRecord],
) -> Result<Vec<ScatterPoint>, EngineError> {
    records
        .iter()
        .map(|record| {
            check_record(sites, record)?;
            Ok(ScatterPoint {
                payload_mass_kg: record.payload_mass_kg,
                outcome_class: record.outcome_class,
                booster_version_category: record.booster_version_category.clone(),
            })
        })
        .collect()
}

fn check_record(sites: &KnownSites, record: &LaunchRecord) -> Result<(), EngineError> {
    if !sites.contains(&record.site) {
        return Err(EngineError::InvariantViolation(format!(
            "flight {} has unknown launch site '{}'",
            record.flight_number, record.site
        )));
    }
    if !record.has_valid_payload() {
        return Err(EngineError::InvariantViolation(format!(
            "flight {} has invalid payload mass {}",
            record.flight_number, record.payload_mass_kg
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/aggregate_tests.rs"]
mod tests;
