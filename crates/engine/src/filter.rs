use dataset::Dataset;
use shared::domain::{ControlState, LaunchRecord, SiteSelection};

use crate::EngineError;

/// Records admitted by both the site selection and the payload range, in
/// dataset order. Feeds the scatter projection.
pub fn filter<'a>(
    dataset: &'a Dataset,
    control: &ControlState,
) -> Result<Vec<&'a LaunchRecord>, EngineError> {
    let range = control.payload_range;
    if !range.is_well_formed() {
        return Err(EngineError::InvalidRange {
            low: range.low(),
            high: range.high(),
        });
    }
    dataset.sites().validate(&control.selected_site)?;

    Ok(dataset
        .records()
        .iter()
        .filter(|record| {
            control.selected_site.admits(&record.site) && range.contains(record.payload_mass_kg)
        })
        .collect())
}

/// Records admitted by the site selection alone, in dataset order. Feeds the
/// proportional breakdown; the payload range deliberately plays no part here.
pub fn filter_by_site<'a>(
    dataset: &'a Dataset,
    selection: &SiteSelection,
) -> Result<Vec<&'a LaunchRecord>, EngineError> {
    dataset.sites().validate(selection)?;

    Ok(dataset
        .records()
        .iter()
        .filter(|record| selection.admits(&record.site))
        .collect())
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
