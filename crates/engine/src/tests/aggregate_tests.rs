use super::*;
use shared::domain::LaunchSite;

fn record(site: &str, class: OutcomeClass, payload: f64) -> LaunchRecord {
    LaunchRecord {
        flight_number: 1,
        site: LaunchSite::new(site),
        outcome_class: class,
        payload_mass_kg: payload,
        booster_version: "F9 FT".into(),
        booster_version_category: "FT".into(),
    }
}

fn sites() -> KnownSites {
    KnownSites::new([LaunchSite::new("S1"), LaunchSite::new("S2")])
}

#[test]
fn all_sites_counts_raw_launches_per_site() {
    let records = [
        record("S1", OutcomeClass::Success, 1.0),
        record("S1", OutcomeClass::Failure, 2.0),
        record("S2", OutcomeClass::Failure, 3.0),
    ];
    let refs: Vec<_> = records.iter().collect();

    let breakdown = proportional_breakdown(&sites(), &refs, &SiteSelection::All).expect("pie");
    assert_eq!(breakdown.keys().collect::<Vec<_>>(), vec!["S1", "S2"]);
    assert_eq!(breakdown.get("S1"), Some(2));
    assert_eq!(breakdown.get("S2"), Some(1));
    assert_eq!(breakdown.total(), records.len());
}

#[test]
fn single_site_always_has_both_classes() {
    let records = [
        record("S1", OutcomeClass::Success, 1.0),
        record("S1", OutcomeClass::Success, 2.0),
    ];
    let refs: Vec<_> = records.iter().collect();
    let selection = SiteSelection::Site(LaunchSite::new("S1"));

    let breakdown = proportional_breakdown(&sites(), &refs, &selection).expect("pie");
    assert_eq!(breakdown.keys().collect::<Vec<_>>(), vec!["0", "1"]);
    assert_eq!(breakdown.get("0"), Some(0));
    assert_eq!(breakdown.get("1"), Some(2));
}

#[test]
fn single_site_ignores_records_from_other_sites() {
    let records = [
        record("S1", OutcomeClass::Failure, 1.0),
        record("S2", OutcomeClass::Success, 2.0),
    ];
    let refs: Vec<_> = records.iter().collect();
    let selection = SiteSelection::Site(LaunchSite::new("S1"));

    let breakdown = proportional_breakdown(&sites(), &refs, &selection).expect("pie");
    assert_eq!(breakdown.get("0"), Some(1));
    assert_eq!(breakdown.get("1"), Some(0));
}

#[test]
fn empty_subset_yields_zeroed_keys() {
    let all = proportional_breakdown(&sites(), &[], &SiteSelection::All).expect("pie");
    assert_eq!(all.len(), 2);
    assert_eq!(all.total(), 0);

    let single =
        proportional_breakdown(&sites(), &[], &SiteSelection::Site(LaunchSite::new("S2")))
            .expect("pie");
    assert_eq!(single.len(), 2);
    assert_eq!(single.total(), 0);

    assert!(scatter_projection(&sites(), &[]).expect("scatter").is_empty());
}

#[test]
fn scatter_emits_one_point_per_record_in_order() {
    let records = [
        record("S2", OutcomeClass::Failure, 3500.0),
        record("S1", OutcomeClass::Success, 1500.0),
    ];
    let refs: Vec<_> = records.iter().collect();

    let points = scatter_projection(&sites(), &refs).expect("scatter");
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].payload_mass_kg, 3500.0);
    assert_eq!(points[0].outcome_class, OutcomeClass::Failure);
    assert_eq!(points[1].payload_mass_kg, 1500.0);
    assert_eq!(points[1].booster_version_category, "FT");
}

#[test]
fn records_breaking_dataset_invariants_are_rejected() {
    let stray = record("S9", OutcomeClass::Success, 1.0);
    let err = proportional_breakdown(&sites(), &[&stray], &SiteSelection::All)
        .expect_err("unknown site");
    assert!(matches!(err, EngineError::InvariantViolation(_)));

    let bad_payload = record("S1", OutcomeClass::Success, f64::NAN);
    let err = scatter_projection(&sites(), &[&bad_payload]).expect_err("nan payload");
    assert!(matches!(err, EngineError::InvariantViolation(_)));
}

#[test]
fn unknown_selection_is_rejected_before_counting() {
    let err = proportional_breakdown(&sites(), &[], &SiteSelection::Site(LaunchSite::new("S9")))
        .expect_err("unknown");
    assert_eq!(err, EngineError::InvalidSelection("S9".into()));
}
