use std::{io::Write, path::PathBuf};

use dataset::{load_csv, DatasetError};
use shared::domain::{KnownSites, LaunchSite};

fn bundled_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("data")
        .join("spacex_launch_dash.csv")
}

#[test]
fn bundled_launch_table_loads_with_four_sites() {
    let dataset = load_csv(&bundled_path(), None).expect("bundled dataset");

    assert_eq!(dataset.len(), 56);
    let sites: Vec<_> = dataset.sites().iter().map(LaunchSite::as_str).collect();
    assert_eq!(
        sites,
        vec!["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"]
    );
    assert_eq!(dataset.payload_bounds().low(), 0.0);
    assert_eq!(dataset.payload_bounds().high(), 9600.0);
}

#[test]
fn configured_site_list_must_cover_bundled_table() {
    let partial = KnownSites::new([LaunchSite::new("CCAFS LC-40")]);
    let err = load_csv(&bundled_path(), Some(partial)).expect_err("unlisted sites");
    assert!(matches!(err, DatasetError::UnknownSite { .. }));
}

#[test]
fn loads_table_written_to_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        ",Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category"
    )
    .expect("header");
    writeln!(file, "0,7,CCAFS LC-40,1,3170.0,F9 v1.1,v1.1").expect("row");
    file.flush().expect("flush");

    let dataset = load_csv(file.path(), None).expect("dataset");
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.records()[0].flight_number, 7);
}
