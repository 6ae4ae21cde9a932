use super::*;
use dataset::Dataset;
use engine::DashboardContext;
use shared::domain::{LaunchRecord, LaunchSite, OutcomeClass, SiteSelection};

fn session() -> DashboardSession {
    let records = vec![
        LaunchRecord {
            flight_number: 1,
            site: LaunchSite::new("VAFB SLC-4E"),
            outcome_class: OutcomeClass::Success,
            payload_mass_kg: 9600.0,
            booster_version: "F9 FT B1029.1".into(),
            booster_version_category: "FT".into(),
        },
        LaunchRecord {
            flight_number: 2,
            site: LaunchSite::new("KSC LC-39A"),
            outcome_class: OutcomeClass::Failure,
            payload_mass_kg: 2708.0,
            booster_version: "F9 FT B1035.1".into(),
            booster_version_category: "FT".into(),
        },
    ];
    let ctx = DashboardContext::new(Arc::new(Dataset::new(records).expect("dataset")), 1000.0);
    DashboardSession::new(ctx).expect("session")
}

#[test]
fn valid_change_produces_updated_view() {
    let mut session = session();
    let event = handle_control_message(
        &mut session,
        r#"{"type":"select_site","payload":{"site":"VAFB SLC-4E"}}"#,
    );

    let SessionEvent::ViewUpdated { view } = event else {
        panic!("expected view update");
    };
    assert_eq!(
        view.control.selected_site,
        SiteSelection::Site(LaunchSite::new("VAFB SLC-4E"))
    );
    assert_eq!(view.scatter.points.len(), 1);
}

#[test]
fn malformed_message_is_rejected_as_validation() {
    let mut session = session();
    let event = handle_control_message(&mut session, "{not json");

    let SessionEvent::Rejected(err) = event else {
        panic!("expected rejection");
    };
    assert_eq!(err.code, ErrorCode::Validation);
}

#[test]
fn unknown_site_keeps_session_on_previous_view() {
    let mut session = session();
    let before = session.view().clone();
    let event = handle_control_message(
        &mut session,
        r#"{"type":"select_site","payload":{"site":"Boca Chica"}}"#,
    );

    let SessionEvent::Rejected(err) = event else {
        panic!("expected rejection");
    };
    assert_eq!(err.code, ErrorCode::InvalidSelection);
    assert_eq!(session.view(), &before);
}

#[test]
fn inverted_range_message_is_rejected() {
    let mut session = session();
    let event = handle_control_message(
        &mut session,
        r#"{"type":"set_payload_range","payload":{"low":5000,"high":100}}"#,
    );

    let SessionEvent::Rejected(err) = event else {
        panic!("expected rejection");
    };
    assert_eq!(err.code, ErrorCode::InvalidRange);
}

#[test]
fn reject_maps_engine_errors_to_status_codes() {
    let (status, Json(err)) = reject(EngineError::InvalidSelection("x".into()));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err.code, ErrorCode::InvalidSelection);

    let (status, _) = reject(EngineError::InvariantViolation("broken".into()));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn send_event_writes_json_text_frame() {
    let (mut tx, mut rx) = futures::channel::mpsc::channel::<Message>(1);
    let event = SessionEvent::Rejected(ApiError::new(ErrorCode::InvalidRange, "low above high"));

    send_event(&mut tx, &event).await.expect("send");

    let Some(Message::Text(text)) = rx.next().await else {
        panic!("expected text frame");
    };
    let value: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(value["type"], "rejected");
    assert_eq!(value["payload"]["code"], "invalid_range");
}

#[tokio::test]
async fn send_event_reports_closed_socket() {
    let (mut tx, rx) = futures::channel::mpsc::channel::<Message>(1);
    drop(rx);
    let event = SessionEvent::ViewUpdated {
        view: session().view().clone(),
    };

    let err = send_event(&mut tx, &event).await.expect_err("closed");
    assert!(err.to_string().contains("failed to write session event"));
}
