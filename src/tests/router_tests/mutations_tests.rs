use crate::router::handle;
use crate::tests::utils::*;

#[test]
fn create_success_refetches_and_redirects() {
    let backend = stub_backend(vec![
        route("POST", "/blotters", 201, "{}"),
        route("GET", "/blotters", 200, &sample_blotters_json()),
    ]);
    let state = test_state(&backend);

    let resp = handle(
        post_form(
            "/blotter",
            "complainant_name=Juan+Cruz&respondent_name=Pedro+Ramos&complaint_type=Theft&incident_location=Purok+3&incident_date=2025-08-01",
        ),
        &state,
    )
    .unwrap();

    assert_eq!(resp.status(), 303);
    assert_eq!(
        resp.headers().get("Location").unwrap().to_str().unwrap(),
        "/blotter"
    );

    // The follow-up fetch replaced the snapshot.
    let loaded = state
        .blotters
        .lock()
        .unwrap()
        .snapshot()
        .len();
    assert_eq!(loaded, 5);
}

#[test]
fn validation_failure_rerenders_form_without_clearing_it() {
    let backend = stub_backend(vec![route(
        "POST",
        "/blotters",
        422,
        r#"{"errors": {"complainant_name": ["is required"]}}"#,
    )]);
    let state = test_state(&backend);

    let mut resp = handle(
        post_form(
            "/blotter",
            "complainant_name=&respondent_name=Pedro+Ramos&complaint_type=Theft&incident_date=2025-08-01",
        ),
        &state,
    )
    .unwrap();

    // Inline re-render, not a redirect.
    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("is required"));
    // The user's other fields survive the round trip.
    assert!(body.contains("Pedro Ramos"));
    // The modal is forced open so the errors are visible.
    assert!(body.contains(r#"class="modal" open"#));
}

#[test]
fn status_change_on_missing_record_toasts() {
    let backend = stub_backend(vec![route(
        "PATCH",
        "/blotters/77/status",
        404,
        r#"{"error":"no such record"}"#,
    )]);
    let state = test_state(&backend);

    let resp = handle(post_form("/blotter/77/status", "status=Completed"), &state).unwrap();

    assert_eq!(resp.status(), 303);
    let location = resp.headers().get("Location").unwrap().to_str().unwrap();
    assert!(location.starts_with("/blotter?err="));
    assert!(location.contains("77"));
}

#[test]
fn delete_refetches_on_success() {
    let backend = stub_backend(vec![
        route("DELETE", "/blotters/1", 200, "{}"),
        route("GET", "/blotters", 200, &sample_blotters_json()),
    ]);
    let state = test_state(&backend);

    let resp = handle(post_form("/blotter/1/delete", ""), &state).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(state.blotters.lock().unwrap().snapshot().len(), 5);
}

#[test]
fn appointment_status_request_is_relayed() {
    let backend = stub_backend(vec![
        route("PATCH", "/appointments/4/status", 200, "{}"),
        route("GET", "/appointments", 200, "[]"),
    ]);
    let state = test_state(&backend);

    let resp = handle(
        post_form("/appointments/4/status", "status=No+Show"),
        &state,
    )
    .unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(
        resp.headers().get("Location").unwrap().to_str().unwrap(),
        "/appointments"
    );
}
