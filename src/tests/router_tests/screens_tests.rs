use crate::router::handle;
use crate::tests::utils::*;

#[test]
fn blotter_screen_lists_backend_records() {
    let backend = stub_backend(vec![route("GET", "/blotters", 200, &sample_blotters_json())]);
    let state = test_state(&backend);

    let mut resp = handle(get("/blotter"), &state).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(&mut resp);
    assert!(body.contains("Maria Santos"));
    assert!(body.contains("BLT-2025-0001"));
    assert!(body.contains("John Reyes"));
}

#[test]
fn status_filter_narrows_to_exact_matches() {
    let backend = stub_backend(vec![route("GET", "/blotters", 200, &sample_blotters_json())]);
    let state = test_state(&backend);

    let mut resp = handle(get("/blotter/table?status=Completed"), &state).unwrap();
    let body = body_string(&mut resp);

    // 2 of 5 records are Completed.
    assert!(body.contains("Maria Santos"));
    assert!(body.contains("Ramon Garcia"));
    assert!(!body.contains("John Reyes"));
    assert!(body.contains("of <strong>2</strong>"));
}

#[test]
fn search_matches_case_insensitive_substring() {
    let backend = stub_backend(vec![route("GET", "/blotters", 200, &sample_blotters_json())]);
    let state = test_state(&backend);

    let mut resp = handle(get("/blotter/table?q=mari"), &state).unwrap();
    let body = body_string(&mut resp);
    assert!(body.contains("Maria Santos"));
    assert!(!body.contains("John Reyes"));
}

#[test]
fn pagination_slices_and_page_size_change_clamps() {
    let backend = stub_backend(vec![route("GET", "/blotters", 200, &many_blotters_json(23))]);
    let state = test_state(&backend);

    // Page 3 of 23 records at 10/page holds records 21-23.
    let mut resp = handle(
        get("/blotter/table?per_page=10&page=3&sort=case_number&dir=asc"),
        &state,
    )
    .unwrap();
    let body = body_string(&mut resp);
    assert!(body.contains("Page 3 of 3"));
    assert!(body.contains("Resident 21"));
    assert!(body.contains("Resident 23"));
    assert!(!body.contains("Resident 20"));

    // Growing the page size to 25 makes everything fit on page 1; the
    // stale page=3 clamps back instead of rendering an empty page.
    let mut resp = handle(
        get("/blotter/table?per_page=25&page=3&sort=case_number&dir=asc"),
        &state,
    )
    .unwrap();
    let body = body_string(&mut resp);
    assert!(body.contains("Page 1 of 1"));
    assert!(body.contains("Resident 01"));
}

#[test]
fn fetch_failure_keeps_stale_data_and_banners() {
    let backend = stub_backend_seq(vec![
        (200, sample_blotters_json()),
        (500, r#"{"error":"database down"}"#.to_string()),
    ]);
    let state = test_state(&backend);

    // First load succeeds.
    let mut resp = handle(get("/blotter"), &state).unwrap();
    assert!(body_string(&mut resp).contains("Maria Santos"));

    // Second load fails; prior snapshot stays visible behind a banner.
    let mut resp = handle(get("/blotter"), &state).unwrap();
    let body = body_string(&mut resp);
    assert!(body.contains("Maria Santos"));
    assert!(body.contains("Could not refresh"));
}

#[test]
fn cases_screen_scopes_to_hearing_flow() {
    let records = serde_json::json!([
        {"id": 1, "case_number": "BLT-1", "complainant_name": "Ana", "status": "Scheduled", "hearing_date": "2025-08-20"},
        {"id": 2, "case_number": "BLT-2", "complainant_name": "Ben", "status": "Ongoing"},
        {"id": 3, "case_number": "BLT-3", "complainant_name": "Celia", "status": "Completed"}
    ])
    .to_string();
    let backend = stub_backend(vec![route("GET", "/blotters", 200, &records)]);
    let state = test_state(&backend);

    let mut resp = handle(get("/cases"), &state).unwrap();
    let body = body_string(&mut resp);
    assert!(body.contains("Ana"));
    assert!(body.contains("Ben"));
    assert!(!body.contains("Celia"));
}

#[test]
fn malformed_rows_are_dropped_not_fatal() {
    let records = r#"[
        {"id": 1, "complainant_name": "Good Row", "status": "Pending"},
        {"complainant_name": "No Id Row"},
        {"id": 3, "complainant_name": "Another Good Row", "incident_date": "not a date", "status": "mystery"}
    ]"#;
    let backend = stub_backend(vec![route("GET", "/blotters", 200, records)]);
    let state = test_state(&backend);

    let mut resp = handle(get("/blotter"), &state).unwrap();
    let body = body_string(&mut resp);
    assert!(body.contains("Good Row"));
    assert!(!body.contains("No Id Row"));
    // Unknown status folds to the initial state instead of crashing.
    assert!(body.contains("Another Good Row"));
}

#[test]
fn per_page_preference_persists_across_requests() {
    let backend = stub_backend(vec![route("GET", "/blotters", 200, &sample_blotters_json())]);
    let state = test_state(&backend);
    let cookie = "session=test-session; bp_client=stable-client-token";

    let mut resp = handle(
        get_with_cookie("/blotter?per_page=25", cookie),
        &state,
    )
    .unwrap();
    body_string(&mut resp);

    // No per_page in the query now; the saved preference applies.
    let mut resp = handle(get_with_cookie("/blotter", cookie), &state).unwrap();
    let body = body_string(&mut resp);
    assert!(body.contains(r#"value="25" selected"#));
}

#[test]
fn announcements_card_view_renders_cards() {
    let records = serde_json::json!([
        {"id": 1, "title": "Vaccination Drive", "body": "At the covered court.", "audience": "All Residents", "status": "Posted"}
    ])
    .to_string();
    let backend = stub_backend(vec![route("GET", "/announcements", 200, &records)]);
    let state = test_state(&backend);

    let mut resp = handle(get("/announcements?view=cards"), &state).unwrap();
    let body = body_string(&mut resp);
    assert!(body.contains("announcement-cards"));
    assert!(body.contains("Vaccination Drive"));
}
