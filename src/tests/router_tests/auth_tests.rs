use crate::errors::ServerError;
use crate::responses::html_error_response;
use crate::router::handle;
use crate::tests::utils::*;

#[test]
fn missing_session_redirects_to_login() {
    let backend = stub_backend(vec![]);
    let state = test_state(&backend);

    let err = handle(get_anon("/blotter"), &state).unwrap_err();
    assert!(matches!(err, ServerError::Unauthorized(_)));

    let resp = html_error_response(err);
    assert_eq!(resp.status(), 303);
    assert_eq!(
        resp.headers().get("Location").unwrap().to_str().unwrap(),
        "/login"
    );
}

#[test]
fn backend_401_is_handled_process_wide() {
    // Session cookie present but the backend no longer accepts it.
    let backend = stub_backend(vec![route(
        "GET",
        "/blotters",
        401,
        r#"{"error":"session expired"}"#,
    )]);
    let state = test_state(&backend);

    let err = handle(get("/blotter"), &state).unwrap_err();
    assert!(matches!(err, ServerError::Unauthorized(_)));
    assert_eq!(html_error_response(err).status(), 303);
}

#[test]
fn login_page_renders_without_a_session() {
    let backend = stub_backend(vec![]);
    let state = test_state(&backend);

    let mut resp = handle(get_anon("/login"), &state).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("Sign in"));
    assert!(body.contains("/auth/login"));
}

#[test]
fn unknown_routes_are_404() {
    let backend = stub_backend(vec![]);
    let state = test_state(&backend);

    let err = handle(get("/no/such/page"), &state).unwrap_err();
    assert!(matches!(err, ServerError::NotFound));
    assert_eq!(html_error_response(err).status(), 404);
}

#[test]
fn first_visit_assigns_a_client_cookie() {
    let backend = stub_backend(vec![route("GET", "/blotters", 200, &sample_blotters_json())]);
    let state = test_state(&backend);

    let resp = handle(get("/blotter"), &state).unwrap();
    let set_cookie = resp
        .headers()
        .get("Set-Cookie")
        .expect("client cookie assigned")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("bp_client="));

    // A request that already carries one gets nothing new.
    let resp = handle(
        get_with_cookie("/blotter", "session=test-session; bp_client=abc"),
        &state,
    )
    .unwrap();
    assert!(resp.headers().get("Set-Cookie").is_none());
}
