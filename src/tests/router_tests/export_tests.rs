use crate::router::handle;
use crate::tests::utils::*;

#[test]
fn export_downloads_the_filtered_view_as_xlsx() {
    let backend = stub_backend(vec![route("GET", "/blotters", 200, &sample_blotters_json())]);
    let state = test_state(&backend);

    let mut resp = handle(get("/export/blotter?status=Completed"), &state).unwrap();
    assert_eq!(resp.status(), 200);

    let content_type = resp
        .headers()
        .get("Content-Type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.contains("spreadsheetml"));

    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("blotter_records.xlsx"));

    // xlsx files are zip archives; check the magic bytes instead of
    // trying to parse the workbook.
    let body = {
        use std::io::Read;
        let mut bytes = Vec::new();
        resp.body_mut().reader().read_to_end(&mut bytes).unwrap();
        bytes
    };
    assert!(body.len() > 4);
    assert_eq!(&body[..2], b"PK");
}
