use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};

/// Convert a ServerError into the response the browser should see.
///
/// Everything renders as an HTML error page except authentication
/// failures, which are handled process-wide as a redirect to /login.
pub fn html_error_response(err: ServerError) -> Response {
    match err {
        ServerError::Unauthorized(_) => redirect_to_login(),

        ServerError::NotFound => render_error(404, "Not Found"),

        ServerError::BadRequest(msg) => render_error(400, &msg),

        ServerError::Backend(msg) => render_error(502, &msg),

        ServerError::Validation(_) => {
            // Handlers re-render forms inline for validation failures;
            // reaching this path means a non-form request was rejected.
            render_error(400, &err.to_string())
        }

        ServerError::PrefsError(msg) => render_error(500, &format!("Preferences Error: {msg}")),

        ServerError::XlsxError(msg) => render_error(500, &format!("Spreadsheet Error: {msg}")),

        ServerError::InternalError => render_error(500, "Internal Server Error"),
    }
}

fn redirect_to_login() -> Response {
    ResponseBuilder::new()
        .status(303)
        .header("Location", "/login")
        .body(Body::from(String::new()))
        .unwrap_or_else(|_| Response::new(Body::from("Redirecting to /login".to_string())))
}

/// Build a basic HTML error page
fn render_error(status: u16, message: &str) -> Response {
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Error {status}</title>
  <style>
    body {{
      font-family: system-ui, sans-serif;
      max-width: 720px;
      margin: 4rem auto;
      padding: 1rem;
    }}
    h1 {{
      font-size: 2rem;
      margin-bottom: 1rem;
    }}
    p {{
      font-size: 1.1rem;
      color: #444;
    }}
  </style>
</head>
<body>
  <h1>Error {status}</h1>
  <p>{message}</p>
  <p><a href="/">&larr; Back to dashboard</a></p>
</body>
</html>"#
    );

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(html))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error".to_string())))
}
