use crate::errors::{ResultResp, ServerError};
use astra::{Body, ResponseBuilder};

/// Serve the embedded stylesheet. The portal ships a single CSS file and
/// pulls htmx from a CDN, so there is no asset directory to manage.
pub fn css_response(css: &'static str) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime::TEXT_CSS_UTF_8.as_ref())
        .header("Cache-Control", "public, max-age=3600")
        .body(Body::from(css.to_string()))
        .map_err(|_| ServerError::InternalError)
}
