use crate::errors::{ResultResp, ServerError};
use astra::{Body, ResponseBuilder};

/// 303 See Other, used for post/redirect/get after mutations and for the
/// process-wide login redirect.
pub fn see_other(location: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(303)
        .header("Location", location)
        .body(Body::from(String::new()))
        .map_err(|_| ServerError::InternalError)
}
