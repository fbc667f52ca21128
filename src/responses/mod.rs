pub mod errors;
pub mod html;
pub mod redirect;
pub mod statics;
pub mod xlsx;

pub use errors::html_error_response;
pub use html::{html_response, html_response_with_cookie};
pub use redirect::see_other;
pub use statics::css_response;
pub use xlsx::xlsx_response;
