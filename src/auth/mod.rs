pub mod session;

pub use session::{get_cookie, require_session, Session};
