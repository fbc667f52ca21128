// Authentication is owned by the backend; the portal only carries the
// session cookie back and forth. A missing cookie, like a backend 401,
// sends the user to /login.
use crate::errors::ServerError;
use astra::Request;

/// The caller's backend session token, straight from the cookie.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
}

pub fn get_cookie(req: &Request, name: &str) -> Option<String> {
    let header = req.headers().get("Cookie")?.to_str().ok()?;
    for pair in header.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        if let (Some(k), Some(v)) = (parts.next(), parts.next()) {
            if k == name {
                return Some(v.to_string());
            }
        }
    }
    None
}

/// Route guard: every screen behind the portal requires a session cookie.
/// Whether the token is still *valid* is the backend's call; an expired
/// one comes back as 401 and lands in the same redirect.
pub fn require_session(req: &Request) -> Result<Session, ServerError> {
    match get_cookie(req, "session") {
        Some(token) if !token.is_empty() => Ok(Session { token }),
        _ => Err(ServerError::Unauthorized("no session cookie".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astra::Body;
    use http::Method;

    fn bare_request() -> Request {
        http::Request::builder()
            .method(Method::GET)
            .uri("/blotter")
            .body(Body::from(String::new()))
            .unwrap()
    }

    fn request_with_cookie(value: &str) -> Request {
        let mut req = bare_request();
        req.headers_mut()
            .insert("Cookie", value.parse().unwrap());
        req
    }

    #[test]
    fn session_cookie_is_extracted_among_others() {
        let req = request_with_cookie("bp_client=abc; session=tok123; theme=dark");
        let session = require_session(&req).unwrap();
        assert_eq!(session.token, "tok123");
        assert_eq!(get_cookie(&req, "bp_client").as_deref(), Some("abc"));
    }

    #[test]
    fn missing_or_empty_session_is_unauthorized() {
        assert!(matches!(
            require_session(&bare_request()),
            Err(ServerError::Unauthorized(_))
        ));

        let req = request_with_cookie("session=");
        assert!(matches!(
            require_session(&req),
            Err(ServerError::Unauthorized(_))
        ));
    }
}
