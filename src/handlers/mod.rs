pub mod announcements;
pub mod appointments;
pub mod blotter;
pub mod cases;
pub mod dashboard;
pub mod export;
pub mod programs;

use crate::auth::{get_cookie, require_session, Session};
use crate::errors::{ResultResp, ServerError};
use crate::pipeline::{SortDir, SortSpec};
use crate::prefs::{
    generate_client_token, hash_client_token, load_prefs, save_prefs, ScreenPrefs, CLIENT_COOKIE,
    PER_PAGE_CHOICES,
};
use crate::query::ListQuery;
use crate::responses::{html_response, html_response_with_cookie, see_other};
use crate::state::AppState;
use astra::Request;
use maud::Markup;
use std::collections::HashMap;
use std::io::Read;

/// Per-request context: the backend session plus the anonymous client
/// identity the preferences store is keyed by. First visits get a fresh
/// client cookie assigned on the way out.
pub struct ReqContext {
    pub session: Session,
    pub client_hash: [u8; 32],
    pub set_cookie: Option<String>,
}

pub fn request_context(req: &Request) -> Result<ReqContext, ServerError> {
    let session = require_session(req)?;

    match get_cookie(req, CLIENT_COOKIE) {
        Some(token) if !token.is_empty() => Ok(ReqContext {
            client_hash: hash_client_token(&token),
            session,
            set_cookie: None,
        }),
        _ => {
            let token = generate_client_token();
            let client_hash = hash_client_token(&token);
            let set_cookie = format!(
                "{CLIENT_COOKIE}={token}; Path=/; Max-Age=31536000; SameSite=Lax"
            );
            Ok(ReqContext {
                session,
                client_hash,
                set_cookie: Some(set_cookie),
            })
        }
    }
}

pub fn respond_page(ctx: &ReqContext, markup: Markup) -> ResultResp {
    match &ctx.set_cookie {
        Some(cookie) => html_response_with_cookie(markup, cookie),
        None => html_response(markup),
    }
}

/// Resolved pipeline controls for one request: explicit query params win,
/// saved preferences fill the gaps, and any change is written back
/// (best-effort) so the next visit starts where the user left off.
pub struct Controls {
    pub sort: SortSpec,
    pub per_page: usize,
    pub view: String,
}

pub fn resolve_controls(
    state: &AppState,
    ctx: &ReqContext,
    screen: &str,
    default_sort_field: &str,
    q: &ListQuery,
) -> Controls {
    let saved = load_prefs(&state.prefs, &ctx.client_hash, screen, default_sort_field);

    let sort = q.sort.clone().unwrap_or_else(|| saved.sort_spec());
    let per_page = q
        .per_page
        .filter(|n| PER_PAGE_CHOICES.contains(n))
        .unwrap_or(saved.per_page);
    let view = q.view.clone().unwrap_or_else(|| saved.view_mode.clone());

    let updated = ScreenPrefs {
        per_page,
        sort_field: sort.field.clone(),
        sort_dir: sort.dir,
        view_mode: view.clone(),
    };
    if updated != saved {
        save_prefs(&state.prefs, &ctx.client_hash, screen, &updated);
    }

    Controls {
        sort,
        per_page,
        view,
    }
}

impl Controls {
    /// Fresh-page defaults (used when a POST handler re-renders a screen).
    pub fn defaults(default_sort_field: &str) -> Self {
        Controls {
            sort: SortSpec::new(default_sort_field, SortDir::Desc),
            per_page: crate::prefs::DEFAULT_PER_PAGE,
            view: "table".to_string(),
        }
    }
}

/// Read and decode an urlencoded form body.
pub fn read_form(req: &mut Request) -> Result<HashMap<String, String>, ServerError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut buf)
        .map_err(|_| ServerError::BadRequest("unreadable request body".into()))?;

    Ok(url::form_urlencoded::parse(&buf)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect())
}

pub fn form_field(form: &HashMap<String, String>, key: &str) -> String {
    form.get(key).map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Post/redirect/get with a one-shot error message in the query string.
/// The target screen renders it as a toast above the list.
pub fn toast_redirect(path: &str, message: &str) -> ResultResp {
    let mut ser = url::form_urlencoded::Serializer::new(String::new());
    ser.append_pair("err", message);
    see_other(&format!("{path}?{}", ser.finish()))
}
