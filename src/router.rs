use crate::errors::{ResultResp, ServerError};
use crate::handlers;
use crate::responses::{css_response, html_response};
use crate::state::AppState;
use crate::templates::pages::login_page;
use astra::Request;

const MAIN_CSS: &str = include_str!("../static/main.css");

pub fn handle(mut req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let parts: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method.as_str(), parts.as_slice()) {
        ("GET", [""]) => handlers::dashboard::page(&req, state),

        ("GET", ["login"]) => {
            let login_url = format!(
                "{}/auth/login",
                state.config.backend_base_url.as_str().trim_end_matches('/')
            );
            html_response(login_page(&login_url))
        }

        ("GET", ["static", "main.css"]) => css_response(MAIN_CSS),

        // Blotter records
        ("GET", ["blotter"]) => handlers::blotter::page(&req, state),
        ("GET", ["blotter", "table"]) => handlers::blotter::table(&req, state),
        ("POST", ["blotter"]) => handlers::blotter::create(&mut req, state),
        ("POST", ["blotter", id, "status"]) => {
            let id = parse_id(id)?;
            handlers::blotter::set_status(&mut req, state, id)
        }
        ("POST", ["blotter", id, "delete"]) => {
            let id = parse_id(id)?;
            handlers::blotter::delete(&req, state, id)
        }

        // Ongoing cases (hearing flow over the same records)
        ("GET", ["cases"]) => handlers::cases::page(&req, state),
        ("GET", ["cases", "table"]) => handlers::cases::table(&req, state),

        // Appointment requests
        ("GET", ["appointments"]) => handlers::appointments::page(&req, state),
        ("GET", ["appointments", "table"]) => handlers::appointments::table(&req, state),
        ("POST", ["appointments"]) => handlers::appointments::create(&mut req, state),
        ("POST", ["appointments", id, "status"]) => {
            let id = parse_id(id)?;
            handlers::appointments::set_status(&mut req, state, id)
        }
        ("POST", ["appointments", id, "delete"]) => {
            let id = parse_id(id)?;
            handlers::appointments::delete(&req, state, id)
        }

        // Announcements
        ("GET", ["announcements"]) => handlers::announcements::page(&req, state),
        ("GET", ["announcements", "table"]) => handlers::announcements::table(&req, state),
        ("POST", ["announcements"]) => handlers::announcements::create(&mut req, state),
        ("POST", ["announcements", id, "delete"]) => {
            let id = parse_id(id)?;
            handlers::announcements::delete(&req, state, id)
        }

        // Programs & beneficiaries
        ("GET", ["programs"]) => handlers::programs::page(&req, state),
        ("GET", ["programs", "table"]) => handlers::programs::table(&req, state),
        ("POST", ["programs"]) => handlers::programs::create(&mut req, state),
        ("POST", ["programs", id, "status"]) => {
            let id = parse_id(id)?;
            handlers::programs::set_status(&mut req, state, id)
        }
        ("GET", ["programs", id]) => {
            let id = parse_id(id)?;
            handlers::programs::detail(&req, state, id)
        }
        ("POST", ["programs", id, "beneficiaries"]) => {
            let id = parse_id(id)?;
            handlers::programs::enroll_beneficiary(&mut req, state, id)
        }
        ("POST", ["programs", pid, "beneficiaries", bid, "remove"]) => {
            let pid = parse_id(pid)?;
            let bid = parse_id(bid)?;
            handlers::programs::remove_beneficiary(&req, state, pid, bid)
        }

        // Spreadsheet export of the current blotter view
        ("GET", ["export", "blotter"]) => handlers::export::blotter_xlsx(&req, state),

        _ => Err(ServerError::NotFound),
    }
}

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse()
        .map_err(|_| ServerError::BadRequest(format!("invalid id '{raw}'")))
}
