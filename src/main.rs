use crate::config::Config;
use crate::prefs::init_db;
use crate::responses::html_error_response;
use crate::router::handle;
use crate::state::AppState;
use astra::Server;
use std::sync::Arc;

mod api;
mod auth;
mod config;
mod errors;
mod handlers;
mod pipeline;
mod prefs;
mod query;
mod responses;
mod router;
mod spreadsheets;
mod state;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let state = match AppState::new(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Startup failed: {e}");
            std::process::exit(1);
        }
    };

    // Preferences are a best-effort cache, but the schema must exist.
    if let Err(e) = init_db(&state.prefs, "sql/schema.sql") {
        eprintln!("❌ Preferences database initialization failed: {e}");
        std::process::exit(1);
    }

    let addr = state.config.bind_addr;
    println!(
        "Starting portal at http://{addr} (backend: {})",
        state.config.backend_base_url
    );

    let state = Arc::new(state);
    let server = Server::bind(&addr).max_workers(8);

    let result = server.serve(move |req, _info| match handle(req, &state) {
        Ok(resp) => resp,
        Err(err) => html_error_response(err),
    });

    if let Err(e) = result {
        eprintln!("Server ended with error: {e}");
    }

    println!("Server shut down cleanly.");
}
